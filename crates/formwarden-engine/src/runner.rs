//! Validator runner

use formwarden_core::{SharedValidator, ValidationContext, ValidationResult, ValidatorError};

/// Run `validators` in order and collect every failure message.
///
/// Each validator is awaited before the next one starts. A failing
/// validator does not stop the run; an erroring one does.
pub(crate) async fn run_validators(
	validators: &[SharedValidator],
	ctx: &ValidationContext,
) -> Result<Vec<String>, ValidatorError> {
	let mut messages = Vec::new();
	for validator in validators {
		if let ValidationResult::Invalid { message, .. } = validator.validate(ctx).await? {
			messages.push(message);
		}
	}
	Ok(messages)
}

#[cfg(test)]
mod tests {
	use super::*;
	use formwarden_core::validators::{custom, email, min_length, required, try_custom};
	use rstest::rstest;
	use std::cell::RefCell;
	use std::rc::Rc;

	#[rstest]
	#[tokio::test]
	async fn test_collects_every_failure_in_order() {
		// Arrange
		let validators: Vec<SharedValidator> = vec![
			Rc::new(required()),
			Rc::new(email()),
			Rc::new(min_length(8)),
		];
		let ctx = ValidationContext::detached("email", "nope");

		// Act
		let messages = run_validators(&validators, &ctx).await.unwrap();

		// Assert
		assert_eq!(
			messages,
			vec!["Invalid email address.", "Must be at least 8 characters."]
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_error_aborts_remaining_validators() {
		// Arrange
		let seen = Rc::new(RefCell::new(Vec::new()));
		let log = seen.clone();
		let validators: Vec<SharedValidator> = vec![
			Rc::new(try_custom(|_| Err(ValidatorError::new("backend unavailable")))),
			Rc::new(custom(move |_| {
				log.borrow_mut().push("second");
				ValidationResult::Valid
			})),
		];

		// Act
		let result = run_validators(&validators, &ValidationContext::detached("x", "y")).await;

		// Assert
		assert_eq!(result, Err(ValidatorError::new("backend unavailable")));
		assert!(seen.borrow().is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_no_validators_is_valid() {
		let messages = run_validators(&[], &ValidationContext::detached("x", "")).await;
		assert_eq!(messages, Ok(vec![]));
	}
}
