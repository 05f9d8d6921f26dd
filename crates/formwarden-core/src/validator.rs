//! Validator traits
//!
//! A [`Validator`] checks one field's current value (with the whole form
//! snapshot available for comparisons) and a [`CrossFieldValidator`] checks
//! the form as a whole. Both are asynchronous so that validators which need
//! to wait (for example on a uniqueness lookup) compose with the synchronous
//! built-ins without special casing.
//!
//! Expected failures are [`ValidationResult::Invalid`] values. A
//! [`ValidatorError`] means the validator itself could not run; the engine
//! aborts the current validation and hands the error to its caller.

use crate::binding::ElementRef;
use crate::result::ValidationResult;
use crate::value::{FieldValue, FormData};
use async_trait::async_trait;
use std::future::Future;
use std::rc::Rc;

/// Everything a validator gets to look at.
#[derive(Debug, Clone)]
pub struct ValidationContext {
	/// Name of the field being validated
	pub name: String,
	/// Current value of the field
	pub value: FieldValue,
	/// Snapshot of every field, taken when the run started
	pub form_data: Rc<FormData>,
	pub field_element: Option<ElementRef>,
	pub form_element: Option<ElementRef>,
}

impl ValidationContext {
	/// Context for a detached value, mostly useful in tests.
	///
	/// # Examples
	///
	/// ```
	/// use formwarden_core::{FieldValue, ValidationContext};
	///
	/// let ctx = ValidationContext::detached("email", "a@b.co");
	/// assert_eq!(ctx.value, FieldValue::from("a@b.co"));
	/// assert_eq!(ctx.form_data.value_of("email"), &ctx.value);
	/// ```
	pub fn detached(name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
		let name = name.into();
		let value = value.into();
		let mut form_data = FormData::new();
		form_data.insert(name.clone(), value.clone());
		Self {
			name,
			value,
			form_data: Rc::new(form_data),
			field_element: None,
			form_element: None,
		}
	}

	/// Context for `name` within an existing snapshot.
	pub fn within(name: impl Into<String>, form_data: Rc<FormData>) -> Self {
		let name = name.into();
		let value = form_data.value_of(&name).clone();
		Self {
			name,
			value,
			form_data,
			field_element: None,
			form_element: None,
		}
	}
}

/// Raised by a validator that could not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidatorError {
	message: String,
}

impl ValidatorError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}

	pub fn message(&self) -> &str {
		&self.message
	}
}

/// Field-level validator.
#[async_trait(?Send)]
pub trait Validator {
	async fn validate(&self, ctx: &ValidationContext) -> Result<ValidationResult, ValidatorError>;
}

pub type SharedValidator = Rc<dyn Validator>;

/// Form-level validator; every `Invalid` entry becomes a form message.
#[async_trait(?Send)]
pub trait CrossFieldValidator {
	async fn validate(
		&self,
		form_data: &FormData,
		form_element: Option<ElementRef>,
	) -> Result<Vec<ValidationResult>, ValidatorError>;
}

pub type SharedCrossFieldValidator = Rc<dyn CrossFieldValidator>;

#[async_trait(?Send)]
impl<F> CrossFieldValidator for F
where
	F: Fn(&FormData, Option<ElementRef>) -> Vec<ValidationResult>,
{
	async fn validate(
		&self,
		form_data: &FormData,
		form_element: Option<ElementRef>,
	) -> Result<Vec<ValidationResult>, ValidatorError> {
		Ok(self(form_data, form_element))
	}
}

/// Cross-field validator backed by an async closure.
pub struct AsyncCrossField<F> {
	f: F,
}

/// Wrap an async closure as a [`CrossFieldValidator`].
///
/// # Examples
///
/// ```
/// use formwarden_core::validator::cross_field_async;
/// use formwarden_core::{CrossFieldValidator, FormData, ValidationResult};
///
/// let check = cross_field_async(|data, _form| async move {
///     if data.value_of("start") == data.value_of("end") {
///         Ok(vec![ValidationResult::invalid("Range is empty.")])
///     } else {
///         Ok(vec![])
///     }
/// });
/// # let _ = check;
/// ```
pub fn cross_field_async<F, Fut>(f: F) -> AsyncCrossField<F>
where
	F: Fn(Rc<FormData>, Option<ElementRef>) -> Fut,
	Fut: Future<Output = Result<Vec<ValidationResult>, ValidatorError>> + 'static,
{
	AsyncCrossField { f }
}

#[async_trait(?Send)]
impl<F, Fut> CrossFieldValidator for AsyncCrossField<F>
where
	F: Fn(Rc<FormData>, Option<ElementRef>) -> Fut,
	Fut: Future<Output = Result<Vec<ValidationResult>, ValidatorError>> + 'static,
{
	async fn validate(
		&self,
		form_data: &FormData,
		form_element: Option<ElementRef>,
	) -> Result<Vec<ValidationResult>, ValidatorError> {
		(self.f)(Rc::new(form_data.clone()), form_element).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[tokio::test]
	async fn test_closure_is_a_cross_field_validator() {
		// Arrange
		let check = |data: &FormData, _form: Option<ElementRef>| {
			if data.value_of("password") == data.value_of("confirm") {
				vec![ValidationResult::Valid]
			} else {
				vec![ValidationResult::invalid("Passwords differ.")]
			}
		};
		let data: FormData = [("password", "a"), ("confirm", "b")].into_iter().collect();

		// Act
		let results = check.validate(&data, None).await.unwrap();

		// Assert
		assert_eq!(results, vec![ValidationResult::invalid("Passwords differ.")]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_async_cross_field_propagates_errors() {
		// Arrange
		let check = cross_field_async(|_data, _form| async move {
			Err::<Vec<ValidationResult>, _>(ValidatorError::new("lookup failed"))
		});

		// Act
		let result = check.validate(&FormData::new(), None).await;

		// Assert
		assert_eq!(result, Err(ValidatorError::new("lookup failed")));
	}

	#[rstest]
	fn test_within_reads_value_from_snapshot() {
		let data: FormData = [("age", 30.0)].into_iter().collect();
		let ctx = ValidationContext::within("age", Rc::new(data));
		assert_eq!(ctx.value, FieldValue::Number(30.0));
	}
}
