//! Whole-form validation with slow and failing validators

use formwarden_core::validators::{custom_async, try_custom};
use formwarden_core::{ElementRef, FormData, ValidationContext, ValidationResult, ValidatorError};
use formwarden_engine::{FieldConfig, FormConfig, FormValidator, FormValidatorError, ValidatorOptions};
use formwarden_test::fixtures::{LoginPage, login_page};
use rstest::rstest;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use tokio::time::Instant;

const LOOKUP_MS: u64 = 100;

fn slow_lookup() -> FieldConfig {
	FieldConfig::new("#password").validator(custom_async(|_ctx: ValidationContext| async {
		tokio::time::sleep(Duration::from_millis(LOOKUP_MS)).await;
		Ok::<_, ValidatorError>(ValidationResult::Valid)
	}))
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_fields_validate_concurrently(login_page: LoginPage) {
	// Arrange
	let validator = FormValidator::new(
		Rc::new(login_page.document.clone()),
		FormConfig::new("#login-form"),
		[
			(
				"email",
				FieldConfig::new("#email").validator(custom_async(|_ctx: ValidationContext| async {
					tokio::time::sleep(Duration::from_millis(LOOKUP_MS)).await;
					Ok::<_, ValidatorError>(ValidationResult::Valid)
				})),
			),
			("password", slow_lookup()),
		],
		ValidatorOptions::new(),
	)
	.unwrap();
	let start = Instant::now();

	// Act
	let valid = validator.validate_form().await;

	// Assert
	assert_eq!(valid, Ok(true));
	assert_eq!(start.elapsed(), Duration::from_millis(LOOKUP_MS));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_failing_field_skips_cross_field_check(login_page: LoginPage) {
	// Arrange
	let cross_calls = Rc::new(Cell::new(0));
	let counter = Rc::clone(&cross_calls);
	let validator = FormValidator::new(
		Rc::new(login_page.document.clone()),
		FormConfig::new("#login-form").cross_field(
			move |_data: &FormData, _form: Option<ElementRef>| {
				counter.set(counter.get() + 1);
				vec![ValidationResult::Valid]
			},
		),
		[
			(
				"email",
				FieldConfig::new("#email")
					.validator(try_custom(|_| Err(ValidatorError::new("directory unreachable")))),
			),
			("password", slow_lookup()),
		],
		ValidatorOptions::new(),
	)
	.unwrap();
	let start = Instant::now();

	// Act
	let result = validator.validate_form().await;

	// Assert
	assert_eq!(
		result,
		Err(FormValidatorError::Validator {
			field: "email".to_string(),
			message: "directory unreachable".to_string(),
		})
	);
	assert_eq!(start.elapsed(), Duration::from_millis(LOOKUP_MS));
	assert_eq!(cross_calls.get(), 0);
	let password = validator.field_state("password").unwrap();
	assert!(password.touched);
	assert!(password.valid);
	assert!(!password.validating);
	assert!(password.messages.is_empty());
}
