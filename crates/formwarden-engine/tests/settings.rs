//! Settings from TOML and logging of misconfiguration

use formwarden_core::validators::{required, try_custom};
use formwarden_core::{EventKind, Trigger, ValidatorError};
use formwarden_engine::{
	FieldConfig, FormConfig, FormValidator, FormValidatorError, ValidatorOptions, ValidatorSettings,
};
use formwarden_test::fixtures::{LoginPage, login_page};
use formwarden_test::{LogCapture, init_test_logging};
use rstest::rstest;
use std::rc::Rc;
use std::time::Duration;

const SETTINGS: &str = r#"
default_debounce_ms = 200

[classes]
invalid = "is-invalid"
valid = "is-valid"
touched = "was-touched"
hidden = "d-none"
"#;

fn email_validator(page: &LoginPage, form: FormConfig) -> FormValidator {
	FormValidator::new(
		Rc::new(page.document.clone()),
		form,
		[(
			"email",
			FieldConfig::new("#email")
				.validator(required())
				.validate_on([Trigger::Blur])
				.message_target("#email-errors"),
		)],
		ValidatorOptions::new(),
	)
	.unwrap()
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_toml_settings_drive_classes_and_debounce(login_page: LoginPage) {
	// Arrange
	init_test_logging();
	let settings = ValidatorSettings::from_toml_str(SETTINGS).unwrap();
	let validator = email_validator(&login_page, FormConfig::new("#login-form").with_settings(settings));
	let doc = &login_page.document;
	let start = tokio::time::Instant::now();

	// Act
	let outcome = doc.dispatch(login_page.email, EventKind::Blur).await;

	// Assert
	assert!(start.elapsed() >= Duration::from_millis(200));
	assert!(!outcome.prevent_default);
	assert!(!validator.field_state("email").unwrap().valid);
	assert!(doc.has_class(login_page.email, "is-invalid"));
	assert!(doc.has_class(login_page.email, "was-touched"));
	assert!(!doc.has_class(login_page.email, "fv-invalid"));
	assert!(!doc.has_class(login_page.email_errors, "d-none"));
	assert!(doc.inner_html(login_page.email_errors).contains("<li>"));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_field_debounce_overrides_default(login_page: LoginPage) {
	init_test_logging();
	let settings = ValidatorSettings::from_toml_str(SETTINGS).unwrap();
	let validator = FormValidator::new(
		Rc::new(login_page.document.clone()),
		FormConfig::new("#login-form").with_settings(settings),
		[("email", FieldConfig::new("#email").validator(required()).debounce_ms(0))],
		ValidatorOptions::new(),
	)
	.unwrap();
	let start = tokio::time::Instant::now();

	validator.validate_field("email").await.unwrap();

	assert_eq!(start.elapsed(), Duration::ZERO);
}

#[rstest]
fn test_invalid_settings_are_rejected(login_page: LoginPage) {
	let mut settings = ValidatorSettings::default();
	settings.classes.touched = String::new();

	let result = FormValidator::new(
		Rc::new(login_page.document.clone()),
		FormConfig::new("#login-form").with_settings(settings),
		[("email", FieldConfig::new("#email"))],
		ValidatorOptions::new(),
	);

	assert!(matches!(result, Err(FormValidatorError::Settings(_))));
}

#[rstest]
fn test_unresolved_selectors_are_logged(login_page: LoginPage) {
	// Arrange
	let (capture, _guard) = LogCapture::install();

	// Act
	let validator = FormValidator::new(
		Rc::new(login_page.document.clone()),
		FormConfig::new("#signup-form").error_summary("#signup-errors"),
		[("username", FieldConfig::new("#username"))],
		ValidatorOptions::new(),
	)
	.unwrap();

	// Assert
	assert_eq!(validator.form_element(), None);
	assert_eq!(validator.fields().get("username"), Some(&None));
	assert!(capture.contains("WARN", "form element not found"));
	assert!(capture.contains("WARN", "message target not found"));
	assert!(capture.contains("WARN", "field element not found"));
}

#[rstest]
#[tokio::test]
async fn test_listener_errors_are_logged_and_block_submit(login_page: LoginPage) {
	// Arrange
	let (capture, _guard) = LogCapture::install();
	let _validator = FormValidator::new(
		Rc::new(login_page.document.clone()),
		FormConfig::new("#login-form"),
		[(
			"email",
			FieldConfig::new("#email")
				.validator(try_custom(|_| Err(ValidatorError::new("directory unreachable"))))
				.validate_on([Trigger::Blur]),
		)],
		ValidatorOptions::new(),
	)
	.unwrap();
	let doc = &login_page.document;

	// Act
	let blur = doc.dispatch(login_page.email, EventKind::Blur).await;
	let submit = doc.dispatch(login_page.form, EventKind::Submit).await;

	// Assert
	assert!(!blur.prevent_default);
	assert!(submit.prevent_default);
	assert!(capture.contains("ERROR", "field validation failed"));
	assert!(capture.contains("ERROR", "form validation failed on submit"));
	assert!(capture.contains("ERROR", "directory unreachable"));
}
