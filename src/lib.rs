//! # Formwarden
//!
//! Interactive form validation for element-based user interfaces.
//!
//! Formwarden binds validators to the fields of a form, runs them as the user
//! types or leaves a field, and keeps the page in sync with the outcome:
//! validity classes, message containers, `aria-*` attributes and submit
//! gating. The hosting environment is reached only through the
//! [`ElementBinding`] trait, so the same engine drives a browser DOM, a
//! terminal UI or the in-memory document used in tests.
//!
//! ## Crates
//!
//! - `formwarden-core`: values, validators and the element binding
//! - `formwarden-engine`: the [`FormValidator`] orchestrator
//!
//! ## Quick Example
//!
//! ```rust
//! use formwarden::prelude::*;
//! use formwarden_test::MemoryDocument;
//! use std::rc::Rc;
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! let doc = MemoryDocument::new();
//! doc.append("form", &[("id", "login")]);
//! let email_input = doc.append("input", &[("id", "email"), ("type", "email")]);
//! doc.append("ul", &[("id", "email-errors"), ("class", "hidden")]);
//!
//! let form = FormValidator::new(
//!     Rc::new(doc.clone()),
//!     FormConfig::new("#login"),
//!     [(
//!         "email",
//!         FieldConfig::new("#email")
//!             .validator(required().with_message("Email is required."))
//!             .validator(email())
//!             .validate_on([Trigger::Input, Trigger::Blur])
//!             .message_target("#email-errors"),
//!     )],
//!     ValidatorOptions::new(),
//! )
//! .unwrap();
//!
//! assert!(!form.validate_form().await.unwrap());
//!
//! doc.set_value(email_input, "ada@example.com");
//! assert!(form.validate_form().await.unwrap());
//! # });
//! ```
//!
//! ## Security Note
//!
//! Client-side validation improves the user experience only. Submissions
//! must always be validated again on the server.

pub mod validators;

pub use formwarden_core::{
	CrossFieldValidator, ElementBinding, ElementRef, EventKind, EventOutcome, FieldValue, FormData,
	Listener, ListenerId, SharedCrossFieldValidator, SharedValidator, Trigger, ValidationContext,
	ValidationResult, Validator, ValidatorError, ValueKind,
};

pub use formwarden_engine::{
	ApiResponse, ClassNames, ElementSource, ErrorName, FieldConfig, FieldErrors, FieldState,
	FormConfig, FormValidator, FormValidatorError, FormValidatorResult, GENERIC_FAILURE_MESSAGE,
	MessageRenderArgs, MessageTarget, RenderCallback, ValidatorOptions, ValidatorSettings,
	ValueGetter, ValueSetter, below_field_message, to_summary,
};

pub use formwarden_engine::render;

/// Convenience re-exports for building validated forms.
pub mod prelude {
	pub use crate::validators::{
		PasswordPolicy, custom, custom_async, email, max_length, min_length, number_range,
		password_rules, pattern, required, same_as, try_custom,
	};
	pub use crate::{
		ApiResponse, ElementBinding, FieldConfig, FieldErrors, FieldValue, FormConfig, FormData,
		FormValidator, FormValidatorError, MessageTarget, Trigger, ValidationContext,
		ValidationResult, ValidatorError, ValidatorOptions, ValidatorSettings,
		below_field_message, to_summary,
	};

	// External
	pub use async_trait::async_trait;
}
