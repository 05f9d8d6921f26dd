//! Core building blocks for the formwarden validation engine
//!
//! This crate holds everything that does not depend on the orchestration
//! machinery:
//! - Field values and form snapshots ([`FieldValue`], [`FormData`])
//! - Validation results and the [`Validator`] / [`CrossFieldValidator`] traits
//! - The built-in validator library ([`validators`])
//! - The [`ElementBinding`] capability through which the engine talks to
//!   its hosting environment
//!
//! ## Security Note
//!
//! Client-side validation is for UX enhancement only and MUST NOT be relied
//! upon for security. Server-side validation is always required.

pub mod binding;
pub mod result;
pub mod validator;
pub mod validators;
pub mod value;

pub use binding::{
	ElementBinding, ElementRef, EventKind, EventOutcome, Listener, ListenerId, Trigger,
};
pub use result::ValidationResult;
pub use validator::{
	CrossFieldValidator, SharedCrossFieldValidator, SharedValidator, ValidationContext,
	Validator, ValidatorError,
};
pub use value::{FieldValue, FormData, ValueKind};
