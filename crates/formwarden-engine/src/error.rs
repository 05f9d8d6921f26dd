//! Engine errors
//!
//! Failed validations are not errors: they end up as messages in the field
//! state. The variants here describe situations where the engine could not
//! produce a verdict at all.

use formwarden_core::ValidatorError;

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormValidatorError {
	/// The name does not belong to any configured field
	#[error("Unknown field: {0}")]
	UnknownField(String),

	/// The same field name was configured twice
	#[error("Duplicate field: {0}")]
	DuplicateField(String),

	/// A field validator failed to run
	#[error("Validator error in {field}: {message}")]
	Validator { field: String, message: String },

	/// The cross-field validator failed to run
	#[error("Cross-field validator error: {message}")]
	CrossField { message: String },

	/// Settings could not be loaded
	#[error("Settings error: {0}")]
	Settings(String),
}

impl FormValidatorError {
	pub(crate) fn validator(field: &str, error: ValidatorError) -> Self {
		Self::Validator {
			field: field.to_string(),
			message: error.message().to_string(),
		}
	}

	pub(crate) fn cross_field(error: ValidatorError) -> Self {
		Self::CrossField {
			message: error.message().to_string(),
		}
	}
}

impl From<toml::de::Error> for FormValidatorError {
	fn from(error: toml::de::Error) -> Self {
		Self::Settings(error.to_string())
	}
}

pub type FormValidatorResult<T> = Result<T, FormValidatorError>;
