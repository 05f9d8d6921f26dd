//! Validation results

/// Outcome of a single validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
	Valid,
	Invalid {
		message: String,
		code: Option<String>,
	},
}

impl ValidationResult {
	/// Failure carrying `message`.
	///
	/// # Examples
	///
	/// ```
	/// use formwarden_core::ValidationResult;
	///
	/// let result = ValidationResult::invalid("Too short.");
	/// assert!(!result.is_valid());
	/// assert_eq!(result.message(), Some("Too short."));
	/// ```
	pub fn invalid(message: impl Into<String>) -> Self {
		Self::Invalid {
			message: message.into(),
			code: None,
		}
	}

	/// Failure carrying `message` and a machine-readable `code`.
	pub fn invalid_with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
		Self::Invalid {
			message: message.into(),
			code: Some(code.into()),
		}
	}

	pub fn is_valid(&self) -> bool {
		matches!(self, Self::Valid)
	}

	pub fn message(&self) -> Option<&str> {
		match self {
			Self::Valid => None,
			Self::Invalid { message, .. } => Some(message),
		}
	}

	pub fn code(&self) -> Option<&str> {
		match self {
			Self::Invalid {
				code: Some(code), ..
			} => Some(code),
			_ => None,
		}
	}

	/// Consume the result, yielding the failure message if any.
	pub fn into_message(self) -> Option<String> {
		match self {
			Self::Valid => None,
			Self::Invalid { message, .. } => Some(message),
		}
	}
}

impl From<Result<(), String>> for ValidationResult {
	fn from(result: Result<(), String>) -> Self {
		match result {
			Ok(()) => Self::Valid,
			Err(message) => Self::invalid(message),
		}
	}
}
