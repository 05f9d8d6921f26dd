//! Validator settings
//!
//! Defaults shared by every form on a page. Settings can be built in code
//! or loaded from TOML and are applied to a form with
//! [`FormConfig::with_settings`](crate::FormConfig::with_settings).
//!
//! ```toml
//! default_debounce_ms = 300
//! scroll_to_first_error = true
//!
//! [classes]
//! invalid = "is-invalid"
//! valid = "is-valid"
//! ```

use crate::error::{FormValidatorError, FormValidatorResult};
use serde::{Deserialize, Serialize};

/// CSS class names the engine toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassNames {
	/// Added to a field element with messages
	pub invalid: String,
	/// Added to a touched field element without messages
	pub valid: String,
	/// Added by [`FormValidator::touch`](crate::FormValidator::touch)
	pub touched: String,
	/// Added to an empty message container
	pub hidden: String,
}

impl Default for ClassNames {
	fn default() -> Self {
		Self {
			invalid: "fv-invalid".to_string(),
			valid: "fv-valid".to_string(),
			touched: "fv-touched".to_string(),
			hidden: "hidden".to_string(),
		}
	}
}

impl ClassNames {
	fn validate(&self) -> FormValidatorResult<()> {
		for (role, class) in [
			("invalid", &self.invalid),
			("valid", &self.valid),
			("touched", &self.touched),
			("hidden", &self.hidden),
		] {
			if class.is_empty() || class.contains(char::is_whitespace) {
				return Err(FormValidatorError::Settings(format!(
					"class name for `{role}` must be a single non-empty token, got {class:?}"
				)));
			}
		}
		Ok(())
	}
}

/// Defaults applied to a form and its fields.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorSettings {
	pub classes: ClassNames,

	/// Debounce for fields that do not set their own (0 disables)
	pub default_debounce_ms: u64,

	/// Maintain `aria-invalid` / `aria-describedby` unless a field opts out
	pub accessibility: bool,

	pub validate_on_submit: bool,

	pub prevent_submit_if_invalid: bool,

	pub scroll_to_first_error: bool,
}

impl Default for ValidatorSettings {
	fn default() -> Self {
		Self {
			classes: ClassNames::default(),
			default_debounce_ms: 0,
			accessibility: true,
			validate_on_submit: true,
			prevent_submit_if_invalid: true,
			scroll_to_first_error: false,
		}
	}
}

impl ValidatorSettings {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse settings from TOML. Missing keys keep their defaults.
	///
	/// # Examples
	///
	/// ```
	/// use formwarden_engine::ValidatorSettings;
	///
	/// let settings = ValidatorSettings::from_toml_str(
	///     r#"
	///     default_debounce_ms = 250
	///     [classes]
	///     invalid = "is-invalid"
	///     "#,
	/// )
	/// .unwrap();
	///
	/// assert_eq!(settings.default_debounce_ms, 250);
	/// assert_eq!(settings.classes.invalid, "is-invalid");
	/// assert_eq!(settings.classes.valid, "fv-valid");
	/// ```
	pub fn from_toml_str(source: &str) -> FormValidatorResult<Self> {
		let settings: Self = toml::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Reject class names the engine could not toggle.
	pub fn validate(&self) -> FormValidatorResult<()> {
		self.classes.validate()
	}

	pub fn with_classes(mut self, classes: ClassNames) -> Self {
		self.classes = classes;
		self
	}

	pub fn with_default_debounce_ms(mut self, ms: u64) -> Self {
		self.default_debounce_ms = ms;
		self
	}

	pub fn with_accessibility(mut self, enabled: bool) -> Self {
		self.accessibility = enabled;
		self
	}

	pub fn with_scroll_to_first_error(mut self, enabled: bool) -> Self {
		self.scroll_to_first_error = enabled;
		self
	}
}
