//! Built-in validators
//!
//! Each factory returns a [`Validator`]. Validators that only make sense for
//! one kind of value pass anything else through, so a field can combine
//! them freely with [`required`] deciding whether an empty value is allowed.
//!
//! # Examples
//!
//! ```
//! use formwarden_core::validators::{email, min_length, required};
//!
//! let rules = (
//!     required().with_message("Email is required."),
//!     email(),
//!     min_length(3),
//! );
//! # let _ = rules;
//! ```

use crate::result::ValidationResult;
use crate::validator::{ValidationContext, Validator, ValidatorError};
use crate::value::FieldValue;
use async_trait::async_trait;
use regex::Regex;
use std::collections::HashSet;
use std::future::Future;
use std::sync::LazyLock;

// RFC 5322-lite: dotted local part of word characters and a few symbols,
// one or more domain labels and an alphabetic TLD of at least two letters.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^(?:[a-zA-Z0-9_'^&\-]+(?:\.[a-zA-Z0-9_'^&\-]+)*)@(?:[a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}$")
		.expect("EMAIL_REGEX: invalid regex pattern")
});

static UPPER_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"[A-Z]").expect("UPPER_REGEX: invalid regex pattern"));
static LOWER_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"[a-z]").expect("LOWER_REGEX: invalid regex pattern"));
static DIGIT_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"[0-9]").expect("DIGIT_REGEX: invalid regex pattern"));
static SPECIAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"[^A-Za-z0-9\s]").expect("SPECIAL_REGEX: invalid regex pattern")
});

type Outcome = Result<ValidationResult, ValidatorError>;

fn verdict(ok: bool, message: &str) -> Outcome {
	Ok(if ok {
		ValidationResult::Valid
	} else {
		ValidationResult::invalid(message)
	})
}

// ============================================================================
// required
// ============================================================================

/// Rejects missing values, whitespace-only strings and empty lists.
#[derive(Debug, Clone)]
pub struct Required {
	message: String,
}

/// Create a [`Required`] validator with the default message.
pub fn required() -> Required {
	Required {
		message: "This field is required.".to_string(),
	}
}

impl Required {
	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = message.into();
		self
	}

	/// Synchronous check used by the [`Validator`] impl.
	///
	/// # Examples
	///
	/// ```
	/// use formwarden_core::FieldValue;
	/// use formwarden_core::validators::required;
	///
	/// let rule = required();
	/// assert!(!rule.check(&FieldValue::Missing).is_valid());
	/// assert!(!rule.check(&FieldValue::from("   ")).is_valid());
	/// assert!(rule.check(&FieldValue::Bool(false)).is_valid());
	/// ```
	pub fn check(&self, value: &FieldValue) -> ValidationResult {
		let empty = match value {
			FieldValue::Missing => true,
			FieldValue::Text(s) => s.trim().is_empty(),
			FieldValue::List(items) => items.is_empty(),
			FieldValue::Bool(_) | FieldValue::Number(_) => false,
		};
		if empty {
			ValidationResult::invalid(&self.message)
		} else {
			ValidationResult::Valid
		}
	}
}

#[async_trait(?Send)]
impl Validator for Required {
	async fn validate(&self, ctx: &ValidationContext) -> Outcome {
		Ok(self.check(&ctx.value))
	}
}

// ============================================================================
// pattern
// ============================================================================

/// Passes text values the regex matches anywhere; non-text passes.
#[derive(Debug, Clone)]
pub struct Pattern {
	regex: Regex,
	message: String,
}

pub fn pattern(regex: Regex) -> Pattern {
	Pattern {
		regex,
		message: "Invalid format.".to_string(),
	}
}

impl Pattern {
	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = message.into();
		self
	}
}

#[async_trait(?Send)]
impl Validator for Pattern {
	async fn validate(&self, ctx: &ValidationContext) -> Outcome {
		match ctx.value.as_str() {
			Some(text) => verdict(self.regex.is_match(text), &self.message),
			None => Ok(ValidationResult::Valid),
		}
	}
}

// ============================================================================
// email
// ============================================================================

/// Checks non-blank text against an RFC 5322-lite pattern.
///
/// Blank values pass so that [`required`] alone decides about emptiness.
#[derive(Debug, Clone)]
pub struct Email {
	message: String,
}

pub fn email() -> Email {
	Email {
		message: "Invalid email address.".to_string(),
	}
}

impl Email {
	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = message.into();
		self
	}
}

#[async_trait(?Send)]
impl Validator for Email {
	async fn validate(&self, ctx: &ValidationContext) -> Outcome {
		match ctx.value.as_str().map(str::trim) {
			Some(text) if !text.is_empty() => verdict(EMAIL_REGEX.is_match(text), &self.message),
			_ => Ok(ValidationResult::Valid),
		}
	}
}

// ============================================================================
// min_length / max_length
// ============================================================================

/// Text must have at least `min` characters; non-text passes.
#[derive(Debug, Clone)]
pub struct MinLength {
	min: usize,
	message: String,
}

pub fn min_length(min: usize) -> MinLength {
	MinLength {
		min,
		message: format!("Must be at least {min} characters."),
	}
}

impl MinLength {
	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = message.into();
		self
	}
}

#[async_trait(?Send)]
impl Validator for MinLength {
	async fn validate(&self, ctx: &ValidationContext) -> Outcome {
		match ctx.value.as_str() {
			Some(text) => verdict(text.chars().count() >= self.min, &self.message),
			None => Ok(ValidationResult::Valid),
		}
	}
}

/// Text must have at most `max` characters; non-text passes.
#[derive(Debug, Clone)]
pub struct MaxLength {
	max: usize,
	message: String,
}

pub fn max_length(max: usize) -> MaxLength {
	MaxLength {
		max,
		message: format!("Must be at most {max} characters."),
	}
}

impl MaxLength {
	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = message.into();
		self
	}
}

#[async_trait(?Send)]
impl Validator for MaxLength {
	async fn validate(&self, ctx: &ValidationContext) -> Outcome {
		match ctx.value.as_str() {
			Some(text) => verdict(text.chars().count() <= self.max, &self.message),
			None => Ok(ValidationResult::Valid),
		}
	}
}

// ============================================================================
// same_as
// ============================================================================

/// Value must strictly equal another field's value in the same snapshot.
#[derive(Debug, Clone)]
pub struct SameAs {
	other: String,
	message: String,
}

pub fn same_as(other: impl Into<String>) -> SameAs {
	SameAs {
		other: other.into(),
		message: "Values do not match.".to_string(),
	}
}

impl SameAs {
	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = message.into();
		self
	}
}

#[async_trait(?Send)]
impl Validator for SameAs {
	async fn validate(&self, ctx: &ValidationContext) -> Outcome {
		verdict(
			&ctx.value == ctx.form_data.value_of(&self.other),
			&self.message,
		)
	}
}

// ============================================================================
// number_range
// ============================================================================

/// Numbers must fall within the optional bounds; missing values, `NaN` and
/// non-numbers pass.
#[derive(Debug, Clone)]
pub struct NumberRange {
	min: Option<f64>,
	max: Option<f64>,
	message: Option<String>,
}

pub fn number_range(min: Option<f64>, max: Option<f64>) -> NumberRange {
	NumberRange {
		min,
		max,
		message: None,
	}
}

impl NumberRange {
	/// Use one message for both bounds instead of the per-bound defaults.
	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}
}

#[async_trait(?Send)]
impl Validator for NumberRange {
	async fn validate(&self, ctx: &ValidationContext) -> Outcome {
		let Some(value) = ctx.value.as_number().filter(|n| !n.is_nan()) else {
			return Ok(ValidationResult::Valid);
		};
		if let Some(min) = self.min
			&& value < min
		{
			let message = self.message.clone().unwrap_or_else(|| format!("Must be ≥ {min}."));
			return Ok(ValidationResult::invalid(message));
		}
		if let Some(max) = self.max
			&& value > max
		{
			let message = self.message.clone().unwrap_or_else(|| format!("Must be ≤ {max}."));
			return Ok(ValidationResult::invalid(message));
		}
		Ok(ValidationResult::Valid)
	}
}

// ============================================================================
// password_rules
// ============================================================================

/// Character classes a password has to contain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasswordPolicy {
	pub upper: bool,
	pub lower: bool,
	pub digit: bool,
	pub special: bool,
	/// Minimum number of distinct characters
	pub min_unique: Option<usize>,
}

impl PasswordPolicy {
	/// Upper, lower, digit and special all required.
	pub fn strict() -> Self {
		Self {
			upper: true,
			lower: true,
			digit: true,
			special: true,
			min_unique: None,
		}
	}
}

/// Reports every unmet [`PasswordPolicy`] requirement in one message.
///
/// Empty and non-text values pass; pair with [`required`] and
/// [`min_length`] for those.
#[derive(Debug, Clone)]
pub struct PasswordRules {
	policy: PasswordPolicy,
}

pub fn password_rules(policy: PasswordPolicy) -> PasswordRules {
	PasswordRules { policy }
}

impl PasswordRules {
	/// Requirements `password` does not meet, in fixed order.
	///
	/// # Examples
	///
	/// ```
	/// use formwarden_core::validators::{PasswordPolicy, password_rules};
	///
	/// let rules = password_rules(PasswordPolicy::strict());
	/// assert_eq!(
	///     rules.missing("alllowercase"),
	///     vec!["an uppercase letter", "a digit", "a special character"]
	/// );
	/// ```
	pub fn missing(&self, password: &str) -> Vec<String> {
		let policy = &self.policy;
		let mut missing = Vec::new();
		if policy.upper && !UPPER_REGEX.is_match(password) {
			missing.push("an uppercase letter".to_string());
		}
		if policy.lower && !LOWER_REGEX.is_match(password) {
			missing.push("a lowercase letter".to_string());
		}
		if policy.digit && !DIGIT_REGEX.is_match(password) {
			missing.push("a digit".to_string());
		}
		if policy.special && !SPECIAL_REGEX.is_match(password) {
			missing.push("a special character".to_string());
		}
		if let Some(min_unique) = policy.min_unique {
			let unique = password.chars().collect::<HashSet<_>>().len();
			if unique < min_unique {
				missing.push(format!("{min_unique} unique characters"));
			}
		}
		missing
	}
}

#[async_trait(?Send)]
impl Validator for PasswordRules {
	async fn validate(&self, ctx: &ValidationContext) -> Outcome {
		let Some(password) = ctx.value.as_str().filter(|s| !s.is_empty()) else {
			return Ok(ValidationResult::Valid);
		};
		let missing = self.missing(password);
		if missing.is_empty() {
			Ok(ValidationResult::Valid)
		} else {
			Ok(ValidationResult::invalid(format!(
				"Password must include: {}.",
				missing.join(", ")
			)))
		}
	}
}

// ============================================================================
// custom
// ============================================================================

/// Synchronous closure validator.
pub struct Custom<F> {
	f: F,
}

/// Wrap a synchronous closure as a validator.
///
/// # Examples
///
/// ```
/// use formwarden_core::ValidationResult;
/// use formwarden_core::validators::custom;
///
/// let no_admin = custom(|ctx| {
///     if ctx.value.as_str() == Some("admin") {
///         ValidationResult::invalid("That username is reserved.")
///     } else {
///         ValidationResult::Valid
///     }
/// });
/// # let _ = no_admin;
/// ```
pub fn custom<F>(f: F) -> Custom<F>
where
	F: Fn(&ValidationContext) -> ValidationResult,
{
	Custom { f }
}

#[async_trait(?Send)]
impl<F> Validator for Custom<F>
where
	F: Fn(&ValidationContext) -> ValidationResult,
{
	async fn validate(&self, ctx: &ValidationContext) -> Outcome {
		Ok((self.f)(ctx))
	}
}

/// Synchronous closure validator that may fail.
pub struct TryCustom<F> {
	f: F,
}

pub fn try_custom<F>(f: F) -> TryCustom<F>
where
	F: Fn(&ValidationContext) -> Outcome,
{
	TryCustom { f }
}

#[async_trait(?Send)]
impl<F> Validator for TryCustom<F>
where
	F: Fn(&ValidationContext) -> Outcome,
{
	async fn validate(&self, ctx: &ValidationContext) -> Outcome {
		(self.f)(ctx)
	}
}

/// Asynchronous closure validator. The closure receives an owned context so
/// the returned future can outlive the call.
pub struct CustomAsync<F> {
	f: F,
}

pub fn custom_async<F, Fut>(f: F) -> CustomAsync<F>
where
	F: Fn(ValidationContext) -> Fut,
	Fut: Future<Output = Outcome> + 'static,
{
	CustomAsync { f }
}

#[async_trait(?Send)]
impl<F, Fut> Validator for CustomAsync<F>
where
	F: Fn(ValidationContext) -> Fut,
	Fut: Future<Output = Outcome> + 'static,
{
	async fn validate(&self, ctx: &ValidationContext) -> Outcome {
		(self.f)(ctx.clone()).await
	}
}
