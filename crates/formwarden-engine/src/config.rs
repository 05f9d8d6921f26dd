//! Form and field configuration
//!
//! Both configs are plain builders. Nothing is resolved against the
//! document until [`FormValidator::new`](crate::FormValidator::new) runs.

use crate::settings::{ClassNames, ValidatorSettings};
use formwarden_core::{
	CrossFieldValidator, ElementBinding, ElementRef, FieldValue, SharedCrossFieldValidator,
	SharedValidator, Trigger, Validator, ValueKind,
};
use std::fmt;
use std::rc::Rc;

/// Where to find an element: a CSS selector or a reference the host
/// already handed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementSource {
	Selector(String),
	Element(ElementRef),
}

impl From<&str> for ElementSource {
	fn from(selector: &str) -> Self {
		Self::Selector(selector.to_string())
	}
}

impl From<String> for ElementSource {
	fn from(selector: String) -> Self {
		Self::Selector(selector)
	}
}

impl From<ElementRef> for ElementSource {
	fn from(element: ElementRef) -> Self {
		Self::Element(element)
	}
}

/// Arguments handed to a render callback.
///
/// For the summary, `name` and `field_element` are `None`.
pub struct MessageRenderArgs<'a> {
	pub name: Option<&'a str>,
	pub messages: &'a [String],
	pub field_element: Option<ElementRef>,
	pub form_element: Option<ElementRef>,
	/// Class that hides an empty container
	pub hidden_class: &'a str,
	pub binding: &'a dyn ElementBinding,
}

pub type RenderCallback = Rc<dyn Fn(&MessageRenderArgs<'_>)>;

/// Where a field's messages (or the summary) are rendered.
#[derive(Clone)]
pub enum MessageTarget {
	Element(ElementRef),
	Selector(String),
	/// Full control over rendering
	Callback(RenderCallback),
}

impl MessageTarget {
	pub fn callback(f: impl Fn(&MessageRenderArgs<'_>) + 'static) -> Self {
		Self::Callback(Rc::new(f))
	}
}

impl fmt::Debug for MessageTarget {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Element(element) => f.debug_tuple("Element").field(element).finish(),
			Self::Selector(selector) => f.debug_tuple("Selector").field(selector).finish(),
			Self::Callback(_) => f.write_str("Callback(..)"),
		}
	}
}

impl From<&str> for MessageTarget {
	fn from(selector: &str) -> Self {
		Self::Selector(selector.to_string())
	}
}

impl From<String> for MessageTarget {
	fn from(selector: String) -> Self {
		Self::Selector(selector)
	}
}

impl From<ElementRef> for MessageTarget {
	fn from(element: ElementRef) -> Self {
		Self::Element(element)
	}
}

pub type ValueGetter = Rc<dyn Fn(&dyn ElementBinding, Option<ElementRef>) -> FieldValue>;
pub type ValueSetter = Rc<dyn Fn(&dyn ElementBinding, Option<ElementRef>, &FieldValue)>;

/// Configuration of one field.
///
/// # Examples
///
/// ```
/// use formwarden_core::Trigger;
/// use formwarden_core::validators::{email, required};
/// use formwarden_engine::FieldConfig;
///
/// let field = FieldConfig::new(r#"input[name="email"]"#)
///     .validator(required().with_message("Email is required."))
///     .validator(email())
///     .validate_on([Trigger::Input, Trigger::Blur])
///     .debounce_ms(500)
///     .message_target("#email-errors");
/// # let _ = field;
/// ```
#[derive(Clone)]
pub struct FieldConfig {
	pub(crate) source: ElementSource,
	pub(crate) validators: Vec<SharedValidator>,
	pub(crate) triggers: Vec<Trigger>,
	pub(crate) debounce_ms: Option<u64>,
	pub(crate) kind: ValueKind,
	pub(crate) getter: Option<ValueGetter>,
	pub(crate) setter: Option<ValueSetter>,
	pub(crate) message_target: Option<MessageTarget>,
	pub(crate) accessibility: Option<bool>,
}

impl FieldConfig {
	pub fn new(source: impl Into<ElementSource>) -> Self {
		Self {
			source: source.into(),
			validators: Vec::new(),
			triggers: Vec::new(),
			debounce_ms: None,
			kind: ValueKind::default(),
			getter: None,
			setter: None,
			message_target: None,
			accessibility: None,
		}
	}

	/// Append a validator. Validators run in the order they were added.
	pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
		self.validators.push(Rc::new(validator));
		self
	}

	pub fn shared_validator(mut self, validator: SharedValidator) -> Self {
		self.validators.push(validator);
		self
	}

	/// Events that validate the field. Duplicates are ignored.
	pub fn validate_on(mut self, triggers: impl IntoIterator<Item = Trigger>) -> Self {
		for trigger in triggers {
			if !self.triggers.contains(&trigger) {
				self.triggers.push(trigger);
			}
		}
		self
	}

	/// Delay validation until the field has been quiet for `ms`.
	/// Overrides [`ValidatorSettings::default_debounce_ms`].
	pub fn debounce_ms(mut self, ms: u64) -> Self {
		self.debounce_ms = Some(ms);
		self
	}

	pub fn kind(mut self, kind: ValueKind) -> Self {
		self.kind = kind;
		self
	}

	/// Replace the default value read.
	pub fn value_getter(
		mut self,
		getter: impl Fn(&dyn ElementBinding, Option<ElementRef>) -> FieldValue + 'static,
	) -> Self {
		self.getter = Some(Rc::new(getter));
		self
	}

	/// Replace the default value write.
	pub fn value_setter(
		mut self,
		setter: impl Fn(&dyn ElementBinding, Option<ElementRef>, &FieldValue) + 'static,
	) -> Self {
		self.setter = Some(Rc::new(setter));
		self
	}

	pub fn message_target(mut self, target: impl Into<MessageTarget>) -> Self {
		self.message_target = Some(target.into());
		self
	}

	/// Opt this field in or out of accessibility attributes.
	pub fn accessibility(mut self, enabled: bool) -> Self {
		self.accessibility = Some(enabled);
		self
	}

	pub fn triggers(&self) -> &[Trigger] {
		&self.triggers
	}

	pub fn value_kind(&self) -> ValueKind {
		self.kind
	}
}

impl fmt::Debug for FieldConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FieldConfig")
			.field("source", &self.source)
			.field("validators", &self.validators.len())
			.field("triggers", &self.triggers)
			.field("debounce_ms", &self.debounce_ms)
			.field("kind", &self.kind)
			.field("message_target", &self.message_target)
			.field("accessibility", &self.accessibility)
			.finish_non_exhaustive()
	}
}

/// Configuration of the form as a whole.
///
/// # Examples
///
/// ```
/// use formwarden_engine::{FormConfig, ValidatorSettings};
///
/// let settings = ValidatorSettings::default().with_scroll_to_first_error(true);
/// let form = FormConfig::new("#login-form")
///     .with_settings(settings)
///     .error_summary("#form-errors");
///
/// assert!(form.settings().scroll_to_first_error);
/// ```
#[derive(Clone)]
pub struct FormConfig {
	pub(crate) form: Option<ElementSource>,
	pub(crate) summary: Option<MessageTarget>,
	pub(crate) settings: ValidatorSettings,
	pub(crate) cross_field: Option<SharedCrossFieldValidator>,
}

impl FormConfig {
	pub fn new(form: impl Into<ElementSource>) -> Self {
		Self {
			form: Some(form.into()),
			..Self::detached()
		}
	}

	/// A form without a form element: no submit listener is attached.
	pub fn detached() -> Self {
		Self {
			form: None,
			summary: None,
			settings: ValidatorSettings::default(),
			cross_field: None,
		}
	}

	/// Replace every setting at once. Call before the individual setters
	/// below, which edit the current settings.
	pub fn with_settings(mut self, settings: ValidatorSettings) -> Self {
		self.settings = settings;
		self
	}

	pub fn error_summary(mut self, target: impl Into<MessageTarget>) -> Self {
		self.summary = Some(target.into());
		self
	}

	pub fn validate_on_submit(mut self, enabled: bool) -> Self {
		self.settings.validate_on_submit = enabled;
		self
	}

	pub fn prevent_submit_if_invalid(mut self, enabled: bool) -> Self {
		self.settings.prevent_submit_if_invalid = enabled;
		self
	}

	pub fn scroll_to_first_error(mut self, enabled: bool) -> Self {
		self.settings.scroll_to_first_error = enabled;
		self
	}

	pub fn classes(mut self, classes: ClassNames) -> Self {
		self.settings.classes = classes;
		self
	}

	pub fn cross_field(mut self, validator: impl CrossFieldValidator + 'static) -> Self {
		self.cross_field = Some(Rc::new(validator));
		self
	}

	pub fn settings(&self) -> &ValidatorSettings {
		&self.settings
	}
}

impl fmt::Debug for FormConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FormConfig")
			.field("form", &self.form)
			.field("summary", &self.summary)
			.field("settings", &self.settings)
			.field("cross_field", &self.cross_field.is_some())
			.finish()
	}
}

/// Constructor options.
#[derive(Clone, Default)]
pub struct ValidatorOptions {
	pub(crate) on_validation_change: Option<Rc<dyn Fn(bool)>>,
}

impl ValidatorOptions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Called whenever the aggregate validity flips, and once for the first
	/// computation.
	pub fn on_validation_change(mut self, callback: impl Fn(bool) + 'static) -> Self {
		self.on_validation_change = Some(Rc::new(callback));
		self
	}
}
