//! Form orchestrator
//!
//! [`FormValidator`] owns the field registry and coordinates everything
//! else: it runs (possibly debounced) validations, stores their outcome,
//! renders messages and accessibility attributes, runs the cross-field
//! validator and reports aggregate validity changes.
//!
//! ## Concurrency
//!
//! Everything runs on one thread. State lives in `RefCell`s and no borrow
//! is held across an `.await`. Each field numbers its runs and only the
//! most recently started run may store its messages, so a slow run that
//! finishes after a newer one is discarded.

use crate::a11y;
use crate::codec;
use crate::config::{FieldConfig, FormConfig, MessageRenderArgs, ValidatorOptions};
use crate::error::{FormValidatorError, FormValidatorResult};
use crate::events;
use crate::registry::{FieldEntry, FieldRegistry, FieldState, resolve_element};
use crate::render::ResolvedTarget;
use crate::runner;
use crate::settings::ValidatorSettings;
use formwarden_core::{
	ElementBinding, ElementRef, FieldValue, FormData, ListenerId, SharedCrossFieldValidator,
	ValidationContext,
};
use futures::future::join_all;
use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// Messages per field name, as injected by [`FormValidator::set_errors`].
pub type FieldErrors = IndexMap<String, Vec<String>>;

pub(crate) struct FormInner {
	pub(crate) binding: Rc<dyn ElementBinding>,
	pub(crate) form_element: Option<ElementRef>,
	pub(crate) settings: ValidatorSettings,
	pub(crate) fields: FieldRegistry,
	summary: Option<ResolvedTarget>,
	cross_field: Option<SharedCrossFieldValidator>,
	form_messages: RefCell<Vec<String>>,
	last_notified: Cell<Option<bool>>,
	on_validation_change: Option<Rc<dyn Fn(bool)>>,
	pub(crate) listeners: RefCell<Vec<(ElementRef, ListenerId)>>,
}

impl FormInner {
	pub(crate) fn touch_field(&self, field: &FieldEntry) {
		field.mark_touched();
		if let Some(element) = field.element {
			self.binding
				.toggle_class(element, &self.settings.classes.touched, true);
		}
	}

	/// Validate a field that has already been marked touched.
	pub(crate) async fn validate_touched(&self, field: &FieldEntry) -> FormValidatorResult<bool> {
		if field.debounce_ms == 0 {
			return self.run_field(field).await;
		}
		let delay = Duration::from_millis(field.debounce_ms);
		match field.debounce.schedule(delay, || self.run_field(field)).await {
			Some(outcome) => outcome,
			None => Ok(field.state().valid),
		}
	}

	async fn run_field(&self, field: &FieldEntry) -> FormValidatorResult<bool> {
		let run = field.begin_run();
		let form_data = Rc::new(self.get_data());
		let ctx = ValidationContext {
			name: field.name.clone(),
			value: form_data.value_of(&field.name).clone(),
			form_data,
			field_element: field.element,
			form_element: self.form_element,
		};
		tracing::debug!(field = %field.name, run, "running validators");

		let messages = match runner::run_validators(&field.config.validators, &ctx).await {
			Ok(messages) => messages,
			Err(error) => {
				field.abort(run);
				self.notify();
				return Err(FormValidatorError::validator(&field.name, error));
			}
		};

		let valid = messages.is_empty();
		if !field.commit(run, messages) {
			tracing::trace!(field = %field.name, run, "discarding stale validation run");
			return Ok(valid);
		}
		tracing::debug!(field = %field.name, run, valid, "validation committed");
		self.render_field(field);
		self.render_summary();
		self.notify();
		Ok(valid)
	}

	pub(crate) async fn validate_form(&self) -> FormValidatorResult<bool> {
		let results = join_all(self.fields.iter().map(|field| {
			field.mark_touched();
			self.validate_touched(field)
		}))
		.await;

		let mut fields_valid = true;
		for result in results {
			fields_valid &= result?;
		}

		let form_messages = match &self.cross_field {
			Some(validator) => validator
				.validate(&self.get_data(), self.form_element)
				.await
				.map_err(FormValidatorError::cross_field)?
				.into_iter()
				.filter_map(|result| result.into_message())
				.collect(),
			None => Vec::new(),
		};
		let form_valid = form_messages.is_empty();
		*self.form_messages.borrow_mut() = form_messages;
		self.render_summary();
		self.notify();

		if self.settings.scroll_to_first_error
			&& let Some(element) = self.fields.first_with_messages().and_then(|field| field.element)
		{
			self.binding.scroll_into_view(element);
			self.binding.focus(element);
		}

		tracing::debug!(valid = fields_valid && form_valid, "form validated");
		Ok(fields_valid && form_valid)
	}

	pub(crate) fn get_data(&self) -> FormData {
		self.fields
			.iter()
			.map(|field| {
				let value = codec::read(self.binding.as_ref(), field.element, &field.config);
				(field.name.clone(), value)
			})
			.collect()
	}

	fn render_field(&self, field: &FieldEntry) {
		let binding = self.binding.as_ref();
		let (messages, touched) = {
			let state = field.state();
			(state.messages.clone(), state.touched)
		};
		let target = field
			.config
			.message_target
			.as_ref()
			.and_then(|target| ResolvedTarget::resolve(binding, target));

		if field.accessibility
			&& let Some(element) = field.element
		{
			a11y::sync(
				binding,
				element,
				&field.name,
				!messages.is_empty(),
				target.as_ref().and_then(ResolvedTarget::element),
			);
		}

		if let Some(target) = &target {
			target.render(&MessageRenderArgs {
				name: Some(&field.name),
				messages: &messages,
				field_element: field.element,
				form_element: self.form_element,
				hidden_class: &self.settings.classes.hidden,
				binding,
			});
		}

		if let Some(element) = field.element {
			let classes = &self.settings.classes;
			binding.toggle_class(element, &classes.invalid, !messages.is_empty());
			binding.toggle_class(element, &classes.valid, messages.is_empty() && touched);
		}
	}

	fn render_summary(&self) {
		let Some(summary) = &self.summary else {
			return;
		};
		let mut messages = self.fields.messages();
		messages.extend(self.form_messages.borrow().iter().cloned());
		summary.render(&MessageRenderArgs {
			name: None,
			messages: &messages,
			field_element: None,
			form_element: self.form_element,
			hidden_class: &self.settings.classes.hidden,
			binding: self.binding.as_ref(),
		});
	}

	fn render_all(&self) {
		for field in self.fields.iter() {
			self.render_field(field);
		}
		self.render_summary();
	}

	fn is_valid(&self) -> bool {
		self.fields.all_valid() && self.form_messages.borrow().is_empty()
	}

	/// Report the aggregate validity if it differs from the last report.
	fn notify(&self) {
		let valid = self.is_valid();
		if self.last_notified.replace(Some(valid)) == Some(valid) {
			return;
		}
		tracing::debug!(valid, "form validity changed");
		if let Some(callback) = &self.on_validation_change {
			callback(valid);
		}
	}

	pub(crate) fn detach(&self) {
		let listeners = self.listeners.take();
		for (element, id) in &listeners {
			self.binding.remove_listener(*element, *id);
		}
		for field in self.fields.iter() {
			field.debounce.cancel();
		}
		if !listeners.is_empty() {
			tracing::debug!(listeners = listeners.len(), "form validator detached");
		}
	}
}

impl Drop for FormInner {
	fn drop(&mut self) {
		self.detach();
	}
}

/// Validation engine bound to one form.
///
/// Cloning gives another handle to the same validator. Listeners only keep
/// a weak reference, so dropping the last handle detaches them as
/// [`destroy`](Self::destroy) does.
///
/// # Examples
///
/// ```
/// use formwarden_core::validators::required;
/// use formwarden_core::{ElementBinding, Trigger};
/// use formwarden_engine::{FieldConfig, FormConfig, FormValidator, ValidatorOptions};
/// use formwarden_test::MemoryDocument;
/// use std::rc::Rc;
///
/// # tokio_test_block_on(async {
/// let doc = MemoryDocument::new();
/// doc.append("form", &[("id", "signup")]);
/// let name = doc.append("input", &[("name", "name")]);
///
/// let validator = FormValidator::new(
///     Rc::new(doc.clone()),
///     FormConfig::new("#signup"),
///     [(
///         "name",
///         FieldConfig::new(r#"input[name="name"]"#)
///             .validator(required())
///             .validate_on([Trigger::Blur]),
///     )],
///     ValidatorOptions::new(),
/// )
/// .unwrap();
///
/// assert!(!validator.validate_field("name").await.unwrap());
/// doc.set_value(name, "Ada");
/// assert!(validator.validate_form().await.unwrap());
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Clone)]
pub struct FormValidator {
	pub(crate) inner: Rc<FormInner>,
}

impl FormValidator {
	/// Resolve elements, attach listeners and compute the initial validity.
	///
	/// Fields keep the order in which they are given. Unresolvable selectors
	/// are logged and leave the field unbound.
	pub fn new<I, K>(
		binding: Rc<dyn ElementBinding>,
		form_config: FormConfig,
		field_configs: I,
		options: ValidatorOptions,
	) -> FormValidatorResult<Self>
	where
		I: IntoIterator<Item = (K, FieldConfig)>,
		K: Into<String>,
	{
		let FormConfig {
			form,
			summary,
			settings,
			cross_field,
		} = form_config;
		settings.validate()?;

		let form_element = form.as_ref().and_then(|source| {
			let element = resolve_element(binding.as_ref(), source);
			if element.is_none() {
				tracing::warn!(source = ?source, "form element not found");
			}
			element
		});
		let summary = summary
			.as_ref()
			.and_then(|target| ResolvedTarget::resolve(binding.as_ref(), target));
		let fields = FieldRegistry::build(binding.as_ref(), field_configs, &settings)?;

		let inner = Rc::new(FormInner {
			binding,
			form_element,
			settings,
			fields,
			summary,
			cross_field,
			form_messages: RefCell::new(Vec::new()),
			last_notified: Cell::new(None),
			on_validation_change: options.on_validation_change,
			listeners: RefCell::new(Vec::new()),
		});
		events::bind(&inner);
		inner.notify();

		Ok(Self { inner })
	}

	pub fn form_element(&self) -> Option<ElementRef> {
		self.inner.form_element
	}

	/// Bound element of every field, in configuration order.
	pub fn fields(&self) -> IndexMap<String, Option<ElementRef>> {
		self.inner
			.fields
			.iter()
			.map(|field| (field.name.clone(), field.element))
			.collect()
	}

	/// Mark the field touched, validate it and return whether it is valid.
	///
	/// With a debounce interval the call resolves once the burst it joined
	/// has run; if that burst is cancelled it resolves with the current
	/// state.
	pub async fn validate_field(&self, name: &str) -> FormValidatorResult<bool> {
		let field = self.inner.fields.get(name)?;
		field.mark_touched();
		self.inner.validate_touched(field).await
	}

	/// Validate every field concurrently, then the form as a whole.
	///
	/// The cross-field validator's failures replace the form-level
	/// messages. If a field validator errors, every field still finishes
	/// and the first error is returned without running the cross-field
	/// validator.
	pub async fn validate_form(&self) -> FormValidatorResult<bool> {
		self.inner.validate_form().await
	}

	/// Replace the messages of every field (fields missing from
	/// `field_errors` are cleared) and the form-level messages.
	///
	/// # Examples
	///
	/// ```
	/// use formwarden_engine::{FieldErrors, FormConfig, FieldConfig, FormValidator, ValidatorOptions};
	/// use formwarden_test::MemoryDocument;
	/// use std::rc::Rc;
	///
	/// let doc = MemoryDocument::new();
	/// doc.append("input", &[("id", "email")]);
	/// let validator = FormValidator::new(
	///     Rc::new(doc),
	///     FormConfig::detached(),
	///     [("email", FieldConfig::new("#email"))],
	///     ValidatorOptions::new(),
	/// )
	/// .unwrap();
	///
	/// let errors = FieldErrors::from([("email".to_string(), vec!["Already registered.".to_string()])]);
	/// validator.set_errors(&errors, &[]);
	///
	/// assert!(!validator.is_valid());
	/// assert!(validator.field_state("email").unwrap().touched);
	/// ```
	pub fn set_errors(&self, field_errors: &FieldErrors, form_errors: &[String]) {
		let inner = &self.inner;
		for name in field_errors.keys() {
			if !inner.fields.contains(name) {
				tracing::debug!(field = %name, "ignoring errors for unknown field");
			}
		}
		for field in inner.fields.iter() {
			field.set_messages(field_errors.get(&field.name).cloned().unwrap_or_default());
			field.mark_touched();
		}
		*inner.form_messages.borrow_mut() = form_errors.to_vec();
		inner.render_all();
		inner.notify();
	}

	/// Empty every field's messages and the form-level messages.
	/// Touched flags are left alone.
	pub fn clear_errors(&self) {
		let inner = &self.inner;
		for field in inner.fields.iter() {
			field.set_messages(Vec::new());
		}
		inner.form_messages.borrow_mut().clear();
		inner.render_all();
		inner.notify();
	}

	/// Current value of every field.
	pub fn get_data(&self) -> FormData {
		self.inner.get_data()
	}

	/// Write a value through the field's codec. Does not validate.
	pub fn set_value(&self, name: &str, value: impl Into<FieldValue>) -> FormValidatorResult<()> {
		let field = self.inner.fields.get(name)?;
		codec::write(
			self.inner.binding.as_ref(),
			field.element,
			&field.config,
			&value.into(),
		);
		Ok(())
	}

	/// Mark the field touched without validating it.
	pub fn touch(&self, name: &str) -> FormValidatorResult<()> {
		let field = self.inner.fields.get(name)?;
		self.inner.touch_field(field);
		Ok(())
	}

	/// Return every field to its initial state and clear form-level messages.
	///
	/// Pending debounced runs are dropped and in-flight runs will not
	/// commit.
	pub fn reset(&self) {
		let inner = &self.inner;
		for field in inner.fields.iter() {
			field.reset();
			if let Some(element) = field.element {
				inner
					.binding
					.toggle_class(element, &inner.settings.classes.touched, false);
			}
		}
		inner.form_messages.borrow_mut().clear();
		inner.render_all();
		inner.notify();
	}

	/// Remove every listener this validator attached and drop pending
	/// debounced runs. Calling it twice is harmless.
	pub fn destroy(&self) {
		self.inner.detach();
	}

	pub fn field_state(&self, name: &str) -> Option<FieldState> {
		self.inner.fields.get(name).ok().map(|field| field.state().clone())
	}

	pub fn form_messages(&self) -> Vec<String> {
		self.inner.form_messages.borrow().clone()
	}

	/// Every field valid and not validating, and no form-level messages.
	pub fn is_valid(&self) -> bool {
		self.inner.is_valid()
	}

	/// Run the field's pending debounced burst now.
	///
	/// Returns `None` when nothing is pending.
	pub async fn flush_pending(&self, name: &str) -> FormValidatorResult<Option<bool>> {
		let inner = &self.inner;
		let field = inner.fields.get(name)?;
		match field.debounce.flush(|| inner.run_field(field)).await {
			Some(outcome) => outcome.map(Some),
			None => Ok(None),
		}
	}

	/// Drop the field's pending debounced burst. Returns whether one was
	/// pending.
	pub fn cancel_pending(&self, name: &str) -> FormValidatorResult<bool> {
		Ok(self.inner.fields.get(name)?.debounce.cancel())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use formwarden_core::validators::{required, same_as};
	use formwarden_core::{ValidationResult, ValidatorError};
	use formwarden_test::MemoryDocument;
	use rstest::rstest;

	fn two_fields(doc: &MemoryDocument, options: ValidatorOptions) -> FormValidator {
		doc.append("input", &[("id", "password")]);
		doc.append("input", &[("id", "confirm")]);
		FormValidator::new(
			Rc::new(doc.clone()),
			FormConfig::detached(),
			[
				("password", FieldConfig::new("#password").validator(required())),
				("confirm", FieldConfig::new("#confirm").validator(same_as("password"))),
			],
			options,
		)
		.unwrap()
	}

	#[rstest]
	fn test_initial_state() {
		let doc = MemoryDocument::new();
		let validator = two_fields(&doc, ValidatorOptions::new());

		assert!(validator.is_valid());
		assert_eq!(validator.field_state("password"), Some(FieldState::default()));
		assert_eq!(validator.field_state("nope"), None);
		assert_eq!(validator.form_element(), None);
		assert_eq!(validator.fields().len(), 2);
	}

	#[rstest]
	fn test_first_computation_notifies() {
		let calls = Rc::new(RefCell::new(Vec::new()));
		let seen = calls.clone();
		let doc = MemoryDocument::new();

		let _validator = two_fields(
			&doc,
			ValidatorOptions::new().on_validation_change(move |valid| seen.borrow_mut().push(valid)),
		);

		assert_eq!(*calls.borrow(), vec![true]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_validate_field_marks_touched_and_stores_messages() {
		// Arrange
		let doc = MemoryDocument::new();
		let validator = two_fields(&doc, ValidatorOptions::new());

		// Act
		let valid = validator.validate_field("password").await.unwrap();

		// Assert
		let state = validator.field_state("password").unwrap();
		assert!(!valid);
		assert!(state.touched);
		assert!(!state.validating);
		assert_eq!(state.messages, vec!["This field is required."]);
		assert_eq!(state.valid, state.messages.is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_unknown_field_is_an_error() {
		let doc = MemoryDocument::new();
		let validator = two_fields(&doc, ValidatorOptions::new());

		assert_eq!(
			validator.validate_field("nope").await,
			Err(FormValidatorError::UnknownField("nope".into()))
		);
		assert!(validator.touch("nope").is_err());
		assert!(validator.set_value("nope", "x").is_err());
	}

	#[rstest]
	#[tokio::test]
	async fn test_validator_error_clears_validating_and_keeps_messages() {
		// Arrange
		let doc = MemoryDocument::new();
		doc.append("input", &[("id", "username")]);
		let validator = FormValidator::new(
			Rc::new(doc.clone()),
			FormConfig::detached(),
			[(
				"username",
				FieldConfig::new("#username").validator(formwarden_core::validators::try_custom(
					|_| Err(ValidatorError::new("lookup failed")),
				)),
			)],
			ValidatorOptions::new(),
		)
		.unwrap();
		validator.set_errors(
			&FieldErrors::from([("username".to_string(), vec!["Taken.".to_string()])]),
			&[],
		);

		// Act
		let result = validator.validate_field("username").await;

		// Assert
		assert_eq!(
			result,
			Err(FormValidatorError::Validator {
				field: "username".into(),
				message: "lookup failed".into(),
			})
		);
		let state = validator.field_state("username").unwrap();
		assert!(!state.validating);
		assert_eq!(state.messages, vec!["Taken."]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_cross_field_messages_are_replaced_each_time() {
		// Arrange
		let doc = MemoryDocument::new();
		let start = doc.append("input", &[("id", "start")]);
		doc.append("input", &[("id", "end")]);
		let validator = FormValidator::new(
			Rc::new(doc.clone()),
			FormConfig::detached().cross_field(|data: &FormData, _form: Option<ElementRef>| {
				if data.value_of("start") == data.value_of("end") {
					vec![ValidationResult::invalid("Range is empty.")]
				} else {
					vec![ValidationResult::Valid]
				}
			}),
			[
				("start", FieldConfig::new("#start")),
				("end", FieldConfig::new("#end")),
			],
			ValidatorOptions::new(),
		)
		.unwrap();

		// Act
		let first = validator.validate_form().await.unwrap();
		let messages_after_first = validator.form_messages();
		doc.set_value(start, "1");
		let second = validator.validate_form().await.unwrap();

		// Assert
		assert!(!first);
		assert_eq!(messages_after_first, vec!["Range is empty."]);
		assert!(second);
		assert!(validator.form_messages().is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_validate_form_without_cross_field_clears_form_messages() {
		let doc = MemoryDocument::new();
		let validator = two_fields(&doc, ValidatorOptions::new());
		validator.set_errors(&FieldErrors::new(), &["Server says no.".to_string()]);

		doc.type_text(ElementRef::new(0), "pw");
		doc.type_text(ElementRef::new(1), "pw");
		let valid = validator.validate_form().await.unwrap();

		assert!(valid);
		assert!(validator.form_messages().is_empty());
	}

	#[rstest]
	fn test_touch_adds_class_without_validating() {
		let doc = MemoryDocument::new();
		let validator = two_fields(&doc, ValidatorOptions::new());

		validator.touch("password").unwrap();

		let state = validator.field_state("password").unwrap();
		assert!(state.touched);
		assert!(state.messages.is_empty());
		assert!(doc.has_class(ElementRef::new(0), "fv-touched"));
	}

	#[rstest]
	fn test_set_value_and_get_data() {
		let doc = MemoryDocument::new();
		let validator = two_fields(&doc, ValidatorOptions::new());

		validator.set_value("confirm", "secret").unwrap();

		let data = validator.get_data();
		assert_eq!(data.value_of("confirm"), &FieldValue::from("secret"));
		assert_eq!(data.value_of("password"), &FieldValue::from(""));
		assert_eq!(
			data.iter().map(|(name, _)| name).collect::<Vec<_>>(),
			vec!["password", "confirm"]
		);
	}

	#[rstest]
	fn test_reset_restores_initial_state() {
		// Arrange
		let doc = MemoryDocument::new();
		let validator = two_fields(&doc, ValidatorOptions::new());
		validator.touch("password").unwrap();
		validator.set_errors(
			&FieldErrors::from([("password".to_string(), vec!["Too weak.".to_string()])]),
			&["Nope.".to_string()],
		);

		// Act
		validator.reset();

		// Assert
		assert!(validator.is_valid());
		assert!(validator.form_messages().is_empty());
		assert_eq!(validator.field_state("password"), Some(FieldState::default()));
		assert!(!doc.has_class(ElementRef::new(0), "fv-touched"));
		assert!(!doc.has_class(ElementRef::new(0), "fv-invalid"));
	}
}
