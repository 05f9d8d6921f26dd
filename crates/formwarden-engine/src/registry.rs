//! Field registry
//!
//! Holds each configured field with its resolved element and its mutable
//! state. The set of fields is fixed at construction; only the state inside
//! each entry changes.

use crate::config::{ElementSource, FieldConfig};
use crate::debounce::DebounceSlot;
use crate::error::{FormValidatorError, FormValidatorResult};
use crate::settings::ValidatorSettings;
use formwarden_core::{ElementBinding, ElementRef};
use indexmap::IndexMap;
use serde::Serialize;
use std::cell::{Cell, Ref, RefCell};

/// Observable state of one field.
///
/// `valid` always equals `messages.is_empty()`. `dirty` is tracked for
/// hosts that want it but the engine never sets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldState {
	pub touched: bool,
	pub dirty: bool,
	pub messages: Vec<String>,
	pub validating: bool,
	pub valid: bool,
}

impl Default for FieldState {
	fn default() -> Self {
		Self {
			touched: false,
			dirty: false,
			messages: Vec::new(),
			validating: false,
			valid: true,
		}
	}
}

impl FieldState {
	fn set_messages(&mut self, messages: Vec<String>) {
		self.valid = messages.is_empty();
		self.messages = messages;
	}
}

pub(crate) type RunOutcome = FormValidatorResult<bool>;

pub(crate) struct FieldEntry {
	pub(crate) name: String,
	pub(crate) config: FieldConfig,
	pub(crate) element: Option<ElementRef>,
	pub(crate) debounce_ms: u64,
	pub(crate) accessibility: bool,
	pub(crate) debounce: DebounceSlot<RunOutcome>,
	state: RefCell<FieldState>,
	runs: Cell<u64>,
}

impl FieldEntry {
	pub(crate) fn state(&self) -> Ref<'_, FieldState> {
		self.state.borrow()
	}

	pub(crate) fn is_valid(&self) -> bool {
		let state = self.state.borrow();
		state.valid && !state.validating
	}

	pub(crate) fn has_messages(&self) -> bool {
		!self.state.borrow().messages.is_empty()
	}

	pub(crate) fn mark_touched(&self) {
		self.state.borrow_mut().touched = true;
	}

	pub(crate) fn set_messages(&self, messages: Vec<String>) {
		self.state.borrow_mut().set_messages(messages);
	}

	/// Start a run; only the most recently started run may commit.
	pub(crate) fn begin_run(&self) -> u64 {
		let run = self.runs.get() + 1;
		self.runs.set(run);
		self.state.borrow_mut().validating = true;
		run
	}

	/// Store the messages of `run`. Returns `false` for a stale run.
	pub(crate) fn commit(&self, run: u64, messages: Vec<String>) -> bool {
		if self.runs.get() != run {
			return false;
		}
		let mut state = self.state.borrow_mut();
		state.set_messages(messages);
		state.validating = false;
		true
	}

	/// End a failed run without touching the messages.
	pub(crate) fn abort(&self, run: u64) {
		if self.runs.get() == run {
			self.state.borrow_mut().validating = false;
		}
	}

	/// Back to the initial state. In-flight runs become stale and a pending
	/// debounced burst is dropped.
	pub(crate) fn reset(&self) {
		self.runs.set(self.runs.get() + 1);
		self.debounce.cancel();
		*self.state.borrow_mut() = FieldState::default();
	}
}

pub(crate) struct FieldRegistry {
	fields: IndexMap<String, FieldEntry>,
}

impl FieldRegistry {
	pub(crate) fn build<I, K>(
		binding: &dyn ElementBinding,
		configs: I,
		settings: &ValidatorSettings,
	) -> FormValidatorResult<Self>
	where
		I: IntoIterator<Item = (K, FieldConfig)>,
		K: Into<String>,
	{
		let mut fields = IndexMap::new();
		for (name, config) in configs {
			let name = name.into();
			if fields.contains_key(&name) {
				return Err(FormValidatorError::DuplicateField(name));
			}
			let element = resolve_element(binding, &config.source);
			if element.is_none() {
				tracing::warn!(field = %name, source = ?config.source, "field element not found");
			}
			let entry = FieldEntry {
				name: name.clone(),
				element,
				debounce_ms: config.debounce_ms.unwrap_or(settings.default_debounce_ms),
				accessibility: config.accessibility.unwrap_or(settings.accessibility),
				config,
				debounce: DebounceSlot::default(),
				state: RefCell::new(FieldState::default()),
				runs: Cell::new(0),
			};
			fields.insert(name, entry);
		}
		Ok(Self { fields })
	}

	pub(crate) fn get(&self, name: &str) -> FormValidatorResult<&FieldEntry> {
		self.fields
			.get(name)
			.ok_or_else(|| FormValidatorError::UnknownField(name.to_string()))
	}

	pub(crate) fn contains(&self, name: &str) -> bool {
		self.fields.contains_key(name)
	}

	/// Entries in configuration order.
	pub(crate) fn iter(&self) -> impl Iterator<Item = &FieldEntry> {
		self.fields.values()
	}

	pub(crate) fn all_valid(&self) -> bool {
		self.iter().all(FieldEntry::is_valid)
	}

	/// Every field's messages, in configuration order.
	pub(crate) fn messages(&self) -> Vec<String> {
		self.iter()
			.flat_map(|field| field.state().messages.clone())
			.collect()
	}

	pub(crate) fn first_with_messages(&self) -> Option<&FieldEntry> {
		self.iter().find(|field| field.has_messages())
	}
}

pub(crate) fn resolve_element(
	binding: &dyn ElementBinding,
	source: &ElementSource,
) -> Option<ElementRef> {
	match source {
		ElementSource::Element(element) => Some(*element),
		ElementSource::Selector(selector) => binding.query_selector(selector),
	}
}
