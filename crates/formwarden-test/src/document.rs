//! In-memory document implementing [`ElementBinding`]
//!
//! `MemoryDocument` is a flat list of elements with attributes, classes,
//! values and listeners. It is enough to drive the validation engine in
//! native tests without a browser.
//!
//! # Example
//!
//! ```
//! use formwarden_core::{ElementBinding, EventKind};
//! use formwarden_test::MemoryDocument;
//!
//! let doc = MemoryDocument::new();
//! let email = doc.append("input", &[("type", "email"), ("name", "email")]);
//!
//! assert_eq!(doc.query_selector(r#"input[name="email"]"#), Some(email));
//! doc.type_text(email, "a@b.co");
//! assert_eq!(doc.value(email), "a@b.co");
//! ```

use crate::selector::{self, Matchable};
use formwarden_core::{ElementBinding, ElementRef, EventKind, EventOutcome, Listener, ListenerId};
use std::cell::RefCell;
use std::rc::Rc;

/// One element of a [`MemoryDocument`].
#[derive(Debug, Clone, Default)]
pub struct MemoryElement {
	tag: String,
	attributes: Vec<(String, String)>,
	classes: Vec<String>,
	value: String,
	checked: bool,
	selected: Vec<String>,
	inner_html: String,
}

impl MemoryElement {
	fn set_attribute(&mut self, name: &str, value: &str) {
		match self.attributes.iter_mut().find(|(n, _)| n == name) {
			Some((_, existing)) => *existing = value.to_string(),
			None => self.attributes.push((name.to_string(), value.to_string())),
		}
	}
}

impl Matchable for MemoryElement {
	fn tag(&self) -> &str {
		&self.tag
	}

	fn attribute(&self, name: &str) -> Option<&str> {
		self.attributes
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, v)| v.as_str())
	}

	fn has_class(&self, class: &str) -> bool {
		self.classes.iter().any(|c| c == class)
	}
}

struct RegisteredListener {
	id: ListenerId,
	element: ElementRef,
	event: EventKind,
	listener: Listener,
}

#[derive(Default)]
struct DocumentState {
	elements: Vec<MemoryElement>,
	listeners: Vec<RegisteredListener>,
	next_listener: u64,
	scrolled: Vec<ElementRef>,
	focused: Option<ElementRef>,
}

impl DocumentState {
	fn element(&self, element: ElementRef) -> Option<&MemoryElement> {
		self.elements.get(element.raw() as usize)
	}

	fn element_mut(&mut self, element: ElementRef) -> Option<&mut MemoryElement> {
		self.elements.get_mut(element.raw() as usize)
	}
}

/// Shared handle to an in-memory document. Clones refer to the same document.
#[derive(Clone, Default)]
pub struct MemoryDocument {
	state: Rc<RefCell<DocumentState>>,
}

impl MemoryDocument {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append an element. `class`, `value` and `checked` attributes also
	/// seed the class list, value and checked state.
	pub fn append(&self, tag: &str, attributes: &[(&str, &str)]) -> ElementRef {
		let mut element = MemoryElement {
			tag: tag.to_ascii_lowercase(),
			..Default::default()
		};
		for (name, value) in attributes {
			match *name {
				"class" => element
					.classes
					.extend(value.split_whitespace().map(str::to_string)),
				"value" => element.value = value.to_string(),
				"checked" => element.checked = true,
				_ => {}
			}
			element.set_attribute(name, value);
		}
		let mut state = self.state.borrow_mut();
		state.elements.push(element);
		ElementRef::new(state.elements.len() as u64 - 1)
	}

	/// Simulate the user replacing the element's text.
	pub fn type_text(&self, element: ElementRef, text: &str) {
		self.set_value(element, text);
	}

	pub fn has_class(&self, element: ElementRef, class: &str) -> bool {
		self.state
			.borrow()
			.element(element)
			.is_some_and(|e| e.has_class(class))
	}

	pub fn classes(&self, element: ElementRef) -> Vec<String> {
		self.state
			.borrow()
			.element(element)
			.map(|e| e.classes.clone())
			.unwrap_or_default()
	}

	pub fn inner_html(&self, element: ElementRef) -> String {
		self.state
			.borrow()
			.element(element)
			.map(|e| e.inner_html.clone())
			.unwrap_or_default()
	}

	/// Listeners currently attached to `element`.
	pub fn listener_count(&self, element: ElementRef) -> usize {
		self.state
			.borrow()
			.listeners
			.iter()
			.filter(|l| l.element == element)
			.count()
	}

	/// Listeners attached anywhere in the document.
	pub fn total_listener_count(&self) -> usize {
		self.state.borrow().listeners.len()
	}

	/// Elements scrolled into view, oldest first.
	pub fn scrolled_into_view(&self) -> Vec<ElementRef> {
		self.state.borrow().scrolled.clone()
	}

	pub fn focused(&self) -> Option<ElementRef> {
		self.state.borrow().focused
	}

	/// Run every listener registered for `event` on `element`, in
	/// registration order, and merge their outcomes.
	pub async fn dispatch(&self, element: ElementRef, event: EventKind) -> EventOutcome {
		let listeners: Vec<Listener> = self
			.state
			.borrow()
			.listeners
			.iter()
			.filter(|l| l.element == element && l.event == event)
			.map(|l| l.listener.clone())
			.collect();
		let mut outcome = EventOutcome::proceed();
		for listener in listeners {
			outcome = outcome.merge(listener(event).await);
		}
		outcome
	}
}

impl ElementBinding for MemoryDocument {
	fn query_selector(&self, selector: &str) -> Option<ElementRef> {
		let Some(compounds) = selector::parse(selector) else {
			tracing::debug!(selector, "unsupported selector");
			return None;
		};
		let state = self.state.borrow();
		state
			.elements
			.iter()
			.position(|element| compounds.iter().any(|c| c.matches(element)))
			.map(|index| ElementRef::new(index as u64))
	}

	fn tag_name(&self, element: ElementRef) -> String {
		self.state
			.borrow()
			.element(element)
			.map(|e| e.tag.to_ascii_uppercase())
			.unwrap_or_default()
	}

	fn value(&self, element: ElementRef) -> String {
		self.state
			.borrow()
			.element(element)
			.map(|e| e.value.clone())
			.unwrap_or_default()
	}

	fn set_value(&self, element: ElementRef, value: &str) {
		if let Some(e) = self.state.borrow_mut().element_mut(element) {
			e.value = value.to_string();
		}
	}

	fn checked(&self, element: ElementRef) -> bool {
		self.state
			.borrow()
			.element(element)
			.is_some_and(|e| e.checked)
	}

	fn set_checked(&self, element: ElementRef, checked: bool) {
		if let Some(e) = self.state.borrow_mut().element_mut(element) {
			e.checked = checked;
		}
	}

	fn selected_values(&self, element: ElementRef) -> Vec<String> {
		self.state
			.borrow()
			.element(element)
			.map(|e| e.selected.clone())
			.unwrap_or_default()
	}

	fn set_selected_values(&self, element: ElementRef, values: &[String]) {
		if let Some(e) = self.state.borrow_mut().element_mut(element) {
			e.selected = values.to_vec();
		}
	}

	fn attribute(&self, element: ElementRef, name: &str) -> Option<String> {
		self.state
			.borrow()
			.element(element)
			.and_then(|e| e.attribute(name).map(str::to_string))
	}

	fn set_attribute(&self, element: ElementRef, name: &str, value: &str) {
		if let Some(e) = self.state.borrow_mut().element_mut(element) {
			e.set_attribute(name, value);
		}
	}

	fn toggle_class(&self, element: ElementRef, class: &str, force: bool) {
		if let Some(e) = self.state.borrow_mut().element_mut(element) {
			let present = e.has_class(class);
			if force && !present {
				e.classes.push(class.to_string());
			} else if !force && present {
				e.classes.retain(|c| c != class);
			}
		}
	}

	fn set_inner_html(&self, element: ElementRef, html: &str) {
		if let Some(e) = self.state.borrow_mut().element_mut(element) {
			e.inner_html = html.to_string();
		}
	}

	fn add_listener(
		&self,
		element: ElementRef,
		event: EventKind,
		listener: Listener,
	) -> ListenerId {
		let mut state = self.state.borrow_mut();
		state.next_listener += 1;
		let id = ListenerId::new(state.next_listener);
		state.listeners.push(RegisteredListener {
			id,
			element,
			event,
			listener,
		});
		id
	}

	fn remove_listener(&self, element: ElementRef, id: ListenerId) -> bool {
		let mut state = self.state.borrow_mut();
		let before = state.listeners.len();
		state
			.listeners
			.retain(|l| !(l.id == id && l.element == element));
		state.listeners.len() != before
	}

	fn scroll_into_view(&self, element: ElementRef) {
		self.state.borrow_mut().scrolled.push(element);
	}

	fn focus(&self, element: ElementRef) {
		self.state.borrow_mut().focused = Some(element);
	}
}
