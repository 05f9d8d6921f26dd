//! Element Binding capability
//!
//! The engine never touches a concrete document. Everything it needs from
//! the hosting environment (selector queries, value access, attributes,
//! classes, listeners, scroll and focus) goes through [`ElementBinding`],
//! so the core can run against a browser DOM, a server-side test double or
//! anything else that can hand out element references.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐  ElementBinding  ┌──────────────────┐
//! │ FormValidator │ ───────────────▶ │ host environment │
//! │               │ ◀─────────────── │ (DOM, test double)│
//! └───────────────┘  Listener futures └──────────────────┘
//! ```
//!
//! Listeners are asynchronous: the host awaits the returned future and then
//! applies the [`EventOutcome`] (for example suppressing a form submission).

use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Opaque reference to an element owned by the hosting environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementRef(u64);

impl ElementRef {
	pub const fn new(raw: u64) -> Self {
		Self(raw)
	}

	pub const fn raw(self) -> u64 {
		self.0
	}
}

impl fmt::Display for ElementRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "element#{}", self.0)
	}
}

/// Interaction that may trigger a field validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
	/// Every edit of the value (`input`)
	Input,
	/// Committed value change (`change`)
	Change,
	/// Focus leaving the element (`blur`)
	Blur,
}

/// Event kinds the engine listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
	Input,
	Change,
	Blur,
	Submit,
}

impl EventKind {
	/// DOM event type name.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Input => "input",
			Self::Change => "change",
			Self::Blur => "blur",
			Self::Submit => "submit",
		}
	}
}

impl From<Trigger> for EventKind {
	fn from(trigger: Trigger) -> Self {
		match trigger {
			Trigger::Input => Self::Input,
			Trigger::Change => Self::Change,
			Trigger::Blur => Self::Blur,
		}
	}
}

impl fmt::Display for EventKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// What the host should do with an event once a listener has finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
	pub prevent_default: bool,
	pub stop_propagation: bool,
}

impl EventOutcome {
	/// Let the event continue untouched.
	pub const fn proceed() -> Self {
		Self {
			prevent_default: false,
			stop_propagation: false,
		}
	}

	/// Suppress the default action and stop propagation.
	pub const fn suppress() -> Self {
		Self {
			prevent_default: true,
			stop_propagation: true,
		}
	}

	/// Combine the outcomes of two listeners on the same event.
	pub fn merge(self, other: Self) -> Self {
		Self {
			prevent_default: self.prevent_default || other.prevent_default,
			stop_propagation: self.stop_propagation || other.stop_propagation,
		}
	}
}

/// Handle returned by [`ElementBinding::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
	pub const fn new(raw: u64) -> Self {
		Self(raw)
	}

	pub const fn raw(self) -> u64 {
		self.0
	}
}

/// Event listener registered with the host.
pub type Listener = Rc<dyn Fn(EventKind) -> LocalBoxFuture<'static, EventOutcome>>;

/// Capability the hosting environment supplies to the engine.
///
/// All methods take `&self`; implementations use interior mutability the
/// same way a DOM handle does. Operations on an element the host no longer
/// knows about are silently ignored.
pub trait ElementBinding {
	/// First element matching `selector`, in document order.
	fn query_selector(&self, selector: &str) -> Option<ElementRef>;

	/// Upper-case tag name (`"INPUT"`, `"UL"`, ...).
	fn tag_name(&self, element: ElementRef) -> String;

	/// Current text value of an input-like element.
	fn value(&self, element: ElementRef) -> String;

	fn set_value(&self, element: ElementRef, value: &str);

	/// Checked state of a toggle-like element.
	fn checked(&self, element: ElementRef) -> bool;

	fn set_checked(&self, element: ElementRef, checked: bool);

	/// Values of the selected options of a multi-select.
	fn selected_values(&self, element: ElementRef) -> Vec<String>;

	fn set_selected_values(&self, element: ElementRef, values: &[String]);

	fn attribute(&self, element: ElementRef, name: &str) -> Option<String>;

	fn set_attribute(&self, element: ElementRef, name: &str, value: &str);

	/// Add `class` when `force` is true, remove it otherwise.
	fn toggle_class(&self, element: ElementRef, class: &str, force: bool);

	/// Replace the element's children with the given markup.
	fn set_inner_html(&self, element: ElementRef, html: &str);

	fn add_listener(&self, element: ElementRef, event: EventKind, listener: Listener)
	-> ListenerId;

	/// Returns `false` when no such listener was registered.
	fn remove_listener(&self, element: ElementRef, id: ListenerId) -> bool;

	fn scroll_into_view(&self, element: ElementRef);

	fn focus(&self, element: ElementRef);
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Trigger::Input, EventKind::Input)]
	#[case(Trigger::Change, EventKind::Change)]
	#[case(Trigger::Blur, EventKind::Blur)]
	fn test_trigger_maps_to_event_kind(#[case] trigger: Trigger, #[case] expected: EventKind) {
		assert_eq!(EventKind::from(trigger), expected);
	}

	#[rstest]
	fn test_outcome_merge_is_sticky() {
		let merged = EventOutcome::proceed()
			.merge(EventOutcome::suppress())
			.merge(EventOutcome::proceed());
		assert_eq!(merged, EventOutcome::suppress());
	}

	#[rstest]
	fn test_trigger_deserializes_from_dom_names() {
		let triggers: Vec<Trigger> = serde_json::from_str(r#"["input","blur"]"#).unwrap();
		assert_eq!(triggers, vec![Trigger::Input, Trigger::Blur]);
	}
}
