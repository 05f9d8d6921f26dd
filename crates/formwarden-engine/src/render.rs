//! Message rendering
//!
//! A message target is either a container element, filled with list items
//! (`ul` / `ol`) or `<br>`-joined text, or a callback that renders however
//! it likes. The same policy applies to field messages and to the summary.

use crate::config::{ElementSource, MessageRenderArgs, MessageTarget, RenderCallback};
use crate::registry::resolve_element;
use formwarden_core::{ElementBinding, ElementRef};
use std::borrow::Cow;

/// A message target after selector resolution.
#[derive(Clone)]
pub(crate) enum ResolvedTarget {
	Element(ElementRef),
	Callback(RenderCallback),
}

impl ResolvedTarget {
	pub(crate) fn resolve(binding: &dyn ElementBinding, target: &MessageTarget) -> Option<Self> {
		match target {
			MessageTarget::Element(element) => Some(Self::Element(*element)),
			MessageTarget::Selector(selector) => {
				let element = binding.query_selector(selector);
				if element.is_none() {
					tracing::warn!(selector = %selector, "message target not found");
				}
				element.map(Self::Element)
			}
			MessageTarget::Callback(callback) => Some(Self::Callback(callback.clone())),
		}
	}

	pub(crate) fn element(&self) -> Option<ElementRef> {
		match self {
			Self::Element(element) => Some(*element),
			Self::Callback(_) => None,
		}
	}

	pub(crate) fn render(&self, args: &MessageRenderArgs<'_>) {
		match self {
			Self::Element(element) => {
				fill_container(args.binding, *element, args.messages, args.hidden_class)
			}
			Self::Callback(callback) => callback(args),
		}
	}
}

/// Escapes HTML special characters in a string.
///
/// Returns a borrowed reference if no escaping is needed.
///
/// # Examples
///
/// ```
/// use formwarden_engine::render::html_escape;
///
/// assert_eq!(html_escape("plain"), "plain");
/// assert_eq!(html_escape("<b>&</b>"), "&lt;b&gt;&amp;&lt;/b&gt;");
/// ```
pub fn html_escape(s: &str) -> Cow<'_, str> {
	if s.contains(['&', '<', '>', '"', '\'']) {
		let mut escaped = String::with_capacity(s.len() + 8);
		for c in s.chars() {
			match c {
				'&' => escaped.push_str("&amp;"),
				'<' => escaped.push_str("&lt;"),
				'>' => escaped.push_str("&gt;"),
				'"' => escaped.push_str("&quot;"),
				'\'' => escaped.push_str("&#x27;"),
				_ => escaped.push(c),
			}
		}
		Cow::Owned(escaped)
	} else {
		Cow::Borrowed(s)
	}
}

/// Markup for `messages` inside an element with the given tag name.
pub fn messages_markup(tag_name: &str, messages: &[String]) -> String {
	if tag_name.eq_ignore_ascii_case("ul") || tag_name.eq_ignore_ascii_case("ol") {
		messages
			.iter()
			.map(|message| format!("<li>{}</li>", html_escape(message)))
			.collect()
	} else {
		messages
			.iter()
			.map(|message| html_escape(message))
			.collect::<Vec<_>>()
			.join("<br>")
	}
}

/// Fill a container with `messages` and hide it when there are none.
pub fn fill_container(
	binding: &dyn ElementBinding,
	target: ElementRef,
	messages: &[String],
	hidden_class: &str,
) {
	binding.toggle_class(target, hidden_class, messages.is_empty());
	binding.set_inner_html(target, &messages_markup(&binding.tag_name(target), messages));
}

/// Render a field's messages into the element matching `selector`.
///
/// Unlike a plain selector target, a callback target never gets linked
/// through `aria-describedby`.
///
/// # Examples
///
/// ```
/// use formwarden_engine::FieldConfig;
/// use formwarden_engine::render::below_field_message;
///
/// let field = FieldConfig::new("#password").message_target(below_field_message(".password-hint"));
/// # let _ = field;
/// ```
pub fn below_field_message(selector: impl Into<String>) -> MessageTarget {
	selector_callback(selector.into())
}

/// Render the summary into the element matching `selector`.
pub fn to_summary(selector: impl Into<String>) -> MessageTarget {
	selector_callback(selector.into())
}

fn selector_callback(selector: String) -> MessageTarget {
	let source = ElementSource::Selector(selector);
	MessageTarget::callback(move |args| {
		if let Some(target) = resolve_element(args.binding, &source) {
			fill_container(args.binding, target, args.messages, args.hidden_class);
		}
	})
}
