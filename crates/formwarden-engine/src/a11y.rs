//! Accessibility attributes
//!
//! Mirrors a field's validity onto `aria-invalid` and links its message
//! container through `aria-describedby`.

use formwarden_core::{ElementBinding, ElementRef};

/// Sync accessibility attributes of `field`.
///
/// When `message_target` is an element without an id, it is given
/// `<name>-error`.
pub(crate) fn sync(
	binding: &dyn ElementBinding,
	field: ElementRef,
	name: &str,
	invalid: bool,
	message_target: Option<ElementRef>,
) {
	binding.set_attribute(field, "aria-invalid", if invalid { "true" } else { "false" });

	let Some(target) = message_target else {
		return;
	};
	let id = binding
		.attribute(target, "id")
		.filter(|id| !id.is_empty())
		.unwrap_or_else(|| format!("{name}-error"));
	binding.set_attribute(target, "id", &id);
	binding.set_attribute(field, "aria-describedby", &id);
}
