//! Value codec
//!
//! Reads and writes a field's value through the binding, directed by the
//! field's declared [`ValueKind`] unless the field overrides either
//! direction.

use crate::config::FieldConfig;
use formwarden_core::{ElementBinding, ElementRef, FieldValue, ValueKind};

pub(crate) fn read(
	binding: &dyn ElementBinding,
	element: Option<ElementRef>,
	config: &FieldConfig,
) -> FieldValue {
	if let Some(getter) = &config.getter {
		return getter(binding, element);
	}
	let Some(element) = element else {
		return FieldValue::Missing;
	};
	match config.kind {
		ValueKind::Boolean => FieldValue::Bool(binding.checked(element)),
		ValueKind::Number => parse_number(&binding.value(element)),
		ValueKind::Text => FieldValue::Text(binding.value(element)),
		ValueKind::TextList => FieldValue::List(binding.selected_values(element)),
	}
}

pub(crate) fn write(
	binding: &dyn ElementBinding,
	element: Option<ElementRef>,
	config: &FieldConfig,
	value: &FieldValue,
) {
	if let Some(setter) = &config.setter {
		setter(binding, element, value);
		return;
	}
	let Some(element) = element else {
		return;
	};
	match (config.kind, value) {
		(ValueKind::Boolean, FieldValue::Bool(checked)) => binding.set_checked(element, *checked),
		(ValueKind::TextList, FieldValue::List(items)) => {
			binding.set_selected_values(element, items)
		}
		_ => binding.set_value(element, &value.to_input_text()),
	}
}

fn parse_number(text: &str) -> FieldValue {
	if text.is_empty() {
		return FieldValue::Missing;
	}
	FieldValue::Number(text.trim().parse().unwrap_or(f64::NAN))
}
