//! Field values and form snapshots
//!
//! A field's value is read from its bound element through the value codec
//! and handed to validators as a [`FieldValue`]. The whole form is captured
//! as an ordered [`FormData`] snapshot, which doubles as the outgoing
//! request body.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Statically declared representation of a field's value.
///
/// The value codec uses the declared kind to decide how to read and write
/// the bound element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
	/// Toggle-like inputs (checkboxes); read from the checked state
	Boolean,
	/// Numeric inputs; empty text reads as [`FieldValue::Missing`]
	Number,
	/// Plain text inputs, text areas and single selects
	#[default]
	Text,
	/// Multi-selects; read from the selected option values
	TextList,
}

/// A field's current value.
///
/// Equality is strict: two numbers compare by IEEE equality (so `NaN` never
/// equals itself) and values of different variants are never equal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
	/// No value (unbound element, empty numeric input)
	#[default]
	Missing,
	Bool(bool),
	Number(f64),
	Text(String),
	List(Vec<String>),
}

impl FieldValue {
	/// Returns the string slice if this is a text value.
	///
	/// # Examples
	///
	/// ```
	/// use formwarden_core::FieldValue;
	///
	/// assert_eq!(FieldValue::from("abc").as_str(), Some("abc"));
	/// assert_eq!(FieldValue::Bool(true).as_str(), None);
	/// ```
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Text(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_number(&self) -> Option<f64> {
		match self {
			Self::Number(n) => Some(*n),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&[String]> {
		match self {
			Self::List(items) => Some(items),
			_ => None,
		}
	}

	pub fn is_missing(&self) -> bool {
		matches!(self, Self::Missing)
	}

	/// Text written into an element's `value` when no richer setter applies.
	///
	/// # Examples
	///
	/// ```
	/// use formwarden_core::FieldValue;
	///
	/// assert_eq!(FieldValue::Number(42.0).to_input_text(), "42");
	/// assert_eq!(FieldValue::Missing.to_input_text(), "");
	/// assert_eq!(
	///     FieldValue::List(vec!["a".into(), "b".into()]).to_input_text(),
	///     "a,b"
	/// );
	/// ```
	pub fn to_input_text(&self) -> String {
		match self {
			Self::Missing => String::new(),
			Self::Bool(b) => b.to_string(),
			Self::Number(n) => n.to_string(),
			Self::Text(s) => s.clone(),
			Self::List(items) => items.join(","),
		}
	}
}

impl fmt::Display for FieldValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_input_text())
	}
}

impl From<&str> for FieldValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for FieldValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<bool> for FieldValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<f64> for FieldValue {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}

impl From<i64> for FieldValue {
	fn from(value: i64) -> Self {
		Self::Number(value as f64)
	}
}

impl From<Vec<String>> for FieldValue {
	fn from(value: Vec<String>) -> Self {
		Self::List(value)
	}
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Missing, Into::into)
	}
}

/// Snapshot of every configured field's value, keyed by field name in
/// configuration order.
///
/// Serializes as a JSON object, which makes it usable directly as a request
/// body:
///
/// ```
/// use formwarden_core::{FieldValue, FormData};
///
/// let mut data = FormData::new();
/// data.insert("email", "a@b.co");
/// data.insert("remember", true);
///
/// let json = serde_json::to_string(&data).unwrap();
/// assert_eq!(json, r#"{"email":"a@b.co","remember":true}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData {
	values: IndexMap<String, FieldValue>,
}

impl FormData {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert or replace a field value, keeping the original position of an
	/// existing key.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
		self.values.insert(name.into(), value.into());
	}

	pub fn get(&self, name: &str) -> Option<&FieldValue> {
		self.values.get(name)
	}

	/// Value of `name`, or [`FieldValue::Missing`] when the snapshot has no
	/// such field.
	pub fn value_of(&self, name: &str) -> &FieldValue {
		static MISSING: FieldValue = FieldValue::Missing;
		self.values.get(name).unwrap_or(&MISSING)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.values.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
		self.values.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Convert into a JSON value.
	pub fn to_json(&self) -> serde_json::Value {
		serde_json::Value::Object(
			self.values
				.iter()
				.map(|(k, v)| (k.clone(), field_value_to_json(v)))
				.collect(),
		)
	}
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FormData {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			values: iter
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		}
	}
}

fn field_value_to_json(value: &FieldValue) -> serde_json::Value {
	match value {
		FieldValue::Missing => serde_json::Value::Null,
		FieldValue::Bool(b) => serde_json::Value::Bool(*b),
		// NaN and infinities have no JSON representation
		FieldValue::Number(n) => serde_json::Number::from_f64(*n)
			.map_or(serde_json::Value::Null, serde_json::Value::Number),
		FieldValue::Text(s) => serde_json::Value::String(s.clone()),
		FieldValue::List(items) => serde_json::Value::Array(
			items
				.iter()
				.cloned()
				.map(serde_json::Value::String)
				.collect(),
		),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_nan_is_not_equal_to_itself() {
		assert_ne!(FieldValue::Number(f64::NAN), FieldValue::Number(f64::NAN));
	}

	#[rstest]
	#[case(FieldValue::Text("1".into()), FieldValue::Number(1.0))]
	#[case(FieldValue::Missing, FieldValue::Text(String::new()))]
	#[case(FieldValue::Bool(false), FieldValue::Missing)]
	fn test_values_of_different_kinds_never_equal(#[case] a: FieldValue, #[case] b: FieldValue) {
		assert_ne!(a, b);
	}

	#[rstest]
	fn test_form_data_preserves_insertion_order() {
		// Arrange
		let mut data = FormData::new();
		data.insert("zeta", "z");
		data.insert("alpha", "a");
		data.insert("zeta", "replaced");

		// Act
		let names: Vec<_> = data.iter().map(|(name, _)| name).collect();

		// Assert
		assert_eq!(names, vec!["zeta", "alpha"]);
		assert_eq!(data.value_of("zeta"), &FieldValue::from("replaced"));
	}

	#[rstest]
	fn test_form_data_to_json_maps_missing_and_nan_to_null() {
		// Arrange
		let data: FormData = [
			("age", FieldValue::Number(f64::NAN)),
			("nickname", FieldValue::Missing),
			("tags", FieldValue::List(vec!["a".into()])),
		]
		.into_iter()
		.collect();

		// Act
		let value = data.to_json();

		// Assert
		assert_eq!(value, json!({"age": null, "nickname": null, "tags": ["a"]}));
	}

	#[rstest]
	fn test_value_of_unknown_field_is_missing() {
		let data = FormData::new();
		assert!(data.value_of("nope").is_missing());
	}

	#[rstest]
	fn test_typed_accessors_only_match_their_kind() {
		// Arrange
		let data: FormData = [
			("newsletter", FieldValue::Bool(true)),
			("tags", FieldValue::List(vec!["rust".into(), "forms".into()])),
		]
		.into_iter()
		.collect();

		// Act
		let newsletter = data.get("newsletter");
		let tags = data.get("tags");

		// Assert
		assert_eq!(data.len(), 2);
		assert!(data.contains("tags"));
		assert!(!data.contains("nickname"));
		assert_eq!(data.get("nickname"), None);
		assert_eq!(newsletter.and_then(FieldValue::as_bool), Some(true));
		assert_eq!(newsletter.and_then(FieldValue::as_list), None);
		assert_eq!(
			tags.and_then(FieldValue::as_list),
			Some(["rust".to_string(), "forms".to_string()].as_slice())
		);
		assert_eq!(tags.and_then(FieldValue::as_bool), None);
	}

	#[rstest]
	fn test_option_conversion() {
		assert_eq!(FieldValue::from(None::<f64>), FieldValue::Missing);
		assert_eq!(FieldValue::from(Some(3.5)), FieldValue::Number(3.5));
	}
}
