//! Minimal CSS selector support for [`MemoryDocument`](crate::MemoryDocument)
//!
//! Supported: type selectors, `*`, `#id`, `.class`, `[attr]`,
//! `[attr="value"]` (single, double or no quotes), compounds of those, and
//! comma-separated selector lists. Combinators are not supported; a
//! selector containing one parses to `None`.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Compound {
	pub(crate) tag: Option<String>,
	pub(crate) id: Option<String>,
	pub(crate) classes: Vec<String>,
	pub(crate) attributes: Vec<(String, Option<String>)>,
}

/// Anything that can be matched against a compound selector.
pub(crate) trait Matchable {
	fn tag(&self) -> &str;
	fn attribute(&self, name: &str) -> Option<&str>;
	fn has_class(&self, class: &str) -> bool;
}

impl Compound {
	pub(crate) fn matches(&self, node: &impl Matchable) -> bool {
		if let Some(tag) = &self.tag
			&& !tag.eq_ignore_ascii_case(node.tag())
		{
			return false;
		}
		if let Some(id) = &self.id
			&& node.attribute("id") != Some(id.as_str())
		{
			return false;
		}
		if !self.classes.iter().all(|c| node.has_class(c)) {
			return false;
		}
		self.attributes
			.iter()
			.all(|(name, expected)| match (node.attribute(name), expected) {
				(Some(actual), Some(expected)) => actual == expected,
				(Some(_), None) => true,
				(None, _) => false,
			})
	}
}

/// Parse a selector list.
pub(crate) fn parse(selector: &str) -> Option<Vec<Compound>> {
	selector.split(',').map(parse_compound).collect()
}

fn is_ident(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &[char], pos: &mut usize) -> Option<String> {
	let start = *pos;
	while *pos < chars.len() && is_ident(chars[*pos]) {
		*pos += 1;
	}
	(*pos > start).then(|| chars[start..*pos].iter().collect())
}

fn parse_compound(source: &str) -> Option<Compound> {
	let chars: Vec<char> = source.trim().chars().collect();
	if chars.is_empty() {
		return None;
	}
	let mut compound = Compound::default();
	let mut pos = 0;

	if chars[0] == '*' {
		pos = 1;
	} else if is_ident(chars[0]) {
		compound.tag = take_ident(&chars, &mut pos);
	}

	while pos < chars.len() {
		match chars[pos] {
			'#' => {
				pos += 1;
				compound.id = Some(take_ident(&chars, &mut pos)?);
			}
			'.' => {
				pos += 1;
				compound.classes.push(take_ident(&chars, &mut pos)?);
			}
			'[' => {
				pos += 1;
				let end = chars[pos..].iter().position(|&c| c == ']')? + pos;
				let body: String = chars[pos..end].iter().collect();
				compound.attributes.push(parse_attribute(&body)?);
				pos = end + 1;
			}
			_ => return None,
		}
	}
	Some(compound)
}

fn parse_attribute(body: &str) -> Option<(String, Option<String>)> {
	match body.split_once('=') {
		None => {
			let name = body.trim();
			(!name.is_empty()).then(|| (name.to_string(), None))
		}
		Some((name, value)) => {
			let name = name.trim();
			if name.is_empty() {
				return None;
			}
			let value = value.trim();
			let value = value
				.strip_prefix('"')
				.and_then(|v| v.strip_suffix('"'))
				.or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
				.unwrap_or(value);
			Some((name.to_string(), Some(value.to_string())))
		}
	}
}
