use serde::Serialize;
use std::collections::HashMap;

/// A single named constraint attached to a field path, e.g. `required` or
/// `min=3`. Rules are immutable once built; multiple rules on one field form
/// an ordered sequence reflecting their declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationRule {
	name: String,
	value: Option<String>,
}

impl ValidationRule {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value: None,
		}
	}

	pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value: Some(value.into()),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn value(&self) -> Option<&str> {
		self.value.as_deref()
	}
}

/// Accumulated validation outcome: form-level messages plus per-field
/// messages. Absence of an entry for a field means the field is valid.
///
/// The container is append-only during request processing; the handler merges
/// the primary form's outcome with each extension's outcome into one value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationInfo {
	general_errors: Vec<String>,
	field_errors: HashMap<String, Vec<String>>,
}

impl ValidationInfo {
	pub fn new() -> Self {
		Self::default()
	}

	/// True when no general and no field errors have been recorded.
	pub fn is_valid(&self) -> bool {
		self.general_errors.is_empty() && self.field_errors.is_empty()
	}

	pub fn add_general_error(&mut self, message: impl Into<String>) {
		self.general_errors.push(message.into());
	}

	pub fn add_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
		self.field_errors
			.entry(field.into())
			.or_default()
			.push(message.into());
	}

	pub fn append_general_errors(&mut self, messages: impl IntoIterator<Item = String>) {
		self.general_errors.extend(messages);
	}

	/// Appends every field error of `other` onto the matching field entries,
	/// creating entries as needed. Existing messages are never dropped.
	pub fn append_field_errors(&mut self, other: HashMap<String, Vec<String>>) {
		for (field, messages) in other {
			self.field_errors.entry(field).or_default().extend(messages);
		}
	}

	pub fn general_errors(&self) -> &[String] {
		&self.general_errors
	}

	pub fn has_general_errors(&self) -> bool {
		!self.general_errors.is_empty()
	}

	pub fn field_errors(&self) -> &HashMap<String, Vec<String>> {
		&self.field_errors
	}

	pub fn errors_for_field(&self, field: &str) -> &[String] {
		self.field_errors.get(field).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn has_errors_for_field(&self, field: &str) -> bool {
		self.field_errors.contains_key(field)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_validation_rule_accessors() {
		let rule = ValidationRule::new("required");
		assert_eq!(rule.name(), "required");
		assert_eq!(rule.value(), None);

		let rule = ValidationRule::with_value("min", "3");
		assert_eq!(rule.name(), "min");
		assert_eq!(rule.value(), Some("3"));
	}

	#[test]
	fn test_validation_info_starts_valid() {
		let info = ValidationInfo::new();
		assert!(info.is_valid());
		assert!(!info.has_general_errors());
		assert!(info.errors_for_field("name").is_empty());
	}

	#[test]
	fn test_validation_info_accumulates() {
		let mut info = ValidationInfo::new();
		info.add_general_error("something went wrong");
		info.add_field_error("name", "name is required");
		info.add_field_error("name", "name is too short");

		assert!(!info.is_valid());
		assert_eq!(info.general_errors(), ["something went wrong"]);
		assert_eq!(
			info.errors_for_field("name"),
			["name is required", "name is too short"]
		);
		assert!(!info.has_errors_for_field("age"));
	}

	#[test]
	fn test_append_field_errors_is_additive() {
		let mut info = ValidationInfo::new();
		info.add_field_error("name", "first");

		let mut other = HashMap::new();
		other.insert("name".to_string(), vec!["second".to_string()]);
		other.insert("age".to_string(), vec!["too young".to_string()]);
		info.append_field_errors(other);

		assert_eq!(info.errors_for_field("name"), ["first", "second"]);
		assert_eq!(info.errors_for_field("age"), ["too young"]);
	}
}
