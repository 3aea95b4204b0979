use crate::schema::Schema;
use crate::validation::{ValidationInfo, ValidationRule};
use serde_json::Value;
use std::collections::HashMap;

/// A form's backing data: the current value plus the declared shape the rule
/// extractor walks.
///
/// `shape` is `None` when the data has no composite description (a primitive
/// or an anonymous blob); extraction then yields no rules. The default value
/// is `Null` with no shape, which stands in for "no data".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
	pub value: Value,
	pub shape: Option<Schema>,
}

impl FormData {
	pub fn new(value: Value) -> Self {
		Self { value, shape: None }
	}

	pub fn with_shape(value: Value, shape: Schema) -> Self {
		Self {
			value,
			shape: Some(shape),
		}
	}

	/// An empty JSON object without a shape, the default provider's result.
	pub fn empty_object() -> Self {
		Self::new(Value::Object(Default::default()))
	}

	/// Looks up a dotted field path (`parent.child`) inside the value.
	pub fn lookup(&self, path: &str) -> Option<&Value> {
		let mut current = &self.value;
		for segment in path.split('.') {
			current = current.as_object()?.get(segment)?;
		}
		Some(current)
	}
}

/// The aggregate result of processing one request's form.
///
/// Created once per request during the build phase, mutated through the
/// decode, validate and extension phases, and handed to the caller. The
/// handler retains nothing across requests.
#[derive(Debug, Clone, Default)]
pub struct Form {
	submitted: bool,
	data: FormData,
	validation_rules: HashMap<String, Vec<ValidationRule>>,
	validation_info: ValidationInfo,
	extensions_data: HashMap<String, FormData>,
}

impl Form {
	pub fn new(submitted: bool, validation_rules: HashMap<String, Vec<ValidationRule>>) -> Self {
		Self {
			submitted,
			validation_rules,
			..Default::default()
		}
	}

	pub fn is_submitted(&self) -> bool {
		self.submitted
	}

	/// True only for a submitted form whose accumulated validation outcome
	/// carries no errors.
	pub fn is_valid_and_submitted(&self) -> bool {
		self.submitted && self.validation_info.is_valid()
	}

	pub fn data(&self) -> &FormData {
		&self.data
	}

	pub fn set_data(&mut self, data: FormData) {
		self.data = data;
	}

	/// The rule mapping computed during the build phase. It reflects the
	/// declared data shape and is not touched by decoding or validation.
	pub fn validation_rules(&self) -> &HashMap<String, Vec<ValidationRule>> {
		&self.validation_rules
	}

	pub fn validation_info(&self) -> &ValidationInfo {
		&self.validation_info
	}

	pub fn validation_info_mut(&mut self) -> &mut ValidationInfo {
		&mut self.validation_info
	}

	pub fn set_validation_info(&mut self, info: ValidationInfo) {
		self.validation_info = info;
	}

	pub fn has_general_errors(&self) -> bool {
		self.validation_info.has_general_errors()
	}

	pub fn has_errors_for_field(&self, field: &str) -> bool {
		self.validation_info.has_errors_for_field(field)
	}

	/// Latest per-extension data, keyed by extension name. Entries are
	/// replaced whole when an extension's data is re-decoded, never left as
	/// a partial mix.
	pub fn extensions_data(&self) -> &HashMap<String, FormData> {
		&self.extensions_data
	}

	pub fn extension_data(&self, name: &str) -> Option<&FormData> {
		self.extensions_data.get(name)
	}

	pub fn insert_extension_data(&mut self, name: impl Into<String>, data: FormData) {
		self.extensions_data.insert(name.into(), data);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_form_data_lookup_dotted_path() {
		let data = FormData::new(json!({"address": {"city": "Berlin"}}));
		assert_eq!(data.lookup("address.city"), Some(&json!("Berlin")));
		assert_eq!(data.lookup("address.street"), None);
		assert_eq!(data.lookup("missing"), None);
	}

	#[test]
	fn test_form_data_lookup_on_non_object() {
		let data = FormData::new(json!(42));
		assert_eq!(data.lookup("anything"), None);
	}

	#[test]
	fn test_new_form_is_unsubmitted_and_valid() {
		let form = Form::new(false, HashMap::new());
		assert!(!form.is_submitted());
		assert!(!form.is_valid_and_submitted());
		assert!(form.validation_info().is_valid());
		assert!(form.extensions_data().is_empty());
	}

	#[test]
	fn test_submitted_form_validity_tracks_info() {
		let mut form = Form::new(true, HashMap::new());
		assert!(form.is_valid_and_submitted());

		form.validation_info_mut().add_general_error("broken");
		assert!(!form.is_valid_and_submitted());
		assert!(form.has_general_errors());
	}

	#[test]
	fn test_extension_data_is_replaced_whole() {
		let mut form = Form::new(true, HashMap::new());
		form.insert_extension_data("newsletter", FormData::new(json!({"optin": "no"})));
		form.insert_extension_data("newsletter", FormData::new(json!({"optin": "yes"})));

		let data = form.extension_data("newsletter").unwrap();
		assert_eq!(data.value, json!({"optin": "yes"}));
		assert_eq!(form.extensions_data().len(), 1);
	}
}
