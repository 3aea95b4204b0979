//! Process-wide fallback implementations of the three strategy traits.
//!
//! These run whenever a handler or extension supplies no specific
//! implementation of its own. They are ordinary trait impls with no special
//! standing; a handler can be wired with different fallbacks just as well.

use crate::extractor::extract_validation_rules;
use crate::form::FormData;
use crate::request::{FormValues, Request};
use crate::strategy::{FormDataDecoder, FormDataProvider, FormDataValidator, RuleResolver};
use crate::validation::{ValidationInfo, ValidationRule};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Provides an empty object without a declared shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormDataProvider;

#[async_trait]
impl FormDataProvider for DefaultFormDataProvider {
	async fn form_data(&self, _req: &Request) -> anyhow::Result<FormData> {
		Ok(FormData::empty_object())
	}
}

/// Generic value-populating decoder: every submitted key is written into the
/// data object, dotted keys descending into (and creating) nested objects.
/// Single values are stored as strings, repeated keys as string arrays. The
/// declared shape is carried over untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormDataDecoder;

#[async_trait]
impl FormDataDecoder for DefaultFormDataDecoder {
	async fn decode(
		&self,
		_req: &Request,
		values: &FormValues,
		data: FormData,
	) -> anyhow::Result<FormData> {
		let mut object = match data.value {
			Value::Object(object) => object,
			// Anything that is not an object is started over from scratch.
			_ => Map::new(),
		};

		for (key, submitted) in values.iter() {
			set_path(&mut object, key, submitted);
		}

		Ok(FormData {
			value: Value::Object(object),
			shape: data.shape,
		})
	}
}

fn set_path(object: &mut Map<String, Value>, path: &str, submitted: &[String]) {
	let mut segments = path.split('.').peekable();
	let mut current = object;

	while let Some(segment) = segments.next() {
		if segments.peek().is_none() {
			let value = match submitted {
				[single] => Value::String(single.clone()),
				many => Value::Array(many.iter().cloned().map(Value::String).collect()),
			};
			current.insert(segment.to_string(), value);
			return;
		}

		let entry = current
			.entry(segment.to_string())
			.or_insert_with(|| Value::Object(Map::new()));
		if !entry.is_object() {
			*entry = Value::Object(Map::new());
		}
		current = entry.as_object_mut().expect("entry was just made an object");
	}
}

/// Rule-engine-backed validator: re-derives the data's own rule mapping and
/// runs every rule through the resolver against the value at its field path.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormDataValidator;

#[async_trait]
impl FormDataValidator for DefaultFormDataValidator {
	async fn validate(
		&self,
		_req: &Request,
		resolver: &dyn RuleResolver,
		data: &FormData,
	) -> anyhow::Result<Option<ValidationInfo>> {
		let mut info = ValidationInfo::new();

		for (path, rules) in extract_validation_rules(data.shape.as_ref()) {
			for rule in &rules {
				if let Some(message) = resolver.check(rule, data.lookup(&path)) {
					info.add_field_error(&path, message);
				}
			}
		}

		Ok(Some(info))
	}
}

/// Resolver that accepts every rule. Stands in until a real rule engine is
/// wired; useful in tests and for handlers that validate through custom
/// [`FormDataValidator`]s only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRuleResolver;

impl RuleResolver for NoopRuleResolver {
	fn check(&self, _rule: &ValidationRule, _value: Option<&Value>) -> Option<String> {
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::Schema;
	use serde_json::json;

	fn get_request() -> Request {
		Request::builder().build().unwrap()
	}

	#[tokio::test]
	async fn test_default_provider_returns_empty_object() {
		let data = DefaultFormDataProvider
			.form_data(&get_request())
			.await
			.unwrap();
		assert_eq!(data.value, json!({}));
		assert!(data.shape.is_none());
	}

	#[tokio::test]
	async fn test_default_decoder_merges_flat_values() {
		let mut values = FormValues::new();
		values.append("name", "John");
		values.append("age", "42");

		let decoded = DefaultFormDataDecoder
			.decode(&get_request(), &values, FormData::empty_object())
			.await
			.unwrap();

		assert_eq!(decoded.value, json!({"name": "John", "age": "42"}));
	}

	#[tokio::test]
	async fn test_default_decoder_dotted_keys_create_nested_objects() {
		let mut values = FormValues::new();
		values.append("address.city", "Berlin");
		values.append("address.street", "Unter den Linden");

		let decoded = DefaultFormDataDecoder
			.decode(&get_request(), &values, FormData::empty_object())
			.await
			.unwrap();

		assert_eq!(
			decoded.value,
			json!({"address": {"city": "Berlin", "street": "Unter den Linden"}})
		);
	}

	#[tokio::test]
	async fn test_default_decoder_repeated_keys_become_arrays() {
		let mut values = FormValues::new();
		values.append("tag", "a");
		values.append("tag", "b");

		let decoded = DefaultFormDataDecoder
			.decode(&get_request(), &values, FormData::empty_object())
			.await
			.unwrap();

		assert_eq!(decoded.value, json!({"tag": ["a", "b"]}));
	}

	#[tokio::test]
	async fn test_default_decoder_overwrites_existing_values_keeps_shape() {
		let shape = Schema::builder().field("name", "required").build();
		let data = FormData::with_shape(json!({"name": "old", "kept": "yes"}), shape.clone());

		let mut values = FormValues::new();
		values.append("name", "new");

		let decoded = DefaultFormDataDecoder
			.decode(&get_request(), &values, data)
			.await
			.unwrap();

		assert_eq!(decoded.value, json!({"name": "new", "kept": "yes"}));
		assert_eq!(decoded.shape, Some(shape));
	}

	struct RequireEverything;

	impl RuleResolver for RequireEverything {
		fn check(&self, rule: &ValidationRule, value: Option<&Value>) -> Option<String> {
			match rule.name() {
				"required" if value.is_none() => Some("value is required".to_string()),
				_ => None,
			}
		}
	}

	#[tokio::test]
	async fn test_default_validator_reports_through_resolver() {
		let shape = Schema::builder()
			.field("name", "required")
			.field("age", "required")
			.build();
		let data = FormData::with_shape(json!({"name": "John"}), shape);

		let info = DefaultFormDataValidator
			.validate(&get_request(), &RequireEverything, &data)
			.await
			.unwrap()
			.unwrap();

		assert!(info.has_errors_for_field("age"));
		assert!(!info.has_errors_for_field("name"));
	}

	#[tokio::test]
	async fn test_default_validator_passes_without_shape() {
		let info = DefaultFormDataValidator
			.validate(&get_request(), &RequireEverything, &FormData::empty_object())
			.await
			.unwrap()
			.unwrap();
		assert!(info.is_valid());
	}
}
