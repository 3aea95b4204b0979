//! Derives the validation-rule mapping from a declared data shape.

use crate::schema::{FieldKind, Schema};
use crate::validation::ValidationRule;
use std::collections::HashMap;

/// Walks the declared fields of `shape` in declaration order and returns the
/// mapping from field path to its ordered rules.
///
/// Excluded fields are skipped, renamed fields appear under their exposed
/// name and nested composites contribute dotted keys (`parent.child`).
/// `None` models a missing shape (primitive or absent data description) and
/// yields an empty mapping. The walk is pure: calling it twice on the same
/// shape yields identical mappings.
pub fn extract_validation_rules(shape: Option<&Schema>) -> HashMap<String, Vec<ValidationRule>> {
	let mut validation_rules = HashMap::new();

	let Some(schema) = shape else {
		return validation_rules;
	};

	for field in schema.fields() {
		let Some(name) = field.exposed_name() else {
			continue;
		};

		match field.kind() {
			FieldKind::Composite(nested) => {
				for (key, rules) in extract_validation_rules(Some(nested)) {
					validation_rules.insert(format!("{name}.{key}"), rules);
				}
			}
			FieldKind::Scalar { rules } => {
				let parsed = parse_rule_annotation(rules);
				if !parsed.is_empty() {
					validation_rules.insert(name.to_string(), parsed);
				}
			}
		}
	}

	validation_rules
}

/// Parses the annotation grammar `token(,token)*` with
/// `token := ruleName | ruleName=ruleValue`. Empty tokens and `omitempty`
/// are ignored; the rest keep their declaration order.
fn parse_rule_annotation(annotation: &str) -> Vec<ValidationRule> {
	let mut rules = Vec::new();

	for token in annotation.split(',') {
		let mut parts = token.splitn(2, '=');
		let name = parts.next().unwrap_or("");
		if name.is_empty() || name == "omitempty" {
			continue;
		}

		rules.push(match parts.next() {
			Some(value) => ValidationRule::with_value(name, value),
			None => ValidationRule::new(name),
		});
	}

	rules
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn rule(name: &str) -> ValidationRule {
		ValidationRule::new(name)
	}

	fn valued(name: &str, value: &str) -> ValidationRule {
		ValidationRule::with_value(name, value)
	}

	#[rstest]
	#[case("required,min=3", vec![rule("required"), valued("min", "3")])]
	#[case("omitempty,required", vec![rule("required")])]
	#[case("", vec![])]
	#[case("omitempty", vec![])]
	#[case(",,required,", vec![rule("required")])]
	#[case("max=10", vec![valued("max", "10")])]
	#[case("oneof=a=b", vec![valued("oneof", "a=b")])]
	fn test_parse_rule_annotation(#[case] annotation: &str, #[case] expected: Vec<ValidationRule>) {
		assert_eq!(parse_rule_annotation(annotation), expected);
	}

	#[test]
	fn test_extract_without_shape_is_empty() {
		assert!(extract_validation_rules(None).is_empty());
	}

	#[test]
	fn test_extract_top_level_fields() {
		let schema = Schema::builder()
			.field("Name", "required")
			.field("Age", "required,min=3")
			.field("Note", "")
			.excluded_field("Secret")
			.build();

		let rules = extract_validation_rules(Some(&schema));

		assert_eq!(rules.len(), 2);
		assert_eq!(rules["Name"], vec![rule("required")]);
		assert_eq!(rules["Age"], vec![rule("required"), valued("min", "3")]);
		// Empty annotations and excluded fields never produce entries.
		assert!(!rules.contains_key("Note"));
		assert!(!rules.contains_key("Secret"));
	}

	#[test]
	fn test_extract_respects_renames() {
		let schema = Schema::builder()
			.renamed_field("EmailAddress", "email", "required,email")
			.build();

		let rules = extract_validation_rules(Some(&schema));

		assert!(!rules.contains_key("EmailAddress"));
		assert_eq!(rules["email"], vec![rule("required"), rule("email")]);
	}

	#[test]
	fn test_extract_nested_composites_use_dotted_keys() {
		let street = Schema::builder().field("Name", "required").build();
		let address = Schema::builder()
			.field("City", "required")
			.nested("Street", street)
			.build();
		let schema = Schema::builder()
			.field("Name", "required")
			.nested("Address", address.clone())
			.renamed_nested("Billing", "billing", address)
			.build();

		let rules = extract_validation_rules(Some(&schema));

		assert_eq!(rules["Name"], vec![rule("required")]);
		assert_eq!(rules["Address.City"], vec![rule("required")]);
		assert_eq!(rules["Address.Street.Name"], vec![rule("required")]);
		assert_eq!(rules["billing.City"], vec![rule("required")]);
		assert_eq!(rules["billing.Street.Name"], vec![rule("required")]);
	}

	#[test]
	fn test_extract_is_idempotent() {
		let schema = Schema::builder()
			.field("Name", "required,min=2")
			.nested(
				"Address",
				Schema::builder().field("City", "required").build(),
			)
			.build();

		let first = extract_validation_rules(Some(&schema));
		let second = extract_validation_rules(Some(&schema));
		assert_eq!(first, second);
	}
}
