//! Declarative description of a form's backing data shape.
//!
//! Instead of inspecting live values at runtime, every data shape registers
//! its fields once through [`SchemaBuilder`]: the declared identifier, an
//! optional exposed-name override, an exclusion marker, the rule annotation
//! for scalar fields and a nested [`Schema`] for composite fields. The rule
//! extractor consumes this description and re-derives the same rule mapping
//! every time a form is built, so rules never drift from the fields they
//! describe.

/// How a declared field is exposed to decoding and rule extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exposure {
	/// The declared identifier is used as-is.
	Declared,
	/// The field is exposed under a different name.
	Renamed(String),
	/// The field does not participate in the form at all.
	Excluded,
}

/// The shape of a single declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
	/// A leaf value carrying a rule annotation with the grammar
	/// `token(,token)*` where `token := ruleName | ruleName=ruleValue`.
	Scalar { rules: String },
	/// A nested composite; rule keys produced inside it are prefixed with
	/// `<exposed name>.` by the extractor.
	Composite(Schema),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
	name: String,
	exposure: Exposure,
	kind: FieldKind,
}

impl FieldSpec {
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The name under which the field is exposed, or `None` for excluded
	/// fields.
	pub fn exposed_name(&self) -> Option<&str> {
		match &self.exposure {
			Exposure::Declared => Some(&self.name),
			Exposure::Renamed(name) => Some(name),
			Exposure::Excluded => None,
		}
	}

	pub fn kind(&self) -> &FieldKind {
		&self.kind
	}
}

/// An ordered list of declared fields. Declaration order is preserved and is
/// the order in which the extractor walks the shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
	fields: Vec<FieldSpec>,
}

impl Schema {
	pub fn builder() -> SchemaBuilder {
		SchemaBuilder::default()
	}

	pub fn fields(&self) -> &[FieldSpec] {
		&self.fields
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}
}

/// Builder for [`Schema`]. Fields are recorded in call order.
///
/// ```
/// use formflow::Schema;
///
/// let address = Schema::builder()
/// 	.field("Street", "required")
/// 	.field("City", "required")
/// 	.build();
///
/// let schema = Schema::builder()
/// 	.field("Name", "required,min=3")
/// 	.renamed_field("EmailAddress", "email", "required,email")
/// 	.excluded_field("Internal")
/// 	.nested("Address", address)
/// 	.build();
///
/// assert_eq!(schema.fields().len(), 4);
/// ```
#[derive(Debug, Default)]
pub struct SchemaBuilder {
	fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
	/// Declares a scalar field exposed under its own identifier.
	pub fn field(mut self, name: impl Into<String>, rules: impl Into<String>) -> Self {
		self.fields.push(FieldSpec {
			name: name.into(),
			exposure: Exposure::Declared,
			kind: FieldKind::Scalar {
				rules: rules.into(),
			},
		});
		self
	}

	/// Declares a scalar field exposed under an overridden name.
	pub fn renamed_field(
		mut self,
		name: impl Into<String>,
		exposed: impl Into<String>,
		rules: impl Into<String>,
	) -> Self {
		self.fields.push(FieldSpec {
			name: name.into(),
			exposure: Exposure::Renamed(exposed.into()),
			kind: FieldKind::Scalar {
				rules: rules.into(),
			},
		});
		self
	}

	/// Declares a field that is skipped entirely by decoding and extraction.
	pub fn excluded_field(mut self, name: impl Into<String>) -> Self {
		self.fields.push(FieldSpec {
			name: name.into(),
			exposure: Exposure::Excluded,
			kind: FieldKind::Scalar {
				rules: String::new(),
			},
		});
		self
	}

	/// Declares a nested composite field. A reference to a composite and a
	/// directly embedded composite are described identically: the nested
	/// schema stands in for the zero-valued instance.
	pub fn nested(mut self, name: impl Into<String>, schema: Schema) -> Self {
		self.fields.push(FieldSpec {
			name: name.into(),
			exposure: Exposure::Declared,
			kind: FieldKind::Composite(schema),
		});
		self
	}

	/// Declares a nested composite field exposed under an overridden name.
	pub fn renamed_nested(
		mut self,
		name: impl Into<String>,
		exposed: impl Into<String>,
		schema: Schema,
	) -> Self {
		self.fields.push(FieldSpec {
			name: name.into(),
			exposure: Exposure::Renamed(exposed.into()),
			kind: FieldKind::Composite(schema),
		});
		self
	}

	pub fn build(self) -> Schema {
		Schema {
			fields: self.fields,
		}
	}
}
