//! Named sub-forms that participate in the request lifecycle.

use crate::strategy::{FormDataDecoder, FormDataProvider, FormDataValidator};
use std::sync::Arc;

/// A pluggable sub-form. Each capability slot is optional and inspectable;
/// an unset slot makes the handler fall back to the corresponding
/// process-wide default, independently of the other slots.
#[derive(Clone)]
pub struct FormExtension {
	name: String,
	provider: Option<Arc<dyn FormDataProvider>>,
	decoder: Option<Arc<dyn FormDataDecoder>>,
	validator: Option<Arc<dyn FormDataValidator>>,
}

impl FormExtension {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			provider: None,
			decoder: None,
			validator: None,
		}
	}

	pub fn with_provider(mut self, provider: Arc<dyn FormDataProvider>) -> Self {
		self.provider = Some(provider);
		self
	}

	pub fn with_decoder(mut self, decoder: Arc<dyn FormDataDecoder>) -> Self {
		self.decoder = Some(decoder);
		self
	}

	pub fn with_validator(mut self, validator: Arc<dyn FormDataValidator>) -> Self {
		self.validator = Some(validator);
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn provider(&self) -> Option<&Arc<dyn FormDataProvider>> {
		self.provider.as_ref()
	}

	pub fn decoder(&self) -> Option<&Arc<dyn FormDataDecoder>> {
		self.decoder.as_ref()
	}

	pub fn validator(&self) -> Option<&Arc<dyn FormDataValidator>> {
		self.validator.as_ref()
	}
}

impl std::fmt::Debug for FormExtension {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FormExtension")
			.field("name", &self.name)
			.field("provider", &self.provider.is_some())
			.field("decoder", &self.decoder.is_some())
			.field("validator", &self.validator.is_some())
			.finish()
	}
}

/// Registry of extensions, iterated in registration order during request
/// processing. Registration order is part of the contract: it fixes the
/// order of accumulated field errors and which extension's failure surfaces
/// first. Registering a name twice replaces the earlier extension in place,
/// keeping its position.
///
/// The registry is set up once at construction and read-only per request.
#[derive(Clone, Debug, Default)]
pub struct ExtensionRegistry {
	extensions: Vec<FormExtension>,
}

impl ExtensionRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, extension: FormExtension) {
		match self
			.extensions
			.iter_mut()
			.find(|e| e.name() == extension.name())
		{
			Some(slot) => *slot = extension,
			None => self.extensions.push(extension),
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = &FormExtension> {
		self.extensions.iter()
	}

	pub fn len(&self) -> usize {
		self.extensions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.extensions.is_empty()
	}
}
