//! Orchestration of the build → decode → validate → extension pipeline.

use crate::defaults::{
	DefaultFormDataDecoder, DefaultFormDataProvider, DefaultFormDataValidator, NoopRuleResolver,
};
use crate::error::{FormError, FormResult};
use crate::extension::{ExtensionRegistry, FormExtension};
use crate::extractor::extract_validation_rules;
use crate::form::{Form, FormData};
use crate::request::{FormValues, Request};
use crate::strategy::{FormDataDecoder, FormDataProvider, FormDataValidator, RuleResolver};
use crate::validation::{ValidationInfo, ValidationRule};
use hyper::Method;
use std::collections::HashMap;
use std::sync::Arc;

/// Turns an incoming request into a validated [`Form`].
///
/// The handler is stateless: it holds only immutable collaborator references
/// and the extension registry wired at construction, so one instance can
/// serve concurrent requests. Every phase of one call runs to completion
/// before the next starts, and no form is shared across requests.
pub struct FormHandler {
	provider: Option<Arc<dyn FormDataProvider>>,
	decoder: Option<Arc<dyn FormDataDecoder>>,
	validator: Option<Arc<dyn FormDataValidator>>,
	default_provider: Arc<dyn FormDataProvider>,
	default_decoder: Arc<dyn FormDataDecoder>,
	default_validator: Arc<dyn FormDataValidator>,
	rule_resolver: Arc<dyn RuleResolver>,
	extensions: ExtensionRegistry,
}

impl FormHandler {
	pub fn builder() -> FormHandlerBuilder {
		FormHandlerBuilder::default()
	}

	/// Handles the request according to its method: POST runs the submitted
	/// pipeline against the body values, everything else yields an
	/// unsubmitted form straight from the build phase.
	pub async fn handle_form(&self, req: &Request) -> FormResult<Form> {
		let submitted = req.method() == Method::POST;

		let form = self.build_form(req, submitted).await?;

		if submitted {
			return self.handle_submitted(req, form, Method::POST).await;
		}

		Ok(form)
	}

	/// Builds an unsubmitted form. Extension data is still acquired (not
	/// decoded or validated) so that every extension's defaults are present
	/// even before submission.
	pub async fn handle_unsubmitted_form(&self, req: &Request) -> FormResult<Form> {
		let mut form = self.build_form(req, false).await?;

		self.process_extensions(req, &FormValues::new(), &mut form)
			.await
			.map_err(|err| self.fail("form-extensions", err))?;

		Ok(form)
	}

	/// Treats the request as a POST submission regardless of its method.
	pub async fn handle_submitted_form(&self, req: &Request) -> FormResult<Form> {
		let form = self.build_form(req, true).await?;
		self.handle_submitted(req, form, Method::POST).await
	}

	/// Treats the request as a GET submission: values come from the query
	/// string instead of the body.
	pub async fn handle_submitted_get_form(&self, req: &Request) -> FormResult<Form> {
		let form = self.build_form(req, true).await?;
		self.handle_submitted(req, form, Method::GET).await
	}

	/// Build phase: extension rules first, then primary data and its rules,
	/// merged with the primary set winning on key collisions.
	async fn build_form(&self, req: &Request, submitted: bool) -> FormResult<Form> {
		let validation_rules = self
			.collect_extension_validation_rules(req)
			.await
			.map_err(|err| self.fail("form-extensions", err))?;

		let form_data = self
			.form_data(req, self.provider.as_ref())
			.await
			.map_err(|err| self.fail("form-building", err))?;

		let main_rules = extract_validation_rules(form_data.shape.as_ref());
		let validation_rules = merge_validation_rules(validation_rules, main_rules);

		let mut form = Form::new(submitted, validation_rules);
		form.set_data(form_data);
		Ok(form)
	}

	/// Collects the rules declared by every registered extension's data
	/// shape into a single mapping, in registration order.
	async fn collect_extension_validation_rules(
		&self,
		req: &Request,
	) -> anyhow::Result<HashMap<String, Vec<ValidationRule>>> {
		let mut validation_rules = HashMap::new();

		for extension in self.extensions.iter() {
			let data = self.form_data(req, extension.provider()).await?;
			let extension_rules = extract_validation_rules(data.shape.as_ref());
			validation_rules = merge_validation_rules(validation_rules, extension_rules);
		}

		Ok(validation_rules)
	}

	/// Submitted pipeline: extract values, decode, validate, then run the
	/// extension phase against the same value set.
	async fn handle_submitted(
		&self,
		req: &Request,
		mut form: Form,
		method: Method,
	) -> FormResult<Form> {
		let values = url_values(req, &method)
			.map_err(|err| self.fail("post-value-processing", err))?;

		let data = self
			.decode(req, &values, form.data().clone(), self.decoder.as_ref())
			.await
			.map_err(|err| self.fail("form-decoding", err))?;
		form.set_data(data);

		let validation_info = self
			.validate(req, form.data(), self.validator.as_ref())
			.await
			.map_err(|err| self.fail("form-validation", err))?
			.unwrap_or_default();
		form.set_validation_info(validation_info);

		self.process_extensions(req, &values, &mut form)
			.await
			.map_err(|err| self.fail("form-extensions", err))?;

		Ok(form)
	}

	/// Extension phase, in registration order. The first failing extension
	/// aborts the whole phase; later extensions are not touched.
	async fn process_extensions(
		&self,
		req: &Request,
		values: &FormValues,
		form: &mut Form,
	) -> anyhow::Result<()> {
		for extension in self.extensions.iter() {
			self.process_extension(req, values, extension, form).await?;
		}

		Ok(())
	}

	async fn process_extension(
		&self,
		req: &Request,
		values: &FormValues,
		extension: &FormExtension,
		form: &mut Form,
	) -> anyhow::Result<()> {
		let data = self.form_data(req, extension.provider()).await?;
		form.insert_extension_data(extension.name(), data.clone());

		if !form.is_submitted() {
			return Ok(());
		}

		// The stored entry is replaced whole with the decoded result.
		let data = self.decode(req, values, data, extension.decoder()).await?;
		form.insert_extension_data(extension.name(), data.clone());

		let validation_info = self
			.validate(req, &data, extension.validator())
			.await?
			.unwrap_or_default();
		form.validation_info_mut()
			.append_general_errors(validation_info.general_errors().to_vec());
		form.validation_info_mut()
			.append_field_errors(validation_info.field_errors().clone());

		Ok(())
	}

	async fn form_data(
		&self,
		req: &Request,
		provider: Option<&Arc<dyn FormDataProvider>>,
	) -> anyhow::Result<FormData> {
		let provider = provider.unwrap_or(&self.default_provider);
		provider.form_data(req).await
	}

	async fn decode(
		&self,
		req: &Request,
		values: &FormValues,
		data: FormData,
		decoder: Option<&Arc<dyn FormDataDecoder>>,
	) -> anyhow::Result<FormData> {
		let decoder = decoder.unwrap_or(&self.default_decoder);
		decoder.decode(req, values, data).await
	}

	async fn validate(
		&self,
		req: &Request,
		data: &FormData,
		validator: Option<&Arc<dyn FormDataValidator>>,
	) -> anyhow::Result<Option<ValidationInfo>> {
		let validator = validator.unwrap_or(&self.default_validator);
		validator.validate(req, self.rule_resolver.as_ref(), data).await
	}

	fn fail(&self, phase: &'static str, err: anyhow::Error) -> FormError {
		tracing::error!(form_handler = phase, "{err}");
		FormError::new(err.to_string())
	}
}

/// GET submissions read the query string, everything else the parsed body.
fn url_values(req: &Request, method: &Method) -> anyhow::Result<FormValues> {
	if method == Method::GET {
		return Ok(req.query_values());
	}

	req.body_form_values()
}

/// Later mapping wins on key collisions. The handler merges extension rules
/// first and the primary rules second, so a primary field path shadows an
/// identically keyed extension rule set.
fn merge_validation_rules(
	mut first: HashMap<String, Vec<ValidationRule>>,
	second: HashMap<String, Vec<ValidationRule>>,
) -> HashMap<String, Vec<ValidationRule>> {
	for (key, rules) in second {
		first.insert(key, rules);
	}
	first
}

/// Wires a [`FormHandler`]. Unset strategies fall back per call site; unset
/// defaults are filled with the crate's default implementations.
#[derive(Default)]
pub struct FormHandlerBuilder {
	provider: Option<Arc<dyn FormDataProvider>>,
	decoder: Option<Arc<dyn FormDataDecoder>>,
	validator: Option<Arc<dyn FormDataValidator>>,
	default_provider: Option<Arc<dyn FormDataProvider>>,
	default_decoder: Option<Arc<dyn FormDataDecoder>>,
	default_validator: Option<Arc<dyn FormDataValidator>>,
	rule_resolver: Option<Arc<dyn RuleResolver>>,
	extensions: ExtensionRegistry,
}

impl FormHandlerBuilder {
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

	pub fn with_default_provider(mut self, provider: Arc<dyn FormDataProvider>) -> Self {
		self.default_provider = Some(provider);
		self
	}

	pub fn with_default_decoder(mut self, decoder: Arc<dyn FormDataDecoder>) -> Self {
		self.default_decoder = Some(decoder);
		self
	}

	pub fn with_default_validator(mut self, validator: Arc<dyn FormDataValidator>) -> Self {
		self.default_validator = Some(validator);
		self
	}

	pub fn with_rule_resolver(mut self, resolver: Arc<dyn RuleResolver>) -> Self {
		self.rule_resolver = Some(resolver);
		self
	}

	pub fn register_extension(mut self, extension: FormExtension) -> Self {
		self.extensions.register(extension);
		self
	}

	pub fn build(self) -> FormHandler {
		FormHandler {
			provider: self.provider,
			decoder: self.decoder,
			validator: self.validator,
			default_provider: self
				.default_provider
				.unwrap_or_else(|| Arc::new(DefaultFormDataProvider)),
			default_decoder: self
				.default_decoder
				.unwrap_or_else(|| Arc::new(DefaultFormDataDecoder)),
			default_validator: self
				.default_validator
				.unwrap_or_else(|| Arc::new(DefaultFormDataValidator)),
			rule_resolver: self
				.rule_resolver
				.unwrap_or_else(|| Arc::new(NoopRuleResolver)),
			extensions: self.extensions,
		}
	}
}
