//! # formflow
//!
//! A pluggable form-processing pipeline for request handlers: one call turns
//! an incoming HTTP request into a validated, typed [`Form`] result.
//!
//! The pipeline solves three problems together:
//! - acquiring an initial/default data representation before submission,
//! - decoding submitted request values into that representation,
//! - validating the representation against rules declared on its [`Schema`],
//!
//! while any number of independently pluggable sub-forms ([`FormExtension`])
//! participate in the same request lifecycle with their own data, decoding
//! and validation logic.
//!
//! ## Example
//!
//! ```
//! use formflow::{FormHandler, Request};
//! use hyper::Method;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let handler = FormHandler::builder().build();
//!
//! let request = Request::builder()
//! 	.method(Method::POST)
//! 	.uri("/signup")
//! 	.body(&b"name=John"[..])
//! 	.build()
//! 	.unwrap();
//!
//! let form = handler.handle_form(&request).await.unwrap();
//! assert!(form.is_submitted());
//! assert_eq!(form.data().value["name"], "John");
//! # }
//! ```

pub mod defaults;
pub mod error;
pub mod extension;
pub mod extractor;
pub mod form;
pub mod handler;
pub mod request;
pub mod schema;
pub mod strategy;
pub mod validation;

pub use defaults::{
	DefaultFormDataDecoder, DefaultFormDataProvider, DefaultFormDataValidator, NoopRuleResolver,
};
pub use error::{FormError, FormResult};
pub use extension::{ExtensionRegistry, FormExtension};
pub use extractor::extract_validation_rules;
pub use form::{Form, FormData};
pub use handler::{FormHandler, FormHandlerBuilder};
pub use request::{FormValues, Request, RequestBuilder};
pub use schema::{Exposure, FieldKind, FieldSpec, Schema, SchemaBuilder};
pub use strategy::{FormDataDecoder, FormDataProvider, FormDataValidator, RuleResolver};
pub use validation::{ValidationInfo, ValidationRule};
