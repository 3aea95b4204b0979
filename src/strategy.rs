//! The three pluggable capabilities of the pipeline and the rule-engine seam.
//!
//! The handler and every extension interact with form data exclusively
//! through these traits; each one has a process-wide default implementation
//! (see [`crate::defaults`]) that is substituted transparently whenever a
//! specific implementation is absent. Collaborators may perform I/O; they
//! are dropped mid-flight when the request is cancelled.

use crate::form::FormData;
use crate::request::{FormValues, Request};
use crate::validation::{ValidationInfo, ValidationRule};
use async_trait::async_trait;
use serde_json::Value;

/// Produces the initial data representation for a form before submission.
#[async_trait]
pub trait FormDataProvider: Send + Sync {
	async fn form_data(&self, req: &Request) -> anyhow::Result<FormData>;
}

/// Merges submitted request values into an existing data representation.
#[async_trait]
pub trait FormDataDecoder: Send + Sync {
	async fn decode(
		&self,
		req: &Request,
		values: &FormValues,
		data: FormData,
	) -> anyhow::Result<FormData>;
}

/// Validates a decoded data representation.
///
/// Returning `Ok(None)` means "nothing to report" and is normalized by the
/// handler to an empty [`ValidationInfo`]; it is not an error.
#[async_trait]
pub trait FormDataValidator: Send + Sync {
	async fn validate(
		&self,
		req: &Request,
		resolver: &dyn RuleResolver,
		data: &FormData,
	) -> anyhow::Result<Option<ValidationInfo>>;
}

/// The opaque rule engine. The pipeline never interprets rule names or
/// values itself; it hands the resolver to whichever validator runs.
pub trait RuleResolver: Send + Sync {
	/// Checks one rule against the value found at the rule's field path
	/// (`None` when the field is absent). Returns an error message on
	/// failure, `None` when the check passes.
	fn check(&self, rule: &ValidationRule, value: Option<&Value>) -> Option<String>;
}
