/// Uniform error returned by every form handler operation.
///
/// Collaborators (providers, decoders, validators and extensions) report
/// failures as plain [`anyhow::Error`]s; the handler wraps each one into
/// this single kind, carrying only the underlying human-readable message.
/// There is no structured error code in the contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("form processing error: {message}")]
pub struct FormError {
	message: String,
}

impl FormError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}

	/// The underlying collaborator message, without the wrapping prefix.
	pub fn message(&self) -> &str {
		&self.message
	}
}

pub type FormResult<T> = Result<T, FormError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_form_error_wraps_message() {
		let err = FormError::new("decoder exploded");
		assert_eq!(err.message(), "decoder exploded");
		assert_eq!(err.to_string(), "form processing error: decoder exploded");
	}
}
