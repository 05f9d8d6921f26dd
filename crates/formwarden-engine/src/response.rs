//! Server responses
//!
//! The JSON envelope the backend answers form submissions with, and the
//! mapping of failures onto the validator's messages.
//!
//! ```json
//! {"success": true, "message": "Logged in.", "data": {"redirect": "/"}}
//! {"success": false, "name": "VALIDATION_ERROR", "message": "Invalid input.", "data": ["Email is taken."]}
//! ```

use crate::form::{FieldErrors, FormValidator};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Message shown for any failure that carries no usable details.
pub const GENERIC_FAILURE_MESSAGE: &str = "Invalid email or password.";

/// Error category of a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorName {
	ValidationError,
	AuthError,
	NotFound,
	ServerError,
	#[serde(other)]
	Other,
}

impl fmt::Display for ErrorName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::ValidationError => "VALIDATION_ERROR",
			Self::AuthError => "AUTH_ERROR",
			Self::NotFound => "NOT_FOUND",
			Self::ServerError => "SERVER_ERROR",
			Self::Other => "OTHER",
		})
	}
}

/// Response envelope of the backend API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawResponse")]
pub enum ApiResponse {
	Success {
		message: String,
		data: Option<Value>,
	},
	Failure {
		name: ErrorName,
		message: String,
		/// Validation messages, when the backend sent a list of strings
		errors: Option<Vec<String>>,
	},
}

#[derive(Deserialize)]
struct RawResponse {
	success: bool,
	#[serde(default)]
	message: String,
	name: Option<ErrorName>,
	data: Option<Value>,
}

impl TryFrom<RawResponse> for ApiResponse {
	type Error = String;

	fn try_from(raw: RawResponse) -> Result<Self, Self::Error> {
		if raw.success {
			return Ok(Self::Success {
				message: raw.message,
				data: raw.data,
			});
		}
		let name = raw
			.name
			.ok_or_else(|| "failed response without `name`".to_string())?;
		let errors = raw.data.and_then(|data| serde_json::from_value(data).ok());
		Ok(Self::Failure {
			name,
			message: raw.message,
			errors,
		})
	}
}

impl ApiResponse {
	/// Parse a response body.
	///
	/// # Examples
	///
	/// ```
	/// use formwarden_engine::{ApiResponse, ErrorName};
	///
	/// let response = ApiResponse::from_json(
	///     r#"{"success":false,"name":"AUTH_ERROR","message":"Bad credentials"}"#,
	/// )
	/// .unwrap();
	///
	/// assert!(matches!(response, ApiResponse::Failure { name: ErrorName::AuthError, .. }));
	/// ```
	pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(body)
	}

	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success { .. })
	}

	/// Summary messages to show for this response.
	///
	/// A validation failure with a list of messages shows them; any other
	/// failure shows [`GENERIC_FAILURE_MESSAGE`].
	pub fn summary_messages(&self) -> Vec<String> {
		match self {
			Self::Success { .. } => Vec::new(),
			Self::Failure {
				name: ErrorName::ValidationError,
				errors: Some(errors),
				..
			} => errors.clone(),
			Self::Failure { .. } => vec![GENERIC_FAILURE_MESSAGE.to_string()],
		}
	}
}

impl FormValidator {
	/// Reflect a server response in the form.
	///
	/// Success clears every message; a failure replaces them with
	/// [`ApiResponse::summary_messages`] as form-level messages. Returns
	/// whether the response was a success.
	pub fn apply_response(&self, response: &ApiResponse) -> bool {
		match response {
			ApiResponse::Success { .. } => {
				self.clear_errors();
				true
			}
			ApiResponse::Failure { name, message, .. } => {
				tracing::debug!(%name, %message, "server rejected submission");
				self.set_errors(&FieldErrors::new(), &response.summary_messages());
				false
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_success() {
		let response: ApiResponse =
			serde_json::from_value(json!({"success": true, "message": "ok", "data": {"id": 1}}))
				.unwrap();
		assert_eq!(
			response,
			ApiResponse::Success {
				message: "ok".into(),
				data: Some(json!({"id": 1})),
			}
		);
		assert!(response.summary_messages().is_empty());
	}

	#[rstest]
	fn test_validation_error_with_messages() {
		let response = ApiResponse::from_json(
			r#"{"success":false,"name":"VALIDATION_ERROR","message":"Invalid","data":["Email is taken."]}"#,
		)
		.unwrap();
		assert_eq!(response.summary_messages(), vec!["Email is taken."]);
	}

	#[rstest]
	#[case(json!({"success": false, "name": "AUTH_ERROR", "message": "nope"}))]
	#[case(json!({"success": false, "name": "SERVER_ERROR", "message": "boom", "data": ["x"]}))]
	#[case(json!({"success": false, "name": "VALIDATION_ERROR", "message": "bad", "data": {"email": "x"}}))]
	#[case(json!({"success": false, "name": "RATE_LIMITED", "message": "slow down"}))]
	fn test_other_failures_map_to_generic_message(#[case] body: serde_json::Value) {
		let response: ApiResponse = serde_json::from_value(body).unwrap();
		assert_eq!(response.summary_messages(), vec![GENERIC_FAILURE_MESSAGE]);
	}

	#[rstest]
	fn test_unknown_names_parse_as_other() {
		let response: ApiResponse =
			serde_json::from_value(json!({"success": false, "name": "TEAPOT", "message": ""}))
				.unwrap();
		assert!(matches!(response, ApiResponse::Failure { name: ErrorName::Other, .. }));
	}

	#[rstest]
	fn test_failure_requires_name() {
		let result = ApiResponse::from_json(r#"{"success":false,"message":"?"}"#);
		assert!(result.is_err());
	}
}
