// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{
	http::{header, StatusCode},
	response::{IntoResponse, Response},
};
use natsprov_authority::InvalidIdentifier;
use natsprov_provisioning::ProvisionError;
use thiserror::Error;

/// Errors returned by HTTP handlers. Every body is plain text.
#[derive(Debug, Error)]
pub enum ApiError {
	#[error("Both 'account' and 'user' parameters are required")]
	MissingParameters,

	#[error("Account and user names cannot be empty")]
	EmptyParameters,

	#[error(transparent)]
	InvalidIdentifier(#[from] InvalidIdentifier),

	#[error("Error generating configuration: {0}")]
	Provision(ProvisionError),

	#[error("Error generating configuration: {0}")]
	Internal(String),
}

impl From<ProvisionError> for ApiError {
	fn from(e: ProvisionError) -> Self {
		match e {
			ProvisionError::InvalidIdentifier(invalid) => ApiError::InvalidIdentifier(invalid),
			other => ApiError::Provision(other),
		}
	}
}

impl ApiError {
	pub fn status(&self) -> StatusCode {
		match self {
			ApiError::MissingParameters | ApiError::EmptyParameters | ApiError::InvalidIdentifier(_) => {
				StatusCode::BAD_REQUEST
			}
			ApiError::Provision(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = self.status();
		if status.is_server_error() {
			tracing::error!(error = %self, "provisioning request failed");
		} else {
			tracing::debug!(error = %self, "rejected provisioning request");
		}

		(
			status,
			[(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
			self.to_string(),
		)
			.into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use natsprov_authority::IdentifierField;
	use natsprov_provisioning::ToolFailure;

	#[test]
	fn test_request_errors_are_bad_request() {
		assert_eq!(ApiError::MissingParameters.status(), StatusCode::BAD_REQUEST);
		assert_eq!(ApiError::EmptyParameters.status(), StatusCode::BAD_REQUEST);
	}

	#[test]
	fn test_invalid_identifier_from_service_is_bad_request() {
		let invalid = InvalidIdentifier {
			field: IdentifierField::User,
			reason: "must not contain path separators",
		};
		let err = ApiError::from(ProvisionError::InvalidIdentifier(invalid));
		assert!(matches!(err, ApiError::InvalidIdentifier(_)));
		assert_eq!(err.status(), StatusCode::BAD_REQUEST);
	}

	#[test]
	fn test_tool_failure_body_includes_stderr() {
		let err = ApiError::from(ProvisionError::PublishFailed(ToolFailure::Exit {
			status: Some(1),
			stderr: "connection refused\n".to_string(),
		}));
		assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

		let body = err.to_string();
		assert!(body.starts_with("Error generating configuration: "));
		assert!(body.contains("failed to push account to NATS server"));
		assert!(body.contains("connection refused"));
	}

	#[test]
	fn test_existing_user_rejection_is_server_error() {
		let err = ApiError::from(ProvisionError::UserAlreadyExists {
			account: "acme".to_string(),
			user: "alice".to_string(),
		});
		assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
		assert!(err.to_string().contains("already exists"));
	}
}
