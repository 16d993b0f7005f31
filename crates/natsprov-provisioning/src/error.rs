// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;
use std::time::Duration;

use natsprov_authority::{CommandOutput, CredentialStoreError, ExecError, InvalidIdentifier};

/// The five provisioning states, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
	EnsureAccount,
	EnsureUser,
	IssueCredential,
	Publish,
	Retrieve,
}

impl Step {
	pub fn as_str(&self) -> &'static str {
		match self {
			Step::EnsureAccount => "ensure_account",
			Step::EnsureUser => "ensure_user",
			Step::IssueCredential => "issue_credential",
			Step::Publish => "publish",
			Step::Retrieve => "retrieve",
		}
	}
}

impl fmt::Display for Step {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Why an authority tool call did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolFailure {
	#[error("exit status {}{}", status_label(.status), stderr_suffix(.stderr))]
	Exit { status: Option<i32>, stderr: String },

	#[error("timed out after {}s", .after.as_secs_f64())]
	Timeout { after: Duration },

	#[error("{reason}")]
	Unavailable { reason: String },
}

fn status_label(status: &Option<i32>) -> String {
	match status {
		Some(code) => code.to_string(),
		None => "signal".to_string(),
	}
}

fn stderr_suffix(stderr: &str) -> String {
	let trimmed = stderr.trim();
	if trimmed.is_empty() {
		String::new()
	} else {
		format!(": {trimmed}")
	}
}

impl ToolFailure {
	pub fn from_output(output: &CommandOutput) -> Self {
		ToolFailure::Exit {
			status: output.status,
			stderr: output.stderr.clone(),
		}
	}

	pub fn is_timeout(&self) -> bool {
		matches!(self, ToolFailure::Timeout { .. })
	}
}

impl From<ExecError> for ToolFailure {
	fn from(e: ExecError) -> Self {
		match e {
			ExecError::Timeout { after } => ToolFailure::Timeout { after },
			other => ToolFailure::Unavailable {
				reason: other.to_string(),
			},
		}
	}
}

/// Errors that can occur while provisioning credentials.
///
/// Every failure is terminal for the request; nothing is retried or rolled
/// back.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
	#[error(transparent)]
	InvalidIdentifier(#[from] InvalidIdentifier),

	#[error("failed to look up account: {0}")]
	AccountLookupFailed(ToolFailure),

	#[error("failed to create account: {0}")]
	AccountCreationFailed(ToolFailure),

	#[error("failed to generate signing key: {0}")]
	SigningKeyGenerationFailed(ToolFailure),

	#[error("failed to look up user: {0}")]
	UserLookupFailed(ToolFailure),

	#[error("user {user} already exists in account {account}")]
	UserAlreadyExists { account: String, user: String },

	#[error("failed to create user: {0}")]
	UserCreationFailed(ToolFailure),

	#[error("failed to generate credentials: {0}")]
	CredentialGenerationFailed(ToolFailure),

	#[error("failed to push account to NATS server: {0}")]
	PublishFailed(ToolFailure),

	#[error("failed to read credential bundle: {0}")]
	BundleReadFailed(#[source] CredentialStoreError),
}

impl ProvisionError {
	/// The step the failure occurred in. Identifier validation happens
	/// before the first step and is reported as [`Step::EnsureAccount`].
	pub fn step(&self) -> Step {
		match self {
			ProvisionError::InvalidIdentifier(_)
			| ProvisionError::AccountLookupFailed(_)
			| ProvisionError::AccountCreationFailed(_)
			| ProvisionError::SigningKeyGenerationFailed(_) => Step::EnsureAccount,
			ProvisionError::UserLookupFailed(_)
			| ProvisionError::UserAlreadyExists { .. }
			| ProvisionError::UserCreationFailed(_) => Step::EnsureUser,
			ProvisionError::CredentialGenerationFailed(_) => Step::IssueCredential,
			ProvisionError::PublishFailed(_) => Step::Publish,
			ProvisionError::BundleReadFailed(_) => Step::Retrieve,
		}
	}

	pub fn tool_failure(&self) -> Option<&ToolFailure> {
		match self {
			ProvisionError::AccountLookupFailed(f)
			| ProvisionError::AccountCreationFailed(f)
			| ProvisionError::SigningKeyGenerationFailed(f)
			| ProvisionError::UserLookupFailed(f)
			| ProvisionError::UserCreationFailed(f)
			| ProvisionError::CredentialGenerationFailed(f)
			| ProvisionError::PublishFailed(f) => Some(f),
			_ => None,
		}
	}

	/// True when an authority tool call exceeded its time bound.
	pub fn is_timeout(&self) -> bool {
		self.tool_failure().is_some_and(ToolFailure::is_timeout)
	}
}
