// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::store::IdentifierField;

/// An authority tool invocation that could not run to completion.
///
/// A non-zero exit status is not an error; it is reported through
/// [`crate::CommandOutput`].
#[derive(Debug, Error)]
pub enum ExecError {
	#[error("authority tool '{program}' not found")]
	NotInstalled { program: String },

	#[error("failed to run authority tool: {0}")]
	Spawn(#[from] std::io::Error),

	#[error("authority tool did not finish within {}s", .after.as_secs_f64())]
	Timeout { after: Duration },
}

impl ExecError {
	pub fn is_timeout(&self) -> bool {
		matches!(self, ExecError::Timeout { .. })
	}
}

/// A caller-supplied account or user name that cannot be used safely.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field} name: {reason}")]
pub struct InvalidIdentifier {
	pub field: IdentifierField,
	pub reason: &'static str,
}

#[derive(Debug, Error)]
pub enum CredentialStoreError {
	#[error("credential bundle not found at {}", .path.display())]
	NotFound { path: PathBuf },

	#[error("failed to read credential bundle {}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_timeout_display_mentions_bound() {
		let err = ExecError::Timeout {
			after: Duration::from_millis(1500),
		};
		assert!(err.is_timeout());
		assert_eq!(err.to_string(), "authority tool did not finish within 1.5s");
	}

	#[test]
	fn test_invalid_identifier_display() {
		let err = InvalidIdentifier {
			field: IdentifierField::User,
			reason: "must not contain path separators",
		};
		assert_eq!(
			err.to_string(),
			"invalid user name: must not contain path separators"
		);
	}
}
