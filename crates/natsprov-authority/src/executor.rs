// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use async_trait::async_trait;

use crate::command::AuthorityCommand;
use crate::error::ExecError;

/// Captured result of a single authority tool invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
	/// Exit code, or `None` if the process was terminated by a signal.
	pub status: Option<i32>,
	pub stdout: String,
	pub stderr: String,
}

impl CommandOutput {
	pub fn success(&self) -> bool {
		self.status == Some(0)
	}

	/// Human readable status, `"signal"` when no exit code is available.
	pub fn status_label(&self) -> String {
		match self.status {
			Some(code) => code.to_string(),
			None => "signal".to_string(),
		}
	}
}

/// Trait abstracting authority tool invocations for testability.
///
/// Implementations run exactly one invocation per call and capture both
/// output streams in full. A non-zero exit is returned as `Ok`.
#[async_trait]
pub trait AuthorityExecutor: Send + Sync {
	/// Run the authority tool with the given argument vector.
	async fn run(&self, args: &[String]) -> Result<CommandOutput, ExecError>;

	/// Run a typed authority command.
	async fn execute(&self, command: &AuthorityCommand) -> Result<CommandOutput, ExecError> {
		self.run(&command.args()).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_success_requires_zero_status() {
		let ok = CommandOutput {
			status: Some(0),
			..Default::default()
		};
		let failed = CommandOutput {
			status: Some(1),
			..Default::default()
		};
		let killed = CommandOutput::default();

		assert!(ok.success());
		assert!(!failed.success());
		assert!(!killed.success());
	}

	#[test]
	fn test_status_label() {
		let output = CommandOutput {
			status: Some(3),
			..Default::default()
		};
		assert_eq!(output.status_label(), "3");
		assert_eq!(CommandOutput::default().status_label(), "signal");
	}
}
