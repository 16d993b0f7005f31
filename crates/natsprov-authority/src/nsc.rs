// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, trace, warn};

use crate::error::ExecError;
use crate::executor::{AuthorityExecutor, CommandOutput};

pub const DEFAULT_PROGRAM: &str = "nsc";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Authority executor that spawns the `nsc` CLI.
#[derive(Debug, Clone)]
pub struct NscExecutor {
	program: PathBuf,
	timeout: Duration,
}

impl NscExecutor {
	pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
		Self {
			program: program.into(),
			timeout,
		}
	}

	pub fn program(&self) -> &Path {
		&self.program
	}

	pub fn timeout(&self) -> Duration {
		self.timeout
	}
}

impl Default for NscExecutor {
	fn default() -> Self {
		Self::new(DEFAULT_PROGRAM, DEFAULT_TIMEOUT)
	}
}

#[async_trait]
impl AuthorityExecutor for NscExecutor {
	async fn run(&self, args: &[String]) -> Result<CommandOutput, ExecError> {
		let mut cmd = Command::new(&self.program);
		cmd.args(args)
			.stdin(Stdio::null())
			.stdout(Stdio::piped())
			.stderr(Stdio::piped())
			.kill_on_drop(true);

		trace!(
				cmd = %format!("{} {}", self.program.display(), args.join(" ")),
				"running authority command"
		);

		let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
			Ok(result) => result.map_err(|e| {
				if e.kind() == std::io::ErrorKind::NotFound {
					warn!(program = %self.program.display(), "authority tool not found");
					ExecError::NotInstalled {
						program: self.program.display().to_string(),
					}
				} else {
					ExecError::Spawn(e)
				}
			})?,
			Err(_) => {
				warn!(
						timeout_ms = self.timeout.as_millis() as u64,
						args = %args.join(" "),
						"authority command timed out"
				);
				return Err(ExecError::Timeout {
					after: self.timeout,
				});
			}
		};

		let result = CommandOutput {
			status: output.status.code(),
			stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
			stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
		};

		debug!(
				args = %args.join(" "),
				status = %result.status_label(),
				"authority command finished"
		);

		Ok(result)
	}
}

#[cfg(all(test, unix))]
mod tests {
	use super::*;

	fn sh(script: &str) -> Vec<String> {
		vec!["-c".to_string(), script.to_string()]
	}

	/// Test: both output streams are captured and a non-zero exit is not an error.
	#[tokio::test]
	async fn test_non_zero_exit_is_reported_not_raised() {
		let executor = NscExecutor::new("sh", Duration::from_secs(5));
		let output = executor
			.run(&sh("echo out; echo err >&2; exit 3"))
			.await
			.unwrap();

		assert_eq!(output.status, Some(3));
		assert!(!output.success());
		assert_eq!(output.stdout, "out\n");
		assert_eq!(output.stderr, "err\n");
	}

	#[tokio::test]
	async fn test_zero_exit_is_success() {
		let executor = NscExecutor::new("sh", Duration::from_secs(5));
		let output = executor.run(&sh("exit 0")).await.unwrap();
		assert!(output.success());
	}

	/// Test: a hung process is bounded by the configured timeout.
	#[tokio::test]
	async fn test_timeout_is_distinct_error() {
		let executor = NscExecutor::new("sh", Duration::from_millis(100));
		let started = std::time::Instant::now();
		let err = executor.run(&sh("sleep 10")).await.unwrap_err();

		assert!(err.is_timeout());
		assert!(started.elapsed() < Duration::from_secs(5));
	}

	#[tokio::test]
	async fn test_missing_program_is_not_installed() {
		let executor = NscExecutor::new("/nonexistent/bin/nsc", Duration::from_secs(5));
		let err = executor.run(&sh("true")).await.unwrap_err();
		assert!(matches!(err, ExecError::NotInstalled { .. }));
	}

	#[test]
	fn test_defaults() {
		let executor = NscExecutor::default();
		assert_eq!(executor.program(), Path::new("nsc"));
		assert_eq!(executor.timeout(), DEFAULT_TIMEOUT);
	}
}
