// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use tracing::debug;

use crate::command::AuthorityCommand;
use crate::error::ExecError;
use crate::executor::AuthorityExecutor;

/// Answers existence questions by describing identities with the authority
/// tool.
///
/// Exit status 0 means the identity exists. Any other status means it does
/// not; the tool does not let us tell "not found" apart from other failures.
/// An invocation that never completed (timeout, missing binary) is an error.
pub struct IdentityOracle<E: ?Sized> {
	executor: Arc<E>,
}

impl<E: ?Sized> Clone for IdentityOracle<E> {
	fn clone(&self) -> Self {
		Self {
			executor: Arc::clone(&self.executor),
		}
	}
}

impl<E: AuthorityExecutor + ?Sized> IdentityOracle<E> {
	pub fn new(executor: Arc<E>) -> Self {
		Self { executor }
	}

	pub async fn account_exists(&self, account: &str) -> Result<bool, ExecError> {
		let command = AuthorityCommand::DescribeAccount {
			account: account.to_string(),
		};
		let exists = self.executor.execute(&command).await?.success();
		debug!(account, exists, "account lookup");
		Ok(exists)
	}

	pub async fn user_exists(&self, account: &str, user: &str) -> Result<bool, ExecError> {
		let command = AuthorityCommand::DescribeUser {
			account: account.to_string(),
			user: user.to_string(),
		};
		let exists = self.executor.execute(&command).await?.success();
		debug!(account, user, exists, "user lookup");
		Ok(exists)
	}
}
