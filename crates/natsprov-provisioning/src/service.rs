// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::Path;
use std::sync::Arc;

use natsprov_authority::{
	AuthorityCommand, AuthorityExecutor, CredentialStore, IdentityOracle,
};
use tracing::{info, instrument, warn};

use crate::config::{ExistingUserPolicy, ProvisioningConfig};
use crate::error::{ProvisionError, Step, ToolFailure};
use crate::locks::AccountLocks;

/// Outcome of a successful provisioning call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provisioned {
	pub account: String,
	pub user: String,
	pub account_created: bool,
	pub user_created: bool,
	/// Complete bundle bytes, only available after a successful push.
	pub bundle: Vec<u8>,
}

/// Drives the ensure-account, ensure-user, issue, publish, retrieve sequence.
pub struct ProvisioningService<E: ?Sized> {
	executor: Arc<E>,
	oracle: IdentityOracle<E>,
	store: CredentialStore,
	config: ProvisioningConfig,
	locks: AccountLocks,
	bundle_locks: AccountLocks,
}

impl<E: AuthorityExecutor + ?Sized> ProvisioningService<E> {
	pub fn new(executor: Arc<E>, config: ProvisioningConfig) -> Self {
		Self {
			oracle: IdentityOracle::new(Arc::clone(&executor)),
			store: CredentialStore::new(config.creds_dir.clone()),
			executor,
			config,
			locks: AccountLocks::new(),
			bundle_locks: AccountLocks::new(),
		}
	}

	pub fn config(&self) -> &ProvisioningConfig {
		&self.config
	}

	pub fn locks(&self) -> &AccountLocks {
		&self.locks
	}

	/// Provision credentials for `user` in `account`.
	///
	/// Holds the account's lock and the bundle file's lock for the whole
	/// sequence. The bundle is only returned once the account has been pushed
	/// to the NATS server.
	#[instrument(skip_all, fields(account = %account, user = %user))]
	pub async fn provision(&self, account: &str, user: &str) -> Result<Provisioned, ProvisionError> {
		let bundle_path = self.store.bundle_path(account, user)?;

		// Account first, bundle file second; never the other way round.
		let _account_guard = self.locks.lock(account).await;
		let _bundle_guard = self.bundle_locks.lock(&bundle_path.to_string_lossy()).await;

		let result = self.run_steps(account, user, &bundle_path).await;
		match &result {
			Ok(provisioned) => info!(
				account_created = provisioned.account_created,
				user_created = provisioned.user_created,
				bytes = provisioned.bundle.len(),
				"credentials provisioned"
			),
			Err(e) => warn!(step = %e.step(), error = %e, "provisioning failed"),
		}
		result
	}

	async fn run_steps(
		&self,
		account: &str,
		user: &str,
		bundle_path: &Path,
	) -> Result<Provisioned, ProvisionError> {
		info!(step = %Step::EnsureAccount, "ensuring account");
		let account_created = self.ensure_account(account).await?;

		info!(step = %Step::EnsureUser, "ensuring user");
		let user_created = self.ensure_user(account, user).await?;

		info!(step = %Step::IssueCredential, "generating credentials");
		self.run(
			AuthorityCommand::GenerateCreds {
				account: account.to_string(),
				user: user.to_string(),
				output: bundle_path.to_path_buf(),
			},
			ProvisionError::CredentialGenerationFailed,
		)
		.await?;

		info!(step = %Step::Publish, "pushing account to NATS server");
		self.run(
			AuthorityCommand::Push {
				account: account.to_string(),
				bus_url: self.config.bus_url.clone(),
			},
			ProvisionError::PublishFailed,
		)
		.await?;

		info!(step = %Step::Retrieve, "reading credential bundle");
		let bundle = self
			.store
			.read(bundle_path)
			.await
			.map_err(ProvisionError::BundleReadFailed)?;

		Ok(Provisioned {
			account: account.to_string(),
			user: user.to_string(),
			account_created,
			user_created,
			bundle,
		})
	}

	/// Returns true if the account had to be created.
	async fn ensure_account(&self, account: &str) -> Result<bool, ProvisionError> {
		let exists = self
			.oracle
			.account_exists(account)
			.await
			.map_err(|e| ProvisionError::AccountLookupFailed(e.into()))?;
		if exists {
			return Ok(false);
		}

		info!("creating account");
		self.run(
			AuthorityCommand::AddAccount {
				account: account.to_string(),
			},
			ProvisionError::AccountCreationFailed,
		)
		.await?;

		self.run(
			AuthorityCommand::GenerateSigningKey {
				account: account.to_string(),
			},
			ProvisionError::SigningKeyGenerationFailed,
		)
		.await?;

		Ok(true)
	}

	/// Returns true if the user had to be created.
	async fn ensure_user(&self, account: &str, user: &str) -> Result<bool, ProvisionError> {
		let exists = self
			.oracle
			.user_exists(account, user)
			.await
			.map_err(|e| ProvisionError::UserLookupFailed(e.into()))?;

		if exists {
			return match self.config.existing_user {
				ExistingUserPolicy::Reuse => {
					info!("user exists, reissuing credentials");
					Ok(false)
				}
				ExistingUserPolicy::Reject => Err(ProvisionError::UserAlreadyExists {
					account: account.to_string(),
					user: user.to_string(),
				}),
			};
		}

		info!("creating user");
		self.run(
			AuthorityCommand::AddUser {
				account: account.to_string(),
				user: user.to_string(),
			},
			ProvisionError::UserCreationFailed,
		)
		.await?;

		Ok(true)
	}

	/// Run one mutating command; anything but exit 0 becomes `on_failure`.
	async fn run(
		&self,
		command: AuthorityCommand,
		on_failure: fn(ToolFailure) -> ProvisionError,
	) -> Result<(), ProvisionError> {
		let output = self
			.executor
			.execute(&command)
			.await
			.map_err(|e| on_failure(e.into()))?;

		if !output.success() {
			warn!(
				operation = command.operation(),
				status = %output.status_label(),
				stderr = %output.stderr.trim(),
				"authority command failed"
			);
			return Err(on_failure(ToolFailure::from_output(&output)));
		}

		Ok(())
	}
}
