// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

/// What to do when the requested user already exists in the account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExistingUserPolicy {
	/// Skip user creation and issue a fresh bundle for the existing user.
	#[default]
	Reuse,
	/// Fail the request before any mutation.
	Reject,
}

#[derive(Debug, Clone)]
pub struct ProvisioningConfig {
	/// NATS server URL passed to `nsc push -u`.
	pub bus_url: String,
	/// Directory the authority tool writes bundles into.
	pub creds_dir: PathBuf,
	pub existing_user: ExistingUserPolicy,
}

impl Default for ProvisioningConfig {
	fn default() -> Self {
		Self {
			bus_url: "nats://localhost:4222".to_string(),
			creds_dir: PathBuf::from("./"),
			existing_user: ExistingUserPolicy::Reuse,
		}
	}
}
