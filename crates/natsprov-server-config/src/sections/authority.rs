// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authority tool (nsc) configuration.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

const DEFAULT_PROGRAM: &str = "nsc";
const DEFAULT_BUS_URL: &str = "nats://localhost:4222";
const DEFAULT_CREDS_DIR: &str = "./";
const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;

/// Policy when the requested user already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExistingUserPolicy {
	#[default]
	Reuse,
	Reject,
}

impl FromStr for ExistingUserPolicy {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"reuse" => Ok(ExistingUserPolicy::Reuse),
			"reject" => Ok(ExistingUserPolicy::Reject),
			other => Err(format!("expected 'reuse' or 'reject', got '{other}'")),
		}
	}
}

/// Authority configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityConfig {
	/// Path or name of the `nsc` binary.
	pub program: PathBuf,
	/// NATS server URL that accounts are pushed to.
	pub bus_url: String,
	/// Directory credential bundles are written to.
	pub creds_dir: PathBuf,
	pub command_timeout_secs: u64,
	pub existing_user: ExistingUserPolicy,
}

impl AuthorityConfig {
	pub fn command_timeout(&self) -> Duration {
		Duration::from_secs(self.command_timeout_secs)
	}
}

impl Default for AuthorityConfig {
	fn default() -> Self {
		AuthorityConfigLayer::default().finalize()
	}
}

/// Authority configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorityConfigLayer {
	#[serde(default)]
	pub program: Option<PathBuf>,
	#[serde(default)]
	pub bus_url: Option<String>,
	#[serde(default)]
	pub creds_dir: Option<PathBuf>,
	#[serde(default)]
	pub command_timeout_secs: Option<u64>,
	#[serde(default)]
	pub existing_user: Option<ExistingUserPolicy>,
}

impl AuthorityConfigLayer {
	pub fn merge(&mut self, other: AuthorityConfigLayer) {
		if other.program.is_some() {
			self.program = other.program;
		}
		if other.bus_url.is_some() {
			self.bus_url = other.bus_url;
		}
		if other.creds_dir.is_some() {
			self.creds_dir = other.creds_dir;
		}
		if other.command_timeout_secs.is_some() {
			self.command_timeout_secs = other.command_timeout_secs;
		}
		if other.existing_user.is_some() {
			self.existing_user = other.existing_user;
		}
	}

	pub fn finalize(self) -> AuthorityConfig {
		AuthorityConfig {
			program: self
				.program
				.unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRAM)),
			bus_url: self
				.bus_url
				.unwrap_or_else(|| DEFAULT_BUS_URL.to_string()),
			creds_dir: self
				.creds_dir
				.unwrap_or_else(|| PathBuf::from(DEFAULT_CREDS_DIR)),
			command_timeout_secs: self
				.command_timeout_secs
				.unwrap_or(DEFAULT_COMMAND_TIMEOUT_SECS),
			existing_user: self.existing_user.unwrap_or_default(),
		}
	}
}
