// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Credential provisioning for NATS accounts and users.
//!
//! [`ProvisioningService::provision`] turns an `(account, user)` request into
//! an ordered series of authority tool calls:
//!
//! 1. [`Step::EnsureAccount`] - create the account and its signing key if absent
//! 2. [`Step::EnsureUser`] - create the user unless it already exists
//! 3. [`Step::IssueCredential`] - write the credential bundle
//! 4. [`Step::Publish`] - push the account to the NATS server
//! 5. [`Step::Retrieve`] - read the bundle back
//!
//! Each step only runs if the previous one succeeded. Calls for the same
//! account are serialized by [`AccountLocks`]; calls for different accounts
//! run independently, unless they would write the same bundle file.

pub mod config;
pub mod error;
pub mod locks;
pub mod service;

pub use config::{ExistingUserPolicy, ProvisioningConfig};
pub use error::{ProvisionError, Step, ToolFailure};
pub use locks::AccountLocks;
pub use service::{Provisioned, ProvisioningService};
