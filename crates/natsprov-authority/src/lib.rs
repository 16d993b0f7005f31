// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Access to the NATS authority tool (`nsc`) and the files it produces.
//!
//! Everything that touches the external tool goes through a single seam,
//! [`AuthorityExecutor`]. On top of it this crate provides:
//!
//! - [`AuthorityCommand`]: the exact argument vectors for each tool operation
//! - [`IdentityOracle`]: account/user existence lookups
//! - [`CredentialStore`]: deterministic bundle paths and bundle reads
//!
//! [`NscExecutor`] is the production executor; tests substitute a fake.

pub mod command;
pub mod error;
pub mod executor;
pub mod nsc;
pub mod oracle;
pub mod store;

pub use command::AuthorityCommand;
pub use error::{CredentialStoreError, ExecError, InvalidIdentifier};
pub use executor::{AuthorityExecutor, CommandOutput};
pub use nsc::NscExecutor;
pub use oracle::IdentityOracle;
pub use store::{bundle_file_name, validate_identifier, CredentialStore, IdentifierField};
