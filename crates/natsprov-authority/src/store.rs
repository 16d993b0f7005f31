// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Credential bundle locations and reads.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CredentialStoreError, InvalidIdentifier};

pub const BUNDLE_EXTENSION: &str = "creds";
const MAX_IDENTIFIER_LEN: usize = 255;
const MAX_FILE_NAME_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierField {
	Account,
	User,
}

impl fmt::Display for IdentifierField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			IdentifierField::Account => f.write_str("account"),
			IdentifierField::User => f.write_str("user"),
		}
	}
}

/// Check that a caller-supplied name is safe to pass to the authority tool
/// and to embed in a bundle file name.
pub fn validate_identifier(field: IdentifierField, value: &str) -> Result<(), InvalidIdentifier> {
	let reject = |reason| Err(InvalidIdentifier { field, reason });

	if value.is_empty() {
		return reject("must not be empty");
	}
	if value.len() > MAX_IDENTIFIER_LEN {
		return reject("must be at most 255 bytes");
	}
	if value.contains(['/', '\\']) {
		return reject("must not contain path separators");
	}
	if value.chars().any(char::is_control) {
		return reject("must not contain control characters");
	}
	if value.starts_with('.') {
		return reject("must not start with '.'");
	}
	if value.starts_with('-') {
		return reject("must not start with '-'");
	}

	Ok(())
}

/// Validate both names and build `<account>_<user>.creds`.
///
/// The combined name must fit in a single file name, otherwise the tool
/// would only fail at `generate creds` after the account and user exist.
pub fn bundle_file_name(account: &str, user: &str) -> Result<String, InvalidIdentifier> {
	validate_identifier(IdentifierField::Account, account)?;
	validate_identifier(IdentifierField::User, user)?;

	let name = format!("{account}_{user}.{BUNDLE_EXTENSION}");
	if name.len() > MAX_FILE_NAME_LEN {
		return Err(InvalidIdentifier {
			field: IdentifierField::User,
			reason: "account and user together exceed the 255 byte bundle file name limit",
		});
	}
	Ok(name)
}

/// Directory of credential bundles written by the authority tool.
#[derive(Debug, Clone)]
pub struct CredentialStore {
	dir: PathBuf,
}

impl CredentialStore {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// Deterministic bundle location: `<dir>/<account>_<user>.creds`.
	///
	/// Distinct pairs can share a file name (`a` + `b_c` and `a_b` + `c`),
	/// so callers must serialize on [`bundle_file_name`] as well as on the
	/// account.
	pub fn bundle_path(&self, account: &str, user: &str) -> Result<PathBuf, InvalidIdentifier> {
		Ok(self.dir.join(bundle_file_name(account, user)?))
	}

	/// Read a bundle in full. Nothing is cached; every call hits the disk.
	pub async fn read(&self, path: &Path) -> Result<Vec<u8>, CredentialStoreError> {
		let bytes = tokio::fs::read(path).await.map_err(|e| {
			if e.kind() == std::io::ErrorKind::NotFound {
				CredentialStoreError::NotFound {
					path: path.to_path_buf(),
				}
			} else {
				CredentialStoreError::Io {
					path: path.to_path_buf(),
					source: e,
				}
			}
		})?;

		debug!(path = %path.display(), bytes = bytes.len(), "read credential bundle");
		Ok(bytes)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use tempfile::TempDir;

	#[test]
	fn test_bundle_path_is_deterministic() {
		let store = CredentialStore::new("/var/lib/natsprov");
		let path = store.bundle_path("acme", "alice").unwrap();
		assert_eq!(path, PathBuf::from("/var/lib/natsprov/acme_alice.creds"));
		assert_eq!(path, store.bundle_path("acme", "alice").unwrap());
	}

	#[test]
	fn test_rejects_traversal() {
		let store = CredentialStore::new("/var/lib/natsprov");

		for (account, user, field) in [
			("..", "alice", IdentifierField::Account),
			("acme", "../../etc/passwd", IdentifierField::User),
			("acme/evil", "alice", IdentifierField::Account),
			("acme", "a\\b", IdentifierField::User),
			(".hidden", "alice", IdentifierField::Account),
		] {
			let err = store.bundle_path(account, user).unwrap_err();
			assert_eq!(err.field, field, "{account}/{user}");
		}
	}

	#[test]
	fn test_rejects_flag_like_and_control_names() {
		assert!(validate_identifier(IdentifierField::User, "--help").is_err());
		assert!(validate_identifier(IdentifierField::User, "bob\n").is_err());
		assert!(validate_identifier(IdentifierField::User, "bob\0").is_err());
		assert!(validate_identifier(IdentifierField::User, "").is_err());
		assert!(validate_identifier(IdentifierField::User, &"a".repeat(256)).is_err());
	}

	#[test]
	fn test_accepts_ordinary_names() {
		for name in ["acme", "ACME_01", "team-a", "alice.smith", "user@example"] {
			assert!(validate_identifier(IdentifierField::Account, name).is_ok(), "{name}");
		}
	}

	#[test]
	fn test_long_pair_rejected_before_any_call() {
		let store = CredentialStore::new("/var/lib/natsprov");
		let account = "a".repeat(200);
		let user = "u".repeat(60);

		assert!(validate_identifier(IdentifierField::Account, &account).is_ok());
		assert!(validate_identifier(IdentifierField::User, &user).is_ok());

		let err = store.bundle_path(&account, &user).unwrap_err();
		assert_eq!(err.field, IdentifierField::User);
		assert!(err.to_string().contains("255 byte"));
	}

	#[test]
	fn test_file_name_limit_is_inclusive() {
		// "_" plus ".creds" take 7 bytes.
		let account = "a".repeat(124);
		let user = "u".repeat(124);
		let name = bundle_file_name(&account, &user).unwrap();
		assert_eq!(name.len(), 255);

		assert!(bundle_file_name(&account, &format!("{user}u")).is_err());
	}

	#[test]
	fn test_colliding_pairs_share_a_file_name() {
		assert_eq!(
			bundle_file_name("a", "b_c").unwrap(),
			bundle_file_name("a_b", "c").unwrap()
		);
	}

	#[tokio::test]
	async fn test_read_returns_exact_bytes() {
		let dir = TempDir::new().unwrap();
		let store = CredentialStore::new(dir.path());
		let path = store.bundle_path("acme", "alice").unwrap();
		let content = b"-----BEGIN NATS USER JWT-----\nstub\n------END NATS USER JWT------\n";
		std::fs::write(&path, content).unwrap();

		let bytes = store.read(&path).await.unwrap();
		assert_eq!(bytes, content);
	}

	#[tokio::test]
	async fn test_read_missing_is_not_found() {
		let dir = TempDir::new().unwrap();
		let store = CredentialStore::new(dir.path());
		let path = store.bundle_path("acme", "ghost").unwrap();

		let err = store.read(&path).await.unwrap_err();
		assert!(matches!(err, CredentialStoreError::NotFound { .. }));
	}

	proptest! {
		/// Any accepted pair yields a file directly inside the store directory.
		#[test]
		fn prop_accepted_paths_stay_in_dir(account in "[^\\x00-\\x1f/\\\\.-][^\\x00-\\x1f/\\\\]{0,30}", user in "[a-zA-Z0-9_]{1,30}") {
			let store = CredentialStore::new("/srv/creds");
			if let Ok(path) = store.bundle_path(&account, &user) {
				prop_assert_eq!(path.parent(), Some(Path::new("/srv/creds")));
			}
		}
	}
}
