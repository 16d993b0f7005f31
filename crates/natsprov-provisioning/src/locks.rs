// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::trace;

/// One async mutex per name (an account, or a bundle path), created on first
/// use and kept for the lifetime of the process.
///
/// The table itself sits behind a single std mutex that is only held while
/// an entry is looked up or inserted, never across an await.
#[derive(Default)]
pub struct AccountLocks {
	table: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl AccountLocks {
	pub fn new() -> Self {
		Self::default()
	}

	/// Wait for exclusive access to `account`. Released when the guard drops.
	pub async fn lock(&self, account: &str) -> OwnedMutexGuard<()> {
		let lock = {
			let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
			Arc::clone(table.entry(account.to_string()).or_default())
		};

		trace!(account, "waiting for account lock");
		lock.lock_owned().await
	}

	/// Number of distinct accounts seen so far.
	pub fn len(&self) -> usize {
		self.table
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
