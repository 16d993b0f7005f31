// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Fake `nsc` for tests.
//!
//! [`FakeAuthority`] keeps an in-memory trust store, records every argument
//! vector it receives, writes a stub bundle on `generate creds`, and can be
//! told to fail, hang or slow down specific operations.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use natsprov_authority::{AuthorityCommand, AuthorityExecutor, CommandOutput, ExecError};

/// Operation kinds the fake understands, one per authority command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
	DescribeAccount,
	DescribeUser,
	AddAccount,
	GenerateSigningKey,
	AddUser,
	GenerateCreds,
	Push,
}

impl Op {
	fn of(command: &AuthorityCommand) -> Self {
		match command {
			AuthorityCommand::DescribeAccount { .. } => Op::DescribeAccount,
			AuthorityCommand::DescribeUser { .. } => Op::DescribeUser,
			AuthorityCommand::AddAccount { .. } => Op::AddAccount,
			AuthorityCommand::GenerateSigningKey { .. } => Op::GenerateSigningKey,
			AuthorityCommand::AddUser { .. } => Op::AddUser,
			AuthorityCommand::GenerateCreds { .. } => Op::GenerateCreds,
			AuthorityCommand::Push { .. } => Op::Push,
		}
	}
}

/// Parse an argument vector back into the command that produced it.
pub fn parse_command(args: &[String]) -> Option<AuthorityCommand> {
	let a: Vec<&str> = args.iter().map(String::as_str).collect();
	let command = match a.as_slice() {
		["describe", "account", account] => AuthorityCommand::DescribeAccount {
			account: account.to_string(),
		},
		["describe", "user", "--account", account, user] => AuthorityCommand::DescribeUser {
			account: account.to_string(),
			user: user.to_string(),
		},
		["add", "account", account] => AuthorityCommand::AddAccount {
			account: account.to_string(),
		},
		["edit", "account", account, "--sk", "generate"] => AuthorityCommand::GenerateSigningKey {
			account: account.to_string(),
		},
		["add", "user", "--account", account, user] => AuthorityCommand::AddUser {
			account: account.to_string(),
			user: user.to_string(),
		},
		["generate", "creds", "--account", account, "--name", user, "--output-file", output] => {
			AuthorityCommand::GenerateCreds {
				account: account.to_string(),
				user: user.to_string(),
				output: PathBuf::from(output),
			}
		}
		["push", "--account", account, "-u", bus_url] => AuthorityCommand::Push {
			account: account.to_string(),
			bus_url: bus_url.to_string(),
		},
		_ => return None,
	};
	Some(command)
}

/// Stub bundle content written for `(account, user)`.
pub fn stub_bundle(account: &str, user: &str) -> String {
	format!(
		"-----BEGIN NATS USER JWT-----\n{account}.{user}.stub\n------END NATS USER JWT------\n"
	)
}

enum Fault {
	Exit { status: i32, stderr: String },
	Timeout,
}

#[derive(Default)]
struct TrustStore {
	accounts: HashSet<String>,
	users: HashSet<(String, String)>,
	signing_keys: HashMap<String, usize>,
	pushed: Vec<String>,
}

#[derive(Default)]
pub struct FakeAuthority {
	store: Mutex<TrustStore>,
	calls: Mutex<Vec<Vec<String>>>,
	faults: Mutex<HashMap<Op, Fault>>,
	latency: Mutex<Option<Duration>>,
	account_delays: Mutex<HashMap<String, Duration>>,
}

impl FakeAuthority {
	pub fn new() -> Self {
		Self::default()
	}

	/// Seed an account that already exists, with one signing key.
	pub fn with_account(self, account: &str) -> Self {
		{
			let mut store = self.store.lock().unwrap();
			store.accounts.insert(account.to_string());
			store.signing_keys.insert(account.to_string(), 1);
		}
		self
	}

	/// Seed a user that already exists.
	pub fn with_user(self, account: &str, user: &str) -> Self {
		self.store
			.lock()
			.unwrap()
			.users
			.insert((account.to_string(), user.to_string()));
		self
	}

	/// Sleep this long inside every invocation, so concurrent callers interleave.
	pub fn with_latency(self, latency: Duration) -> Self {
		*self.latency.lock().unwrap() = Some(latency);
		self
	}

	/// Sleep this long inside every invocation that names `account`.
	pub fn with_account_delay(self, account: &str, delay: Duration) -> Self {
		self.account_delays
			.lock()
			.unwrap()
			.insert(account.to_string(), delay);
		self
	}

	/// Make `op` exit with `status` and `stderr` without touching the store.
	pub fn fail(self, op: Op, status: i32, stderr: &str) -> Self {
		self.faults.lock().unwrap().insert(
			op,
			Fault::Exit {
				status,
				stderr: stderr.to_string(),
			},
		);
		self
	}

	/// Make `op` report a timeout.
	pub fn time_out(self, op: Op) -> Self {
		self.faults.lock().unwrap().insert(op, Fault::Timeout);
		self
	}

	pub fn calls(&self) -> Vec<Vec<String>> {
		self.calls.lock().unwrap().clone()
	}

	pub fn ops(&self) -> Vec<Op> {
		self.calls()
			.iter()
			.filter_map(|args| parse_command(args))
			.map(|command| Op::of(&command))
			.collect()
	}

	pub fn count(&self, op: Op) -> usize {
		self.ops().into_iter().filter(|o| *o == op).count()
	}

	pub fn account_exists(&self, account: &str) -> bool {
		self.store.lock().unwrap().accounts.contains(account)
	}

	pub fn user_exists(&self, account: &str, user: &str) -> bool {
		self.store
			.lock()
			.unwrap()
			.users
			.contains(&(account.to_string(), user.to_string()))
	}

	pub fn signing_keys(&self, account: &str) -> usize {
		self.store
			.lock()
			.unwrap()
			.signing_keys
			.get(account)
			.copied()
			.unwrap_or(0)
	}

	/// Accounts pushed so far, in order.
	pub fn pushed(&self) -> Vec<String> {
		self.store.lock().unwrap().pushed.clone()
	}

	fn delay_for(&self, command: &AuthorityCommand) -> Option<Duration> {
		let account = match command {
			AuthorityCommand::DescribeAccount { account }
			| AuthorityCommand::DescribeUser { account, .. }
			| AuthorityCommand::AddAccount { account }
			| AuthorityCommand::GenerateSigningKey { account }
			| AuthorityCommand::AddUser { account, .. }
			| AuthorityCommand::GenerateCreds { account, .. }
			| AuthorityCommand::Push { account, .. } => account,
		};
		let specific = self.account_delays.lock().unwrap().get(account).copied();
		specific.or(*self.latency.lock().unwrap())
	}

	fn apply(&self, command: &AuthorityCommand) -> CommandOutput {
		let mut store = self.store.lock().unwrap();
		let result: Result<String, String> = match command {
			AuthorityCommand::DescribeAccount { account } => {
				if store.accounts.contains(account) {
					Ok(format!("Account {account}"))
				} else {
					Err(format!("account {account:?} not found"))
				}
			}
			AuthorityCommand::DescribeUser { account, user } => {
				if store.users.contains(&(account.clone(), user.clone())) {
					Ok(format!("User {user}"))
				} else {
					Err(format!("user {user:?} not found"))
				}
			}
			AuthorityCommand::AddAccount { account } => {
				if store.accounts.insert(account.clone()) {
					Ok(format!("added account {account:?}"))
				} else {
					Err(format!("the account {account:?} already exists"))
				}
			}
			AuthorityCommand::GenerateSigningKey { account } => {
				if store.accounts.contains(account) {
					*store.signing_keys.entry(account.clone()).or_insert(0) += 1;
					Ok("added signing key".to_string())
				} else {
					Err(format!("account {account:?} not found"))
				}
			}
			AuthorityCommand::AddUser { account, user } => {
				if !store.accounts.contains(account) {
					Err(format!("account {account:?} not found"))
				} else if store.users.insert((account.clone(), user.clone())) {
					Ok(format!("added user {user:?}"))
				} else {
					Err(format!("the user {user:?} already exists"))
				}
			}
			AuthorityCommand::GenerateCreds {
				account,
				user,
				output,
			} => {
				if !store.users.contains(&(account.clone(), user.clone())) {
					Err(format!("user {user:?} not found"))
				} else {
					std::fs::write(output, stub_bundle(account, user))
						.map(|_| format!("wrote {}", output.display()))
						.map_err(|e| e.to_string())
				}
			}
			AuthorityCommand::Push { account, .. } => {
				if store.accounts.contains(account) {
					store.pushed.push(account.clone());
					Ok("push job succeeded".to_string())
				} else {
					Err(format!("account {account:?} not found"))
				}
			}
		};

		match result {
			Ok(stdout) => CommandOutput {
				status: Some(0),
				stdout,
				stderr: String::new(),
			},
			Err(stderr) => CommandOutput {
				status: Some(1),
				stdout: String::new(),
				stderr,
			},
		}
	}
}

#[async_trait]
impl AuthorityExecutor for FakeAuthority {
	async fn run(&self, args: &[String]) -> Result<CommandOutput, ExecError> {
		self.calls.lock().unwrap().push(args.to_vec());

		let Some(command) = parse_command(args) else {
			return Ok(CommandOutput {
				status: Some(2),
				stdout: String::new(),
				stderr: format!("unknown command: {}", args.join(" ")),
			});
		};

		if let Some(delay) = self.delay_for(&command) {
			tokio::time::sleep(delay).await;
		}

		match self.faults.lock().unwrap().get(&Op::of(&command)) {
			Some(Fault::Exit { status, stderr }) => {
				return Ok(CommandOutput {
					status: Some(*status),
					stdout: String::new(),
					stderr: stderr.clone(),
				});
			}
			Some(Fault::Timeout) => {
				return Err(ExecError::Timeout {
					after: Duration::from_secs(30),
				});
			}
			None => {}
		}

		Ok(self.apply(&command))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	#[tokio::test]
	async fn test_parse_round_trips_every_command() {
		let commands = [
			AuthorityCommand::DescribeAccount {
				account: "acme".to_string(),
			},
			AuthorityCommand::GenerateCreds {
				account: "acme".to_string(),
				user: "alice".to_string(),
				output: PathBuf::from("/tmp/acme_alice.creds"),
			},
			AuthorityCommand::Push {
				account: "acme".to_string(),
				bus_url: "nats://localhost:4222".to_string(),
			},
		];
		for command in commands {
			assert_eq!(parse_command(&command.args()), Some(command));
		}
	}

	#[tokio::test]
	async fn test_duplicate_account_is_rejected() {
		let fake = FakeAuthority::new().with_account("acme");
		let output = fake
			.execute(&AuthorityCommand::AddAccount {
				account: "acme".to_string(),
			})
			.await
			.unwrap();
		assert_eq!(output.status, Some(1));
		assert!(output.stderr.contains("already exists"));
	}

	#[tokio::test]
	async fn test_generate_creds_writes_stub() {
		let dir = TempDir::new().unwrap();
		let output = dir.path().join("acme_alice.creds");
		let fake = FakeAuthority::new()
			.with_account("acme")
			.with_user("acme", "alice");

		let result = fake
			.execute(&AuthorityCommand::GenerateCreds {
				account: "acme".to_string(),
				user: "alice".to_string(),
				output: output.clone(),
			})
			.await
			.unwrap();

		assert!(result.success());
		assert_eq!(
			std::fs::read_to_string(output).unwrap(),
			stub_bundle("acme", "alice")
		);
	}

	#[tokio::test]
	async fn test_fault_injection() {
		let fake = FakeAuthority::new()
			.fail(Op::AddAccount, 4, "disk full")
			.time_out(Op::Push);

		let output = fake
			.execute(&AuthorityCommand::AddAccount {
				account: "acme".to_string(),
			})
			.await
			.unwrap();
		assert_eq!(output.status, Some(4));
		assert!(!fake.account_exists("acme"));

		let err = fake
			.execute(&AuthorityCommand::Push {
				account: "acme".to_string(),
				bus_url: "nats://localhost:4222".to_string(),
			})
			.await
			.unwrap_err();
		assert!(err.is_timeout());
		assert_eq!(fake.ops(), vec![Op::AddAccount, Op::Push]);
	}
}
