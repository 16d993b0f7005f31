// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Argument shapes for every authority tool operation.

use std::fmt;
use std::path::PathBuf;

/// One authority tool operation.
///
/// Each caller-supplied value always lands in its own argument, never
/// spliced into another one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorityCommand {
	DescribeAccount {
		account: String,
	},
	DescribeUser {
		account: String,
		user: String,
	},
	AddAccount {
		account: String,
	},
	GenerateSigningKey {
		account: String,
	},
	AddUser {
		account: String,
		user: String,
	},
	GenerateCreds {
		account: String,
		user: String,
		output: PathBuf,
	},
	Push {
		account: String,
		bus_url: String,
	},
}

impl AuthorityCommand {
	/// Argument vector passed to the authority tool (program name excluded).
	pub fn args(&self) -> Vec<String> {
		let parts: Vec<&str> = match self {
			AuthorityCommand::DescribeAccount { account } => {
				vec!["describe", "account", account.as_str()]
			}
			AuthorityCommand::DescribeUser { account, user } => {
				vec!["describe", "user", "--account", account.as_str(), user.as_str()]
			}
			AuthorityCommand::AddAccount { account } => vec!["add", "account", account.as_str()],
			AuthorityCommand::GenerateSigningKey { account } => {
				vec!["edit", "account", account.as_str(), "--sk", "generate"]
			}
			AuthorityCommand::AddUser { account, user } => {
				vec!["add", "user", "--account", account.as_str(), user.as_str()]
			}
			AuthorityCommand::GenerateCreds {
				account,
				user,
				output,
			} => {
				let mut args: Vec<String> = [
					"generate",
					"creds",
					"--account",
					account.as_str(),
					"--name",
					user.as_str(),
					"--output-file",
				]
				.into_iter()
				.map(str::to_string)
				.collect();
				args.push(output.to_string_lossy().into_owned());
				return args;
			}
			AuthorityCommand::Push { account, bus_url } => {
				vec!["push", "--account", account.as_str(), "-u", bus_url.as_str()]
			}
		};

		parts.into_iter().map(str::to_string).collect()
	}

	/// Short operation name used in logs.
	pub fn operation(&self) -> &'static str {
		match self {
			AuthorityCommand::DescribeAccount { .. } => "describe account",
			AuthorityCommand::DescribeUser { .. } => "describe user",
			AuthorityCommand::AddAccount { .. } => "add account",
			AuthorityCommand::GenerateSigningKey { .. } => "generate signing key",
			AuthorityCommand::AddUser { .. } => "add user",
			AuthorityCommand::GenerateCreds { .. } => "generate creds",
			AuthorityCommand::Push { .. } => "push",
		}
	}
}

impl fmt::Display for AuthorityCommand {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "nsc {}", self.args().join(" "))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn strs(args: &[String]) -> Vec<&str> {
		args.iter().map(String::as_str).collect()
	}

	#[test]
	fn test_describe_shapes() {
		let account = AuthorityCommand::DescribeAccount {
			account: "acme".to_string(),
		};
		assert_eq!(strs(&account.args()), ["describe", "account", "acme"]);

		let user = AuthorityCommand::DescribeUser {
			account: "acme".to_string(),
			user: "alice".to_string(),
		};
		assert_eq!(
			strs(&user.args()),
			["describe", "user", "--account", "acme", "alice"]
		);
	}

	#[test]
	fn test_mutation_shapes() {
		let add_account = AuthorityCommand::AddAccount {
			account: "acme".to_string(),
		};
		assert_eq!(strs(&add_account.args()), ["add", "account", "acme"]);

		let signing_key = AuthorityCommand::GenerateSigningKey {
			account: "acme".to_string(),
		};
		assert_eq!(
			strs(&signing_key.args()),
			["edit", "account", "acme", "--sk", "generate"]
		);

		let add_user = AuthorityCommand::AddUser {
			account: "acme".to_string(),
			user: "alice".to_string(),
		};
		assert_eq!(
			strs(&add_user.args()),
			["add", "user", "--account", "acme", "alice"]
		);
	}

	#[test]
	fn test_generate_creds_shape() {
		let cmd = AuthorityCommand::GenerateCreds {
			account: "acme".to_string(),
			user: "alice".to_string(),
			output: PathBuf::from("/var/lib/creds/acme_alice.creds"),
		};
		assert_eq!(
			strs(&cmd.args()),
			[
				"generate",
				"creds",
				"--account",
				"acme",
				"--name",
				"alice",
				"--output-file",
				"/var/lib/creds/acme_alice.creds"
			]
		);
	}

	#[test]
	fn test_push_shape() {
		let cmd = AuthorityCommand::Push {
			account: "acme".to_string(),
			bus_url: "nats://bus:4222".to_string(),
		};
		assert_eq!(
			strs(&cmd.args()),
			["push", "--account", "acme", "-u", "nats://bus:4222"]
		);
		assert_eq!(cmd.to_string(), "nsc push --account acme -u nats://bus:4222");
	}

	proptest! {
		/// Caller input with spaces or shell metacharacters stays a single argument.
		#[test]
		fn prop_names_are_never_split(account in "[a-z ;&|]{1,20}", user in "[a-z ;&|]{1,20}") {
			let cmd = AuthorityCommand::AddUser { account: account.clone(), user: user.clone() };
			let args = cmd.args();
			prop_assert_eq!(args.len(), 5);
			prop_assert_eq!(&args[3], &account);
			prop_assert_eq!(&args[4], &user);
		}
	}
}
