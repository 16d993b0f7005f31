// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Build information for `natsprov-server version`.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn platform() -> String {
	format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS)
}

/// Format version info for display.
pub fn format_version_info() -> String {
	format!(
		"natsprov-server version: {}\n\
         Platform:                {}",
		VERSION,
		platform(),
	)
}
