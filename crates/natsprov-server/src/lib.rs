// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP front end for credential provisioning.
//!
//! `GET /?account=<a>&user=<u>` ensures the account and user exist, issues a
//! credential bundle, pushes the account to the NATS server and returns the
//! bundle as `text/plain`.

pub mod api;
pub mod error;
pub mod routes;
pub mod version;

pub use api::{create_app_state, create_router, provisioning_config, AppState};
pub use error::ApiError;
