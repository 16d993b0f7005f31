// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Router construction and shared application state.

use std::sync::Arc;

use axum::{routing::get, Router};
use natsprov_authority::AuthorityExecutor;
use natsprov_provisioning::{ExistingUserPolicy, ProvisioningConfig, ProvisioningService};
use natsprov_server_config::{AuthorityConfig, ServerConfig};

use crate::routes;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
	pub service: Arc<ProvisioningService<dyn AuthorityExecutor>>,
}

/// Build the provisioning settings out of the resolved `[authority]` section.
pub fn provisioning_config(authority: &AuthorityConfig) -> ProvisioningConfig {
	ProvisioningConfig {
		bus_url: authority.bus_url.clone(),
		creds_dir: authority.creds_dir.clone(),
		existing_user: match authority.existing_user {
			natsprov_server_config::ExistingUserPolicy::Reuse => ExistingUserPolicy::Reuse,
			natsprov_server_config::ExistingUserPolicy::Reject => ExistingUserPolicy::Reject,
		},
	}
}

pub fn create_app_state(config: &ServerConfig, executor: Arc<dyn AuthorityExecutor>) -> AppState {
	let service = ProvisioningService::new(executor, provisioning_config(&config.authority));
	AppState {
		service: Arc::new(service),
	}
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/", get(routes::provision::provision_credentials))
		.route("/health", get(routes::health::health_check))
		.with_state(state)
}
