// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Credential provisioning handler.

use std::sync::Arc;

use axum::{
	extract::{Query, State},
	http::{header, StatusCode},
	response::{IntoResponse, Response},
};
use natsprov_authority::bundle_file_name;
use serde::Deserialize;

use crate::{api::AppState, error::ApiError};

/// Both fields are optional so a missing one gets our own 400 body instead
/// of the extractor's rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ProvisionQuery {
	pub account: Option<String>,
	pub user: Option<String>,
}

/// GET /?account=<account>&user=<user>
///
/// Returns the credential bundle as `text/plain` once the account has been
/// pushed to the NATS server.
pub async fn provision_credentials(
	State(state): State<AppState>,
	Query(query): Query<ProvisionQuery>,
) -> Result<Response, ApiError> {
	let (Some(account), Some(user)) = (query.account, query.user) else {
		return Err(ApiError::MissingParameters);
	};
	if account.is_empty() || user.is_empty() {
		return Err(ApiError::EmptyParameters);
	}
	bundle_file_name(&account, &user)?;

	// Detached so a client hanging up does not abort the sequence halfway.
	let service = Arc::clone(&state.service);
	let provisioned = tokio::spawn(async move { service.provision(&account, &user).await })
		.await
		.map_err(|e| ApiError::Internal(format!("provisioning task failed: {e}")))??;

	tracing::info!(
		account = %provisioned.account,
		user = %provisioned.user,
		account_created = provisioned.account_created,
		user_created = provisioned.user_created,
		bytes = provisioned.bundle.len(),
		"issued credentials"
	);

	Ok((
		StatusCode::OK,
		[(header::CONTENT_TYPE, "text/plain")],
		provisioned.bundle,
	)
		.into_response())
}
