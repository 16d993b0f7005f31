// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! natsprov server binary.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use natsprov_authority::{AuthorityExecutor, NscExecutor};
use natsprov_server::{create_app_state, create_router, version};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// natsprov server - issues NATS credentials over HTTP.
#[derive(Parser, Debug)]
#[command(
	name = "natsprov-server",
	about = "Provision NATS accounts, users and credentials on demand",
	version
)]
struct Args {
	/// Path to the TOML config file (default: /etc/natsprov/server.toml)
	#[arg(long, env = "NATSPROV_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => natsprov_server_config::load_config_with_file(path)?,
		None => natsprov_server_config::load_config()?,
	};

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		program = %config.authority.program.display(),
		bus_url = %config.authority.bus_url,
		"starting natsprov-server"
	);

	let executor: Arc<dyn AuthorityExecutor> = Arc::new(NscExecutor::new(
		config.authority.program.clone(),
		config.authority.command_timeout(),
	));
	let state = create_app_state(&config, executor);

	let app = create_router(state).layer(TraceLayer::new_for_http());

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
