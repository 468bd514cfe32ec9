// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use async_std::sync::Arc;
use clap::Parser;
use miette::{IntoDiagnostic, Result};

mod api;
mod args;
mod availability;
mod config;
mod data_sync;
mod directory;
mod sign_up;
mod websocket_msg;

use args::CliArgs;
use availability::{AvailabilityChecker, DirectoryChecker, RemoteAuthService};
use config::parse_config;
use directory::UserDirectory;

#[async_std::main]
async fn main() -> Result<()> {
	let args = CliArgs::parse();
	let config = parse_config(&args.config)?;

	tide::log::start();

	let directory = Arc::new(UserDirectory::new());
	let checker: Arc<dyn AvailabilityChecker> = match &config.directory {
		Some(remote) => {
			tide::log::info!("Using the user directory at {}:{}", remote.host, remote.port);
			Arc::new(RemoteAuthService::new(remote.host.clone(), remote.port))
		}
		None => Arc::new(DirectoryChecker::new(Arc::clone(&directory))),
	};
	let check_timeout = config.check_timeout();

	let mut app = tide::new();
	api::add_routes(&mut app, Arc::clone(&directory));
	data_sync::add_routes(&mut app, checker, check_timeout);

	let listen_address = args.listen.unwrap_or(config.listen);
	app.listen(listen_address).await.into_diagnostic()?;

	Ok(())
}
