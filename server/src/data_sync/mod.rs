// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::availability::AvailabilityChecker;
use async_std::sync::Arc;
use std::time::Duration;
use tide::Server;
use tide_websockets::WebSocket;

mod connection;
use connection::handle_connection;

/// Serves sign-up sessions at `/ws`
pub fn add_routes(app: &mut Server<()>, checker: Arc<dyn AvailabilityChecker>, check_timeout: Duration) {
	app.at("/ws").get(WebSocket::new(move |_request: tide::Request<()>, stream| {
		handle_connection(stream, Arc::clone(&checker), check_timeout)
	}));
}

pub enum HandleConnectionError {
	ConnectionClosed,
	SendError(tide::Error),
}

impl From<tide::Error> for HandleConnectionError {
	fn from(error: tide::Error) -> Self {
		Self::SendError(error)
	}
}
