// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::directory::UserDirectory;
use async_std::sync::Arc;
use http_types::mime;
use serde::Serialize;
use tide::{Response, Server, StatusCode};

mod availability;
use availability::{email_available, nickname_available};

mod sign_in;
use sign_in::sign_in;

mod sign_up;
use sign_up::sign_up;

pub fn add_routes(app: &mut Server<()>, directory: Arc<UserDirectory>) {
	app.at("/api/v1/nickname/available").get({
		let directory = Arc::clone(&directory);
		move |request| nickname_available(request, Arc::clone(&directory))
	});
	app.at("/api/v1/email/available").get({
		let directory = Arc::clone(&directory);
		move |request| email_available(request, Arc::clone(&directory))
	});
	app.at("/api/v1/sign_up").post({
		let directory = Arc::clone(&directory);
		move |request| sign_up(request, Arc::clone(&directory))
	});
	app.at("/api/v1/sign_in").post({
		let directory = Arc::clone(&directory);
		move |request| sign_in(request, Arc::clone(&directory))
	});
}

fn json_response<T: Serialize>(data: &T) -> tide::Result {
	let json = match serde_json::to_string(data) {
		Ok(json) => json,
		Err(error) => {
			tide::log::error!("API error occurred serializing a response: {}", error);
			return Err(tide::Error::new(
				StatusCode::InternalServerError,
				anyhow::Error::msg("Failed to generate the response"),
			));
		}
	};
	Ok(Response::builder(StatusCode::Ok)
		.body(json)
		.content_type(mime::JSON)
		.build())
}
