// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::json_response;
use crate::directory::UserDirectory;
use async_std::sync::Arc;
use sopt_stamp_shared::messages::availability::{AvailabilityResponse, EmailQuery, NicknameQuery};
use tide::{Request, StatusCode};

/// GET /api/v1/nickname/available?nickname=
///
/// Responds with an [AvailabilityResponse] telling whether the nickname can still be registered.
pub async fn nickname_available(request: Request<()>, directory: Arc<UserDirectory>) -> tide::Result {
	let query: NicknameQuery = match request.query() {
		Ok(query) => query,
		Err(_) => {
			return Err(tide::Error::new(
				StatusCode::BadRequest,
				anyhow::Error::msg("A nickname must be provided"),
			))
		}
	};
	let available = directory.nickname_available(&query.nickname).await;
	json_response(&AvailabilityResponse {
		candidate: query.nickname,
		available,
	})
}

/// GET /api/v1/email/available?email=
///
/// Responds with an [AvailabilityResponse] telling whether the email can still be registered.
pub async fn email_available(request: Request<()>, directory: Arc<UserDirectory>) -> tide::Result {
	let query: EmailQuery = match request.query() {
		Ok(query) => query,
		Err(_) => {
			return Err(tide::Error::new(
				StatusCode::BadRequest,
				anyhow::Error::msg("An email must be provided"),
			))
		}
	};
	let available = directory.email_available(&query.email).await;
	json_response(&AvailabilityResponse {
		candidate: query.email,
		available,
	})
}
