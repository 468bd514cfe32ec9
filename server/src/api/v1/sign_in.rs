// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::json_response;
use crate::directory::UserDirectory;
use async_std::sync::Arc;
use sopt_stamp_shared::messages::sign_in::{SignInRequest, SignInResponse};
use tide::{Request, StatusCode};

/// POST /api/v1/sign_in
///
/// Takes a [SignInRequest] body and responds with a [SignInResponse].
pub async fn sign_in(mut request: Request<()>, directory: Arc<UserDirectory>) -> tide::Result {
	let credentials: SignInRequest = match request.body_json().await {
		Ok(data) => data,
		Err(error) => {
			tide::log::warn!("Received an invalid sign-in body: {}", error);
			return Err(tide::Error::new(
				StatusCode::BadRequest,
				anyhow::Error::msg("Invalid sign-in data"),
			));
		}
	};
	let response = match directory.sign_in(&credentials.email, &credentials.password).await {
		Some(user) => SignInResponse::Success(user),
		None => SignInResponse::InvalidCredentials,
	};
	json_response(&response)
}
