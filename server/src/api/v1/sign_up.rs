// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::json_response;
use crate::directory::UserDirectory;
use async_std::sync::Arc;
use sopt_stamp_shared::messages::sign_up::{SignUpRequest, SignUpResponse};
use tide::{Request, StatusCode};

/// POST /api/v1/sign_up
///
/// Takes a [SignUpRequest] body and responds with the [SignUpResponse] from the directory.
pub async fn sign_up(mut request: Request<()>, directory: Arc<UserDirectory>) -> tide::Result {
	let sign_up_data: SignUpRequest = match request.body_json().await {
		Ok(data) => data,
		Err(error) => {
			tide::log::warn!("Received an invalid sign-up body: {}", error);
			return Err(tide::Error::new(
				StatusCode::BadRequest,
				anyhow::Error::msg("Invalid sign-up data"),
			));
		}
	};
	let response: SignUpResponse = match directory.register(sign_up_data).await {
		Ok(response) => response,
		Err(error) => {
			return Err(tide::Error::new(
				StatusCode::InternalServerError,
				anyhow::Error::msg(error.to_string()),
			))
		}
	};
	json_response(&response)
}

#[cfg(test)]
mod tests {
	use crate::api::add_routes;
	use crate::directory::UserDirectory;
	use async_std::sync::Arc;
	use http_types::{Body, Method, Request, Response, StatusCode, Url};
	use sopt_stamp_shared::messages::sign_up::{SignUpRequest, SignUpResponse};
	use sopt_stamp_shared::validation::ValidationField;

	async fn post(app: &tide::Server<()>, body: Body) -> Response {
		let mut request = Request::new(Method::Post, Url::parse("http://localhost/api/v1/sign_up").unwrap());
		request.set_body(body);
		app.respond(request).await.unwrap()
	}

	fn sign_up_body(nickname: &str, password: &str) -> Body {
		Body::from_json(&SignUpRequest {
			nickname: nickname.to_owned(),
			email: String::from("a@b.com"),
			password: password.to_owned(),
		})
		.unwrap()
	}

	#[async_std::test]
	async fn registers_then_rejects_duplicate() {
		let mut app = tide::new();
		add_routes(&mut app, Arc::new(UserDirectory::with_fast_hashing()));

		let mut response = post(&app, sign_up_body("Alice", "abc12345!")).await;
		assert_eq!(response.status(), StatusCode::Ok);
		let body: SignUpResponse = response.body_json().await.unwrap();
		assert!(body.is_success());

		let mut response = post(&app, sign_up_body("Alice", "abc12345!")).await;
		let body: SignUpResponse = response.body_json().await.unwrap();
		assert_eq!(body, SignUpResponse::NicknameInUse);
	}

	#[async_std::test]
	async fn weak_password_is_rejected() {
		let mut app = tide::new();
		add_routes(&mut app, Arc::new(UserDirectory::with_fast_hashing()));

		let mut response = post(&app, sign_up_body("Alice", "password")).await;
		let body: SignUpResponse = response.body_json().await.unwrap();
		assert_eq!(body, SignUpResponse::InvalidField(ValidationField::Password));
	}

	#[async_std::test]
	async fn malformed_body_is_a_bad_request() {
		let mut app = tide::new();
		add_routes(&mut app, Arc::new(UserDirectory::with_fast_hashing()));

		let response = post(&app, Body::from_string(String::from("{\"nickname\":"))).await;
		assert_eq!(response.status(), StatusCode::BadRequest);
	}
}
