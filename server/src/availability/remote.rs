// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{AvailabilityChecker, CheckError};
use async_std::net::TcpStream;
use async_trait::async_trait;
use http_types::{Body, Method, Request, Response, Url};
use sopt_stamp_shared::messages::availability::AvailabilityResponse;
use sopt_stamp_shared::messages::sign_up::{SignUpRequest, SignUpResponse};
use sopt_stamp_shared::messages::DataError;

/// Answers checks by calling the `/api/v1` endpoints of another server
pub struct RemoteAuthService {
	host: String,
	port: u16,
}

impl RemoteAuthService {
	pub fn new(host: String, port: u16) -> Self {
		Self { host, port }
	}

	fn endpoint(&self, path: &str) -> Result<Url, CheckError> {
		Url::parse(&format!("http://{}:{}{}", self.host, self.port, path))
			.map_err(|error| CheckError::Http(error.into()))
	}

	async fn send(&self, request: Request) -> Result<Response, CheckError> {
		let stream = TcpStream::connect((self.host.as_str(), self.port)).await?;
		let response = async_h1::connect(stream, request).await?;
		if !response.status().is_success() {
			return Err(CheckError::Status(response.status()));
		}
		Ok(response)
	}

	async fn check_available(&self, path: &str, key: &str, candidate: &str) -> Result<bool, CheckError> {
		let mut url = self.endpoint(path)?;
		url.query_pairs_mut().append_pair(key, candidate);

		let mut response = self.send(Request::new(Method::Get, url)).await?;
		let body: AvailabilityResponse = response.body_json().await?;
		// A response for some other candidate means the two sides disagree about the request
		if body.candidate != candidate {
			tide::log::error!(
				"Directory answered for {:?} when asked about {:?}",
				body.candidate,
				candidate
			);
			return Err(CheckError::Service(DataError::ServerError));
		}
		Ok(body.available)
	}
}

#[async_trait]
impl AvailabilityChecker for RemoteAuthService {
	async fn check_nickname_available(&self, nickname: &str) -> Result<bool, CheckError> {
		self.check_available("/api/v1/nickname/available", "nickname", nickname)
			.await
	}

	async fn check_email_available(&self, email: &str) -> Result<bool, CheckError> {
		self.check_available("/api/v1/email/available", "email", email).await
	}

	async fn submit_sign_up(&self, sign_up: &SignUpRequest) -> Result<SignUpResponse, CheckError> {
		let mut request = Request::new(Method::Post, self.endpoint("/api/v1/sign_up")?);
		request.set_body(Body::from_json(sign_up)?);

		let mut response = self.send(request).await?;
		Ok(response.body_json().await?)
	}
}
