// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{AvailabilityChecker, CheckError};
use crate::directory::UserDirectory;
use async_std::sync::Arc;
use async_trait::async_trait;
use sopt_stamp_shared::messages::sign_up::{SignUpRequest, SignUpResponse};

/// Answers checks from the directory held by this process
pub struct DirectoryChecker {
	directory: Arc<UserDirectory>,
}

impl DirectoryChecker {
	pub fn new(directory: Arc<UserDirectory>) -> Self {
		Self { directory }
	}
}

#[async_trait]
impl AvailabilityChecker for DirectoryChecker {
	async fn check_nickname_available(&self, nickname: &str) -> Result<bool, CheckError> {
		Ok(self.directory.nickname_available(nickname).await)
	}

	async fn check_email_available(&self, email: &str) -> Result<bool, CheckError> {
		Ok(self.directory.email_available(email).await)
	}

	async fn submit_sign_up(&self, request: &SignUpRequest) -> Result<SignUpResponse, CheckError> {
		self.directory
			.register(request.clone())
			.await
			.map_err(CheckError::Service)
	}
}
