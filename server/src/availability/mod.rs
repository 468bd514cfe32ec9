// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use async_trait::async_trait;
use http_types::StatusCode;
use sopt_stamp_shared::messages::sign_up::{SignUpRequest, SignUpResponse};
use sopt_stamp_shared::messages::DataError;
use std::fmt;

mod local;
pub use local::DirectoryChecker;

mod remote;
pub use remote::RemoteAuthService;

/// Asks the user directory whether identifiers are free and submits finished registrations.
///
/// An `Err` means the question couldn't be answered. It never stands in for "taken".
#[async_trait]
pub trait AvailabilityChecker: Send + Sync {
	async fn check_nickname_available(&self, nickname: &str) -> Result<bool, CheckError>;
	async fn check_email_available(&self, email: &str) -> Result<bool, CheckError>;
	async fn submit_sign_up(&self, request: &SignUpRequest) -> Result<SignUpResponse, CheckError>;
}

/// Failures reaching or understanding the user directory
#[derive(Debug)]
pub enum CheckError {
	Connection(std::io::Error),
	Http(http_types::Error),
	Status(StatusCode),
	Service(DataError),
	TimedOut,
}

impl CheckError {
	/// The error kind to report to a client that can't see the details
	pub fn data_error(&self) -> DataError {
		match self {
			Self::Service(error) => error.clone(),
			_ => DataError::DirectoryError,
		}
	}
}

impl fmt::Display for CheckError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Connection(error) => write!(f, "Failed to connect to the user directory: {}", error),
			Self::Http(error) => write!(f, "The user directory request failed: {}", error),
			Self::Status(status) => write!(f, "The user directory responded with status {}", status),
			Self::Service(error) => write!(f, "{}", error),
			Self::TimedOut => write!(f, "The user directory did not respond in time"),
		}
	}
}

impl From<std::io::Error> for CheckError {
	fn from(error: std::io::Error) -> Self {
		Self::Connection(error)
	}
}

impl From<http_types::Error> for CheckError {
	fn from(error: http_types::Error) -> Self {
		Self::Http(error)
	}
}

impl From<async_std::future::TimeoutError> for CheckError {
	fn from(_: async_std::future::TimeoutError) -> Self {
		Self::TimedOut
	}
}
