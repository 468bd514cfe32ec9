// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::user::UserData;
use serde::{Deserialize, Serialize};

/// Credentials from the sign-in screen
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SignInRequest {
	pub email: String,
	pub password: String,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum SignInResponse {
	Success(UserData),
	/// No account matches the email and password. Which of the two was wrong isn't revealed.
	InvalidCredentials,
}
