// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};

/// Response data from the directory for a nickname or email check
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AvailabilityResponse {
	pub candidate: String,
	pub available: bool,
}

/// Query string for `GET /api/v1/nickname/available`
#[derive(Debug, Deserialize, Serialize)]
pub struct NicknameQuery {
	pub nickname: String,
}

/// Query string for `GET /api/v1/email/available`
#[derive(Debug, Deserialize, Serialize)]
pub struct EmailQuery {
	pub email: String,
}
