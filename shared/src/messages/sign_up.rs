// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::user::UserData;
use super::DataMessage;
use crate::validation::{ValidationField, ValidationVerdict};
use serde::{Deserialize, Serialize};

/// Data sent to the directory to create an account
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SignUpRequest {
	pub nickname: String,
	pub email: String,
	pub password: String,
}

/// Response data from the directory for a sign-up attempt
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum SignUpResponse {
	Success(UserData),
	NicknameInUse,
	EmailInUse,
	InvalidField(ValidationField),
}

impl SignUpResponse {
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success(_))
	}
}

/// Events from the client while filling out the sign-up form
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum SignUpEvent {
	EditNickname(String),
	EditEmail(String),
	EditPassword(String),
	EditPasswordConfirm(String),
	/// The nickname field gained focus again; its earlier availability result no longer counts.
	ResetNickname,
	/// The email field gained focus again; its earlier availability result no longer counts.
	ResetEmail,
	Submit,
}

/// Updates sent to the client as the form state changes
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum SignUpUpdate {
	FieldVerdict {
		field: ValidationField,
		verdict: ValidationVerdict,
	},
	/// An availability check could not be answered. The field stays unresolved until it's edited again.
	AvailabilityFailed {
		field: ValidationField,
		error: String,
	},
	Submittable(bool),
	SignUpResult(DataMessage<SignUpResponse>),
}
