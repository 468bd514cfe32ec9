// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_std::sync::Mutex;
use async_std::task;
use chrono::Utc;
use rand::random;
use sopt_stamp_shared::messages::sign_up::{SignUpRequest, SignUpResponse};
use sopt_stamp_shared::messages::user::UserData;
use sopt_stamp_shared::messages::{DataError, DataMessage};
use sopt_stamp_shared::validation::{
	validate_email_syntax, validate_nickname, validate_password_syntax, ValidationField,
};
use std::collections::HashMap;

/// A registered account along with its password hash in PHC string format
#[derive(Clone)]
struct UserRecord {
	user: UserData,
	password_hash: String,
}

#[derive(Default)]
struct DirectoryState {
	users: HashMap<String, UserRecord>,
	nicknames: HashMap<String, String>,
	emails: HashMap<String, String>,
}

impl DirectoryState {
	/// The reason the nickname or email can't be claimed, if either is already taken
	fn conflict(&self, request: &SignUpRequest) -> Option<SignUpResponse> {
		if self.nicknames.contains_key(&request.nickname) {
			Some(SignUpResponse::NicknameInUse)
		} else if self.emails.contains_key(&request.email) {
			Some(SignUpResponse::EmailInUse)
		} else {
			None
		}
	}
}

/// The set of registered users, indexed by nickname and email so either can be checked for availability.
pub struct UserDirectory {
	state: Mutex<DirectoryState>,
	hasher: Argon2<'static>,
}

impl UserDirectory {
	pub fn new() -> Self {
		Self::with_hasher(Argon2::default())
	}

	fn with_hasher(hasher: Argon2<'static>) -> Self {
		Self {
			state: Mutex::new(DirectoryState::default()),
			hasher,
		}
	}

	/// Whether the nickname could be registered. Nicknames that fail validation are never available.
	pub async fn nickname_available(&self, nickname: &str) -> bool {
		if !validate_nickname(nickname).valid {
			return false;
		}
		!self.state.lock().await.nicknames.contains_key(nickname)
	}

	/// Whether the email could be registered. Malformed addresses are never available.
	pub async fn email_available(&self, email: &str) -> bool {
		if !validate_email_syntax(email) {
			return false;
		}
		!self.state.lock().await.emails.contains_key(email)
	}

	/// Creates the account if every field is valid and neither the nickname nor the email is taken.
	pub async fn register(&self, request: SignUpRequest) -> DataMessage<SignUpResponse> {
		if !validate_nickname(&request.nickname).valid {
			return Ok(SignUpResponse::InvalidField(ValidationField::Nickname));
		}
		if !validate_email_syntax(&request.email) {
			return Ok(SignUpResponse::InvalidField(ValidationField::Email));
		}
		if !validate_password_syntax(&request.password) {
			return Ok(SignUpResponse::InvalidField(ValidationField::Password));
		}
		if let Some(conflict) = self.state.lock().await.conflict(&request) {
			return Ok(conflict);
		}

		let password_hash = self.hash_password(request.password.clone()).await?;

		// Hashing happens outside the lock, so the values are checked again before they're claimed.
		let mut state = self.state.lock().await;
		if let Some(conflict) = state.conflict(&request) {
			return Ok(conflict);
		}

		let user = UserData {
			id: cuid2::create_id(),
			nickname: request.nickname,
			email: request.email,
			created_at: Utc::now(),
		};
		state.nicknames.insert(user.nickname.clone(), user.id.clone());
		state.emails.insert(user.email.clone(), user.id.clone());
		state.users.insert(
			user.id.clone(),
			UserRecord {
				user: user.clone(),
				password_hash,
			},
		);
		tide::log::info!("Registered user {} ({})", user.nickname, user.id);

		Ok(SignUpResponse::Success(user))
	}

	/// Looks up the account registered with the email and checks the password against it
	pub async fn sign_in(&self, email: &str, password: &str) -> Option<UserData> {
		let record = {
			let state = self.state.lock().await;
			let id = state.emails.get(email)?;
			state.users.get(id)?.clone()
		};

		let hasher = self.hasher.clone();
		let password = password.to_owned();
		let password_hash = record.password_hash;
		let verified = task::spawn_blocking(move || match PasswordHash::new(&password_hash) {
			Ok(hash) => hasher.verify_password(password.as_bytes(), &hash).is_ok(),
			Err(error) => {
				tide::log::error!("Stored password hash could not be parsed: {}", error);
				false
			}
		})
		.await;

		verified.then_some(record.user)
	}

	async fn hash_password(&self, password: String) -> DataMessage<String> {
		let hasher = self.hasher.clone();
		let hash_result = task::spawn_blocking(move || {
			let salt = SaltString::encode_b64(&random::<[u8; 16]>())?;
			let hash = hasher.hash_password(password.as_bytes(), &salt)?;
			Ok::<String, argon2::password_hash::Error>(hash.to_string())
		})
		.await;

		hash_result.map_err(|error| {
			tide::log::error!("Failed to hash a password: {}", error);
			DataError::ServerError
		})
	}
}

impl Default for UserDirectory {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
impl UserDirectory {
	/// A directory using the cheapest Argon2 parameters, to keep tests quick
	pub fn with_fast_hashing() -> Self {
		let params = argon2::Params::new(8, 1, 1, None).unwrap();
		Self::with_hasher(Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params))
	}
}
