// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Field checks shared by the sign-up form and the user directory.
//!
//! Everything here is synchronous and side-effect free. Whether a nickname or email is already taken is not known
//! here; that's answered by an availability check against the directory.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const NICKNAME_LENGTH_LIMIT: usize = 10;
pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const PASSWORD_MAX_LENGTH: usize = 15;

/// Symbols of which a password needs at least one
pub const PASSWORD_SYMBOLS: &[char] = &['!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '_', '+', '=', '-'];

pub const NICKNAME_PLACEHOLDER_MESSAGE: &str = "Enter a nickname of up to 10 Korean or English characters.";
pub const VALID_NICKNAME_MESSAGE: &str = "This nickname is available.";
pub const DUPLICATED_NICKNAME_MESSAGE: &str = "This nickname is already in use.";
pub const INVALID_EMAIL_MESSAGE: &str = "Check the format of the email address.";
pub const DUPLICATED_EMAIL_MESSAGE: &str = "This email is already registered.";
pub const INVALID_PASSWORD_MESSAGE: &str =
	"Use 8 to 15 characters including an English letter, a number, and a special character.";
pub const PASSWORD_MISMATCH_MESSAGE: &str = "The passwords do not match.";

static NICKNAME_PATTERN: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"^[가-힣ㄱ-ㅣA-Za-z\s]{1,10}$").expect("nickname pattern is valid"));
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"^[A-Z0-9a-z._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,64}$").expect("email pattern is valid")
});

/// The kinds of input on the sign-up form
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ValidationField {
	Nickname,
	Email,
	Password,
	PasswordConfirm,
}

/// The judgment on one field along with the message to show next to it
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ValidationVerdict {
	pub valid: bool,
	pub message: String,
}

impl ValidationVerdict {
	pub fn valid(message: &str) -> Self {
		Self {
			valid: true,
			message: message.to_owned(),
		}
	}

	pub fn invalid(message: &str) -> Self {
		Self {
			valid: false,
			message: message.to_owned(),
		}
	}
}

/// Checks the nickname's characters and length. A nickname made only of whitespace, of any kind the pattern
/// admits, is rejected.
///
/// A valid verdict carries no message; the message for a valid nickname depends on the availability check.
pub fn validate_nickname(nickname: &str) -> ValidationVerdict {
	let blank = nickname.chars().all(char::is_whitespace);
	if NICKNAME_PATTERN.is_match(nickname) && !blank {
		ValidationVerdict::valid("")
	} else {
		ValidationVerdict::invalid(NICKNAME_PLACEHOLDER_MESSAGE)
	}
}

pub fn validate_email_syntax(email: &str) -> bool {
	EMAIL_PATTERN.is_match(email)
}

/// Checks that the password is 8-15 characters on one line and mixes letters, digits, and symbols.
pub fn validate_password_syntax(password: &str) -> bool {
	let length = password.chars().count();
	if !(PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&length) {
		return false;
	}
	if password.chars().any(is_line_break) {
		return false;
	}

	let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
	let has_digit = password.chars().any(|c| c.is_ascii_digit());
	let has_symbol = password.chars().any(|c| PASSWORD_SYMBOLS.contains(&c));
	has_letter && has_digit && has_symbol
}

pub fn validate_password_match(password: &str, confirmation: &str) -> bool {
	password == confirmation
}

fn is_line_break(c: char) -> bool {
	matches!(c, '\n' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn accepts_korean_and_english_nicknames() {
		assert!(validate_nickname("Alice").valid);
		assert!(validate_nickname("솝트").valid);
		assert!(validate_nickname("ㅋㅋ").valid);
		assert!(validate_nickname("솝트 Stamp").valid);
		assert!(validate_nickname(&"a".repeat(NICKNAME_LENGTH_LIMIT)).valid);
		assert_eq!(validate_nickname("Alice").message, "");
	}

	#[test]
	fn rejects_bad_nicknames() {
		let empty = validate_nickname("");
		assert!(!empty.valid);
		assert_eq!(empty.message, NICKNAME_PLACEHOLDER_MESSAGE);

		assert!(!validate_nickname("   ").valid);
		assert!(!validate_nickname(&"a".repeat(NICKNAME_LENGTH_LIMIT + 1)).valid);
		assert!(!validate_nickname("alice1").valid);
		assert!(!validate_nickname("alice_").valid);
		assert!(!validate_nickname("用户").valid);
	}

	#[test]
	fn rejects_nicknames_of_any_whitespace() {
		assert!(!validate_nickname("\t").valid);
		assert!(!validate_nickname("\u{3000}").valid);
		assert!(!validate_nickname("\n\n").valid);
		assert!(!validate_nickname(" \t\u{3000}").valid);
		assert!(validate_nickname("\u{3000}솝트").valid);
	}

	#[test]
	fn nickname_length_limit_is_inclusive() {
		for length in 0..20 {
			let nickname = "a".repeat(length);
			assert_eq!(
				validate_nickname(&nickname).valid,
				(1..=NICKNAME_LENGTH_LIMIT).contains(&length),
				"nickname of length {}",
				length
			);
		}
	}

	#[test]
	fn nickname_length_counts_characters() {
		// Ten Hangul syllables are thirty bytes
		assert!(validate_nickname("가나다라마바사아자차").valid);
		assert!(!validate_nickname("가나다라마바사아자차카").valid);
	}

	#[test]
	fn email_syntax() {
		assert!(validate_email_syntax("a@b.com"));
		assert!(validate_email_syntax("first.last+tag@mail.sopt.org"));
		assert!(validate_email_syntax(&format!("a@b.{}", "c".repeat(64))));
		assert!(validate_email_syntax("user%tag@b.com"));
		assert!(validate_email_syntax("a_b-c@sub-domain.co.kr"));
		assert!(validate_email_syntax("a@b.CO"));

		assert!(!validate_email_syntax(""));
		assert!(!validate_email_syntax("a@b"));
		assert!(!validate_email_syntax("a@b.c"));
		assert!(!validate_email_syntax("ab.com"));
		assert!(!validate_email_syntax("a@b.c0m"));
		assert!(!validate_email_syntax(" a@b.com"));
		assert!(!validate_email_syntax(&format!("a@b.{}", "c".repeat(65))));
		assert!(!validate_email_syntax("a b@c.com"));
		assert!(!validate_email_syntax("솝트@b.com"));
		assert!(!validate_email_syntax("a@@b.com"));
	}

	#[test]
	fn password_syntax() {
		assert!(validate_password_syntax("abc12345!"));
		assert!(validate_password_syntax("A1-aaaaa"));
		assert!(validate_password_syntax("abcdefghijk12=+"));

		assert!(!validate_password_syntax("abc12!x"));
		assert!(!validate_password_syntax("abcdefghijk123=+"));
		assert!(!validate_password_syntax("abcdefgh!"));
		assert!(!validate_password_syntax("12345678!"));
		assert!(!validate_password_syntax("abc123456"));
		assert!(!validate_password_syntax("abc12345?"));
		assert!(!validate_password_syntax("abc1234\n!"));
	}

	#[test]
	fn password_length_counts_characters() {
		// Each Hangul syllable is one character toward the limit
		assert!(validate_password_syntax("a1!가나다라마바사아자차카타"));
		assert!(!validate_password_syntax("a1!가나다라마바사아자차카타파"));
		assert!(!validate_password_syntax("가나다라12345!"));

		for length in 0..20 {
			let password = format!("a1!{}", "b".repeat(length.max(3) - 3));
			let password_length = password.chars().count();
			assert_eq!(
				validate_password_syntax(&password),
				(PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&password_length),
				"password of length {}",
				password_length
			);
		}
	}

	#[test]
	fn password_match_is_exact() {
		assert!(validate_password_match("abc12345!", "abc12345!"));
		assert!(!validate_password_match("abc12345!", "abc12345"));
		assert!(!validate_password_match("abc12345!", "ABC12345!"));
		assert!(validate_password_match("", ""));
	}
}
