// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use sopt_stamp_shared::validation::{ValidationField, ValidationVerdict};

/// What is known about whether a nickname or email is free
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum AvailabilityState {
	/// No check has been made for the current value of the field
	#[default]
	Unchecked,
	Pending,
	Available,
	Taken,
	/// The last check couldn't be answered
	Failed(String),
}

impl AvailabilityState {
	pub fn is_available(&self) -> bool {
		matches!(self, Self::Available)
	}
}

/// The latest value of every input to form validity, plus the validity derived from them
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FormState {
	pub nickname: ValidationVerdict,
	pub nickname_availability: AvailabilityState,
	pub email_syntax_valid: bool,
	pub email_availability: AvailabilityState,
	pub password_syntax_valid: bool,
	pub password_match: bool,
	pub submittable: bool,
}

impl FormState {
	/// The first field keeping the form from being submitted, if any
	pub fn first_invalid_field(&self) -> Option<ValidationField> {
		if !self.nickname.valid || !self.nickname_availability.is_available() {
			Some(ValidationField::Nickname)
		} else if !self.email_syntax_valid || !self.email_availability.is_available() {
			Some(ValidationField::Email)
		} else if !self.password_syntax_valid {
			Some(ValidationField::Password)
		} else if !self.password_match {
			Some(ValidationField::PasswordConfirm)
		} else {
			None
		}
	}
}

/// Joins the six validity signals of the sign-up form by their latest values.
///
/// Every setter replaces one slot and recomputes `submittable` before returning, so the state handed out never mixes
/// an old derived value with new inputs.
#[derive(Debug, Default)]
pub struct FormStateAggregator {
	state: FormState,
}

impl FormStateAggregator {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn state(&self) -> &FormState {
		&self.state
	}

	pub fn submittable(&self) -> bool {
		self.state.submittable
	}

	pub fn set_nickname_verdict(&mut self, verdict: ValidationVerdict) -> &FormState {
		self.state.nickname = verdict;
		self.recompute()
	}

	pub fn set_nickname_availability(&mut self, availability: AvailabilityState) -> &FormState {
		self.state.nickname_availability = availability;
		self.recompute()
	}

	pub fn set_email_syntax_valid(&mut self, valid: bool) -> &FormState {
		self.state.email_syntax_valid = valid;
		self.recompute()
	}

	pub fn set_email_availability(&mut self, availability: AvailabilityState) -> &FormState {
		self.state.email_availability = availability;
		self.recompute()
	}

	pub fn set_password_syntax_valid(&mut self, valid: bool) -> &FormState {
		self.state.password_syntax_valid = valid;
		self.recompute()
	}

	pub fn set_password_match(&mut self, matches: bool) -> &FormState {
		self.state.password_match = matches;
		self.recompute()
	}

	fn recompute(&mut self) -> &FormState {
		self.state.submittable = self.state.first_invalid_field().is_none();
		&self.state
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use sopt_stamp_shared::validation::{
		validate_email_syntax, validate_nickname, validate_password_match, validate_password_syntax,
	};

	fn filled_form() -> FormStateAggregator {
		let mut form = FormStateAggregator::new();
		form.set_nickname_verdict(validate_nickname("Alice"));
		form.set_nickname_availability(AvailabilityState::Available);
		form.set_email_syntax_valid(validate_email_syntax("a@b.com"));
		form.set_email_availability(AvailabilityState::Available);
		form.set_password_syntax_valid(validate_password_syntax("abc12345!"));
		form.set_password_match(validate_password_match("abc12345!", "abc12345!"));
		form
	}

	#[test]
	fn starts_unsubmittable() {
		let form = FormStateAggregator::new();
		assert!(!form.submittable());
		assert_eq!(form.state().nickname_availability, AvailabilityState::Unchecked);
		assert_eq!(form.state().first_invalid_field(), Some(ValidationField::Nickname));
	}

	#[test]
	fn submittable_once_every_signal_holds() {
		let form = filled_form();
		assert!(form.submittable());
		assert_eq!(form.state().first_invalid_field(), None);
	}

	#[test]
	fn any_failing_signal_blocks_submission() {
		let mut form = filled_form();
		assert!(!form.set_nickname_verdict(validate_nickname("")).submittable);
		assert!(form.set_nickname_verdict(validate_nickname("Alice")).submittable);

		assert!(!form.set_nickname_availability(AvailabilityState::Taken).submittable);
		assert!(form.set_nickname_availability(AvailabilityState::Available).submittable);

		assert!(!form.set_email_syntax_valid(false).submittable);
		assert!(form.set_email_syntax_valid(true).submittable);

		assert!(!form.set_email_availability(AvailabilityState::Pending).submittable);
		assert!(form.set_email_availability(AvailabilityState::Available).submittable);

		assert!(!form.set_password_syntax_valid(false).submittable);
		assert!(form.set_password_syntax_valid(true).submittable);

		let mismatch = validate_password_match("abc12345!", "abc12345");
		assert!(!form.set_password_match(mismatch).submittable);
		assert_eq!(form.state().first_invalid_field(), Some(ValidationField::PasswordConfirm));
	}

	#[test]
	fn failed_check_is_unresolved_not_taken() {
		let mut form = filled_form();
		let state = form.set_email_availability(AvailabilityState::Failed(String::from("timed out")));
		assert!(!state.submittable);
		assert_ne!(state.email_availability, AvailabilityState::Taken);
		assert_eq!(state.first_invalid_field(), Some(ValidationField::Email));
	}
}
