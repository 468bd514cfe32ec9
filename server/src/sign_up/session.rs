// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::form_state::{AvailabilityState, FormState, FormStateAggregator};
use super::tracker::{AvailabilityField, CheckTicket, CheckTracker};
use crate::availability::{AvailabilityChecker, CheckError};
use async_std::channel::Sender;
use async_std::future::timeout;
use async_std::sync::Arc;
use async_std::task;
use futures::future::Abortable;
use sopt_stamp_shared::messages::sign_up::{SignUpEvent, SignUpRequest, SignUpResponse, SignUpUpdate};
use sopt_stamp_shared::validation::{
	validate_email_syntax, validate_nickname, validate_password_match, validate_password_syntax, ValidationField,
	ValidationVerdict, DUPLICATED_EMAIL_MESSAGE, DUPLICATED_NICKNAME_MESSAGE, INVALID_EMAIL_MESSAGE,
	INVALID_PASSWORD_MESSAGE, PASSWORD_MISMATCH_MESSAGE, VALID_NICKNAME_MESSAGE,
};
use std::time::Duration;

/// The answer to an availability check, delivered back to the session that issued it
#[derive(Debug)]
pub struct CheckOutcome {
	pub ticket: CheckTicket,
	pub result: Result<bool, CheckError>,
}

#[derive(Default)]
struct FieldSnapshot {
	nickname: String,
	email: String,
	password: String,
	password_confirm: String,
}

/// One user's pass through the sign-up form.
///
/// Edits are validated immediately. Availability checks run on their own tasks and their outcomes come back through
/// the channel given to [`SignUpSession::new`]; the owner passes each one to [`SignUpSession::resolve_check`]. Every
/// operation returns the updates to show the user, ending with the current submittable flag.
pub struct SignUpSession {
	checker: Arc<dyn AvailabilityChecker>,
	check_timeout: Duration,
	outcome_tx: Sender<CheckOutcome>,
	fields: FieldSnapshot,
	form: FormStateAggregator,
	checks: CheckTracker,
}

impl SignUpSession {
	pub fn new(
		checker: Arc<dyn AvailabilityChecker>,
		check_timeout: Duration,
		outcome_tx: Sender<CheckOutcome>,
	) -> Self {
		Self {
			checker,
			check_timeout,
			outcome_tx,
			fields: FieldSnapshot::default(),
			form: FormStateAggregator::new(),
			checks: CheckTracker::new(),
		}
	}

	pub fn form_state(&self) -> &FormState {
		self.form.state()
	}

	pub async fn handle_event(&mut self, event: SignUpEvent) -> Vec<SignUpUpdate> {
		match event {
			SignUpEvent::EditNickname(nickname) => self.edit_nickname(nickname),
			SignUpEvent::EditEmail(email) => self.edit_email(email),
			SignUpEvent::EditPassword(password) => self.edit_password(password),
			SignUpEvent::EditPasswordConfirm(password_confirm) => self.edit_password_confirm(password_confirm),
			SignUpEvent::ResetNickname => self.reset_nickname(),
			SignUpEvent::ResetEmail => self.reset_email(),
			SignUpEvent::Submit => self.submit().await,
		}
	}

	pub fn edit_nickname(&mut self, nickname: String) -> Vec<SignUpUpdate> {
		let verdict = validate_nickname(&nickname);
		self.fields.nickname = nickname;
		self.form.set_nickname_verdict(verdict.clone());

		if verdict.valid {
			self.form.set_nickname_availability(AvailabilityState::Pending);
			self.start_check(AvailabilityField::Nickname, self.fields.nickname.clone());
		} else {
			self.checks.supersede(AvailabilityField::Nickname);
			self.form.set_nickname_availability(AvailabilityState::Unchecked);
		}

		vec![field_verdict(ValidationField::Nickname, verdict), self.submittable()]
	}

	pub fn edit_email(&mut self, email: String) -> Vec<SignUpUpdate> {
		let valid = validate_email_syntax(&email);
		self.fields.email = email;
		self.form.set_email_syntax_valid(valid);

		let verdict = if valid {
			self.form.set_email_availability(AvailabilityState::Pending);
			self.start_check(AvailabilityField::Email, self.fields.email.clone());
			ValidationVerdict::valid("")
		} else {
			self.checks.supersede(AvailabilityField::Email);
			self.form.set_email_availability(AvailabilityState::Unchecked);
			ValidationVerdict::invalid(INVALID_EMAIL_MESSAGE)
		};

		vec![field_verdict(ValidationField::Email, verdict), self.submittable()]
	}

	pub fn edit_password(&mut self, password: String) -> Vec<SignUpUpdate> {
		let valid = validate_password_syntax(&password);
		self.fields.password = password;
		self.form.set_password_syntax_valid(valid);

		let verdict = if valid {
			ValidationVerdict::valid("")
		} else {
			ValidationVerdict::invalid(INVALID_PASSWORD_MESSAGE)
		};
		let mut updates = vec![field_verdict(ValidationField::Password, verdict)];
		// The confirmation has to be judged against the new password, but there's nothing to say until it's typed
		let confirm_verdict = self.update_password_match();
		if !self.fields.password_confirm.is_empty() {
			updates.push(field_verdict(ValidationField::PasswordConfirm, confirm_verdict));
		}
		updates.push(self.submittable());
		updates
	}

	pub fn edit_password_confirm(&mut self, password_confirm: String) -> Vec<SignUpUpdate> {
		self.fields.password_confirm = password_confirm;
		let verdict = self.update_password_match();
		vec![field_verdict(ValidationField::PasswordConfirm, verdict), self.submittable()]
	}

	/// Forgets the nickname's availability result, as happens when the user starts editing the field again
	pub fn reset_nickname(&mut self) -> Vec<SignUpUpdate> {
		self.checks.supersede(AvailabilityField::Nickname);
		self.form.set_nickname_availability(AvailabilityState::Unchecked);
		vec![self.submittable()]
	}

	/// Forgets the email's availability result, as happens when the user starts editing the field again
	pub fn reset_email(&mut self) -> Vec<SignUpUpdate> {
		self.checks.supersede(AvailabilityField::Email);
		self.form.set_email_availability(AvailabilityState::Unchecked);
		vec![self.submittable()]
	}

	/// Applies the outcome of a finished availability check. Outcomes for superseded checks change nothing.
	pub fn resolve_check(&mut self, outcome: CheckOutcome) -> Vec<SignUpUpdate> {
		if !self.checks.complete(&outcome.ticket) {
			tide::log::debug!(
				"Discarding superseded {:?} check for {:?}",
				outcome.ticket.field,
				outcome.ticket.candidate
			);
			return Vec::new();
		}

		let field = outcome.ticket.field;
		let update = match outcome.result {
			Ok(available) => {
				let availability = if available {
					AvailabilityState::Available
				} else {
					AvailabilityState::Taken
				};
				self.set_availability(field, availability)
			}
			Err(error) => {
				tide::log::warn!(
					"Availability check of {:?} for {:?} failed: {}",
					field,
					outcome.ticket.candidate,
					error
				);
				self.set_availability(field, AvailabilityState::Failed(error.to_string()));
				SignUpUpdate::AvailabilityFailed {
					field: field.into(),
					error: error.to_string(),
				}
			}
		};
		vec![update, self.submittable()]
	}

	/// Sends the current field values to the directory if the form is submittable
	pub async fn submit(&mut self) -> Vec<SignUpUpdate> {
		if let Some(field) = self.form.state().first_invalid_field() {
			return vec![SignUpUpdate::SignUpResult(Ok(SignUpResponse::InvalidField(field)))];
		}

		let request = SignUpRequest {
			nickname: self.fields.nickname.clone(),
			email: self.fields.email.clone(),
			password: self.fields.password.clone(),
		};
		let result = match timeout(self.check_timeout, self.checker.submit_sign_up(&request)).await {
			Ok(result) => result,
			Err(timed_out) => Err(timed_out.into()),
		};

		let response = match result {
			Ok(response) => response,
			Err(error) => {
				tide::log::error!("Sign-up submission for {:?} failed: {}", request.nickname, error);
				return vec![SignUpUpdate::SignUpResult(Err(error.data_error()))];
			}
		};

		// Someone else may have claimed a value between its check and this submission
		let mut updates = match &response {
			SignUpResponse::NicknameInUse => vec![
				self.set_availability(AvailabilityField::Nickname, AvailabilityState::Taken),
				self.submittable(),
			],
			SignUpResponse::EmailInUse => vec![
				self.set_availability(AvailabilityField::Email, AvailabilityState::Taken),
				self.submittable(),
			],
			SignUpResponse::Success(user) => {
				tide::log::info!("Completed sign-up for {} ({})", user.nickname, user.id);
				Vec::new()
			}
			SignUpResponse::InvalidField(_) => Vec::new(),
		};
		updates.push(SignUpUpdate::SignUpResult(Ok(response)));
		updates
	}

	/// Abandons any outstanding checks
	pub fn close(&mut self) {
		self.checks.abort_all();
	}

	fn submittable(&self) -> SignUpUpdate {
		SignUpUpdate::Submittable(self.form.submittable())
	}

	fn update_password_match(&mut self) -> ValidationVerdict {
		let matches = validate_password_match(&self.fields.password, &self.fields.password_confirm);
		self.form.set_password_match(matches);
		if matches {
			ValidationVerdict::valid("")
		} else {
			ValidationVerdict::invalid(PASSWORD_MISMATCH_MESSAGE)
		}
	}

	/// Stores the availability of a field and returns the verdict update for it
	fn set_availability(&mut self, field: AvailabilityField, availability: AvailabilityState) -> SignUpUpdate {
		let message = match (field, &availability) {
			(AvailabilityField::Nickname, AvailabilityState::Available) => VALID_NICKNAME_MESSAGE,
			(AvailabilityField::Nickname, AvailabilityState::Taken) => DUPLICATED_NICKNAME_MESSAGE,
			(AvailabilityField::Email, AvailabilityState::Taken) => DUPLICATED_EMAIL_MESSAGE,
			_ => "",
		};
		let verdict = ValidationVerdict {
			valid: availability.is_available(),
			message: message.to_owned(),
		};

		match field {
			AvailabilityField::Nickname => self.form.set_nickname_availability(availability),
			AvailabilityField::Email => self.form.set_email_availability(availability),
		};
		field_verdict(field.into(), verdict)
	}

	fn start_check(&mut self, field: AvailabilityField, candidate: String) {
		let (ticket, registration) = self.checks.issue(field, candidate.clone());
		let checker = Arc::clone(&self.checker);
		let outcome_tx = self.outcome_tx.clone();
		let check_timeout = self.check_timeout;

		task::spawn(async move {
			let check = async move {
				match field {
					AvailabilityField::Nickname => checker.check_nickname_available(&candidate).await,
					AvailabilityField::Email => checker.check_email_available(&candidate).await,
				}
			};
			let Ok(result) = Abortable::new(timeout(check_timeout, check), registration).await else {
				tide::log::debug!("Aborted superseded {:?} check for {:?}", ticket.field, ticket.candidate);
				return;
			};
			let result = match result {
				Ok(result) => result,
				Err(timed_out) => Err(timed_out.into()),
			};
			// The session is gone if the receiver is closed, and then nobody wants the result.
			let _ = outcome_tx.send(CheckOutcome { ticket, result }).await;
		});
	}
}

impl Drop for SignUpSession {
	fn drop(&mut self) {
		self.close();
	}
}

fn field_verdict(field: ValidationField, verdict: ValidationVerdict) -> SignUpUpdate {
	SignUpUpdate::FieldVerdict { field, verdict }
}
