// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use futures::future::{AbortHandle, AbortRegistration};
use sopt_stamp_shared::validation::ValidationField;

/// The fields whose values are checked against the user directory
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AvailabilityField {
	Nickname,
	Email,
}

impl From<AvailabilityField> for ValidationField {
	fn from(field: AvailabilityField) -> Self {
		match field {
			AvailabilityField::Nickname => Self::Nickname,
			AvailabilityField::Email => Self::Email,
		}
	}
}

/// Identifies one issued availability check
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CheckTicket {
	pub field: AvailabilityField,
	pub generation: u64,
	pub candidate: String,
}

#[derive(Default)]
struct FieldChecks {
	generation: u64,
	in_flight: Option<AbortHandle>,
}

impl FieldChecks {
	fn supersede(&mut self) {
		self.generation += 1;
		if let Some(handle) = self.in_flight.take() {
			handle.abort();
		}
	}
}

/// Keeps at most one live availability check per field.
///
/// Issuing a check aborts the previous one for the same field. A result that was already delivered before the abort
/// carries an old generation and is rejected by [`CheckTracker::complete`].
#[derive(Default)]
pub struct CheckTracker {
	nickname: FieldChecks,
	email: FieldChecks,
}

impl CheckTracker {
	pub fn new() -> Self {
		Self::default()
	}

	fn checks(&mut self, field: AvailabilityField) -> &mut FieldChecks {
		match field {
			AvailabilityField::Nickname => &mut self.nickname,
			AvailabilityField::Email => &mut self.email,
		}
	}

	/// Starts tracking a new check. The returned registration makes the check's future abortable.
	pub fn issue(&mut self, field: AvailabilityField, candidate: String) -> (CheckTicket, AbortRegistration) {
		let checks = self.checks(field);
		checks.supersede();
		let (handle, registration) = AbortHandle::new_pair();
		checks.in_flight = Some(handle);
		let ticket = CheckTicket {
			field,
			generation: checks.generation,
			candidate,
		};
		(ticket, registration)
	}

	/// Drops interest in any outstanding check for the field without starting another
	pub fn supersede(&mut self, field: AvailabilityField) {
		self.checks(field).supersede();
	}

	/// Marks the check done. Returns false if the ticket was superseded and its result should be ignored.
	pub fn complete(&mut self, ticket: &CheckTicket) -> bool {
		let checks = self.checks(ticket.field);
		if checks.generation != ticket.generation {
			return false;
		}
		checks.in_flight = None;
		true
	}

	pub fn abort_all(&mut self) {
		self.nickname.supersede();
		self.email.supersede();
	}
}
