// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use knuffel::Decode;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::time::Duration;

#[derive(Debug, Decode)]
pub struct ConfigDocument {
	#[knuffel(child, unwrap(argument))]
	pub listen: String,
	#[knuffel(child, unwrap(argument), default = 5000)]
	pub check_timeout_ms: u64,
	/// When set, availability checks and registrations go to another server's API instead of this one's directory
	#[knuffel(child)]
	pub directory: Option<RemoteDirectoryConfig>,
}

impl ConfigDocument {
	pub fn check_timeout(&self) -> Duration {
		Duration::from_millis(self.check_timeout_ms)
	}
}

#[derive(Debug, Decode)]
pub struct RemoteDirectoryConfig {
	#[knuffel(property)]
	pub host: String,
	#[knuffel(property)]
	pub port: u16,
}

pub fn parse_config(path: &str) -> Result<ConfigDocument> {
	let config_file_contents = fs::read_to_string(path).into_diagnostic()?;
	parse_config_text(path, &config_file_contents)
}

fn parse_config_text(file_name: &str, text: &str) -> Result<ConfigDocument> {
	let config = knuffel::parse(file_name, text).into_diagnostic()?;
	Ok(config)
}
