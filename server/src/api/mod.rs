// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::directory::UserDirectory;
use async_std::sync::Arc;
use tide::Server;

mod v1;

pub fn add_routes(app: &mut Server<()>, directory: Arc<UserDirectory>) {
	v1::add_routes(app, directory);
}
