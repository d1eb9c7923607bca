// SPDX-License-Identifier: Apache-2.0

use catchdex_model::{GameKey, UserId};
use std::path::{Path, PathBuf};

/// One durable record per (identity, game):
/// `<root>/<user>/caught-<game>.json`. `UserId::parse` guarantees the user
/// segment is a safe directory name.
#[must_use]
pub fn record_path(root: &Path, user: &UserId, game: GameKey) -> PathBuf {
    user_dir(root, user).join(format!("caught-{}.json", game.as_str()))
}

#[must_use]
pub fn user_dir(root: &Path, user: &UserId) -> PathBuf {
    root.join(user.as_str())
}
