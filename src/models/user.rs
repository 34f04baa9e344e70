use serde::Serialize;

use crate::credentials::CredentialRecord;

/// XP needed to advance one level.
pub const XP_PER_LEVEL: i32 = 100;

/// Stored user record. Not `Serialize`: API responses go through
/// [`crate::api::UserDto`], which has no credential field.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub credential: CredentialRecord,
    pub first_name: String,
    pub last_name: String,
    pub streak: i32,
    pub xp: i32,
    pub level: i32,
}

/// Registration input after the password has been hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub credential: CredentialRecord,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub user_id: i32,
    pub username: String,
    pub name: String,
    pub xp: i32,
    pub level: i32,
    pub streak: i32,
    pub rank: usize,
}

#[must_use]
pub const fn level_for_xp(xp: i32) -> i32 {
    xp / XP_PER_LEVEL + 1
}
