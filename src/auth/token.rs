//! Defines the token stored in the auth cookie and how to serialize/deserialize it.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::UserID;

/// A token for authentication.
///
/// The token is stored as JSON in a private (encrypted) cookie, so the client can neither read
/// nor forge it.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Token {
    /// The authenticated user.
    pub user_id: UserID,

    /// When the token stops being valid.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl Token {
    /// Whether the token is no longer valid at `now`.
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}
