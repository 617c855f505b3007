//! The session token stored, encrypted, in the auth cookie.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, auth::UserID};

// The default `OffsetDateTime` serde format writes midnight as "0:00:00.0",
// which it then refuses to parse, so the expiry gets a fixed-width format.
time::serde::format_description!(
    expiry_format,
    OffsetDateTime,
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] \
     [offset_hour sign:mandatory]:[offset_minute]:[offset_second]"
);

/// Identifies the logged-in user until `expires_at`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Token {
    pub user_id: UserID,
    #[serde(with = "expiry_format")]
    pub expires_at: OffsetDateTime,
}

impl Token {
    pub fn new(user_id: UserID, expires_at: OffsetDateTime) -> Self {
        Self {
            user_id,
            expires_at,
        }
    }

    /// Whether the session has ended at `now`.
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }

    /// Serialize the token for the cookie value.
    ///
    /// # Errors
    /// Returns [Error::InvalidToken] if the expiry cannot be formatted.
    pub fn encode(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(|error| Error::InvalidToken(error.to_string()))
    }

    /// Read a token from a cookie value. Expiry is not checked.
    ///
    /// # Errors
    /// Returns [Error::InvalidToken] if `value` is not an encoded token.
    pub fn decode(value: &str) -> Result<Self, Error> {
        serde_json::from_str(value).map_err(|error| Error::InvalidToken(error.to_string()))
    }
}
