//! The token stored in the auth cookie and its string encoding.

use time::OffsetDateTime;

use crate::{Error, user::UserId};

/// A token for authorization and authentication.
///
/// Tokens are stored in an encrypted private cookie, so the encoding does
/// not need to be tamper proof, only round-trippable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token {
    /// The ID of the logged in user.
    pub user_id: UserId,
    /// When the token stops being valid.
    pub expires_at: OffsetDateTime,
}

impl Token {
    /// Encode the token as a string for storage in a cookie.
    pub fn encode(&self) -> String {
        format!(
            "{}.{}",
            self.user_id.as_i64(),
            self.expires_at.unix_timestamp()
        )
    }

    /// Decode a token from its cookie string encoding.
    ///
    /// # Errors
    ///
    /// Returns [Error::Unauthorized] if the string is not a valid token
    /// encoding. A malformed cookie is treated the same as a missing one.
    pub fn decode(value: &str) -> Result<Self, Error> {
        let (raw_user_id, raw_expiry) = value.split_once('.').ok_or(Error::Unauthorized)?;

        let user_id: i64 = raw_user_id.parse().map_err(|_| Error::Unauthorized)?;
        let unix_timestamp: i64 = raw_expiry.parse().map_err(|_| Error::Unauthorized)?;
        let expires_at =
            OffsetDateTime::from_unix_timestamp(unix_timestamp).map_err(|_| Error::Unauthorized)?;

        Ok(Self {
            user_id: UserId::new(user_id),
            expires_at,
        })
    }
}
