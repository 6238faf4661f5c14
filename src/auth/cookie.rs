//! Functions for handling user authentication with private cookies.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::token::Token, user::UserId};

pub(crate) const COOKIE_TOKEN: &str = "auth_token";

/// Add an auth cookie to the cookie jar, indicating that a user is logged in
/// and authenticated.
///
/// Sets the expiry of the cookie to `duration` from the current time. The
/// auth middleware reissues the cookie on every authenticated request, so
/// the session stays alive while the user is active.
///
/// Returns the cookie jar with the cookie added.
pub(crate) fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserId,
    duration: Duration,
) -> PrivateCookieJar {
    let expires_at = OffsetDateTime::now_utc() + duration;
    let token = Token {
        user_id,
        expires_at,
    };

    jar.add(
        Cookie::build((COOKIE_TOKEN, token.encode()))
            .expires(expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Set the auth cookie to an invalid value and set its max age to zero,
/// which should delete the cookie on the client side.
pub(crate) fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Get the auth token from the cookie jar and check that it has not expired.
///
/// # Errors
///
/// Returns [Error::Unauthorized] if the cookie is missing, malformed or
/// expired.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::Unauthorized)?;
    let token = Token::decode(cookie.value())?;

    if token.expires_at <= OffsetDateTime::now_utc() {
        return Err(Error::Unauthorized);
    }

    Ok(token)
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use time::Duration;

    use crate::{
        Error,
        auth::cookie::{get_token_from_cookies, invalidate_auth_cookie, set_auth_cookie},
        user::UserId,
    };

    fn empty_jar() -> PrivateCookieJar {
        PrivateCookieJar::new(Key::generate())
    }

    #[test]
    fn round_trips_token_through_jar() {
        let user_id = UserId::new(7);

        let jar = set_auth_cookie(empty_jar(), user_id, Duration::minutes(5));
        let token = get_token_from_cookies(&jar).unwrap();

        assert_eq!(token.user_id, user_id);
    }

    #[test]
    fn missing_cookie_is_unauthorized() {
        assert_eq!(
            get_token_from_cookies(&empty_jar()),
            Err(Error::Unauthorized)
        );
    }

    #[test]
    fn expired_cookie_is_unauthorized() {
        let jar = set_auth_cookie(empty_jar(), UserId::new(7), Duration::minutes(-5));

        assert_eq!(get_token_from_cookies(&jar), Err(Error::Unauthorized));
    }

    #[test]
    fn invalidated_cookie_is_unauthorized() {
        let jar = set_auth_cookie(empty_jar(), UserId::new(7), Duration::minutes(5));
        let jar = invalidate_auth_cookie(jar);

        assert_eq!(get_token_from_cookies(&jar), Err(Error::Unauthorized));
    }
}
