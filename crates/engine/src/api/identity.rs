//! Caller identity extraction.
//!
//! Game clients authenticate with a session cookie of the form
//! `sid=token:<session>:<uuid>;user=<name>;version=<client version>`.
//! The admin surface uses a shared key in the Authorization header.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::http::ApiError;
use crate::app::App;

/// The player a request is acting as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentity {
    pub uuid: String,
    pub name: String,
    pub version: String,
}

fn parse_cookie(raw: &str) -> Option<PlayerIdentity> {
    let mut segments = raw.splitn(3, ';');
    let sid = segments.next()?.trim();
    let user = segments.next()?.trim();
    let version = segments.next()?.trim();

    if !sid.starts_with("sid=") {
        return None;
    }
    let uuid = sid.split(':').nth(2)?;

    let name = match user.split_once('=') {
        Some(("user", name)) if !name.is_empty() => name,
        _ => return None,
    };
    let version = match version.split_once('=') {
        Some(("version", version)) if !version.is_empty() => version,
        _ => return None,
    };

    Some(PlayerIdentity {
        uuid: uuid.to_string(),
        name: name.to_string(),
        version: version.to_string(),
    })
}

impl<S> FromRequestParts<S> for PlayerIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(axum::http::header::COOKIE)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Authorization required".to_string()))?;

        parse_cookie(raw)
            .ok_or_else(|| ApiError::Unauthorized("Malformed cookie header".to_string()))
    }
}

/// Marker extracted only when the request carries the configured admin key.
pub struct AdminAccess;

impl FromRequestParts<Arc<App>> for AdminAccess {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<App>) -> Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        match (state.admin_key.as_deref(), provided) {
            (Some(expected), Some(given)) if expected == given => Ok(AdminAccess),
            _ => Err(ApiError::Forbidden(
                "You don't have access to this resource".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_well_formed_cookie() {
        let identity =
            parse_cookie("sid=token:abc123:uuid-42;user=Steve;version=1.20.1").unwrap();
        assert_eq!(identity.uuid, "uuid-42");
        assert_eq!(identity.name, "Steve");
        assert_eq!(identity.version, "1.20.1");
    }

    #[test]
    fn tolerates_whitespace_between_segments() {
        let identity =
            parse_cookie("sid=token:abc:u1; user=Alex; version=23w31a").unwrap();
        assert_eq!(identity.name, "Alex");
        assert_eq!(identity.version, "23w31a");
    }

    #[test]
    fn rejects_malformed_cookies() {
        for raw in [
            "",
            "sid=token",
            "sid=token:abc:u1;user=Steve",
            "user=Steve;version=1.20.1;sid=token:abc:u1",
            "sid=tokenabc;user=Steve;version=1.20.1",
            "sid=token:abc:u1;user=;version=1.20.1",
        ] {
            assert!(parse_cookie(raw).is_none(), "accepted {raw:?}");
        }
    }
}
