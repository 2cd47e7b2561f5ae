//! Bridge authentication middleware for protected endpoints.
//!
//! The chat bridge authenticates with a shared bearer token and names the
//! chat user it acts for in `x-actor-*` headers. The middleware checks the
//! token, builds an [`Actor`] from the headers and injects it into request
//! extensions for downstream handlers.
//!
//! # Extracting the actor
//!
//! ```rust,no_run
//! use axum::extract::Extension;
//! use inhouse::auth::Actor;
//!
//! async fn protected_handler(Extension(actor): Extension<Actor>) -> String {
//!     format!("Acting for user {}", actor.user_id)
//! }
//! # let _ = protected_handler;
//! ```

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use inhouse::{
    auth::{Actor, AuthError},
    lobby::{GuildId, UserId},
};

use super::{
    AppState,
    error::{ApiError, ApiResult},
};
use crate::{logging, metrics};

/// Chat user ID header
pub const ACTOR_ID_HEADER: &str = "x-actor-id";
/// Chat display name header
pub const ACTOR_NAME_HEADER: &str = "x-actor-name";
/// `true` when the user holds the guild's administrator permission
pub const ACTOR_ADMIN_HEADER: &str = "x-actor-admin";
/// Comma-separated guild role names
pub const ACTOR_ROLES_HEADER: &str = "x-actor-roles";

/// Authentication middleware that checks the bridge token and injects the actor.
///
/// # Request Headers
///
/// ```text
/// Authorization: Bearer <bridge token>
/// x-actor-id: 123456789
/// x-actor-name: Tidebringer
/// x-actor-admin: false
/// x-actor-roles: Inhouse Admin,Coaches
/// ```
///
/// # Behavior
///
/// - **Missing or wrong token**: `401 Unauthorized`
/// - **Missing or malformed actor headers**: `400 Bad Request`
/// - **Success**: injects `Actor` into request extensions and calls the next handler
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if let Err(e) = state.bridge_token.verify(token) {
        let reason = match e {
            AuthError::MissingToken => "missing_bridge_token",
            _ => "invalid_bridge_token",
        };
        logging::log_security_event(reason, None, None, "Rejected bridge request");
        metrics::auth_denials_total(reason);
        return Err(e.into());
    }

    let actor = actor_from_headers(request.headers())?;
    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

/// Reject actors without admin rights for `action`
///
/// Denials are logged as security events and counted.
pub fn require_admin(
    state: &AppState,
    actor: &Actor,
    guild_id: Option<GuildId>,
    action: &str,
) -> ApiResult<()> {
    state.policy.require_admin(actor, action).map_err(|e| {
        logging::log_security_event(
            "forbidden",
            Some(actor.user_id),
            guild_id,
            &format!("{} denied", action),
        );
        metrics::auth_denials_total("forbidden");
        ApiError::from(e)
    })
}

/// Build the acting user from the `x-actor-*` headers
pub fn actor_from_headers(headers: &HeaderMap) -> ApiResult<Actor> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
    };

    let user_id = header(ACTOR_ID_HEADER)
        .ok_or_else(|| ApiError::BadRequest(format!("Missing {} header", ACTOR_ID_HEADER)))?
        .parse::<UserId>()
        .map_err(|_| ApiError::BadRequest(format!("Malformed {} header", ACTOR_ID_HEADER)))?;

    let display_name = header(ACTOR_NAME_HEADER)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("user{}", user_id));

    let mut actor = Actor::new(user_id, display_name);
    actor.is_administrator = header(ACTOR_ADMIN_HEADER)
        .is_some_and(|value| value.eq_ignore_ascii_case("true") || value == "1");
    actor.roles = header(ACTOR_ROLES_HEADER)
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|role| !role.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(actor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(*name, HeaderValue::from_static(value));
        }
        headers
    }

    #[test]
    fn test_actor_from_headers() {
        let actor = actor_from_headers(&headers(&[
            (ACTOR_ID_HEADER, "42"),
            (ACTOR_NAME_HEADER, "Tidebringer"),
            (ACTOR_ADMIN_HEADER, "TRUE"),
            (ACTOR_ROLES_HEADER, "Inhouse Admin, Coaches,"),
        ]))
        .unwrap();

        assert_eq!(actor.user_id, 42);
        assert_eq!(actor.display_name, "Tidebringer");
        assert!(actor.is_administrator);
        assert_eq!(actor.roles, vec!["Inhouse Admin", "Coaches"]);
    }

    #[test]
    fn test_actor_defaults() {
        let actor = actor_from_headers(&headers(&[(ACTOR_ID_HEADER, "7")])).unwrap();

        assert_eq!(actor.display_name, "user7");
        assert!(!actor.is_administrator);
        assert!(actor.roles.is_empty());
    }

    #[test]
    fn test_actor_id_required() {
        assert!(matches!(
            actor_from_headers(&HeaderMap::new()),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            actor_from_headers(&headers(&[(ACTOR_ID_HEADER, "abc")])),
            Err(ApiError::BadRequest(_))
        ));
    }
}
