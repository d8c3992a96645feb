//! Login, refresh and revoke.
//!
//! A user is `LoggedIn` while their record holds a refresh token and
//! `LoggedOut` once it is cleared. Logging in again replaces the token.

use tracing::{info, warn};

use chirpy_crypto::tokens::generate_refresh_token;
use chirpy_types::api::{LoginRequest, LoginResponse, RefreshResponse};

use crate::AppStateInner;
use crate::error::{ApiError, Result};
use crate::tokens::{issue_access_token, validate_access_token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn,
}

/// Requested lifetime if it is positive and within the configured maximum,
/// otherwise the default (which is also the maximum).
pub fn effective_ttl(requested: Option<i64>, max: i64) -> i64 {
    match requested {
        Some(ttl) if ttl > 0 && ttl <= max => ttl,
        _ => max,
    }
}

pub fn login(state: &AppStateInner, req: &LoginRequest) -> Result<LoginResponse> {
    let user = state.db.authenticate_user(&req.password)?.ok_or_else(|| {
        warn!(email = %req.email, "Login rejected");
        ApiError::Unauthorized
    })?;

    let ttl = effective_ttl(req.expires_in_seconds, state.config.access_token_ttl);
    let token = issue_access_token(&state.config.jwt_secret, user.id, ttl)?;
    let refresh_token = generate_refresh_token();

    state.db.set_refresh_token(user.id, &refresh_token)?;
    info!(user_id = user.id, "User logged in");

    Ok(LoginResponse {
        user,
        token,
        refresh_token,
    })
}

/// Exchange a refresh token for a fresh access token. The refresh token is
/// not rotated.
pub fn refresh_access(state: &AppStateInner, refresh_token: &str) -> Result<RefreshResponse> {
    let user_id = state
        .db
        .find_user_id_by_refresh_token(refresh_token)?
        .ok_or(ApiError::Unauthorized)?;

    let token = issue_access_token(
        &state.config.jwt_secret,
        user_id,
        state.config.access_token_ttl,
    )?;
    Ok(RefreshResponse { token })
}

pub fn revoke(state: &AppStateInner, refresh_token: &str) -> Result<()> {
    if !state.db.revoke_refresh_token(refresh_token)? {
        return Err(ApiError::Unauthorized);
    }
    info!("Refresh token revoked");
    Ok(())
}

/// Resolve a bearer access token to the user id it was issued for.
pub fn authorize(state: &AppStateInner, access_token: &str) -> Result<u64> {
    validate_access_token(access_token, &state.config.jwt_secret)
}

pub fn session_state(state: &AppStateInner, user_id: u64) -> Result<Option<SessionState>> {
    Ok(state.db.has_active_session(user_id)?.map(|active| {
        if active {
            SessionState::LoggedIn
        } else {
            SessionState::LoggedOut
        }
    }))
}
