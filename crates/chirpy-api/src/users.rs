use chirpy_types::api::UserRequest;
use chirpy_types::models::UserView;
use tracing::info;

use crate::AppStateInner;
use crate::error::{ApiError, Result};

fn validate(req: &UserRequest) -> Result<()> {
    if req.email.trim().is_empty() {
        return Err(ApiError::BadRequest("email is required".into()));
    }
    if req.password.is_empty() {
        return Err(ApiError::BadRequest("password is required".into()));
    }
    Ok(())
}

pub fn register(state: &AppStateInner, req: &UserRequest) -> Result<UserView> {
    validate(req)?;
    let user = state.db.create_user(&req.email, &req.password)?;
    info!(user_id = user.id, "User registered");
    Ok(user)
}

/// Replace the caller's email and password. `user_id` comes from an
/// already-validated access token.
pub fn update(state: &AppStateInner, user_id: u64, req: &UserRequest) -> Result<UserView> {
    validate(req)?;
    state
        .db
        .update_user(user_id, &req.email, &req.password)?
        .ok_or(ApiError::NotFound)
}

pub fn get(state: &AppStateInner, user_id: u64) -> Result<UserView> {
    state.db.get_user(user_id)?.ok_or(ApiError::NotFound)
}
