//! Credentials carried in an `Authorization` header value.

use crate::error::{ApiError, Result};

/// `Bearer <token>` -> `<token>`
pub fn bearer_token(header: Option<&str>) -> Result<&str> {
    credential(header, "Bearer ")
}

/// `ApiKey <key>` -> `<key>`
pub fn api_key(header: Option<&str>) -> Result<&str> {
    credential(header, "ApiKey ")
}

fn credential<'a>(header: Option<&'a str>, scheme: &str) -> Result<&'a str> {
    let value = header
        .ok_or(ApiError::Unauthorized)?
        .strip_prefix(scheme)
        .ok_or(ApiError::Unauthorized)?
        .trim();

    if value.is_empty() {
        return Err(ApiError::Unauthorized);
    }
    Ok(value)
}
