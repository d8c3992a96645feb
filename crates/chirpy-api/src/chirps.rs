use tracing::debug;

use chirpy_types::api::ChirpRequest;
use chirpy_types::models::{Chirp, SortOrder};

use crate::AppStateInner;
use crate::error::{ApiError, Result};

pub const MAX_CHIRP_LEN: usize = 140;

const PROFANE: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

/// Mask profane words. Matching is per space-separated word and
/// case-insensitive; punctuation attached to a word defeats the match.
pub fn clean_profanity(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            if PROFANE.contains(&word.to_lowercase().as_str()) {
                "****"
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn create(state: &AppStateInner, author_id: u64, req: &ChirpRequest) -> Result<Chirp> {
    if req.body.chars().count() > MAX_CHIRP_LEN {
        return Err(ApiError::BadRequest("Chirp is too long".into()));
    }

    let body = clean_profanity(&req.body);
    if body != req.body {
        debug!(author_id, "Masked profanity in chirp");
    }

    Ok(state.db.create_post(&body, author_id)?)
}

pub fn get(state: &AppStateInner, chirp_id: u64) -> Result<Chirp> {
    Ok(state.db.get_post_by_id(chirp_id)?)
}

pub fn list(state: &AppStateInner, author_id: Option<u64>, order: SortOrder) -> Result<Vec<Chirp>> {
    Ok(state.db.list_posts(author_id, order)?)
}

pub fn delete(state: &AppStateInner, author_id: u64, chirp_id: u64) -> Result<()> {
    Ok(state.db.delete_post(author_id, chirp_id)?)
}
