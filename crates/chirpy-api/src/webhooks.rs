//! Billing provider (Polka) webhook.

use subtle::ConstantTimeEq;
use tracing::{info, warn};

use chirpy_types::api::PolkaWebhook;

use crate::AppStateInner;
use crate::error::{ApiError, Result};

pub const USER_UPGRADED: &str = "user.upgraded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    Upgraded(u64),
    /// Event type we do not act on; acknowledged without changes.
    Ignored,
}

pub fn polka(state: &AppStateInner, api_key: &str, hook: &PolkaWebhook) -> Result<WebhookOutcome> {
    let key_matches: bool = api_key
        .as_bytes()
        .ct_eq(state.config.polka_key.as_bytes())
        .into();
    if !key_matches {
        warn!("Webhook rejected: API key mismatch");
        return Err(ApiError::Unauthorized);
    }

    if hook.event != USER_UPGRADED {
        return Ok(WebhookOutcome::Ignored);
    }

    let user_id = hook.data.user_id;
    state.db.upgrade_user(user_id)?;
    info!(user_id, "User upgraded to Chirpy Red");
    Ok(WebhookOutcome::Upgraded(user_id))
}
