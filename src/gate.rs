use serde::Serialize;

use crate::models::player::{PlayerRecord, PlayerStatus, ResolvedStatus, EXPIRY_FOREVER};
use crate::resolver;
use crate::store::PlayerStore;
use crate::utils::format_expiry;

pub const NOT_WHITELISTED_MESSAGE: &str = "You are not whitelisted on this server.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum GateDecision {
    Allow,
    Deny { message: String },
}

/// Connect-time policy. First contact is fail-closed: the player is written
/// to the blacklist with the forever sentinel and denied. Errors from the
/// store propagate; the caller is expected to deny on error.
pub async fn process_connect(
    store: &PlayerStore,
    uuid: &str,
    name: &str,
) -> Result<GateDecision, sqlx::Error> {
    match resolver::resolve(store, uuid).await? {
        ResolvedStatus::Unknown => {
            let record = PlayerRecord::new(uuid, name, EXPIRY_FOREVER);
            store.upsert(PlayerStatus::Blacklisted, &record).await?;
            tracing::info!("first contact from {name} ({uuid}), blacklisted and denied");

            Ok(GateDecision::Deny {
                message: NOT_WHITELISTED_MESSAGE.to_string(),
            })
        }
        ResolvedStatus::Blacklisted(record) => {
            tracing::info!("denied blacklisted player {} ({uuid})", record.name);
            Ok(GateDecision::Deny {
                message: ban_message(&record),
            })
        }
        ResolvedStatus::Whitelisted(_) => Ok(GateDecision::Allow),
    }
}

// Expiry is shown but never compared against the clock; a dated ban still
// denies after its timestamp passes.
fn ban_message(record: &PlayerRecord) -> String {
    if record.is_permanent() {
        "You have been banned from this server.".to_string()
    } else {
        format!(
            "You have been banned from this server until {}.",
            format_expiry(record.expiry)
        )
    }
}
