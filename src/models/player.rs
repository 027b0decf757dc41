use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Expiry value meaning "forever". Anything else is a unix timestamp that is
/// stored and shown but never compared against the clock.
pub const EXPIRY_FOREVER: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    Whitelisted,
    Blacklisted,
}

impl PlayerStatus {
    // Status is encoded by table membership, not a column.
    pub fn table(&self) -> &'static str {
        match self {
            PlayerStatus::Whitelisted => "whitelist",
            PlayerStatus::Blacklisted => "blacklist",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PlayerRecord {
    pub uuid: String,
    pub name: String,
    pub expiry: i64,
}

impl PlayerRecord {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>, expiry: i64) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            expiry,
        }
    }

    pub fn is_permanent(&self) -> bool {
        self.expiry == EXPIRY_FOREVER
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpsertPlayerRequest {
    pub uuid: String,
    pub name: String,
    /// "permanent" (default) or a duration like "7d"; converted to an
    /// absolute expiry timestamp at insert time.
    pub duration: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MoveStatusRequest {
    pub status: PlayerStatus,
    pub duration: Option<String>,
}

/// Outcome of the two-phase probe. Unknown means the uuid is in neither table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "record", rename_all = "lowercase")]
pub enum ResolvedStatus {
    Unknown,
    Whitelisted(PlayerRecord),
    Blacklisted(PlayerRecord),
}

impl ResolvedStatus {
    pub fn from_lookup(found: Option<(PlayerStatus, PlayerRecord)>) -> Self {
        match found {
            None => ResolvedStatus::Unknown,
            Some((PlayerStatus::Whitelisted, record)) => ResolvedStatus::Whitelisted(record),
            Some((PlayerStatus::Blacklisted, record)) => ResolvedStatus::Blacklisted(record),
        }
    }
}
