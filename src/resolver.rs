use crate::models::player::ResolvedStatus;
use crate::store::PlayerStore;

/// Read-through status resolution: every call re-queries the store. Lookups
/// happen once per connect, so there is nothing worth caching here.
pub async fn resolve(store: &PlayerStore, uuid: &str) -> Result<ResolvedStatus, sqlx::Error> {
    let found = store.lookup_by_uuid(uuid).await?;
    Ok(ResolvedStatus::from_lookup(found))
}
