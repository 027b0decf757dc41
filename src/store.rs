use sqlx::sqlite::SqlitePool;

use crate::models::player::{PlayerRecord, PlayerStatus};

/// The two roster tables. Status is implied by which table a row lives in;
/// `upsert` writes a single table and leaves cross-table consistency to the
/// caller, `move_status` is the transactional primitive that cannot leave a
/// uuid in both.
#[derive(Clone)]
pub struct PlayerStore {
    pool: SqlitePool,
}

impl PlayerStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Idempotent, runs once at startup.
    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        for table in ["whitelist", "blacklist"] {
            sqlx::query(&format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    uuid TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    expiry BIGINT NOT NULL
                )"
            ))
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    /// Insert-or-replace in the table selected by `status`.
    pub async fn upsert(&self, status: PlayerStatus, record: &PlayerRecord) -> Result<(), sqlx::Error> {
        sqlx::query(&format!(
            "INSERT INTO {} (uuid, name, expiry) VALUES (?, ?, ?)
             ON CONFLICT(uuid) DO UPDATE SET name = excluded.name, expiry = excluded.expiry",
            status.table()
        ))
        .bind(&record.uuid)
        .bind(&record.name)
        .bind(record.expiry)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Two-phase probe by uuid: whitelist first, then blacklist.
    pub async fn lookup_by_uuid(
        &self,
        uuid: &str,
    ) -> Result<Option<(PlayerStatus, PlayerRecord)>, sqlx::Error> {
        self.probe("uuid", uuid).await
    }

    /// Same probe keyed by the last-known display name.
    pub async fn lookup_by_name(
        &self,
        name: &str,
    ) -> Result<Option<(PlayerStatus, PlayerRecord)>, sqlx::Error> {
        self.probe("name", name).await
    }

    async fn probe(
        &self,
        column: &str,
        value: &str,
    ) -> Result<Option<(PlayerStatus, PlayerRecord)>, sqlx::Error> {
        for status in [PlayerStatus::Whitelisted, PlayerStatus::Blacklisted] {
            let record = sqlx::query_as::<_, PlayerRecord>(&format!(
                "SELECT uuid, name, expiry FROM {} WHERE {column} = ?",
                status.table()
            ))
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

            if let Some(record) = record {
                return Ok(Some((status, record)));
            }
        }

        Ok(None)
    }

    /// Full scan of one table, order unspecified.
    pub async fn list_by_status(&self, status: PlayerStatus) -> Result<Vec<PlayerRecord>, sqlx::Error> {
        sqlx::query_as::<_, PlayerRecord>(&format!(
            "SELECT uuid, name, expiry FROM {}",
            status.table()
        ))
        .fetch_all(&self.pool)
        .await
    }

    /// Moves a known uuid into `new_status` in one transaction: the row is
    /// removed from both tables and re-inserted, keeping its name. Returns
    /// false when the uuid is in neither table.
    pub async fn move_status(
        &self,
        uuid: &str,
        new_status: PlayerStatus,
        expiry: i64,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let mut existing: Option<PlayerRecord> = None;
        for table in ["whitelist", "blacklist"] {
            if existing.is_none() {
                existing = sqlx::query_as::<_, PlayerRecord>(&format!(
                    "SELECT uuid, name, expiry FROM {table} WHERE uuid = ?"
                ))
                .bind(uuid)
                .fetch_optional(&mut *tx)
                .await?;
            }
        }

        let Some(record) = existing else {
            return Ok(false);
        };

        for table in ["whitelist", "blacklist"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE uuid = ?"))
                .bind(uuid)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(&format!(
            "INSERT INTO {} (uuid, name, expiry) VALUES (?, ?, ?)",
            new_status.table()
        ))
        .bind(&record.uuid)
        .bind(&record.name)
        .bind(expiry)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::player::EXPIRY_FOREVER;
    use sqlx::sqlite::SqlitePoolOptions;

    pub(crate) async fn memory_store() -> PlayerStore {
        // A pool with more than one connection would open one ":memory:"
        // database per connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        let store = PlayerStore::new(pool);
        store.init_schema().await.unwrap();
        store
    }

    fn steve() -> PlayerRecord {
        PlayerRecord::new("abc", "Steve", EXPIRY_FOREVER)
    }

    #[tokio::test]
    async fn init_schema_is_idempotent() {
        let store = memory_store().await;
        store.init_schema().await.unwrap();
    }

    #[tokio::test]
    async fn upsert_then_lookup_by_uuid() {
        let store = memory_store().await;
        store.upsert(PlayerStatus::Whitelisted, &steve()).await.unwrap();

        let (status, record) = store.lookup_by_uuid("abc").await.unwrap().unwrap();
        assert_eq!(status, PlayerStatus::Whitelisted);
        assert_eq!(record, steve());
    }

    #[tokio::test]
    async fn lookup_misses_on_absent_uuid() {
        let store = memory_store().await;
        assert!(store.lookup_by_uuid("nope").await.unwrap().is_none());
        assert!(store.lookup_by_name("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_replaces_instead_of_duplicating() {
        let store = memory_store().await;
        store.upsert(PlayerStatus::Blacklisted, &steve()).await.unwrap();
        store
            .upsert(
                PlayerStatus::Blacklisted,
                &PlayerRecord::new("abc", "Steven", 1700000000),
            )
            .await
            .unwrap();

        let rows = store.list_by_status(PlayerStatus::Blacklisted).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Steven");
        assert_eq!(rows[0].expiry, 1700000000);
    }

    #[tokio::test]
    async fn whitelist_wins_the_probe_on_dual_membership() {
        let store = memory_store().await;
        store.upsert(PlayerStatus::Blacklisted, &steve()).await.unwrap();
        store.upsert(PlayerStatus::Whitelisted, &steve()).await.unwrap();

        let (status, _) = store.lookup_by_uuid("abc").await.unwrap().unwrap();
        assert_eq!(status, PlayerStatus::Whitelisted);
    }

    #[tokio::test]
    async fn name_and_uuid_lookups_agree() {
        let store = memory_store().await;
        store.upsert(PlayerStatus::Whitelisted, &steve()).await.unwrap();

        let by_uuid = store.lookup_by_uuid("abc").await.unwrap().unwrap();
        let by_name = store.lookup_by_name("Steve").await.unwrap().unwrap();
        assert_eq!(by_uuid.0, by_name.0);
        assert_eq!(by_uuid.1, by_name.1);
    }

    #[tokio::test]
    async fn move_status_leaves_single_membership() {
        let store = memory_store().await;
        store.upsert(PlayerStatus::Blacklisted, &steve()).await.unwrap();

        let moved = store
            .move_status("abc", PlayerStatus::Whitelisted, EXPIRY_FOREVER)
            .await
            .unwrap();
        assert!(moved);

        assert!(store.list_by_status(PlayerStatus::Blacklisted).await.unwrap().is_empty());
        let whitelist = store.list_by_status(PlayerStatus::Whitelisted).await.unwrap();
        assert_eq!(whitelist.len(), 1);
        assert_eq!(whitelist[0].name, "Steve");
    }

    #[tokio::test]
    async fn move_status_of_unknown_uuid_is_a_noop() {
        let store = memory_store().await;
        let moved = store
            .move_status("ghost", PlayerStatus::Whitelisted, EXPIRY_FOREVER)
            .await
            .unwrap();
        assert!(!moved);
    }
}
