use super::{merge_fields, Document, DocumentStore, Query};
use crate::error::StoreError;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::{Arc, Mutex};

const DB_SCHEMA_VERSION: i64 = 2;

const COLLECTION_SQL: &str =
    "SELECT id, data_json FROM documents WHERE collection = ?1 ORDER BY created_at ASC, id ASC";

pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
    // In-memory databases answer "memory"; either way the pragma returns a row.
    let _mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

    let mut version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version < 1 {
        apply_migration_1(conn)?;
        version = 1;
        conn.pragma_update(None, "user_version", version)?;
    }

    if version < 2 {
        apply_migration_2(conn)?;
        version = 2;
        conn.pragma_update(None, "user_version", version)?;
    }

    if version > DB_SCHEMA_VERSION {
        log::warn!("database schema v{version} is newer than this build (v{DB_SCHEMA_VERSION})");
    }

    Ok(())
}

fn apply_migration_1(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS documents (
            collection TEXT NOT NULL,
            id TEXT NOT NULL,
            data_json TEXT NOT NULL DEFAULT '{}',
            created_at INTEGER NOT NULL DEFAULT 0,
            updated_at INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (collection, id)
        );
        ",
    )
}

fn apply_migration_2(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE INDEX IF NOT EXISTS idx_documents_collection_created
            ON documents(collection, created_at, id);
        ",
    )
}

/// Document store backed by a single SQLite file, one row per document with
/// the body kept as JSON text. Queries scan the collection and evaluate the
/// filters in process.
#[derive(Clone)]
pub struct SqliteDocumentStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDocumentStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        initialize_schema(&conn)?;
        log::info!("opened document database at {}", path.display());
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError::Storage("database lock poisoned".to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|e| StoreError::Storage(format!("database task failed: {e}")))?
    }
}

fn load_document(conn: &Connection, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT data_json FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection, id],
            |row| row.get(0),
        )
        .optional()?;

    raw.map(|json| serde_json::from_str::<Value>(&json).map_err(StoreError::from))
        .transpose()
}

fn upsert_document(conn: &Connection, collection: &str, id: &str, data: &Value) -> Result<(), StoreError> {
    let data_json = serde_json::to_string(data)?;
    let now = chrono::Utc::now().timestamp_millis();

    conn.execute(
        "
        INSERT INTO documents (collection, id, data_json, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?4)
        ON CONFLICT(collection, id) DO UPDATE SET
            data_json = excluded.data_json,
            updated_at = excluded.updated_at
        ",
        params![collection, id, data_json, now],
    )?;
    Ok(())
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let (collection, id) = (collection.to_string(), id.to_string());
        self.with_conn(move |conn| load_document(conn, &collection, &id))
            .await
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        let (collection, id) = (collection.to_string(), id.to_string());
        self.with_conn(move |conn| upsert_document(conn, &collection, &id, &data))
            .await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let (collection, id) = (collection.to_string(), id.to_string());
        self.with_conn(move |conn| {
            let tx = conn.unchecked_transaction()?;
            let mut doc = load_document(&tx, &collection, &id)?.ok_or_else(|| StoreError::NotFound {
                collection: collection.clone(),
                id: id.clone(),
            })?;
            merge_fields(&mut doc, fields)?;
            upsert_document(&tx, &collection, &id, &doc)?;
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let (collection, id) = (collection.to_string(), id.to_string());
        self.with_conn(move |conn| {
            conn.execute(
                "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
            )?;
            Ok(())
        })
        .await
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let collection = collection.to_string();
        let docs = self
            .with_conn(move |conn| {
                let mut stmt = conn.prepare(COLLECTION_SQL)?;
                let rows = stmt
                    .query_map(params![collection], |row| {
                        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;

                let mut docs = Vec::with_capacity(rows.len());
                for (id, data_json) in rows {
                    match serde_json::from_str::<Value>(&data_json) {
                        Ok(data) => docs.push(Document { id, data }),
                        Err(e) => log::warn!("skipping unreadable document {collection}/{id}: {e}"),
                    }
                }
                Ok(docs)
            })
            .await?;

        Ok(query.apply(docs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Direction;
    use serde_json::json;

    #[test]
    fn schema_initializes_with_expected_version() {
        let conn = Connection::open_in_memory().expect("in-memory db");
        initialize_schema(&conn).expect("schema init");
        let version: i64 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .expect("schema version");
        assert_eq!(version, DB_SCHEMA_VERSION);
    }

    #[test]
    fn collection_scan_reads_rows_in_index_order() {
        let conn = Connection::open_in_memory().expect("in-memory db");
        initialize_schema(&conn).expect("schema init");

        let mut stmt = conn
            .prepare(&format!("EXPLAIN QUERY PLAN {COLLECTION_SQL}"))
            .expect("explain");
        let plan: Vec<String> = stmt
            .query_map(params!["repair_requests"], |row| row.get::<_, String>(3))
            .expect("plan rows")
            .collect::<rusqlite::Result<_>>()
            .expect("plan");

        assert!(
            plan.iter().any(|step| step.contains("idx_documents_collection_created")),
            "{plan:?}"
        );
        assert!(!plan.iter().any(|step| step.contains("TEMP B-TREE")), "{plan:?}");
    }

    #[test]
    fn schema_init_is_idempotent() {
        let conn = Connection::open_in_memory().expect("in-memory db");
        initialize_schema(&conn).expect("first init");
        initialize_schema(&conn).expect("second init");
    }

    #[tokio::test]
    async fn document_round_trip_and_merge_update() {
        let store = SqliteDocumentStore::open_in_memory().expect("store");
        store
            .set("repair_requests", "r1", json!({ "status": "PENDING", "issue": "No power" }))
            .await
            .expect("set");

        let mut fields = Map::new();
        fields.insert("status".to_string(), json!("CANCELLED"));
        fields.insert("cancelledAt".to_string(), json!(99));
        store.update("repair_requests", "r1", fields).await.expect("update");

        let loaded = store
            .get("repair_requests", "r1")
            .await
            .expect("get")
            .expect("exists");
        assert_eq!(loaded["status"], json!("CANCELLED"));
        assert_eq!(loaded["issue"], json!("No power"));
        assert_eq!(loaded["cancelledAt"], json!(99));
    }

    #[tokio::test]
    async fn update_of_missing_document_is_not_found() {
        let store = SqliteDocumentStore::open_in_memory().expect("store");
        let err = store
            .update("users", "ghost", Map::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn query_filters_within_collection() {
        let store = SqliteDocumentStore::open_in_memory().expect("store");
        store.set("technicians", "t1", json!({ "rating": 4.2 })).await.unwrap();
        store.set("technicians", "t2", json!({ "rating": 4.8 })).await.unwrap();
        store.set("service_centers", "c1", json!({ "rating": 5.0 })).await.unwrap();

        let docs = store
            .query("technicians", &Query::new().order_by("rating", Direction::Descending))
            .await
            .unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["t2", "t1"]);

        store.delete("technicians", "t2").await.unwrap();
        assert!(store.get("technicians", "t2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn file_database_persists_across_reopen() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("state.db");

        {
            let store = SqliteDocumentStore::open(&path).expect("open");
            store.set("users", "u1", json!({ "fullName": "Sari" })).await.unwrap();
        }

        let reopened = SqliteDocumentStore::open(&path).expect("reopen");
        let user = reopened.get("users", "u1").await.unwrap().expect("persisted");
        assert_eq!(user["fullName"], json!("Sari"));
    }
}
