use crate::domain::ports::embedding_store::{EmbeddingSink, EmbeddingStore, StoreError};
use crate::domain::values::embedding::Embedding;
use crate::domain::values::user_id::UserId;
use crate::infrastructure::sqlite::migrations::run_migrations;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::sync::Mutex;

/// Embedding store backed by the `user_embeddings` table. Vectors are stored
/// as little-endian f32 blobs.
pub struct SqliteEmbeddingStore {
    conn: Mutex<Connection>,
}

impl SqliteEmbeddingStore {
    pub fn new(conn: Connection) -> Result<Self, StoreError> {
        run_migrations(&conn).map_err(StoreError::Connection)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    pub fn open(db_path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path)
            .map_err(|e| StoreError::Connection(format!("DB error: {e}")))?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| StoreError::Connection(format!("WAL error: {e}")))?;
        Self::new(conn)
    }

    /// Inserts or replaces a user's embedding.
    pub fn upsert(&self, user_id: &UserId, embedding: &Embedding) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|e| StoreError::Connection(e.to_string()))?;
        conn.execute(
            "INSERT OR REPLACE INTO user_embeddings (user_id, vector, updated_at) VALUES (?1, ?2, ?3)",
            params![user_id.as_str(), embedding.to_bytes(), chrono::Utc::now().to_rfc3339()],
        )
        .map_err(|e| StoreError::Query(format!("Failed to store embedding: {e}")))?;
        Ok(())
    }

    pub fn remove(&self, user_id: &UserId) -> Result<bool, StoreError> {
        let conn = self.conn.lock().map_err(|e| StoreError::Connection(e.to_string()))?;
        let removed = conn
            .execute("DELETE FROM user_embeddings WHERE user_id = ?1", params![user_id.as_str()])
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(removed > 0)
    }
}

impl EmbeddingSink for SqliteEmbeddingStore {
    fn upsert_all(&self, embeddings: &HashMap<UserId, Embedding>) -> Result<usize, StoreError> {
        let mut conn = self.conn.lock().map_err(|e| StoreError::Connection(e.to_string()))?;
        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Query(format!("Failed to start import: {e}")))?;
        let updated_at = chrono::Utc::now().to_rfc3339();
        {
            let mut stmt = tx
                .prepare(
                    "INSERT OR REPLACE INTO user_embeddings (user_id, vector, updated_at) VALUES (?1, ?2, ?3)",
                )
                .map_err(|e| StoreError::Query(e.to_string()))?;
            for (user_id, embedding) in embeddings {
                stmt.execute(params![user_id.as_str(), embedding.to_bytes(), updated_at])
                    .map_err(|e| StoreError::Query(format!("Failed to store embedding for {user_id}: {e}")))?;
            }
        }
        tx.commit()
            .map_err(|e| StoreError::Query(format!("Failed to commit import: {e}")))?;
        Ok(embeddings.len())
    }
}

#[async_trait]
impl EmbeddingStore for SqliteEmbeddingStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn load_all(&self) -> Result<HashMap<UserId, Embedding>, StoreError> {
        let conn = self.conn.lock().map_err(|e| StoreError::Connection(e.to_string()))?;
        let mut stmt = conn
            .prepare("SELECT user_id, vector FROM user_embeddings")
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| {
                let id: String = row.get(0)?;
                let blob: Vec<u8> = row.get(1)?;
                Ok((id, blob))
            })
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut embeddings = HashMap::new();
        for row in rows {
            let (id, blob) = row.map_err(|e| StoreError::Query(e.to_string()))?;
            if blob.len() % 4 != 0 {
                return Err(StoreError::Decode(format!(
                    "vector for user {id} is {} bytes, not a whole number of f32s",
                    blob.len()
                )));
            }
            embeddings.insert(UserId::new(id), Embedding::from_bytes(&blob));
        }
        Ok(embeddings)
    }
}
