use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), String> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS user_embeddings (
            user_id TEXT PRIMARY KEY,
            vector BLOB NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_user_embeddings_updated ON user_embeddings(updated_at);
        "
    ).map_err(|e| format!("Migration failed: {e}"))
}
