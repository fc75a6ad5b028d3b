use std::fs;
use std::io::Cursor;

use cohort::application::grouping_service::GroupingRequest;
use cohort::application::import::{import_embeddings, read_embeddings};
use cohort::config::{Settings, StoreKind};
use cohort::domain::error::DomainError;
use cohort::domain::ports::embedding_store::EmbeddingStore;
use cohort::domain::values::user_id::UserId;
use cohort::infrastructure::sqlite::embedding_store::SqliteEmbeddingStore;
use cohort::Cohort;
use tempfile::TempDir;

const DOCUMENT: &str = r#"{
    "alice": [1.0, 0.0],
    "bob": [0.9, 0.1],
    "carol": [0.0, 1.0],
    "dave": [0.1, 0.9]
}"#;

#[tokio::test]
async fn test_import_file_then_group_from_sqlite() {
    let dir = TempDir::new().unwrap();
    let json_path = dir.path().join("embeddings.json");
    fs::write(&json_path, DOCUMENT).unwrap();
    let db_path = dir.path().join("cohort.db");
    let db_path = db_path.to_str().unwrap();

    {
        let store = SqliteEmbeddingStore::open(db_path).unwrap();
        let summary = import_embeddings(&store, fs::File::open(&json_path).unwrap()).unwrap();
        assert_eq!(summary.imported, 4);
        assert_eq!(summary.dimension, Some(2));
    }

    let settings = Settings {
        store: StoreKind::Sqlite,
        db_path: db_path.to_string(),
        workers: 1,
        ..Settings::default()
    };
    let cohort = Cohort::new(&settings).unwrap();
    assert_eq!(cohort.list_users().await.unwrap().len(), 4);

    let result = cohort
        .create_groups(GroupingRequest {
            group_size: 2,
            strategy: "greedy".to_string(),
            ..GroupingRequest::default()
        })
        .await
        .unwrap();
    let groups: Vec<Vec<&str>> = result
        .groups
        .iter()
        .map(|g| g.members().iter().map(|m| m.as_str()).collect())
        .collect();
    assert_eq!(groups, vec![vec!["alice", "bob"], vec!["carol", "dave"]]);
}

#[tokio::test]
async fn test_reimport_replaces_vectors() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("cohort.db");
    let store = SqliteEmbeddingStore::open(db_path.to_str().unwrap()).unwrap();

    import_embeddings(&store, Cursor::new(DOCUMENT)).unwrap();
    import_embeddings(&store, Cursor::new(r#"{"alice": [0.5, 0.5]}"#)).unwrap();

    let loaded = store.load_all().await.unwrap();
    assert_eq!(loaded.len(), 4);
    assert_eq!(loaded[&UserId::from("alice")].as_slice().to_vec(), vec![0.5_f32, 0.5]);
}

#[test]
fn test_rejects_malformed_document() {
    assert!(matches!(
        read_embeddings(Cursor::new("[1, 2, 3]")),
        Err(DomainError::InvalidArgument(_))
    ));
    assert!(matches!(
        read_embeddings(Cursor::new(r#"{"a": []}"#)),
        Err(DomainError::InvalidArgument(_))
    ));
}

#[test]
fn test_rejects_mixed_dimensions() {
    let result = read_embeddings(Cursor::new(r#"{"a": [1.0, 0.0], "b": [1.0, 0.0, 0.0]}"#));
    assert!(matches!(result, Err(DomainError::DimensionMismatch { .. })));
}

#[test]
fn test_rejects_overflowing_component() {
    let result = read_embeddings(Cursor::new(r#"{"a": [1e300, 0.0]}"#));
    assert!(result.is_err());
}

#[tokio::test]
async fn test_failed_import_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("cohort.db");
    let store = SqliteEmbeddingStore::open(db_path.to_str().unwrap()).unwrap();

    let bad = r#"{"a": [1.0, 0.0], "b": [1.0]}"#;
    assert!(import_embeddings(&store, Cursor::new(bad)).is_err());

    assert!(store.load_all().await.unwrap().is_empty());
}
