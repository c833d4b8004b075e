// tests/integration/storage/encrypted_store_tests.rs
use std::sync::Arc;

use seguro_defeso::storage::encrypted::{EncryptedStore, StorageError};
use serde::{Deserialize, Serialize};
use tempfile::tempdir;
use tokio_test::{assert_err, assert_ok};

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
struct Catch {
    id: String,
    species: String,
    kilos: u32,
}

fn catch(i: u32) -> Catch {
    Catch {
        id: format!("catch_{}", i),
        species: "Tambaqui".into(),
        kilos: 10 + i,
    }
}

#[tokio::test]
async fn test_concurrent_access() {
    let dir = tempdir().unwrap();
    let store = Arc::new(
        EncryptedStore::new(dir.path().join("store.redb"), "concorrente")
            .await
            .unwrap(),
    );

    let mut handles = Vec::new();
    for i in 0..10 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let value = catch(i);
            store.store(&format!("catch:{}", i), &value).await.unwrap();
            let read: Option<Catch> = store.retrieve(&format!("catch:{}", i)).await.unwrap();
            assert_eq!(read, Some(value));
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    let all: Vec<(String, Catch)> = store.list("catch:").await.unwrap();
    assert_eq!(all.len(), 10);
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("store.redb");

    {
        let store = EncryptedStore::new(&path, "chave").await.unwrap();
        assert_ok!(store.store("catch:1", &catch(1)).await);
    }

    let store = EncryptedStore::new(&path, "chave").await.unwrap();
    let read: Option<Catch> = store.retrieve("catch:1").await.unwrap();
    assert_eq!(read, Some(catch(1)));
}

#[tokio::test]
async fn test_wrong_key_cannot_read() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.redb");

    {
        let store = EncryptedStore::new(&path, "certa").await.unwrap();
        store.store("catch:1", &catch(1)).await.unwrap();
    }

    let store = EncryptedStore::new(&path, "errada").await.unwrap();
    let err = assert_err!(store.retrieve::<Catch>("catch:1").await);
    assert!(matches!(err, StorageError::DecryptionError(_)));
}

#[tokio::test]
async fn test_rotation_then_reopen_with_new_key() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.redb");

    {
        let store = EncryptedStore::new(&path, "antiga").await.unwrap();
        for i in 0..3 {
            store.store(&format!("catch:{}", i), &catch(i)).await.unwrap();
        }
        assert_ok!(store.rotate_encryption_key("nova").await);
    }

    let store = EncryptedStore::new(&path, "nova").await.unwrap();
    let all: Vec<(String, Catch)> = store.list("catch:").await.unwrap();
    assert_eq!(all.len(), 3);
}
