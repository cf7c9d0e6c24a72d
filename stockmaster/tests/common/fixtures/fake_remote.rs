//! In-memory remote snapshot store
//!
//! Records every call so tests can assert which remote operations a backup
//! run performed, and can be told to fail individual operations.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

use stockmaster::errors::RemoteError;
use stockmaster::remote::{RemoteSyncPort, SnapshotRecord};

pub const DESTINATION_ID: &str = "folder-1";

#[derive(Default)]
struct State {
    records: Vec<SnapshotRecord>,
    contents: HashMap<String, Vec<u8>>,
    next_id: u64,
    fail_auth: bool,
    fail_upload: bool,
    fail_list: bool,
    fail_delete: HashSet<String>,
    authenticate_calls: usize,
    upload_calls: usize,
    list_calls: usize,
    delete_calls: usize,
    deleted_ids: Vec<String>,
}

#[derive(Default)]
pub struct FakeRemoteStore {
    state: Mutex<State>,
}

impl FakeRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<SnapshotRecord>) -> Self {
        let store = Self::new();
        store.state.lock().unwrap().records = records;
        store
    }

    pub fn set_fail_auth(&self, fail: bool) {
        self.state.lock().unwrap().fail_auth = fail;
    }

    pub fn set_fail_upload(&self, fail: bool) {
        self.state.lock().unwrap().fail_upload = fail;
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.state.lock().unwrap().fail_list = fail;
    }

    pub fn fail_delete_of(&self, id: &str) {
        self.state.lock().unwrap().fail_delete.insert(id.to_string());
    }

    pub fn put_content(&self, id: &str, bytes: Vec<u8>) {
        self.state.lock().unwrap().contents.insert(id.to_string(), bytes);
    }

    pub fn records(&self) -> Vec<SnapshotRecord> {
        self.state.lock().unwrap().records.clone()
    }

    pub fn authenticate_calls(&self) -> usize {
        self.state.lock().unwrap().authenticate_calls
    }

    pub fn upload_calls(&self) -> usize {
        self.state.lock().unwrap().upload_calls
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    pub fn delete_calls(&self) -> usize {
        self.state.lock().unwrap().delete_calls
    }

    pub fn deleted_ids(&self) -> Vec<String> {
        self.state.lock().unwrap().deleted_ids.clone()
    }
}

#[async_trait]
impl RemoteSyncPort for FakeRemoteStore {
    async fn authenticate(&self) -> Result<(), RemoteError> {
        let mut state = self.state.lock().unwrap();
        state.authenticate_calls += 1;
        if state.fail_auth {
            return Err(RemoteError::AuthenticationFailed {
                reason: "token rejected".to_string(),
            });
        }
        Ok(())
    }

    async fn ensure_destination(&self) -> Result<String, RemoteError> {
        Ok(DESTINATION_ID.to_string())
    }

    async fn upload(
        &self,
        _destination: &str,
        local_path: &Path,
        display_name: &str,
    ) -> Result<SnapshotRecord, RemoteError> {
        let bytes = std::fs::read(local_path)?;

        let mut state = self.state.lock().unwrap();
        state.upload_calls += 1;
        if state.fail_upload {
            return Err(RemoteError::UnexpectedStatus {
                operation: "upload".to_string(),
                status: 503,
            });
        }

        state.next_id += 1;
        let record = SnapshotRecord {
            id: format!("uploaded-{}", state.next_id),
            display_name: display_name.to_string(),
            created_at: Utc::now(),
            size: Some(bytes.len() as u64),
            link: Some(format!("https://store.example/files/uploaded-{}", state.next_id)),
        };
        state.contents.insert(record.id.clone(), bytes);
        state.records.push(record.clone());
        Ok(record)
    }

    async fn list(&self, _destination: &str, limit: usize) -> Result<Vec<SnapshotRecord>, RemoteError> {
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;
        if state.fail_list {
            return Err(RemoteError::RequestFailed {
                operation: "list".to_string(),
                reason: "connection reset".to_string(),
            });
        }

        let mut records = state.records.clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        let mut state = self.state.lock().unwrap();
        state.delete_calls += 1;
        if state.fail_delete.contains(id) {
            return Err(RemoteError::UnexpectedStatus {
                operation: "delete".to_string(),
                status: 500,
            });
        }

        state.records.retain(|r| r.id != id);
        state.deleted_ids.push(id.to_string());
        Ok(())
    }

    async fn download(&self, id: &str, destination_path: &Path) -> Result<(), RemoteError> {
        let bytes = {
            let state = self.state.lock().unwrap();
            state.contents.get(id).cloned()
        };

        match bytes {
            Some(bytes) => {
                std::fs::write(destination_path, bytes)?;
                Ok(())
            }
            None => Err(RemoteError::UnexpectedStatus {
                operation: "download".to_string(),
                status: 404,
            }),
        }
    }
}
