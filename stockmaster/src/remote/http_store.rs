use super::{RemoteSyncPort, SnapshotRecord};
use crate::config::RemoteStoreConfig;
use crate::constants::http;
use crate::errors::RemoteError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct FolderEntry {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct FolderList {
    #[serde(default)]
    folders: Vec<FolderEntry>,
}

#[derive(Debug, Deserialize)]
struct FileEntry {
    id: String,
    name: String,
    created_at: DateTime<Utc>,
    size: Option<u64>,
    web_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileEntry>,
}

impl From<FileEntry> for SnapshotRecord {
    fn from(entry: FileEntry) -> Self {
        SnapshotRecord {
            id: entry.id,
            display_name: entry.name,
            created_at: entry.created_at,
            size: entry.size,
            link: entry.web_link,
        }
    }
}

/// Bearer-token REST object store.
///
/// Folders live under `/folders`, files under `/folders/{id}/files` and
/// `/files/{id}`.
pub struct HttpRemoteStore {
    base_url: String,
    api_token: String,
    folder_name: String,
    client: Client,
}

impl HttpRemoteStore {
    pub fn new(config: &RemoteStoreConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .connect_timeout(http::CONNECT_TIMEOUT)
            .build()
            .map_err(|e| RemoteError::NotConfigured {
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            folder_name: config.folder_name.clone(),
            client,
        })
    }

    fn check_configured(&self) -> Result<(), RemoteError> {
        if self.base_url.is_empty() {
            return Err(RemoteError::NotConfigured {
                reason: "remote.base_url is empty".to_string(),
            });
        }
        if self.api_token.is_empty() {
            return Err(RemoteError::NotConfigured {
                reason: "remote.api_token is empty".to_string(),
            });
        }
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> Result<Response, RemoteError> {
        self.check_configured()?;

        let response = request
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| RemoteError::RequestFailed {
                operation: operation.to_string(),
                reason: e.to_string(),
            })?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(RemoteError::AuthenticationFailed {
                    reason: format!("{} rejected with HTTP {}", operation, response.status()),
                })
            }
            status => Err(RemoteError::UnexpectedStatus {
                operation: operation.to_string(),
                status: status.as_u16(),
            }),
        }
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        operation: &str,
        response: Response,
    ) -> Result<T, RemoteError> {
        response
            .json::<T>()
            .await
            .map_err(|e| RemoteError::InvalidResponse {
                operation: operation.to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl RemoteSyncPort for HttpRemoteStore {
    async fn authenticate(&self) -> Result<(), RemoteError> {
        self.send("authenticate", self.client.get(self.url("/auth/verify")))
            .await?;
        info!("Authenticated with remote store at {}", self.base_url);
        Ok(())
    }

    async fn ensure_destination(&self) -> Result<String, RemoteError> {
        let response = self
            .send(
                "find_folder",
                self.client
                    .get(self.url("/folders"))
                    .query(&[("name", self.folder_name.as_str())]),
            )
            .await?;
        let existing: FolderList = Self::parse("find_folder", response).await?;

        if let Some(folder) = existing
            .folders
            .into_iter()
            .find(|f| f.name == self.folder_name)
        {
            debug!("Using existing remote folder '{}' ({})", folder.name, folder.id);
            return Ok(folder.id);
        }

        let response = self
            .send(
                "create_folder",
                self.client
                    .post(self.url("/folders"))
                    .json(&serde_json::json!({ "name": self.folder_name })),
            )
            .await?;
        let created: FolderEntry = Self::parse("create_folder", response).await?;
        info!("Created remote folder '{}' ({})", created.name, created.id);
        Ok(created.id)
    }

    async fn upload(
        &self,
        destination: &str,
        local_path: &Path,
        display_name: &str,
    ) -> Result<SnapshotRecord, RemoteError> {
        let bytes = tokio::fs::read(local_path).await?;
        let size = bytes.len();

        let response = self
            .send(
                "upload",
                self.client
                    .post(self.url(&format!("/folders/{}/files", destination)))
                    .query(&[("name", display_name)])
                    .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
                    .body(bytes),
            )
            .await?;
        let entry: FileEntry = Self::parse("upload", response).await?;

        info!("Uploaded {} ({} bytes) as {}", display_name, size, entry.id);
        Ok(entry.into())
    }

    async fn list(&self, destination: &str, limit: usize) -> Result<Vec<SnapshotRecord>, RemoteError> {
        let response = self
            .send(
                "list",
                self.client
                    .get(self.url(&format!("/folders/{}/files", destination)))
                    .query(&[("limit", limit.to_string()), ("order", "created_desc".to_string())]),
            )
            .await?;
        let listing: FileList = Self::parse("list", response).await?;

        Ok(listing.files.into_iter().map(SnapshotRecord::from).collect())
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        self.send("delete", self.client.delete(self.url(&format!("/files/{}", id))))
            .await?;
        debug!("Deleted remote snapshot {}", id);
        Ok(())
    }

    async fn download(&self, id: &str, destination_path: &Path) -> Result<(), RemoteError> {
        let response = self
            .send(
                "download",
                self.client.get(self.url(&format!("/files/{}/content", id))),
            )
            .await?;
        let bytes = response.bytes().await.map_err(|e| RemoteError::RequestFailed {
            operation: "download".to_string(),
            reason: e.to_string(),
        })?;

        if bytes.is_empty() {
            warn!("Remote snapshot {} downloaded with zero bytes", id);
        }

        tokio::fs::write(destination_path, &bytes).await?;
        info!("Downloaded snapshot {} to {}", id, destination_path.display());
        Ok(())
    }
}
