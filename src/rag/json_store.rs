//! JSON file-backed vector store.
//!
//! The whole collection is one pretty-printed JSON array of
//! `{ "text", "embedding" }` objects. Saves go through a temporary sibling
//! file and a rename so readers never observe a half-written array.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::store::{ChunkRecord, VectorStore};
use crate::core::errors::RagError;

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn unavailable<E: std::fmt::Display>(&self, err: E) -> RagError {
        RagError::StoreUnavailable {
            path: self.path.clone(),
            reason: err.to_string(),
        }
    }

    fn partial_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "vector_store.json".to_string());
        self.path
            .with_file_name(format!(".{}.{}.partial", file_name, Uuid::new_v4()))
    }
}

#[async_trait]
impl VectorStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<ChunkRecord>, RagError> {
        let bytes = fs::read(&self.path)
            .await
            .map_err(|e| self.unavailable(e))?;
        let records: Vec<ChunkRecord> =
            serde_json::from_slice(&bytes).map_err(|e| self.unavailable(format!("corrupt store: {}", e)))?;

        tracing::debug!(
            "Loaded {} chunk records from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    async fn save(&self, records: &[ChunkRecord]) -> Result<(), RagError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| self.unavailable(e))?;
            }
        }

        let payload = serde_json::to_vec_pretty(records).map_err(|e| self.unavailable(e))?;
        let partial_path = self.partial_path();

        let write_result = async {
            let mut file = fs::File::create(&partial_path).await?;
            file.write_all(&payload).await?;
            file.sync_all().await?;
            fs::rename(&partial_path, &self.path).await
        }
        .await;

        if let Err(err) = write_result {
            let _ = fs::remove_file(&partial_path).await;
            return Err(self.unavailable(err));
        }

        tracing::info!(
            "Saved {} chunk records to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    async fn exists(&self) -> bool {
        fs::metadata(&self.path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }
}
