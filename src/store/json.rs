//! JSON flat-file store backend.
//!
//! Each collection lives in one pretty-printed JSON file that is rewritten
//! wholesale after every mutation. Reads are lenient: a missing file is an
//! empty collection, and a corrupt file is treated as empty (with a
//! warning) rather than failing startup.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::catalog::Product;
use crate::error::StoreError;
use crate::history::ProposalRecord;

use super::Store;

const PRODUCTS_FILE: &str = "products.json";
const PROPOSALS_FILE: &str = "proposals.json";

/// Flat-file store keeping both collections in memory and mirroring every
/// mutation to disk.
pub struct JsonStore {
    products_path: PathBuf,
    proposals_path: PathBuf,
    products: RwLock<Vec<Product>>,
    proposals: RwLock<Vec<ProposalRecord>>,
}

impl JsonStore {
    /// Open (or initialise) the store under a data directory.
    pub async fn open(data_dir: &Path) -> Result<Self, StoreError> {
        tokio::fs::create_dir_all(data_dir)
            .await
            .map_err(|source| StoreError::DataDir {
                path: data_dir.display().to_string(),
                source,
            })?;

        let products_path = data_dir.join(PRODUCTS_FILE);
        let proposals_path = data_dir.join(PROPOSALS_FILE);

        let products: Vec<Product> = load_lenient(&products_path, "products").await;
        let proposals: Vec<ProposalRecord> = load_lenient(&proposals_path, "proposals").await;
        tracing::info!(
            products = products.len(),
            proposals = proposals.len(),
            data_dir = %data_dir.display(),
            "Store opened"
        );

        Ok(Self {
            products_path,
            proposals_path,
            products: RwLock::new(products),
            proposals: RwLock::new(proposals),
        })
    }
}

#[async_trait]
impl Store for JsonStore {
    async fn products(&self) -> Vec<Product> {
        self.products.read().await.clone()
    }

    async fn replace_products(&self, products: Vec<Product>) -> Result<usize, StoreError> {
        let mut guard = self.products.write().await;
        *guard = products;
        persist(&self.products_path, "products", &*guard).await?;
        Ok(guard.len())
    }

    async fn proposals(&self) -> Vec<ProposalRecord> {
        self.proposals.read().await.clone()
    }

    async fn append_proposal(&self, record: ProposalRecord) -> Result<i64, StoreError> {
        let id = record.id;
        let mut guard = self.proposals.write().await;
        guard.insert(0, record);
        persist(&self.proposals_path, "proposals", &*guard).await?;
        Ok(id)
    }
}

/// Read a collection, treating a missing or unreadable file as empty.
async fn load_lenient<T: DeserializeOwned>(path: &Path, collection: &'static str) -> Vec<T> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Could not read {collection}; starting empty");
            return Vec::new();
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Corrupt {collection} snapshot; starting empty");
            Vec::new()
        }
    }
}

/// Rewrite a collection's snapshot file.
async fn persist<T: Serialize>(
    path: &Path,
    collection: &'static str,
    items: &[T],
) -> Result<(), StoreError> {
    let body = serde_json::to_vec_pretty(items).map_err(|e| StoreError::Persist {
        collection,
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    tokio::fs::write(path, body)
        .await
        .map_err(|e| StoreError::Persist {
            collection,
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}
