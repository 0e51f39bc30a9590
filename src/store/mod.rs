//! Persistence for the two flat record collections.
//!
//! The engine never touches storage directly; handlers read snapshots
//! through the backend-agnostic [`Store`] trait and pass plain slices down.
//! The shipped backend is a JSON flat-file store.

mod json;

use async_trait::async_trait;

pub use json::JsonStore;

use crate::catalog::Product;
use crate::error::StoreError;
use crate::history::ProposalRecord;

/// Backend-agnostic persistence operations.
///
/// The two collections are independent: there are no transactions across
/// them, and concurrent writers are last-write-wins.
#[async_trait]
pub trait Store: Send + Sync {
    // ==================== Catalog ====================

    /// Snapshot of the current product catalog.
    async fn products(&self) -> Vec<Product>;

    /// Replace the catalog wholesale and persist it. Returns the new count.
    async fn replace_products(&self, products: Vec<Product>) -> Result<usize, StoreError>;

    // ==================== Proposal history ====================

    /// Snapshot of the proposal history, newest first.
    async fn proposals(&self) -> Vec<ProposalRecord>;

    /// Prepend a proposal record and persist the collection. Returns the
    /// record id.
    async fn append_proposal(&self, record: ProposalRecord) -> Result<i64, StoreError>;
}
