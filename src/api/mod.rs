//! Store interfaces for batch records and reference data.
//!
//! The dashboard never talks to a database or a server directly. It works
//! against two traits:
//!
//! - [`BatchStore`]: paginated listing and CRUD of batch records
//! - [`ReferenceData`]: product baselines and employee pace factors
//!
//! Two adapters implement both: [`crate::db::LocalStore`] on SQLite and
//! [`RestStore`] against the batch-details HTTP API. [`Backend`] picks one of
//! them from configuration so commands can stay generic over the store.

use crate::db::LocalStore;
use crate::libs::batch::{BatchPage, BatchPatch, BatchRecord, NewBatch};
use crate::libs::config::{BackendKind, StoreConfig};
use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod rest;

pub use rest::RestStore;

/// A product and the seconds one worker needs for one unit of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: Option<i64>,
    pub product_name: String,
    #[serde(default)]
    pub baseline_cycle_time: f64,
}

/// Persistent storage for batch records.
///
/// Stores enforce the lock policy themselves: `update` and `delete` fail for
/// a locked record even when the caller skipped its own check.
#[allow(async_fn_in_trait)]
pub trait BatchStore {
    /// One page of records, newest first, with the total row count.
    async fn list(&self, page: u32, page_size: u32) -> Result<BatchPage>;

    async fn get(&self, id: i64) -> Result<Option<BatchRecord>>;

    /// Inserts a batch and returns its id.
    async fn create(&self, batch: &NewBatch) -> Result<i64>;

    async fn update(&self, id: i64, patch: &BatchPatch) -> Result<()>;

    async fn delete(&self, id: i64) -> Result<()>;
}

/// Lookup tables the takt calculator needs.
#[allow(async_fn_in_trait)]
pub trait ReferenceData {
    async fn products(&self) -> Result<Vec<Product>>;

    /// Raw pace factor for a crew size, `None` when no row exists.
    async fn pace_factor(&self, employee_count: u32) -> Result<Option<f64>>;
}

/// The store selected in configuration.
#[derive(Debug)]
pub enum Backend {
    Local(LocalStore),
    Remote(RestStore),
}

impl Backend {
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        match config.backend {
            BackendKind::Local => Ok(Backend::Local(LocalStore::new()?)),
            BackendKind::Remote => Ok(Backend::Remote(RestStore::new(&config.api_url)?)),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Backend::Local(store) => format!("local database {}", store.path().display()),
            Backend::Remote(store) => format!("remote API {}", store.base_url()),
        }
    }
}

impl BatchStore for Backend {
    async fn list(&self, page: u32, page_size: u32) -> Result<BatchPage> {
        match self {
            Backend::Local(store) => store.list(page, page_size).await,
            Backend::Remote(store) => store.list(page, page_size).await,
        }
    }

    async fn get(&self, id: i64) -> Result<Option<BatchRecord>> {
        match self {
            Backend::Local(store) => store.get(id).await,
            Backend::Remote(store) => store.get(id).await,
        }
    }

    async fn create(&self, batch: &NewBatch) -> Result<i64> {
        match self {
            Backend::Local(store) => store.create(batch).await,
            Backend::Remote(store) => store.create(batch).await,
        }
    }

    async fn update(&self, id: i64, patch: &BatchPatch) -> Result<()> {
        match self {
            Backend::Local(store) => store.update(id, patch).await,
            Backend::Remote(store) => store.update(id, patch).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self {
            Backend::Local(store) => store.delete(id).await,
            Backend::Remote(store) => store.delete(id).await,
        }
    }
}

impl ReferenceData for Backend {
    async fn products(&self) -> Result<Vec<Product>> {
        match self {
            Backend::Local(store) => store.products().await,
            Backend::Remote(store) => store.products().await,
        }
    }

    async fn pace_factor(&self, employee_count: u32) -> Result<Option<f64>> {
        match self {
            Backend::Local(store) => store.pace_factor(employee_count).await,
            Backend::Remote(store) => store.pace_factor(employee_count).await,
        }
    }
}
