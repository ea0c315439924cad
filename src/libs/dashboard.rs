//! The batch dashboard: one operator session looking at one page of batches.
//!
//! [`Dashboard`] owns the store handle, the session, the pagination state, a
//! cache of the current page and the table query applied to it. All changes
//! to batches go through it so that the rules below hold regardless of which
//! store is configured:
//!
//! - input is validated before any store call
//! - locked batches are rejected before any store call
//! - a failed store call leaves the cached page and row count untouched
//! - after a successful create, update or delete the first page is reloaded
//!
//! ## Update flow
//!
//! ```text
//! find record ─▶ reject locked ─▶ validate input ─▶ merge ─▶ load references
//!      ─▶ compute metrics ─▶ send BatchPatch (is_locked = true) ─▶ reload page 1
//! ```

use crate::api::{BatchStore, Product, ReferenceData};
use crate::libs::batch::{BatchForm, BatchPatch, BatchRecord, BatchUpdate, NewBatch};
use crate::libs::error::DashboardError;
use crate::libs::messages::Message;
use crate::libs::pagination::{Pagination, RowsPerPage};
use crate::libs::session::Session;
use crate::libs::table::{self, BatchColumn, SortConfig, TableQuery};
use crate::libs::takt::{self, Metrics, MetricsDiagnostic, PaceLookup, ProductLookup};
use crate::msg_warning;
use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use std::collections::HashMap;

/// Reference rows fetched for one metrics computation.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSnapshot {
    products: HashMap<String, f64>,
    pace: HashMap<u32, f64>,
}

impl ReferenceSnapshot {
    pub fn new(products: &[Product], pace: impl IntoIterator<Item = (u32, f64)>) -> Self {
        Self {
            products: products
                .iter()
                .map(|product| (product.product_name.clone(), product.baseline_cycle_time))
                .collect(),
            pace: pace.into_iter().collect(),
        }
    }
}

impl ProductLookup for ReferenceSnapshot {
    fn baseline_cycle_time(&self, product: &str) -> Option<f64> {
        self.products.baseline_cycle_time(product)
    }
}

impl PaceLookup for ReferenceSnapshot {
    fn pace_factor(&self, employee_count: u32) -> Option<f64> {
        self.pace.pace_factor(employee_count)
    }
}

/// Result of a successful update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    pub id: i64,
    pub metrics: Metrics,
    pub diagnostics: Vec<MetricsDiagnostic>,
}

pub struct Dashboard<S> {
    store: S,
    session: Session,
    pagination: Pagination,
    records: Vec<BatchRecord>,
    query: TableQuery,
    last_refreshed: Option<NaiveDateTime>,
}

impl<S: BatchStore + ReferenceData> Dashboard<S> {
    pub fn new(store: S, session: Session, rows_per_page: RowsPerPage) -> Self {
        Self {
            store,
            session,
            pagination: Pagination::new(rows_per_page),
            records: Vec::new(),
            query: TableQuery::default(),
            last_refreshed: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn query(&self) -> &TableQuery {
        &self.query
    }

    /// The cached page as the store returned it.
    pub fn records(&self) -> &[BatchRecord] {
        &self.records
    }

    pub fn last_refreshed(&self) -> Option<NaiveDateTime> {
        self.last_refreshed
    }

    /// Fetches the current page. On failure the cache is left as it was.
    pub async fn load_page(&mut self) -> Result<()> {
        let page = self
            .store
            .list(self.pagination.current_page(), self.pagination.rows_per_page().get())
            .await?;

        tracing::debug!(
            page = self.pagination.current_page(),
            rows = page.records.len(),
            total_rows = page.total_rows,
            "batch page loaded"
        );
        self.records = page.records;
        self.pagination.set_total_rows(page.total_rows);
        self.last_refreshed = Some(Local::now().naive_local());
        Ok(())
    }

    pub async fn refresh(&mut self) -> Result<()> {
        self.load_page().await
    }

    /// Cached rows after search, filters and sort.
    pub fn visible_rows(&self) -> Vec<&BatchRecord> {
        table::view(&self.records, &self.query)
    }

    pub async fn products(&self) -> Result<Vec<Product>> {
        self.store.products().await
    }

    /// Creates a batch from the form for the session's line. Returns the new id.
    pub async fn create_batch(&mut self, form: &BatchForm) -> Result<i64> {
        let batch = NewBatch::from_form(&self.session, form)?;
        let id = self.store.create(&batch).await?;
        tracing::info!(id, line = %batch.line, batch_number = %batch.batch_number, "batch created");

        self.reload_first_page().await;
        Ok(id)
    }

    /// Finalizes a batch: computes its metrics and locks it.
    pub async fn submit_update(&mut self, id: i64, update: &BatchUpdate) -> Result<UpdateOutcome> {
        let record = self.find(id).await?;
        if record.is_locked {
            return Err(DashboardError::Locked(id).into());
        }

        update.validate()?;
        let merged = record.merged(update);
        BatchUpdate::validate_window(&merged)?;

        let mut diagnostics = Vec::new();
        let metrics = match self.load_references(&merged).await {
            Ok(references) => takt::compute_metrics_with(&merged, &references, &references, &mut diagnostics),
            Err(e) => {
                let diagnostic = MetricsDiagnostic::ReferenceUnavailable(e.to_string());
                msg_warning!(Message::MetricsDegraded(diagnostic.to_string()));
                diagnostics.push(diagnostic);
                Metrics::default()
            }
        };

        let patch = BatchPatch::finalize(&merged, &metrics);
        self.store.update(id, &patch).await?;
        tracing::info!(id, target_units = metrics.target_units, "batch finalized");

        self.reload_first_page().await;
        Ok(UpdateOutcome { id, metrics, diagnostics })
    }

    /// Deletes a batch that has not been locked yet.
    pub async fn delete_batch(&mut self, id: i64) -> Result<()> {
        let record = self.find(id).await?;
        if record.is_locked {
            return Err(DashboardError::Locked(id).into());
        }

        self.store.delete(id).await?;
        tracing::info!(id, "batch deleted");

        self.reload_first_page().await;
        Ok(())
    }

    /// Looks in the cached page first, then asks the store.
    pub async fn find(&self, id: i64) -> Result<BatchRecord> {
        if let Some(record) = self.records.iter().find(|record| record.id == id) {
            return Ok(record.clone());
        }
        self.store.get(id).await?.ok_or_else(|| DashboardError::NotFound(id).into())
    }

    async fn load_references(&self, record: &BatchRecord) -> Result<ReferenceSnapshot> {
        let products = self.store.products().await?;
        let pace = match record.employee_count {
            Some(count) if count > 0 => self.store.pace_factor(count).await?.map(|factor| (count, factor)),
            _ => None,
        };
        Ok(ReferenceSnapshot::new(&products, pace))
    }

    /// A failed reload after a successful write is reported, not returned.
    async fn reload_first_page(&mut self) {
        self.pagination.reset();
        if let Err(e) = self.load_page().await {
            msg_warning!(Message::ReloadFailed(e.to_string()));
        }
    }

    /// Applies a pagination change and loads the resulting page.
    ///
    /// When the load fails the previous page position is restored along with
    /// the untouched cache.
    async fn navigate(&mut self, change: impl FnOnce(&mut Pagination) -> bool) -> Result<bool> {
        let previous = self.pagination.clone();
        if !change(&mut self.pagination) {
            return Ok(false);
        }
        if let Err(e) = self.load_page().await {
            self.pagination = previous;
            return Err(e);
        }
        Ok(true)
    }

    pub async fn set_rows_per_page(&mut self, rows_per_page: RowsPerPage) -> Result<()> {
        self.navigate(|pagination| {
            pagination.set_rows_per_page(rows_per_page);
            true
        })
        .await?;
        Ok(())
    }

    /// Moves to `page` and reloads. Returns whether the page changed.
    pub async fn go_to_page(&mut self, page: u32) -> Result<bool> {
        self.navigate(|pagination| pagination.go_to_page(page)).await
    }

    /// Applies page-jump input. Returns the page number to show in the input.
    pub async fn jump(&mut self, input: &str) -> Result<u32> {
        let before = self.pagination.current_page();
        self.navigate(|pagination| pagination.jump(input) != before).await?;
        Ok(self.pagination.current_page())
    }

    pub async fn next_page(&mut self) -> Result<bool> {
        self.navigate(Pagination::next).await
    }

    pub async fn previous_page(&mut self) -> Result<bool> {
        self.navigate(Pagination::previous).await
    }

    pub async fn first_page(&mut self) -> Result<bool> {
        self.navigate(Pagination::first).await
    }

    pub async fn last_page(&mut self) -> Result<bool> {
        self.navigate(Pagination::last).await
    }

    pub fn toggle_sort(&mut self, column: BatchColumn) {
        self.query.sort.toggle(column);
    }

    pub fn set_sort(&mut self, sort: SortConfig) {
        self.query.sort = sort;
    }

    pub fn set_search(&mut self, search: &str) {
        self.query.search = search.trim().to_string();
    }

    pub fn set_filter(&mut self, column: BatchColumn, value: &str) {
        self.query.set_filter(column, value);
    }

    pub fn clear_query(&mut self) {
        self.query = TableQuery::default();
    }
}
