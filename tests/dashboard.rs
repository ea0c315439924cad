#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{NaiveDate, NaiveDateTime};
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use taktline::api::{BatchStore, Product, ReferenceData};
    use taktline::libs::batch::{BatchForm, BatchPage, BatchPatch, BatchRecord, BatchUpdate, NewBatch, ProductStatus};
    use taktline::libs::dashboard::Dashboard;
    use taktline::libs::error::DashboardError;
    use taktline::libs::focus::FocusManager;
    use taktline::libs::pagination::RowsPerPage;
    use taktline::libs::refresh::{AutoRefresh, RefreshOutcome};
    use taktline::libs::session::Session;
    use taktline::libs::takt::MetricsDiagnostic;
    use test_context::{test_context, AsyncTestContext};
    use tokio::sync::oneshot;

    const PRODUCT: &str = "Mega Dose X Bites";

    /// In-memory store that records every call it receives.
    #[derive(Default)]
    struct MockStore {
        records: Mutex<Vec<BatchRecord>>,
        products: Vec<Product>,
        pace: HashMap<u32, f64>,
        calls: Mutex<Vec<&'static str>>,
        fail_list: AtomicBool,
        fail_writes: AtomicBool,
        fail_references: AtomicBool,
    }

    impl MockStore {
        fn with_records(records: Vec<BatchRecord>) -> Self {
            Self {
                records: Mutex::new(records),
                products: vec![Product {
                    id: Some(1),
                    product_name: PRODUCT.to_string(),
                    baseline_cycle_time: 120.0,
                }],
                pace: HashMap::from([(3, 1.1)]),
                ..Self::default()
            }
        }

        fn record_call(&self, call: &'static str) {
            self.calls.lock().push(call);
        }

        fn called(&self, call: &str) -> bool {
            self.calls.lock().iter().any(|c| *c == call)
        }

        fn check_write(&self) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                anyhow::bail!("store unavailable");
            }
            Ok(())
        }
    }

    impl BatchStore for MockStore {
        async fn list(&self, page: u32, page_size: u32) -> Result<BatchPage> {
            self.record_call("list");
            if self.fail_list.load(Ordering::SeqCst) {
                anyhow::bail!("Failed to fetch table data");
            }
            let mut records = self.records.lock().clone();
            records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            let total_rows = records.len() as u64;
            let records = records
                .into_iter()
                .skip(((page - 1) * page_size) as usize)
                .take(page_size as usize)
                .collect();
            Ok(BatchPage { records, total_rows })
        }

        async fn get(&self, id: i64) -> Result<Option<BatchRecord>> {
            self.record_call("get");
            Ok(self.records.lock().iter().find(|r| r.id == id).cloned())
        }

        async fn create(&self, batch: &NewBatch) -> Result<i64> {
            self.record_call("create");
            self.check_write()?;
            let mut records = self.records.lock();
            let id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
            let mut created = record(id, &batch.batch_number, at(23, 0));
            created.line = batch.line.clone();
            created.line_lead = batch.line_lead.clone();
            created.product = batch.product.clone();
            records.push(created);
            Ok(id)
        }

        async fn update(&self, id: i64, patch: &BatchPatch) -> Result<()> {
            self.record_call("update");
            self.check_write()?;
            let mut records = self.records.lock();
            let record = records.iter_mut().find(|r| r.id == id).ok_or(DashboardError::NotFound(id))?;
            record.product_status = patch.product_status;
            record.employee_count = patch.employee_count;
            record.actual_units = patch.actual_units;
            record.target_units = patch.target_units;
            record.is_locked = patch.is_locked;
            Ok(())
        }

        async fn delete(&self, id: i64) -> Result<()> {
            self.record_call("delete");
            self.check_write()?;
            self.records.lock().retain(|r| r.id != id);
            Ok(())
        }
    }

    impl ReferenceData for MockStore {
        async fn products(&self) -> Result<Vec<Product>> {
            self.record_call("products");
            if self.fail_references.load(Ordering::SeqCst) {
                anyhow::bail!("products endpoint down");
            }
            Ok(self.products.clone())
        }

        async fn pace_factor(&self, employee_count: u32) -> Result<Option<f64>> {
            self.record_call("pace_factor");
            Ok(self.pace.get(&employee_count).copied())
        }
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(hour, minute, 0).unwrap()
    }

    fn record(id: i64, batch_number: &str, created_at: NaiveDateTime) -> BatchRecord {
        BatchRecord {
            id,
            created_at,
            ubi_no: format!("UBI-{}", id),
            line: "Line 3".to_string(),
            line_lead: "Dora Garza".to_string(),
            product: PRODUCT.to_string(),
            packing_format: "Nexus".to_string(),
            batch_number: batch_number.to_string(),
            product_status: ProductStatus::Unfinished,
            start_time: None,
            end_time: None,
            employee_count: None,
            actual_units: 0,
            target_units: 0,
            total_time_seconds: 0,
            takt_time_seconds: 0.0,
            running_takt_seconds: 0.0,
            target_delta: 0,
            delta_percentage: 0.0,
            is_locked: false,
        }
    }

    fn finished_update() -> BatchUpdate {
        BatchUpdate {
            product_status: Some(ProductStatus::FinishedGoods),
            start_time: Some("9:00 AM".to_string()),
            end_time: Some("11:00 AM".to_string()),
            employee_count: Some(3),
            actual_units: Some(50),
            ..BatchUpdate::default()
        }
    }

    struct DashboardTestContext {
        dashboard: Dashboard<MockStore>,
    }

    impl AsyncTestContext for DashboardTestContext {
        async fn setup() -> Self {
            let mut locked = record(2, "B2", at(8, 0));
            locked.is_locked = true;
            let store = MockStore::with_records(vec![record(1, "A1", at(8, 0)), locked]);
            let session = Session::new("Line 3", "Dora Garza").unwrap();

            let mut dashboard = Dashboard::new(store, session, RowsPerPage::Ten);
            dashboard.load_page().await.unwrap();
            DashboardTestContext { dashboard }
        }
    }

    fn is(error: &anyhow::Error, expected: DashboardError) -> bool {
        error.downcast_ref::<DashboardError>() == Some(&expected)
    }

    #[test_context(DashboardTestContext)]
    #[tokio::test]
    async fn test_equal_timestamps_show_higher_id_first(ctx: &mut DashboardTestContext) {
        let ids: Vec<i64> = ctx.dashboard.visible_rows().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test_context(DashboardTestContext)]
    #[tokio::test]
    async fn test_update_computes_metrics_and_locks(ctx: &mut DashboardTestContext) {
        let outcome = ctx.dashboard.submit_update(1, &finished_update()).await.unwrap();

        assert_eq!(outcome.metrics.total_time_seconds, 7200);
        assert!((outcome.metrics.running_takt_seconds - 132.0).abs() < 1e-9);
        assert_eq!(outcome.metrics.target_units, 55);
        assert_eq!(outcome.metrics.target_delta, -5);
        assert!((outcome.metrics.delta_percentage - 50.0 / 55.0).abs() < 1e-9);
        assert!(outcome.diagnostics.is_empty());

        let stored = ctx.dashboard.find(1).await.unwrap();
        assert!(stored.is_locked);
        assert_eq!(stored.target_units, 55);
        assert_eq!(ctx.dashboard.pagination().current_page(), 1);
    }

    #[test_context(DashboardTestContext)]
    #[tokio::test]
    async fn test_wip_update_has_no_target(ctx: &mut DashboardTestContext) {
        let update = BatchUpdate {
            product_status: Some(ProductStatus::Wip),
            ..finished_update()
        };
        let outcome = ctx.dashboard.submit_update(1, &update).await.unwrap();

        assert_eq!(outcome.metrics.target_units, 0);
        assert_eq!(outcome.metrics.target_delta, 50);
        assert_eq!(outcome.metrics.delta_percentage, 0.0);
    }

    #[test_context(DashboardTestContext)]
    #[tokio::test]
    async fn test_locked_update_never_reaches_store(ctx: &mut DashboardTestContext) {
        let err = ctx.dashboard.submit_update(2, &finished_update()).await.unwrap_err();

        assert!(is(&err, DashboardError::Locked(2)));
        assert!(!ctx.dashboard.store().called("update"));
        assert!(!ctx.dashboard.store().called("products"));
    }

    #[test_context(DashboardTestContext)]
    #[tokio::test]
    async fn test_locked_delete_never_reaches_store(ctx: &mut DashboardTestContext) {
        let err = ctx.dashboard.delete_batch(2).await.unwrap_err();

        assert!(is(&err, DashboardError::Locked(2)));
        assert!(!ctx.dashboard.store().called("delete"));
        assert_eq!(ctx.dashboard.records().len(), 2);
    }

    #[test_context(DashboardTestContext)]
    #[tokio::test]
    async fn test_unknown_batch_is_not_found(ctx: &mut DashboardTestContext) {
        let err = ctx.dashboard.delete_batch(99).await.unwrap_err();
        assert!(is(&err, DashboardError::NotFound(99)));
        assert!(!ctx.dashboard.store().called("delete"));
    }

    #[test_context(DashboardTestContext)]
    #[tokio::test]
    async fn test_short_window_rejected_before_store(ctx: &mut DashboardTestContext) {
        let update = BatchUpdate {
            end_time: Some("9:10 AM".to_string()),
            ..finished_update()
        };
        let err = ctx.dashboard.submit_update(1, &update).await.unwrap_err();

        assert!(matches!(err.downcast_ref::<DashboardError>(), Some(DashboardError::InvalidTimeWindow { .. })));
        assert!(!ctx.dashboard.store().called("update"));
    }

    #[test_context(DashboardTestContext)]
    #[tokio::test]
    async fn test_missing_create_fields_never_reach_store(ctx: &mut DashboardTestContext) {
        let form = BatchForm {
            batch_number: "C3".to_string(),
            ..BatchForm::default()
        };
        let err = ctx.dashboard.create_batch(&form).await.unwrap_err();

        assert!(matches!(err.downcast_ref::<DashboardError>(), Some(DashboardError::MissingFields(_))));
        assert!(!ctx.dashboard.store().called("create"));
    }

    #[test_context(DashboardTestContext)]
    #[tokio::test]
    async fn test_create_stamps_session_and_reloads(ctx: &mut DashboardTestContext) {
        let form = BatchForm {
            ubi_no: "UBI-9".to_string(),
            batch_number: "C3".to_string(),
            product: PRODUCT.to_string(),
            packing_format: "Nexus".to_string(),
        };
        let id = ctx.dashboard.create_batch(&form).await.unwrap();

        let first = ctx.dashboard.visible_rows()[0].clone();
        assert_eq!(first.id, id);
        assert_eq!(first.line, "Line 3");
        assert_eq!(first.line_lead, "Dora Garza");
        assert_eq!(ctx.dashboard.pagination().total_rows(), 3);
    }

    #[test_context(DashboardTestContext)]
    #[tokio::test]
    async fn test_failed_write_keeps_cache(ctx: &mut DashboardTestContext) {
        ctx.dashboard.store().fail_writes.store(true, Ordering::SeqCst);

        assert!(ctx.dashboard.delete_batch(1).await.is_err());
        assert!(ctx.dashboard.submit_update(1, &finished_update()).await.is_err());

        assert_eq!(ctx.dashboard.records().len(), 2);
        assert!(!ctx.dashboard.find(1).await.unwrap().is_locked);
    }

    #[test_context(DashboardTestContext)]
    #[tokio::test]
    async fn test_failed_refresh_keeps_cache(ctx: &mut DashboardTestContext) {
        let refreshed_at = ctx.dashboard.last_refreshed();
        ctx.dashboard.store().fail_list.store(true, Ordering::SeqCst);

        assert!(ctx.dashboard.refresh().await.is_err());
        assert_eq!(ctx.dashboard.records().len(), 2);
        assert_eq!(ctx.dashboard.pagination().total_rows(), 2);
        assert_eq!(ctx.dashboard.last_refreshed(), refreshed_at);
    }

    #[test_context(DashboardTestContext)]
    #[tokio::test]
    async fn test_reference_failure_degrades_to_zero(ctx: &mut DashboardTestContext) {
        ctx.dashboard.store().fail_references.store(true, Ordering::SeqCst);

        let outcome = ctx.dashboard.submit_update(1, &finished_update()).await.unwrap();

        assert!(outcome.metrics.is_zero());
        assert!(matches!(outcome.diagnostics.as_slice(), [MetricsDiagnostic::ReferenceUnavailable(_)]));
        assert!(ctx.dashboard.find(1).await.unwrap().is_locked);
    }

    #[test_context(DashboardTestContext)]
    #[tokio::test]
    async fn test_unknown_pace_is_reported(ctx: &mut DashboardTestContext) {
        let update = BatchUpdate {
            employee_count: Some(4),
            ..finished_update()
        };
        let outcome = ctx.dashboard.submit_update(1, &update).await.unwrap();

        assert!(outcome.metrics.is_zero());
        assert_eq!(outcome.diagnostics, vec![MetricsDiagnostic::UnknownPace(4)]);
    }

    #[test_context(DashboardTestContext)]
    #[tokio::test]
    async fn test_search_and_filter(ctx: &mut DashboardTestContext) {
        ctx.dashboard.set_search("a1");
        let ids: Vec<i64> = ctx.dashboard.visible_rows().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1]);

        ctx.dashboard.clear_query();
        ctx.dashboard.set_filter(taktline::libs::table::BatchColumn::BatchNumber, "b");
        let ids: Vec<i64> = ctx.dashboard.visible_rows().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn test_failed_navigation_restores_page() {
        let records = (1..=11).map(|id| record(id, &format!("N{}", id), at(8, id as u32))).collect();
        let session = Session::new("Line 1", "Lay Blanco").unwrap();
        let mut dashboard = Dashboard::new(MockStore::with_records(records), session, RowsPerPage::Ten);
        dashboard.load_page().await.unwrap();
        assert_eq!(dashboard.pagination().total_pages(), 2);

        dashboard.store().fail_list.store(true, Ordering::SeqCst);
        assert!(dashboard.next_page().await.is_err());
        assert_eq!(dashboard.pagination().current_page(), 1);

        dashboard.store().fail_list.store(false, Ordering::SeqCst);
        assert!(dashboard.next_page().await.unwrap());
        assert_eq!(dashboard.records().len(), 1);
        assert!(!dashboard.go_to_page(3).await.unwrap());
        assert_eq!(dashboard.pagination().current_page(), 2);
    }

    fn shared_dashboard() -> Arc<tokio::sync::Mutex<Dashboard<MockStore>>> {
        let store = MockStore::with_records(vec![record(1, "A1", at(8, 0))]);
        let session = Session::new("Line 2", "Mary Jones").unwrap();
        Arc::new(tokio::sync::Mutex::new(Dashboard::new(store, session, RowsPerPage::Fifty)))
    }

    #[tokio::test]
    async fn test_refresh_skips_while_focused() {
        let dashboard = shared_dashboard();
        let focus = FocusManager::new();
        let refresher = AutoRefresh::new(Duration::from_secs(30), focus.clone());

        {
            let _guard = focus.acquire("batch details");
            assert_eq!(refresher.tick(&dashboard).await, RefreshOutcome::SkippedFocused);
            assert!(!dashboard.lock().await.store().called("list"));
        }

        assert_eq!(refresher.tick(&dashboard).await, RefreshOutcome::Refreshed);
        assert_eq!(dashboard.lock().await.records().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_is_reported() {
        let dashboard = shared_dashboard();
        dashboard.lock().await.store().fail_list.store(true, Ordering::SeqCst);
        let refresher = AutoRefresh::new(Duration::from_secs(30), FocusManager::new());

        assert!(matches!(refresher.tick(&dashboard).await, RefreshOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn test_refresh_loop_stops_on_shutdown() {
        let dashboard = shared_dashboard();
        let refresher = AutoRefresh::new(Duration::from_millis(20), FocusManager::new());
        let redraws = Arc::new(AtomicUsize::new(0));

        let (stop, shutdown) = oneshot::channel();
        let counter = Arc::clone(&redraws);
        let handle = tokio::spawn(refresher.run(Arc::clone(&dashboard), shutdown, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        tokio::time::sleep(Duration::from_millis(150)).await;
        stop.send(()).unwrap();
        handle.await.unwrap();

        assert!(redraws.load(Ordering::SeqCst) >= 1);
        assert!(dashboard.lock().await.last_refreshed().is_some());
    }
}
