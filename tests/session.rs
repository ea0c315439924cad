#[cfg(test)]
mod tests {
    use taktline::libs::config::{BackendKind, Config};
    use taktline::libs::error::DashboardError;
    use taktline::libs::pagination::RowsPerPage;
    use taktline::libs::session::{SessionStore, SESSION_FILE_NAME};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct SessionTestContext {
        temp_dir: TempDir,
        sessions: SessionStore,
    }

    impl TestContext for SessionTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let sessions = SessionStore::at(temp_dir.path().join(SESSION_FILE_NAME));
            SessionTestContext { temp_dir, sessions }
        }
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_session_lifecycle(ctx: &mut SessionTestContext) {
        assert!(ctx.sessions.load().unwrap().is_none());

        let created = ctx.sessions.create("Line 7", "Maria Mendez").unwrap();
        assert_eq!(ctx.sessions.load().unwrap(), Some(created.clone()));
        assert_eq!(ctx.sessions.require().unwrap().line, "Line 7");

        assert!(ctx.sessions.clear().unwrap());
        assert!(!ctx.sessions.clear().unwrap());
        assert!(ctx.sessions.load().unwrap().is_none());
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_require_without_login(ctx: &mut SessionTestContext) {
        let err = ctx.sessions.require().unwrap_err();
        assert_eq!(err.downcast_ref::<DashboardError>(), Some(&DashboardError::NoSession));
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_login_replaces_previous_session(ctx: &mut SessionTestContext) {
        ctx.sessions.create("Line 1", "Adolfo Valdes").unwrap();
        ctx.sessions.create("Line 2", "Belkis Carballo").unwrap();

        let session = ctx.sessions.require().unwrap();
        assert_eq!(session.line, "Line 2");
        assert_eq!(session.line_lead, "Belkis Carballo");
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_corrupted_session_is_an_error(ctx: &mut SessionTestContext) {
        std::fs::write(ctx.sessions.path(), "{ not json").unwrap();
        assert!(ctx.sessions.load().is_err());
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_config_round_trip(ctx: &mut SessionTestContext) {
        let path = ctx.temp_dir.path().join("config.json");
        assert_eq!(Config::read_from(&path).unwrap(), Config::default());

        let mut config = Config::default();
        config.store.backend = BackendKind::Remote;
        config.store.api_url = "http://line-server:5000".to_string();
        config.dashboard.rows_per_page = RowsPerPage::Hundred;
        config.roster.lines = vec!["Line 1".to_string(), "Line 2".to_string()];
        config.save_to(&path).unwrap();

        let loaded = Config::read_from(&path).unwrap();
        assert_eq!(loaded, config);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"backend\": \"remote\""));
        assert!(raw.contains("\"rows_per_page\": 100"));
    }
}
