#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use taktline::db::db::Db;
    use taktline::db::migrations::{get_db_version, needs_migration, MigrationManager};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct MigrationTestContext {
        _temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl TestContext for MigrationTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("taktline.db");
            MigrationTestContext {
                _temp_dir: temp_dir,
                db_path,
            }
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migrations_run_automatically(ctx: &mut MigrationTestContext) {
        let db = Db::open(&ctx.db_path).unwrap();

        let version = get_db_version(&db.conn).unwrap();
        assert_eq!(version, MigrationManager::new().latest_version());
        assert!(!needs_migration(&db.conn).unwrap());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_fresh_database_needs_migration(ctx: &mut MigrationTestContext) {
        let conn = Db::open_without_migrations(&ctx.db_path).unwrap();

        assert_eq!(get_db_version(&conn).unwrap(), 0);
        assert!(needs_migration(&conn).unwrap());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migration_history(ctx: &mut MigrationTestContext) {
        let mut conn = Db::open_without_migrations(&ctx.db_path).unwrap();
        let manager = MigrationManager::new();

        manager.run_migrations(&mut conn).unwrap();

        let history = manager.get_migration_history(&conn).unwrap();
        let names: Vec<&str> = history.iter().map(|(_, name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["create_batch_details", "add_reference_tables"]);
        for (i, (version, _, _)) in history.iter().enumerate() {
            assert_eq!(*version as usize, i + 1);
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migration_idempotency(ctx: &mut MigrationTestContext) {
        let mut conn = Db::open_without_migrations(&ctx.db_path).unwrap();
        let manager = MigrationManager::new();

        manager.run_migrations(&mut conn).unwrap();
        let version = manager.get_current_version(&conn).unwrap();
        manager.run_migrations(&mut conn).unwrap();

        assert_eq!(manager.get_current_version(&conn).unwrap(), version);
        assert_eq!(manager.get_migration_history(&conn).unwrap().len(), 2);
        assert!(manager.is_migration_applied(&conn, 2).unwrap());
        assert!(!manager.is_migration_applied(&conn, 3).unwrap());
        drop(conn);

        // Reopening through Db applies nothing new
        let db = Db::open(&ctx.db_path).unwrap();
        assert_eq!(get_db_version(&db.conn).unwrap(), version);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_schema_has_expected_tables(ctx: &mut MigrationTestContext) {
        let db = Db::open(&ctx.db_path).unwrap();

        for table in ["batch_details", "products", "employee_pace"] {
            let count: i32 = db
                .conn
                .query_row("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1", [table], |row| row.get(0))
                .unwrap();
            assert_eq!(count, 1, "missing table {}", table);
        }

        let has_ubi: i32 = db
            .conn
            .query_row("SELECT COUNT(*) FROM pragma_table_info('batch_details') WHERE name = 'ubi_no'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(has_ubi, 1);
    }
}
