/// Every user-facing text in taktline.
///
/// Variants carry the values their text interpolates; the wording lives in
/// the `Display` impl in `display.rs`.
#[derive(Debug, Clone)]
pub enum Message {
    // === SESSION MESSAGES ===
    LoggedIn { line: String, line_lead: String },
    LoggedOut,
    NoActiveSession,
    RosterEmpty,
    PromptSelectLine,
    PromptSelectLineLead,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigModuleStore,
    ConfigModuleDashboard,
    ConfigModuleRoster,
    PromptSelectModules,
    PromptBackend,
    PromptApiUrl,
    PromptRowsPerPage,
    PromptRefreshInterval,
    PromptLines,
    PromptLineLeads,
    DatabaseReady(String),
    StoreInUse(String),

    // === BATCH FORM MESSAGES ===
    PromptUbiNo,
    PromptBatchNumber,
    PromptProduct,
    PromptPackingFormat,
    BatchCreated(i64),
    ProductsUnavailable(String),

    // === UPDATE FORM MESSAGES ===
    PromptProductStatus,
    PromptStartTime,
    PromptEndTime,
    PromptEmployeeCount,
    PromptActualUnits,
    NoEndTimeAvailable(String),
    BatchUpdated(i64),
    MetricsHeader,
    MetricsDegraded(String),
    MetricsNotComputed,

    // === DELETE MESSAGES ===
    ConfirmDeleteBatch { id: i64, batch_number: String },
    BatchDeleted(i64),
    OperationCancelled,

    // === GRID MESSAGES ===
    BatchesHeader { line: String, line_lead: String },
    NoBatchesFound,
    PageOutOfRange { page: u32, total_pages: u32 },

    // === WATCH MESSAGES ===
    WatchStarted(u64),
    WatchHelp,
    PromptWatchCommand,
    UnknownWatchCommand(String),
    WatchStopped,
    RefreshSkipped(String),
    RefreshFailed(String),
    ReloadFailed(String),
    LastRefreshed(String),

    // === REFERENCE MESSAGES ===
    ProductsHeader,
    PaceHeader,
    NoProductsFound,
    NoPaceFound,
    ProductSaved(String),
    ProductRemoved(String),
    ProductNotFound(String),
    ProductNameRequired,
    InvalidCycleTime(f64),
    PaceSaved(u32, f64),
    PaceRemoved(u32),
    PaceNotFound(u32),
    PaceFactorFor(u32, f64),
    PaceCountRequired,
    InvalidPaceCount(u32),
    InvalidPaceFactor(f64),
    ReferenceLocalOnly,

    // === STORE MESSAGES ===
    ApiUrlMissing,
    StoreRequestFailed { action: String, status: u16, body: String },

    // === DATABASE MESSAGES ===
    DatabaseVersion(u32),
    DatabaseNeedsUpdate,
    DatabaseUpToDate,
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,
    MigrationHistory,

    // === GENERAL ===
    CommandFailed(String),
}
