//! Wording of every [`Message`].
//!
//! Keeping all texts in one match makes the tone consistent and keeps string
//! literals out of command code.

use super::types::Message;
use crate::libs::clock::MIN_BATCH_MINUTES;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let s = match self {
            // === SESSION MESSAGES ===
            Message::LoggedIn { line, line_lead } => format!("Logged in on {} with line lead {}", line, line_lead),
            Message::LoggedOut => "Logged out".to_string(),
            Message::NoActiveSession => "No active session".to_string(),
            Message::RosterEmpty => "No lines or line leads configured. Run `taktline init` and edit the roster".to_string(),
            Message::PromptSelectLine => "Select line".to_string(),
            Message::PromptSelectLineLead => "Select line lead".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigModuleStore => "Store settings".to_string(),
            Message::ConfigModuleDashboard => "Dashboard settings".to_string(),
            Message::ConfigModuleRoster => "Roster settings".to_string(),
            Message::PromptSelectModules => "Select sections to configure".to_string(),
            Message::PromptBackend => "Where are batches stored?".to_string(),
            Message::PromptApiUrl => "Enter the batch API URL".to_string(),
            Message::PromptRowsPerPage => "Rows per page".to_string(),
            Message::PromptRefreshInterval => "Auto refresh interval (seconds)".to_string(),
            Message::PromptLines => "Lines (comma separated)".to_string(),
            Message::PromptLineLeads => "Line leads (comma separated)".to_string(),
            Message::DatabaseReady(path) => format!("Local database ready at {}", path),
            Message::StoreInUse(store) => format!("Using {}", store),

            // === BATCH FORM MESSAGES ===
            Message::PromptUbiNo => "UBI No.".to_string(),
            Message::PromptBatchNumber => "Batch Number".to_string(),
            Message::PromptProduct => "Product".to_string(),
            Message::PromptPackingFormat => "Packing Format".to_string(),
            Message::BatchCreated(id) => format!("Batch {} created", id),
            Message::ProductsUnavailable(error) => format!("Failed to fetch products, enter the product name manually: {}", error),

            // === UPDATE FORM MESSAGES ===
            Message::PromptProductStatus => "Product Status".to_string(),
            Message::PromptStartTime => "Start Time".to_string(),
            Message::PromptEndTime => format!("End Time (at least {} minutes after start)", MIN_BATCH_MINUTES),
            Message::PromptEmployeeCount => "Employee Count".to_string(),
            Message::PromptActualUnits => "Actual Units".to_string(),
            Message::NoEndTimeAvailable(start) => format!("No end time is available at least {} minutes after {}", MIN_BATCH_MINUTES, start),
            Message::BatchUpdated(id) => format!("Batch {} updated and locked", id),
            Message::MetricsHeader => "Takt metrics".to_string(),
            Message::MetricsDegraded(reason) => format!("Metrics set to zero: {}", reason),
            Message::MetricsNotComputed => "Metrics could not be computed and were saved as zero".to_string(),

            // === DELETE MESSAGES ===
            Message::ConfirmDeleteBatch { id, batch_number } => format!("Delete batch {} ({})?", id, batch_number),
            Message::BatchDeleted(id) => format!("Batch {} deleted", id),
            Message::OperationCancelled => "Operation cancelled".to_string(),

            // === GRID MESSAGES ===
            Message::BatchesHeader { line, line_lead } => format!("Batches · {} · {}", line, line_lead),
            Message::NoBatchesFound => "No batches found".to_string(),
            Message::PageOutOfRange { page, total_pages } => format!("Page {} does not exist, there are {} pages", page, total_pages),

            // === WATCH MESSAGES ===
            Message::WatchStarted(seconds) => format!("Watching batches, refreshing every {} seconds. Type `help` for commands", seconds),
            Message::WatchHelp => [
                "n / next, p / prev, first, last   move between pages",
                "page <n>                          jump to a page",
                "rows <n>                          rows per page (10, 50, 100, 250, 500, 1000)",
                "sort <column>                     sort by column, again to flip",
                "search <text>                     search all columns",
                "filter <column>=<value>           filter one column, empty value clears it",
                "clear                             clear search, filters and sort",
                "new                               create a batch",
                "update <id>                       finalize a batch",
                "delete <id>                       delete an unlocked batch",
                "r / refresh                       reload now",
                "q / quit                          leave",
            ]
            .join("\n"),
            Message::PromptWatchCommand => "taktline".to_string(),
            Message::UnknownWatchCommand(command) => format!("Unknown command `{}`. Type `help` for commands", command),
            Message::WatchStopped => "Stopped watching".to_string(),
            Message::RefreshSkipped(controls) => format!("Auto refresh skipped, input focused: {}", controls),
            Message::RefreshFailed(error) => format!("Failed to fetch table data: {}", error),
            Message::ReloadFailed(error) => format!("Saved, but reloading the grid failed: {}", error),
            Message::LastRefreshed(at) => format!("Last refreshed {}", at),

            // === REFERENCE MESSAGES ===
            Message::ProductsHeader => "Products".to_string(),
            Message::PaceHeader => "Employee pace".to_string(),
            Message::NoProductsFound => "No products found".to_string(),
            Message::NoPaceFound => "No employee pace factors found".to_string(),
            Message::ProductSaved(name) => format!("Product '{}' saved", name),
            Message::ProductRemoved(name) => format!("Product '{}' removed", name),
            Message::ProductNotFound(name) => format!("Product '{}' not found", name),
            Message::ProductNameRequired => "Product name cannot be empty".to_string(),
            Message::InvalidCycleTime(value) => format!("Baseline cycle time must be a positive number of seconds, got {}", value),
            Message::PaceSaved(count, factor) => format!("Pace factor {} saved for {} employees", factor, count),
            Message::PaceRemoved(count) => format!("Pace factor for {} employees removed", count),
            Message::PaceNotFound(count) => format!("No pace factor for {} employees", count),
            Message::PaceFactorFor(count, factor) => format!("{} employees: pace factor {}", count, factor),
            Message::PaceCountRequired => "The remote store looks up pace factors one crew size at a time, pass --count".to_string(),
            Message::InvalidPaceCount(count) => format!("Employee count must be positive, got {}", count),
            Message::InvalidPaceFactor(factor) => format!("Pace factor must be a positive number, got {}", factor),
            Message::ReferenceLocalOnly => "Reference data can only be edited on the local store".to_string(),

            // === STORE MESSAGES ===
            Message::ApiUrlMissing => "The remote store needs an API URL. Run `taktline init` or set TAKTLINE_API_URL".to_string(),
            Message::StoreRequestFailed { action, status, body } => {
                if body.is_empty() {
                    format!("Failed to {} ({})", action, status)
                } else {
                    format!("Failed to {}: {} ({})", action, body, status)
                }
            }

            // === DATABASE MESSAGES ===
            Message::DatabaseVersion(version) => format!("Database schema version: {}", version),
            Message::DatabaseNeedsUpdate => "Database needs migration".to_string(),
            Message::DatabaseUpToDate => "Database is up to date".to_string(),
            Message::MigrationsFound(count) => format!("Found {} pending migrations", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All migrations completed".to_string(),
            Message::MigrationHistory => "Migration history:".to_string(),

            // === GENERAL ===
            Message::CommandFailed(error) => error.clone(),
        };
        write!(f, "{}", s)
    }
}
