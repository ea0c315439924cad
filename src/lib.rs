//! # Taktline - production line batch dashboard
//!
//! A command-line dashboard for packaging lines. A line lead logs in for a
//! line, records batches as they start, and finalizes each batch with its
//! crew size, time window and unit count. Finalizing computes takt metrics
//! against the product's baseline cycle time and locks the batch.
//!
//! ## Features
//!
//! - **Sessions**: one line and line lead per terminal, persisted between commands
//! - **Batch grid**: paginated listing with search, column filters and sorting
//! - **Takt metrics**: target units, takt time and delta to target on update
//! - **Stores**: a local SQLite database or the batch-details HTTP API
//! - **Watch mode**: interactive grid with auto refresh
//!
//! ## Usage
//!
//! ```rust,no_run
//! use taktline::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod db;
pub mod libs;
