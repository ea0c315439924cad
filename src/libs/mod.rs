//! Core library modules for taktline.
//!
//! ## Layout
//!
//! - **Domain**: `batch`, `clock`, `takt`, `error`
//! - **Dashboard state**: `dashboard`, `pagination`, `table`, `session`, `focus`, `refresh`
//! - **Infrastructure**: `config`, `data_storage`, `messages`
//! - **Output**: `formatter`, `view`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use taktline::libs::session::SessionStore;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let session = SessionStore::new()?.require()?;
//! println!("{} on {}", session.line_lead, session.line);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod data_storage;
pub mod error;
pub mod focus;
pub mod formatter;
pub mod messages;
pub mod pagination;
pub mod refresh;
pub mod session;
pub mod table;
pub mod takt;
pub mod view;
