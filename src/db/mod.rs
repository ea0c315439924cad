//! Local SQLite store.
//!
//! - [`db`]: connection setup in the application data directory
//! - [`migrations`]: versioned schema management
//! - [`batches`]: [`LocalStore`], the `BatchStore` implementation
//! - [`references`]: product and employee pace tables

pub mod batches;
pub mod db;
pub mod migrations;
pub mod references;

pub use batches::LocalStore;
