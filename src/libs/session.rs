//! The operator session: which line is running and who leads it.
//!
//! Logging in stores the selection in `session.json` inside the application
//! data directory. Commands load it explicitly and hand it to the dashboard,
//! which stamps new batches with its line and line lead.

use crate::libs::data_storage::DataStorage;
use crate::libs::error::DashboardError;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub line: String,
    pub line_lead: String,
    pub started_at: NaiveDateTime,
}

impl Session {
    pub fn new(line: &str, line_lead: &str) -> Result<Self, DashboardError> {
        let line = line.trim();
        let line_lead = line_lead.trim();
        if line.is_empty() || line_lead.is_empty() {
            return Err(DashboardError::InvalidSession);
        }

        Ok(Self {
            line: line.to_string(),
            line_lead: line_lead.to_string(),
            started_at: Local::now().naive_local(),
        })
    }
}

/// Persists the single active session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: DataStorage::new().get_path(SESSION_FILE_NAME)?,
        })
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Starts a session, replacing any previous one.
    pub fn create(&self, line: &str, line_lead: &str) -> Result<Session> {
        let session = Session::new(line, line_lead)?;
        let file = File::create(&self.path).with_context(|| format!("cannot write {}", self.path.display()))?;
        serde_json::to_writer_pretty(&file, &session)?;
        tracing::debug!(line = %session.line, line_lead = %session.line_lead, "session created");
        Ok(session)
    }

    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path).with_context(|| format!("cannot read {}", self.path.display()))?;
        let session = serde_json::from_str(&raw).with_context(|| format!("corrupted session file {}", self.path.display()))?;
        Ok(Some(session))
    }

    /// The active session, or [`DashboardError::NoSession`].
    pub fn require(&self) -> Result<Session> {
        self.load()?.ok_or_else(|| DashboardError::NoSession.into())
    }

    /// Ends the session. Returns whether one was active.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)?;
        Ok(true)
    }
}
