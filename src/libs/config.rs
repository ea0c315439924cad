//! Application configuration.
//!
//! Settings live in `config.json` in the application data directory and are
//! grouped into three sections:
//!
//! - **store**: which backend holds the batches (`local` SQLite or `remote` API)
//! - **dashboard**: grid page size and auto-refresh interval
//! - **roster**: lines and line leads offered at login
//!
//! A missing file yields the defaults, so the dashboard works against the
//! local store without running `taktline init` first. `TAKTLINE_API_URL`
//! overrides the configured API URL.

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::libs::pagination::RowsPerPage;
use crate::msg_print;
use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Select};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Environment variable overriding [`StoreConfig::api_url`].
pub const API_URL_ENV: &str = "TAKTLINE_API_URL";

/// A section offered by the configuration wizard.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Local,
    Remote,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Local => write!(f, "local"),
            BackendKind::Remote => write!(f, "remote"),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: BackendKind,
    /// Base URL of the batch-details API, e.g. `http://localhost:5000`.
    pub api_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Local,
            api_url: "http://localhost:5000".to_string(),
        }
    }
}

impl StoreConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "store".to_string(),
            name: "Store".to_string(),
        }
    }

    pub fn init(config: &Self) -> Result<Self> {
        msg_print!(Message::ConfigModuleStore);
        let backends = [BackendKind::Local, BackendKind::Remote];
        let current = backends.iter().position(|kind| *kind == config.backend).unwrap_or(0);
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptBackend.to_string())
            .items(&backends)
            .default(current)
            .interact()?;
        let backend = backends[selection];

        let api_url = match backend {
            BackendKind::Remote => Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptApiUrl.to_string())
                .default(config.api_url.clone())
                .interact_text()?,
            BackendKind::Local => config.api_url.clone(),
        };

        Ok(Self { backend, api_url })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub rows_per_page: RowsPerPage,
    /// Seconds between automatic grid refreshes in `watch`.
    pub refresh_interval: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            rows_per_page: RowsPerPage::Ten,
            refresh_interval: 30,
        }
    }
}

impl DashboardConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "dashboard".to_string(),
            name: "Dashboard".to_string(),
        }
    }

    /// Refresh interval, never shorter than one second.
    pub fn refresh_every(&self) -> Duration {
        Duration::from_secs(self.refresh_interval.max(1))
    }

    pub fn init(config: &Self) -> Result<Self> {
        msg_print!(Message::ConfigModuleDashboard);
        let current = RowsPerPage::ALL.iter().position(|rows| *rows == config.rows_per_page).unwrap_or(0);
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptRowsPerPage.to_string())
            .items(&RowsPerPage::ALL)
            .default(current)
            .interact()?;

        Ok(Self {
            rows_per_page: RowsPerPage::ALL[selection],
            refresh_interval: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptRefreshInterval.to_string())
                .default(config.refresh_interval)
                .interact_text()?,
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RosterConfig {
    pub lines: Vec<String>,
    pub line_leads: Vec<String>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            lines: (1..=16).map(|n| format!("Line {}", n)).collect(),
            line_leads: [
                "Abelardo Podriguez",
                "Adolfo Valdes",
                "Belkis Carballo",
                "Delia Da Silva",
                "Dora Garza",
                "Lay Blanco",
                "Lester Igarza",
                "Maria Mendez",
                "Samantha Perez-Morell",
                "Susana Ceballos",
                "Yanet Pesqueria",
            ]
            .iter()
            .map(|name| name.to_string())
            .collect(),
        }
    }
}

impl RosterConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "roster".to_string(),
            name: "Roster".to_string(),
        }
    }

    pub fn init(config: &Self) -> Result<Self> {
        msg_print!(Message::ConfigModuleRoster);
        let lines: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptLines.to_string())
            .default(config.lines.join(", "))
            .interact_text()?;
        let line_leads: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptLineLeads.to_string())
            .default(config.line_leads.join(", "))
            .interact_text()?;

        Ok(Self {
            lines: split_list(&lines),
            line_leads: split_list(&line_leads),
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|item| !item.is_empty()).map(str::to_string).collect()
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub dashboard: DashboardConfig,
    pub roster: RosterConfig,
}

impl Config {
    /// Loads `config.json` from the data directory, applying environment overrides.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let mut config = Self::read_from(&config_file_path)?;
        if let Ok(api_url) = std::env::var(API_URL_ENV) {
            if !api_url.trim().is_empty() {
                config.store.api_url = api_url;
            }
        }
        Ok(config)
    }

    /// Loads configuration from `path`, or the defaults when the file does not exist.
    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let config_str = fs::read_to_string(path)?;
        let config = serde_json::from_str(&config_str).with_context(|| format!("cannot parse {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        self.save_to(&config_file_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Interactive wizard over the selected sections, seeded with the current values.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = [StoreConfig::module(), DashboardConfig::module(), RosterConfig::module()];
        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "store" => config.store = StoreConfig::init(&config.store)?,
                "dashboard" => config.dashboard = DashboardConfig::init(&config.dashboard)?,
                "roster" => config.roster = RosterConfig::init(&config.roster)?,
                _ => {}
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_falls_back_to_section_defaults() {
        let config: Config = serde_json::from_str(r#"{"store": {"backend": "remote"}}"#).unwrap();
        assert_eq!(config.store.backend, BackendKind::Remote);
        assert_eq!(config.store.api_url, "http://localhost:5000");
        assert_eq!(config.dashboard.refresh_interval, 30);
        assert_eq!(config.roster.lines.len(), 16);
    }

    #[test]
    fn splits_roster_lists() {
        assert_eq!(split_list(" Line 1, ,Line 2 "), vec!["Line 1".to_string(), "Line 2".to_string()]);
    }

    #[test]
    fn refresh_interval_has_a_floor() {
        let dashboard = DashboardConfig {
            refresh_interval: 0,
            ..DashboardConfig::default()
        };
        assert_eq!(dashboard.refresh_every(), Duration::from_secs(1));
    }
}
