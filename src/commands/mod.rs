//! Command-line interface.
//!
//! Each subcommand lives in its own module with an `Args` struct and a `cmd`
//! function. Commands that work on batches open a [`Dashboard`] over the
//! configured store for the logged-in session.

pub mod create;
pub mod delete;
pub mod form;
pub mod init;
pub mod list;
pub mod login;
pub mod logout;
#[cfg(debug_assertions)]
pub mod migrations;
pub mod reference;
pub mod update;
pub mod watch;

use crate::api::{Backend, ReferenceData};
use crate::libs::config::Config;
use crate::libs::dashboard::Dashboard;
use crate::libs::session::SessionStore;
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configure the store, dashboard and roster")]
    Init(init::InitArgs),
    #[command(about = "Start a session for a line and line lead")]
    Login(login::LoginArgs),
    #[command(about = "End the current session")]
    Logout,
    #[command(about = "Create a batch on the current line")]
    Create(create::CreateArgs),
    #[command(about = "Show the batch grid")]
    List(list::ListArgs),
    #[command(about = "Finalize a batch: compute takt metrics and lock it", arg_required_else_help = true)]
    Update(update::UpdateArgs),
    #[command(about = "Delete a batch that is not locked yet", arg_required_else_help = true)]
    Delete(delete::DeleteArgs),
    #[command(about = "Interactive grid with auto refresh")]
    Watch,
    #[command(about = "Products and employee pace factors")]
    Reference(reference::ReferenceArgs),
    #[cfg(debug_assertions)]
    #[command(about = "Database migration status")]
    Migrations(migrations::MigrationsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Login(args) => login::cmd(args),
            Commands::Logout => logout::cmd(),
            Commands::Create(args) => create::cmd(args).await,
            Commands::List(args) => list::cmd(args).await,
            Commands::Update(args) => update::cmd(args).await,
            Commands::Delete(args) => delete::cmd(args).await,
            Commands::Watch => watch::cmd().await,
            Commands::Reference(args) => reference::cmd(args).await,
            #[cfg(debug_assertions)]
            Commands::Migrations(args) => migrations::cmd(args),
        }
    }
}

/// Configuration plus a dashboard for the active session over the configured store.
pub(crate) fn open_dashboard() -> Result<(Config, Dashboard<Backend>)> {
    let config = Config::read()?;
    let session = SessionStore::new()?.require()?;
    let backend = Backend::from_config(&config.store)?;
    tracing::debug!(store = %backend.describe(), line = %session.line, "dashboard opened");

    let dashboard = Dashboard::new(backend, session, config.dashboard.rows_per_page);
    Ok((config, dashboard))
}

/// Product names for the form pickers. `Err` carries the fetch failure text.
pub(crate) async fn product_names<S: ReferenceData>(store: &S) -> std::result::Result<Vec<String>, String> {
    store
        .products()
        .await
        .map(|products| products.into_iter().map(|product| product.product_name).collect())
        .map_err(|e| e.to_string())
}
