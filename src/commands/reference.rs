use crate::{
    api::{Backend, ReferenceData},
    db::LocalStore,
    libs::{config::Config, messages::Message, view::View},
    msg_bail_anyhow, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct ReferenceArgs {
    #[command(subcommand)]
    command: ReferenceCommand,
}

#[derive(Debug, Subcommand)]
enum ReferenceCommand {
    /// List products and their baseline cycle times
    Products,
    /// Show employee pace factors
    Pace {
        /// Only the factor for this crew size
        #[arg(short, long)]
        count: Option<u32>,
    },
    /// Add a product or change its baseline cycle time
    AddProduct {
        /// Product name
        name: String,
        /// Seconds one worker needs for one unit
        baseline: f64,
    },
    /// Remove a product
    RemoveProduct {
        /// Product name
        name: String,
    },
    /// Set the pace factor for a crew size
    SetPace {
        /// Number of employees
        count: u32,
        /// Pace factor, as a fraction (0.85) or a percentage (85)
        factor: f64,
    },
    /// Remove the pace factor for a crew size
    RemovePace {
        /// Number of employees
        count: u32,
    },
}

pub async fn cmd(args: ReferenceArgs) -> Result<()> {
    let config = Config::read()?;
    let backend = Backend::from_config(&config.store)?;

    match args.command {
        ReferenceCommand::Products => handle_products(&backend).await,
        ReferenceCommand::Pace { count } => handle_pace(&backend, count).await,
        ReferenceCommand::AddProduct { name, baseline } => {
            local(&backend)?.save_product(&name, baseline)?;
            msg_success!(Message::ProductSaved(name.trim().to_string()));
            Ok(())
        }
        ReferenceCommand::RemoveProduct { name } => {
            local(&backend)?.remove_product(&name)?;
            msg_success!(Message::ProductRemoved(name));
            Ok(())
        }
        ReferenceCommand::SetPace { count, factor } => {
            local(&backend)?.save_pace(count, factor)?;
            msg_success!(Message::PaceSaved(count, factor));
            Ok(())
        }
        ReferenceCommand::RemovePace { count } => {
            local(&backend)?.remove_pace(count)?;
            msg_success!(Message::PaceRemoved(count));
            Ok(())
        }
    }
}

fn local(backend: &Backend) -> Result<&LocalStore> {
    match backend {
        Backend::Local(store) => Ok(store),
        Backend::Remote(_) => msg_bail_anyhow!(Message::ReferenceLocalOnly),
    }
}

async fn handle_products(backend: &Backend) -> Result<()> {
    let products = backend.products().await?;
    if products.is_empty() {
        msg_info!(Message::NoProductsFound);
        return Ok(());
    }

    msg_print!(Message::ProductsHeader, true);
    View::products(&products)
}

async fn handle_pace(backend: &Backend, count: Option<u32>) -> Result<()> {
    if let Some(count) = count {
        match backend.pace_factor(count).await? {
            Some(factor) => msg_print!(Message::PaceFactorFor(count, factor)),
            None => msg_info!(Message::PaceNotFound(count)),
        }
        return Ok(());
    }

    let rows = match backend {
        Backend::Local(store) => store.pace_table()?,
        Backend::Remote(_) => msg_bail_anyhow!(Message::PaceCountRequired),
    };
    if rows.is_empty() {
        msg_info!(Message::NoPaceFound);
        return Ok(());
    }

    msg_print!(Message::PaceHeader, true);
    View::pace(&rows)
}
