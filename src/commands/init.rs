use crate::{
    db::LocalStore,
    libs::{
        config::{BackendKind, Config},
        messages::Message,
    },
    msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write the default configuration without asking
    #[arg(short, long)]
    default: bool,
}

pub fn cmd(init_args: InitArgs) -> Result<()> {
    let config = if init_args.default { Config::default() } else { Config::init()? };
    config.save()?;
    msg_success!(Message::ConfigSaved);

    if config.store.backend == BackendKind::Local {
        let store = LocalStore::new()?;
        msg_info!(Message::DatabaseReady(store.path().display().to_string()));
    }

    Ok(())
}
