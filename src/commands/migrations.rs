use crate::{
    db::{
        db::{Db, DB_FILE_NAME},
        migrations::{report_status, MigrationManager},
    },
    libs::{data_storage::DataStorage, messages::Message},
    msg_info, msg_print,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct MigrationsArgs {
    #[command(subcommand)]
    command: MigrationsCommand,
}

#[derive(Debug, Subcommand)]
enum MigrationsCommand {
    /// Show current database version
    Status,
    /// Show migration history
    History,
}

pub fn cmd(args: MigrationsArgs) -> Result<()> {
    let path = DataStorage::new().get_path(DB_FILE_NAME)?;
    let conn = Db::open_without_migrations(&path)?;
    msg_info!(Message::StoreInUse(path.display().to_string()));

    match args.command {
        MigrationsCommand::Status => report_status(&conn)?,
        MigrationsCommand::History => {
            let history = MigrationManager::new().get_migration_history(&conn)?;

            msg_print!(Message::MigrationHistory, true);
            for (version, name, applied_at) in history {
                println!("  v{}: {} (applied: {})", version, name, applied_at);
            }
        }
    }

    Ok(())
}
