use super::open_dashboard;
use crate::{
    libs::{error::DashboardError, messages::Message, view::View},
    msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Batch id
    id: i64,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

pub async fn cmd(delete_args: DeleteArgs) -> Result<()> {
    let (_, mut dashboard) = open_dashboard()?;
    let id = delete_args.id;

    let record = dashboard.find(id).await?;
    if record.is_locked {
        return Err(DashboardError::Locked(id).into());
    }

    if !delete_args.yes {
        View::batch(&record)?;
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(
                Message::ConfirmDeleteBatch {
                    id,
                    batch_number: record.batch_number.clone(),
                }
                .to_string(),
            )
            .default(false)
            .interact()?;
        if !confirmed {
            msg_info!(Message::OperationCancelled);
            return Ok(());
        }
    }

    dashboard.delete_batch(id).await?;
    msg_success!(Message::BatchDeleted(id));

    Ok(())
}
