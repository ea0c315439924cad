use super::{form, open_dashboard, product_names};
use crate::{
    libs::{
        batch::{BatchUpdate, ProductStatus},
        error::DashboardError,
        messages::Message,
        view::View,
    },
    msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Batch id
    id: i64,
    /// Product name
    #[arg(short, long)]
    product: Option<String>,
    /// Finished Goods, Machine Down or WIP
    #[arg(short, long)]
    status: Option<ProductStatus>,
    /// Start time, e.g. "9:00 AM"
    #[arg(long)]
    start: Option<String>,
    /// End time, at least 15 minutes after the start
    #[arg(long)]
    end: Option<String>,
    /// Number of employees on the batch
    #[arg(short, long)]
    employees: Option<u32>,
    /// Units actually produced
    #[arg(short, long)]
    actual: Option<i64>,
}

impl UpdateArgs {
    fn update(&self) -> Option<BatchUpdate> {
        let update = BatchUpdate {
            product: self.product.clone(),
            product_status: self.status,
            start_time: self.start.clone(),
            end_time: self.end.clone(),
            employee_count: self.employees,
            actual_units: self.actual,
        };
        if update == BatchUpdate::default() {
            None
        } else {
            Some(update)
        }
    }
}

pub async fn cmd(update_args: UpdateArgs) -> Result<()> {
    let (_, mut dashboard) = open_dashboard()?;
    let id = update_args.id;

    let record = dashboard.find(id).await?;
    if record.is_locked {
        return Err(DashboardError::Locked(id).into());
    }

    let update = match update_args.update() {
        Some(update) => update,
        None => {
            let products = product_names(dashboard.store()).await.unwrap_or_else(|e| {
                msg_warning!(Message::ProductsUnavailable(e));
                Vec::new()
            });
            form::prompt_update(&record, &products)?
        }
    };

    let outcome = dashboard.submit_update(id, &update).await?;
    msg_success!(Message::BatchUpdated(outcome.id));
    msg_print!(Message::MetricsHeader, true);
    View::metrics(&outcome)?;
    if outcome.metrics.is_zero() {
        msg_info!(Message::MetricsNotComputed);
    }

    Ok(())
}
