use super::{form, open_dashboard, product_names};
use crate::{
    libs::{batch::BatchForm, messages::Message},
    msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// UBI number
    #[arg(short, long)]
    ubi: Option<String>,
    /// Batch number
    #[arg(short, long)]
    batch: Option<String>,
    /// Product name
    #[arg(short, long)]
    product: Option<String>,
    /// Packing format
    #[arg(short, long)]
    format: Option<String>,
}

impl CreateArgs {
    fn seed(self) -> BatchForm {
        BatchForm {
            ubi_no: self.ubi.unwrap_or_default(),
            batch_number: self.batch.unwrap_or_default(),
            product: self.product.unwrap_or_default(),
            packing_format: self.format.unwrap_or_default(),
        }
    }
}

pub async fn cmd(create_args: CreateArgs) -> Result<()> {
    let (_, mut dashboard) = open_dashboard()?;

    let products = product_names(dashboard.store()).await.unwrap_or_else(|e| {
        msg_warning!(Message::ProductsUnavailable(e));
        Vec::new()
    });

    let form = form::prompt_batch_form(&products, create_args.seed())?;
    let id = dashboard.create_batch(&form).await?;
    msg_success!(Message::BatchCreated(id));

    Ok(())
}
