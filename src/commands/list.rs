use super::open_dashboard;
use crate::{
    api::Backend,
    libs::{
        dashboard::Dashboard,
        formatter::format_created_at,
        messages::Message,
        pagination::RowsPerPage,
        table::{BatchColumn, SortConfig, SortDirection, TableQuery},
        view::View,
    },
    msg_bail_anyhow, msg_info, msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Page number, starting at 1
    #[arg(short, long, default_value_t = 1)]
    page: u32,
    /// Rows per page: 10, 50, 100, 250, 500 or 1000
    #[arg(short, long)]
    rows: Option<RowsPerPage>,
    /// Case-insensitive text matched against every column
    #[arg(short, long)]
    search: Option<String>,
    /// Column filter as column=value, repeatable
    #[arg(short, long)]
    filter: Vec<String>,
    /// Column to sort by
    #[arg(long)]
    sort: Option<BatchColumn>,
    /// Sort descending
    #[arg(long)]
    desc: bool,
}

pub async fn cmd(list_args: ListArgs) -> Result<()> {
    let (_, mut dashboard) = open_dashboard()?;

    if let Some(rows) = list_args.rows {
        dashboard.set_rows_per_page(rows).await?;
    } else {
        dashboard.load_page().await?;
    }

    if list_args.page != dashboard.pagination().current_page() {
        let total_pages = dashboard.pagination().total_pages();
        if list_args.page == 0 || list_args.page > total_pages {
            msg_bail_anyhow!(Message::PageOutOfRange {
                page: list_args.page,
                total_pages,
            });
        }
        dashboard.go_to_page(list_args.page).await?;
    }

    if let Some(search) = &list_args.search {
        dashboard.set_search(search);
    }
    for raw in &list_args.filter {
        let (column, value) = TableQuery::parse_filter(raw)?;
        dashboard.set_filter(column, &value);
    }
    if let Some(column) = list_args.sort {
        let direction = if list_args.desc { SortDirection::Descending } else { SortDirection::Ascending };
        dashboard.set_sort(SortConfig { column, direction });
    }

    render(&dashboard)
}

/// Prints the header, the visible rows and the page footer.
pub(crate) fn render(dashboard: &Dashboard<Backend>) -> Result<()> {
    let session = dashboard.session();
    msg_print!(
        Message::BatchesHeader {
            line: session.line.clone(),
            line_lead: session.line_lead.clone(),
        },
        true
    );

    let rows = dashboard.visible_rows();
    if rows.is_empty() {
        msg_info!(Message::NoBatchesFound);
    } else {
        View::batches(&rows, &dashboard.query().sort)?;
    }
    View::page_footer(dashboard.pagination(), rows.len());
    if let Some(refreshed_at) = dashboard.last_refreshed() {
        msg_print!(Message::LastRefreshed(format_created_at(&refreshed_at)));
    }

    Ok(())
}
