//! Interactive grid with auto refresh.
//!
//! The grid is redrawn after every command and after every successful
//! refresh tick. Forms run on a blocking thread while holding focus, which
//! pauses the refresher until the operator is done typing.

use super::{form, list, open_dashboard, product_names};
use crate::{
    api::Backend,
    libs::{
        batch::BatchForm,
        dashboard::Dashboard,
        error::DashboardError,
        focus::FocusManager,
        messages::Message,
        pagination::RowsPerPage,
        refresh::AutoRefresh,
        table::{BatchColumn, TableQuery},
        view::View,
    },
    msg_error, msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{oneshot, Mutex};
use tokio::task;

#[derive(Debug, Clone, PartialEq)]
enum WatchCommand {
    Redraw,
    Next,
    Previous,
    First,
    Last,
    Page(String),
    Rows(RowsPerPage),
    Sort(BatchColumn),
    Search(String),
    Filter(BatchColumn, String),
    Clear,
    New,
    Update(i64),
    Delete(i64),
    Refresh,
    Help,
    Quit,
}

impl WatchCommand {
    fn parse(input: &str) -> Option<WatchCommand> {
        let input = input.trim();
        let (name, arg) = match input.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (input, ""),
        };

        let command = match (name.to_lowercase().as_str(), arg) {
            ("", _) => WatchCommand::Redraw,
            ("n" | "next", "") => WatchCommand::Next,
            ("p" | "prev", "") => WatchCommand::Previous,
            ("first", "") => WatchCommand::First,
            ("last", "") => WatchCommand::Last,
            ("page", arg) if !arg.is_empty() => WatchCommand::Page(arg.to_string()),
            ("rows", arg) => WatchCommand::Rows(arg.parse().ok()?),
            ("sort", arg) => WatchCommand::Sort(arg.parse().ok()?),
            ("search", arg) => WatchCommand::Search(arg.to_string()),
            ("filter", arg) => {
                let (column, value) = TableQuery::parse_filter(arg).ok()?;
                WatchCommand::Filter(column, value)
            }
            ("clear", "") => WatchCommand::Clear,
            ("new", "") => WatchCommand::New,
            ("update", arg) => WatchCommand::Update(arg.parse().ok()?),
            ("delete", arg) => WatchCommand::Delete(arg.parse().ok()?),
            ("r" | "refresh", "") => WatchCommand::Refresh,
            ("h" | "help" | "?", "") => WatchCommand::Help,
            ("q" | "quit" | "exit", "") => WatchCommand::Quit,
            _ => return None,
        };
        Some(command)
    }
}

pub async fn cmd() -> Result<()> {
    let (config, mut dashboard) = open_dashboard()?;
    dashboard.load_page().await?;
    list::render(&dashboard)?;

    let interval = config.dashboard.refresh_every();
    let focus = FocusManager::new();
    let dashboard = Arc::new(Mutex::new(dashboard));

    let (stop, shutdown) = oneshot::channel();
    let refresher = AutoRefresh::new(interval, focus.clone());
    let handle = tokio::spawn(refresher.run(Arc::clone(&dashboard), shutdown, |board| {
        if let Err(e) = list::render(board) {
            tracing::warn!(error = %e, "failed to redraw grid");
        }
    }));

    msg_info!(Message::WatchStarted(interval.as_secs()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}> ", Message::PromptWatchCommand);
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match WatchCommand::parse(&line) {
            Some(WatchCommand::Quit) => break,
            Some(command) => {
                if let Err(e) = execute(&dashboard, &focus, command).await {
                    msg_error!(Message::CommandFailed(format!("{:#}", e)));
                }
            }
            None => msg_warning!(Message::UnknownWatchCommand(line.trim().to_string())),
        }
    }

    let _ = stop.send(());
    handle.await?;
    msg_info!(Message::WatchStopped);

    Ok(())
}

async fn execute(dashboard: &Mutex<Dashboard<Backend>>, focus: &FocusManager, command: WatchCommand) -> Result<()> {
    let mut board = match command {
        WatchCommand::New => return create(dashboard, focus).await,
        WatchCommand::Update(id) => return update(dashboard, focus, id).await,
        WatchCommand::Delete(id) => return delete(dashboard, focus, id).await,
        WatchCommand::Help => {
            msg_print!(Message::WatchHelp);
            return Ok(());
        }
        _ => dashboard.lock().await,
    };

    match command {
        WatchCommand::Next => {
            board.next_page().await?;
        }
        WatchCommand::Previous => {
            board.previous_page().await?;
        }
        WatchCommand::First => {
            board.first_page().await?;
        }
        WatchCommand::Last => {
            board.last_page().await?;
        }
        WatchCommand::Page(input) => {
            board.jump(&input).await?;
        }
        WatchCommand::Rows(rows) => board.set_rows_per_page(rows).await?,
        WatchCommand::Sort(column) => board.toggle_sort(column),
        WatchCommand::Search(text) => board.set_search(&text),
        WatchCommand::Filter(column, value) => board.set_filter(column, &value),
        WatchCommand::Clear => board.clear_query(),
        WatchCommand::Refresh => board.refresh().await?,
        _ => {}
    }

    list::render(&board)
}

async fn product_choices(board: &Dashboard<Backend>) -> Vec<String> {
    product_names(board.store()).await.unwrap_or_else(|e| {
        msg_warning!(Message::ProductsUnavailable(e));
        Vec::new()
    })
}

async fn create(dashboard: &Mutex<Dashboard<Backend>>, focus: &FocusManager) -> Result<()> {
    let products = product_choices(&*dashboard.lock().await).await;

    let form = {
        let _focus = focus.acquire("batch details");
        task::spawn_blocking(move || form::prompt_batch_form(&products, BatchForm::default())).await??
    };

    let mut board = dashboard.lock().await;
    let id = board.create_batch(&form).await?;
    msg_success!(Message::BatchCreated(id));
    list::render(&board)
}

async fn update(dashboard: &Mutex<Dashboard<Backend>>, focus: &FocusManager, id: i64) -> Result<()> {
    let (record, products) = {
        let board = dashboard.lock().await;
        let record = board.find(id).await?;
        if record.is_locked {
            return Err(DashboardError::Locked(id).into());
        }
        (record, product_choices(&board).await)
    };

    let update = {
        let _focus = focus.acquire("update batch");
        task::spawn_blocking(move || form::prompt_update(&record, &products)).await??
    };

    let mut board = dashboard.lock().await;
    let outcome = board.submit_update(id, &update).await?;
    msg_success!(Message::BatchUpdated(outcome.id));
    msg_print!(Message::MetricsHeader, true);
    View::metrics(&outcome)?;
    if outcome.metrics.is_zero() {
        msg_info!(Message::MetricsNotComputed);
    }
    list::render(&board)
}

async fn delete(dashboard: &Mutex<Dashboard<Backend>>, focus: &FocusManager, id: i64) -> Result<()> {
    let record = dashboard.lock().await.find(id).await?;
    if record.is_locked {
        return Err(DashboardError::Locked(id).into());
    }
    View::batch(&record)?;

    let prompt = Message::ConfirmDeleteBatch {
        id,
        batch_number: record.batch_number.clone(),
    }
    .to_string();
    let confirmed = {
        let _focus = focus.acquire("confirm delete");
        task::spawn_blocking(move || Confirm::with_theme(&ColorfulTheme::default()).with_prompt(prompt).default(false).interact()).await??
    };
    if !confirmed {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    let mut board = dashboard.lock().await;
    board.delete_batch(id).await?;
    msg_success!(Message::BatchDeleted(id));
    list::render(&board)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_navigation() {
        assert_eq!(WatchCommand::parse(""), Some(WatchCommand::Redraw));
        assert_eq!(WatchCommand::parse("n"), Some(WatchCommand::Next));
        assert_eq!(WatchCommand::parse(" prev "), Some(WatchCommand::Previous));
        assert_eq!(WatchCommand::parse("page 4"), Some(WatchCommand::Page("4".to_string())));
        assert_eq!(WatchCommand::parse("rows 250"), Some(WatchCommand::Rows(RowsPerPage::TwoHundredFifty)));
        assert_eq!(WatchCommand::parse("Q"), Some(WatchCommand::Quit));
    }

    #[test]
    fn parses_query_commands() {
        assert_eq!(WatchCommand::parse("sort batch-number"), Some(WatchCommand::Sort(BatchColumn::BatchNumber)));
        assert_eq!(WatchCommand::parse("search rosin cart"), Some(WatchCommand::Search("rosin cart".to_string())));
        assert_eq!(
            WatchCommand::parse("filter line=Line 3"),
            Some(WatchCommand::Filter(BatchColumn::Line, "Line 3".to_string()))
        );
    }

    #[test]
    fn parses_batch_commands() {
        assert_eq!(WatchCommand::parse("update 42"), Some(WatchCommand::Update(42)));
        assert_eq!(WatchCommand::parse("delete 7"), Some(WatchCommand::Delete(7)));
        assert_eq!(WatchCommand::parse("new"), Some(WatchCommand::New));
    }

    #[test]
    fn rejects_malformed_commands() {
        assert_eq!(WatchCommand::parse("rows 7"), None);
        assert_eq!(WatchCommand::parse("update seven"), None);
        assert_eq!(WatchCommand::parse("next 2"), None);
        assert_eq!(WatchCommand::parse("page"), None);
        assert_eq!(WatchCommand::parse("launch"), None);
    }
}
