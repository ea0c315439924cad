use super::batch::BatchRecord;
use super::dashboard::UpdateOutcome;
use super::formatter::{format_delta, format_ratio, format_seconds, format_takt};
use super::pagination::Pagination;
use super::table::{BatchColumn, SortConfig, SortDirection};
use crate::api::Product;
use anyhow::Result;
use prettytable::{row, Cell, Row, Table};

pub struct View {}

impl View {
    /// The batch grid with a sort marker on the active column.
    pub fn batches(rows: &[&BatchRecord], sort: &SortConfig) -> Result<()> {
        let mut table = Table::new();

        let mut header = vec![Cell::new("ID")];
        header.extend(BatchColumn::ALL.iter().map(|column| {
            let marker = match (column == &sort.column, sort.direction) {
                (true, SortDirection::Ascending) => " ↑",
                (true, SortDirection::Descending) => " ↓",
                (false, _) => "",
            };
            Cell::new(&format!("{}{}", column.title(), marker))
        }));
        header.push(Cell::new(""));
        table.set_titles(Row::new(header));

        for record in rows {
            let mut cells = vec![Cell::new(&record.id.to_string())];
            cells.extend(BatchColumn::ALL.iter().map(|column| Cell::new(&column.display_value(record))));
            cells.push(Cell::new(if record.is_locked { "🔒" } else { "" }));
            table.add_row(Row::new(cells));
        }
        table.printstd();

        Ok(())
    }

    pub fn page_footer(pagination: &Pagination, visible: usize) {
        println!(
            "Page {} of {} · {} rows per page · {} total · {} shown",
            pagination.current_page(),
            pagination.total_pages(),
            pagination.rows_per_page(),
            pagination.total_rows(),
            visible
        );
    }

    /// Full detail of one batch, including stored metrics.
    pub fn batch(record: &BatchRecord) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", record.id]);
        for column in BatchColumn::ALL {
            table.add_row(row![column.title(), column.display_value(record)]);
        }
        table.add_row(row!["Elapsed", format_seconds(record.total_time_seconds)]);
        table.add_row(row!["Takt", format_takt(record.takt_time_seconds)]);
        table.add_row(row!["Running takt", format_takt(record.running_takt_seconds)]);
        table.add_row(row!["Delta", format_delta(record.target_delta)]);
        table.add_row(row!["Delta %", format_ratio(record.delta_percentage)]);
        table.add_row(row!["Locked", if record.is_locked { "yes" } else { "no" }]);
        table.printstd();

        Ok(())
    }

    pub fn metrics(outcome: &UpdateOutcome) -> Result<()> {
        let metrics = &outcome.metrics;
        let mut table = Table::new();

        table.add_row(row!["ELAPSED", "TAKT", "RUNNING TAKT", "TARGET", "DELTA", "DELTA %"]);
        table.add_row(row![
            format_seconds(metrics.total_time_seconds),
            format_takt(metrics.takt_time_seconds),
            format_takt(metrics.running_takt_seconds),
            metrics.target_units,
            format_delta(metrics.target_delta),
            format_ratio(metrics.delta_percentage)
        ]);
        table.printstd();

        for diagnostic in &outcome.diagnostics {
            println!("  · {}", diagnostic);
        }

        Ok(())
    }

    pub fn products(products: &[Product]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "PRODUCT", "BASELINE CYCLE TIME"]);
        for product in products {
            table.add_row(row![
                product.id.map(|id| id.to_string()).unwrap_or_default(),
                product.product_name,
                format_takt(product.baseline_cycle_time)
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn pace(rows: &[(u32, f64)]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["EMPLOYEES", "PACE FACTOR"]);
        for (employee_count, factor) in rows {
            table.add_row(row![employee_count, factor]);
        }
        table.printstd();

        Ok(())
    }
}
