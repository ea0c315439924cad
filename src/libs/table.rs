//! Search, filter and sort over the cached page of batches.
//!
//! The engine works on borrowed records and returns a new ordering of
//! references, so the dashboard cache is never reordered or mutated. Every
//! comparison is done against the same text the grid shows (see
//! [`BatchColumn::display_value`]), which keeps search, filters and what the
//! operator reads in agreement.
//!
//! ## Pipeline
//!
//! 1. **Search**: case-insensitive substring over every column
//! 2. **Filter**: per-column case-insensitive substring, all must match
//! 3. **Sort**: single column, stable, with an id tie-break for `created_at`
//!
//! ```rust,ignore
//! let mut query = TableQuery::default();
//! query.search = "a1".to_string();
//! query.sort.toggle(BatchColumn::BatchNumber);
//! let rows = view(&records, &query);
//! ```

use crate::libs::batch::BatchRecord;
use crate::libs::clock;
use crate::libs::error::DashboardError;
use crate::libs::formatter;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Columns of the batch grid, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BatchColumn {
    UbiNo,
    CreatedAt,
    Line,
    Product,
    PackingFormat,
    LineLead,
    BatchNumber,
    StartTime,
    EndTime,
    EmployeeCount,
    ProductStatus,
    ActualUnits,
    TargetUnits,
}

impl BatchColumn {
    pub const ALL: [BatchColumn; 13] = [
        BatchColumn::UbiNo,
        BatchColumn::CreatedAt,
        BatchColumn::Line,
        BatchColumn::Product,
        BatchColumn::PackingFormat,
        BatchColumn::LineLead,
        BatchColumn::BatchNumber,
        BatchColumn::StartTime,
        BatchColumn::EndTime,
        BatchColumn::EmployeeCount,
        BatchColumn::ProductStatus,
        BatchColumn::ActualUnits,
        BatchColumn::TargetUnits,
    ];

    /// Name used on the command line and in filters.
    pub fn key(&self) -> &'static str {
        match self {
            BatchColumn::UbiNo => "ubi_no",
            BatchColumn::CreatedAt => "created_at",
            BatchColumn::Line => "line",
            BatchColumn::Product => "product",
            BatchColumn::PackingFormat => "packing_format",
            BatchColumn::LineLead => "line_lead",
            BatchColumn::BatchNumber => "batch_number",
            BatchColumn::StartTime => "start_time",
            BatchColumn::EndTime => "end_time",
            BatchColumn::EmployeeCount => "employee_count",
            BatchColumn::ProductStatus => "product_status",
            BatchColumn::ActualUnits => "actual_units",
            BatchColumn::TargetUnits => "target_units",
        }
    }

    /// Grid header.
    pub fn title(&self) -> &'static str {
        match self {
            BatchColumn::UbiNo => "UBI No.",
            BatchColumn::CreatedAt => "Created",
            BatchColumn::Line => "Line",
            BatchColumn::Product => "Product",
            BatchColumn::PackingFormat => "Packing Format",
            BatchColumn::LineLead => "Line Lead",
            BatchColumn::BatchNumber => "Batch",
            BatchColumn::StartTime => "Start",
            BatchColumn::EndTime => "End",
            BatchColumn::EmployeeCount => "Crew",
            BatchColumn::ProductStatus => "Status",
            BatchColumn::ActualUnits => "Actual",
            BatchColumn::TargetUnits => "Target",
        }
    }

    /// Text shown in the grid for this column of `record`.
    pub fn display_value(&self, record: &BatchRecord) -> String {
        match self {
            BatchColumn::UbiNo => record.ubi_no.clone(),
            BatchColumn::CreatedAt => formatter::format_created_at(&record.created_at),
            BatchColumn::Line => record.line.clone(),
            BatchColumn::Product => record.product.clone(),
            BatchColumn::PackingFormat => record.packing_format.clone(),
            BatchColumn::LineLead => record.line_lead.clone(),
            BatchColumn::BatchNumber => record.batch_number.clone(),
            BatchColumn::StartTime => clock::display_time(record.start_time.as_deref()),
            BatchColumn::EndTime => clock::display_time(record.end_time.as_deref()),
            BatchColumn::EmployeeCount => record.employee_count.map(|count| count.to_string()).unwrap_or_default(),
            BatchColumn::ProductStatus => record.product_status.to_string(),
            BatchColumn::ActualUnits => record.actual_units.to_string(),
            BatchColumn::TargetUnits => record.target_units.to_string(),
        }
    }

    fn compare(&self, a: &BatchRecord, b: &BatchRecord) -> Ordering {
        match self {
            BatchColumn::CreatedAt => a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)),
            // "HH:MM AM/PM" compares lexically, so 01:00 PM sorts before 09:00 AM
            BatchColumn::StartTime | BatchColumn::EndTime => self.display_value(a).cmp(&self.display_value(b)),
            _ => self.display_value(a).to_lowercase().cmp(&self.display_value(b).to_lowercase()),
        }
    }
}

impl fmt::Display for BatchColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for BatchColumn {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        BatchColumn::ALL
            .into_iter()
            .find(|column| column.key() == wanted)
            .ok_or_else(|| DashboardError::InvalidColumn(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    pub column: BatchColumn,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    /// Newest batches first.
    fn default() -> Self {
        Self {
            column: BatchColumn::CreatedAt,
            direction: SortDirection::Descending,
        }
    }
}

impl SortConfig {
    /// Clicking the active column flips it, any other column starts ascending.
    pub fn toggle(&mut self, column: BatchColumn) {
        if self.column == column {
            self.direction = self.direction.flipped();
        } else {
            self.column = column;
            self.direction = SortDirection::Ascending;
        }
    }
}

/// Search text, column filters and sort applied to the visible rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableQuery {
    pub search: String,
    pub filters: BTreeMap<BatchColumn, String>,
    pub sort: SortConfig,
}

impl TableQuery {
    /// Sets or, with an empty value, removes the filter on `column`.
    pub fn set_filter(&mut self, column: BatchColumn, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.filters.remove(&column);
        } else {
            self.filters.insert(column, value.to_string());
        }
    }

    /// Parses `column=value` into a filter.
    pub fn parse_filter(raw: &str) -> Result<(BatchColumn, String), DashboardError> {
        let (column, value) = raw.split_once('=').ok_or_else(|| DashboardError::InvalidFilter(raw.to_string()))?;
        Ok((column.parse()?, value.trim().to_string()))
    }

    fn matches(&self, record: &BatchRecord) -> bool {
        let search = self.search.trim().to_lowercase();
        if !search.is_empty()
            && !BatchColumn::ALL
                .iter()
                .any(|column| column.display_value(record).to_lowercase().contains(&search))
        {
            return false;
        }

        self.filters
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .all(|(column, value)| column.display_value(record).to_lowercase().contains(&value.to_lowercase()))
    }
}

/// Rows of `records` that pass the query, in sorted order.
pub fn view<'a>(records: &'a [BatchRecord], query: &TableQuery) -> Vec<&'a BatchRecord> {
    let mut rows: Vec<&BatchRecord> = records.iter().filter(|record| query.matches(record)).collect();
    let SortConfig { column, direction } = query.sort;
    rows.sort_by(|a, b| direction.apply(column.compare(a, b)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::batch::ProductStatus;
    use chrono::NaiveDate;

    fn record(id: i64, batch_number: &str, hour: u32) -> BatchRecord {
        BatchRecord {
            id,
            created_at: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap().and_hms_opt(hour, 0, 0).unwrap(),
            ubi_no: format!("UBI-{}", id),
            line: "Line 2".to_string(),
            line_lead: "Jaime Perez".to_string(),
            product: "Nexus Cart".to_string(),
            packing_format: "Nexus".to_string(),
            batch_number: batch_number.to_string(),
            product_status: ProductStatus::Unfinished,
            start_time: None,
            end_time: None,
            employee_count: None,
            actual_units: 0,
            target_units: 0,
            total_time_seconds: 0,
            takt_time_seconds: 0.0,
            running_takt_seconds: 0.0,
            target_delta: 0,
            delta_percentage: 0.0,
            is_locked: false,
        }
    }

    fn ids(rows: &[&BatchRecord]) -> Vec<i64> {
        rows.iter().map(|record| record.id).collect()
    }

    #[test]
    fn search_is_case_insensitive() {
        let records = vec![record(1, "A1", 8), record(2, "B2", 9)];
        let query = TableQuery {
            search: "a1".to_string(),
            ..TableQuery::default()
        };
        assert_eq!(ids(&view(&records, &query)), vec![1]);
    }

    #[test]
    fn search_matches_formatted_values() {
        let mut late = record(1, "A1", 8);
        late.start_time = Some("13:30:00".to_string());
        let records = vec![late, record(2, "B2", 9)];

        let query = TableQuery {
            search: "01:30 pm".to_string(),
            ..TableQuery::default()
        };
        assert_eq!(ids(&view(&records, &query)), vec![1]);

        let query = TableQuery {
            search: "n/a".to_string(),
            ..TableQuery::default()
        };
        assert_eq!(ids(&view(&records, &query)), vec![2, 1]);
    }

    #[test]
    fn created_at_ties_follow_sort_direction() {
        let records = vec![record(1, "A1", 8), record(2, "B2", 8), record(3, "C3", 7)];

        let mut query = TableQuery::default();
        assert_eq!(ids(&view(&records, &query)), vec![2, 1, 3]);

        query.sort.toggle(BatchColumn::CreatedAt);
        assert_eq!(ids(&view(&records, &query)), vec![3, 1, 2]);
    }

    #[test]
    fn filters_must_all_match() {
        let mut other = record(2, "A10", 9);
        other.line = "Line 7".to_string();
        let records = vec![record(1, "A1", 8), other];

        let mut query = TableQuery::default();
        query.set_filter(BatchColumn::BatchNumber, "a1");
        assert_eq!(view(&records, &query).len(), 2);

        query.set_filter(BatchColumn::Line, "line 7");
        assert_eq!(ids(&view(&records, &query)), vec![2]);

        query.set_filter(BatchColumn::Line, "  ");
        assert_eq!(view(&records, &query).len(), 2);
    }

    #[test]
    fn toggle_flips_or_restarts_ascending() {
        let mut sort = SortConfig::default();
        sort.toggle(BatchColumn::Product);
        assert_eq!(sort.column, BatchColumn::Product);
        assert_eq!(sort.direction, SortDirection::Ascending);
        sort.toggle(BatchColumn::Product);
        assert_eq!(sort.direction, SortDirection::Descending);
    }

    #[test]
    fn numeric_columns_sort_as_text() {
        let mut small = record(1, "A1", 8);
        small.actual_units = 9;
        let mut large = record(2, "B2", 8);
        large.actual_units = 10;
        let records = vec![small, large];

        let mut query = TableQuery::default();
        query.sort.toggle(BatchColumn::ActualUnits);
        assert_eq!(ids(&view(&records, &query)), vec![2, 1]);
    }

    #[test]
    fn time_columns_sort_by_normalized_text() {
        let mut morning = record(1, "A1", 8);
        morning.start_time = Some("9:00 AM".to_string());
        let mut afternoon = record(2, "B2", 8);
        afternoon.start_time = Some("13:00:00".to_string());
        let mut late_morning = record(3, "C3", 8);
        late_morning.start_time = Some("10:30 AM".to_string());
        let records = vec![morning, afternoon, late_morning, record(4, "D4", 8)];

        let mut query = TableQuery::default();
        query.sort.toggle(BatchColumn::StartTime);
        assert_eq!(query.sort.direction, SortDirection::Ascending);
        // "01:00 PM" < "09:00 AM" < "10:30 AM" < "N/A"
        assert_eq!(ids(&view(&records, &query)), vec![2, 1, 3, 4]);

        query.sort.toggle(BatchColumn::StartTime);
        assert_eq!(ids(&view(&records, &query)), vec![4, 3, 1, 2]);
    }

    #[test]
    fn parses_columns_and_filters() {
        assert_eq!("line-lead".parse::<BatchColumn>().unwrap(), BatchColumn::LineLead);
        assert!("color".parse::<BatchColumn>().is_err());
        assert_eq!(
            TableQuery::parse_filter("product=Nexus").unwrap(),
            (BatchColumn::Product, "Nexus".to_string())
        );
        assert!(matches!(TableQuery::parse_filter("product"), Err(DashboardError::InvalidFilter(_))));
    }
}
