//! Page position over a store-paginated batch list.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Page sizes the grid offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(try_from = "u32", into = "u32")]
pub enum RowsPerPage {
    #[default]
    Ten,
    Fifty,
    Hundred,
    TwoHundredFifty,
    FiveHundred,
    Thousand,
}

impl RowsPerPage {
    pub const ALL: [RowsPerPage; 6] = [
        RowsPerPage::Ten,
        RowsPerPage::Fifty,
        RowsPerPage::Hundred,
        RowsPerPage::TwoHundredFifty,
        RowsPerPage::FiveHundred,
        RowsPerPage::Thousand,
    ];

    pub fn get(&self) -> u32 {
        match self {
            RowsPerPage::Ten => 10,
            RowsPerPage::Fifty => 50,
            RowsPerPage::Hundred => 100,
            RowsPerPage::TwoHundredFifty => 250,
            RowsPerPage::FiveHundred => 500,
            RowsPerPage::Thousand => 1000,
        }
    }
}

impl TryFrom<u32> for RowsPerPage {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        RowsPerPage::ALL
            .into_iter()
            .find(|rows| rows.get() == value)
            .ok_or_else(|| format!("rows per page must be one of 10, 50, 100, 250, 500, 1000, got {}", value))
    }
}

impl From<RowsPerPage> for u32 {
    fn from(rows: RowsPerPage) -> Self {
        rows.get()
    }
}

impl FromStr for RowsPerPage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s.trim().parse().map_err(|_| format!("not a page size: {}", s))?;
        RowsPerPage::try_from(value)
    }
}

impl fmt::Display for RowsPerPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    current_page: u32,
    rows_per_page: RowsPerPage,
    total_rows: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(RowsPerPage::default())
    }
}

impl Pagination {
    pub fn new(rows_per_page: RowsPerPage) -> Self {
        Self {
            current_page: 1,
            rows_per_page,
            total_rows: 0,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn rows_per_page(&self) -> RowsPerPage {
        self.rows_per_page
    }

    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    /// Updates the row count reported by the store.
    ///
    /// The current page is left alone even if it now lies past the end; the
    /// next navigation brings it back in range.
    pub fn set_total_rows(&mut self, total_rows: u64) {
        self.total_rows = total_rows;
    }

    /// At least one page, even when the store is empty.
    pub fn total_pages(&self) -> u32 {
        let rows = u64::from(self.rows_per_page.get());
        let pages = self.total_rows.div_ceil(rows).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Moves to `page` when it exists. Returns whether the page changed.
    pub fn go_to_page(&mut self, page: u32) -> bool {
        if page < 1 || page > self.total_pages() || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    /// Applies a page-jump input box value.
    ///
    /// Returns the page number the box should show afterwards: the new page
    /// on success, the current page when the input was not a number or out
    /// of range.
    pub fn jump(&mut self, input: &str) -> u32 {
        if let Ok(page) = input.trim().parse::<u32>() {
            self.go_to_page(page);
        }
        self.current_page
    }

    pub fn set_rows_per_page(&mut self, rows_per_page: RowsPerPage) {
        self.rows_per_page = rows_per_page;
        self.current_page = 1;
    }

    pub fn first(&mut self) -> bool {
        self.go_to_page(1)
    }

    pub fn previous(&mut self) -> bool {
        self.has_previous() && self.go_to_page(self.current_page - 1)
    }

    pub fn next(&mut self) -> bool {
        self.has_next() && self.go_to_page(self.current_page + 1)
    }

    pub fn last(&mut self) -> bool {
        self.go_to_page(self.total_pages())
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Index of the first row of the current page.
    pub fn offset(&self) -> u64 {
        u64::from(self.current_page - 1) * u64::from(self.rows_per_page.get())
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paged(total_rows: u64, rows: RowsPerPage) -> Pagination {
        let mut pagination = Pagination::new(rows);
        pagination.set_total_rows(total_rows);
        pagination
    }

    #[test]
    fn counts_partial_last_page() {
        let mut pagination = paged(251, RowsPerPage::TwoHundredFifty);
        assert_eq!(pagination.total_pages(), 2);
        assert!(!pagination.go_to_page(3));
        assert_eq!(pagination.current_page(), 1);
        assert!(pagination.go_to_page(2));
        assert_eq!(pagination.offset(), 250);
    }

    #[test]
    fn empty_store_still_has_one_page() {
        let mut pagination = paged(0, RowsPerPage::Ten);
        assert_eq!(pagination.total_pages(), 1);
        assert!(!pagination.next());
        assert!(!pagination.go_to_page(0));
    }

    #[test]
    fn jump_reverts_on_bad_input() {
        let mut pagination = paged(95, RowsPerPage::Ten);
        assert_eq!(pagination.jump(" 4 "), 4);
        assert_eq!(pagination.jump("four"), 4);
        assert_eq!(pagination.jump("11"), 4);
        assert_eq!(pagination.jump("10"), 10);
    }

    #[test]
    fn page_size_change_resets_to_first_page() {
        let mut pagination = paged(1000, RowsPerPage::Ten);
        assert!(pagination.last());
        assert_eq!(pagination.current_page(), 100);
        pagination.set_rows_per_page(RowsPerPage::Hundred);
        assert_eq!(pagination.current_page(), 1);
        assert_eq!(pagination.total_pages(), 10);
    }

    #[test]
    fn steps_between_neighbours() {
        let mut pagination = paged(30, RowsPerPage::Ten);
        assert!(!pagination.previous());
        assert!(pagination.next());
        assert!(pagination.next());
        assert!(!pagination.next());
        assert!(pagination.previous());
        assert_eq!(pagination.current_page(), 2);
        assert!(pagination.first());
        assert_eq!(pagination.current_page(), 1);
    }

    #[test]
    fn rows_per_page_accepts_offered_sizes_only() {
        assert_eq!("250".parse::<RowsPerPage>().unwrap(), RowsPerPage::TwoHundredFifty);
        assert!("25".parse::<RowsPerPage>().is_err());
        assert_eq!(serde_json::to_string(&RowsPerPage::Fifty).unwrap(), "50");
        assert!(serde_json::from_str::<RowsPerPage>("7").is_err());
    }
}
