//! Batch records and the forms that create and update them.
//!
//! A [`BatchRecord`] is one tracked production run on a line. It is created
//! from a [`NewBatch`] form as `Unfinished` with zeroed metrics, finalized
//! exactly once by an update that carries the computed metrics and locks the
//! record ([`BatchPatch`]), and may only be deleted while still unlocked.

use crate::libs::clock::{self, MIN_BATCH_MINUTES};
use crate::libs::error::DashboardError;
use crate::libs::session::Session;
use crate::libs::takt::Metrics;
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Packing formats offered on the batch form.
pub const PACKING_FORMATS: [&str; 8] = [
    "Table Top - Parastaltic",
    "Table Top - Tablet Counter",
    "Table Top - Scale",
    "Table Top - Briq",
    "Table Top - Disposable",
    "Xylem - 510 Vape",
    "Nexus",
    "Table Top",
];

/// Largest crew the update form offers.
pub const MAX_EMPLOYEE_COUNT: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProductStatus {
    #[default]
    Unfinished,
    #[serde(rename = "Finished Goods")]
    FinishedGoods,
    #[serde(rename = "Machine Down")]
    MachineDown,
    #[serde(rename = "WIP")]
    Wip,
}

impl ProductStatus {
    /// Statuses an operator may pick when finalizing a batch.
    pub const SELECTABLE: [ProductStatus; 3] = [ProductStatus::FinishedGoods, ProductStatus::MachineDown, ProductStatus::Wip];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Unfinished => "Unfinished",
            ProductStatus::FinishedGoods => "Finished Goods",
            ProductStatus::MachineDown => "Machine Down",
            ProductStatus::Wip => "WIP",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', '_'], " ");
        match wanted.as_str() {
            "unfinished" => Ok(ProductStatus::Unfinished),
            "finished goods" | "finished" => Ok(ProductStatus::FinishedGoods),
            "machine down" | "down" => Ok(ProductStatus::MachineDown),
            "wip" => Ok(ProductStatus::Wip),
            _ => Err(DashboardError::InvalidStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub id: i64,
    #[serde(with = "created_at_format")]
    pub created_at: NaiveDateTime,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ubi_no: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub line: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub line_lead: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub packing_format: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub batch_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_status: ProductStatus,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub employee_count: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub actual_units: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub target_units: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_time_seconds: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub takt_time_seconds: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub running_takt_seconds: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub target_delta: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub delta_percentage: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_locked: bool,
}

impl BatchRecord {
    /// Metrics currently stored on the record.
    pub fn metrics(&self) -> Metrics {
        Metrics {
            total_time_seconds: self.total_time_seconds,
            takt_time_seconds: self.takt_time_seconds,
            running_takt_seconds: self.running_takt_seconds,
            target_units: self.target_units,
            target_delta: self.target_delta,
            delta_percentage: self.delta_percentage,
        }
    }

    /// The record as it would look with `update` applied, metrics untouched.
    pub fn merged(&self, update: &BatchUpdate) -> BatchRecord {
        let mut merged = self.clone();
        if let Some(product) = &update.product {
            merged.product = product.clone();
        }
        if let Some(status) = update.product_status {
            merged.product_status = status;
        }
        if let Some(start) = &update.start_time {
            merged.start_time = non_empty(start);
        }
        if let Some(end) = &update.end_time {
            merged.end_time = non_empty(end);
        }
        if let Some(count) = update.employee_count {
            merged.employee_count = Some(count);
        }
        if let Some(actual) = update.actual_units {
            merged.actual_units = actual;
        }
        merged
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Operator input from the batch details form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchForm {
    pub ubi_no: String,
    pub batch_number: String,
    pub product: String,
    pub packing_format: String,
}

/// A batch ready to be created in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBatch {
    pub ubi_no: String,
    pub line: String,
    pub line_lead: String,
    pub product: String,
    pub packing_format: String,
    pub batch_number: String,
    pub product_status: ProductStatus,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub employee_count: Option<u32>,
    pub actual_units: i64,
    pub target_units: i64,
}

impl NewBatch {
    /// Validates the form and stamps it with the operator's line and line lead.
    pub fn from_form(session: &Session, form: &BatchForm) -> Result<Self, DashboardError> {
        let required = [
            ("UBI No.", &form.ubi_no),
            ("Batch Number", &form.batch_number),
            ("Product", &form.product),
            ("Packing Format", &form.packing_format),
        ];
        let missing: Vec<&str> = required.iter().filter(|(_, value)| value.trim().is_empty()).map(|(label, _)| *label).collect();
        if !missing.is_empty() {
            return Err(DashboardError::MissingFields(missing.join(", ")));
        }

        let packing_format = form.packing_format.trim();
        if !PACKING_FORMATS.contains(&packing_format) {
            return Err(DashboardError::InvalidPackingFormat(packing_format.to_string()));
        }

        Ok(Self {
            ubi_no: form.ubi_no.trim().to_string(),
            line: session.line.clone(),
            line_lead: session.line_lead.clone(),
            product: form.product.trim().to_string(),
            packing_format: packing_format.to_string(),
            batch_number: form.batch_number.trim().to_string(),
            product_status: ProductStatus::Unfinished,
            start_time: None,
            end_time: None,
            employee_count: None,
            actual_units: 0,
            target_units: 0,
        })
    }
}

/// Changes an operator submits for an existing batch.
///
/// Absent fields keep the record's current value. An empty time string
/// clears the time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchUpdate {
    pub product: Option<String>,
    pub product_status: Option<ProductStatus>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub employee_count: Option<u32>,
    pub actual_units: Option<i64>,
}

impl BatchUpdate {
    /// Rejects input the store should never see.
    pub fn validate(&self) -> Result<(), DashboardError> {
        for time in [&self.start_time, &self.end_time].into_iter().flatten() {
            if !time.trim().is_empty() && clock::parse_clock_time(time).is_none() {
                return Err(DashboardError::InvalidTime(time.clone()));
            }
        }
        if let Some(product) = &self.product {
            if product.trim().is_empty() {
                return Err(DashboardError::MissingFields("Product".to_string()));
            }
        }
        if self.employee_count == Some(0) {
            return Err(DashboardError::InvalidEmployeeCount(0));
        }
        if let Some(actual) = self.actual_units {
            if actual < 0 {
                return Err(DashboardError::NegativeUnits(actual));
            }
        }
        Ok(())
    }

    /// Checks the batch window of a record after the update was merged.
    pub fn validate_window(record: &BatchRecord) -> Result<(), DashboardError> {
        if let (Some(start), Some(end)) = (&record.start_time, &record.end_time) {
            let minutes = clock::minutes_between(start, end).ok_or_else(|| DashboardError::InvalidTime(end.clone()))?;
            if minutes < MIN_BATCH_MINUTES {
                return Err(DashboardError::InvalidTimeWindow {
                    start: clock::normalize_time_format(start),
                    end: clock::normalize_time_format(end),
                });
            }
        }
        Ok(())
    }
}

/// Final state of a batch as sent to the store on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPatch {
    pub product: String,
    pub product_status: ProductStatus,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub employee_count: Option<u32>,
    pub actual_units: i64,
    pub target_units: i64,
    pub total_time_seconds: i64,
    pub takt_time_seconds: f64,
    pub running_takt_seconds: f64,
    pub target_delta: i64,
    pub delta_percentage: f64,
    pub is_locked: bool,
}

impl BatchPatch {
    /// Builds the locking patch for a merged record and its computed metrics.
    pub fn finalize(record: &BatchRecord, metrics: &Metrics) -> Self {
        Self {
            product: record.product.clone(),
            product_status: record.product_status,
            start_time: record.start_time.clone(),
            end_time: record.end_time.clone(),
            employee_count: record.employee_count,
            actual_units: record.actual_units,
            target_units: metrics.target_units,
            total_time_seconds: metrics.total_time_seconds,
            takt_time_seconds: metrics.takt_time_seconds,
            running_takt_seconds: metrics.running_takt_seconds,
            target_delta: metrics.target_delta,
            delta_percentage: metrics.delta_percentage,
            is_locked: true,
        }
    }
}

/// One page of batches as reported by a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchPage {
    #[serde(rename = "data")]
    pub records: Vec<BatchRecord>,
    #[serde(rename = "totalRows", default, deserialize_with = "null_as_default")]
    pub total_rows: u64,
}

/// Remote stores send `null` for columns that were never filled in.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Timestamps arrive as SQLite local datetimes or as RFC 3339 strings from
/// remote stores; both are kept as local naive datetimes.
pub mod created_at_format {
    use chrono::{DateTime, Local, NaiveDateTime};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn parse(value: &str) -> Option<NaiveDateTime> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
            return Some(parsed.with_timezone(&Local).naive_local());
        }
        NaiveDateTime::parse_from_str(value, FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
            .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
    }

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("unrecognized timestamp: {}", raw)))
    }
}
