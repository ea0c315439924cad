//! Takt metrics for finalized batches.
//!
//! Every product has a baseline cycle time: the seconds one worker needs for
//! one unit. The crew size on the line scales that baseline through a pace
//! adjustment factor, giving the *running takt*. Dividing the batch window by
//! the running takt yields the number of units the line should have packed,
//! which is then compared with what was actually packed.
//!
//! ## Degrading instead of failing
//!
//! A record that cannot be measured (no product, no crew size, unknown
//! product, unknown pace row) never blocks the update that finalizes it.
//! The calculator returns all-zero [`Metrics`] instead, and reports why
//! through a [`DiagnosticSink`] and a `tracing` warning. Callers treat
//! [`Metrics::is_zero`] as "could not compute".
//!
//! ## Formula
//!
//! ```text
//! running_takt  = baseline_cycle_time * pace_factor
//! target_units  = round(round_significant(total_time / running_takt, 3))
//! target_delta  = actual_units - target_units
//! delta_ratio   = actual_units / target_units        (0 when target is 0)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::collections::HashMap;
//! use taktline::libs::takt::compute_metrics;
//!
//! let products = HashMap::from([("Mega Dose X Bites".to_string(), 120.0)]);
//! let pace = HashMap::from([(3_u32, 1.1)]);
//! let metrics = compute_metrics(&record, &products, &pace);
//! println!("target {} units", metrics.target_units);
//! ```

use crate::libs::batch::{BatchRecord, ProductStatus};
use crate::libs::clock;
use crate::libs::messages::Message;
use crate::msg_warning;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Pace factors above this are stored as percentages.
const PERCENT_THRESHOLD: f64 = 5.0;
/// Accepted range for a normalized pace factor.
const PACE_RANGE: (f64, f64) = (0.5, 2.0);
/// Replacement for pace factors outside [`PACE_RANGE`].
const NEUTRAL_PACE: f64 = 1.0;
/// Significant digits kept before rounding target units.
const TARGET_SIGNIFICANT_DIGITS: i32 = 3;

/// Derived analytics of a batch. All zero when they could not be computed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Metrics {
    pub total_time_seconds: i64,
    pub takt_time_seconds: f64,
    pub running_takt_seconds: f64,
    pub target_units: i64,
    pub target_delta: i64,
    pub delta_percentage: f64,
}

impl Metrics {
    pub fn is_zero(&self) -> bool {
        *self == Metrics::default()
    }
}

/// Why a batch ended up with zeroed or adjusted metrics.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricsDiagnostic {
    MissingProduct,
    MissingEmployeeCount,
    UnknownProduct(String),
    UnknownPace(u32),
    PaceOutOfRange { employee_count: u32, factor: f64 },
    ReferenceUnavailable(String),
}

impl fmt::Display for MetricsDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricsDiagnostic::MissingProduct => write!(f, "batch has no product"),
            MetricsDiagnostic::MissingEmployeeCount => write!(f, "batch has no employee count"),
            MetricsDiagnostic::UnknownProduct(product) => write!(f, "no baseline cycle time for product '{}'", product),
            MetricsDiagnostic::UnknownPace(count) => write!(f, "no pace factor for {} employees", count),
            MetricsDiagnostic::PaceOutOfRange { employee_count, factor } => {
                write!(f, "pace factor {} for {} employees is out of range, using {}", factor, employee_count, NEUTRAL_PACE)
            }
            MetricsDiagnostic::ReferenceUnavailable(reason) => write!(f, "reference data unavailable: {}", reason),
        }
    }
}

/// Receives degradation reports from the calculator.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: MetricsDiagnostic);
}

impl DiagnosticSink for Vec<MetricsDiagnostic> {
    fn report(&mut self, diagnostic: MetricsDiagnostic) {
        self.push(diagnostic);
    }
}

/// Sink for callers that only want the log line.
pub struct IgnoreDiagnostics;

impl DiagnosticSink for IgnoreDiagnostics {
    fn report(&mut self, _diagnostic: MetricsDiagnostic) {}
}

/// Product name to baseline cycle time, in seconds.
pub trait ProductLookup {
    fn baseline_cycle_time(&self, product: &str) -> Option<f64>;
}

/// Employee count to raw pace adjustment factor.
pub trait PaceLookup {
    fn pace_factor(&self, employee_count: u32) -> Option<f64>;
}

impl ProductLookup for HashMap<String, f64> {
    fn baseline_cycle_time(&self, product: &str) -> Option<f64> {
        self.get(product).copied()
    }
}

impl ProductLookup for BTreeMap<String, f64> {
    fn baseline_cycle_time(&self, product: &str) -> Option<f64> {
        self.get(product).copied()
    }
}

impl PaceLookup for HashMap<u32, f64> {
    fn pace_factor(&self, employee_count: u32) -> Option<f64> {
        self.get(&employee_count).copied()
    }
}

impl PaceLookup for BTreeMap<u32, f64> {
    fn pace_factor(&self, employee_count: u32) -> Option<f64> {
        self.get(&employee_count).copied()
    }
}

/// Computes metrics, logging any degradation.
pub fn compute_metrics(record: &BatchRecord, products: &impl ProductLookup, pace: &impl PaceLookup) -> Metrics {
    compute_metrics_with(record, products, pace, &mut IgnoreDiagnostics)
}

/// Computes metrics and reports every degradation to `sink`.
pub fn compute_metrics_with(
    record: &BatchRecord,
    products: &impl ProductLookup,
    pace: &impl PaceLookup,
    sink: &mut impl DiagnosticSink,
) -> Metrics {
    let product = record.product.trim();
    if product.is_empty() {
        return degrade(sink, MetricsDiagnostic::MissingProduct);
    }
    let employee_count = match record.employee_count {
        Some(count) if count > 0 => count,
        _ => return degrade(sink, MetricsDiagnostic::MissingEmployeeCount),
    };

    let Some(baseline) = products.baseline_cycle_time(product) else {
        return degrade(sink, MetricsDiagnostic::UnknownProduct(product.to_string()));
    };
    let Some(raw_factor) = pace.pace_factor(employee_count) else {
        return degrade(sink, MetricsDiagnostic::UnknownPace(employee_count));
    };
    let factor = normalize_pace_factor(employee_count, raw_factor, sink);

    let total_time_seconds = clock::duration_seconds(record.start_time.as_deref(), record.end_time.as_deref()).unwrap_or(0);
    let running_takt_seconds = baseline * factor;

    let target_units = if record.product_status == ProductStatus::Wip || running_takt_seconds <= 0.0 {
        0
    } else {
        round_significant(total_time_seconds as f64 / running_takt_seconds, TARGET_SIGNIFICANT_DIGITS).round() as i64
    };
    let target_delta = record.actual_units - target_units;
    let delta_percentage = if target_units > 0 {
        record.actual_units as f64 / target_units as f64
    } else {
        0.0
    };

    Metrics {
        total_time_seconds,
        takt_time_seconds: baseline,
        running_takt_seconds,
        target_units,
        target_delta,
        delta_percentage,
    }
}

/// Rounds `x` to `digits` significant digits.
pub fn round_significant(x: f64, digits: i32) -> f64 {
    if x == 0.0 || !x.is_finite() {
        return 0.0;
    }
    let magnitude = x.abs().log10().floor() as i32 + 1;
    let scale = digits - magnitude;
    // Dividing by the exact power of ten keeps integers like 12300 exact
    if scale >= 0 {
        let factor = 10_f64.powi(scale);
        (x * factor).round() / factor
    } else {
        let factor = 10_f64.powi(-scale);
        (x / factor).round() * factor
    }
}

/// Converts percentage-stored factors and replaces implausible ones.
fn normalize_pace_factor(employee_count: u32, raw: f64, sink: &mut impl DiagnosticSink) -> f64 {
    let factor = if raw > PERCENT_THRESHOLD { raw / 100.0 } else { raw };
    if factor < PACE_RANGE.0 || factor > PACE_RANGE.1 || !factor.is_finite() {
        let diagnostic = MetricsDiagnostic::PaceOutOfRange { employee_count, factor };
        msg_warning!(Message::MetricsDegraded(diagnostic.to_string()));
        sink.report(diagnostic);
        return NEUTRAL_PACE;
    }
    factor
}

fn degrade(sink: &mut impl DiagnosticSink, diagnostic: MetricsDiagnostic) -> Metrics {
    msg_warning!(Message::MetricsDegraded(diagnostic.to_string()));
    sink.report(diagnostic);
    Metrics::default()
}
