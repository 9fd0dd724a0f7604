use serde::Serialize;

use crate::config::{GroupingPolicy, ThresholdPolicy};

// ---------------------------------------------------------------------------
// Pipeline records
// ---------------------------------------------------------------------------

/// One settlement row extended with its mapping match (if any).
/// `row` is the 0-based data-row index, kept for error context and for
/// first-seen ordering during aggregation.
#[derive(Debug, Clone)]
pub struct JoinedRecord {
    pub row: usize,
    pub option_id: String,
    pub date: String,
    pub registered_name: String,
    pub quantity_raw: String,
    pub amount_raw: String,
    pub mapped_code: Option<String>,
    pub mapped_name: Option<String>,
}

/// A joined record after fallback resolution: canonical code and name are
/// settled, and the record knows whether it fell back to its own fields.
#[derive(Debug, Clone)]
pub struct ResolvedRecord {
    pub row: usize,
    pub date: String,
    pub code: String,
    pub name: String,
    pub quantity_raw: String,
    pub amount_raw: String,
    pub used_fallback: bool,
}

/// A resolved record with coerced numbers and the derived per-unit price.
/// Quantity keeps its sign; the price is always non-negative.
#[derive(Debug, Clone)]
pub struct PricedRecord {
    pub row: usize,
    pub date: String,
    pub code: String,
    pub name: String,
    pub quantity: f64,
    pub unit_price: i64,
    pub used_fallback: bool,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// One output row per distinct grouping key: summed quantity, first-seen
/// values for everything else, fallback flag OR-ed across members.
#[derive(Debug, Clone)]
pub struct Bucket {
    pub date: String,
    pub counterparty: String,
    pub code: String,
    pub name: String,
    pub quantity: f64,
    pub unit_price: i64,
    pub remark: String,
    pub used_fallback: bool,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One row of the fixed ERP import schema. Secondary slot groups and
/// voucher remarks are always empty and are materialized only at write
/// time; `used_fallback` travels with the row for the presentation layer
/// but is not a persisted column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow {
    pub date: String,
    pub counterparty: String,
    pub code: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: i64,
    pub remark: String,
    pub used_fallback: bool,
}

// ---------------------------------------------------------------------------
// Summary + Result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub main_rows: usize,
    /// Distinct mapping keys after first-occurrence dedup.
    pub mapping_entries: usize,
    pub matched_rows: usize,
    pub fallback_rows: usize,
    pub output_rows: usize,
    pub threshold_policy: ThresholdPolicy,
    pub grouping_policy: GroupingPolicy,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub profile_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConvertResult {
    pub meta: RunMeta,
    pub summary: RunSummary,
    pub rows: Vec<OutputRow>,
}
