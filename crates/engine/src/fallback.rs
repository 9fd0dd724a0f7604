//! Substitution of raw settlement fields where the mapping table gave
//! no usable product name.

use crate::model::{JoinedRecord, ResolvedRecord};

/// Pick the output code and name for one joined row.
///
/// A row falls back when the join found nothing or when the mapped name
/// is blank after trimming. Fallback rows reuse the raw option
/// identifier as the code and the seller-registered name as the name,
/// and are flagged so downstream stages can mark them for review.
pub fn resolve_fallback(rec: JoinedRecord) -> ResolvedRecord {
    match (rec.mapped_code, rec.mapped_name) {
        (Some(code), Some(name)) if !name.trim().is_empty() => ResolvedRecord {
            row: rec.row,
            date: rec.date,
            code,
            name,
            quantity_raw: rec.quantity_raw,
            amount_raw: rec.amount_raw,
            used_fallback: false,
        },
        _ => ResolvedRecord {
            row: rec.row,
            date: rec.date,
            code: rec.option_id,
            name: rec.registered_name,
            quantity_raw: rec.quantity_raw,
            amount_raw: rec.amount_raw,
            used_fallback: true,
        },
    }
}
