//! Final shaping of voucher buckets into the fixed ERP import layout.

use crate::model::{Bucket, OutputRow};

/// Column labels of the ERP import sheet, in writing order.
///
/// The ERP template carries five product slots per voucher plus five
/// voucher remark columns; this pipeline only ever fills slot 1 and
/// leaves the rest blank for manual entry.
pub const HEADER_LABELS: [&str; 32] = [
    "거래일자",
    "거래처명",
    "상품코드(1)",
    "상품명(1)",
    "수량(1)",
    "단가(1)",
    "상품비고(1)",
    "상품코드(2)",
    "상품명(2)",
    "수량(2)",
    "단가(2)",
    "상품비고(2)",
    "상품코드(3)",
    "상품명(3)",
    "수량(3)",
    "단가(3)",
    "상품비고(3)",
    "상품코드(4)",
    "상품명(4)",
    "수량(4)",
    "단가(4)",
    "상품비고(4)",
    "상품코드(5)",
    "상품명(5)",
    "수량(5)",
    "단가(5)",
    "상품비고(5)",
    "전표비고(1)",
    "전표비고(2)",
    "전표비고(3)",
    "전표비고(4)",
    "전표비고(5)",
];

/// Shape buckets into final output rows.
///
/// Codes that went through a float round-trip upstream lose their
/// trailing `.0`, quantities collapse to whole units, and rows sort by
/// case-folded product name. The sort is stable, so rows sharing a name
/// keep their bucket order.
pub fn format_rows(buckets: Vec<Bucket>) -> Vec<OutputRow> {
    let mut rows: Vec<OutputRow> = buckets
        .into_iter()
        .map(|bucket| OutputRow {
            date: bucket.date,
            counterparty: bucket.counterparty,
            code: strip_float_suffix(&bucket.code).to_string(),
            name: bucket.name,
            quantity: bucket.quantity.round_ties_even() as i64,
            unit_price: bucket.unit_price,
            remark: bucket.remark,
            used_fallback: bucket.used_fallback,
        })
        .collect();

    rows.sort_by_cached_key(|row| row.name.to_lowercase());
    rows
}

/// Drop a trailing `.0` left over from spreadsheet float coercion.
///
/// Only strictly numeric stems qualify; `v2.0` is a real code and must
/// survive untouched.
fn strip_float_suffix(code: &str) -> &str {
    match code.strip_suffix(".0") {
        Some(stem) if !stem.is_empty() && stem.bytes().all(|b| b.is_ascii_digit()) => stem,
        _ => code,
    }
}

/// Render one output row as the full 32-cell ERP line.
///
/// Cell order follows [`HEADER_LABELS`]; slots 2..=5 and the voucher
/// remarks stay empty.
pub fn row_cells(row: &OutputRow) -> Vec<String> {
    let mut cells = Vec::with_capacity(HEADER_LABELS.len());
    cells.push(row.date.clone());
    cells.push(row.counterparty.clone());
    cells.push(row.code.clone());
    cells.push(row.name.clone());
    cells.push(row.quantity.to_string());
    cells.push(row.unit_price.to_string());
    cells.push(row.remark.clone());
    cells.resize(HEADER_LABELS.len(), String::new());
    cells
}
