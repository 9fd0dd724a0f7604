//! Pipeline orchestration: grids in, ERP rows out.

use crate::aggregate::aggregate;
use crate::columns::{MainColumns, MappingColumns};
use crate::config::ConvertProfile;
use crate::error::EngineError;
use crate::fallback::resolve_fallback;
use crate::grid::{detect_header_row, Grid, Table};
use crate::join::{build_mapping_index, left_join};
use crate::model::{ConvertResult, PricedRecord, RunMeta, RunSummary};
use crate::normalize::to_number;
use crate::output::format_rows;
use crate::price::unit_price;

/// Run the full conversion per profile. Returns output rows + summary.
///
/// The pipeline is strictly linear; the first failing stage aborts the
/// run and nothing is emitted.
pub fn run(
    profile: &ConvertProfile,
    main_grid: &Grid,
    mapping_grid: &Grid,
) -> Result<ConvertResult, EngineError> {
    // Locate headers and bind both tables
    let main_table = bind_table(main_grid, &profile.main_keywords.header_keywords(), profile);
    let mapping_table = bind_table(
        mapping_grid,
        &profile.mapping_keywords.header_keywords(),
        profile,
    );

    if main_table.row_count() == 0 {
        return Err(EngineError::EmptySheet {
            table: "settlement".into(),
        });
    }
    if mapping_table.row_count() == 0 {
        return Err(EngineError::EmptySheet {
            table: "mapping".into(),
        });
    }

    let main_cols = MainColumns::resolve(&main_table, &profile.main_keywords)?;
    let mapping_cols = MappingColumns::resolve(&mapping_table, &profile.mapping_keywords)?;

    // Join settlement lines against the mapping index
    let index = build_mapping_index(&mapping_table, mapping_cols);
    let mapping_entries = index.len();
    let joined = left_join(&main_table, main_cols, &index);

    let main_rows = joined.len();
    let matched_rows = joined.iter().filter(|j| j.mapped_name.is_some()).count();

    // Resolve fallbacks, coerce numerics, derive unit prices
    let mut priced: Vec<PricedRecord> = Vec::with_capacity(joined.len());
    let mut fallback_rows = 0;
    for rec in joined {
        let resolved = resolve_fallback(rec);
        if resolved.used_fallback {
            fallback_rows += 1;
        }

        let quantity = to_number(&resolved.quantity_raw).ok_or_else(|| EngineError::NumericParse {
            table: "settlement".into(),
            field: "quantity".into(),
            row: resolved.row,
            value: resolved.quantity_raw.clone(),
        })?;
        let amount = to_number(&resolved.amount_raw).ok_or_else(|| EngineError::NumericParse {
            table: "settlement".into(),
            field: "amount".into(),
            row: resolved.row,
            value: resolved.amount_raw.clone(),
        })?;

        priced.push(PricedRecord {
            row: resolved.row,
            date: resolved.date,
            code: resolved.code,
            name: resolved.name,
            quantity,
            unit_price: unit_price(amount, quantity, profile.threshold_policy),
            used_fallback: resolved.used_fallback,
        });
    }

    let buckets = aggregate(&priced, profile.grouping_policy, &profile.counterparty);
    let rows = format_rows(buckets);

    Ok(ConvertResult {
        meta: RunMeta {
            profile_name: profile.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary: RunSummary {
            main_rows,
            mapping_entries,
            matched_rows,
            fallback_rows,
            output_rows: rows.len(),
            threshold_policy: profile.threshold_policy,
            grouping_policy: profile.grouping_policy,
        },
        rows,
    })
}

fn bind_table(grid: &Grid, keywords: &[String], profile: &ConvertProfile) -> Table {
    let header = detect_header_row(grid, keywords, profile.search_rows);
    Table::from_grid(grid, header)
}
