//! Left outer join of the settlement table against the mapping table,
//! equality-only on the normalized option identifier.

use std::collections::HashMap;

use crate::columns::{MainColumns, MappingColumns};
use crate::grid::Table;
use crate::model::JoinedRecord;
use crate::normalize::normalize_key;

/// (code, name) carried from a mapping row.
pub type MapEntry = (String, String);

/// Index the mapping table by normalized option identifier.
///
/// Duplicate keys keep the first occurrence; rows whose identifier
/// normalizes to empty are not indexed (a blank key identifies nothing,
/// and trailing half-filled rows are common in shared sheets).
pub fn build_mapping_index(table: &Table, cols: MappingColumns) -> HashMap<String, MapEntry> {
    let mut index: HashMap<String, MapEntry> = HashMap::new();

    for row in 0..table.row_count() {
        let key = normalize_key(table.cell(row, cols.option_id));
        if key.is_empty() {
            continue;
        }
        index.entry(key).or_insert_with(|| {
            (
                table.cell(row, cols.code).to_string(),
                table.cell(row, cols.name).to_string(),
            )
        });
    }

    index
}

/// Join every settlement row against the index. Unmatched rows carry
/// `None` for both mapped fields.
pub fn left_join(
    main: &Table,
    cols: MainColumns,
    index: &HashMap<String, MapEntry>,
) -> Vec<JoinedRecord> {
    (0..main.row_count())
        .map(|row| {
            let option_id = main.cell(row, cols.option_id).to_string();
            let hit = index.get(&normalize_key(&option_id));
            JoinedRecord {
                row,
                option_id,
                date: main.cell(row, cols.date).to_string(),
                registered_name: main.cell(row, cols.registered_name).to_string(),
                quantity_raw: main.cell(row, cols.quantity).to_string(),
                amount_raw: main.cell(row, cols.amount).to_string(),
                mapped_code: hit.map(|(code, _)| code.clone()),
                mapped_name: hit.map(|(_, name)| name.clone()),
            }
        })
        .collect()
}
