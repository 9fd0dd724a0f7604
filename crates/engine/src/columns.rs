//! Keyword-based column resolution.
//!
//! Source exports never agree on exact labels ("판매수량" vs "수량(개)"),
//! so each semantic field carries an ordered keyword list and binds to the
//! first column whose normalized label contains one. Binding happens once
//! per table; downstream stages access cells by plain index.

use crate::config::{MainKeywords, MappingKeywords};
use crate::error::EngineError;
use crate::grid::Table;
use crate::normalize::normalize_key;

/// Resolve one semantic field against a table's labels.
///
/// Keywords are tried in the order given, so a primary spelling can shadow
/// an alternate one. Within a keyword, the leftmost matching column wins.
pub fn resolve_column(
    table: &Table,
    table_name: &str,
    field: &str,
    keywords: &[String],
) -> Result<usize, EngineError> {
    let labels: Vec<String> = table.labels.iter().map(|l| normalize_key(l)).collect();

    for keyword in keywords {
        let target = normalize_key(keyword);
        if target.is_empty() {
            continue;
        }
        if let Some(idx) = labels.iter().position(|l| l.contains(target.as_str())) {
            return Ok(idx);
        }
    }

    Err(EngineError::ColumnNotFound {
        table: table_name.into(),
        field: field.into(),
        keywords: keywords.to_vec(),
        available: table.labels.clone(),
    })
}

/// Column indexes for the settlement table, bound once up front.
#[derive(Debug, Clone, Copy)]
pub struct MainColumns {
    pub option_id: usize,
    pub date: usize,
    pub quantity: usize,
    pub amount: usize,
    pub registered_name: usize,
}

impl MainColumns {
    pub fn resolve(table: &Table, keywords: &MainKeywords) -> Result<Self, EngineError> {
        Ok(Self {
            option_id: resolve_column(table, "settlement", "option_id", &keywords.option_id)?,
            date: resolve_column(table, "settlement", "date", &keywords.date)?,
            quantity: resolve_column(table, "settlement", "quantity", &keywords.quantity)?,
            amount: resolve_column(table, "settlement", "amount", &keywords.amount)?,
            registered_name: resolve_column(
                table,
                "settlement",
                "registered_name",
                &keywords.registered_name,
            )?,
        })
    }
}

/// Column indexes for the product-mapping table.
#[derive(Debug, Clone, Copy)]
pub struct MappingColumns {
    pub option_id: usize,
    pub code: usize,
    pub name: usize,
}

impl MappingColumns {
    pub fn resolve(table: &Table, keywords: &MappingKeywords) -> Result<Self, EngineError> {
        Ok(Self {
            option_id: resolve_column(table, "mapping", "option_id", &keywords.option_id)?,
            code: resolve_column(table, "mapping", "code", &keywords.code)?,
            name: resolve_column(table, "mapping", "name", &keywords.name)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    fn table(labels: &[&str]) -> Table {
        let grid = Grid::new(vec![labels.iter().map(|l| l.to_string()).collect()]);
        Table::from_grid(&grid, 0)
    }

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn resolves_case_and_whitespace_insensitively() {
        let t = table(&["상품 옵션 ID", "금액"]);
        let idx = resolve_column(&t, "settlement", "option_id", &kw(&["옵션id"])).unwrap();
        assert_eq!(idx, 0);
    }

    #[test]
    fn keyword_order_beats_column_order() {
        // "수량" alone would hit 취소수량 first; the primary keyword
        // 판매수량 must win even though its column comes later.
        let t = table(&["취소수량", "판매수량"]);
        let idx =
            resolve_column(&t, "settlement", "quantity", &kw(&["판매수량", "수량"])).unwrap();
        assert_eq!(idx, 1);
    }

    #[test]
    fn falls_through_to_alternate_keyword() {
        let t = table(&["일자", "수량(개)"]);
        let idx =
            resolve_column(&t, "settlement", "quantity", &kw(&["판매수량", "수량"])).unwrap();
        assert_eq!(idx, 1);
    }

    #[test]
    fn missing_field_reports_keywords_and_labels() {
        let t = table(&["옵션ID", "상품명"]);
        let err = resolve_column(&t, "mapping", "code", &kw(&["코드", "상품코드"])).unwrap_err();
        match err {
            EngineError::ColumnNotFound { table, field, keywords, available } => {
                assert_eq!(table, "mapping");
                assert_eq!(field, "code");
                assert_eq!(keywords, vec!["코드", "상품코드"]);
                assert_eq!(available, vec!["옵션ID", "상품명"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn binds_all_settlement_fields() {
        let t = table(&["옵션ID", "매출인식일", "판매수량", "정산대상액", "등록상품명"]);
        let cols = MainColumns::resolve(&t, &MainKeywords::default()).unwrap();
        assert_eq!(cols.option_id, 0);
        assert_eq!(cols.date, 1);
        assert_eq!(cols.quantity, 2);
        assert_eq!(cols.amount, 3);
        assert_eq!(cols.registered_name, 4);
    }

    #[test]
    fn binds_mapping_fields_with_alternate_spellings() {
        let t = table(&["optionID", "상품코드", "윈윈 상품명"]);
        let cols = MappingColumns::resolve(&t, &MappingKeywords::default()).unwrap();
        assert_eq!(cols.option_id, 0);
        assert_eq!(cols.code, 1);
        assert_eq!(cols.name, 2);
    }
}
