use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::normalize::normalize_key;

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Conversion profile: keyword sets for the two source tables plus policy
/// switches. The default profile is the Coupang jet-delivery settlement
/// layout; a TOML file may override any subset of fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConvertProfile {
    pub name: String,
    /// Counterparty label stamped on every output row.
    pub counterparty: String,
    /// How many leading rows to scan for the header row.
    pub search_rows: usize,
    pub threshold_policy: ThresholdPolicy,
    pub grouping_policy: GroupingPolicy,
    pub main_keywords: MainKeywords,
    pub mapping_keywords: MappingKeywords,
}

impl Default for ConvertProfile {
    fn default() -> Self {
        Self {
            name: "coupang-jet".into(),
            counterparty: "쿠팡-제트배송".into(),
            search_rows: 50,
            threshold_policy: ThresholdPolicy::default(),
            grouping_policy: GroupingPolicy::default(),
            main_keywords: MainKeywords::default(),
            mapping_keywords: MappingKeywords::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

/// Which quantities trigger per-unit division in the price step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdPolicy {
    /// Divide when |quantity| > 1. Refund lines with quantity -3 still get
    /// a per-unit price.
    AbsoluteThreshold,
    /// Divide only when quantity > 1. Negative quantities keep the full
    /// line amount as price.
    SignedThreshold,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self::AbsoluteThreshold
    }
}

impl std::fmt::Display for ThresholdPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AbsoluteThreshold => write!(f, "absolute_threshold"),
            Self::SignedThreshold => write!(f, "signed_threshold"),
        }
    }
}

/// Grouping key for the aggregation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingPolicy {
    /// Group by (code, unit price, quantity sign). Sales and refunds of the
    /// same item stay on separate rows instead of netting.
    CodePriceSign,
    /// Group by (date, code, name, unit price). Coarser; merges
    /// opposite-sign quantities into one row.
    DateNamePrice,
}

impl Default for GroupingPolicy {
    fn default() -> Self {
        Self::CodePriceSign
    }
}

impl std::fmt::Display for GroupingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CodePriceSign => write!(f, "code_price_sign"),
            Self::DateNamePrice => write!(f, "date_name_price"),
        }
    }
}

// ---------------------------------------------------------------------------
// Keyword sets
// ---------------------------------------------------------------------------

/// Per-field keyword lists for the settlement table. Each list is tried in
/// order; the first keyword found as a substring of a column label wins.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MainKeywords {
    pub option_id: Vec<String>,
    pub date: Vec<String>,
    pub quantity: Vec<String>,
    pub amount: Vec<String>,
    pub registered_name: Vec<String>,
}

impl Default for MainKeywords {
    fn default() -> Self {
        Self {
            option_id: kws(&["옵션id", "optionid"]),
            date: kws(&["매출인식일"]),
            quantity: kws(&["판매수량", "수량"]),
            amount: kws(&["정산대상액", "정산 대상액"]),
            registered_name: kws(&["등록상품명"]),
        }
    }
}

impl MainKeywords {
    /// Union of all field keywords, used for header-row detection.
    pub fn header_keywords(&self) -> Vec<String> {
        let mut all = Vec::new();
        all.extend_from_slice(&self.option_id);
        all.extend_from_slice(&self.date);
        all.extend_from_slice(&self.quantity);
        all.extend_from_slice(&self.amount);
        all.extend_from_slice(&self.registered_name);
        all
    }
}

/// Per-field keyword lists for the product-mapping table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MappingKeywords {
    pub option_id: Vec<String>,
    pub code: Vec<String>,
    pub name: Vec<String>,
}

impl Default for MappingKeywords {
    fn default() -> Self {
        Self {
            option_id: kws(&["옵션id", "optionid"]),
            code: kws(&["코드", "상품코드"]),
            name: kws(&["윈윈상품명", "윈윈 상품명"]),
        }
    }
}

impl MappingKeywords {
    pub fn header_keywords(&self) -> Vec<String> {
        let mut all = Vec::new();
        all.extend_from_slice(&self.option_id);
        all.extend_from_slice(&self.code);
        all.extend_from_slice(&self.name);
        all
    }
}

fn kws(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ConvertProfile {
    pub fn from_toml(input: &str) -> Result<Self, EngineError> {
        let profile: ConvertProfile =
            toml::from_str(input).map_err(|e| EngineError::ProfileParse(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.name.trim().is_empty() {
            return Err(EngineError::ProfileValidation("name must not be empty".into()));
        }
        if self.counterparty.trim().is_empty() {
            return Err(EngineError::ProfileValidation(
                "counterparty must not be empty".into(),
            ));
        }
        if self.search_rows == 0 {
            return Err(EngineError::ProfileValidation(
                "search_rows must be at least 1".into(),
            ));
        }

        let keyword_lists: [(&str, &[String]); 8] = [
            ("main_keywords.option_id", &self.main_keywords.option_id),
            ("main_keywords.date", &self.main_keywords.date),
            ("main_keywords.quantity", &self.main_keywords.quantity),
            ("main_keywords.amount", &self.main_keywords.amount),
            ("main_keywords.registered_name", &self.main_keywords.registered_name),
            ("mapping_keywords.option_id", &self.mapping_keywords.option_id),
            ("mapping_keywords.code", &self.mapping_keywords.code),
            ("mapping_keywords.name", &self.mapping_keywords.name),
        ];
        for (field, list) in keyword_lists {
            if !list.iter().any(|k| !normalize_key(k).is_empty()) {
                return Err(EngineError::ProfileValidation(format!(
                    "{field} needs at least one non-blank keyword"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
