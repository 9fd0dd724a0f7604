//! Grouping of priced settlement lines into ERP voucher buckets.

use std::collections::HashMap;

use crate::config::GroupingPolicy;
use crate::model::{Bucket, PricedRecord};

/// Bucket identity under the active grouping policy.
///
/// `CodePriceSign` keys on product code, unit price and the sign of the
/// quantity, so sales and refunds of the same product stay on separate
/// voucher lines. `DateNamePrice` additionally splits by settlement
/// date and product name, which merges opposite signs per day.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    CodePriceSign(String, i64, bool),
    DateNamePrice(String, String, String, i64),
}

impl GroupKey {
    fn for_record(rec: &PricedRecord, policy: GroupingPolicy) -> GroupKey {
        match policy {
            GroupingPolicy::CodePriceSign => {
                GroupKey::CodePriceSign(rec.code.clone(), rec.unit_price, rec.quantity < 0.0)
            }
            GroupingPolicy::DateNamePrice => GroupKey::DateNamePrice(
                rec.date.clone(),
                rec.code.clone(),
                rec.name.clone(),
                rec.unit_price,
            ),
        }
    }
}

/// Fold priced records into buckets, preserving first-seen order.
///
/// Quantities sum; every other field keeps the value of the first
/// record that opened the bucket. The fallback flag is OR-ed so one
/// unmapped line marks the whole bucket for review.
pub fn aggregate(
    records: &[PricedRecord],
    policy: GroupingPolicy,
    counterparty: &str,
) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for rec in records {
        let key = GroupKey::for_record(rec, policy);
        match index.get(&key) {
            Some(&at) => {
                let bucket = &mut buckets[at];
                bucket.quantity += rec.quantity;
                bucket.used_fallback |= rec.used_fallback;
            }
            None => {
                index.insert(key, buckets.len());
                buckets.push(Bucket {
                    date: rec.date.clone(),
                    counterparty: counterparty.to_string(),
                    code: rec.code.clone(),
                    name: rec.name.clone(),
                    quantity: rec.quantity,
                    unit_price: rec.unit_price,
                    remark: String::new(),
                    used_fallback: rec.used_fallback,
                });
            }
        }
    }

    buckets
}
