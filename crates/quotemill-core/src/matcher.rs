use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fuzzy::partial_ratio;
use crate::master::MasterRecord;
use crate::table::LineItem;

/// Sentinel rendered for fields of an unmatched row.
pub const NOT_AVAILABLE: &str = "N/A";

/// The tuple that joins line items to master records.
///
/// Both sides are normalized (trim + lowercase) at construction, so equality
/// on the key is the case-insensitive comparison the join requires.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeKey {
    pub req_ref: String,
    pub project: String,
    pub site: String,
    pub env: String,
    pub kind: String,
}

impl CompositeKey {
    #[must_use]
    pub fn of_item(item: &LineItem) -> Self {
        Self {
            req_ref: normalize(&item.req_ref),
            project: normalize(&item.project),
            site: normalize(&item.site),
            env: normalize(&item.env),
            kind: normalize(&item.kind),
        }
    }

    #[must_use]
    pub fn of_record(record: &MasterRecord) -> Self {
        Self {
            req_ref: normalize(&record.req_ref),
            project: normalize(&record.project),
            site: normalize(&record.site),
            env: normalize(&record.env),
            kind: normalize(&record.kind),
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// A line item annotated with the master record it resolved to.
///
/// `None` cost fields render as the [`NOT_AVAILABLE`] sentinel; an unmatched
/// row carries a score of 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedItem {
    pub item: LineItem,
    pub unit_cost: Option<Decimal>,
    pub total_cost: Option<Decimal>,
    pub quote_reference: Option<String>,
    pub match_score: f64,
}

impl MatchedItem {
    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.unit_cost.is_some()
    }

    fn unmatched(item: &LineItem) -> Self {
        Self {
            item: item.clone(),
            unit_cost: None,
            total_cost: None,
            quote_reference: None,
            match_score: 0.0,
        }
    }
}

/// Match every line item against the master dataset.
///
/// Exactly one [`MatchedItem`] comes out per line item. Candidates are
/// filtered by composite-key equality; the single best fuzzy score between
/// the item text and each candidate's description decides among multiple
/// key hits, with equal scores resolving to the earliest candidate in sheet
/// order. An empty candidate set degrades to an unmatched row rather than
/// an error.
pub fn match_items(items: &[LineItem], master: &[MasterRecord]) -> Vec<MatchedItem> {
    items.iter().map(|item| match_one(item, master)).collect()
}

fn match_one(item: &LineItem, master: &[MasterRecord]) -> MatchedItem {
    let key = CompositeKey::of_item(item);
    let needle = normalize(&item.items);

    let mut best: Option<(&MasterRecord, f64)> = None;
    for record in master {
        if CompositeKey::of_record(record) != key {
            continue;
        }

        let score = partial_ratio(&needle, &normalize(&record.description));
        let beats_current = best.map_or(true, |(_, current)| score > current);
        if beats_current {
            best = Some((record, score));
        }
    }

    match best {
        Some((record, score)) => MatchedItem {
            item: item.clone(),
            unit_cost: Some(record.unit_cost),
            total_cost: Some(record.total_cost),
            quote_reference: Some(record.quote_reference.clone()),
            match_score: score,
        },
        None => {
            tracing::debug!(
                req_ref = %item.req_ref,
                project = %item.project,
                "no master record for composite key"
            );
            MatchedItem::unmatched(item)
        }
    }
}
