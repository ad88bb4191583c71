//! Employee name search across all months

use crate::types::{canonical_text, MonthData};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What an empty (or whitespace-only) query returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EmptyQuery {
    /// No results until the user types something
    #[default]
    MatchNone,
    /// Every distinct name
    MatchAll,
}

/// Sorted, distinct canonical names containing `query`, case-insensitively
pub fn search_names(data: &MonthData, query: &str, empty: EmptyQuery) -> Vec<String> {
    let needle = canonical_text(query);
    if needle.is_empty() && empty == EmptyQuery::MatchNone {
        return Vec::new();
    }

    let mut names = BTreeSet::new();
    for table in data.iter().filter(|t| t.has_name_column()) {
        for record in &table.records {
            let value = record.get(&table.name_column);
            if value.is_empty() {
                continue;
            }
            let name = value.canonical();
            if name.contains(&needle) {
                names.insert(name);
            }
        }
    }

    names.into_iter().collect()
}
