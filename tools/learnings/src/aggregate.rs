use crate::categorize::Category;
use crate::record::SessionRecord;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregation {
    // Total, disjoint partition in taxonomy order; buckets may be empty.
    pub buckets: Vec<(Category, Vec<SessionRecord>)>,
    pub learnings: Vec<String>,
    pub namespace_counts: Vec<(String, usize)>,
    pub total_sessions: usize,
}

impl Aggregation {
    pub fn non_empty_categories(&self) -> usize {
        self.buckets
            .iter()
            .filter(|(_, records)| !records.is_empty())
            .count()
    }
}

pub fn aggregate(records: Vec<SessionRecord>) -> Aggregation {
    let total_sessions = records.len();
    let mut buckets: Vec<(Category, Vec<SessionRecord>)> = Category::ALL
        .iter()
        .map(|category| (*category, Vec::new()))
        .collect();

    let mut namespace_sessions: BTreeMap<String, usize> = BTreeMap::new();
    let mut seen_learnings = HashSet::new();
    let mut learnings = Vec::new();

    for record in records {
        // record.namespaces is a set, so a session counts once per namespace
        // no matter how often its artifacts mention it.
        for namespace in &record.namespaces {
            *namespace_sessions.entry(namespace.clone()).or_insert(0) += 1;
        }

        for learning in &record.learnings {
            let key = dedup_key(learning);
            if key.is_empty() {
                continue;
            }
            if seen_learnings.insert(key) {
                learnings.push(learning.trim().to_string());
            }
        }

        buckets[record.category.rank()].1.push(record);
    }

    for (_, bucket) in &mut buckets {
        bucket.sort_by(|a, b| a.session_id.cmp(&b.session_id));
    }

    let mut namespace_counts: Vec<(String, usize)> = namespace_sessions.into_iter().collect();
    namespace_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    Aggregation {
        buckets,
        learnings,
        namespace_counts,
        total_sessions,
    }
}

fn dedup_key(learning: &str) -> String {
    learning
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}
