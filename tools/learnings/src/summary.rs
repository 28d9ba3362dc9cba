use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const TICKET_NOT_SET: &str = "NOT_SET";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub stamp: String,
    pub ticket: String,
    pub date: String,
    pub namespaces: BTreeSet<String>,
    pub creates: u64,
    pub updates: u64,
    pub deletes: u64,
    pub resource_kinds: BTreeSet<String>,
}

impl SessionSummary {
    pub fn session_id(&self) -> String {
        format!("{}@{}", self.ticket, self.stamp)
    }
}

// Line-oriented `Key: value` scan. Unknown keys are ignored and malformed
// counters count as zero; a summary is never rejected outright.
pub fn parse_summary(stamp: &str, text: &str) -> SessionSummary {
    let mut summary = SessionSummary {
        stamp: stamp.to_string(),
        ticket: TICKET_NOT_SET.to_string(),
        date: String::new(),
        namespaces: BTreeSet::new(),
        creates: 0,
        updates: 0,
        deletes: 0,
        resource_kinds: BTreeSet::new(),
    };

    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "Date" => summary.date = value.to_string(),
            "Jira Ticket" => {
                if !value.is_empty() {
                    summary.ticket = value.to_string();
                }
            }
            "Affected Namespaces" => summary.namespaces = split_names(value),
            "Creates" => summary.creates = parse_count(value),
            "Updates" => summary.updates = parse_count(value),
            "Deletes" => summary.deletes = parse_count(value),
            "Modified Resources" => summary.resource_kinds = split_names(value),
            _ => {}
        }
    }

    summary
}

fn split_names(value: &str) -> BTreeSet<String> {
    value.split_whitespace().map(str::to_string).collect()
}

fn parse_count(value: &str) -> u64 {
    value.parse().unwrap_or(0)
}
