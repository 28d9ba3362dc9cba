use crate::aggregate::Aggregation;
use chrono::{DateTime, Utc};

pub const MANUAL_ADDITIONS_MARKER: &str =
    "<!-- MANUAL ADDITIONS: everything below this line survives regeneration -->";

const MANUAL_ADDITIONS_BOILERPLATE: &str = "\
Add durable operator notes here. Everything after the marker line above is
carried forward verbatim each time this document is regenerated.
";

// Pure function of the aggregation, the previous document's manual region,
// and the generation instant; re-rendering the same inputs is byte-identical.
pub fn render(
    aggregation: &Aggregation,
    previous: Option<&str>,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    out.push_str("# K8s Troubleshooting Knowledge Base\n\n");
    out.push_str(&format!(
        "Last Updated: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&format!(
        "Total Sessions Analyzed: {}\n\n",
        aggregation.total_sessions
    ));

    out.push_str("## Incidents by Category\n\n");
    if aggregation.non_empty_categories() == 0 {
        out.push_str("No incidents recorded yet.\n\n");
    }
    for (category, records) in &aggregation.buckets {
        if records.is_empty() {
            continue;
        }
        out.push_str(&format!("### {}\n\n", category.as_str()));
        for record in records {
            out.push_str(&format!("#### {}\n\n", record.session_id));
            push_field(&mut out, "Problem", &record.problem);
            push_field(&mut out, "Root Cause", &record.root_cause);
            push_field(&mut out, "Solution", &record.solution);
            if !record.resources.is_empty() {
                out.push_str("**Resources Modified:**\n");
                for resource in &record.resources {
                    out.push_str(&format!("- {resource}\n"));
                }
                out.push('\n');
            }
        }
    }

    out.push_str("## Key Learnings\n\n");
    if aggregation.learnings.is_empty() {
        out.push_str("No learnings recorded yet.\n\n");
    } else {
        for learning in &aggregation.learnings {
            out.push_str(&format!("- {learning}\n"));
        }
        out.push('\n');
    }

    out.push_str("## Namespace Activity\n\n");
    if aggregation.namespace_counts.is_empty() {
        out.push_str("No namespace activity recorded yet.\n\n");
    } else {
        out.push_str("| Namespace | Incidents |\n");
        out.push_str("| --- | --- |\n");
        for (namespace, count) in &aggregation.namespace_counts {
            out.push_str(&format!("| `{}` | {count} |\n", sanitize_cell(namespace)));
        }
        out.push('\n');
    }

    out.push_str(MANUAL_ADDITIONS_MARKER);
    out.push('\n');
    match previous {
        Some(prev) => match manual_region(prev) {
            Some(tail) => out.push_str(tail),
            // No marker in the previous document: treat the whole document as
            // manual content rather than dropping it.
            None => out.push_str(prev),
        },
        None => out.push_str(MANUAL_ADDITIONS_BOILERPLATE),
    }

    out
}

// Full per-incident view; long fields are never truncated here.
fn push_field(out: &mut String, label: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    out.push_str(&format!("**{label}:** {value}\n\n"));
}

pub fn manual_region(previous: &str) -> Option<&str> {
    previous
        .split_once(MANUAL_ADDITIONS_MARKER)
        .map(|(_, after)| after.strip_prefix('\n').unwrap_or(after))
}

fn sanitize_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::{manual_region, render, MANUAL_ADDITIONS_MARKER};
    use crate::aggregate::aggregate;
    use crate::categorize::Category;
    use crate::record::SessionRecord;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeSet;

    fn generated_at() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 10, 15, 32).single().expect("timestamp")
    }

    fn oom_record() -> SessionRecord {
        SessionRecord {
            session_id: "PROJ-1@20260314-101532".to_string(),
            category: Category::MemoryOom,
            problem: "Pods OOMKilled under load".to_string(),
            root_cause: "limit too low".to_string(),
            solution: "raise the limit".to_string(),
            resources: vec!["deployment/payments-api".to_string()],
            learnings: vec!["Always check logs first".to_string()],
            namespaces: BTreeSet::from(["default".to_string()]),
            has_report: true,
        }
    }

    #[test]
    fn document_contains_header_categories_learnings_and_namespaces() {
        let aggregation = aggregate(vec![oom_record()]);
        let doc = render(&aggregation, None, generated_at());

        assert!(doc.starts_with("# K8s Troubleshooting Knowledge Base\n"));
        assert!(doc.contains("Last Updated: 2026-03-14 10:15:32"));
        assert!(doc.contains("Total Sessions Analyzed: 1"));
        assert!(doc.contains("### Memory / OOM Issues"));
        assert!(doc.contains("#### PROJ-1@20260314-101532"));
        assert!(doc.contains("**Problem:** Pods OOMKilled under load"));
        assert!(doc.contains("- Always check logs first"));
        assert!(doc.contains("| `default` | 1 |"));
        assert!(doc.contains(MANUAL_ADDITIONS_MARKER));
    }

    #[test]
    fn empty_corpus_still_renders_a_valid_document() {
        let aggregation = aggregate(Vec::new());
        let doc = render(&aggregation, None, generated_at());

        assert!(doc.contains("Total Sessions Analyzed: 0"));
        assert!(doc.contains("No incidents recorded yet."));
        assert!(!doc.contains("### "));
        assert!(doc.contains(MANUAL_ADDITIONS_MARKER));
    }

    #[test]
    fn rerender_with_previous_output_is_byte_identical() {
        let aggregation = aggregate(vec![oom_record()]);
        let first = render(&aggregation, None, generated_at());
        let second = render(&aggregation, Some(&first), generated_at());

        assert_eq!(first, second);
    }

    #[test]
    fn manual_edits_below_the_marker_survive_rerendering() {
        let aggregation = aggregate(vec![oom_record()]);
        let mut first = render(&aggregation, None, generated_at());
        first.push_str("\n## Runbook\nAlways page the on-call first.\n");

        let second = render(&aggregation, Some(&first), generated_at());
        assert!(second.ends_with("\n## Runbook\nAlways page the on-call first.\n"));

        let third = render(&aggregation, Some(&second), generated_at());
        assert_eq!(second, third);
    }

    #[test]
    fn previous_document_without_marker_is_preserved_verbatim() {
        let aggregation = aggregate(Vec::new());
        let previous = "# Old knowledge base\nhand-written notes\n";
        let doc = render(&aggregation, Some(previous), generated_at());

        let tail = manual_region(&doc).expect("marker present");
        assert_eq!(tail, previous);
    }

    #[test]
    fn empty_narrative_fields_are_omitted_from_the_incident_view() {
        let mut record = oom_record();
        record.problem = String::new();
        record.root_cause = String::new();
        let aggregation = aggregate(vec![record]);
        let doc = render(&aggregation, None, generated_at());

        assert!(!doc.contains("**Problem:**"));
        assert!(!doc.contains("**Root Cause:**"));
        assert!(doc.contains("**Solution:** raise the limit"));
    }

    #[test]
    fn namespace_cells_are_sanitized_for_table_layout() {
        assert_eq!(super::sanitize_cell("a|b\nc"), "a\\|b c");
    }
}
