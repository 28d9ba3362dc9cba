use crate::categorize::{categorize, Category};
use crate::report::{IncidentReport, ReportSection};
use crate::summary::SessionSummary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// The normalized unit the aggregator consumes. Built once per discovered
// session and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub category: Category,
    pub problem: String,
    pub root_cause: String,
    pub solution: String,
    pub resources: Vec<String>,
    pub learnings: Vec<String>,
    pub namespaces: BTreeSet<String>,
    pub has_report: bool,
}

pub fn build_record(summary: &SessionSummary, report: Option<&IncidentReport>) -> SessionRecord {
    let Some(report) = report else {
        // Metadata-only session; recorded anyway, without narrative fields.
        return SessionRecord {
            session_id: summary.session_id(),
            category: Category::Configuration,
            problem: String::new(),
            root_cause: String::new(),
            solution: String::new(),
            resources: Vec::new(),
            learnings: Vec::new(),
            namespaces: summary.namespaces.clone(),
            has_report: false,
        };
    };

    let problem = report.section(ReportSection::ProblemDescription).to_string();
    let root_cause = report.section(ReportSection::RootCause).to_string();
    let solution = report.section(ReportSection::Solution).to_string();
    let category = categorize(&problem, &root_cause);

    SessionRecord {
        session_id: summary.session_id(),
        category,
        problem,
        root_cause,
        solution,
        resources: parse_list_lines(report.section(ReportSection::ResourcesModified)),
        learnings: parse_list_lines(report.section(ReportSection::KeyLearnings)),
        namespaces: summary.namespaces.clone(),
        has_report: true,
    }
}

// Free-text descriptor lines; a leading bullet marker is stripped, anything
// else is preserved verbatim.
pub fn parse_list_lines(body: &str) -> Vec<String> {
    body.lines()
        .map(strip_bullet)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_bullet(line: &str) -> &str {
    let trimmed = line.trim();
    for marker in ["- ", "* ", "\u{2022} "] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            return rest.trim();
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::{build_record, parse_list_lines};
    use crate::categorize::Category;
    use crate::report::IncidentReport;
    use crate::summary::parse_summary;

    fn summary_fixture() -> crate::summary::SessionSummary {
        parse_summary(
            "20260314-101532",
            "Jira Ticket: PROJ-1\nAffected Namespaces: default\n",
        )
    }

    #[test]
    fn report_sessions_carry_narrative_fields_and_a_category() {
        let report = IncidentReport::parse(
            "## Problem Description\nOOMKilled during peak traffic\n\n## Root Cause\nlimit too low\n\n## Solution\nraise limit\n\n## Key Learnings\n- watch the limits\n",
        );
        let record = build_record(&summary_fixture(), Some(&report));

        assert_eq!(record.session_id, "PROJ-1@20260314-101532");
        assert_eq!(record.category, Category::MemoryOom);
        assert_eq!(record.problem, "OOMKilled during peak traffic");
        assert_eq!(record.solution, "raise limit");
        assert_eq!(record.learnings, ["watch the limits"]);
        assert!(record.has_report);
    }

    #[test]
    fn missing_report_forces_configuration_with_empty_fields() {
        let record = build_record(&summary_fixture(), None);

        assert_eq!(record.category, Category::Configuration);
        assert!(record.problem.is_empty());
        assert!(record.root_cause.is_empty());
        assert!(record.solution.is_empty());
        assert!(record.learnings.is_empty());
        assert!(!record.has_report);
        assert!(record.namespaces.contains("default"));
    }

    #[test]
    fn empty_sections_still_run_the_categorizer_on_whats_present() {
        let report = IncidentReport::parse("## Root Cause\ncrashloop from bad env var\n");
        let record = build_record(&summary_fixture(), Some(&report));

        assert_eq!(record.category, Category::CrashLoop);
        assert!(record.problem.is_empty());
        assert!(record.has_report);
    }

    #[test]
    fn list_lines_strip_bullets_and_keep_free_text_verbatim() {
        let entries = parse_list_lines(
            "- deployment/api (namespace: prod)\n* configmap/settings\n\u{2022} secret/creds\nraw line without bullet\n   \n",
        );
        assert_eq!(
            entries,
            [
                "deployment/api (namespace: prod)",
                "configmap/settings",
                "secret/creds",
                "raw line without bullet",
            ]
        );
    }
}
