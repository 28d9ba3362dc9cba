use crate::section::extract_section;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSection {
    ProblemDescription,
    Investigation,
    RootCause,
    Solution,
    ResourcesModified,
    KeyLearnings,
    Prevention,
}

impl ReportSection {
    pub const ALL: [ReportSection; 7] = [
        ReportSection::ProblemDescription,
        ReportSection::Investigation,
        ReportSection::RootCause,
        ReportSection::Solution,
        ReportSection::ResourcesModified,
        ReportSection::KeyLearnings,
        ReportSection::Prevention,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::ProblemDescription => "Problem Description",
            Self::Investigation => "Investigation",
            Self::RootCause => "Root Cause",
            Self::Solution => "Solution",
            Self::ResourcesModified => "Resources Modified",
            Self::KeyLearnings => "Key Learnings",
            Self::Prevention => "Prevention",
        }
    }
}

// Ordered section-name to body mapping over the fixed section set. Sections
// absent from the source text map to empty bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentReport {
    sections: Vec<(ReportSection, String)>,
}

impl IncidentReport {
    pub fn parse(text: &str) -> Self {
        let sections = ReportSection::ALL
            .iter()
            .map(|section| (*section, extract_section(text, section.title())))
            .collect();
        Self { sections }
    }

    pub fn section(&self, which: ReportSection) -> &str {
        self.sections
            .iter()
            .find(|(section, _)| *section == which)
            .map(|(_, body)| body.as_str())
            .unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|(_, body)| body.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::{IncidentReport, ReportSection};

    const REPORT: &str = "\
## Problem Description
Pods OOMKilled under load.

## Investigation
Checked kubectl describe and events.

## Root Cause
Memory limit far below real usage.

## Solution
Raised limit to 512Mi.

## Resources Modified
- deployment/payments-api (namespace: payments)

## Key Learnings
- Always check logs first
- Compare limits against real usage

## Prevention
Alert on sustained memory pressure.
";

    #[test]
    fn every_fixed_section_is_parsed() {
        let report = IncidentReport::parse(REPORT);

        assert_eq!(
            report.section(ReportSection::ProblemDescription),
            "Pods OOMKilled under load."
        );
        assert_eq!(
            report.section(ReportSection::RootCause),
            "Memory limit far below real usage."
        );
        assert_eq!(report.section(ReportSection::Solution), "Raised limit to 512Mi.");
        assert!(report
            .section(ReportSection::KeyLearnings)
            .contains("Always check logs first"));
        assert!(!report.is_empty());
    }

    #[test]
    fn absent_sections_map_to_empty_bodies() {
        let report = IncidentReport::parse("## Solution\nrestarted the deployment\n");

        assert_eq!(report.section(ReportSection::ProblemDescription), "");
        assert_eq!(report.section(ReportSection::Prevention), "");
        assert_eq!(report.section(ReportSection::Solution), "restarted the deployment");
    }

    #[test]
    fn arbitrary_text_parses_to_an_empty_report() {
        let report = IncidentReport::parse("no headings at all, just prose");
        assert!(report.is_empty());
    }
}
