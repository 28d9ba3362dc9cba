use crate::aggregate::aggregate;
use crate::config::EngineConfig;
use crate::discovery::discover_sessions;
use crate::errors::LearningsError;
use crate::logging::JsonlLogger;
use crate::record::{build_record, SessionRecord};
use crate::render::render;
use crate::report::IncidentReport;
use crate::runtime::ProductionRuntime;
use crate::summary::parse_summary;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub sessions_found: usize,
    pub sessions_analyzed: usize,
    pub sessions_with_reports: usize,
    pub categories: usize,
    pub namespaces: usize,
    pub output_path: PathBuf,
}

// One full batch: discover, build records, aggregate, render, write once.
pub fn run_extraction(
    cfg: &EngineConfig,
    runtime: &ProductionRuntime,
) -> Result<RunReport, LearningsError> {
    let fs = runtime.file_system.as_ref();
    let terminal = runtime.terminal.as_ref();
    let logger = JsonlLogger::new(cfg.logging.dir.join("run.jsonl"))
        .with_budget(cfg.logging.budget_bytes);

    let artifacts = discover_sessions(fs, &cfg.paths.sessions_root, &cfg.discovery)?;
    logger.log(
        "info",
        "discovery.completed",
        json!({
            "root": cfg.paths.sessions_root.display().to_string(),
            "sessions": artifacts.len(),
        }),
    );
    if !cfg.quiet {
        terminal.write_line(&format!("Found {} session summaries", artifacts.len()))?;
    }

    let mut records: Vec<SessionRecord> = Vec::new();
    let mut sessions_with_reports = 0;
    for artifact in &artifacts {
        let summary_text = match fs.read_to_string(&artifact.summary_path) {
            Ok(text) => text,
            Err(err) => {
                terminal.write_line(&format!(
                    "Warning: skipping session {}: {err}",
                    artifact.stamp
                ))?;
                logger.log(
                    "warn",
                    "session.skipped",
                    json!({"stamp": artifact.stamp, "error": err.to_string()}),
                );
                continue;
            }
        };
        let summary = parse_summary(&artifact.stamp, &summary_text);

        let report = match &artifact.report_path {
            Some(path) => match fs.read_to_string(path) {
                Ok(text) => Some(IncidentReport::parse(&text)),
                Err(err) => {
                    // An unreadable report degrades like a missing one.
                    terminal.write_line(&format!(
                        "Warning: ignoring unreadable report for session {}: {err}",
                        artifact.stamp
                    ))?;
                    logger.log(
                        "warn",
                        "report.unreadable",
                        json!({"stamp": artifact.stamp, "error": err.to_string()}),
                    );
                    None
                }
            },
            None => None,
        };
        if report.is_some() {
            sessions_with_reports += 1;
        }

        records.push(build_record(&summary, report.as_ref()));
        if !cfg.quiet {
            terminal.write_line(&format!("Analyzed: {}", artifact.summary_path.display()))?;
        }
    }

    let sessions_found = artifacts.len();
    let sessions_analyzed = records.len();
    let aggregation = aggregate(records);

    let previous = if fs.exists(&cfg.paths.output) {
        Some(fs.read_to_string(&cfg.paths.output)?)
    } else {
        None
    };

    let generated_at: DateTime<Utc> = runtime.clock.now().into();
    let document = render(&aggregation, previous.as_deref(), generated_at);

    if let Some(parent) = cfg.paths.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs.create_dir_all(parent)?;
        }
    }
    // Assemble fully in memory, then rename into place so a crash mid-write
    // cannot leave a truncated knowledge base behind.
    let staging = staging_path(&cfg.paths.output);
    fs.write_string(&staging, &document)?;
    fs.rename(&staging, &cfg.paths.output)?;

    logger.log(
        "info",
        "knowledge_base.written",
        json!({
            "path": cfg.paths.output.display().to_string(),
            "sessions": sessions_analyzed,
            "categories": aggregation.non_empty_categories(),
            "namespaces": aggregation.namespace_counts.len(),
        }),
    );

    Ok(RunReport {
        sessions_found,
        sessions_analyzed,
        sessions_with_reports,
        categories: aggregation.non_empty_categories(),
        namespaces: aggregation.namespace_counts.len(),
        output_path: cfg.paths.output.clone(),
    })
}

fn staging_path(output: &std::path::Path) -> PathBuf {
    let mut staged = output.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}
