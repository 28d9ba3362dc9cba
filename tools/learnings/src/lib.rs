pub mod aggregate;
pub mod categorize;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod record;
pub mod render;
pub mod report;
pub mod runtime;
pub mod section;
pub mod summary;

use clap::{error::ErrorKind, Parser};
use config::{load_config, CliOverrides};
use engine::run_extraction;
use errors::LearningsError;
use runtime::ProductionRuntime;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "learnings")]
#[command(about = "Fold k8s troubleshooting session artifacts into a knowledge base")]
pub struct Cli {
    /// Directory containing session summary and incident report files.
    pub sessions_root: Option<PathBuf>,
    /// Destination knowledge-base document (default: session-knowledge.md).
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

pub fn run() -> Result<i32, LearningsError> {
    let args = std::env::args_os().collect::<Vec<_>>();
    let cwd = std::env::current_dir().map_err(|e| LearningsError::Io(e.to_string()))?;
    let runtime = ProductionRuntime::new();
    run_with_runtime(&args, &cwd, &runtime)
}

pub fn run_with_runtime(
    args: &[std::ffi::OsString],
    cwd: &std::path::Path,
    runtime: &ProductionRuntime,
) -> Result<i32, LearningsError> {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => match error.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{error}");
                return Ok(0);
            }
            _ => return Err(LearningsError::Cli(error.to_string())),
        },
    };

    let overrides = CliOverrides {
        config_path: cli.config.clone(),
        sessions_root: cli.sessions_root.clone(),
        output_path: cli.output.clone(),
        quiet: cli.quiet,
    };

    let cfg = load_config(&overrides, cwd, runtime.file_system.as_ref())?;
    let report = run_extraction(&cfg, runtime)?;

    if !cfg.quiet {
        runtime.terminal.write_line(&format!(
            "Knowledge base written to: {}",
            report.output_path.display()
        ))?;
        runtime
            .terminal
            .write_line(&format!("  - Analyzed {} sessions", report.sessions_analyzed))?;
        runtime.terminal.write_line(&format!(
            "  - Identified {} problem categories",
            report.categories
        ))?;
        runtime
            .terminal
            .write_line(&format!("  - Tracked {} namespaces", report.namespaces))?;
    }

    Ok(0)
}
