use crate::errors::LearningsError;
use crate::logging::DEFAULT_DISK_BUDGET_BYTES;
use crate::runtime::FileSystem;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_FILE: &str = "session-knowledge.md";
pub const DEFAULT_SUMMARY_PREFIX: &str = "k8s-session-summary-";
pub const DEFAULT_SUMMARY_SUFFIX: &str = ".txt";
pub const DEFAULT_REPORT_PREFIX: &str = "k8s-incident-report-";
pub const DEFAULT_REPORT_SUFFIX: &str = ".md";

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub sessions_root: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub quiet: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    pub paths: PathsConfig,
    pub discovery: DiscoveryConfig,
    pub logging: LoggingConfig,
    #[serde(skip)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathsConfig {
    pub sessions_root: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscoveryConfig {
    pub summary_prefix: String,
    pub summary_suffix: String,
    pub report_prefix: String,
    pub report_suffix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    pub dir: PathBuf,
    pub budget_bytes: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig {
                sessions_root: PathBuf::new(),
                output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            },
            discovery: DiscoveryConfig {
                summary_prefix: DEFAULT_SUMMARY_PREFIX.to_string(),
                summary_suffix: DEFAULT_SUMMARY_SUFFIX.to_string(),
                report_prefix: DEFAULT_REPORT_PREFIX.to_string(),
                report_suffix: DEFAULT_REPORT_SUFFIX.to_string(),
            },
            logging: LoggingConfig {
                dir: PathBuf::from(".cache/learnings/logs"),
                budget_bytes: DEFAULT_DISK_BUDGET_BYTES,
            },
            quiet: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialEngineConfig {
    paths: Option<PartialPathsConfig>,
    discovery: Option<PartialDiscoveryConfig>,
    logging: Option<PartialLoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialPathsConfig {
    sessions_root: Option<PathBuf>,
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialDiscoveryConfig {
    summary_prefix: Option<String>,
    summary_suffix: Option<String>,
    report_prefix: Option<String>,
    report_suffix: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialLoggingConfig {
    dir: Option<PathBuf>,
    budget_bytes: Option<u64>,
}

pub fn load_config(
    overrides: &CliOverrides,
    process_cwd: &Path,
    fs: &dyn FileSystem,
) -> Result<EngineConfig, LearningsError> {
    let mut cfg = EngineConfig::default();

    if let Some(path) = &overrides.config_path {
        let file_contents = fs.read_to_string(path)?;
        let partial: PartialEngineConfig = toml::from_str(&file_contents)
            .map_err(|e| LearningsError::ConfigParse(e.to_string()))?;
        merge_partial_config(&mut cfg, partial);
    }

    apply_cli_overrides(&mut cfg, overrides);
    resolve_paths(&mut cfg, process_cwd);
    validate_config(&cfg)?;
    Ok(cfg)
}

fn merge_partial_config(cfg: &mut EngineConfig, partial: PartialEngineConfig) {
    if let Some(paths) = partial.paths {
        if let Some(sessions_root) = paths.sessions_root {
            cfg.paths.sessions_root = sessions_root;
        }
        if let Some(output) = paths.output {
            cfg.paths.output = output;
        }
    }

    if let Some(discovery) = partial.discovery {
        if let Some(summary_prefix) = discovery.summary_prefix {
            cfg.discovery.summary_prefix = summary_prefix;
        }
        if let Some(summary_suffix) = discovery.summary_suffix {
            cfg.discovery.summary_suffix = summary_suffix;
        }
        if let Some(report_prefix) = discovery.report_prefix {
            cfg.discovery.report_prefix = report_prefix;
        }
        if let Some(report_suffix) = discovery.report_suffix {
            cfg.discovery.report_suffix = report_suffix;
        }
    }

    if let Some(logging) = partial.logging {
        if let Some(dir) = logging.dir {
            cfg.logging.dir = dir;
        }
        if let Some(budget_bytes) = logging.budget_bytes {
            cfg.logging.budget_bytes = budget_bytes;
        }
    }
}

fn apply_cli_overrides(cfg: &mut EngineConfig, overrides: &CliOverrides) {
    if let Some(sessions_root) = &overrides.sessions_root {
        cfg.paths.sessions_root = sessions_root.clone();
    }
    if let Some(output_path) = &overrides.output_path {
        cfg.paths.output = output_path.clone();
    }
    cfg.quiet = overrides.quiet;
}

fn resolve_paths(cfg: &mut EngineConfig, process_cwd: &Path) {
    for path in [
        &mut cfg.paths.sessions_root,
        &mut cfg.paths.output,
        &mut cfg.logging.dir,
    ] {
        if !path.as_os_str().is_empty() && path.is_relative() {
            let resolved = process_cwd.join(path.as_path());
            *path = resolved;
        }
    }
}

fn validate_config(cfg: &EngineConfig) -> Result<(), LearningsError> {
    if cfg.paths.sessions_root.as_os_str().is_empty() {
        return Err(LearningsError::InvalidConfig(
            "sessions root is required (positional argument or [paths] sessions_root)".to_string(),
        ));
    }
    if cfg.discovery.summary_prefix.is_empty() {
        return Err(LearningsError::InvalidConfig(
            "discovery summary_prefix must not be empty".to_string(),
        ));
    }
    if cfg.discovery.report_prefix.is_empty() {
        return Err(LearningsError::InvalidConfig(
            "discovery report_prefix must not be empty".to_string(),
        ));
    }
    if cfg.logging.budget_bytes == 0 {
        return Err(LearningsError::InvalidConfig(
            "logging budget_bytes must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
