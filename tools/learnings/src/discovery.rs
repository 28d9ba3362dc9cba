use crate::config::DiscoveryConfig;
use crate::errors::LearningsError;
use crate::runtime::FileSystem;
use std::path::{Path, PathBuf};

// One discovered session: the summary file plus its stamp-paired report,
// when that report exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionArtifacts {
    pub stamp: String,
    pub summary_path: PathBuf,
    pub report_path: Option<PathBuf>,
}

pub fn discover_sessions(
    fs: &dyn FileSystem,
    root: &Path,
    cfg: &DiscoveryConfig,
) -> Result<Vec<SessionArtifacts>, LearningsError> {
    let entries = fs.list_dir(root)?;

    let mut found = Vec::new();
    for path in entries {
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        let Some(stamp) = name
            .strip_prefix(cfg.summary_prefix.as_str())
            .and_then(|rest| rest.strip_suffix(cfg.summary_suffix.as_str()))
        else {
            continue;
        };
        if stamp.is_empty() {
            continue;
        }

        let report = root.join(format!(
            "{}{}{}",
            cfg.report_prefix, stamp, cfg.report_suffix
        ));
        let report_path = fs.exists(&report).then_some(report);
        found.push(SessionArtifacts {
            stamp: stamp.to_string(),
            summary_path: path,
            report_path,
        });
    }

    // Directory listing order is not stable across platforms.
    found.sort_by(|a, b| a.stamp.cmp(&b.stamp));
    Ok(found)
}
