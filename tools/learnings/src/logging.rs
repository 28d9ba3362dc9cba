use crate::errors::LearningsError;
use serde::Serialize;
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_DISK_BUDGET_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct JsonlLogger {
    pub path: PathBuf,
    pub max_payload_bytes: usize,
    pub budget_bytes: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEvent<'a> {
    pub level: &'a str,
    pub event_type: &'a str,
    pub payload: Value,
}

impl JsonlLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            max_payload_bytes: 4096,
            budget_bytes: DEFAULT_DISK_BUDGET_BYTES,
        }
    }

    pub fn with_budget(mut self, budget_bytes: u64) -> Self {
        self.budget_bytes = budget_bytes;
        self
    }

    pub fn append(&self, event: &LogEvent<'_>) -> Result<(), LearningsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| LearningsError::Io(e.to_string()))?;
        }
        let truncated = truncate_json(event.payload.clone(), self.max_payload_bytes);
        let line = serde_json::to_string(&LogEvent {
            level: event.level,
            event_type: event.event_type,
            payload: truncated,
        })
        .map_err(|e| LearningsError::Io(e.to_string()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| LearningsError::Io(e.to_string()))?;
        file.write_all(line.as_bytes())
            .map_err(|e| LearningsError::Io(e.to_string()))?;
        file.write_all(b"\n")
            .map_err(|e| LearningsError::Io(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            prune_dir_to_budget(parent, self.budget_bytes);
        }

        Ok(())
    }

    // Best-effort variant for run-progress events; a failed log write must
    // never fail the extraction itself.
    pub fn log(&self, level: &str, event_type: &str, payload: Value) {
        let _ = self.append(&LogEvent {
            level,
            event_type,
            payload,
        });
    }
}

fn truncate_json(value: Value, max_bytes: usize) -> Value {
    let rendered = serde_json::to_string(&value).unwrap_or_default();
    if rendered.len() <= max_bytes {
        return value;
    }
    let mut truncated = rendered;
    truncated.truncate(max_bytes.saturating_sub(3));
    Value::String(format!("{truncated}..."))
}

// Deletes oldest log files until the directory fits the byte budget.
fn prune_dir_to_budget(dir: &Path, budget_bytes: u64) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    let mut files = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let meta = entry.metadata().ok()?;
            if !meta.is_file() {
                return None;
            }
            Some((meta.modified().ok(), meta.len(), entry.path()))
        })
        .collect::<Vec<_>>();

    let mut total: u64 = files.iter().map(|(_, len, _)| *len).sum();
    if total <= budget_bytes {
        return;
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    for (_, len, path) in files {
        if total <= budget_bytes {
            break;
        }
        if fs::remove_file(&path).is_ok() {
            total = total.saturating_sub(len);
        }
    }
}
