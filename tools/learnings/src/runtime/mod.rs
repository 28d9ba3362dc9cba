use crate::errors::LearningsError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

pub trait FileSystem: Send + Sync {
    fn read_to_string(&self, path: &Path) -> Result<String, LearningsError>;
    fn write_string(&self, path: &Path, contents: &str) -> Result<(), LearningsError>;
    fn rename(&self, from: &Path, to: &Path) -> Result<(), LearningsError>;
    fn create_dir_all(&self, path: &Path) -> Result<(), LearningsError>;
    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>, LearningsError>;
    fn exists(&self, path: &Path) -> bool;
}

pub trait Terminal: Send + Sync {
    fn write_line(&self, line: &str) -> Result<(), LearningsError>;
}

pub struct ProductionClock;

impl Clock for ProductionClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

pub struct ProductionFileSystem;

impl FileSystem for ProductionFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, LearningsError> {
        std::fs::read_to_string(path)
            .map_err(|e| LearningsError::Io(format!("read {}: {e}", path.display())))
    }

    fn write_string(&self, path: &Path, contents: &str) -> Result<(), LearningsError> {
        std::fs::write(path, contents)
            .map_err(|e| LearningsError::Io(format!("write {}: {e}", path.display())))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), LearningsError> {
        std::fs::rename(from, to)
            .map_err(|e| LearningsError::Io(format!("rename to {}: {e}", to.display())))
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), LearningsError> {
        std::fs::create_dir_all(path)
            .map_err(|e| LearningsError::Io(format!("mkdir {}: {e}", path.display())))
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>, LearningsError> {
        let entries = std::fs::read_dir(path)
            .map_err(|e| LearningsError::Io(format!("list {}: {e}", path.display())))?;
        Ok(entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .collect())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

pub struct ProductionTerminal;

impl Terminal for ProductionTerminal {
    fn write_line(&self, line: &str) -> Result<(), LearningsError> {
        use std::io::Write;
        let mut out = std::io::stdout();
        writeln!(out, "{line}").map_err(|e| LearningsError::Io(e.to_string()))
    }
}

pub struct ProductionRuntime {
    pub clock: Arc<dyn Clock>,
    pub file_system: Arc<dyn FileSystem>,
    pub terminal: Arc<dyn Terminal>,
}

impl ProductionRuntime {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(ProductionClock),
            file_system: Arc::new(ProductionFileSystem),
            terminal: Arc::new(ProductionTerminal),
        }
    }
}

impl Default for ProductionRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct FakeClock {
    now: Arc<Mutex<SystemTime>>,
}

impl FakeClock {
    pub fn new(now: SystemTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn set(&self, now: SystemTime) {
        *self.now.lock().expect("clock lock") = now;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new(SystemTime::UNIX_EPOCH)
    }
}

impl Clock for FakeClock {
    fn now(&self) -> SystemTime {
        *self.now.lock().expect("clock lock")
    }
}

#[derive(Default, Clone)]
pub struct FakeFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, String>>>,
    dirs: Arc<Mutex<Vec<PathBuf>>>,
    fail_next: Arc<Mutex<Option<LearningsError>>>,
}

impl FakeFileSystem {
    pub fn with_file(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        let fs = Self::default();
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs.dirs.lock().expect("dirs lock").push(parent.to_path_buf());
        }
        fs.files
            .lock()
            .expect("files lock")
            .insert(path, contents.into());
        fs
    }

    pub fn set_fail_next(&self, error: LearningsError) {
        *self.fail_next.lock().expect("fail lock") = Some(error);
    }

    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files.lock().expect("files lock").get(path).cloned()
    }

    fn maybe_fail(&self) -> Result<(), LearningsError> {
        if let Some(err) = self.fail_next.lock().expect("fail lock").take() {
            return Err(err);
        }
        Ok(())
    }
}

impl FileSystem for FakeFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, LearningsError> {
        self.maybe_fail()?;
        self.files
            .lock()
            .expect("files lock")
            .get(path)
            .cloned()
            .ok_or_else(|| LearningsError::Io(format!("missing file {}", path.display())))
    }

    fn write_string(&self, path: &Path, contents: &str) -> Result<(), LearningsError> {
        self.maybe_fail()?;
        self.files
            .lock()
            .expect("files lock")
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), LearningsError> {
        self.maybe_fail()?;
        let mut files = self.files.lock().expect("files lock");
        let contents = files
            .remove(from)
            .ok_or_else(|| LearningsError::Io(format!("missing file {}", from.display())))?;
        files.insert(to.to_path_buf(), contents);
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), LearningsError> {
        self.maybe_fail()?;
        self.dirs
            .lock()
            .expect("dirs lock")
            .push(path.to_path_buf());
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>, LearningsError> {
        self.maybe_fail()?;
        let files = self.files.lock().expect("files lock");
        let listed = files
            .keys()
            .filter(|candidate| candidate.parent() == Some(path))
            .cloned()
            .collect::<Vec<_>>();
        let known_dir = self.dirs.lock().expect("dirs lock").contains(&path.to_path_buf());
        if listed.is_empty() && !known_dir {
            return Err(LearningsError::Io(format!(
                "missing directory {}",
                path.display()
            )));
        }
        Ok(listed)
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().expect("files lock").contains_key(path)
            || self.dirs.lock().expect("dirs lock").contains(&path.to_path_buf())
    }
}

#[derive(Default, Clone)]
pub struct FakeTerminal {
    writes: Arc<Mutex<Vec<String>>>,
}

impl FakeTerminal {
    pub fn written_lines(&self) -> Vec<String> {
        self.writes.lock().expect("writes lock").clone()
    }
}

impl Terminal for FakeTerminal {
    fn write_line(&self, line: &str) -> Result<(), LearningsError> {
        self.writes
            .lock()
            .expect("writes lock")
            .push(line.to_string());
        Ok(())
    }
}
