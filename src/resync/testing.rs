//! Test doubles shared by the engine's unit tests.

use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::audit::AuditLog;
use crate::context::ServiceContext;
use crate::ports::{Clock, FileSystem, Operator, TagFuture, TagRequest, TagResponse, Tagger};

/// In-memory filesystem for running the engine without touching disk.
#[derive(Default)]
pub struct MemFs {
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl MemFs {
    pub fn insert(&self, path: impl Into<PathBuf>, contents: &str) {
        self.files.lock().unwrap().insert(path.into(), contents.to_string());
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }
}

impl FileSystem for MemFs {
    fn read_to_string(&self, path: &Path) -> Result<String, Box<dyn Error + Send + Sync>> {
        self.get(path).ok_or_else(|| format!("file not found: {}", path.display()).into())
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.insert(path, contents);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.keys().any(|k| k.starts_with(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.keys().any(|k| k.starts_with(path) && k != path)
    }

    fn walk_files(&self, root: &Path) -> Result<Vec<PathBuf>, Box<dyn Error + Send + Sync>> {
        let files = self.files.lock().unwrap();
        Ok(files.keys().filter(|k| k.starts_with(root) && *k != root).cloned().collect())
    }
}

/// Clock frozen at the epoch.
pub struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH
    }
}

/// Tagger answering from a closure.
pub struct FnTagger<F>(pub F);

impl<F> Tagger for FnTagger<F>
where
    F: Fn(&TagRequest) -> Result<String, String> + Send + Sync,
{
    fn tag(&self, request: &TagRequest) -> TagFuture<'_> {
        let result: Result<TagResponse, Box<dyn Error + Send + Sync>> =
            (self.0)(request).map(|table| TagResponse { table }).map_err(Into::into);
        Box::pin(async move { result })
    }
}

/// Context over `fs` and `operator`, a frozen clock and a tagger that
/// echoes its input.
pub fn context(fs: MemFs, operator: impl Operator + 'static) -> ServiceContext {
    ServiceContext::new(
        Box::new(FixedClock),
        Box::new(fs),
        Box::new(operator),
        Box::new(FnTagger(|r: &TagRequest| Ok(r.table.clone()))),
    )
}

/// Empty audit log with a fixed header.
pub fn audit() -> AuditLog {
    AuditLog::begin(Uuid::nil(), &FixedClock, "test", Path::new("test.cupt"))
}
