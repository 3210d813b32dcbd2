use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sweep_logging::sweep_debug;
use sweeper_core::KeywordStore;
use thiserror::Error;

use crate::persist::{AtomicFileWriter, PersistError};

pub const KEYWORDS_FILE: &str = "keywords.ron";

const HEADER: &str = "// Keyword store for inbox-sweeper.\n\
// `emails`: senders to clean. `protected_emails`: never cleaned.\n";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("keyword store not found at {0}")]
    Missing(PathBuf),
    #[error("failed to read keyword store {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse keyword store {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("failed to serialize keyword store: {0}")]
    Serialize(String),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedKeywords {
    #[serde(default)]
    emails: Vec<String>,
    #[serde(default)]
    protected_emails: Vec<String>,
}

/// The keyword store on disk. Every save regenerates the whole file from the
/// in-memory model.
#[derive(Debug, Clone)]
pub struct KeywordFile {
    path: PathBuf,
}

impl KeywordFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `{dir}/keywords.ron`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(KEYWORDS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<KeywordStore, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::Missing(self.path.clone()));
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let persisted: PersistedKeywords =
            ron::from_str(&content).map_err(|err| StoreError::Parse {
                path: self.path.clone(),
                message: err.to_string(),
            })?;
        sweep_debug!(
            "Loaded {} keywords and {} protected from {:?}",
            persisted.emails.len(),
            persisted.protected_emails.len(),
            self.path
        );
        Ok(KeywordStore::from_lists(
            persisted.emails,
            persisted.protected_emails,
        ))
    }

    /// Like [`KeywordFile::load`], but a missing file is an empty store.
    pub fn load_or_default(&self) -> Result<KeywordStore, StoreError> {
        match self.load() {
            Err(StoreError::Missing(_)) => Ok(KeywordStore::new()),
            other => other,
        }
    }

    pub fn save(&self, store: &KeywordStore) -> Result<PathBuf, StoreError> {
        let persisted = PersistedKeywords {
            emails: store.emails().to_vec(),
            protected_emails: store.protected_emails().to_vec(),
        };
        let body = ron::ser::to_string_pretty(&persisted, ron::ser::PrettyConfig::new())
            .map_err(|err| StoreError::Serialize(err.to_string()))?;

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let filename = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| KEYWORDS_FILE.to_string());

        let writer = AtomicFileWriter::new(dir);
        Ok(writer.write(&filename, &format!("{HEADER}{body}\n"))?)
    }
}
