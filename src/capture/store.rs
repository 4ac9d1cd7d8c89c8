//! Capture store
//!
//! Read-only view over the two fixed directories. Every call goes back to the
//! filesystem; nothing is cached between requests.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tokio::fs;

use super::error::StoreError;
use super::types::{self, CaptureStatus, DirectoryAlias, FileEntry, LiveCapture};
use crate::config::StorageConfig;
use crate::logger;

const JSON_SUFFIX: &str = ".json";

/// Filesystem-backed capture service
#[derive(Debug, Clone)]
pub struct CaptureStore {
    captured_dir: PathBuf,
    configs_dir: PathBuf,
}

impl CaptureStore {
    pub fn new(captured_dir: impl Into<PathBuf>, configs_dir: impl Into<PathBuf>) -> Self {
        Self {
            captured_dir: captured_dir.into(),
            configs_dir: configs_dir.into(),
        }
    }

    pub fn from_config(storage: &StorageConfig) -> Self {
        Self::new(&storage.captured_dir, &storage.configs_dir)
    }

    /// Map a logical directory to its physical root. Existence is not checked here.
    pub fn resolve(&self, alias: DirectoryAlias) -> &Path {
        match alias {
            DirectoryAlias::Configs => &self.configs_dir,
            DirectoryAlias::Captured => &self.captured_dir,
        }
    }

    /// List `.json` files with their sizes.
    ///
    /// Any failure, including a single entry that cannot be stat'ed, yields an
    /// empty list for the whole call.
    pub async fn list_files(&self, alias: DirectoryAlias) -> Vec<FileEntry> {
        let dir = self.resolve(alias);
        match list_entries(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                logger::log_warning(&format!("Listing '{}' failed: {e}", dir.display()));
                Vec::new()
            }
        }
    }

    /// Read and parse one file from a logical directory
    pub async fn read_file(&self, alias: DirectoryAlias, filename: &str) -> Result<Value, StoreError> {
        let name = validate_filename(filename)?;
        read_json(&self.resolve(alias).join(name)).await
    }

    /// Sum of route counts over every parseable capture file
    pub async fn status(&self) -> CaptureStatus {
        let names = match json_file_names(&self.captured_dir).await {
            Ok(names) => names,
            Err(e) => {
                logger::log_warning(&format!("Capture status unavailable: {e}"));
                return CaptureStatus::error();
            }
        };

        let mut total_routes = 0;
        for name in &names {
            match read_json(&self.captured_dir.join(name)).await {
                Ok(doc) => total_routes += types::route_count(&doc),
                Err(e) => logger::log_warning(&format!("Skipping capture file: {e}")),
            }
        }

        CaptureStatus::running(total_routes, names.len())
    }

    /// Contents of the most recently modified capture file.
    ///
    /// Unlike [`CaptureStore::list_files`], a directory or file failure is an error here.
    pub async fn live(&self) -> Result<LiveCapture, StoreError> {
        let mut latest: Option<(PathBuf, SystemTime)> = None;

        for name in json_file_names(&self.captured_dir).await? {
            let path = self.captured_dir.join(&name);
            let modified = fs::metadata(&path)
                .await
                .and_then(|meta| meta.modified())
                .map_err(|source| StoreError::Stat {
                    path: path.clone(),
                    source,
                })?;

            if latest.as_ref().map_or(true, |(_, newest)| is_newer(modified, *newest)) {
                latest = Some((path, modified));
            }
        }

        let Some((path, modified)) = latest else {
            return Ok(LiveCapture::empty());
        };

        let doc = read_json(&path).await?;
        if doc.is_null() {
            return Err(StoreError::NullDocument { path });
        }
        let routes = types::into_routes(doc);
        Ok(LiveCapture {
            count: routes.len(),
            routes,
            timestamp: Some(format_timestamp(modified)),
        })
    }
}

/// Names ending in `.json`, in directory enumeration order
async fn json_file_names(dir: &Path) -> Result<Vec<String>, StoreError> {
    let read_dir_err = |source| StoreError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut reader = fs::read_dir(dir).await.map_err(read_dir_err)?;
    let mut names = Vec::new();
    while let Some(entry) = reader.next_entry().await.map_err(read_dir_err)? {
        // Names that are not valid UTF-8 cannot be addressed through the API
        if let Ok(name) = entry.file_name().into_string() {
            if name.ends_with(JSON_SUFFIX) {
                names.push(name);
            }
        }
    }
    Ok(names)
}

async fn list_entries(dir: &Path) -> Result<Vec<FileEntry>, StoreError> {
    let names = json_file_names(dir).await?;
    let mut entries = Vec::with_capacity(names.len());
    for name in names {
        let path = dir.join(&name);
        let meta = fs::metadata(&path).await.map_err(|source| StoreError::Stat {
            path: path.clone(),
            source,
        })?;
        entries.push(FileEntry {
            name,
            path: path.display().to_string(),
            size: meta.len(),
        });
    }
    Ok(entries)
}

async fn read_json(path: &Path) -> Result<Value, StoreError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reject names that would leave the resolved directory
fn validate_filename(name: &str) -> Result<&str, StoreError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(name)
}

/// Modification times are compared at millisecond precision; ties keep the earlier entry
fn is_newer(candidate: SystemTime, current: SystemTime) -> bool {
    DateTime::<Utc>::from(candidate).timestamp_millis()
        > DateTime::<Utc>::from(current).timestamp_millis()
}

/// Millisecond-precision UTC timestamp, e.g. `2024-05-01T12:00:00.123Z`
fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Millis, true)
}
