use crate::error::{GomiError, Result};
use crate::gomi::record::Record;
use crate::gomi::warn::{self, WarnEvent};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
struct InventoryFile {
    #[serde(default)]
    files: Option<Vec<Record>>,
}

#[derive(Serialize)]
struct InventoryView<'a> {
    path: &'a Path,
    files: &'a [Record],
}

/// In-memory view of the JSON inventory file.
///
/// Every mutation rewrites the whole file through a temp file in the same
/// directory followed by a rename, so readers see either the old or the new
/// document. Not safe against concurrent writers from other processes.
#[derive(Debug, Clone)]
pub struct Inventory {
    path: PathBuf,
    files: Vec<Record>,
}

impl Inventory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            files: Vec::new(),
        }
    }

    /// Opens `path`, treating an absent or unreadable inventory as empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let mut inventory = Self::new(path);
        match inventory.open() {
            Ok(()) => {}
            Err(GomiError::InventoryIo { ref source, .. })
                if source.kind() == ErrorKind::NotFound =>
            {
                debug!(path = %inventory.path.display(), "no inventory yet");
            }
            Err(err) => {
                warn::emit(WarnEvent {
                    code: "INVENTORY_UNREADABLE",
                    stage: "inventory",
                    action: "open",
                    path: &inventory.path.display().to_string(),
                    reason: "starting-with-empty-history",
                    err: &err.to_string(),
                });
            }
        }
        inventory
    }

    /// Reads and decodes the backing file. On failure the record list is
    /// left empty and the error returned for the caller to report.
    pub fn open(&mut self) -> Result<()> {
        debug!(path = %self.path.display(), "opening inventory");
        self.files.clear();
        let raw = fs::read(&self.path).map_err(|err| GomiError::InventoryIo {
            path: self.path.clone(),
            source: err,
        })?;
        let decoded: InventoryFile =
            serde_json::from_slice(&raw).map_err(|err| GomiError::InventoryDecode {
                path: self.path.clone(),
                source: err,
            })?;
        self.files = decoded.files.unwrap_or_default();
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[Record] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Records ordered newest first; ids break timestamp ties.
    pub fn newest_first(&self) -> Vec<Record> {
        let mut out = self.files.clone();
        out.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.id.cmp(&a.id))
        });
        out
    }

    pub fn append(&mut self, records: Vec<Record>) -> Result<()> {
        debug!(count = records.len(), "saving inventory");
        let mut next = self.files.clone();
        next.extend(records);
        self.write(&next)?;
        self.files = next;
        Ok(())
    }

    pub fn replace(&mut self, records: Vec<Record>) -> Result<()> {
        debug!(count = records.len(), "updating inventory");
        self.write(&records)?;
        self.files = records;
        Ok(())
    }

    /// Drops the record with `id`. Returns `false` without touching the file
    /// when no such record exists.
    pub fn delete_by_id(&mut self, id: &str) -> Result<bool> {
        if !self.files.iter().any(|r| r.id == id) {
            return Ok(false);
        }
        debug!(id, "deleting record from inventory");
        let kept = self
            .files
            .iter()
            .filter(|r| r.id != id)
            .cloned()
            .collect::<Vec<_>>();
        self.replace(kept)?;
        Ok(true)
    }

    fn write(&self, files: &[Record]) -> Result<()> {
        let io_err = |err: std::io::Error| GomiError::InventoryIo {
            path: self.path.clone(),
            source: err,
        };

        let view = InventoryView {
            path: &self.path,
            files,
        };
        let mut data =
            serde_json::to_vec_pretty(&view).map_err(|err| GomiError::InventoryEncode {
                path: self.path.clone(),
                source: err,
            })?;
        data.push(b'\n');

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(io_err)?;

        let mut tmp = NamedTempFile::new_in(parent).map_err(io_err)?;
        tmp.write_all(&data).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|err| io_err(err.error))?;
        Ok(())
    }
}
