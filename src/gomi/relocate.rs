use crate::error::{GomiError, Result};
use crate::gomi::id::new_id;
use crate::gomi::inventory::Inventory;
use crate::gomi::record::{Record, build_record};
use crate::gomi::warn::{self, WarnEvent};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::thread;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RemoveMode {
    /// Any per-path failure fails the whole call.
    #[default]
    Strict,
    /// Per-path failures are reported in the outcome but not returned.
    Force,
}

#[derive(Debug, Default)]
pub struct RemoveOutcome {
    pub group_id: String,
    pub archived: Vec<Record>,
    pub failures: Vec<GomiError>,
}

fn relocate_one(archive_root: &Path, group_id: &str, target: &Path) -> Result<Record> {
    if let Err(err) = fs::symlink_metadata(target) {
        if err.kind() == ErrorKind::NotFound {
            return Err(GomiError::NotFound {
                path: target.to_path_buf(),
            });
        }
    }

    let record = build_record(archive_root, group_id, target)?;
    // Records that cannot be encoded must fail before anything moves.
    let json = serde_json::to_string(&record).map_err(|err| GomiError::Unrecordable {
        path: target.to_path_buf(),
        source: err,
    })?;
    debug!("generating file metadata: {json}");

    if let Some(dir) = record.archive_path.parent() {
        fs::create_dir_all(dir).map_err(|err| GomiError::CreateDir {
            path: dir.to_path_buf(),
            source: err,
        })?;
    }

    debug!(
        "moving {} -> {}",
        record.source_path.display(),
        record.archive_path.display()
    );
    fs::rename(&record.source_path, &record.archive_path).map_err(|err| GomiError::Move {
        from: record.source_path.clone(),
        to: record.archive_path.clone(),
        source: err,
    })?;
    Ok(record)
}

/// Moves every target into `archive_root` under one fresh group id and
/// records the successful moves with a single inventory append.
///
/// Targets are relocated concurrently, one scoped thread each; every thread
/// owns exactly one result slot, and the inventory is only touched after all
/// of them have been joined. Failed targets never reach the inventory.
pub fn remove<P>(
    archive_root: &Path,
    inventory: &mut Inventory,
    targets: &[P],
    mode: RemoveMode,
) -> Result<RemoveOutcome>
where
    P: AsRef<Path> + Sync,
{
    if targets.is_empty() {
        return Err(GomiError::NoPaths);
    }

    let group_id = new_id();
    let mut slots: Vec<Option<Record>> = vec![None; targets.len()];

    let results: Vec<Result<()>> = thread::scope(|s| {
        let handles = slots
            .iter_mut()
            .zip(targets)
            .map(|(slot, target)| {
                let target = target.as_ref();
                let group_id = group_id.as_str();
                let handle = s.spawn(move || -> Result<()> {
                    *slot = Some(relocate_one(archive_root, group_id, target)?);
                    Ok(())
                });
                (target, handle)
            })
            .collect::<Vec<_>>();

        handles
            .into_iter()
            .map(|(target, handle)| {
                handle.join().unwrap_or_else(|_| {
                    Err(GomiError::WorkerPanicked {
                        path: target.to_path_buf(),
                    })
                })
            })
            .collect()
    });

    let failures = results
        .into_iter()
        .filter_map(|result| result.err())
        .collect::<Vec<_>>();
    let archived = slots.into_iter().flatten().collect::<Vec<_>>();

    if let Err(err) = inventory.append(archived.clone()) {
        for record in &archived {
            warn::emit(WarnEvent {
                code: "UNRECORDED_MOVE",
                stage: "remove",
                action: "inventory-append",
                path: &record.archive_path.display().to_string(),
                reason: "moved-but-not-recorded",
                err: &err.to_string(),
            });
        }
        if mode == RemoveMode::Strict && !failures.is_empty() {
            let mut all = failures;
            all.push(err);
            return Err(GomiError::Batch(all));
        }
        return Err(err);
    }

    if mode == RemoveMode::Strict && !failures.is_empty() {
        return Err(GomiError::Batch(failures));
    }

    for failure in &failures {
        debug!("ignoring failure in force mode: {failure}");
    }

    Ok(RemoveOutcome {
        group_id,
        archived,
        failures,
    })
}
