use crate::error::{GomiError, Result};
use crate::gomi::inventory::Inventory;
use crate::gomi::record::Record;
use crate::gomi::select::Selector;
use crate::gomi::warn::{self, WarnEvent};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct RestoreOutcome {
    pub record: Record,
    pub destination: PathBuf,
    /// The original location was occupied, so the id was appended.
    pub renamed: bool,
}

fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn vanished(path: &Path) -> bool {
    matches!(fs::symlink_metadata(path), Err(err) if err.kind() == ErrorKind::NotFound)
}

/// Where `record` goes back to without overwriting anything already there.
pub fn resolve_destination(record: &Record) -> (PathBuf, bool) {
    if occupied(&record.source_path) {
        (record.collision_path(), true)
    } else {
        (record.source_path.clone(), false)
    }
}

/// Restores the record picked by `selector` and drops it from the inventory.
///
/// When the move fails, the record is only forgotten if nothing is left at
/// its archive path; otherwise it stays so the restore can be retried. Once
/// the file is back, failing to drop its record is a warning, not an error.
pub fn restore<S>(inventory: &mut Inventory, selector: &mut S) -> Result<RestoreOutcome>
where
    S: Selector + ?Sized,
{
    if inventory.is_empty() {
        return Err(GomiError::EmptyInventory);
    }

    let candidates = inventory.newest_first();
    let index = selector
        .choose(&candidates)?
        .ok_or(GomiError::SelectionCancelled)?;
    let record = candidates
        .get(index)
        .cloned()
        .ok_or(GomiError::InvalidSelection {
            index,
            len: candidates.len(),
        })?;

    let (destination, renamed) = resolve_destination(&record);
    debug!(
        "restoring {} -> {}",
        record.archive_path.display(),
        destination.display()
    );

    if let Err(err) = fs::rename(&record.archive_path, &destination) {
        let move_err = GomiError::Move {
            from: record.archive_path.clone(),
            to: destination,
            source: err,
        };
        if vanished(&record.archive_path) {
            if let Err(cleanup) = inventory.delete_by_id(&record.id) {
                warn::emit(WarnEvent {
                    code: "STALE_RECORD",
                    stage: "restore",
                    action: "inventory-delete",
                    path: &record.archive_path.display().to_string(),
                    reason: "archived-entry-missing",
                    err: &cleanup.to_string(),
                });
            }
        } else {
            debug!(id = %record.id, "keeping record for retry");
        }
        return Err(move_err);
    }

    if let Err(err) = inventory.delete_by_id(&record.id) {
        warn::emit(WarnEvent {
            code: "STALE_RECORD",
            stage: "restore",
            action: "inventory-delete",
            path: &destination.display().to_string(),
            reason: "restored-but-still-recorded",
            err: &err.to_string(),
        });
    }
    Ok(RestoreOutcome {
        record,
        destination,
        renamed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gomi::relocate::{RemoveMode, remove};
    use std::cell::Cell;
    use tempfile::{TempDir, tempdir};

    struct Fixture {
        _tmp: TempDir,
        work: PathBuf,
        archive_root: PathBuf,
        inventory_file: PathBuf,
    }

    fn fixture() -> Fixture {
        let tmp = tempdir().expect("tempdir");
        let work = tmp.path().join("work");
        fs::create_dir_all(&work).expect("mkdir work");
        Fixture {
            archive_root: tmp.path().join("gomi"),
            inventory_file: tmp.path().join("gomi/inventory.json"),
            work,
            _tmp: tmp,
        }
    }

    fn trash(fx: &Fixture, names: &[&str]) -> Vec<PathBuf> {
        let paths = names
            .iter()
            .map(|name| {
                let path = fx.work.join(name);
                fs::write(&path, format!("content of {name}")).expect("write");
                path
            })
            .collect::<Vec<_>>();
        let mut inventory = Inventory::load(&fx.inventory_file);
        remove(&fx.archive_root, &mut inventory, &paths, RemoveMode::Strict).expect("remove");
        paths
    }

    fn pick(name: &'static str) -> impl FnMut(&[Record]) -> Result<Option<usize>> {
        move |records: &[Record]| Ok(records.iter().position(|r| r.name == name))
    }

    #[test]
    fn round_trip_restores_content_and_forgets_record() {
        let fx = fixture();
        let paths = trash(&fx, &["a.txt"]);

        let mut inventory = Inventory::load(&fx.inventory_file);
        let outcome = restore(&mut inventory, &mut pick("a.txt")).expect("restore");

        assert_eq!(outcome.destination, paths[0]);
        assert!(!outcome.renamed);
        assert_eq!(
            fs::read(&paths[0]).expect("read"),
            b"content of a.txt".to_vec()
        );
        assert!(!outcome.record.archive_path.exists());
        assert!(Inventory::load(&fx.inventory_file).is_empty());
    }

    #[test]
    fn occupied_destination_gets_id_suffix() {
        let fx = fixture();
        let paths = trash(&fx, &["a.txt"]);
        fs::write(&paths[0], "newer").expect("write replacement");

        let mut inventory = Inventory::load(&fx.inventory_file);
        let outcome = restore(&mut inventory, &mut pick("a.txt")).expect("restore");

        assert!(outcome.renamed);
        let expected = fx.work.join(format!("a.txt.{}", outcome.record.id));
        assert_eq!(outcome.destination, expected);
        assert_eq!(fs::read_to_string(&paths[0]).expect("read"), "newer");
        assert_eq!(
            fs::read_to_string(&expected).expect("read"),
            "content of a.txt"
        );
    }

    #[test]
    fn empty_inventory_never_consults_selector() {
        let fx = fixture();
        let called = Cell::new(false);
        let mut selector = |_: &[Record]| -> Result<Option<usize>> {
            called.set(true);
            Ok(Some(0))
        };

        let mut inventory = Inventory::load(&fx.inventory_file);
        let err = restore(&mut inventory, &mut selector).unwrap_err();
        assert!(matches!(err, GomiError::EmptyInventory));
        assert!(!called.get());
        assert!(!fx.inventory_file.exists());
    }

    #[test]
    fn cancelled_selection_changes_nothing() {
        let fx = fixture();
        trash(&fx, &["a.txt"]);

        let mut inventory = Inventory::load(&fx.inventory_file);
        let err = restore(&mut inventory, &mut |_: &[Record]| -> Result<Option<usize>> { Ok(None) })
            .unwrap_err();
        assert!(matches!(err, GomiError::SelectionCancelled));

        let reopened = Inventory::load(&fx.inventory_file);
        assert_eq!(reopened.len(), 1);
        assert!(reopened.records()[0].archive_path.exists());
    }

    #[test]
    fn selector_errors_propagate_unchanged() {
        let fx = fixture();
        trash(&fx, &["a.txt"]);

        let mut inventory = Inventory::load(&fx.inventory_file);
        let err = restore(&mut inventory, &mut |_: &[Record]| -> Result<Option<usize>> {
            Err(GomiError::Prompt {
                source: std::io::Error::other("tty closed"),
            })
        })
        .unwrap_err();
        assert!(matches!(err, GomiError::Prompt { .. }));
    }

    #[test]
    fn out_of_range_choice_is_rejected() {
        let fx = fixture();
        trash(&fx, &["a.txt"]);

        let mut inventory = Inventory::load(&fx.inventory_file);
        let err = restore(&mut inventory, &mut |_: &[Record]| -> Result<Option<usize>> { Ok(Some(5)) })
            .unwrap_err();
        assert!(matches!(
            err,
            GomiError::InvalidSelection { index: 5, len: 1 }
        ));
    }

    #[test]
    fn selector_sees_newest_first() {
        let fx = fixture();
        trash(&fx, &["old.txt"]);
        trash(&fx, &["new.txt"]);

        let mut inventory = Inventory::load(&fx.inventory_file);
        let mut seen = Vec::new();
        let _ = restore(&mut inventory, &mut |records: &[Record]| -> Result<Option<usize>> {
            seen = records.iter().map(|r| r.name.clone()).collect();
            Ok(None)
        });
        assert_eq!(seen, vec!["new.txt", "old.txt"]);
    }

    #[test]
    fn failed_move_keeps_record_while_archive_exists() {
        let fx = fixture();
        let paths = trash(&fx, &["a.txt"]);
        fs::remove_dir_all(&fx.work).expect("remove work dir");

        let mut inventory = Inventory::load(&fx.inventory_file);
        let err = restore(&mut inventory, &mut pick("a.txt")).unwrap_err();
        assert!(matches!(err, GomiError::Move { .. }));
        assert!(!paths[0].exists());

        let reopened = Inventory::load(&fx.inventory_file);
        assert_eq!(reopened.len(), 1);
        assert!(reopened.records()[0].archive_path.exists());
    }

    #[test]
    fn failed_move_forgets_record_when_archive_is_gone() {
        let fx = fixture();
        trash(&fx, &["a.txt"]);
        let mut inventory = Inventory::load(&fx.inventory_file);
        fs::remove_file(&inventory.records()[0].archive_path).expect("remove archived");

        let err = restore(&mut inventory, &mut pick("a.txt")).unwrap_err();
        assert!(matches!(err, GomiError::Move { .. }));
        assert!(Inventory::load(&fx.inventory_file).is_empty());
    }

    #[test]
    fn partial_batch_then_restore_one() {
        let fx = fixture();
        let a = fx.work.join("a.txt");
        let b = fx.work.join("b.txt");
        fs::write(&a, "alpha").expect("write a");
        fs::write(&b, "beta").expect("write b");

        let mut inventory = Inventory::load(&fx.inventory_file);
        let err = remove(
            &fx.archive_root,
            &mut inventory,
            &[a.clone(), fx.work.join("missing.txt"), b.clone()],
            RemoveMode::Strict,
        )
        .unwrap_err();
        assert!(err.to_string().contains("missing.txt"));
        assert_eq!(inventory.len(), 2);
        assert!(!a.exists() && !b.exists());

        let mut inventory = Inventory::load(&fx.inventory_file);
        restore(&mut inventory, &mut pick("a.txt")).expect("restore a");
        assert_eq!(fs::read_to_string(&a).expect("read a"), "alpha");
        assert!(!b.exists());

        let remaining = Inventory::load(&fx.inventory_file);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining.records()[0].name, "b.txt");
    }

    #[test]
    fn restored_file_wins_over_inventory_write_failure() {
        let fx = fixture();
        let paths = trash(&fx, &["a.txt"]);
        let mut inventory = Inventory::load(&fx.inventory_file);
        fs::remove_file(&fx.inventory_file).expect("remove inventory");
        fs::create_dir(&fx.inventory_file).expect("block inventory path");

        let outcome = restore(&mut inventory, &mut pick("a.txt")).expect("restore");

        assert_eq!(outcome.destination, paths[0]);
        assert_eq!(
            fs::read_to_string(&paths[0]).expect("read"),
            "content of a.txt"
        );
        assert!(fx.inventory_file.is_dir());
        assert_eq!(inventory.len(), 1);
    }
}
