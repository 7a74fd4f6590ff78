use crate::error::{GomiError, Result};
use crate::gomi::id::new_id;
use chrono::{DateTime, Datelike, Local};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// One archived filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub id: String,
    pub group_id: String,
    #[serde(rename = "from")]
    pub source_path: PathBuf,
    #[serde(rename = "to")]
    pub archive_path: PathBuf,
    pub timestamp: DateTime<Local>,
}

impl Record {
    /// Destination used when something already occupies `source_path`.
    pub fn collision_path(&self) -> PathBuf {
        let mut raw = OsString::from(self.source_path.as_os_str());
        raw.push(".");
        raw.push(&self.id);
        PathBuf::from(raw)
    }
}

fn lexical_clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

fn absolute_source(source: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(source).map_err(|err| GomiError::PathResolution {
        path: source.to_path_buf(),
        source: err,
    })?;
    Ok(lexical_clean(&absolute))
}

/// Archive slot for `name`/`id` in `group_id` on the day of `now`.
pub fn archive_path_for(
    archive_root: &Path,
    group_id: &str,
    name: &str,
    id: &str,
    now: DateTime<Local>,
) -> PathBuf {
    archive_root
        .join(format!("{:04}", now.year()))
        .join(format!("{:02}", now.month()))
        .join(format!("{:02}", now.day()))
        .join(group_id)
        .join(format!("{name}.{id}"))
}

/// Builds the record for `source` with a caller-provided id and clock.
///
/// Pure: no filesystem access beyond reading the working directory for
/// relative inputs.
pub fn build_record_at(
    archive_root: &Path,
    group_id: &str,
    source: &Path,
    id: String,
    now: DateTime<Local>,
) -> Result<Record> {
    let source_path = absolute_source(source)?;
    let name = source_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| GomiError::NoFileName {
            path: source.to_path_buf(),
        })?;
    let archive_path = archive_path_for(archive_root, group_id, &name, &id, now);

    Ok(Record {
        name,
        id,
        group_id: group_id.to_string(),
        source_path,
        archive_path,
        timestamp: now,
    })
}

pub fn build_record(archive_root: &Path, group_id: &str, source: &Path) -> Result<Record> {
    build_record_at(archive_root, group_id, source, new_id(), Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2020, 1, 6, 9, 30, 0)
            .single()
            .expect("unambiguous local time")
    }

    #[test]
    fn archive_path_is_date_and_group_partitioned() {
        let record = build_record_at(
            Path::new("/trash"),
            "grp1",
            Path::new("/work/src/file.go"),
            "id42".to_string(),
            fixed_now(),
        )
        .expect("record");

        assert_eq!(record.name, "file.go");
        assert_eq!(record.source_path, PathBuf::from("/work/src/file.go"));
        assert_eq!(
            record.archive_path,
            PathBuf::from("/trash/2020/01/06/grp1/file.go.id42")
        );
        assert_eq!(record.group_id, "grp1");
        assert_eq!(record.timestamp, fixed_now());
    }

    #[test]
    fn path_derivation_is_deterministic() {
        let build = || {
            build_record_at(
                Path::new("/trash"),
                "grp",
                Path::new("/a/b/../c/./d.txt"),
                "same".to_string(),
                fixed_now(),
            )
            .expect("record")
        };
        let first = build();
        assert_eq!(first, build());
        assert_eq!(first.source_path, PathBuf::from("/a/c/d.txt"));
    }

    #[test]
    fn relative_sources_resolve_against_cwd() {
        let record = build_record(Path::new("/trash"), "grp", Path::new("notes.md"))
            .expect("record");
        let cwd = std::env::current_dir().expect("cwd");
        assert_eq!(record.source_path, cwd.join("notes.md"));
        assert!(record.archive_path.starts_with("/trash"));
        assert!(
            record
                .archive_path
                .to_string_lossy()
                .ends_with(&format!("/grp/notes.md.{}", record.id))
        );
    }

    #[test]
    fn trailing_slash_keeps_directory_name() {
        let record = build_record_at(
            Path::new("/trash"),
            "grp",
            Path::new("/work/build/"),
            "x".to_string(),
            fixed_now(),
        )
        .expect("record");
        assert_eq!(record.name, "build");
    }

    #[test]
    fn root_has_no_file_name() {
        let err = build_record(Path::new("/trash"), "grp", Path::new("/")).unwrap_err();
        assert!(matches!(err, GomiError::NoFileName { .. }));
    }

    #[test]
    fn collision_path_appends_id() {
        let record = build_record_at(
            Path::new("/trash"),
            "grp",
            Path::new("/home/u/a.txt"),
            "01ABC".to_string(),
            fixed_now(),
        )
        .expect("record");
        assert_eq!(
            record.collision_path(),
            PathBuf::from("/home/u/a.txt.01ABC")
        );
    }
}
