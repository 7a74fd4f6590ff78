#![allow(dead_code)]

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

pub struct Sandbox {
    _tmp: TempDir,
    pub home: PathBuf,
    pub gomi_home: PathBuf,
    pub work: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let tmp = tempdir().expect("tempdir");
        let home = tmp.path().join("home");
        let work = tmp.path().join("work");
        fs::create_dir_all(&home).expect("mkdir home");
        fs::create_dir_all(&work).expect("mkdir work");
        Self {
            gomi_home: home.join(".gomi"),
            home,
            work,
            _tmp: tmp,
        }
    }

    pub fn gomi(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("gomi");
        cmd.current_dir(&self.work)
            .env("HOME", &self.home)
            .env("GOMI_HOME", &self.gomi_home)
            .env_remove("GOMI_LOG")
            .env_remove("GOMI_ARCHIVE_DIR")
            .env_remove("GOMI_INVENTORY_PATH")
            .env_remove("GOMI_CONFIG_PATH");
        cmd
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.work.join(name);
        fs::write(&path, content).expect("write work file");
        path
    }

    pub fn inventory_file(&self) -> PathBuf {
        self.gomi_home.join("inventory.json")
    }

    /// Records from the inventory file; empty when it does not exist.
    pub fn records(&self) -> Vec<Value> {
        let path = self.inventory_file();
        if !path.exists() {
            return Vec::new();
        }
        let raw = fs::read_to_string(&path).expect("read inventory");
        let doc: Value = serde_json::from_str(&raw).expect("parse inventory");
        doc["files"].as_array().cloned().unwrap_or_default()
    }

    pub fn record_names(&self) -> Vec<String> {
        let mut names = self
            .records()
            .iter()
            .map(|r| r["name"].as_str().expect("name").to_string())
            .collect::<Vec<_>>();
        names.sort();
        names
    }
}

pub fn archive_path(record: &Value) -> &Path {
    Path::new(record["to"].as_str().expect("to"))
}
