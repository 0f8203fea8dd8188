//! Shared helpers for the CLI integration tests.
//!
//! Every [`TestProject`] gets its own temporary home directory so the default
//! configuration path never touches the real `~/.expander`.

#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Epoch milliseconds of `2020-05-05T16:52:02.346Z`.
pub const FIXTURE_MILLIS: i64 = 1_588_697_522_346;

/// Isolated working and home directories for one test.
pub struct TestProject {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    project_dir: PathBuf,
    home_dir: PathBuf,
}

impl TestProject {
    /// Create empty project and home directories.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("project");
        let home_dir = temp_dir.path().join("home");

        fs::create_dir_all(&project_dir)?;
        fs::create_dir_all(&home_dir)?;

        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
            home_dir,
        })
    }

    /// Get the project directory path
    pub fn project_path(&self) -> &Path {
        &self.project_dir
    }

    /// Write `~/.expander/config.toml` in the test home directory.
    pub fn write_home_config(&self, content: &str) -> Result<PathBuf> {
        let dir = self.home_dir.join(".expander");
        fs::create_dir_all(&dir)?;
        let path = dir.join("config.toml");
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Write a file relative to the project directory.
    pub fn write_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.project_dir.join(name);
        fs::write(&path, content)?;
        Ok(path)
    }

    /// The `expand` binary, run in the project directory with the test home.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("expand").expect("expand binary is built");
        cmd.current_dir(&self.project_dir)
            .env("HOME", &self.home_dir)
            .env("NO_COLOR", "1")
            .env_remove("EXPANDER_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }

    /// `expand render <args...>` in UTC.
    pub fn render(&self, args: &[&str]) -> Command {
        let mut cmd = self.command();
        cmd.args(["render", "--zone", "UTC"]).args(args);
        cmd
    }
}
