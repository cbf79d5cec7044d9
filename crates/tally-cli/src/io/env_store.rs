//! Minimal env-file store: read `KEY=VALUE` lines and upsert single entries
//! without disturbing the rest of the file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(Debug)]
pub struct EnvStore {
    path: PathBuf,
    lines: Vec<String>,
}

impl EnvStore {
    /// Load the file at `path`; a missing file is an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        let lines = match fs::read_to_string(path) {
            Ok(text) => text.lines().map(str::to_string).collect(),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", path.display()));
            }
        };
        Ok(Self { path: path.to_path_buf(), lines })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| {
            let (k, v) = line.split_once('=')?;
            (k.trim() == key).then(|| v.trim())
        })
    }

    /// Insert or replace `key`, rewriting the file.
    pub fn upsert(&mut self, key: &str, value: &str) -> Result<()> {
        let entry = format!("{key}={value}");
        let existing = self.lines.iter_mut().find(|line| {
            line.split_once('=').map(|(k, _)| k.trim() == key).unwrap_or(false)
        });
        match existing {
            Some(line) => *line = entry,
            None => self.lines.push(entry),
        }
        let mut text = self.lines.join("\n");
        text.push('\n');
        fs::write(&self.path, text).with_context(|| format!("writing {}", self.path.display()))
    }
}
