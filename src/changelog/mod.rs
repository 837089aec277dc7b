//! Changelog rendering and splicing

pub mod render;
pub mod splice;

pub use render::{bullet, render, ChangelogGroup, ChangelogSection};
pub use splice::{splice, splice_markdown};

use crate::config::ChangelogConfig;
use crate::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read the changelog at `path`, `None` when it does not exist
pub fn read_document(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// New contents for the changelog under `root`, without touching the file
pub fn prepare_update(root: &Path, section: &ChangelogSection, config: &ChangelogConfig) -> Result<String> {
    let document = read_document(&root.join(&config.path))?;
    splice(document.as_deref(), section, config)
}
