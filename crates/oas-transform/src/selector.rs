//! Directory listing and whitelist/ignore-list filtering.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use oas_transform_telemetry::log_document_selected;

use crate::config::Configuration;
use crate::error::RunError;

/// Default documents directory, relative to the working directory.
pub const DEFAULT_DOCS_DIR: &str = "./docs";

/// A document file found in the docs directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// The bare filename, as matched against the configuration.
    pub name: String,
    /// The file's path under the docs directory.
    pub path: PathBuf,
}

/// Whether a listed file goes on to be processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Included,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry {
    pub file: CandidateFile,
    pub decision: Decision,
}

/// Every listed file with its filter decision, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub entries: Vec<ListedEntry>,
}

impl Selection {
    /// True when the directory held no files at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Files to process, in listing order.
    pub fn selected(&self) -> impl Iterator<Item = &CandidateFile> {
        self.entries
            .iter()
            .filter(|e| e.decision == Decision::Included)
            .map(|e| &e.file)
    }

    pub fn selected_count(&self) -> usize {
        self.selected().count()
    }
}

/// Decide whether `filename` is processed under `config`.
///
/// A non-empty whitelist wins outright; the ignore list is then not consulted.
pub fn decide(filename: &str, config: &Configuration) -> Decision {
    let included = if config.has_whitelist() {
        config.is_whitelisted(filename)
    } else {
        !config.is_ignored(filename)
    };

    if included {
        Decision::Included
    } else {
        Decision::Ignored
    }
}

/// List the files in `directory` (non-recursive, sorted by filename) and
/// apply the configuration's filter to each.
///
/// Subdirectories are skipped.
pub fn select(directory: &Path, config: &Configuration) -> Result<Selection, RunError> {
    let read_dir_error = |source: io::Error| RunError::ReadDir {
        path: directory.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(directory).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        // The lossy name is only for matching and display; reads use the real path.
        let path = entry.path();
        if path.is_dir() {
            tracing::debug!(path = %path.display(), "skipping subdirectory");
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        files.push(CandidateFile { name, path });
    }
    files.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));

    let entries = files
        .into_iter()
        .map(|file| {
            let decision = decide(&file.name, config);
            let included = decision == Decision::Included;
            log_document_selected!(file = %file.name, included);
            ListedEntry { file, decision }
        })
        .collect();

    Ok(Selection { entries })
}
