use std::io;
use std::path::PathBuf;

use oas_transform_parser::ParseError;
use thiserror::Error;

/// Errors that abort a run.
///
/// These describe a misconfigured environment rather than bad document
/// content, so no summary is produced once one occurs.
#[derive(Debug, Error)]
pub enum RunError {
    /// The configuration file could not be opened or read.
    #[error("failed to open configuration file {}: {source}", path.display())]
    ConfigOpen { path: PathBuf, source: io::Error },

    /// The documents directory could not be listed.
    #[error("failed to read OAS docs directory {}: {source}", path.display())]
    ReadDir { path: PathBuf, source: io::Error },

    /// A selected document could not be read.
    #[error("failed to read OAS doc file {}: {source}", path.display())]
    ReadDocument { path: PathBuf, source: io::Error },

    /// Writing the run report failed.
    #[error("failed to write report: {0}")]
    Output(#[from] io::Error),
}

/// A document the parser rejected. The run carries on past it.
#[derive(Debug, Error)]
#[error("failed to parse OAS doc file: \"{}\". Error: {source}", path.display())]
pub struct TransformError {
    pub path: PathBuf,
    pub source: ParseError,
}
