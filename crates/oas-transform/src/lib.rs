//! Batch transform of OpenAPI documents.
//!
//! Lists a docs directory, filters it through a whitelist or ignore list,
//! strips control characters from each selected document and hands the
//! result to an OpenAPI parser, reporting per-file outcomes and totals.

pub mod config;
pub mod error;
pub mod report;
pub mod runner;
pub mod sanitizer;
pub mod selector;

pub use config::{Configuration, DEFAULT_CONFIG_PATH};
pub use error::{RunError, TransformError};
pub use runner::{OpenApiParser, RunOptions, RunSummary, Runner, SpecParser};
pub use sanitizer::{sanitize, RemovedChar, SanitizationReport, Sanitized};
pub use selector::{select, CandidateFile, Decision, Selection, DEFAULT_DOCS_DIR};
