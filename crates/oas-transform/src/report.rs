//! Console report written to stdout.
//!
//! Line order: directory listing, total, per-document outcome, summary.

use std::io::{self, Write};
use std::path::Path;

use oas_transform_parser::{ApiDocument, Parameter};

use crate::error::TransformError;
use crate::runner::RunSummary;
use crate::sanitizer::RemovedChar;
use crate::selector::{Decision, Selection};

/// Writes the run report line by line.
pub struct ConsoleReport<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn no_documents(&mut self) -> io::Result<()> {
        writeln!(self.out, "No OAS doc files found.")
    }

    /// One line per listed file; excluded files carry an `(Ignored)` suffix.
    pub fn listing(&mut self, selection: &Selection) -> io::Result<()> {
        writeln!(self.out, "OAS docs to transform:")?;
        for entry in &selection.entries {
            match entry.decision {
                Decision::Included => writeln!(self.out, "{}", entry.file.path.display())?,
                Decision::Ignored => {
                    writeln!(self.out, "{} (Ignored)", entry.file.path.display())?
                }
            }
        }
        Ok(())
    }

    pub fn total(&mut self, count: usize) -> io::Result<()> {
        writeln!(self.out, "Total OAS doc files to transform: {}", count)
    }

    pub fn control_character(&mut self, path: &Path, removed: &RemovedChar) -> io::Result<()> {
        writeln!(
            self.out,
            "Matched Control character: {} in OAS file: {}",
            removed.quoted(),
            path.display()
        )
    }

    pub fn transformed(&mut self, path: &Path) -> io::Result<()> {
        writeln!(
            self.out,
            "Successfully transformed OAS doc file: {}",
            path.display()
        )
    }

    pub fn rejected(&mut self, error: &TransformError) -> io::Result<()> {
        writeln!(self.out, "{}", error)
    }

    /// Dump a document's info block, servers and operations.
    pub fn endpoints(&mut self, doc: &ApiDocument) -> io::Result<()> {
        writeln!(self.out, "Title: {}", doc.info.title)?;
        writeln!(self.out, "API Version: {}", doc.info.version)?;
        writeln!(self.out, "OpenAPI version: {}", doc.openapi)?;

        writeln!(self.out, "Servers:")?;
        for server in &doc.servers {
            writeln!(self.out, "\tURL: {}", server.url)?;
            writeln!(
                self.out,
                "\tDescription: {}",
                server.description.as_deref().unwrap_or_default()
            )?;
        }

        writeln!(self.out, "Paths:")?;
        for item in &doc.paths {
            writeln!(self.out, "\tURI: {}", item.path)?;
            writeln!(self.out, "\t\tGlobal Parameters:")?;
            self.parameters(&item.parameters, 3)?;

            for op in &item.operations {
                writeln!(self.out, "\t\t{}:", op.method)?;
                writeln!(self.out, "\t\t\tParameters:")?;
                self.parameters(&op.parameters, 4)?;
            }
        }
        Ok(())
    }

    fn parameters(&mut self, params: &[Parameter], depth: usize) -> io::Result<()> {
        let indent = "\t".repeat(depth);
        for p in params {
            writeln!(self.out, "{}Name: {}, Type: {}", indent, p.name, p.location)?;
        }
        Ok(())
    }

    pub fn summary(&mut self, summary: &RunSummary) -> io::Result<()> {
        writeln!(
            self.out,
            "Successfully transformed {} OAS doc files!",
            summary.transformed
        )?;
        writeln!(
            self.out,
            "Total API Endpoints transformed: {}",
            summary.endpoints
        )
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
