//! The transform pipeline.
//!
//! Loads the configuration, selects documents, then reads, sanitizes and
//! parses each one in listing order. Parse failures are reported and
//! skipped; I/O failures end the run.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use oas_transform_parser::{parse_document, ApiDocument, ParseError};
use oas_transform_telemetry::{
    log_config_loaded, log_control_character_stripped, log_document_rejected,
    log_document_transformed, log_run_completed, log_run_started,
};

use crate::config::{self, DEFAULT_CONFIG_PATH};
use crate::error::{RunError, TransformError};
use crate::report::ConsoleReport;
use crate::sanitizer::sanitize;
use crate::selector::{self, CandidateFile, DEFAULT_DOCS_DIR};

/// Turns document bytes into an [`ApiDocument`].
pub trait SpecParser {
    fn parse(&self, bytes: &[u8]) -> Result<ApiDocument, ParseError>;
}

/// The OpenAPI 3.x parser from `oas-transform-parser`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenApiParser;

impl SpecParser for OpenApiParser {
    fn parse(&self, bytes: &[u8]) -> Result<ApiDocument, ParseError> {
        parse_document(bytes)
    }
}

/// Where to find inputs and what to print.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config_path: PathBuf,
    pub docs_dir: PathBuf,
    /// Print each parsed document's servers and operations.
    pub show_endpoints: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            docs_dir: PathBuf::from(DEFAULT_DOCS_DIR),
            show_endpoints: false,
        }
    }
}

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files found in the docs directory.
    pub listed: usize,
    /// Files that passed the filter.
    pub candidates: usize,
    /// Candidates the parser accepted.
    pub transformed: usize,
    /// Candidates the parser rejected.
    pub failed: usize,
    /// Operations across all accepted documents.
    pub endpoints: usize,
}

pub struct Runner<P> {
    options: RunOptions,
    parser: P,
}

impl<P: SpecParser> Runner<P> {
    pub fn new(options: RunOptions, parser: P) -> Self {
        Self { options, parser }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Run the pipeline, writing the report to `out`.
    ///
    /// An empty docs directory is a successful run with nothing to do.
    pub fn run<W: Write>(&self, out: W) -> Result<RunSummary, RunError> {
        log_run_started!(
            config = %self.options.config_path.display(),
            docs_dir = %self.options.docs_dir.display(),
            "starting run"
        );

        let config = config::load(&self.options.config_path)?;
        log_config_loaded!(
            whitelist = config.whitelist.len(),
            ignore_files = config.ignore_files.len(),
            "configuration loaded"
        );

        let selection = selector::select(&self.options.docs_dir, &config)?;
        let mut report = ConsoleReport::new(out);
        let mut summary = RunSummary {
            listed: selection.len(),
            ..RunSummary::default()
        };

        if selection.is_empty() {
            report.no_documents()?;
            report.flush()?;
            log_run_completed!(listed = 0, "no documents found");
            return Ok(summary);
        }

        report.listing(&selection)?;
        summary.candidates = selection.selected_count();
        report.total(summary.candidates)?;

        for file in selection.selected() {
            self.process(file, &mut report, &mut summary)?;
        }

        report.summary(&summary)?;
        report.flush()?;

        log_run_completed!(
            listed = summary.listed,
            candidates = summary.candidates,
            transformed = summary.transformed,
            failed = summary.failed,
            endpoints = summary.endpoints,
            "run completed"
        );
        Ok(summary)
    }

    /// Read, sanitize and parse one document.
    fn process<W: Write>(
        &self,
        file: &CandidateFile,
        report: &mut ConsoleReport<W>,
        summary: &mut RunSummary,
    ) -> Result<(), RunError> {
        let raw = fs::read(&file.path).map_err(|source| RunError::ReadDocument {
            path: file.path.clone(),
            source,
        })?;

        let sanitized = sanitize(&raw);
        for removed in sanitized.report.iter() {
            log_control_character_stripped!(
                path = %file.path.display(),
                character = %removed.quoted(),
                offset = removed.offset
            );
            report.control_character(&file.path, removed)?;
        }

        match self.parser.parse(&sanitized.bytes) {
            Ok(doc) => {
                let endpoints = doc.endpoint_count();
                summary.transformed += 1;
                summary.endpoints += endpoints;
                log_document_transformed!(
                    path = %file.path.display(),
                    title = %doc.info.title,
                    endpoints,
                    "document transformed"
                );
                report.transformed(&file.path)?;
                if self.options.show_endpoints {
                    report.endpoints(&doc)?;
                }
            }
            Err(source) => {
                summary.failed += 1;
                let error = TransformError {
                    path: file.path.clone(),
                    source,
                };
                log_document_rejected!(
                    path = %file.path.display(),
                    error = %error.source,
                    "document rejected"
                );
                report.rejected(&error)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::Path;
    use tempfile::TempDir;

    const PETSTORE: &str = r#"
openapi: "3.0.0"
info:
  title: Petstore
  version: "1.0.0"
paths:
  /pets:
    get: {}
    post: {}
  /pets/{id}:
    get: {}
"#;

    const HEALTH: &str = r#"{"openapi": "3.1.0", "info": {"title": "Health"}, "paths": {"/health": {"get": {}}}}"#;

    struct Workspace {
        dir: TempDir,
    }

    impl Workspace {
        fn new(config: &str) -> Self {
            let dir = TempDir::new().unwrap();
            fs::write(dir.path().join("config.json"), config).unwrap();
            fs::create_dir(dir.path().join("docs")).unwrap();
            Self { dir }
        }

        fn doc(&self, name: &str, content: impl AsRef<[u8]>) -> &Self {
            fs::write(self.docs().join(name), content).unwrap();
            self
        }

        fn docs(&self) -> PathBuf {
            self.dir.path().join("docs")
        }

        fn path(&self, name: &str) -> String {
            self.docs().join(name).display().to_string()
        }

        fn options(&self) -> RunOptions {
            RunOptions {
                config_path: self.dir.path().join("config.json"),
                docs_dir: self.docs(),
                show_endpoints: false,
            }
        }

        fn run_with<P: SpecParser>(
            &self,
            options: RunOptions,
            parser: P,
        ) -> (Result<RunSummary, RunError>, String) {
            let mut buf = Vec::new();
            let result = Runner::new(options, parser).run(&mut buf);
            (result, String::from_utf8(buf).unwrap())
        }

        fn run(&self) -> (RunSummary, String) {
            let (result, output) = self.run_with(self.options(), OpenApiParser);
            (result.unwrap(), output)
        }
    }

    /// Records what it was given and accepts everything.
    #[derive(Default)]
    struct RecordingParser {
        seen: RefCell<Vec<Vec<u8>>>,
    }

    impl SpecParser for &RecordingParser {
        fn parse(&self, bytes: &[u8]) -> Result<ApiDocument, ParseError> {
            self.seen.borrow_mut().push(bytes.to_vec());
            parse_document(br#"{"openapi": "3.0.0", "info": {"title": "stub"}}"#)
        }
    }

    #[test]
    fn full_run_reports_in_order() {
        let ws = Workspace::new(r#"{"ignoreFiles": ["b.json"]}"#);
        ws.doc("a.yaml", PETSTORE)
            .doc("b.json", HEALTH)
            .doc("c.json", HEALTH);

        let (summary, output) = ws.run();
        let expected = format!(
            "OAS docs to transform:\n\
{a}\n\
{b} (Ignored)\n\
{c}\n\
Total OAS doc files to transform: 2\n\
Successfully transformed OAS doc file: {a}\n\
Successfully transformed OAS doc file: {c}\n\
Successfully transformed 2 OAS doc files!\n\
Total API Endpoints transformed: 4\n",
            a = ws.path("a.yaml"),
            b = ws.path("b.json"),
            c = ws.path("c.json"),
        );
        assert_eq!(output, expected);
        assert_eq!(
            summary,
            RunSummary {
                listed: 3,
                candidates: 2,
                transformed: 2,
                failed: 0,
                endpoints: 4,
            }
        );
    }

    #[test]
    fn whitelist_marks_everything_else_ignored() {
        let ws = Workspace::new(r#"{"whitelist": ["a.json"], "ignoreFiles": ["a.json"]}"#);
        ws.doc("a.json", HEALTH).doc("b.json", HEALTH);

        let (summary, output) = ws.run();
        assert!(output.contains(&format!("{} (Ignored)\n", ws.path("b.json"))));
        assert!(output.contains(&format!("Successfully transformed OAS doc file: {}\n", ws.path("a.json"))));
        assert_eq!(summary.candidates, 1);
        assert_eq!(summary.transformed, 1);
    }

    #[test]
    fn config_with_trailing_bytes_still_filters() {
        let ws = Workspace::new(r#"{"ignoreFiles": ["b.json"]}}"#);
        ws.doc("a.json", HEALTH).doc("b.json", HEALTH);

        let (summary, output) = ws.run();
        assert!(output.contains(&format!("{} (Ignored)\n", ws.path("b.json"))));
        assert_eq!(summary.candidates, 1);
    }

    #[test]
    fn empty_directory_short_circuits() {
        let ws = Workspace::new("{}");
        let (summary, output) = ws.run();
        assert_eq!(output, "No OAS doc files found.\n");
        assert_eq!(summary, RunSummary::default());
    }

    #[test]
    fn everything_filtered_still_summarizes() {
        let ws = Workspace::new(r#"{"ignoreFiles": ["a.json"]}"#);
        ws.doc("a.json", HEALTH);

        let (summary, output) = ws.run();
        assert!(output.contains("Total OAS doc files to transform: 0\n"));
        assert!(output.ends_with(
            "Successfully transformed 0 OAS doc files!\nTotal API Endpoints transformed: 0\n"
        ));
        assert_eq!(summary.listed, 1);
        assert_eq!(summary.candidates, 0);
    }

    #[test]
    fn parse_failures_are_reported_and_skipped() {
        let ws = Workspace::new("{}");
        ws.doc("a.yaml", "openapi: [broken")
            .doc("b.yaml", "swagger: \"2.0\"\n")
            .doc("c.yaml", PETSTORE);

        let (summary, output) = ws.run();
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[5].starts_with(&format!(
            "failed to parse OAS doc file: \"{}\". Error: syntax error:",
            ws.path("a.yaml")
        )));
        assert_eq!(
            lines[6],
            format!(
                "failed to parse OAS doc file: \"{}\". Error: not an OpenAPI 3.x document (missing 'openapi' field)",
                ws.path("b.yaml")
            )
        );
        assert_eq!(
            lines[7],
            format!("Successfully transformed OAS doc file: {}", ws.path("c.yaml"))
        );
        assert_eq!(summary.candidates, 3);
        assert_eq!(summary.transformed, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.endpoints, 3);
    }

    #[test]
    fn control_characters_are_reported_before_the_outcome() {
        let ws = Workspace::new("{}");
        let doc = HEALTH.replace("Health", "Hea\u{1}lth\u{2}");
        ws.doc("a.json", doc);

        let (summary, output) = ws.run();
        let path = ws.path("a.json");
        let expected_tail = format!(
            "Matched Control character: \"\\x01\" in OAS file: {path}\n\
Matched Control character: \"\\x02\" in OAS file: {path}\n\
Successfully transformed OAS doc file: {path}\n"
        );
        assert!(output.contains(&expected_tail), "output was:\n{}", output);
        assert_eq!(summary.transformed, 1);
    }

    #[test]
    fn parser_receives_sanitized_bytes() {
        let ws = Workspace::new("{}");
        ws.doc("a.json", b"AB\x01CD\tEF\x02");

        let parser = RecordingParser::default();
        let (result, _) = ws.run_with(ws.options(), &parser);
        assert_eq!(result.unwrap().transformed, 1);
        assert_eq!(parser.seen.borrow().as_slice(), &[b"ABCD\tEF".to_vec()]);
    }

    #[test]
    fn repeated_runs_do_not_share_counters() {
        let ws = Workspace::new("{}");
        ws.doc("a.yaml", PETSTORE);

        let (first, _) = ws.run();
        let (second, _) = ws.run();
        assert_eq!(first, second);
        assert_eq!(second.endpoints, 3);
    }

    #[test]
    fn show_endpoints_dumps_after_success_line() {
        let ws = Workspace::new("{}");
        ws.doc("a.yaml", PETSTORE);

        let options = RunOptions {
            show_endpoints: true,
            ..ws.options()
        };
        let (result, output) = ws.run_with(options, OpenApiParser);
        result.unwrap();
        let success = output
            .find("Successfully transformed OAS doc file:")
            .unwrap();
        let title = output.find("Title: Petstore").unwrap();
        assert!(success < title);
        assert!(output.contains("\tURI: /pets/{id}\n"));
    }

    #[test]
    fn missing_config_is_fatal() {
        let ws = Workspace::new("{}");
        let options = RunOptions {
            config_path: ws.dir.path().join("absent.json"),
            ..ws.options()
        };
        let (result, output) = ws.run_with(options, OpenApiParser);
        assert!(matches!(result, Err(RunError::ConfigOpen { .. })));
        assert!(output.is_empty());
    }

    #[test]
    fn missing_docs_dir_is_fatal() {
        let ws = Workspace::new("{}");
        let options = RunOptions {
            docs_dir: ws.dir.path().join("nowhere"),
            ..ws.options()
        };
        let (result, output) = ws.run_with(options, OpenApiParser);
        assert!(matches!(result, Err(RunError::ReadDir { .. })));
        assert!(output.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_filename_is_read_and_transformed() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let ws = Workspace::new("{}");
        fs::write(ws.docs().join(OsStr::from_bytes(b"bad\xffname.json")), HEALTH).unwrap();

        let (summary, output) = ws.run();
        assert_eq!(summary.transformed, 1);
        assert!(output.contains("Successfully transformed 1 OAS doc files!\n"));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_document_is_fatal_and_skips_summary() {
        let ws = Workspace::new("{}");
        ws.doc("a.yaml", PETSTORE);
        std::os::unix::fs::symlink(Path::new("/nonexistent/target"), ws.docs().join("b.yaml"))
            .unwrap();

        let (result, output) = ws.run_with(ws.options(), OpenApiParser);
        match result {
            Err(RunError::ReadDocument { path, .. }) => assert_eq!(path, ws.docs().join("b.yaml")),
            other => panic!("expected ReadDocument error, got {:?}", other),
        }
        assert!(output.contains(&format!("Successfully transformed OAS doc file: {}", ws.path("a.yaml"))));
        assert!(!output.contains("Total API Endpoints transformed"));
    }
}
