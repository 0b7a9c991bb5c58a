//! OpenAPI 3.x document parser.
//!
//! Reads YAML/JSON documents and extracts the parts the transform pipeline
//! reports on: `info`, `servers`, and the `paths` to operations mapping.
//! Local `$ref` pointers on path items and parameters are resolved.

pub mod error;
pub mod model;
pub mod parser;

pub use error::ParseError;
pub use model::{ApiDocument, HttpMethod, Info, Operation, Parameter, PathItem, Server};
pub use parser::{parse_document, parse_document_str};
