use thiserror::Error;

/// Errors produced while parsing an OpenAPI document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Document has no root `openapi` field.
    #[error("not an OpenAPI 3.x document (missing 'openapi' field)")]
    UnknownFormat,

    /// YAML/JSON syntax error.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// `$ref` that points nowhere, or outside the document.
    #[error("unresolved $ref: {0}")]
    UnresolvedRef(String),

    /// Structure does not match what OpenAPI 3.x requires.
    #[error("schema error: {0}")]
    Schema(String),
}
