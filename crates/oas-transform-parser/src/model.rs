use std::fmt;

use serde::{Deserialize, Serialize};

/// A parsed OpenAPI document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiDocument {
    /// The `openapi` version string (e.g. "3.0.3").
    pub openapi: String,
    /// The `info` block.
    pub info: Info,
    /// Declared servers, in document order.
    pub servers: Vec<Server>,
    /// Path items, ordered by path template.
    pub paths: Vec<PathItem>,
}

impl ApiDocument {
    /// Total number of operations across all paths.
    pub fn endpoint_count(&self) -> usize {
        self.paths.iter().map(|p| p.operations.len()).sum()
    }
}

/// The `info` block of a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    /// The API version (`info.version`), not the OpenAPI version.
    pub version: String,
    pub description: Option<String>,
}

/// A `servers` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
    pub description: Option<String>,
}

/// A path template and the operations declared on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathItem {
    /// The path template (e.g. "/users/{id}").
    pub path: String,
    /// Path-level parameters, inherited by every operation.
    pub parameters: Vec<Parameter>,
    /// Operations in [`HttpMethod::ALL`] order.
    pub operations: Vec<Operation>,
}

/// A single operation (path + method).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    pub method: HttpMethod,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub deprecated: bool,
    /// Path-level parameters followed by operation-level ones.
    pub parameters: Vec<Parameter>,
}

/// A path, query, header or cookie parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    /// The `in` field.
    pub location: String,
    pub required: bool,
}

/// HTTP methods recognized on a path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    /// Every method, in the order operations are reported.
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Trace,
    ];

    /// The lowercase key used in a path item object.
    pub fn key(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
