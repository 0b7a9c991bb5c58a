use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::model::{ApiDocument, HttpMethod, Info, Operation, Parameter, PathItem, Server};

/// Parse an OpenAPI document from raw bytes (YAML or JSON).
pub fn parse_document(input: &[u8]) -> Result<ApiDocument, ParseError> {
    let root = decode(input)?;
    build_document(&root)
}

/// Parse an OpenAPI document from a YAML/JSON string.
pub fn parse_document_str(input: &str) -> Result<ApiDocument, ParseError> {
    parse_document(input.as_bytes())
}

/// Decode the document tree. JSON input goes through `serde_json` directly,
/// everything else through the YAML decoder.
fn decode(input: &[u8]) -> Result<Value, ParseError> {
    let looks_like_json = input
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{');

    if looks_like_json {
        if let Ok(value) = serde_json::from_slice(input) {
            return Ok(value);
        }
    }

    let yaml: serde_yaml::Value =
        serde_yaml::from_slice(input).map_err(|e| ParseError::Syntax(e.to_string()))?;
    yaml_to_json(yaml)
}

/// Convert a YAML tree to JSON. Scalar mapping keys (e.g. unquoted `200:`
/// response codes) are turned into strings.
fn yaml_to_json(value: serde_yaml::Value) -> Result<Value, ParseError> {
    use serde_yaml::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(seq) => Value::Array(
            seq.into_iter()
                .map(yaml_to_json)
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut obj = Map::with_capacity(mapping.len());
            for (key, val) in mapping {
                let key = match key {
                    Yaml::String(s) => s,
                    Yaml::Number(n) => n.to_string(),
                    Yaml::Bool(b) => b.to_string(),
                    Yaml::Null => "null".to_string(),
                    other => {
                        return Err(ParseError::Syntax(format!(
                            "unsupported mapping key: {:?}",
                            other
                        )))
                    }
                };
                obj.insert(key, yaml_to_json(val)?);
            }
            Value::Object(obj)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn build_document(root: &Value) -> Result<ApiDocument, ParseError> {
    let root_obj = root
        .as_object()
        .ok_or_else(|| ParseError::Syntax("document root must be an object".into()))?;

    let openapi = detect_version(root_obj)?;

    let info_obj = root_obj
        .get("info")
        .and_then(|v| v.as_object())
        .ok_or_else(|| ParseError::Schema("missing 'info' object".into()))?;

    let title = info_obj
        .get("title")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ParseError::Schema("missing 'info.title'".into()))?
        .to_string();

    let info = Info {
        title,
        version: info_obj
            .get("version")
            .and_then(|v| v.as_str())
            .unwrap_or("0.0.0")
            .to_string(),
        description: string_field(info_obj, "description"),
    };

    Ok(ApiDocument {
        openapi,
        info,
        servers: parse_servers(root_obj),
        paths: parse_paths(root_obj, root)?,
    })
}

/// Check the root `openapi` field and return its version string.
fn detect_version(root: &Map<String, Value>) -> Result<String, ParseError> {
    let version = root
        .get("openapi")
        .and_then(|v| v.as_str())
        .ok_or(ParseError::UnknownFormat)?;

    if !version.starts_with("3.") {
        return Err(ParseError::Schema(format!(
            "unsupported OpenAPI version: {} (only 3.x supported)",
            version
        )));
    }
    Ok(version.to_string())
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(|v| v.as_str()).map(|s| s.to_string())
}

fn parse_servers(root: &Map<String, Value>) -> Vec<Server> {
    root.get("servers")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|item| {
                    let obj = item.as_object()?;
                    Some(Server {
                        url: obj.get("url")?.as_str()?.to_string(),
                        description: string_field(obj, "description"),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Parse `paths` into path items, one operation per recognized method.
fn parse_paths(root: &Map<String, Value>, doc: &Value) -> Result<Vec<PathItem>, ParseError> {
    let paths = match root.get("paths").and_then(|v| v.as_object()) {
        Some(p) => p,
        None => return Ok(Vec::new()), // No paths is valid (empty API)
    };

    let mut items = Vec::with_capacity(paths.len());
    for (path, raw_item) in paths {
        let path_item = follow_refs(raw_item, doc)?;
        let path_obj = path_item.as_object().ok_or_else(|| {
            ParseError::Schema(format!("path item for '{}' must be an object", path))
        })?;

        let path_params = parse_parameters(path_obj, doc)?;

        let mut operations = Vec::new();
        for method in HttpMethod::ALL {
            let Some(op_value) = path_obj.get(method.key()) else {
                continue;
            };
            let op_obj = op_value.as_object().ok_or_else(|| {
                ParseError::Schema(format!("operation {} {} must be an object", method, path))
            })?;

            let parameters = merge_parameters(&path_params, parse_parameters(op_obj, doc)?);

            operations.push(Operation {
                method,
                operation_id: string_field(op_obj, "operationId"),
                summary: string_field(op_obj, "summary"),
                deprecated: op_obj
                    .get("deprecated")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false),
                parameters,
            });
        }

        items.push(PathItem {
            path: path.clone(),
            parameters: path_params,
            operations,
        });
    }

    Ok(items)
}

/// Path-level parameters followed by operation-level ones. An operation
/// parameter with the same `name` and `in` replaces the path-level entry.
fn merge_parameters(path_params: &[Parameter], op_params: Vec<Parameter>) -> Vec<Parameter> {
    let mut merged: Vec<Parameter> = path_params
        .iter()
        .filter(|p| {
            !op_params
                .iter()
                .any(|o| o.name == p.name && o.location == p.location)
        })
        .cloned()
        .collect();
    merged.extend(op_params);
    merged
}

/// Parse `parameters` from a path item or operation object.
///
/// Entries without a `name` or `in` are skipped.
fn parse_parameters(obj: &Map<String, Value>, doc: &Value) -> Result<Vec<Parameter>, ParseError> {
    let Some(arr) = obj.get("parameters").and_then(|v| v.as_array()) else {
        return Ok(Vec::new());
    };

    let mut params = Vec::with_capacity(arr.len());
    for item in arr {
        let resolved = follow_refs(item, doc)?;
        let Some(param_obj) = resolved.as_object() else {
            continue;
        };
        let (Some(name), Some(location)) = (
            param_obj.get("name").and_then(|v| v.as_str()),
            param_obj.get("in").and_then(|v| v.as_str()),
        ) else {
            continue;
        };
        params.push(Parameter {
            name: name.to_string(),
            location: location.to_string(),
            required: param_obj
                .get("required")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        });
    }
    Ok(params)
}

/// Follow a chain of `$ref` objects until a concrete value is reached.
fn follow_refs<'a>(value: &'a Value, doc: &'a Value) -> Result<&'a Value, ParseError> {
    let mut current = value;
    let mut visited = HashSet::new();

    while let Some(ref_str) = current.get("$ref").and_then(|v| v.as_str()) {
        if !visited.insert(ref_str) {
            return Err(ParseError::Schema(format!(
                "circular $ref detected: {}",
                ref_str
            )));
        }
        current =
            resolve_ref(doc, ref_str).ok_or_else(|| ParseError::UnresolvedRef(ref_str.into()))?;
    }
    Ok(current)
}

/// Resolve a JSON Reference like `#/components/parameters/Limit` from the document root.
///
/// Only local references (`#/...`) are supported. Returns `None` for external refs.
fn resolve_ref<'a>(root: &'a Value, ref_path: &str) -> Option<&'a Value> {
    let pointer = ref_path.strip_prefix("#/")?;
    let mut current = root;
    for segment in pointer.split('/') {
        let unescaped = segment.replace("~1", "/").replace("~0", "~");
        current = current.get(&unescaped)?;
    }
    Some(current)
}
