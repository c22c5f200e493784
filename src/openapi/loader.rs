//! OpenAPI document loading.

use std::path::Path;

use axum::http::Method;
use serde_yaml::{Mapping, Value};

use crate::openapi::error::SpecError;
use crate::openapi::{ApiContract, DeclaredPath};

/// Map an OpenAPI path item key to the HTTP method it declares.
fn operation_method(key: &str) -> Option<Method> {
    match key {
        "get" => Some(Method::GET),
        "put" => Some(Method::PUT),
        "post" => Some(Method::POST),
        "delete" => Some(Method::DELETE),
        "options" => Some(Method::OPTIONS),
        "head" => Some(Method::HEAD),
        "patch" => Some(Method::PATCH),
        "trace" => Some(Method::TRACE),
        _ => None,
    }
}

/// Load an OpenAPI document from a file path.
pub fn load_spec_file(path: &Path) -> Result<ApiContract, SpecError> {
    let content = std::fs::read_to_string(path)?;
    let contract = parse_spec(&content)?;

    tracing::info!(
        path = %path.display(),
        title = contract.title.as_deref().unwrap_or("<untitled>"),
        paths = contract.paths.len(),
        "OpenAPI specification loaded"
    );

    Ok(contract)
}

/// Parse an OpenAPI document from a YAML/JSON string.
///
/// Paths keep the order in which the document declares them.
pub fn parse_spec(input: &str) -> Result<ApiContract, SpecError> {
    // JSON is valid YAML, and serde_yaml mappings preserve key order.
    let root: Value = serde_yaml::from_str(input)?;

    let root = root
        .as_mapping()
        .ok_or_else(|| SpecError::NotOpenApi("document root must be a mapping".into()))?;

    let version = ["openapi", "swagger"]
        .iter()
        .find_map(|key| root.get(*key).and_then(scalar_to_string))
        .ok_or_else(|| SpecError::NotOpenApi("missing 'openapi' or 'swagger' version".into()))?;

    let title = root
        .get("info")
        .and_then(|info| info.get("title"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let paths = match root.get("paths") {
        None | Some(Value::Null) => {
            tracing::warn!("OpenAPI document declares no paths; every API request will be rejected");
            Vec::new()
        }
        Some(Value::Mapping(paths)) => parse_paths(paths)?,
        Some(_) => return Err(SpecError::MalformedPaths("'paths' must be a mapping".into())),
    };

    Ok(ApiContract {
        version,
        title,
        paths,
    })
}

fn parse_paths(paths: &Mapping) -> Result<Vec<DeclaredPath>, SpecError> {
    let mut declared = Vec::with_capacity(paths.len());

    for (key, item) in paths {
        let template = key
            .as_str()
            .ok_or_else(|| SpecError::MalformedPaths(format!("path key {:?} is not a string", key)))?;

        if !template.starts_with('/') {
            return Err(SpecError::MalformedPaths(format!(
                "path '{}' must start with '/'",
                template
            )));
        }

        let item = item.as_mapping().ok_or_else(|| {
            SpecError::MalformedPaths(format!("path item for '{}' must be a mapping", template))
        })?;

        let mut methods: Vec<Method> = Vec::new();
        for method in item.keys().filter_map(Value::as_str).filter_map(operation_method) {
            if !methods.contains(&method) {
                methods.push(method);
            }
        }

        declared.push(DeclaredPath {
            template: template.to_string(),
            methods,
        });
    }

    Ok(declared)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
