use super::types::{BindingSpec, Catalog, CatalogDoc, EndpointDef, EndpointMeta};
use crate::validator::{validate_catalog, ValidationIssue};
use anyhow::{anyhow, Context};
use http::Method;
use std::path::Path;
use tracing::{debug, info};

/// Catalog document format, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Yaml,
    Json,
    Toml,
}

impl CatalogFormat {
    /// `.yaml`/`.yml` and `.toml` are recognised; everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => CatalogFormat::Yaml,
            Some("toml") => CatalogFormat::Toml,
            _ => CatalogFormat::Json,
        }
    }
}

/// Parse a catalog document without validating it.
pub fn parse_catalog_str(content: &str, format: CatalogFormat) -> anyhow::Result<CatalogDoc> {
    let doc = match format {
        CatalogFormat::Yaml => serde_yaml::from_str(content)?,
        CatalogFormat::Json => serde_json::from_str(content)?,
        CatalogFormat::Toml => toml::from_str(content)?,
    };
    Ok(doc)
}

/// Load, validate and build a catalog from a file.
///
/// # Errors
///
/// Fails if the file cannot be read or parsed, or if validation reports any issue.
pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    let doc = parse_catalog_str(&content, CatalogFormat::from_path(path))
        .with_context(|| format!("failed to parse catalog {}", path.display()))?;
    let catalog = build_catalog(doc)?;
    info!(
        path = %path.display(),
        endpoints = catalog.endpoints.len(),
        "Catalog loaded"
    );
    Ok(catalog)
}

/// Validate a parsed document and turn it into a [`Catalog`].
pub fn build_catalog(doc: CatalogDoc) -> anyhow::Result<Catalog> {
    let issues = validate_catalog(&doc);
    if !issues.is_empty() {
        return Err(anyhow!(
            "catalog has {} issue(s): {}",
            issues.len(),
            summarize(&issues)
        ));
    }

    let endpoints = doc
        .endpoints
        .into_iter()
        .map(endpoint_meta)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(Catalog { endpoints })
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("[{}] {}: {}", i.kind, i.location, i.message))
        .collect::<Vec<_>>()
        .join("; ")
}

fn endpoint_meta(def: EndpointDef) -> anyhow::Result<EndpointMeta> {
    let method = match def.method.as_deref() {
        Some(m) => Method::from_bytes(m.to_ascii_uppercase().as_bytes())
            .with_context(|| format!("endpoint '{}': invalid method '{}'", def.name, m))?,
        None => Method::GET,
    };
    let path = def
        .path
        .unwrap_or_else(|| format!("/{}", def.name.replace('_', "-")));
    let binding = match (def.params, def.body) {
        (Some(params), None) => BindingSpec::Params(params),
        (None, Some(body)) => BindingSpec::Body(body),
        _ => {
            return Err(anyhow!(
                "endpoint '{}' must declare exactly one of params or body",
                def.name
            ))
        }
    };
    debug!(endpoint = %def.name, method = %method, path = %path, "Endpoint built");
    Ok(EndpointMeta {
        name: def.name,
        method,
        path,
        binding,
    })
}
