//! Catalog validation.
//!
//! Checks a parsed catalog document before any request is bound against it.

use crate::binder::convert_primitive;
use crate::spec::{BodyShape, CatalogDoc, EndpointDef};
use http::Method;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Where the issue is, e.g. `endpoint:request_param_default/age`
    pub location: String,
    /// Short machine-readable tag, e.g. `invalid_default`
    pub kind: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(location: impl Into<String>, kind: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationIssue {
            location: location.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }
}

pub fn print_issues(issues: &[ValidationIssue]) {
    eprintln!("\n❌ Catalog validation failed. {} issue(s) found:\n", issues.len());
    for issue in issues {
        eprintln!("[{}] {}: {}", issue.kind, issue.location, issue.message);
    }
    eprintln!("\nPlease fix the issues in your catalog before binding requests against it.\n");
}

/// Check every endpoint of a parsed catalog document.
#[must_use]
pub fn validate_catalog(doc: &CatalogDoc) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut names = HashSet::new();

    for endpoint in &doc.endpoints {
        let loc = format!("endpoint:{}", endpoint.name);
        if endpoint.name.trim().is_empty() {
            issues.push(ValidationIssue::new(&loc, "empty_name", "Endpoint name is empty"));
        }
        if !names.insert(endpoint.name.as_str()) {
            issues.push(ValidationIssue::new(
                &loc,
                "duplicate_endpoint",
                format!("Endpoint '{}' is declared more than once", endpoint.name),
            ));
        }
        if let Some(method) = endpoint.method.as_deref() {
            if Method::from_bytes(method.to_ascii_uppercase().as_bytes()).is_err() {
                issues.push(ValidationIssue::new(
                    &loc,
                    "invalid_method",
                    format!("'{}' is not a valid HTTP method", method),
                ));
            }
        }
        validate_binding(endpoint, &loc, &mut issues);
    }

    issues
}

fn validate_binding(endpoint: &EndpointDef, loc: &str, issues: &mut Vec<ValidationIssue>) {
    match (&endpoint.params, &endpoint.body) {
        (Some(_), Some(_)) => issues.push(ValidationIssue::new(
            loc,
            "ambiguous_binding",
            "Endpoint declares both params and body",
        )),
        (None, None) => issues.push(ValidationIssue::new(
            loc,
            "missing_binding",
            "Endpoint declares neither params nor body",
        )),
        (Some(params), None) => {
            let mut seen = HashSet::new();
            for field in params {
                let field_loc = format!("{}/{}", loc, field.name);
                if !seen.insert(field.name.as_str()) {
                    issues.push(ValidationIssue::new(
                        &field_loc,
                        "duplicate_field",
                        format!("Parameter '{}' is declared more than once", field.name),
                    ));
                }
                if let Some(default) = field.default.as_deref() {
                    if convert_primitive(default, field.kind).is_none() {
                        issues.push(ValidationIssue::new(
                            &field_loc,
                            "invalid_default",
                            format!("Default '{}' does not convert to {}", default, field.kind),
                        ));
                    }
                }
            }
        }
        (None, Some(BodyShape::Json(shape))) => {
            let mut seen = HashSet::new();
            for field in &shape.fields {
                if !seen.insert(field.name.as_str()) {
                    issues.push(ValidationIssue::new(
                        format!("{}/body/{}", loc, field.name),
                        "duplicate_field",
                        format!("Body field '{}' is declared more than once", field.name),
                    ));
                }
            }
        }
        (None, Some(BodyShape::Text)) => {}
    }
}
