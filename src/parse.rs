use serde_json::Value;

use crate::error::{ConvertError, Result};
use crate::types::report::{Diagnostic, Label, RelatedInfo, Report, Severity, Span};

/// Parse the raw text of an oxlint JSON report.
///
/// Document-level problems (empty input, broken JSON, no `diagnostics`
/// array) are hard errors. Inside an admitted document every field is
/// normalized independently and bad values fall back to defaults, since
/// oxlint's output drifts in minor ways between releases while a missing
/// diagnostics array means a different format altogether.
pub fn parse_report(raw: &str) -> Result<Report> {
    if raw.trim().is_empty() {
        return Err(ConvertError::EmptyInput);
    }

    let doc: Value = serde_json::from_str(raw).map_err(ConvertError::MalformedJson)?;
    let root = doc.as_object().ok_or(ConvertError::InvalidShape)?;
    let raw_diagnostics = root
        .get("diagnostics")
        .and_then(Value::as_array)
        .ok_or(ConvertError::InvalidShape)?;

    let diagnostics = raw_diagnostics.iter().filter_map(parse_diagnostic).collect();

    Ok(Report {
        diagnostics,
        number_of_files: uint_or(root.get("number_of_files"), 0),
        number_of_rules: rule_count(root.get("number_of_rules")),
        threads_count: uint_or(root.get("threads_count"), 1),
        start_time: float_or(root.get("start_time"), 0.0),
    })
}

/// Admission filter: entries that are not objects, or that are missing any
/// of the four required keys, are dropped rather than defaulted.
fn parse_diagnostic(raw: &Value) -> Option<Diagnostic> {
    let entry = raw.as_object()?;
    for key in ["message", "code", "severity", "filename"] {
        if !entry.contains_key(key) {
            return None;
        }
    }

    Some(Diagnostic {
        message: string_or_empty(entry.get("message")),
        code: string_or_empty(entry.get("code")),
        severity: parse_severity(entry.get("severity")),
        causes: string_list(entry.get("causes")),
        url: optional_string(entry.get("url")),
        help: optional_string(entry.get("help")),
        filename: string_or_empty(entry.get("filename")),
        labels: parse_labels(entry.get("labels")).unwrap_or_default(),
        related: parse_related(entry.get("related")),
    })
}

/// Unrecognized severities downgrade to warning instead of failing; oxlint
/// itself only emits `error` and `warning`, but plugins are free to invent.
fn parse_severity(raw: Option<&Value>) -> Severity {
    match raw
        .and_then(Value::as_str)
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("error") => Severity::Error,
        Some("warning" | "warn") => Severity::Warning,
        _ => Severity::Warning,
    }
}

/// `None` when the raw value is not an array at all; the caller decides
/// whether that means "empty" (diagnostic labels) or "absent" (related
/// labels).
fn parse_labels(raw: Option<&Value>) -> Option<Vec<Label>> {
    let items = raw.and_then(Value::as_array)?;
    Some(items.iter().filter_map(parse_label).collect())
}

fn parse_label(raw: &Value) -> Option<Label> {
    let entry = raw.as_object()?;
    Some(Label {
        label: entry
            .get("label")
            .and_then(Value::as_str)
            .map(str::to_string),
        span: parse_span(entry.get("span")),
    })
}

fn parse_span(raw: Option<&Value>) -> Span {
    let span = raw.and_then(Value::as_object);
    let field = |key: &str, default: u64| {
        span.and_then(|s| s.get(key))
            .and_then(Value::as_u64)
            .unwrap_or(default)
    };
    Span {
        offset: field("offset", 0),
        length: field("length", 0),
        line: field("line", 1),
        column: field("column", 1),
    }
}

fn parse_related(raw: Option<&Value>) -> Vec<RelatedInfo> {
    let Some(items) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let entry = item.as_object()?;
            Some(RelatedInfo {
                message: optional_string(entry.get("message")),
                labels: parse_labels(entry.get("labels")),
            })
        })
        .collect()
}

/// String coercion for required text fields: strings pass through, null
/// becomes "", anything else keeps its compact JSON rendering.
fn string_or_empty(raw: Option<&Value>) -> String {
    match raw {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Absent key stays absent; any present value goes through the same
/// coercion as the required text fields.
fn optional_string(raw: Option<&Value>) -> Option<String> {
    raw.map(|value| string_or_empty(Some(value)))
}

fn string_list(raw: Option<&Value>) -> Vec<String> {
    raw.and_then(Value::as_array)
        .map(|items| items.iter().map(|v| string_or_empty(Some(v))).collect())
        .unwrap_or_default()
}

fn uint_or(raw: Option<&Value>, default: u64) -> u64 {
    raw.and_then(Value::as_u64).unwrap_or(default)
}

fn float_or(raw: Option<&Value>, default: f64) -> f64 {
    raw.and_then(Value::as_f64).unwrap_or(default)
}

/// Null and missing both mean "unknown"; anything else is coerced to an
/// integer count.
fn rule_count(raw: Option<&Value>) -> Option<i64> {
    match raw {
        None | Some(Value::Null) => None,
        Some(value) => Some(value.as_i64().unwrap_or(0)),
    }
}
