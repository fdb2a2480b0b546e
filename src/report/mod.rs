pub mod sarif;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::parse;
use crate::types::report::Report;

/// Parse raw oxlint JSON and render it as a SARIF 2.1.0 log in one step.
///
/// Parse failures propagate unmodified; the projection itself cannot fail.
pub fn convert(raw: &str, tool_version: Option<&str>, indent: usize) -> Result<String> {
    let report = parse::parse_report(raw)?;
    info!(
        diagnostics = report.diagnostics.len(),
        files = report.number_of_files,
        rules = ?report.number_of_rules,
        threads = report.threads_count,
        start_time = report.start_time,
        "report parsed"
    );
    render(&report, tool_version, indent)
}

/// Render a parsed report as SARIF JSON text.
///
/// `indent` controls pretty-printing width only; 0 emits compact JSON.
pub fn render(report: &Report, tool_version: Option<&str>, indent: usize) -> Result<String> {
    let log = sarif::convert_report(report, tool_version);
    if indent == 0 {
        return Ok(serde_json::to_string(&log)?);
    }

    let pad = vec![b' '; indent];
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(&pad);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    log.serialize(&mut serializer)?;
    Ok(String::from_utf8(buffer).expect("serde_json emits UTF-8"))
}
