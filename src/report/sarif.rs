//! SARIF (Static Analysis Results Interchange Format) 2.1.0 output.
//!
//! Projects a parsed oxlint report into the SARIF document model consumed
//! by code-scanning tools and GitHub Advanced Security.

use serde::Serialize;
use std::collections::HashMap;

use crate::types::report::{Diagnostic, Label, Report, Severity, Span};

/// SARIF schema URL
const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";

/// SARIF version
const SARIF_VERSION: &str = "2.1.0";

/// Documentation URL recorded for the oxlint driver
const DRIVER_INFO_URI: &str = "https://oxc.rs";

/// Rule id used when a diagnostic carries no code
const UNKNOWN_RULE_ID: &str = "UnknownRule";

/// Root SARIF document structure.
#[derive(Debug, Clone, Serialize)]
pub struct SarifLog {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub version: String,
    pub runs: Vec<SarifRun>,
}

/// A single SARIF run (one conversion).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
    /// Columns are UTF-16 code-unit offsets, matching JS/TS source tooling.
    pub column_kind: String,
}

/// Tool information (driver).
#[derive(Debug, Clone, Serialize)]
pub struct SarifTool {
    pub driver: SarifDriver,
}

/// Tool driver with rules.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifDriver {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub information_uri: String,
    pub rules: Vec<SarifRule>,
}

/// Rule definition.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRule {
    pub id: String,
    pub short_description: SarifMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<SarifMessage>,
}

/// SARIF severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SarifLevel {
    Error,
    Warning,
}

impl From<Severity> for SarifLevel {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Error => SarifLevel::Error,
            Severity::Warning => SarifLevel::Warning,
        }
    }
}

/// Message with text.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SarifMessage {
    pub text: String,
}

/// SARIF result (one diagnostic).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifResult {
    pub level: SarifLevel,
    pub message: SarifMessage,
    pub locations: Vec<SarifLocation>,
    pub rule_id: String,
    pub rule_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_locations: Option<Vec<SarifLocation>>,
}

/// Location of a result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub physical_location: SarifPhysicalLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<SarifMessage>,
}

/// Physical location with file and region.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifPhysicalLocation {
    pub artifact_location: SarifArtifactLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<SarifRegion>,
}

/// Artifact (file) location.
#[derive(Debug, Clone, Serialize)]
pub struct SarifArtifactLocation {
    pub uri: String,
}

/// Region within a file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRegion {
    pub start_line: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_column: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u64>,
}

/// Projects a parsed report into a SARIF log with a single run.
///
/// Total for every report the parser can produce. The rule registry and
/// relatedLocation numbering are local to one call.
pub fn convert_report(report: &Report, tool_version: Option<&str>) -> SarifLog {
    let mut registry = RuleRegistry::new();
    let results = report
        .diagnostics
        .iter()
        .map(|diagnostic| diagnostic_to_result(diagnostic, &mut registry))
        .collect();

    SarifLog {
        schema: SARIF_SCHEMA.to_string(),
        version: SARIF_VERSION.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: "oxlint".to_string(),
                    version: tool_version.map(str::to_string),
                    information_uri: DRIVER_INFO_URI.to_string(),
                    rules: registry.into_rules(),
                },
            },
            results,
            column_kind: "utf16CodeUnits".to_string(),
        }],
    }
}

/// First-seen-ordered rule table. Each distinct rule id gets exactly one
/// descriptor; the index is what results reference through `ruleIndex`.
struct RuleRegistry {
    indices: HashMap<String, usize>,
    rules: Vec<SarifRule>,
}

impl RuleRegistry {
    fn new() -> Self {
        Self {
            indices: HashMap::new(),
            rules: Vec::new(),
        }
    }

    /// Returns the rule id and registry index for this diagnostic,
    /// registering a descriptor on first sight. Descriptor fields come from
    /// the first diagnostic carrying the code.
    fn intern(&mut self, diagnostic: &Diagnostic) -> (String, usize) {
        let id = if diagnostic.code.is_empty() {
            UNKNOWN_RULE_ID.to_string()
        } else {
            diagnostic.code.clone()
        };
        if let Some(&index) = self.indices.get(&id) {
            return (id, index);
        }
        let index = self.rules.len();
        self.indices.insert(id.clone(), index);
        self.rules.push(SarifRule {
            id: id.clone(),
            short_description: SarifMessage { text: id.clone() },
            help_uri: diagnostic.url.clone(),
            help: diagnostic
                .help
                .clone()
                .map(|text| SarifMessage { text }),
        });
        (id, index)
    }

    fn into_rules(self) -> Vec<SarifRule> {
        self.rules
    }
}

fn diagnostic_to_result(diagnostic: &Diagnostic, registry: &mut RuleRegistry) -> SarifResult {
    let (rule_id, rule_index) = registry.intern(diagnostic);
    let uri = path_to_uri(&diagnostic.filename);

    let mut text = diagnostic.message.clone();
    if let Some(help) = &diagnostic.help {
        text.push('\n');
        text.push_str(help);
    }

    let primary = SarifLocation {
        id: None,
        physical_location: SarifPhysicalLocation {
            artifact_location: SarifArtifactLocation { uri: uri.clone() },
            region: diagnostic
                .labels
                .first()
                .map(|label| span_to_region(&label.span)),
        },
        message: None,
    };

    SarifResult {
        level: diagnostic.severity.into(),
        message: SarifMessage { text },
        locations: vec![primary],
        rule_id,
        rule_index,
        related_locations: related_locations(&diagnostic.labels, &uri),
    }
}

/// Labels past the first become relatedLocations with 1-based sequential
/// ids. Fewer than two labels means the member is omitted entirely.
fn related_locations(labels: &[Label], uri: &str) -> Option<Vec<SarifLocation>> {
    if labels.len() < 2 {
        return None;
    }
    Some(
        labels[1..]
            .iter()
            .enumerate()
            .map(|(index, label)| SarifLocation {
                id: Some(index as u64 + 1),
                physical_location: SarifPhysicalLocation {
                    artifact_location: SarifArtifactLocation {
                        uri: uri.to_string(),
                    },
                    region: Some(span_to_region(&label.span)),
                },
                message: label
                    .label
                    .clone()
                    .map(|text| SarifMessage { text }),
            })
            .collect(),
    )
}

/// SARIF regions are 1-based; a zero column or length means "unknown" and
/// the member is omitted rather than emitted as 0.
fn span_to_region(span: &Span) -> SarifRegion {
    SarifRegion {
        start_line: span.line,
        start_column: (span.column > 0).then_some(span.column),
        end_column: (span.length > 0).then_some(span.column + span.length),
    }
}

/// Maps a report path to a SARIF artifact URI. Relative paths pass through
/// unchanged for the consumer to resolve against its base URI.
pub fn path_to_uri(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    if has_drive_prefix(&normalized) {
        format!("file:///{normalized}")
    } else if normalized.starts_with('/') {
        format!("file://{normalized}")
    } else {
        normalized
    }
}

/// Windows absolute path: drive letter, colon, slash.
fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::report::RelatedInfo;

    fn diagnostic(code: &str, severity: Severity) -> Diagnostic {
        Diagnostic {
            message: format!("{code} fired"),
            code: code.to_string(),
            severity,
            causes: vec![],
            url: None,
            help: None,
            filename: "src/test.ts".to_string(),
            labels: vec![],
            related: vec![],
        }
    }

    fn label(line: u64, column: u64, length: u64, text: Option<&str>) -> Label {
        Label {
            label: text.map(str::to_string),
            span: Span {
                offset: 0,
                length,
                line,
                column,
            },
        }
    }

    fn report(diagnostics: Vec<Diagnostic>) -> Report {
        Report {
            diagnostics,
            number_of_files: 1,
            number_of_rules: None,
            threads_count: 1,
            start_time: 0.0,
        }
    }

    #[test]
    fn log_has_schema_version_and_single_run() {
        let sarif = convert_report(&report(vec![]), None);
        assert_eq!(sarif.schema, SARIF_SCHEMA);
        assert_eq!(sarif.version, "2.1.0");
        assert_eq!(sarif.runs.len(), 1);
    }

    #[test]
    fn driver_identifies_oxlint() {
        let sarif = convert_report(&report(vec![]), None);
        let run = &sarif.runs[0];
        assert_eq!(run.tool.driver.name, "oxlint");
        assert_eq!(run.tool.driver.information_uri, DRIVER_INFO_URI);
        assert_eq!(run.tool.driver.version, None);
        assert_eq!(run.column_kind, "utf16CodeUnits");
    }

    #[test]
    fn tool_version_is_recorded_when_given() {
        let sarif = convert_report(&report(vec![]), Some("0.9.0"));
        assert_eq!(sarif.runs[0].tool.driver.version.as_deref(), Some("0.9.0"));
    }

    #[test]
    fn one_result_per_diagnostic_in_input_order() {
        let sarif = convert_report(
            &report(vec![
                diagnostic("a", Severity::Error),
                diagnostic("b", Severity::Warning),
                diagnostic("a", Severity::Warning),
            ]),
            None,
        );
        let results = &sarif.runs[0].results;
        assert_eq!(results.len(), 3);
        let ids: Vec<_> = results.iter().map(|r| r.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "a"]);
    }

    #[test]
    fn severity_maps_to_level_exhaustively() {
        let sarif = convert_report(
            &report(vec![
                diagnostic("a", Severity::Error),
                diagnostic("b", Severity::Warning),
            ]),
            None,
        );
        let results = &sarif.runs[0].results;
        assert_eq!(results[0].level, SarifLevel::Error);
        assert_eq!(results[1].level, SarifLevel::Warning);
    }

    #[test]
    fn rules_are_deduplicated_and_indexed_in_first_seen_order() {
        let sarif = convert_report(
            &report(vec![
                diagnostic("first", Severity::Error),
                diagnostic("second", Severity::Warning),
                diagnostic("first", Severity::Warning),
            ]),
            None,
        );
        let run = &sarif.runs[0];
        let rule_ids: Vec<_> = run
            .tool
            .driver
            .rules
            .iter()
            .map(|rule| rule.id.as_str())
            .collect();
        assert_eq!(rule_ids, vec!["first", "second"]);
        assert_eq!(run.results[0].rule_index, 0);
        assert_eq!(run.results[1].rule_index, 1);
        assert_eq!(run.results[2].rule_index, 0);
    }

    #[test]
    fn rule_descriptor_comes_from_first_occurrence() {
        let mut first = diagnostic("dup", Severity::Error);
        first.url = Some("https://example.invalid/dup".to_string());
        first.help = Some("fix it".to_string());
        let mut second = diagnostic("dup", Severity::Error);
        second.url = Some("https://example.invalid/other".to_string());

        let sarif = convert_report(&report(vec![first, second]), None);
        let rules = &sarif.runs[0].tool.driver.rules;
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].short_description.text, "dup");
        assert_eq!(
            rules[0].help_uri.as_deref(),
            Some("https://example.invalid/dup")
        );
        assert_eq!(
            rules[0].help.as_ref().map(|m| m.text.as_str()),
            Some("fix it")
        );
    }

    #[test]
    fn empty_code_registers_as_unknown_rule() {
        let sarif = convert_report(&report(vec![diagnostic("", Severity::Warning)]), None);
        let run = &sarif.runs[0];
        assert_eq!(run.tool.driver.rules[0].id, "UnknownRule");
        assert_eq!(run.results[0].rule_id, "UnknownRule");
        assert_eq!(run.results[0].rule_index, 0);
    }

    #[test]
    fn help_text_is_appended_to_message() {
        let mut d = diagnostic("a", Severity::Error);
        d.message = "broken".to_string();
        d.help = Some("try this".to_string());
        let sarif = convert_report(&report(vec![d]), None);
        assert_eq!(sarif.runs[0].results[0].message.text, "broken\ntry this");
    }

    #[test]
    fn diagnostic_without_labels_has_no_region() {
        let sarif = convert_report(&report(vec![diagnostic("a", Severity::Error)]), None);
        let location = &sarif.runs[0].results[0].locations[0];
        assert_eq!(location.physical_location.artifact_location.uri, "src/test.ts");
        assert!(location.physical_location.region.is_none());
    }

    #[test]
    fn first_label_becomes_the_primary_region() {
        let mut d = diagnostic("a", Severity::Error);
        d.labels = vec![label(3, 7, 2, None)];
        let sarif = convert_report(&report(vec![d]), None);
        let region = sarif.runs[0].results[0].locations[0]
            .physical_location
            .region
            .as_ref()
            .expect("first label should produce a region");
        assert_eq!(region.start_line, 3);
        assert_eq!(region.start_column, Some(7));
        assert_eq!(region.end_column, Some(9));
    }

    #[test]
    fn zero_column_omits_start_column() {
        let mut d = diagnostic("a", Severity::Error);
        d.labels = vec![label(2, 0, 5, None)];
        let sarif = convert_report(&report(vec![d]), None);
        let region = sarif.runs[0].results[0].locations[0]
            .physical_location
            .region
            .as_ref()
            .expect("region should exist");
        assert_eq!(region.start_column, None);
        assert_eq!(region.end_column, Some(5));
    }

    #[test]
    fn zero_length_omits_end_column() {
        let mut d = diagnostic("a", Severity::Error);
        d.labels = vec![label(2, 4, 0, None)];
        let sarif = convert_report(&report(vec![d]), None);
        let region = sarif.runs[0].results[0].locations[0]
            .physical_location
            .region
            .as_ref()
            .expect("region should exist");
        assert_eq!(region.start_column, Some(4));
        assert_eq!(region.end_column, None);
    }

    #[test]
    fn single_label_produces_no_related_locations() {
        let mut d = diagnostic("a", Severity::Error);
        d.labels = vec![label(1, 1, 1, None)];
        let sarif = convert_report(&report(vec![d]), None);
        assert!(sarif.runs[0].results[0].related_locations.is_none());
    }

    #[test]
    fn extra_labels_become_related_locations_with_sequential_ids() {
        let mut d = diagnostic("a", Severity::Error);
        d.labels = vec![
            label(1, 1, 1, None),
            label(5, 2, 3, Some("first extra")),
            label(9, 0, 0, None),
        ];
        let sarif = convert_report(&report(vec![d]), None);
        let related = sarif.runs[0].results[0]
            .related_locations
            .as_ref()
            .expect("two extra labels should produce relatedLocations");
        assert_eq!(related.len(), 2);
        assert_eq!(related[0].id, Some(1));
        assert_eq!(related[1].id, Some(2));
        assert_eq!(
            related[0].message.as_ref().map(|m| m.text.as_str()),
            Some("first extra")
        );
        assert_eq!(related[1].message, None);
        let region = related[0]
            .physical_location
            .region
            .as_ref()
            .expect("related labels carry regions");
        assert_eq!(region.start_line, 5);
        assert_eq!(
            related[0].physical_location.artifact_location.uri,
            "src/test.ts"
        );
    }

    #[test]
    fn related_info_does_not_affect_locations() {
        let mut d = diagnostic("a", Severity::Error);
        d.related = vec![RelatedInfo {
            message: Some("context".to_string()),
            labels: None,
        }];
        let sarif = convert_report(&report(vec![d]), None);
        assert!(sarif.runs[0].results[0].related_locations.is_none());
    }

    #[test]
    fn windows_paths_map_to_file_uris() {
        assert_eq!(
            path_to_uri(r"C:\Users\foo\test.ts"),
            "file:///C:/Users/foo/test.ts"
        );
    }

    #[test]
    fn posix_paths_map_to_file_uris() {
        assert_eq!(path_to_uri("/home/user/a.ts"), "file:///home/user/a.ts");
    }

    #[test]
    fn relative_paths_pass_through() {
        assert_eq!(path_to_uri("src/test.ts"), "src/test.ts");
        assert_eq!(path_to_uri(r"src\test.ts"), "src/test.ts");
    }

    #[test]
    fn serialized_log_uses_sarif_member_names() {
        let mut d = diagnostic("r1", Severity::Error);
        d.labels = vec![label(1, 1, 5, None)];
        let sarif = convert_report(&report(vec![d]), Some("1.0.0"));
        let json = serde_json::to_value(&sarif).expect("log should serialize");

        assert_eq!(json["$schema"], SARIF_SCHEMA);
        assert_eq!(json["runs"][0]["columnKind"], "utf16CodeUnits");
        let result = &json["runs"][0]["results"][0];
        assert_eq!(result["ruleId"], "r1");
        assert_eq!(result["ruleIndex"], 0);
        let region = &result["locations"][0]["physicalLocation"]["region"];
        assert_eq!(region["startLine"], 1);
        assert_eq!(region["startColumn"], 1);
        assert_eq!(region["endColumn"], 6);
        // omitted members stay omitted, not null
        assert!(result.get("relatedLocations").is_none());
        assert!(result["locations"][0].get("id").is_none());
    }
}
