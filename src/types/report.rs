/// Parsed oxlint report: the diagnostics plus the run metadata oxlint
/// prints alongside them.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub diagnostics: Vec<Diagnostic>,
    pub number_of_files: u64,
    /// `None` when the report does not say how many rules ran.
    pub number_of_rules: Option<i64>,
    pub threads_count: u64,
    pub start_time: f64,
}

/// One linter finding. Defaults are applied by the parser; by the time a
/// `Diagnostic` exists every field holds a usable value.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub message: String,
    /// Rule identity; empty when oxlint did not attribute the finding.
    pub code: String,
    pub severity: Severity,
    /// Cause chain as reported; carried in the model, not projected.
    #[allow(dead_code)]
    pub causes: Vec<String>,
    pub url: Option<String>,
    pub help: Option<String>,
    pub filename: String,
    /// First label is the primary location, the rest become related
    /// locations.
    pub labels: Vec<Label>,
    /// Supplementary context as reported; carried in the model, not
    /// projected.
    #[allow(dead_code)]
    pub related: Vec<RelatedInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A source span annotation with optional descriptive text.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub label: Option<String>,
    pub span: Span,
}

/// Byte span with 1-based line/column. Line and column are taken as
/// reported, not derived from offset/length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    #[allow(dead_code)]
    pub offset: u64,
    pub length: u64,
    pub line: u64,
    pub column: u64,
}

impl Default for Span {
    fn default() -> Self {
        Self {
            offset: 0,
            length: 0,
            line: 1,
            column: 1,
        }
    }
}

/// Supplementary context attached to a diagnostic.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedInfo {
    pub message: Option<String>,
    /// `None` when the report carried no label array at all, as opposed to
    /// an empty one.
    pub labels: Option<Vec<Label>>,
}
