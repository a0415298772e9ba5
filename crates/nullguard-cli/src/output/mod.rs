//! Output formatting

use nullguard_core::{DiagnosticKind, Finding, JoinFailure, Severity, Span};

use crate::args::OutputFormat;

/// Diagnostics of one document, after disabled rules were filtered out
pub struct DocumentResult<'a> {
    pub findings: Vec<&'a Finding>,
    pub failures: Vec<&'a JoinFailure>,
    /// Source text of the document, when the tree came with it
    pub source: Option<&'a str>,
}

impl DocumentResult<'_> {
    pub fn count(&self) -> usize {
        self.findings.len() + self.failures.len()
    }
}

/// Output formatter for diagnostics
pub struct OutputFormatter {
    format: OutputFormat,
    file_name: String,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, file_name: String) -> Self {
        Self { format, file_name }
    }

    /// Print diagnostics in the configured format
    pub fn print_result(&self, result: &DocumentResult<'_>) {
        match self.format {
            OutputFormat::Human => self.print_human(result),
            OutputFormat::Json => self.print_json(result),
            OutputFormat::Sarif => self.print_sarif(result),
        }
    }

    fn print_human(&self, result: &DocumentResult<'_>) {
        for finding in &result.findings {
            print_header(finding.kind, message(finding.kind));
            self.print_span(finding.span, result.source);

            for location in &finding.related {
                let (line, col) = line_col(location.span, result.source);
                eprintln!(
                    "   = related ({}): {}:{}:{}",
                    location.tag, self.file_name, line, col
                );
                self.print_snippet(location.span, result.source);
            }

            eprintln!("   = help: {}", HELP);
            eprintln!();
        }

        for failure in &result.failures {
            let kind = DiagnosticKind::AnalysisFailed;
            print_header(kind, &format!("{}: {}", message(kind), failure.error));
            eprintln!("  --> {} (node {})", self.file_name, failure.join);
            eprintln!();
        }
    }

    fn print_span(&self, span: Span, source: Option<&str>) {
        let (line, col) = line_col(span, source);
        eprintln!("  --> {}:{}:{}", self.file_name, line, col);
        self.print_snippet(span, source);
    }

    fn print_snippet(&self, span: Span, source: Option<&str>) {
        let Some(source) = source else {
            return;
        };
        let (line, col) = offset_to_line_col(source, span.offset);
        if let Some(source_line) = get_source_line(source, line) {
            eprintln!("   |");
            eprintln!("{:>3} | {}", line, source_line);

            let padding = " ".repeat(col.saturating_sub(1));
            let available = source_line.len().saturating_sub(col - 1);
            let underline = "^".repeat(span.length.min(available).max(1));
            eprintln!("   | {}{}", padding, underline);
        }
    }

    fn print_json(&self, result: &DocumentResult<'_>) {
        let failures: Vec<serde_json::Value> = result
            .failures
            .iter()
            .map(|failure| {
                serde_json::json!({
                    "code": DiagnosticKind::AnalysisFailed.code(),
                    "join": failure.join,
                    "message": failure.error.to_string(),
                })
            })
            .collect();

        let output = serde_json::json!({
            "file": self.file_name,
            "findings": result.findings,
            "failures": failures,
        });
        println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
    }

    fn print_sarif(&self, result: &DocumentResult<'_>) {
        let mut results: Vec<serde_json::Value> = result
            .findings
            .iter()
            .map(|finding| {
                let related: Vec<serde_json::Value> = finding
                    .related
                    .iter()
                    .enumerate()
                    .map(|(id, location)| {
                        let mut value = self.sarif_location(location.span, result.source);
                        value["id"] = serde_json::json!(id);
                        value["message"] = serde_json::json!({ "text": location.tag });
                        value
                    })
                    .collect();

                serde_json::json!({
                    "ruleId": finding.kind.code(),
                    "level": sarif_level(finding.kind.severity()),
                    "message": {
                        "text": message(finding.kind)
                    },
                    "locations": [self.sarif_location(finding.span, result.source)],
                    "relatedLocations": related
                })
            })
            .collect();

        results.extend(result.failures.iter().map(|failure| {
            let kind = DiagnosticKind::AnalysisFailed;
            serde_json::json!({
                "ruleId": kind.code(),
                "level": sarif_level(kind.severity()),
                "message": {
                    "text": format!("{}: {}", message(kind), failure.error)
                },
                "locations": [{
                    "physicalLocation": {
                        "artifactLocation": {
                            "uri": self.file_name
                        }
                    }
                }]
            })
        }));

        let sarif = serde_json::json!({
            "$schema": "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json",
            "version": "2.1.0",
            "runs": [{
                "tool": {
                    "driver": {
                        "name": "nullguard",
                        "version": env!("CARGO_PKG_VERSION")
                    }
                },
                "results": results
            }]
        });

        println!("{}", serde_json::to_string_pretty(&sarif).unwrap_or_default());
    }

    fn sarif_location(&self, span: Span, source: Option<&str>) -> serde_json::Value {
        let (line, col) = line_col(span, source);
        serde_json::json!({
            "physicalLocation": {
                "artifactLocation": {
                    "uri": self.file_name
                },
                "region": {
                    "startLine": line,
                    "startColumn": col,
                    "charOffset": span.offset,
                    "charLength": span.length
                }
            }
        })
    }
}

const HELP: &str = "wrap the field in ISNULL(...) or filter the rows with IS NOT NULL";

fn message(kind: DiagnosticKind) -> &'static str {
    match kind {
        DiagnosticKind::UnguardedOuterJoinField => {
            "Fields of an outer-joined table are used without an ISNULL guard"
        }
        DiagnosticKind::AnalysisFailed => "Join check failed",
    }
}

fn print_header(kind: DiagnosticKind, message: &str) {
    let severity_str = match kind.severity() {
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warning => "\x1b[33mwarning\x1b[0m",
    };
    eprintln!("{}[{}]: {}", severity_str, kind.code(), message);
}

fn sarif_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    }
}

/// Line and column of a span, from the source when available
fn line_col(span: Span, source: Option<&str>) -> (usize, usize) {
    match source {
        Some(source) => offset_to_line_col(source, span.offset),
        None => (span.line, span.column),
    }
}

/// Convert byte offset to line and column (1-indexed)
fn offset_to_line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;

    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (line, col)
}

/// Get a specific line from source (1-indexed)
fn get_source_line(source: &str, line: usize) -> Option<&str> {
    source.lines().nth(line.saturating_sub(1))
}
