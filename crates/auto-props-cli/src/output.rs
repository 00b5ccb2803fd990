//! Output formatting.

use auto_props::{Diagnostic, DiagnosticCode, Severity};
use camino::Utf8Path;
use serde::Serialize;
use type_info::{Program, ProgramError};

/// A diagnostic with its position resolved to a line and column.
#[derive(Debug, Clone)]
pub struct Report {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    /// 1-indexed line number.
    pub line: usize,
    /// 1-indexed column number.
    pub column: usize,
}

impl Report {
    /// Resolves an engine diagnostic against the program it was found in.
    pub fn from_diagnostic(program: &Program, diag: &Diagnostic) -> Self {
        let (line, column) = program.line_col(diag.span.lo);
        Self {
            severity: diag.severity,
            code: diag.code,
            message: diag.message.clone(),
            line,
            column,
        }
    }

    /// Converts a load failure of the module itself.
    pub fn from_program_error(error: &ProgramError) -> Self {
        let (line, column, message) = match error {
            ProgramError::Parse {
                line,
                column,
                message,
                ..
            } => (*line, *column, message.clone()),
            ProgramError::Read { .. } => (1, 1, error.to_string()),
        };
        Self {
            severity: Severity::Error,
            code: DiagnosticCode::ParseError,
            message,
            line,
            column,
        }
    }
}

/// A formatted diagnostic for output.
#[derive(Debug, Serialize)]
pub struct FormattedDiagnostic {
    /// The diagnostic type (Error, Warning, etc.).
    #[serde(rename = "type")]
    pub diagnostic_type: String,
    /// The file path.
    pub filename: String,
    /// The start position.
    pub start: Position,
    /// The message.
    pub message: String,
    /// The diagnostic code.
    pub code: String,
}

/// A position in the source.
#[derive(Debug, Serialize)]
pub struct Position {
    /// 1-indexed line number.
    pub line: usize,
    /// 1-indexed column number.
    pub column: usize,
}

/// Formats diagnostics for output.
pub struct Formatter;

impl Formatter {
    /// Formats the reports of one file as human-readable text.
    pub fn format_human(reports: &[Report], file_path: &Utf8Path) -> String {
        let mut output = String::new();
        for report in reports {
            output.push_str(&format!(
                "{}:{}:{}\n{}: {} ({})\n\n",
                file_path,
                report.line,
                report.column,
                severity_label(report.severity),
                report.message,
                report.code
            ));
        }
        output
    }

    /// Formats reports into JSON-ready structs.
    pub fn format_json_diagnostics(
        reports: &[Report],
        file_path: &Utf8Path,
    ) -> Vec<FormattedDiagnostic> {
        reports
            .iter()
            .map(|report| FormattedDiagnostic {
                diagnostic_type: severity_label(report.severity).to_string(),
                filename: file_path.to_string(),
                start: Position {
                    line: report.line,
                    column: report.column,
                },
                message: report.message.clone(),
                code: report.code.to_string(),
            })
            .collect()
    }
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "Error",
        Severity::Warning => "Warning",
    }
}

/// Summary of a run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Number of files processed.
    pub file_count: usize,
    /// Number of components that received a patch.
    pub component_count: usize,
    /// Number of errors.
    pub error_count: usize,
    /// Number of warnings.
    pub warning_count: usize,
    /// Whether to fail on warnings.
    pub fail_on_warnings: bool,
}

impl RunSummary {
    /// Whether the process should exit with a failure status.
    pub fn failed(&self) -> bool {
        self.error_count > 0 || (self.warning_count > 0 && self.fail_on_warnings)
    }

    /// Formats the summary line.
    pub fn format(&self) -> String {
        format!(
            "====================================\nvue-auto-props patched {} in {} and found {} and {}",
            plural(self.component_count, "component", "components"),
            plural(self.file_count, "file", "files"),
            plural(self.error_count, "error", "errors"),
            plural(self.warning_count, "warning", "warnings"),
        )
    }
}

fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{} {}", count, if count == 1 { one } else { many })
}
