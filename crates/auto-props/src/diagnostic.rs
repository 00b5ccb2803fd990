//! Diagnostic types.

use serde::Serialize;
use swc_common::Span;

/// A diagnostic produced while resolving components.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The diagnostic code.
    pub code: DiagnosticCode,
    /// The severity level.
    pub severity: Severity,
    /// The diagnostic message.
    pub message: String,
    /// The source location.
    pub span: Span,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    pub fn new(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: code.default_severity(),
            code,
            message: message.into(),
            span,
        }
    }
}

/// The severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A recoverable miss; output for the affected subtree is incomplete.
    Warning,
    /// The module could not be processed.
    Error,
}

/// Diagnostic codes for all checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// `unresolved-symbol`: a type name has no symbol in scope
    UnresolvedSymbol,
    /// `missing-declaration`: a symbol has no declaration
    MissingDeclaration,
    /// `unsupported-declaration`: a declaration kind that holds no members
    UnsupportedDeclaration,
    /// `unresolved-import`: an import does not lead to a local declaration
    UnresolvedImport,
    /// `unsupported-pattern`: a syntactic form that is skipped
    UnsupportedPattern,
    /// `recursive-type`: a type refers back to itself
    RecursiveType,
    /// `parse-error`: the module is not valid TypeScript
    ParseError,
}

impl DiagnosticCode {
    /// Returns the default severity for this diagnostic code.
    pub fn default_severity(&self) -> Severity {
        match self {
            DiagnosticCode::ParseError => Severity::Error,

            DiagnosticCode::UnresolvedSymbol
            | DiagnosticCode::MissingDeclaration
            | DiagnosticCode::UnsupportedDeclaration
            | DiagnosticCode::UnresolvedImport
            | DiagnosticCode::UnsupportedPattern
            | DiagnosticCode::RecursiveType => Severity::Warning,
        }
    }

    /// Returns the diagnostic code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::UnresolvedSymbol => "unresolved-symbol",
            DiagnosticCode::MissingDeclaration => "missing-declaration",
            DiagnosticCode::UnsupportedDeclaration => "unsupported-declaration",
            DiagnosticCode::UnresolvedImport => "unresolved-import",
            DiagnosticCode::UnsupportedPattern => "unsupported-pattern",
            DiagnosticCode::RecursiveType => "recursive-type",
            DiagnosticCode::ParseError => "parse-error",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for DiagnosticCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swc_common::DUMMY_SP;

    #[test]
    fn test_new_uses_default_severity() {
        let warning = Diagnostic::new(DiagnosticCode::RecursiveType, "loop", DUMMY_SP);
        assert_eq!(warning.severity, Severity::Warning);

        let error = Diagnostic::new(DiagnosticCode::ParseError, "bad", DUMMY_SP);
        assert_eq!(error.severity, Severity::Error);
    }

    #[test]
    fn test_severity_orders_warning_below_error() {
        assert!(Severity::Warning < Severity::Error);
        let json = serde_json::to_string(&[Severity::Warning, Severity::Error]).unwrap();
        assert_eq!(json, "[\"warning\",\"error\"]");
    }

    #[test]
    fn test_code_serializes_as_kebab_case() {
        let json = serde_json::to_string(&DiagnosticCode::UnresolvedImport).unwrap();
        assert_eq!(json, "\"unresolved-import\"");
        assert_eq!(DiagnosticCode::UnsupportedPattern.to_string(), "unsupported-pattern");
    }
}
