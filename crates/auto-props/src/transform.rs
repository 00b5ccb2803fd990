use crate::diagnostic::{Diagnostic, DiagnosticCode, Severity};
use crate::meta::ComponentMetaMap;
use crate::options::AutoPropsOptions;
use crate::render::render_components;
use camino::Utf8Path;
use rustc_hash::FxHashSet;
use swc_common::Span;
use type_info::{ModuleId, Program, ProgramError, SourceProvider, SymbolId, TypeInfo};

/// One resolution pass over a single module.
///
/// The pass owns its diagnostics and cycle guards; nothing is shared with
/// passes over other modules.
pub struct AutoPropsTransform<'a, T: TypeInfo + ?Sized> {
    pub(crate) info: &'a T,
    pub(crate) options: &'a AutoPropsOptions,
    /// The module whose components are being resolved.
    pub(crate) origin: ModuleId,
    pub(crate) diagnostics: Vec<Diagnostic>,
    /// Type aliases currently being resolved to tags.
    pub(crate) resolving: FxHashSet<SymbolId>,
    /// Declarations currently being expanded to member lists.
    pub(crate) extracting: FxHashSet<SymbolId>,
}

impl<'a, T: TypeInfo + ?Sized> AutoPropsTransform<'a, T> {
    /// Creates a pass over `origin`.
    pub fn new(info: &'a T, options: &'a AutoPropsOptions, origin: ModuleId) -> Self {
        Self {
            info,
            options,
            origin,
            diagnostics: Vec::new(),
            resolving: FxHashSet::default(),
            extracting: FxHashSet::default(),
        }
    }

    /// Diagnostics collected so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consumes the pass and returns its diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub(crate) fn warn(&mut self, code: DiagnosticCode, message: impl Into<String>, span: Span) {
        let diagnostic = Diagnostic::new(code, message, span);
        if self.options.hide_warnings && diagnostic.severity == Severity::Warning {
            return;
        }
        self.diagnostics.push(diagnostic);
    }
}

/// The result of transforming one module.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// The module source with the patch appended.
    pub code: String,
    /// The generated patch alone; empty when no component was found.
    pub patch: String,
    pub components: ComponentMetaMap,
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolves the components of a loaded module and appends the patch.
pub fn transform_module(
    program: &Program,
    module: ModuleId,
    options: &AutoPropsOptions,
) -> TransformOutput {
    let mut transform = AutoPropsTransform::new(program, options, module);
    let components = transform.resolve_components(program.module(module));
    let diagnostics = transform.into_diagnostics();

    let source = program.source(module);
    let (code, patch) = if components.is_empty() {
        (source.to_string(), String::new())
    } else {
        let patch = render_components(&components, options);
        (format!("{source}\n{patch}"), patch)
    };

    TransformOutput {
        code,
        patch,
        components,
        diagnostics,
    }
}

/// Loads `path` with its local imports and transforms it.
pub fn transform_file(
    sources: &dyn SourceProvider,
    path: &Utf8Path,
    options: &AutoPropsOptions,
) -> Result<(Program, TransformOutput), ProgramError> {
    let (program, module) = Program::load(sources, path)?;
    let output = transform_module(&program, module, options);
    Ok((program, output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use type_info::MemorySources;

    #[test]
    fn test_module_without_components_is_unchanged() {
        let source = "export const answer = 42\n";
        let sources = MemorySources::new().with_file("/src/a.ts", source);
        let (_, output) =
            transform_file(&sources, Utf8Path::new("/src/a.ts"), &AutoPropsOptions::default())
                .unwrap();
        assert_eq!(output.code, source);
        assert!(output.patch.is_empty());
        assert!(output.components.is_empty());
    }

    #[test]
    fn test_patch_is_appended_after_source() {
        let source = "const Card = defineComponent<{ title: string }>({})";
        let sources = MemorySources::new().with_file("/src/a.ts", source);
        let (_, output) =
            transform_file(&sources, Utf8Path::new("/src/a.ts"), &AutoPropsOptions::default())
                .unwrap();
        assert!(output.code.starts_with(source));
        assert_eq!(output.code, format!("{source}\n{}", output.patch));
        assert!(output.patch.contains("Object.defineProperty(Card.props, \"title\""));
    }

    #[test]
    fn test_hide_warnings_drops_warnings() {
        let source = "const Card = defineComponent<Missing>({})";
        let sources = MemorySources::new().with_file("/src/a.ts", source);

        let (_, output) =
            transform_file(&sources, Utf8Path::new("/src/a.ts"), &AutoPropsOptions::default())
                .unwrap();
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].code, DiagnosticCode::UnresolvedSymbol);

        let options = AutoPropsOptions {
            hide_warnings: true,
            ..Default::default()
        };
        let (_, output) = transform_file(&sources, Utf8Path::new("/src/a.ts"), &options).unwrap();
        assert!(output.diagnostics.is_empty());
        assert_eq!(output.components["Card"].props.len(), 0);
    }
}
