//! A loaded graph of TypeScript modules with per-module symbol tables.

use crate::error::ProgramError;
use crate::info::{
    Declaration, DeclarationKind, ModuleId, SymbolId, TypeInfo, TypeNode,
};
use crate::source::{normalize, resolve_specifier, SourceProvider};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use swc_common::comments::{CommentKind, Comments, SingleThreadedComments};
use swc_common::sync::Lrc;
use swc_common::{BytePos, FileName, SourceMap, SourceMapper, Span, Spanned};
use swc_ecma_ast::{
    Decl, DefaultDecl, ImportSpecifier, Module, ModuleDecl, ModuleExportName, ModuleItem, Stmt,
    TsEntityName, TsFnParam,
};
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

/// Upper bound on re-export hops followed while resolving one import.
const MAX_EXPORT_HOPS: usize = 32;

/// A set of parsed modules reachable from an entry module.
///
/// All modules share one source map and one comment store, so spans and
/// byte positions are unique across the whole program.
pub struct Program {
    source_map: Lrc<SourceMap>,
    comments: SingleThreadedComments,
    modules: Vec<ModuleData>,
    paths: FxHashMap<Utf8PathBuf, ModuleId>,
    failed: FxHashSet<Utf8PathBuf>,
    symbols: Vec<SymbolData>,
    dependency_errors: Vec<ProgramError>,
}

struct ModuleData {
    path: Utf8PathBuf,
    source: String,
    module: Module,
    /// Resolved target for every import/re-export specifier.
    dependencies: FxHashMap<String, Option<ModuleId>>,
    /// Top-level type-namespace bindings.
    scope: FxHashMap<SmolStr, SymbolId>,
    exports: IndexMap<SmolStr, ExportEntry>,
    star_exports: Vec<Option<ModuleId>>,
}

#[derive(Debug, Clone)]
enum ExportEntry {
    /// Exported under a local binding name.
    Local(SmolStr),
    /// `export { name } from '...'`
    Reexport {
        from: Option<ModuleId>,
        name: SmolStr,
        /// `export type { name } from '...'`
        type_only: bool,
    },
}

struct SymbolData {
    module: ModuleId,
    name: SmolStr,
    site: DeclSite,
}

enum DeclSite {
    /// A `Stmt::Decl` or `export` declaration at this body index.
    Decl(usize),
    /// An `export default interface/class` at this body index.
    DefaultExport(usize),
    Import {
        item: usize,
        specifier: usize,
        from: Option<ModuleId>,
        imported: ImportedName,
        /// `import type { .. }` or `import { type .. }`
        type_only: bool,
    },
}

enum ImportedName {
    Named(SmolStr),
    Namespace,
}

impl Program {
    fn empty() -> Self {
        Self {
            source_map: Default::default(),
            comments: SingleThreadedComments::default(),
            modules: Vec::new(),
            paths: FxHashMap::default(),
            failed: FxHashSet::default(),
            symbols: Vec::new(),
            dependency_errors: Vec::new(),
        }
    }

    /// Loads `entry` and every local module it transitively imports.
    ///
    /// A failure to read or parse the entry module is an error. Failures in
    /// dependencies are recorded in [`Program::dependency_errors`] and the
    /// affected imports simply stay unresolved.
    pub fn load(
        sources: &dyn SourceProvider,
        entry: &Utf8Path,
    ) -> Result<(Self, ModuleId), ProgramError> {
        let mut program = Self::empty();
        let entry = normalize(entry);
        let text = sources
            .read(&entry)
            .ok_or_else(|| ProgramError::Read {
                path: entry.clone(),
            })?;
        let entry_id = program.parse_module(entry, text)?;

        let mut next = 0;
        while next < program.modules.len() {
            let id = ModuleId::new(next);
            next += 1;
            for specifier in program.specifiers(id) {
                let target = program.load_dependency(sources, id, &specifier);
                program.modules[id.index()]
                    .dependencies
                    .insert(specifier, target);
            }
        }

        for index in 0..program.modules.len() {
            program.index_module(ModuleId::new(index));
        }

        Ok((program, entry_id))
    }

    /// Returns the parsed module.
    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.index()].module
    }

    /// Returns the source text of a module.
    pub fn source(&self, id: ModuleId) -> &str {
        &self.modules[id.index()].source
    }

    /// Returns the path a module was loaded from.
    pub fn path(&self, id: ModuleId) -> &Utf8Path {
        &self.modules[id.index()].path
    }

    /// Returns the id of an already loaded module.
    pub fn module_id(&self, path: &Utf8Path) -> Option<ModuleId> {
        self.paths.get(&normalize(path)).copied()
    }

    /// Returns the number of loaded modules.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Errors from dependencies that could not be read or parsed.
    pub fn dependency_errors(&self) -> &[ProgramError] {
        &self.dependency_errors
    }

    /// Converts a byte position into a 1-indexed `(line, column)` pair.
    pub fn line_col(&self, pos: BytePos) -> (usize, usize) {
        let loc = self.source_map.lookup_char_pos(pos);
        (loc.line, loc.col.0 + 1)
    }

    fn parse_module(&mut self, path: Utf8PathBuf, text: String) -> Result<ModuleId, ProgramError> {
        let file = self
            .source_map
            .new_source_file(Lrc::new(FileName::Custom(path.to_string())), text.clone());
        let syntax = Syntax::Typescript(TsSyntax {
            tsx: path.extension() == Some("tsx"),
            dts: path.as_str().ends_with(".d.ts"),
            ..Default::default()
        });

        let comments: &dyn Comments = &self.comments;
        let mut parser = Parser::new(syntax, StringInput::from(&*file), Some(comments));
        let module = parser.parse_module().map_err(|err| {
            let loc = self.source_map.lookup_char_pos(err.span().lo);
            ProgramError::Parse {
                path: path.clone(),
                line: loc.line,
                column: loc.col.0 + 1,
                message: err.kind().msg().into_owned(),
            }
        })?;

        let id = ModuleId::new(self.modules.len());
        self.paths.insert(path.clone(), id);
        self.modules.push(ModuleData {
            path,
            source: text,
            module,
            dependencies: FxHashMap::default(),
            scope: FxHashMap::default(),
            exports: IndexMap::new(),
            star_exports: Vec::new(),
        });
        Ok(id)
    }

    fn specifiers(&self, id: ModuleId) -> Vec<String> {
        let mut out = Vec::new();
        for item in &self.modules[id.index()].module.body {
            let ModuleItem::ModuleDecl(decl) = item else {
                continue;
            };
            let src = match decl {
                ModuleDecl::Import(import) => Some(&import.src),
                ModuleDecl::ExportNamed(named) => named.src.as_ref(),
                ModuleDecl::ExportAll(all) => Some(&all.src),
                _ => None,
            };
            if let Some(src) = src {
                let specifier = src.value.to_string_lossy().into_owned();
                if !out.contains(&specifier) {
                    out.push(specifier);
                }
            }
        }
        out
    }

    fn load_dependency(
        &mut self,
        sources: &dyn SourceProvider,
        importer: ModuleId,
        specifier: &str,
    ) -> Option<ModuleId> {
        let path = resolve_specifier(&self.modules[importer.index()].path, specifier, sources)?;
        if let Some(id) = self.paths.get(&path) {
            return Some(*id);
        }
        if self.failed.contains(&path) {
            return None;
        }

        let loaded = sources
            .read(&path)
            .ok_or_else(|| ProgramError::Read { path: path.clone() })
            .and_then(|text| self.parse_module(path.clone(), text));
        match loaded {
            Ok(id) => Some(id),
            Err(err) => {
                self.failed.insert(path);
                self.dependency_errors.push(err);
                None
            }
        }
    }

    fn index_module(&mut self, id: ModuleId) {
        let data = &self.modules[id.index()];
        let mut indexer = ModuleIndexer {
            module: id,
            base: self.symbols.len(),
            symbols: Vec::new(),
            scope: FxHashMap::default(),
            exports: IndexMap::new(),
            star_exports: Vec::new(),
        };

        for (index, item) in data.module.body.iter().enumerate() {
            match item {
                ModuleItem::Stmt(Stmt::Decl(decl)) => indexer.declare(decl, index, false),
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                    indexer.declare(&export.decl, index, true)
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(default)) => {
                    let name = match &default.decl {
                        DefaultDecl::TsInterfaceDecl(iface) => Some(&iface.id.sym),
                        DefaultDecl::Class(class) => class.ident.as_ref().map(|ident| &ident.sym),
                        DefaultDecl::Fn(_) => None,
                    };
                    if let Some(name) = name {
                        let name = SmolStr::new(&**name);
                        indexer.bind(name.clone(), DeclSite::DefaultExport(index));
                        indexer
                            .exports
                            .insert(SmolStr::new_static("default"), ExportEntry::Local(name));
                    }
                }
                ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                    let from = data
                        .dependencies
                        .get(&*import.src.value.to_string_lossy())
                        .copied()
                        .flatten();
                    for (position, specifier) in import.specifiers.iter().enumerate() {
                        let mut type_only = import.type_only;
                        let (local, imported) = match specifier {
                            ImportSpecifier::Named(named) => {
                                type_only |= named.is_type_only;
                                let local = SmolStr::new(&*named.local.sym);
                                let imported = named
                                    .imported
                                    .as_ref()
                                    .map(export_name)
                                    .unwrap_or_else(|| local.clone());
                                (local, ImportedName::Named(imported))
                            }
                            ImportSpecifier::Default(default) => (
                                SmolStr::new(&*default.local.sym),
                                ImportedName::Named(SmolStr::new_static("default")),
                            ),
                            ImportSpecifier::Namespace(namespace) => (
                                SmolStr::new(&*namespace.local.sym),
                                ImportedName::Namespace,
                            ),
                        };
                        indexer.bind(
                            local,
                            DeclSite::Import {
                                item: index,
                                specifier: position,
                                from,
                                imported,
                                type_only,
                            },
                        );
                    }
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportNamed(named_export)) => {
                    let source = named_export.src.as_ref().map(|src| {
                        data.dependencies
                            .get(&*src.value.to_string_lossy())
                            .copied()
                            .flatten()
                    });
                    for specifier in &named_export.specifiers {
                        let swc_ecma_ast::ExportSpecifier::Named(named) = specifier else {
                            continue;
                        };
                        let orig = export_name(&named.orig);
                        let exported = named
                            .exported
                            .as_ref()
                            .map(export_name)
                            .unwrap_or_else(|| orig.clone());
                        let entry = match source {
                            Some(from) => ExportEntry::Reexport {
                                from,
                                name: orig,
                                type_only: named_export.type_only || named.is_type_only,
                            },
                            None => ExportEntry::Local(orig),
                        };
                        indexer.exports.insert(exported, entry);
                    }
                }
                ModuleItem::ModuleDecl(ModuleDecl::ExportAll(all)) => {
                    let from = data
                        .dependencies
                        .get(&*all.src.value.to_string_lossy())
                        .copied()
                        .flatten();
                    indexer.star_exports.push(from);
                }
                _ => {}
            }
        }

        let ModuleIndexer {
            symbols,
            scope,
            exports,
            star_exports,
            ..
        } = indexer;
        self.symbols.extend(symbols);
        let data = &mut self.modules[id.index()];
        data.scope = scope;
        data.exports = exports;
        data.star_exports = star_exports;
    }

    fn lookup(&self, module: ModuleId, name: &str) -> Option<SymbolId> {
        self.modules[module.index()].scope.get(name).copied()
    }

    fn resolve_export(&self, module: ModuleId, name: &str, hops: &mut usize) -> Option<SymbolId> {
        self.resolve_export_tracked(module, name, hops, &mut false)
    }

    /// Resolves an export, setting `type_only` when a hop is a type-only re-export.
    fn resolve_export_tracked(
        &self,
        module: ModuleId,
        name: &str,
        hops: &mut usize,
        type_only: &mut bool,
    ) -> Option<SymbolId> {
        if *hops >= MAX_EXPORT_HOPS {
            return None;
        }
        *hops += 1;

        let data = &self.modules[module.index()];
        if let Some(entry) = data.exports.get(name) {
            return match entry {
                ExportEntry::Local(local) => self.lookup(module, local),
                ExportEntry::Reexport {
                    from,
                    name,
                    type_only: reexport_type_only,
                } => {
                    *type_only |= *reexport_type_only;
                    self.resolve_export_tracked((*from)?, name, hops, type_only)
                }
            };
        }
        if name == "default" {
            return None;
        }
        data.star_exports
            .iter()
            .flatten()
            .find_map(|from| {
                let mut branch_type_only = *type_only;
                let found = self.resolve_export_tracked(*from, name, hops, &mut branch_type_only)?;
                *type_only = branch_type_only;
                Some(found)
            })
    }

    fn snippet(&self, span: Span) -> String {
        self.source_map.span_to_snippet(span).unwrap_or_default()
    }
}

struct ModuleIndexer {
    module: ModuleId,
    base: usize,
    symbols: Vec<SymbolData>,
    scope: FxHashMap<SmolStr, SymbolId>,
    exports: IndexMap<SmolStr, ExportEntry>,
    star_exports: Vec<Option<ModuleId>>,
}

impl ModuleIndexer {
    fn declare(&mut self, decl: &Decl, index: usize, exported: bool) {
        let name = match decl {
            Decl::TsTypeAlias(alias) => &alias.id.sym,
            Decl::TsInterface(iface) => &iface.id.sym,
            Decl::Class(class) => &class.ident.sym,
            Decl::TsEnum(en) => &en.id.sym,
            _ => return,
        };
        let name = SmolStr::new(&**name);
        if exported {
            self.exports
                .entry(name.clone())
                .or_insert_with(|| ExportEntry::Local(name.clone()));
        }
        self.bind(name, DeclSite::Decl(index));
    }

    /// Binds a name; the first declaration of a name wins.
    fn bind(&mut self, name: SmolStr, site: DeclSite) {
        if self.scope.contains_key(&name) {
            return;
        }
        let id = SymbolId::new(self.base + self.symbols.len());
        self.symbols.push(SymbolData {
            module: self.module,
            name: name.clone(),
            site,
        });
        self.scope.insert(name, id);
    }
}

impl TypeInfo for Program {
    fn symbol_at(&self, module: ModuleId, name: &TsEntityName) -> Option<SymbolId> {
        match name {
            TsEntityName::Ident(ident) => self.lookup(module, &ident.sym),
            TsEntityName::TsQualifiedName(qualified) => {
                let TsEntityName::Ident(left) = &qualified.left else {
                    return None;
                };
                let namespace = self.lookup(module, &left.sym)?;
                let DeclSite::Import {
                    from: Some(from),
                    imported: ImportedName::Namespace,
                    ..
                } = &self.symbols[namespace.index()].site
                else {
                    return None;
                };
                self.resolve_export(*from, &qualified.right.sym, &mut 0)
            }
        }
    }

    fn symbol_named(&self, module: ModuleId, name: &str) -> Option<SymbolId> {
        self.lookup(module, name)
    }

    fn symbol_name(&self, symbol: SymbolId) -> &str {
        &self.symbols[symbol.index()].name
    }

    fn first_declaration(&self, symbol: SymbolId) -> Option<Declaration<'_>> {
        let data = &self.symbols[symbol.index()];
        let body = &self.modules[data.module.index()].module.body;
        let kind = match &data.site {
            DeclSite::Decl(index) => match item_decl(&body[*index])? {
                Decl::TsTypeAlias(alias) => DeclarationKind::TypeAlias(alias),
                Decl::TsInterface(iface) => DeclarationKind::Interface(iface),
                Decl::Class(class) => DeclarationKind::Class(&class.ident),
                Decl::TsEnum(en) => DeclarationKind::Enum(en),
                _ => return None,
            },
            DeclSite::DefaultExport(index) => {
                let ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(default)) = &body[*index]
                else {
                    return None;
                };
                match &default.decl {
                    DefaultDecl::TsInterfaceDecl(iface) => DeclarationKind::Interface(iface),
                    DefaultDecl::Class(class) => DeclarationKind::Class(class.ident.as_ref()?),
                    DefaultDecl::Fn(_) => return None,
                }
            }
            DeclSite::Import {
                item, specifier, ..
            } => {
                let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = &body[*item] else {
                    return None;
                };
                DeclarationKind::Import(import.specifiers.get(*specifier)?)
            }
        };

        Some(Declaration {
            module: data.module,
            kind,
        })
    }

    fn aliased_symbol(&self, symbol: SymbolId) -> Option<SymbolId> {
        let mut current = symbol;
        let mut hops = 0;
        while let DeclSite::Import {
            from,
            imported: ImportedName::Named(name),
            ..
        } = &self.symbols[current.index()].site
        {
            current = self.resolve_export((*from)?, name, &mut hops)?;
        }
        (current != symbol).then_some(current)
    }

    fn is_type_only(&self, symbol: SymbolId) -> bool {
        let mut current = symbol;
        let mut hops = 0;
        let mut type_only = false;
        while let DeclSite::Import {
            from,
            imported,
            type_only: import_type_only,
            ..
        } = &self.symbols[current.index()].site
        {
            type_only |= *import_type_only;
            let (Some(from), ImportedName::Named(name)) = (from, imported) else {
                break;
            };
            match self.resolve_export_tracked(*from, name, &mut hops, &mut type_only) {
                Some(next) => current = next,
                None => break,
            }
        }
        type_only
    }

    fn type_to_string(&self, node: TypeNode<'_>) -> String {
        match node {
            TypeNode::Type(ty) => self.snippet(ty.span()),
            TypeNode::Entity(name) => self.snippet(name.span()),
            TypeNode::Method(method) => {
                let params = method
                    .params
                    .iter()
                    .map(|param| self.snippet(fn_param_span(param)))
                    .collect::<Vec<_>>()
                    .join(", ");
                let ret = method
                    .type_ann
                    .as_ref()
                    .map(|ann| self.snippet(ann.type_ann.span()))
                    .unwrap_or_else(|| "any".to_string());
                format!("({params}) => {ret}")
            }
        }
    }

    fn doc_comments(&self, pos: BytePos) -> Vec<String> {
        let Some(comments) = self.comments.get_leading(pos) else {
            return Vec::new();
        };
        comments
            .iter()
            .filter(|comment| comment.kind == CommentKind::Block && comment.text.starts_with('*'))
            .flat_map(|comment| jsdoc_lines(&comment.text))
            .collect()
    }
}

fn item_decl(item: &ModuleItem) -> Option<&Decl> {
    match item {
        ModuleItem::Stmt(Stmt::Decl(decl)) => Some(decl),
        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => Some(&export.decl),
        _ => None,
    }
}

fn export_name(name: &ModuleExportName) -> SmolStr {
    match name {
        ModuleExportName::Ident(ident) => SmolStr::new(&*ident.sym),
        ModuleExportName::Str(value) => SmolStr::new(value.value.to_string_lossy()),
    }
}

/// The span of a function parameter including its type annotation.
fn fn_param_span(param: &TsFnParam) -> Span {
    let (span, ann) = match param {
        TsFnParam::Ident(binding) => (binding.span(), binding.type_ann.as_deref()),
        TsFnParam::Array(array) => (array.span, array.type_ann.as_deref()),
        TsFnParam::Rest(rest) => (rest.span, rest.type_ann.as_deref()),
        TsFnParam::Object(object) => (object.span, object.type_ann.as_deref()),
    };
    match ann {
        Some(ann) if ann.span.hi > span.hi => span.with_hi(ann.span.hi),
        _ => span,
    }
}

/// Splits the body of a `/** ... */` comment into cleaned lines.
fn jsdoc_lines(text: &str) -> Vec<String> {
    text.trim_start_matches('*')
        .lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
