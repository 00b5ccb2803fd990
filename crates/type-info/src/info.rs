//! The type information interface consumed by the props engine.

use swc_common::BytePos;
use swc_ecma_ast::{
    Ident, ImportSpecifier, TsEntityName, TsEnumDecl, TsInterfaceDecl, TsMethodSignature, TsType,
    TsTypeAliasDecl,
};

/// Identifies a loaded module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(u32);

impl ModuleId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Returns the index of this module in load order.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies a named type-level declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// The first declaration of a symbol together with the module declaring it.
#[derive(Debug, Clone, Copy)]
pub struct Declaration<'a> {
    /// The module the declaration node belongs to.
    pub module: ModuleId,
    /// The declaration node.
    pub kind: DeclarationKind<'a>,
}

/// The syntactic kind of a declaration.
#[derive(Debug, Clone, Copy)]
pub enum DeclarationKind<'a> {
    /// `type Name = ...`
    TypeAlias(&'a TsTypeAliasDecl),
    /// `interface Name { ... }`
    Interface(&'a TsInterfaceDecl),
    /// `class Name { ... }` (its identifier).
    Class(&'a Ident),
    /// `enum Name { ... }`
    Enum(&'a TsEnumDecl),
    /// A binding introduced by an import declaration.
    Import(&'a ImportSpecifier),
}

/// A node whose canonical text can be requested.
#[derive(Debug, Clone, Copy)]
pub enum TypeNode<'a> {
    /// A type annotation expression.
    Type(&'a TsType),
    /// A method signature, rendered as a function type.
    Method(&'a TsMethodSignature),
    /// A (possibly qualified) type name.
    Entity(&'a TsEntityName),
}

/// Symbol and type queries over a set of parsed modules.
///
/// Every query is side-effect free. A `None` answer is a recoverable miss,
/// never an error.
pub trait TypeInfo {
    /// Looks up the symbol a type name refers to from inside `module`.
    fn symbol_at(&self, module: ModuleId, name: &TsEntityName) -> Option<SymbolId>;

    /// Looks up a plain identifier in the type scope of `module`.
    fn symbol_named(&self, module: ModuleId, name: &str) -> Option<SymbolId>;

    /// Returns the declared name of a symbol.
    fn symbol_name(&self, symbol: SymbolId) -> &str;

    /// Returns the first declaration of a symbol.
    fn first_declaration(&self, symbol: SymbolId) -> Option<Declaration<'_>>;

    /// Follows an import binding to the symbol it ultimately names.
    fn aliased_symbol(&self, symbol: SymbolId) -> Option<SymbolId>;

    /// Whether an import binding, or any re-export it passes through, is
    /// type-only and therefore erased from the emitted JavaScript.
    fn is_type_only(&self, symbol: SymbolId) -> bool;

    /// Returns the canonical text of a type node.
    fn type_to_string(&self, node: TypeNode<'_>) -> String;

    /// Returns the JSDoc lines attached in front of `pos`.
    fn doc_comments(&self, pos: BytePos) -> Vec<String>;
}
