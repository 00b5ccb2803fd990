//! Member list extraction from object types.

use crate::diagnostic::DiagnosticCode;
use crate::meta::{PropertyMeta, ResolvedType, TypeTag};
use crate::transform::AutoPropsTransform;
use rustc_hash::FxHashSet;
use swc_common::{Span, Spanned};
use swc_ecma_ast::*;
use type_info::{DeclarationKind, ModuleId, SymbolId, TypeInfo, TypeNode};

impl<T: TypeInfo + ?Sized> AutoPropsTransform<'_, T> {
    /// Extracts one `PropertyMeta` per named member of an object type.
    ///
    /// Accepts type literals, intersections of them, and references to
    /// aliases or interfaces (directly or through imports). Anything that
    /// cannot be followed contributes no members and leaves a warning.
    pub(crate) fn properties_of(&mut self, module: ModuleId, ty: &TsType) -> Vec<PropertyMeta> {
        let mut out = Vec::new();
        self.collect_type(module, ty, &mut out);

        let mut seen = FxHashSet::default();
        out.retain(|prop| seen.insert(prop.name.clone()));
        out
    }

    fn collect_type(&mut self, module: ModuleId, ty: &TsType, out: &mut Vec<PropertyMeta>) {
        match ty {
            TsType::TsTypeLit(lit) => self.collect_members(module, &lit.members, out),
            TsType::TsParenthesizedType(paren) => self.collect_type(module, &paren.type_ann, out),
            TsType::TsTypeRef(reference) => self.collect_reference(module, reference, out),
            TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsIntersectionType(
                inter,
            )) => {
                for member in &inter.types {
                    match &**member {
                        TsType::TsTypeLit(_)
                        | TsType::TsTypeRef(_)
                        | TsType::TsParenthesizedType(_) => self.collect_type(module, member, out),
                        other => self.warn(
                            DiagnosticCode::UnsupportedPattern,
                            "intersection member is not an object type and is skipped",
                            other.span(),
                        ),
                    }
                }
            }
            other => self.warn(
                DiagnosticCode::UnsupportedPattern,
                "expected an object type, interface or intersection",
                other.span(),
            ),
        }
    }

    fn collect_reference(&mut self, module: ModuleId, reference: &TsTypeRef, out: &mut Vec<PropertyMeta>) {
        let Some(symbol) = self.info.symbol_at(module, &reference.type_name) else {
            let name = self.info.type_to_string(TypeNode::Entity(&reference.type_name));
            self.warn(
                DiagnosticCode::UnresolvedSymbol,
                format!("cannot find type `{name}`"),
                reference.span,
            );
            return;
        };
        self.collect_symbol(symbol, reference.span, out);
    }

    fn collect_symbol(&mut self, symbol: SymbolId, span: Span, out: &mut Vec<PropertyMeta>) {
        let name = self.info.symbol_name(symbol).to_string();
        let Some(decl) = self.info.first_declaration(symbol) else {
            self.warn(
                DiagnosticCode::MissingDeclaration,
                format!("type `{name}` has no declaration"),
                span,
            );
            return;
        };

        match decl.kind {
            DeclarationKind::TypeAlias(alias) => {
                if self.enter(symbol, &name, span) {
                    self.collect_type(decl.module, &alias.type_ann, out);
                    self.extracting.remove(&symbol);
                }
            }
            DeclarationKind::Interface(iface) => {
                if self.enter(symbol, &name, span) {
                    self.collect_interface(decl.module, iface, out);
                    self.extracting.remove(&symbol);
                }
            }
            DeclarationKind::Import(_) => match self.info.aliased_symbol(symbol) {
                Some(target) => self.collect_symbol(target, span, out),
                None => self.warn(
                    DiagnosticCode::UnresolvedImport,
                    format!("import `{name}` does not resolve to a local type alias or interface"),
                    span,
                ),
            },
            DeclarationKind::Class(_) | DeclarationKind::Enum(_) => self.warn(
                DiagnosticCode::UnsupportedDeclaration,
                format!("`{name}` is not a type alias or interface"),
                span,
            ),
        }
    }

    fn enter(&mut self, symbol: SymbolId, name: &str, span: Span) -> bool {
        if self.extracting.insert(symbol) {
            return true;
        }
        self.warn(
            DiagnosticCode::RecursiveType,
            format!("type `{name}` contains itself"),
            span,
        );
        false
    }

    fn collect_interface(&mut self, module: ModuleId, iface: &TsInterfaceDecl, out: &mut Vec<PropertyMeta>) {
        self.collect_members(module, &iface.body.body, out);

        for base in &iface.extends {
            let Expr::Ident(ident) = &*base.expr else {
                self.warn(
                    DiagnosticCode::UnsupportedPattern,
                    "qualified interface base is skipped",
                    base.span,
                );
                continue;
            };
            match self.info.symbol_named(module, &ident.sym) {
                Some(symbol) => self.collect_symbol(symbol, base.span, out),
                None => self.warn(
                    DiagnosticCode::UnresolvedSymbol,
                    format!("cannot find type `{}`", ident.sym),
                    base.span,
                ),
            }
        }
    }

    fn collect_members(&mut self, module: ModuleId, members: &[TsTypeElement], out: &mut Vec<PropertyMeta>) {
        for member in members {
            match member {
                TsTypeElement::TsPropertySignature(sig) => {
                    let Some(name) = member_name(&sig.key, sig.computed) else {
                        continue;
                    };
                    let ty = sig
                        .type_ann
                        .as_ref()
                        .and_then(|ann| self.resolve_type(module, &ann.type_ann, 1));
                    let required = !sig.optional
                        && !ty
                            .as_ref()
                            .is_some_and(|ty| ty.contains(&TypeTag::Undefined));

                    let mut prop = PropertyMeta::new(name, ty, required);
                    prop.doc = self.info.doc_comments(sig.span.lo);
                    out.push(prop);
                }
                TsTypeElement::TsMethodSignature(method) => {
                    let Some(name) = member_name(&method.key, method.computed) else {
                        continue;
                    };
                    let annotation = if module == self.origin {
                        self.info.type_to_string(TypeNode::Method(method))
                    } else {
                        TypeTag::Function.type_text()
                    };
                    let ty = ResolvedType::from_tags([TypeTag::Function]).with_annotation(annotation);

                    let mut prop = PropertyMeta::new(name, Some(ty), !method.optional);
                    prop.doc = self.info.doc_comments(method.span.lo);
                    out.push(prop);
                }
                _ => {}
            }
        }
    }
}

/// The name of a type member; `None` for computed and empty names.
fn member_name(key: &Expr, computed: bool) -> Option<String> {
    if computed {
        return None;
    }
    let name = match key {
        Expr::Ident(ident) => ident.sym.to_string(),
        Expr::Lit(Lit::Str(value)) => value.value.to_string_lossy().into_owned(),
        Expr::Lit(Lit::Num(number)) => match &number.raw {
            Some(raw) => raw.to_string(),
            None => number.value.to_string(),
        },
        _ => return None,
    };
    (!name.is_empty()).then_some(name)
}
