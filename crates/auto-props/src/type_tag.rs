//! Type annotation to runtime tag resolution.
//!
//! Depth 1 is a property's own declared type. Only a depth-1 resolution
//! carries a `PropType` annotation; nested resolutions return bare tags for
//! the enclosing combinator to merge.

use crate::diagnostic::DiagnosticCode;
use crate::meta::{merge_tags, union_text, LiteralKind, LiteralTag, ResolvedType, TypeTag};
use crate::transform::AutoPropsTransform;
use swc_ecma_ast::*;
use type_info::{DeclarationKind, ModuleId, SymbolId, TypeInfo, TypeNode};

/// Global names that are also runtime constructors.
const GLOBAL_CONSTRUCTORS: &[&str] = &[
    "Date", "RegExp", "Map", "Set", "WeakMap", "WeakSet", "Promise", "Error", "Symbol",
];

impl<T: TypeInfo + ?Sized> AutoPropsTransform<'_, T> {
    /// Resolves a type annotation found in `module`.
    ///
    /// Returns `None` when nothing in the type maps to a runtime tag.
    pub(crate) fn resolve_type(
        &mut self,
        module: ModuleId,
        ty: &TsType,
        depth: usize,
    ) -> Option<ResolvedType> {
        let tags = self.type_tags(module, ty, depth);
        if tags.is_empty() {
            return None;
        }

        let resolved = ResolvedType::from_tags(tags);
        if depth > 1 || is_self_describing(ty, &resolved.tags) {
            return Some(resolved);
        }

        // foreign type text may name things that are not in scope here
        let annotation = if module == self.origin {
            self.info.type_to_string(TypeNode::Type(ty))
        } else {
            union_text(&resolved.tags)
        };
        Some(resolved.with_annotation(annotation))
    }

    /// Flattened tags for `ty`; empty when unresolved.
    fn type_tags(&mut self, module: ModuleId, ty: &TsType, depth: usize) -> Vec<TypeTag> {
        match ty {
            TsType::TsKeywordType(keyword) => keyword_tag(keyword.kind).into_iter().collect(),
            TsType::TsArrayType(array) => {
                vec![TypeTag::Array(self.type_tags(module, &array.elem_type, depth + 1))]
            }
            TsType::TsTupleType(tuple) => {
                let mut inner = Vec::new();
                for elem in &tuple.elem_types {
                    let tags = self.type_tags(module, &elem.ty, depth + 1);
                    merge_tags(&mut inner, tags);
                }
                vec![TypeTag::Array(inner)]
            }
            TsType::TsFnOrConstructorType(_) => vec![TypeTag::Function],
            TsType::TsParenthesizedType(paren) => self.type_tags(module, &paren.type_ann, depth),
            TsType::TsOptionalType(optional) => self.type_tags(module, &optional.type_ann, depth),
            TsType::TsTypeOperator(op) if op.op == TsTypeOperatorOp::ReadOnly => {
                self.type_tags(module, &op.type_ann, depth)
            }
            TsType::TsLitType(lit) => self.literal_tag(ty, &lit.lit).into_iter().collect(),
            TsType::TsTypeLit(_) | TsType::TsMappedType(_) => vec![TypeTag::Object],
            TsType::TsUnionOrIntersectionType(combined) => {
                let members = match combined {
                    TsUnionOrIntersectionType::TsUnionType(union) => &union.types,
                    TsUnionOrIntersectionType::TsIntersectionType(inter) => &inter.types,
                };
                let mut tags = Vec::new();
                for member in members {
                    let resolved = self.type_tags(module, member, depth + 1);
                    merge_tags(&mut tags, resolved);
                }
                tags
            }
            TsType::TsTypeRef(reference) => self.reference_tags(module, reference, depth),
            _ => Vec::new(),
        }
    }

    fn literal_tag(&self, ty: &TsType, lit: &TsLit) -> Option<TypeTag> {
        let kind = match lit {
            TsLit::Str(_) | TsLit::Tpl(_) => LiteralKind::Str,
            TsLit::Number(_) => LiteralKind::Num,
            TsLit::Bool(_) => LiteralKind::Bool,
            TsLit::BigInt(_) => return None,
        };
        Some(TypeTag::Literal(LiteralTag {
            text: self.info.type_to_string(TypeNode::Type(ty)),
            kind,
        }))
    }

    fn reference_tags(&mut self, module: ModuleId, reference: &TsTypeRef, depth: usize) -> Vec<TypeTag> {
        match self.info.symbol_at(module, &reference.type_name) {
            Some(symbol) => self.symbol_tags(module, reference, symbol, depth),
            None => self.builtin_tags(module, reference, depth),
        }
    }

    fn symbol_tags(
        &mut self,
        module: ModuleId,
        reference: &TsTypeRef,
        symbol: SymbolId,
        depth: usize,
    ) -> Vec<TypeTag> {
        let Some(decl) = self.info.first_declaration(symbol) else {
            return self.builtin_tags(module, reference, depth);
        };

        match decl.kind {
            // imports are transparent and do not add nesting
            DeclarationKind::Import(_) => match self.info.aliased_symbol(symbol) {
                Some(target) => {
                    let mut tags = self.symbol_tags(module, reference, target, depth);
                    // a type-only binding does not exist at runtime
                    if self.info.is_type_only(symbol) {
                        for tag in &mut tags {
                            if let TypeTag::Opaque(opaque) = tag {
                                opaque.constructor = false;
                            }
                        }
                    }
                    tags
                }
                None => self.builtin_tags(module, reference, depth),
            },
            DeclarationKind::TypeAlias(alias) => {
                if !self.resolving.insert(symbol) {
                    let name = self.info.symbol_name(symbol).to_string();
                    self.warn(
                        DiagnosticCode::RecursiveType,
                        format!("type alias `{name}` refers to itself"),
                        reference.span,
                    );
                    return Vec::new();
                }
                let tags = self.type_tags(decl.module, &alias.type_ann, depth + 1);
                self.resolving.remove(&symbol);
                tags
            }
            DeclarationKind::Interface(_) => vec![TypeTag::Object],
            DeclarationKind::Class(_) => {
                let name = self.info.type_to_string(TypeNode::Entity(&reference.type_name));
                vec![TypeTag::opaque(name, module == self.origin)]
            }
            DeclarationKind::Enum(decl) => {
                let has_strings = decl.members.iter().any(|member| {
                    matches!(
                        member.init.as_deref(),
                        Some(Expr::Lit(Lit::Str(_))) | Some(Expr::Tpl(_))
                    )
                });
                vec![if has_strings {
                    TypeTag::String
                } else {
                    TypeTag::Number
                }]
            }
        }
    }

    /// Tags for names with no local declaration.
    fn builtin_tags(&mut self, module: ModuleId, reference: &TsTypeRef, depth: usize) -> Vec<TypeTag> {
        let tag = match entity_last_name(&reference.type_name) {
            "Array" | "ReadonlyArray" => {
                let inner = match reference
                    .type_params
                    .as_deref()
                    .and_then(|args| args.params.first())
                {
                    Some(arg) => self.type_tags(module, arg, depth + 1),
                    None => Vec::new(),
                };
                TypeTag::Array(inner)
            }
            "Record" | "Partial" | "Required" | "Readonly" | "Pick" | "Omit" => TypeTag::Object,
            "String" => TypeTag::String,
            "Number" => TypeTag::Number,
            "Boolean" => TypeTag::Boolean,
            "Object" => TypeTag::Object,
            "Function" => TypeTag::Function,
            name if GLOBAL_CONSTRUCTORS.contains(&name) => TypeTag::opaque(name, true),
            _ => {
                let name = self.info.type_to_string(TypeNode::Entity(&reference.type_name));
                TypeTag::opaque(name, false)
            }
        };
        vec![tag]
    }
}

fn keyword_tag(kind: TsKeywordTypeKind) -> Option<TypeTag> {
    match kind {
        TsKeywordTypeKind::TsStringKeyword => Some(TypeTag::String),
        TsKeywordTypeKind::TsNumberKeyword => Some(TypeTag::Number),
        TsKeywordTypeKind::TsBooleanKeyword => Some(TypeTag::Boolean),
        TsKeywordTypeKind::TsObjectKeyword => Some(TypeTag::Object),
        TsKeywordTypeKind::TsAnyKeyword | TsKeywordTypeKind::TsUnknownKeyword => Some(TypeTag::Any),
        TsKeywordTypeKind::TsUndefinedKeyword | TsKeywordTypeKind::TsVoidKeyword => {
            Some(TypeTag::Undefined)
        }
        _ => None,
    }
}

/// Whether the runtime constructor alone describes the type.
fn is_self_describing(ty: &TsType, tags: &[TypeTag]) -> bool {
    if matches!(ty, TsType::TsKeywordType(_)) {
        return true;
    }
    match tags {
        [TypeTag::String | TypeTag::Number | TypeTag::Boolean | TypeTag::Any] => true,
        [TypeTag::Opaque(opaque)] => opaque.constructor,
        _ => false,
    }
}

pub(crate) fn entity_last_name(name: &TsEntityName) -> &str {
    match name {
        TsEntityName::Ident(ident) => &ident.sym,
        TsEntityName::TsQualifiedName(qualified) => &qualified.right.sym,
    }
}
