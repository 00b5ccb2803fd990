//! Component definition matching.
//!
//! Recognized top-level shapes:
//! - `const C = defineComponent<Props, Events, Slots>(...)`
//! - `const C = defineComponent((props: Props, ctx: SetupContext<Events, Slots>) => ..., { props })`
//! - `const C = defineComponent({ props, emits, setup(props: Props, ctx) {} })`
//! - `const C: FunctionalComponent<Props, Events, Slots> = (props, ctx) => ...`
//!
//! Explicit type arguments always win over parameter annotations.

use crate::diagnostic::DiagnosticCode;
use crate::meta::{ComponentMeta, ComponentMetaMap, PropertyMeta};
use crate::transform::AutoPropsTransform;
use crate::type_tag::entity_last_name;
use swc_common::Spanned;
use swc_ecma_ast::*;
use type_info::TypeInfo;

/// Where the types of one component come from.
#[derive(Debug, Default)]
struct TypeSources<'m> {
    props: Option<&'m TsType>,
    events: Option<&'m TsType>,
    slots: Option<&'m TsType>,
    excluded_props: Vec<String>,
    excluded_events: Vec<String>,
}

impl<'m> TypeSources<'m> {
    fn from_type_args(args: &'m [Box<TsType>]) -> Self {
        Self {
            props: args.first().map(|ty| &**ty),
            events: args.get(1).map(|ty| &**ty),
            slots: args.get(2).map(|ty| &**ty),
            ..Default::default()
        }
    }

    /// Fills sources that are still missing from callback parameters.
    fn or_params(&mut self, params: ParamTypes<'m>) {
        self.props = self.props.or(params.props);
        self.events = self.events.or(params.events);
        self.slots = self.slots.or(params.slots);
    }
}

/// Types read from `(props: P, ctx: Context<E, S>)`.
#[derive(Debug, Clone, Copy, Default)]
struct ParamTypes<'m> {
    props: Option<&'m TsType>,
    events: Option<&'m TsType>,
    slots: Option<&'m TsType>,
}

impl<'m> ParamTypes<'m> {
    fn from_params(params: &[&'m Pat]) -> Self {
        let (events, slots) = match params.get(1).copied().and_then(pat_type) {
            Some(TsType::TsTypeRef(context)) => (type_arg(context, 0), type_arg(context, 1)),
            _ => (None, None),
        };
        Self {
            props: params.first().copied().and_then(pat_type),
            events,
            slots,
        }
    }
}

/// What a component options object contributes.
#[derive(Debug, Default)]
struct Descriptor<'m> {
    setup: Option<ParamTypes<'m>>,
    excluded_props: Vec<String>,
    excluded_events: Vec<String>,
}

impl<T: TypeInfo + ?Sized> AutoPropsTransform<'_, T> {
    /// Scans the top-level variable declarations of the module this pass was
    /// created for.
    pub fn resolve_components(&mut self, module: &Module) -> ComponentMetaMap {
        let mut components = ComponentMetaMap::default();

        for item in &module.body {
            let var = match item {
                ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => var,
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
                    decl: Decl::Var(var),
                    ..
                })) => var,
                _ => continue,
            };

            for declarator in &var.decls {
                let Pat::Ident(binding) = &declarator.name else {
                    continue;
                };
                let Some(init) = declarator.init.as_deref() else {
                    continue;
                };
                let Some(sources) = self.match_component(binding, unwrap_parens(init)) else {
                    continue;
                };
                if let Some(meta) = self.component_meta(sources) {
                    components.insert(binding.id.sym.to_string(), meta);
                }
            }
        }

        components
    }

    fn match_component<'m>(&mut self, binding: &'m BindingIdent, init: &'m Expr) -> Option<TypeSources<'m>> {
        match init {
            Expr::Call(call) if self.is_factory_call(call) => Some(self.factory_sources(call)),
            Expr::Arrow(_) | Expr::Fn(_) => self.functional_sources(binding, init),
            _ => None,
        }
    }

    fn is_factory_call(&self, call: &CallExpr) -> bool {
        let Callee::Expr(callee) = &call.callee else {
            return false;
        };
        match &**callee {
            Expr::Ident(ident) => self.options.is_factory(&ident.sym),
            Expr::Member(member) => match &member.prop {
                MemberProp::Ident(prop) => self.options.is_factory(&prop.sym),
                _ => false,
            },
            _ => false,
        }
    }

    fn factory_sources<'m>(&mut self, call: &'m CallExpr) -> TypeSources<'m> {
        let type_args = call
            .type_args
            .as_deref()
            .map(|args| args.params.as_slice())
            .unwrap_or_default();
        let mut sources = TypeSources::from_type_args(type_args);

        let mut args = call
            .args
            .iter()
            .filter(|arg| arg.spread.is_none())
            .map(|arg| unwrap_parens(&arg.expr));

        match args.next() {
            Some(callback @ (Expr::Arrow(_) | Expr::Fn(_))) => {
                sources.or_params(ParamTypes::from_params(&callback_params(callback)));
                if let Some(Expr::Object(options)) = args.next() {
                    let descriptor = self.read_descriptor(options);
                    sources.excluded_props = descriptor.excluded_props;
                    sources.excluded_events = descriptor.excluded_events;
                }
            }
            Some(Expr::Object(options)) => {
                let descriptor = self.read_descriptor(options);
                if let Some(setup) = descriptor.setup {
                    sources.or_params(setup);
                }
                sources.excluded_props = descriptor.excluded_props;
                sources.excluded_events = descriptor.excluded_events;
            }
            _ => {}
        }

        sources
    }

    fn functional_sources<'m>(&self, binding: &'m BindingIdent, callback: &'m Expr) -> Option<TypeSources<'m>> {
        let annotation = binding.type_ann.as_deref()?;
        let TsType::TsTypeRef(reference) = &*annotation.type_ann else {
            return None;
        };
        if !self
            .options
            .is_functional_type(entity_last_name(&reference.type_name))
        {
            return None;
        }

        let type_args = reference
            .type_params
            .as_deref()
            .map(|args| args.params.as_slice())
            .unwrap_or_default();
        let mut sources = TypeSources::from_type_args(type_args);
        sources.or_params(ParamTypes::from_params(&callback_params(callback)));
        Some(sources)
    }

    fn read_descriptor<'m>(&mut self, object: &'m ObjectLit) -> Descriptor<'m> {
        let mut descriptor = Descriptor::default();

        for prop in &object.props {
            let PropOrSpread::Prop(prop) = prop else {
                continue;
            };
            match &**prop {
                Prop::Method(method) if prop_name(&method.key).as_deref() == Some("setup") => {
                    let params = method.function.params.iter().map(|param| &param.pat).collect::<Vec<_>>();
                    descriptor.setup = Some(ParamTypes::from_params(&params));
                }
                Prop::KeyValue(entry) => match prop_name(&entry.key).as_deref() {
                    Some("setup") => {
                        let value = unwrap_parens(&entry.value);
                        if matches!(value, Expr::Arrow(_) | Expr::Fn(_)) {
                            descriptor.setup = Some(ParamTypes::from_params(&callback_params(value)));
                        }
                    }
                    Some("props") => self.read_exclusions(&entry.value, &mut descriptor.excluded_props),
                    Some("events" | "emits") => {
                        self.read_exclusions(&entry.value, &mut descriptor.excluded_events)
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        descriptor
    }

    /// Collects hand-written names from `{ x: ... }` or `['x']`.
    fn read_exclusions(&mut self, value: &Expr, out: &mut Vec<String>) {
        match unwrap_parens(value) {
            Expr::Object(object) => {
                for prop in &object.props {
                    match prop {
                        PropOrSpread::Spread(spread) => self.warn(
                            DiagnosticCode::UnsupportedPattern,
                            "spread in hand-written declarations is ignored",
                            spread.dot3_token,
                        ),
                        PropOrSpread::Prop(prop) => match declared_name(prop) {
                            Some(name) => out.push(name),
                            None => self.warn(
                                DiagnosticCode::UnsupportedPattern,
                                "computed key in hand-written declarations is ignored",
                                prop.span(),
                            ),
                        },
                    }
                }
            }
            Expr::Array(array) => {
                for elem in array.elems.iter().flatten() {
                    match &*elem.expr {
                        Expr::Lit(Lit::Str(name)) if elem.spread.is_none() => {
                            out.push(name.value.to_string_lossy().into_owned())
                        }
                        other => self.warn(
                            DiagnosticCode::UnsupportedPattern,
                            "only string literals are read from a hand-written name list",
                            other.span(),
                        ),
                    }
                }
            }
            _ => {}
        }
    }

    fn component_meta(&mut self, sources: TypeSources<'_>) -> Option<ComponentMeta> {
        let props_type = sources.props?;
        let origin = self.origin;

        let mut props = self.properties_of(origin, props_type);
        exclude(&mut props, &sources.excluded_props);

        let mut events = match sources.events {
            Some(ty) => self.properties_of(origin, ty),
            None => Vec::new(),
        };
        exclude(&mut events, &sources.excluded_events);

        let slots = match sources.slots {
            Some(ty) => self.properties_of(origin, ty),
            None => Vec::new(),
        };

        Some(ComponentMeta {
            props,
            events,
            slots,
        })
    }
}

fn exclude(list: &mut Vec<PropertyMeta>, names: &[String]) {
    list.retain(|prop| !names.contains(&prop.name));
}

fn unwrap_parens(mut expr: &Expr) -> &Expr {
    while let Expr::Paren(paren) = expr {
        expr = &paren.expr;
    }
    expr
}

fn callback_params(callback: &Expr) -> Vec<&Pat> {
    match callback {
        Expr::Arrow(arrow) => arrow.params.iter().collect(),
        Expr::Fn(func) => func.function.params.iter().map(|param| &param.pat).collect(),
        _ => Vec::new(),
    }
}

/// The type annotation of a parameter pattern.
fn pat_type(pat: &Pat) -> Option<&TsType> {
    let annotation = match pat {
        Pat::Ident(binding) => binding.type_ann.as_deref(),
        Pat::Object(object) => object.type_ann.as_deref(),
        Pat::Array(array) => array.type_ann.as_deref(),
        Pat::Rest(rest) => rest.type_ann.as_deref(),
        Pat::Assign(assign) => return pat_type(&assign.left),
        _ => None,
    };
    annotation.map(|ann| &*ann.type_ann)
}

fn type_arg(reference: &TsTypeRef, index: usize) -> Option<&TsType> {
    reference
        .type_params
        .as_deref()
        .and_then(|args| args.params.get(index))
        .map(|ty| &**ty)
}

fn prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(value) => Some(value.value.to_string_lossy().into_owned()),
        PropName::Num(number) => Some(number.value.to_string()),
        PropName::Computed(_) | PropName::BigInt(_) => None,
    }
}

fn declared_name(prop: &Prop) -> Option<String> {
    match prop {
        Prop::Shorthand(ident) => Some(ident.sym.to_string()),
        Prop::KeyValue(entry) => prop_name(&entry.key),
        Prop::Method(method) => prop_name(&method.key),
        Prop::Getter(getter) => prop_name(&getter.key),
        Prop::Setter(setter) => prop_name(&setter.key),
        Prop::Assign(assign) => Some(assign.key.sym.to_string()),
    }
}
