//! Patch rendering for the Vue 3 runtime.

use crate::meta::{ComponentMeta, ComponentMetaMap, LiteralKind, PropertyMeta, ResolvedType, TypeTag};
use crate::options::{AutoPropsOptions, JsDocMode};

/// Renders the patch for every component, separated by blank lines.
pub fn render_components(components: &ComponentMetaMap, options: &AutoPropsOptions) -> String {
    components
        .iter()
        .map(|(name, meta)| render_component(name, meta, options))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the statements installing props and emits on `name`.
pub fn render_component(name: &str, meta: &ComponentMeta, options: &AutoPropsOptions) -> String {
    let mut out = String::new();
    // hand-written `props: ['a']` becomes `{ a: null }` so named keys are read
    out.push_str(&format!(
        "if ({name}.props === undefined) {{\n  {name}.props = {{}};\n}} else if (Array.isArray({name}.props)) {{\n  {name}.props = Object.fromEntries({name}.props.map((key) => [key, null]));\n}}\n"
    ));
    out.push_str(&format!("if ({name}.emits === undefined) {{\n  {name}.emits = [];\n}}\n"));

    for prop in &meta.props {
        render_prop(&mut out, name, prop, options);
    }

    if !meta.events.is_empty() {
        render_events(&mut out, name, &meta.events);
    }

    out
}

/// Registers events on either an `emits` list or an `emits` validator object.
fn render_events(out: &mut String, component: &str, events: &[PropertyMeta]) {
    let names = events
        .iter()
        .map(|event| js_string(&event.name))
        .collect::<Vec<_>>();
    out.push_str(&format!(
        "if (Array.isArray({component}.emits)) {{\n  {component}.emits.push({});\n}} else {{\n",
        names.join(", ")
    ));
    for event in &names {
        out.push_str(&format!("  {component}.emits[{event}] = null;\n"));
    }
    out.push_str("}\n");
}

fn render_prop(out: &mut String, component: &str, prop: &PropertyMeta, options: &AutoPropsOptions) {
    if options.include_js_doc == JsDocMode::AsComment && !prop.doc.is_empty() {
        out.push_str("/**\n");
        for line in &prop.doc {
            out.push_str(&format!(" * {}\n", line.replace("*/", "*\\/")));
        }
        out.push_str(" */\n");
    }

    let mut ty = runtime_type(prop.ty.as_ref());
    if let Some(annotation) = prop.ty.as_ref().and_then(|ty| ty.annotation.as_deref()) {
        ty.push_str(&format!(
            " as import({}).PropType<{annotation}>",
            js_string(&options.framework_module)
        ));
    }

    out.push_str(&format!(
        "Object.defineProperty({component}.props, {}, {{\n",
        js_string(&prop.name)
    ));
    out.push_str("  configurable: true,\n  enumerable: true,\n  writable: true,\n  value: {\n");
    out.push_str(&format!("    type: {ty},\n"));
    out.push_str(&format!("    required: {},\n", prop.required));
    if let Some(default) = &prop.default {
        out.push_str(&format!("    default: {default},\n"));
    }
    if options.include_js_doc == JsDocMode::AsMetadata && !prop.doc.is_empty() {
        let doc = prop.doc.iter().map(|line| js_string(line)).collect::<Vec<_>>();
        out.push_str(&format!("    doc: [{}],\n", doc.join(", ")));
    }
    out.push_str("  },\n});\n");
}

/// The runtime `type` value: one constructor, a list of them, or `null`.
fn runtime_type(ty: Option<&ResolvedType>) -> String {
    let Some(ty) = ty else {
        return "null".to_string();
    };

    let mut constructors: Vec<&str> = Vec::new();
    for tag in &ty.tags {
        let constructor: &str = match tag {
            TypeTag::String => "String",
            TypeTag::Number => "Number",
            TypeTag::Boolean => "Boolean",
            TypeTag::Object => "Object",
            TypeTag::Function => "Function",
            TypeTag::Array(_) => "Array",
            TypeTag::Literal(literal) => match literal.kind {
                LiteralKind::Str => "String",
                LiteralKind::Num => "Number",
                LiteralKind::Bool => "Boolean",
            },
            TypeTag::Undefined => continue,
            TypeTag::Opaque(opaque) if opaque.constructor => &opaque.name,
            TypeTag::Any | TypeTag::Opaque(_) => return "null".to_string(),
        };
        if !constructors.contains(&constructor) {
            constructors.push(constructor);
        }
    }

    match constructors.as_slice() {
        [] => "null".to_string(),
        [single] => single.to_string(),
        many => format!("[{}]", many.join(", ")),
    }
}

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}
