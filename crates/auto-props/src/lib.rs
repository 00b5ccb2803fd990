//! Runtime props and emits generation for typed Vue components.
//!
//! Vue components written with `defineComponent<Props>(...)`, typed setup
//! callbacks or `FunctionalComponent<Props>` annotations only describe their
//! props as TypeScript types. This crate finds those definitions in a module,
//! resolves the prop, event and slot types into the runtime type vocabulary
//! Vue understands, and renders a JavaScript patch that installs the
//! resulting `props` and `emits` declarations on each component.
//!
//! # Example
//!
//! ```
//! use auto_props::{transform_file, AutoPropsOptions};
//! use camino::Utf8Path;
//! use type_info::MemorySources;
//!
//! let sources = MemorySources::new().with_file(
//!     "/src/Card.ts",
//!     "export const Card = defineComponent<{ title: string, badge?: number }>({})",
//! );
//! let (_, output) =
//!     transform_file(&sources, Utf8Path::new("/src/Card.ts"), &AutoPropsOptions::default())
//!         .unwrap();
//!
//! let card = &output.components["Card"];
//! assert_eq!(card.props.len(), 2);
//! assert!(card.props[0].required);
//! assert!(!card.props[1].required);
//! ```

mod components;
mod diagnostic;
mod meta;
mod options;
mod properties;
mod render;
mod transform;
mod type_tag;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use meta::{
    ComponentMeta, ComponentMetaMap, LiteralKind, LiteralTag, OpaqueType, PropertyMeta,
    ResolvedType, TypeTag,
};
pub use options::{AutoPropsOptions, JsDocMode};
pub use render::{render_component, render_components};
pub use transform::{transform_file, transform_module, AutoPropsTransform, TransformOutput};
