//! Resolved component metadata.

use indexmap::IndexMap;
use serde::Serialize;

/// A runtime type classification for a declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeTag {
    String,
    Number,
    Boolean,
    Object,
    Function,
    Any,
    Undefined,
    /// An array whose elements carry the given tags.
    Array(Vec<TypeTag>),
    /// A literal type; documentation only, classified by its kind.
    Literal(LiteralTag),
    /// A named type no structural rule applies to.
    Opaque(OpaqueType),
}

/// The source form of a literal type such as `'compact'` or `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiteralTag {
    pub text: String,
    pub kind: LiteralKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LiteralKind {
    Str,
    Num,
    Bool,
}

/// A type known only by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpaqueType {
    pub name: String,
    /// Whether `name` is also a runtime value usable as a prop constructor.
    pub constructor: bool,
}

impl TypeTag {
    pub(crate) fn opaque(name: impl Into<String>, constructor: bool) -> Self {
        TypeTag::Opaque(OpaqueType {
            name: name.into(),
            constructor,
        })
    }

    /// Returns a TypeScript type expression describing this tag.
    pub fn type_text(&self) -> String {
        match self {
            TypeTag::String => "string".to_string(),
            TypeTag::Number => "number".to_string(),
            TypeTag::Boolean => "boolean".to_string(),
            TypeTag::Object => "object".to_string(),
            TypeTag::Function => "Function".to_string(),
            TypeTag::Any => "any".to_string(),
            TypeTag::Undefined => "undefined".to_string(),
            TypeTag::Array(inner) if inner.is_empty() => "unknown[]".to_string(),
            TypeTag::Array(inner) => format!("Array<{}>", union_text(inner)),
            TypeTag::Literal(literal) => literal.text.clone(),
            TypeTag::Opaque(opaque) if opaque.constructor => opaque.name.clone(),
            TypeTag::Opaque(_) => "unknown".to_string(),
        }
    }
}

/// Joins the type text of several tags into a union.
pub(crate) fn union_text(tags: &[TypeTag]) -> String {
    tags.iter()
        .map(TypeTag::type_text)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Pushes tags that are not already present, keeping first-seen order.
pub(crate) fn merge_tags(into: &mut Vec<TypeTag>, tags: impl IntoIterator<Item = TypeTag>) {
    for tag in tags {
        if !into.contains(&tag) {
            into.push(tag);
        }
    }
}

/// The resolution of one declared type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ResolvedType {
    /// Deduplicated runtime tags.
    pub tags: Vec<TypeTag>,
    /// The documentation-only generic parameter for `PropType<...>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

impl ResolvedType {
    pub(crate) fn from_tags(tags: impl IntoIterator<Item = TypeTag>) -> Self {
        let mut out = Vec::new();
        merge_tags(&mut out, tags);
        Self {
            tags: out,
            annotation: None,
        }
    }

    pub(crate) fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    /// Whether any tag equals `tag`.
    pub fn contains(&self, tag: &TypeTag) -> bool {
        self.tags.contains(tag)
    }
}

/// One declared property, event or slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyMeta {
    pub name: String,
    /// `None` when the member's type could not be resolved.
    #[serde(rename = "type")]
    pub ty: Option<ResolvedType>,
    pub required: bool,
    /// A default value expression, emitted verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    pub doc: Vec<String>,
}

impl PropertyMeta {
    pub(crate) fn new(name: impl Into<String>, ty: Option<ResolvedType>, required: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            required,
            default: None,
            doc: Vec::new(),
        }
    }
}

/// Everything resolved for one component.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ComponentMeta {
    pub props: Vec<PropertyMeta>,
    pub events: Vec<PropertyMeta>,
    pub slots: Vec<PropertyMeta>,
}

/// Components of one module keyed by binding name, in discovery order.
pub type ComponentMetaMap = IndexMap<String, ComponentMeta>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_tags_dedups_in_first_seen_order() {
        let resolved = ResolvedType::from_tags([
            TypeTag::Number,
            TypeTag::String,
            TypeTag::Number,
            TypeTag::Array(vec![TypeTag::String]),
            TypeTag::Array(vec![TypeTag::String]),
        ]);
        assert_eq!(
            resolved.tags,
            vec![
                TypeTag::Number,
                TypeTag::String,
                TypeTag::Array(vec![TypeTag::String])
            ]
        );
    }

    #[test]
    fn test_type_text() {
        let nested = TypeTag::Array(vec![TypeTag::Array(vec![TypeTag::String])]);
        assert_eq!(nested.type_text(), "Array<Array<string>>");
        assert_eq!(TypeTag::Array(Vec::new()).type_text(), "unknown[]");
        assert_eq!(TypeTag::opaque("Date", true).type_text(), "Date");
        assert_eq!(TypeTag::opaque("Component", false).type_text(), "unknown");
        assert_eq!(
            union_text(&[TypeTag::String, TypeTag::Undefined]),
            "string | undefined"
        );
    }
}
