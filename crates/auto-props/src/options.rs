//! Engine options.

use serde::{Deserialize, Deserializer, Serialize};

/// How documentation comments are carried into the generated patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum JsDocMode {
    /// Documentation is dropped.
    #[default]
    #[serde(rename = "false")]
    Omit,
    /// Emitted as a `/** ... */` block before each property.
    #[serde(rename = "as-comment")]
    AsComment,
    /// Emitted as a `doc` array on each property record.
    #[serde(rename = "as-meta-data")]
    AsMetadata,
}

impl JsDocMode {
    /// Parses the string form used in config files and on the command line.
    pub fn from_str_opt(value: &str) -> Option<Self> {
        match value {
            "false" | "none" | "omit" => Some(JsDocMode::Omit),
            "as-comment" => Some(JsDocMode::AsComment),
            "as-meta-data" | "as-metadata" => Some(JsDocMode::AsMetadata),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for JsDocMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Mode(String),
        }

        match Raw::deserialize(deserializer)? {
            // `true` has no defined layout; treat it like the inline form
            Raw::Flag(true) => Ok(JsDocMode::AsComment),
            Raw::Flag(false) => Ok(JsDocMode::Omit),
            Raw::Mode(mode) => JsDocMode::from_str_opt(&mode).ok_or_else(|| {
                serde::de::Error::custom(format!(
                    "invalid includeJsDoc value `{mode}`, expected false, \"as-comment\" or \"as-meta-data\""
                ))
            }),
        }
    }
}

/// Options consumed by the props engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoPropsOptions {
    /// Suppress warning diagnostics.
    pub hide_warnings: bool,
    /// Where documentation comments go.
    #[serde(rename = "includeJsDoc", alias = "includeJSDoc")]
    pub include_js_doc: JsDocMode,
    /// Callee names recognized as the component factory.
    pub factory_names: Vec<String>,
    /// Type names recognized as the functional component annotation.
    pub functional_type_names: Vec<String>,
    /// Module the `PropType` helper is imported from in the patch.
    pub framework_module: String,
}

impl Default for AutoPropsOptions {
    fn default() -> Self {
        Self {
            hide_warnings: false,
            include_js_doc: JsDocMode::Omit,
            factory_names: vec!["defineComponent".to_string()],
            functional_type_names: vec!["FunctionalComponent".to_string()],
            framework_module: "vue".to_string(),
        }
    }
}

impl AutoPropsOptions {
    pub(crate) fn is_factory(&self, name: &str) -> bool {
        self.factory_names.iter().any(|factory| factory == name)
    }

    pub(crate) fn is_functional_type(&self, name: &str) -> bool {
        self.functional_type_names.iter().any(|ty| ty == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_object_uses_defaults() {
        let options: AutoPropsOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, AutoPropsOptions::default());
    }

    #[test]
    fn test_camel_case_fields() {
        let options: AutoPropsOptions = serde_json::from_str(
            r#"{
                "hideWarnings": true,
                "includeJsDoc": "as-meta-data",
                "factoryNames": ["defineComponent", "defineWidget"],
                "frameworkModule": "@vue/runtime-core"
            }"#,
        )
        .unwrap();
        assert!(options.hide_warnings);
        assert_eq!(options.include_js_doc, JsDocMode::AsMetadata);
        assert!(options.is_factory("defineWidget"));
        assert!(options.is_functional_type("FunctionalComponent"));
        assert_eq!(options.framework_module, "@vue/runtime-core");
    }

    #[test]
    fn test_include_js_doc_accepts_false_and_legacy_key() {
        let options: AutoPropsOptions =
            serde_json::from_str(r#"{ "includeJsDoc": false }"#).unwrap();
        assert_eq!(options.include_js_doc, JsDocMode::Omit);

        let options: AutoPropsOptions =
            serde_json::from_str(r#"{ "includeJSDoc": "as-comment" }"#).unwrap();
        assert_eq!(options.include_js_doc, JsDocMode::AsComment);
    }

    #[test]
    fn test_include_js_doc_rejects_unknown_mode() {
        let err = serde_json::from_str::<AutoPropsOptions>(r#"{ "includeJsDoc": "inline" }"#)
            .unwrap_err();
        assert!(err.to_string().contains("invalid includeJsDoc value `inline`"));
    }
}
