//! Configuration loading.

use crate::cli::Args;
use auto_props::{AutoPropsOptions, JsDocMode};
use camino::Utf8Path;
use std::fs;
use thiserror::Error;

/// Config file looked up in the workspace root.
pub const CONFIG_FILE: &str = "auto-props.config.json";

/// A config file that was explicitly requested could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads engine options for a run.
///
/// An explicit `--config` path must exist and parse. The implicit workspace
/// config is optional; when it is broken a warning is printed and defaults
/// are used. Command line flags are applied on top.
pub fn load(workspace: &Utf8Path, args: &Args) -> Result<AutoPropsOptions, ConfigError> {
    let mut options = match &args.config {
        Some(path) => {
            let path = if path.is_absolute() {
                path.clone()
            } else {
                workspace.join(path)
            };
            read_options(&path)?
        }
        None => {
            let path = workspace.join(CONFIG_FILE);
            if path.exists() {
                match read_options(&path) {
                    Ok(options) => options,
                    Err(e) => {
                        eprintln!("Warning: {}", e);
                        AutoPropsOptions::default()
                    }
                }
            } else {
                AutoPropsOptions::default()
            }
        }
    };

    apply_args(&mut options, args);
    Ok(options)
}

fn read_options(path: &Utf8Path) -> Result<AutoPropsOptions, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })
}

fn apply_args(options: &mut AutoPropsOptions, args: &Args) {
    if args.hide_warnings {
        options.hide_warnings = true;
    }
    if let Some(jsdoc) = args.jsdoc {
        options.include_js_doc = JsDocMode::from(jsdoc);
    }
}
