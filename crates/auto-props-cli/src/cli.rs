//! CLI argument parsing.

use auto_props::JsDocMode;
use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};

/// Generates runtime props and emits declarations for typed Vue components.
#[derive(Debug, Parser)]
#[command(name = "vue-auto-props")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Files or directories to process (defaults to the workspace)
    pub paths: Vec<Utf8PathBuf>,

    /// Working directory for the run
    #[arg(long, default_value = ".")]
    pub workspace: Utf8PathBuf,

    /// Path to the config file (defaults to auto-props.config.json in the workspace)
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Suppress warning diagnostics
    #[arg(long = "hide-warnings")]
    pub hide_warnings: bool,

    /// How documentation comments are carried into the patch
    #[arg(long, value_enum)]
    pub jsdoc: Option<JsDocArg>,

    /// Print transformed modules to stdout
    #[arg(long)]
    pub emit: bool,

    /// Write transformed modules here, mirroring the workspace layout
    #[arg(long = "out-dir")]
    pub out_dir: Option<Utf8PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Glob patterns to ignore
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Exit with error on warnings
    #[arg(long = "fail-on-warnings")]
    pub fail_on_warnings: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output
    Json,
}

/// Command line spelling of [`JsDocMode`].
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum JsDocArg {
    /// Drop documentation
    False,
    /// Emit a comment block before each property
    AsComment,
    /// Emit a `doc` array on each property
    AsMetaData,
}

impl From<JsDocArg> for JsDocMode {
    fn from(arg: JsDocArg) -> Self {
        match arg {
            JsDocArg::False => JsDocMode::Omit,
            JsDocArg::AsComment => JsDocMode::AsComment,
            JsDocArg::AsMetaData => JsDocMode::AsMetadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["vue-auto-props"]);
        assert_eq!(args.workspace.as_str(), ".");
        assert!(args.paths.is_empty());
        assert_eq!(args.output, OutputFormat::Human);
        assert!(args.jsdoc.is_none());
        assert!(!args.emit);
        assert!(!args.hide_warnings);
    }

    #[test]
    fn test_positional_paths() {
        let args = Args::parse_from(["vue-auto-props", "src/a.ts", "src/components"]);
        assert_eq!(args.paths.len(), 2);
        assert_eq!(args.paths[1].as_str(), "src/components");
    }

    #[test]
    fn test_jsdoc_modes() {
        let args = Args::parse_from(["vue-auto-props", "--jsdoc", "as-meta-data"]);
        assert_eq!(args.jsdoc.map(JsDocMode::from), Some(JsDocMode::AsMetadata));

        let args = Args::parse_from(["vue-auto-props", "--jsdoc", "as-comment"]);
        assert_eq!(args.jsdoc.map(JsDocMode::from), Some(JsDocMode::AsComment));

        let args = Args::parse_from(["vue-auto-props", "--jsdoc", "false"]);
        assert_eq!(args.jsdoc.map(JsDocMode::from), Some(JsDocMode::Omit));

        assert!(Args::try_parse_from(["vue-auto-props", "--jsdoc", "inline"]).is_err());
    }

    #[test]
    fn test_output_and_ignore() {
        let args = Args::parse_from([
            "vue-auto-props",
            "--output",
            "json",
            "--ignore",
            "**/legacy/**",
            "--ignore",
            "**/*.spec.ts",
            "--out-dir",
            "generated",
        ]);
        assert_eq!(args.output, OutputFormat::Json);
        assert_eq!(args.ignore, vec!["**/legacy/**", "**/*.spec.ts"]);
        assert_eq!(args.out_dir.as_deref().map(|p| p.as_str()), Some("generated"));
    }
}
