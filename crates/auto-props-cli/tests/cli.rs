//! End-to-end tests for the `vue-auto-props` binary.

use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const PROPS: &str = r#"export interface CardProps {
  /** Heading shown at the top. */
  title: string
  size?: 'small' | 'large'
}
"#;

const CARD: &str = r#"import { defineComponent } from 'vue'
import type { CardProps } from './props'

export const Card = defineComponent<CardProps>({
  setup() {
    return () => null
  },
})
"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/props.ts", PROPS);
    write(dir.path(), "src/Card.ts", CARD);
    dir
}

fn run(workspace: &Path, extra_args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vue-auto-props"))
        .arg("--workspace")
        .arg(workspace)
        .args(extra_args)
        .output()
        .expect("failed to execute vue-auto-props")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_emit_prints_patched_module() {
    let dir = fixture();
    let output = run(dir.path(), &["--emit"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = stdout(&output);
    assert!(stdout.contains("=== src/Card.ts ==="));
    assert!(stdout.contains("Object.defineProperty(Card.props, \"title\""));
    assert!(stdout.contains("as import(\"vue\").PropType<'small' | 'large'>"));
    assert!(stdout.contains("patched 1 component in 2 files"));
}

#[test]
fn test_out_dir_mirrors_workspace() {
    let dir = fixture();
    let output = run(dir.path(), &["--out-dir", "generated", "--jsdoc", "as-comment"]);
    assert_eq!(output.status.code(), Some(0));

    let card = fs::read_to_string(dir.path().join("generated/src/Card.ts")).unwrap();
    assert!(card.starts_with(CARD));
    assert!(card.contains("/**\n * Heading shown at the top.\n */\n"));

    // Modules without components are copied unchanged.
    let props = fs::read_to_string(dir.path().join("generated/src/props.ts")).unwrap();
    assert_eq!(props, PROPS);
}

#[test]
fn test_warnings_reported_as_json() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "src/Broken.ts",
        "export const Broken = defineComponent<MissingProps>({})\n",
    );

    let output = run(dir.path(), &["--output", "json"]);
    assert_eq!(output.status.code(), Some(0));

    let diagnostics: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let diagnostics = diagnostics.as_array().unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0]["type"], "Warning");
    assert_eq!(diagnostics[0]["code"], "unresolved-symbol");
    assert_eq!(diagnostics[0]["filename"], "src/Broken.ts");
    assert_eq!(diagnostics[0]["start"]["line"], 1);

    let output = run(dir.path(), &["--output", "json", "--fail-on-warnings"]);
    assert_eq!(output.status.code(), Some(1));

    let output = run(dir.path(), &["--output", "json", "--hide-warnings", "--fail-on-warnings"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output).trim(), "[]");
}

#[test]
fn test_parse_error_fails_run() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/Bad.ts", "export const = 1\n");

    let output = run(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(1));

    let stdout = stdout(&output);
    assert!(stdout.contains("src/Bad.ts:1:"));
    assert!(stdout.contains("(parse-error)"));
    assert!(stdout.contains("found 1 error and 0 warnings"));
}

#[test]
fn test_config_file_is_applied() {
    let dir = fixture();
    write(
        dir.path(),
        "auto-props.config.json",
        r#"{ "includeJsDoc": "as-meta-data" }"#,
    );

    // Positional paths resolve against the process working directory.
    let output = Command::new(env!("CARGO_BIN_EXE_vue-auto-props"))
        .current_dir(dir.path())
        .args(["--emit", "src/Card.ts"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let stdout = stdout(&output);
    assert!(stdout.contains("doc: [\"Heading shown at the top.\"]"));
    assert!(stdout.contains("patched 1 component in 1 file"));
}

#[test]
fn test_invalid_ignore_glob() {
    let dir = fixture();
    let output = run(dir.path(), &["--ignore", "src/["]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid glob pattern"));
}
