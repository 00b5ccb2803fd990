//! Main orchestration logic.

use crate::cli::{Args, OutputFormat};
use crate::config::{self, ConfigError};
use crate::output::{FormattedDiagnostic, Formatter, Report, RunSummary};
use auto_props::{transform_file, AutoPropsOptions, Severity};
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use rayon::prelude::*;
use std::fs;
use thiserror::Error;
use type_info::FsSources;
use walkdir::WalkDir;

/// Module extensions that are scanned.
const EXTENSIONS: [&str; 2] = [".ts", ".tsx"];

/// Orchestration errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid glob pattern.
    #[error("invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// The working directory is not valid UTF-8 or does not exist.
    #[error("invalid workspace: {0}")]
    InvalidWorkspace(String),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A transformed module could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

struct FileOutput {
    relative: Utf8PathBuf,
    text: Option<String>,
    json: Vec<FormattedDiagnostic>,
    code: Option<String>,
    components: usize,
    errors: usize,
    warnings: usize,
}

/// Transforms every matching module under the workspace.
pub fn run(args: Args) -> Result<RunSummary, CliError> {
    let cwd = std::env::current_dir()
        .map_err(|e| CliError::InvalidWorkspace(e.to_string()))
        .and_then(|p| {
            Utf8PathBuf::try_from(p).map_err(|e| CliError::InvalidWorkspace(e.to_string()))
        })?;
    let workspace = if args.workspace.is_relative() {
        cwd.join(&args.workspace)
    } else {
        args.workspace.clone()
    };
    if !workspace.is_dir() {
        return Err(CliError::InvalidWorkspace(workspace.to_string()));
    }

    let options = config::load(&workspace, &args)?;
    let ignore_set = build_ignore_set(&args.ignore)?;
    let out_dir = args.out_dir.as_ref().map(|dir| {
        if dir.is_relative() {
            workspace.join(dir)
        } else {
            dir.clone()
        }
    });

    let roots: Vec<Utf8PathBuf> = if args.paths.is_empty() {
        vec![workspace.clone()]
    } else {
        args.paths
            .iter()
            .map(|p| if p.is_relative() { cwd.join(p) } else { p.clone() })
            .collect()
    };
    let files = find_files(&roots, &workspace, &ignore_set, out_dir.as_deref());

    let outputs: Vec<FileOutput> = files
        .par_iter()
        .map(|file_path| process_file(file_path, &workspace, &options, &args))
        .collect();

    let mut summary = RunSummary {
        file_count: files.len(),
        fail_on_warnings: args.fail_on_warnings,
        ..Default::default()
    };
    let mut json_output = Vec::new();

    for output in outputs {
        summary.component_count += output.components;
        summary.error_count += output.errors;
        summary.warning_count += output.warnings;

        if let Some(code) = &output.code {
            if args.emit {
                println!("=== {} ===\n{}", output.relative, code);
            }
            if let Some(out_dir) = &out_dir {
                write_output(&out_dir.join(&output.relative), code)?;
            }
        }

        if let Some(text) = output.text {
            print!("{}", text);
        }
        json_output.extend(output.json);
    }

    match args.output {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json_output).unwrap_or_default()
            );
        }
        OutputFormat::Human => println!("{}", summary.format()),
    }

    Ok(summary)
}

fn build_ignore_set(patterns: &[String]) -> Result<GlobSet, CliError> {
    let mut ignore_builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| CliError::InvalidGlob(e.to_string()))?;
        ignore_builder.add(glob);
    }

    // Add default ignores
    for pattern in ["**/node_modules/**", "**/dist/**"] {
        if let Ok(glob) = Glob::new(pattern) {
            ignore_builder.add(glob);
        }
    }

    ignore_builder
        .build()
        .map_err(|e| CliError::InvalidGlob(e.to_string()))
}

/// Collects `.ts` and `.tsx` modules below `roots`, skipping declaration files.
fn find_files(
    roots: &[Utf8PathBuf],
    workspace: &Utf8Path,
    ignore_set: &GlobSet,
    out_dir: Option<&Utf8Path>,
) -> Vec<Utf8PathBuf> {
    let mut files: Vec<Utf8PathBuf> = roots
        .iter()
        .flat_map(|root| {
            WalkDir::new(root)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter_map(|e| Utf8PathBuf::try_from(e.into_path()).ok())
        })
        .filter(|p| {
            let file_name = p.file_name().unwrap_or("");
            EXTENSIONS.iter().any(|ext| file_name.ends_with(ext)) && !file_name.ends_with(".d.ts")
        })
        .filter(|p| out_dir.map_or(true, |dir| !p.starts_with(dir)))
        .filter(|p| {
            let relative = p.strip_prefix(workspace).unwrap_or(p);
            !ignore_set.is_match(relative.as_str())
        })
        .collect();
    files.sort();
    files.dedup();
    files
}

fn process_file(
    file_path: &Utf8Path,
    workspace: &Utf8Path,
    options: &AutoPropsOptions,
    args: &Args,
) -> FileOutput {
    let relative = relative_path(file_path, workspace);

    let (reports, code, components) = match transform_file(&FsSources, file_path, options) {
        Ok((program, output)) => {
            for error in program.dependency_errors() {
                eprintln!("Warning: {}", error);
            }
            let reports: Vec<Report> = output
                .diagnostics
                .iter()
                .map(|diag| Report::from_diagnostic(&program, diag))
                .collect();
            (reports, Some(output.code), output.components.len())
        }
        Err(error) => (vec![Report::from_program_error(&error)], None, 0),
    };

    let errors = reports
        .iter()
        .filter(|r| r.severity == Severity::Error)
        .count();
    let warnings = reports
        .iter()
        .filter(|r| r.severity == Severity::Warning)
        .count();

    let (text, json) = if reports.is_empty() {
        (None, Vec::new())
    } else {
        match args.output {
            OutputFormat::Human => (Some(Formatter::format_human(&reports, &relative)), Vec::new()),
            OutputFormat::Json => (None, Formatter::format_json_diagnostics(&reports, &relative)),
        }
    };

    FileOutput {
        relative,
        text,
        json,
        code,
        components,
        errors,
        warnings,
    }
}

/// Path of a module relative to the workspace, or its file name when it lies outside.
fn relative_path(file_path: &Utf8Path, workspace: &Utf8Path) -> Utf8PathBuf {
    match file_path.strip_prefix(workspace) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => Utf8PathBuf::from(file_path.file_name().unwrap_or(file_path.as_str())),
    }
}

fn write_output(path: &Utf8Path, code: &str) -> Result<(), CliError> {
    let write = || {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, code)
    };
    write().map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn workspace() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        (dir, path)
    }

    fn touch(root: &Utf8Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_find_files_filters_extensions_and_ignores() {
        let (_dir, root) = workspace();
        for file in [
            "src/Card.ts",
            "src/List.tsx",
            "src/types.d.ts",
            "src/styles.css",
            "src/legacy/Old.ts",
            "node_modules/vue/index.ts",
            "dist/Card.ts",
        ] {
            touch(&root, file);
        }

        let ignore_set = build_ignore_set(&["**/legacy/**".to_string()]).unwrap();
        let files = find_files(&[root.clone()], &root, &ignore_set, None);
        let relative: Vec<_> = files
            .iter()
            .map(|f| relative_path(f, &root).to_string())
            .collect();
        assert_eq!(relative, vec!["src/Card.ts", "src/List.tsx"]);
    }

    #[test]
    fn test_find_files_skips_out_dir() {
        let (_dir, root) = workspace();
        touch(&root, "src/Card.ts");
        touch(&root, "generated/src/Card.ts");

        let ignore_set = build_ignore_set(&[]).unwrap();
        let files = find_files(&[root.clone()], &root, &ignore_set, Some(&root.join("generated")));
        assert_eq!(files, vec![root.join("src/Card.ts")]);
    }

    #[test]
    fn test_invalid_glob() {
        let err = build_ignore_set(&["src/[".to_string()]).unwrap_err();
        assert!(matches!(err, CliError::InvalidGlob(_)));
    }

    #[test]
    fn test_relative_path_outside_workspace() {
        assert_eq!(
            relative_path(Utf8Path::new("/other/Card.ts"), Utf8Path::new("/project")),
            Utf8PathBuf::from("Card.ts")
        );
        assert_eq!(
            relative_path(Utf8Path::new("/project/src/Card.ts"), Utf8Path::new("/project")),
            Utf8PathBuf::from("src/Card.ts")
        );
    }
}
