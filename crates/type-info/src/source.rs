//! Module source providers and import specifier resolution.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use std::fs;

/// Supplies module sources to a [`crate::Program`].
pub trait SourceProvider {
    /// Reads the source text at `path`.
    fn read(&self, path: &Utf8Path) -> Option<String>;

    /// Returns whether a module exists at `path`.
    fn exists(&self, path: &Utf8Path) -> bool;
}

/// Reads modules from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSources;

impl SourceProvider for FsSources {
    fn read(&self, path: &Utf8Path) -> Option<String> {
        fs::read_to_string(path).ok()
    }

    fn exists(&self, path: &Utf8Path) -> bool {
        path.is_file()
    }
}

/// In-memory module sources keyed by virtual path.
#[derive(Debug, Clone, Default)]
pub struct MemorySources {
    files: IndexMap<Utf8PathBuf, String>,
}

impl MemorySources {
    /// Creates an empty set of sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module and returns `self` for chaining.
    pub fn with_file(mut self, path: impl Into<Utf8PathBuf>, source: impl Into<String>) -> Self {
        self.insert(path, source);
        self
    }

    /// Adds or replaces a module.
    pub fn insert(&mut self, path: impl Into<Utf8PathBuf>, source: impl Into<String>) {
        self.files.insert(normalize(&path.into()), source.into());
    }
}

impl SourceProvider for MemorySources {
    fn read(&self, path: &Utf8Path) -> Option<String> {
        self.files.get(&normalize(path)).cloned()
    }

    fn exists(&self, path: &Utf8Path) -> bool {
        self.files.contains_key(&normalize(path))
    }
}

/// Resolves an import specifier written in `importer` to a module path.
///
/// Only relative (`./`, `../`) and absolute specifiers are resolved; bare
/// package specifiers such as `vue` are external and yield `None`.
pub(crate) fn resolve_specifier(
    importer: &Utf8Path,
    specifier: &str,
    sources: &dyn SourceProvider,
) -> Option<Utf8PathBuf> {
    let is_local = specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier.starts_with('/')
        || specifier == "."
        || specifier == "..";
    if !is_local {
        return None;
    }

    let base = if specifier.starts_with('/') {
        Utf8PathBuf::from(specifier)
    } else {
        importer
            .parent()
            .unwrap_or_else(|| Utf8Path::new(""))
            .join(specifier)
    };
    let base = normalize(&base);

    candidates(&base)
        .into_iter()
        .find(|candidate| sources.exists(candidate))
}

fn candidates(base: &Utf8Path) -> Vec<Utf8PathBuf> {
    let raw = base.as_str();
    let mut out = Vec::new();

    if [".ts", ".tsx", ".mts", ".cts"]
        .iter()
        .any(|ext| raw.ends_with(ext))
    {
        out.push(base.to_path_buf());
    }
    // ESM-style `./props.js` pointing at `props.ts`
    if let Some(stem) = raw.strip_suffix(".js") {
        out.push(Utf8PathBuf::from(format!("{stem}.ts")));
        out.push(Utf8PathBuf::from(format!("{stem}.tsx")));
    }
    for ext in [".ts", ".tsx", ".d.ts"] {
        out.push(Utf8PathBuf::from(format!("{raw}{ext}")));
    }
    for index in ["index.ts", "index.tsx", "index.d.ts"] {
        out.push(base.join(index));
    }

    out
}

/// Lexically normalizes `.` and `..` components.
pub(crate) fn normalize(path: &Utf8Path) -> Utf8PathBuf {
    let mut out = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_str()),
        }
    }
    out
}
