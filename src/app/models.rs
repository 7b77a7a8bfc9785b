use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use crate::app::scanner::ScanOptions;

/// Represents the final configuration after merging defaults, presets and CLI args.
#[derive(Debug)]
pub struct RuntimeConfig {
    pub root: PathBuf,
    pub output: PathBuf,
    pub to_stdout: bool,
    pub scan: ScanOptions,
    pub filter: FilterConfig,
}

/// Which names and paths a run may see, and which files contribute content.
///
/// Built once per run and handed out by reference; nothing mutates it after
/// construction.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FilterConfig {
    pub(crate) excluded_dirs: BTreeSet<String>,
    pub(crate) excluded_files: BTreeSet<String>,
    pub(crate) extensions: Vec<String>,
}

impl FilterConfig {
    /// File identifiers are stored in canonical form, so `./src/a.py`,
    /// `src\a.py` and `src/a.py` all name the same file.
    pub fn new<D, F, E>(excluded_dirs: D, excluded_files: F, extensions: E) -> Self
    where
        D: IntoIterator<Item = String>,
        F: IntoIterator<Item = String>,
        E: IntoIterator<Item = String>,
    {
        let mut seen = BTreeSet::new();
        let extensions = extensions
            .into_iter()
            .filter(|ext| !ext.is_empty() && seen.insert(ext.clone()))
            .collect();

        Self {
            excluded_dirs: excluded_dirs.into_iter().collect(),
            excluded_files: excluded_files
                .into_iter()
                .map(|id| canonical_identifier(&id))
                .collect(),
            extensions,
        }
    }

    pub fn excluded_dirs(&self) -> impl Iterator<Item = &str> {
        self.excluded_dirs.iter().map(String::as_str)
    }

    pub fn excluded_files(&self) -> impl Iterator<Item = &str> {
        self.excluded_files.iter().map(String::as_str)
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

fn canonical_identifier(id: &str) -> String {
    let slashed = id.replace('\\', "/");
    let mut trimmed = slashed.as_str();
    while let Some(rest) = trimmed.strip_prefix("./") {
        trimmed = rest;
    }
    trimmed.to_string()
}

/// A single path discovered below the walk root.
#[derive(Debug)]
pub struct FileSystemEntry {
    pub path: PathBuf,
    pub relative_path: String,
    pub name: String,
    pub depth: usize,
    pub is_dir: bool,
}

/// Connector glyph placed in front of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    Mid,
    Last,
}

impl Connector {
    pub fn glyph(self) -> &'static str {
        match self {
            Connector::Mid => "├── ",
            Connector::Last => "└── ",
        }
    }

    /// Prefix segment children inherit from an entry using this connector.
    pub fn continuation(self) -> &'static str {
        match self {
            Connector::Mid => "│   ",
            Connector::Last => "    ",
        }
    }
}

/// One rendered line of the project structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    pub prefix: String,
    pub connector: Connector,
    pub name: String,
}

impl fmt::Display for TreeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.prefix, self.connector.glyph(), self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBody {
    Text(String),
    /// The file could not be read; holds the failure reason.
    Error(String),
}

/// One included file as it appears in the code section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    pub path: String,
    pub body: ContentBody,
}

impl ContentBlock {
    pub fn is_error(&self) -> bool {
        matches!(self.body, ContentBody::Error(_))
    }
}
