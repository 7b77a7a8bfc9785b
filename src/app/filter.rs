use crate::app::models::FilterConfig;
use std::path::Path;

/// Pure decisions over names and paths; no filesystem access.
#[derive(Debug, Clone, Copy)]
pub struct PathFilter<'a> {
    config: &'a FilterConfig,
}

impl<'a> PathFilter<'a> {
    pub fn new(config: &'a FilterConfig) -> Self {
        Self { config }
    }

    /// Matches on the bare directory name, so an excluded name is excluded at any depth.
    pub fn is_directory_excluded(&self, name: &str) -> bool {
        self.config.excluded_dirs.contains(name)
    }

    /// True if either the bare name or the canonical relative path is listed.
    pub fn is_file_excluded(&self, relative_path: &str, name: &str) -> bool {
        if self.config.excluded_files.contains(name) {
            return true;
        }
        let canonical = relative_path.replace('\\', "/");
        let canonical = canonical.strip_prefix("./").unwrap_or(&canonical);
        self.config.excluded_files.contains(canonical)
    }

    pub fn is_included_extension(&self, name: &str) -> bool {
        self.config
            .extensions
            .iter()
            .any(|ext| name.ends_with(ext.as_str()))
    }
}

/// Forward-slash rendering of a root-relative path, independent of the host separator.
pub fn normalize_path(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
