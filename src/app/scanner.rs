use crate::app::error::{FlattenError, Result};
use crate::app::filter::{normalize_path, PathFilter};
use crate::app::models::{FileSystemEntry, FilterConfig};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Walk switches that do not change what counts as excluded.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScanOptions {
    pub respect_gitignore: bool,
    /// Yield excluded directories themselves (never their contents).
    pub show_excluded_dirs: bool,
}

enum Visibility {
    Visible,
    Pruned,
    Hidden,
}

/// Sorted pre-order walk below a root, shared by the tree and content passes.
pub struct Scanner<'a> {
    root: PathBuf,
    filter: PathFilter<'a>,
    gitignore: Option<Gitignore>,
    show_excluded_dirs: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(root: &Path, config: &'a FilterConfig, options: ScanOptions) -> Result<Self> {
        let gitignore = if options.respect_gitignore {
            load_gitignore(root)?
        } else {
            None
        };

        Ok(Self {
            root: root.to_path_buf(),
            filter: PathFilter::new(config),
            gitignore,
            show_excluded_dirs: options.show_excluded_dirs,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn filter(&self) -> PathFilter<'a> {
        self.filter
    }

    /// Lazily yields every visible entry, siblings ordered by name.
    ///
    /// The walker is told to skip an excluded directory as soon as it is
    /// reached, so nothing beneath it is ever yielded or recursed into.
    pub fn entries(&self) -> Entries<'_, 'a> {
        Entries {
            scanner: self,
            walker: WalkDir::new(&self.root)
                .min_depth(1)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter(),
        }
    }

    fn visibility(&self, entry: &DirEntry) -> Visibility {
        let name = entry.file_name().to_string_lossy();
        let relative = self.relative(entry.path());
        let is_dir = entry.file_type().is_dir();

        if is_dir && self.filter.is_directory_excluded(&name) {
            log::trace!("Pruning excluded directory: {}", relative);
            return Visibility::Pruned;
        }
        if !is_dir && self.filter.is_file_excluded(&relative, &name) {
            log::trace!("Skipping excluded file: {}", relative);
            return Visibility::Hidden;
        }
        if let Some(gitignore) = &self.gitignore {
            if gitignore.matched(Path::new(&relative), is_dir).is_ignore() {
                log::trace!("Skipping gitignored path: {}", relative);
                return Visibility::Hidden;
            }
        }
        Visibility::Visible
    }

    fn to_entry(&self, entry: &DirEntry) -> FileSystemEntry {
        FileSystemEntry {
            path: entry.path().to_path_buf(),
            relative_path: self.relative(entry.path()),
            name: entry.file_name().to_string_lossy().into_owned(),
            depth: entry.depth(),
            is_dir: entry.file_type().is_dir(),
        }
    }

    fn relative(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        normalize_path(relative)
    }
}

pub struct Entries<'s, 'a> {
    scanner: &'s Scanner<'a>,
    walker: walkdir::IntoIter,
}

impl Iterator for Entries<'_, '_> {
    type Item = Result<FileSystemEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(source) => {
                    return Some(Err(FlattenError::Listing {
                        root: self.scanner.root.clone(),
                        source,
                    }))
                }
            };

            match self.scanner.visibility(&entry) {
                Visibility::Visible => return Some(Ok(self.scanner.to_entry(&entry))),
                Visibility::Pruned => {
                    self.walker.skip_current_dir();
                    if self.scanner.show_excluded_dirs {
                        return Some(Ok(self.scanner.to_entry(&entry)));
                    }
                }
                Visibility::Hidden => {
                    if entry.file_type().is_dir() {
                        self.walker.skip_current_dir();
                    }
                }
            }
        }
    }
}

fn load_gitignore(root: &Path) -> Result<Option<Gitignore>> {
    let path = root.join(".gitignore");
    if !path.is_file() {
        log::debug!("No .gitignore found at {}", path.display());
        return Ok(None);
    }

    let mut builder = GitignoreBuilder::new(root);
    if let Some(source) = builder.add(&path) {
        return Err(FlattenError::Gitignore { path, source });
    }
    let gitignore = builder
        .build()
        .map_err(|source| FlattenError::Gitignore { path, source })?;
    log::debug!("Loaded {} .gitignore rules", gitignore.num_ignores());
    Ok(Some(gitignore))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn config() -> FilterConfig {
        FilterConfig::new(
            vec!["node_modules".to_string()],
            vec!["b.lock".to_string()],
            vec![".py".to_string()],
        )
    }

    #[test]
    fn entries_are_sorted_pre_order_and_pruned() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/pkg")).unwrap();
        fs::create_dir_all(root.join("node_modules/dep")).unwrap();
        fs::write(root.join("node_modules/dep/c.py"), "").unwrap();
        fs::write(root.join("src/pkg/z.py"), "").unwrap();
        fs::write(root.join("src/a.py"), "").unwrap();
        fs::write(root.join("b.lock"), "").unwrap();
        fs::write(root.join("README.md"), "").unwrap();

        let config = config();
        let scanner = Scanner::new(root, &config, ScanOptions::default()).unwrap();
        let seen: Vec<(String, usize, bool)> = scanner
            .entries()
            .map(|e| e.unwrap())
            .map(|e| (e.relative_path, e.depth, e.is_dir))
            .collect();

        assert_eq!(
            seen,
            vec![
                ("README.md".to_string(), 1, false),
                ("src".to_string(), 1, true),
                ("src/a.py".to_string(), 2, false),
                ("src/pkg".to_string(), 2, true),
                ("src/pkg/z.py".to_string(), 3, false),
            ]
        );
    }

    #[test]
    fn gitignore_is_honored_only_when_requested() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join(".gitignore"), "build/\n*.log\n").unwrap();
        fs::create_dir(root.join("build")).unwrap();
        fs::write(root.join("build/out.py"), "").unwrap();
        fs::write(root.join("debug.log"), "").unwrap();
        fs::write(root.join("main.py"), "").unwrap();

        let config = FilterConfig::default();

        let plain = Scanner::new(root, &config, ScanOptions::default()).unwrap();
        let all: Vec<String> = plain.entries().map(|e| e.unwrap().relative_path).collect();
        assert!(all.contains(&"build/out.py".to_string()));
        assert!(all.contains(&"debug.log".to_string()));

        let options = ScanOptions {
            respect_gitignore: true,
            ..Default::default()
        };
        let ignoring = Scanner::new(root, &config, options).unwrap();
        let visible: Vec<String> = ignoring
            .entries()
            .map(|e| e.unwrap().relative_path)
            .collect();
        assert_eq!(visible, vec![".gitignore".to_string(), "main.py".to_string()]);
    }

    #[test]
    fn excluded_directory_can_be_shown_without_its_contents() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("node_modules/dep")).unwrap();
        fs::write(root.join("node_modules/dep/c.py"), "").unwrap();
        fs::write(root.join("a.py"), "").unwrap();

        let config = config();
        let options = ScanOptions {
            show_excluded_dirs: true,
            ..Default::default()
        };
        let scanner = Scanner::new(root, &config, options).unwrap();
        let seen: Vec<String> = scanner.entries().map(|e| e.unwrap().relative_path).collect();
        assert_eq!(seen, vec!["a.py".to_string(), "node_modules".to_string()]);
    }

    #[test]
    fn missing_root_is_a_listing_error() {
        let dir = tempdir().unwrap();
        let config = FilterConfig::default();
        let scanner =
            Scanner::new(&dir.path().join("absent"), &config, ScanOptions::default()).unwrap();
        let first = scanner.entries().next();
        assert!(matches!(first, Some(Err(FlattenError::Listing { .. }))));
    }
}
