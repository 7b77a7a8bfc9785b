use crate::app::cli::Cli;
use crate::app::filter::normalize_path;
use crate::app::models::{FilterConfig, RuntimeConfig};
use crate::app::scanner::ScanOptions;
use anyhow::{bail, Context, Result};
use pathdiff::diff_paths;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_OUTPUT: &str = "project_code_deploy.txt";

const DEFAULT_EXTENSIONS: &[&str] = &[".py", ".js", ".ts", ".tsx", ".html", ".css", ".json"];
const DEFAULT_EXCLUDE_DIRS: &[&str] = &["node_modules", "__pycache__", ".git"];
const DEFAULT_EXCLUDE_FILES: &[&str] = &[
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "poetry.lock",
    "Pipfile.lock",
];

#[derive(Deserialize, Debug)]
struct PresetsFile {
    #[serde(flatten)]
    presets: HashMap<String, PresetConfig>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct PresetConfig {
    extensions: Option<Vec<String>>,
    exclude_dirs: Option<Vec<String>>,
    exclude_files: Option<Vec<String>>,
    output: Option<PathBuf>,
    gitignore: Option<bool>,
}

fn default_presets_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home
        .join(".config")
        .join("code_flatten")
        .join("presets.toml"))
}

pub fn load_presets_file(path: Option<&Path>) -> Result<HashMap<String, PresetConfig>> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => default_presets_path()?,
    };

    if !config_path.exists() {
        log::debug!("No presets file at {}", config_path.display());
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(&config_path)
        .context(format!("Failed to read presets at {:?}", config_path))?;

    let parsed: PresetsFile = toml::from_str(&content)
        .context(format!("Failed to parse presets at {:?}", config_path))?;

    Ok(parsed.presets)
}

fn defaults(enabled: bool, values: &[&str]) -> Option<Vec<String>> {
    enabled.then(|| values.iter().map(|s| s.to_string()).collect())
}

/// Concatenates the layers in order, dropping repeats but keeping first positions.
fn merge_vecs(layers: [Option<Vec<String>>; 3]) -> Vec<String> {
    let mut combined: Vec<String> = layers.into_iter().flatten().flatten().collect();
    let mut seen = std::collections::HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    combined
}

/// Root-relative form of `output` when it lands inside `root`.
fn output_inside_root(root: &Path, output: &Path, cwd: &Path) -> Option<String> {
    let relative = diff_paths(cwd.join(output), cwd.join(root))?;
    let escapes = relative
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
    if escapes || relative.as_os_str().is_empty() {
        return None;
    }
    Some(normalize_path(&relative))
}

pub fn resolve_config(
    cli: Cli,
    presets: &HashMap<String, PresetConfig>,
    project_name: Option<&str>,
    cwd: &Path,
) -> Result<RuntimeConfig> {
    // CLI flag > Auto-detect > None
    let preset = match cli.preset.as_deref() {
        Some(name) => match presets.get(name) {
            Some(p) => {
                log::info!("Using preset '{}'", name);
                p.clone()
            }
            None => bail!("Preset '{}' not found", name),
        },
        None => project_name
            .and_then(|name| {
                let found = presets.get(name).cloned();
                if found.is_some() {
                    log::info!("Using preset '{}' matched by project name", name);
                }
                found
            })
            .unwrap_or_default(),
    };

    let use_defaults = !cli.no_defaults;
    let output = cli
        .output
        .or(preset.output)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let mut exclude_files = merge_vecs([
        defaults(use_defaults, DEFAULT_EXCLUDE_FILES),
        preset.exclude_files,
        cli.exclude_files,
    ]);
    if !cli.stdout {
        if let Some(own) = output_inside_root(&cli.root, &output, cwd) {
            log::debug!("Excluding the output document itself: {}", own);
            exclude_files.push(own);
        }
    }

    let filter = FilterConfig::new(
        merge_vecs([
            defaults(use_defaults, DEFAULT_EXCLUDE_DIRS),
            preset.exclude_dirs,
            cli.exclude_dirs,
        ]),
        exclude_files,
        merge_vecs([
            defaults(use_defaults, DEFAULT_EXTENSIONS),
            preset.extensions,
            cli.extensions,
        ]),
    );

    Ok(RuntimeConfig {
        root: cli.root,
        output,
        to_stdout: cli.stdout,
        scan: ScanOptions {
            respect_gitignore: cli.gitignore || preset.gitignore.unwrap_or(false),
            show_excluded_dirs: cli.show_excluded_dirs,
        },
        filter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("code_flatten").chain(args.iter().copied()))
    }

    fn presets(toml_src: &str) -> HashMap<String, PresetConfig> {
        toml::from_str::<PresetsFile>(toml_src).unwrap().presets
    }

    #[test]
    fn defaults_apply_without_flags() {
        let config = resolve_config(cli(&[]), &HashMap::new(), None, Path::new("/work")).unwrap();
        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(config.filter.extensions().len(), DEFAULT_EXTENSIONS.len());
        assert!(config.filter.excluded_dirs().any(|d| d == "node_modules"));
        assert!(config.filter.excluded_files().any(|f| f == "yarn.lock"));
        assert!(config.filter.excluded_files().any(|f| f == DEFAULT_OUTPUT));
        assert!(!config.scan.respect_gitignore);
    }

    #[test]
    fn no_defaults_leaves_only_explicit_values() {
        let config = resolve_config(
            cli(&["--no-defaults", "--stdout", "--ext", ".rs", "--exclude-dir", "target"]),
            &HashMap::new(),
            None,
            Path::new("/work"),
        )
        .unwrap();
        assert_eq!(config.filter.extensions(), &[".rs".to_string()][..]);
        assert_eq!(config.filter.excluded_dirs().collect::<Vec<_>>(), vec!["target"]);
        assert_eq!(config.filter.excluded_files().count(), 0);
        assert!(config.to_stdout);
    }

    #[test]
    fn preset_is_auto_detected_and_merged_with_cli() {
        let presets = presets(
            r#"
            [shop]
            extensions = [".rs", ".py"]
            exclude_dirs = ["target"]
            output = "ctx/shop.txt"
            gitignore = true
            "#,
        );
        let config = resolve_config(
            cli(&["--ext", ".py", ".toml"]),
            &presets,
            Some("shop"),
            Path::new("/work"),
        )
        .unwrap();

        let exts = config.filter.extensions();
        let rs = exts.iter().position(|e| e == ".rs").unwrap();
        let toml = exts.iter().position(|e| e == ".toml").unwrap();
        assert!(rs < toml);
        assert_eq!(exts.iter().filter(|e| *e == ".py").count(), 1);
        assert!(config.filter.excluded_dirs().any(|d| d == "target"));
        assert!(config.filter.excluded_files().any(|f| f == "ctx/shop.txt"));
        assert_eq!(config.output, PathBuf::from("ctx/shop.txt"));
        assert!(config.scan.respect_gitignore);
    }

    #[test]
    fn cli_output_overrides_preset_output() {
        let presets = presets("[shop]\noutput = \"shop.txt\"\n");
        let config = resolve_config(
            cli(&["--preset", "shop", "-o", "mine.txt"]),
            &presets,
            None,
            Path::new("/work"),
        )
        .unwrap();
        assert_eq!(config.output, PathBuf::from("mine.txt"));
    }

    #[test]
    fn unknown_explicit_preset_is_an_error() {
        let result = resolve_config(
            cli(&["--preset", "missing"]),
            &HashMap::new(),
            None,
            Path::new("/work"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn output_outside_root_is_not_excluded() {
        let config = resolve_config(
            cli(&["--root", "repo", "-o", "../elsewhere/out.json"]),
            &HashMap::new(),
            None,
            Path::new("/work"),
        )
        .unwrap();
        assert!(!config.filter.excluded_files().any(|f| f.contains("out.json")));
    }

    #[test]
    fn output_inside_nested_root_is_made_root_relative() {
        assert_eq!(
            output_inside_root(Path::new("repo"), Path::new("repo/docs/out.txt"), Path::new("/work")),
            Some("docs/out.txt".to_string())
        );
        assert_eq!(
            output_inside_root(Path::new("."), Path::new("/tmp/out.txt"), Path::new("/work")),
            None
        );
    }

    #[test]
    fn presets_file_is_optional_but_must_parse() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("presets.toml");
        assert!(load_presets_file(Some(&missing)).unwrap().is_empty());

        fs::write(&missing, "[web]\nextensions = [\".ts\"]\n").unwrap();
        let loaded = load_presets_file(Some(&missing)).unwrap();
        assert_eq!(loaded["web"].extensions, Some(vec![".ts".to_string()]));

        fs::write(&missing, "[web\nbroken").unwrap();
        assert!(load_presets_file(Some(&missing)).is_err());
    }
}
