// Declare modules
pub mod aggregator;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod formatter;
pub mod models;
pub mod scanner;
pub mod tree;

use anyhow::{Context, Result};
use std::env;
use std::io::Write;

use self::aggregator::ContentAggregator;
use self::cli::Cli;
use self::config::{load_presets_file, resolve_config};
use self::formatter::DocumentWriter;
use self::scanner::Scanner;
use self::tree::TreeRenderer;

pub fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
}

/// Initializes components and orchestrates data flow.
pub fn run(args: Cli) -> Result<()> {
    // 1. Identify invocation dir & project name
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let root_abs = current_dir.join(&args.root);
    // Simple heuristic: name of the root folder
    let project_name = root_abs
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()));

    // 2. Resolve Configuration
    let presets = load_presets_file(args.presets_file.as_deref())?;
    let config = resolve_config(args, &presets, project_name.as_deref(), &current_dir)?;
    log::debug!(
        "Filtering with extensions {:?}, excluded dirs {:?}, excluded files {:?}",
        config.filter.extensions(),
        config.filter.excluded_dirs().collect::<Vec<_>>(),
        config.filter.excluded_files().collect::<Vec<_>>()
    );

    if config.filter.extensions().is_empty() {
        log::warn!("No extensions configured; the code section will be empty.");
    }

    // 3. Structure, then contents, over the same filtered walk
    let scanner = Scanner::new(&config.root, &config.filter, config.scan)?;
    let tree = TreeRenderer::new(&scanner)
        .render()
        .context("Failed to render project structure")?;
    let blocks = ContentAggregator::new(&scanner)
        .collect()
        .context("Failed to collect file contents")?;

    let unreadable = blocks.iter().filter(|b| b.is_error()).count();
    if unreadable > 0 {
        log::warn!("{} file(s) could not be read; see inline errors", unreadable);
    }

    // 4. Emit
    if config.to_stdout {
        let document = DocumentWriter::render(&tree, &blocks);
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(document.as_bytes())
            .context("Failed to write document to stdout")?;
    } else {
        DocumentWriter::write(&config.output, &tree, &blocks)?;
        log::info!(
            "Flattened {} entries and {} files into {}",
            tree.len(),
            blocks.len(),
            config.output.display()
        );
    }

    Ok(())
}
