use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Flatten a source tree into one document: a structure map followed by file contents"
)]
pub struct Cli {
    /// Directory to flatten
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Where to write the document [default: project_code_deploy.txt]
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Print the document to stdout instead of writing a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    /// Use a predefined set of options from presets.toml
    #[arg(long)]
    pub preset: Option<String>,

    /// Read presets from this file instead of ~/.config/code_flatten/presets.toml
    #[arg(long)]
    pub presets_file: Option<PathBuf>,

    /// File extensions whose contents are included (e.g. '.rs')
    #[arg(long = "ext", num_args = 1..)]
    pub extensions: Option<Vec<String>>,

    /// Directory names never descended into, at any depth
    #[arg(long = "exclude-dir", num_args = 1..)]
    pub exclude_dirs: Option<Vec<String>>,

    /// File names or root-relative paths to leave out
    #[arg(long = "exclude-file", num_args = 1..)]
    pub exclude_files: Option<Vec<String>>,

    /// Start from empty filter sets instead of the built-in defaults
    #[arg(long)]
    pub no_defaults: bool,

    /// Also skip paths matched by the root .gitignore
    #[arg(long)]
    pub gitignore: bool,

    /// List excluded directories in the structure (never their contents)
    #[arg(long)]
    pub show_excluded_dirs: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Silence all logging
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
