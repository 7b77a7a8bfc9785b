mod app;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = app::cli::Cli::parse();
    app::setup_logging(args.quiet, args.verbose);
    app::run(args)
}
