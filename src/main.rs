//! marketflow CLI entry point.

use anyhow::Context;
use clap::Parser;

use marketflow::cli::{self, Cli, CommandContext};
use marketflow::infrastructure::config::ConfigLoader;
use marketflow::infrastructure::logging::LoggerImpl;

fn run(args: Cli) -> anyhow::Result<()> {
    let config = match args.config {
        Some(ref path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    let _logger = LoggerImpl::init(&config.logging).context("Failed to initialize logging")?;

    let ctx = CommandContext {
        json: args.json,
        config,
    };
    cli::execute(args.command, &ctx)
}

fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = run(cli) {
        cli::handle_error(err, json);
    }
}
