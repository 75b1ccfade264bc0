//! `dotfyles` binary: parse arguments and dispatch to a command.
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use dotfyles::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    if matches!(args.command, cli::Command::Version) {
        commands::version::run();
        return Ok(());
    }

    let command = args.command.log_name();
    logging::init_subscriber(args.verbose, command);
    let log = Arc::new(logging::Logger::new(command));

    match args.command {
        cli::Command::Install(ref opts) => commands::install::run(&args.global, opts, &log),
        cli::Command::Gitignore => commands::gitignore::run(&args.global, &log),
        cli::Command::Link(ref opts) => commands::link::run(&args.global, opts, log.as_ref()),
        cli::Command::Version => Ok(()),
    }
}
