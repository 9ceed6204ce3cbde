use clap::Parser;

mod cli;
mod commands;
mod domain;
mod gitlab;
mod services;

use cli::Cli;
use gitlab::HttpGitlab;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.validate()?;
    let api = HttpGitlab::new(&config)?;
    commands::handle_key_command(&cli, &config, &api)
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
