use clap::Parser;

mod cli;
mod commands;
mod config;
mod output;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let config = config::AmendConfig::resolve(cli.config.as_deref())?;
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        config.level()?
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    commands::run_command(cli, config)
}
