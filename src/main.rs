use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use zoomtally::cli::{
    handle_auth_command, handle_config_command, handle_report_command, Cli, CliCommand,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout carries the report
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        CliCommand::Version => {
            println!("zoomtally {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliCommand::Report(args) => handle_report_command(args).await,
        CliCommand::Auth(args) => handle_auth_command(args).await,
        CliCommand::Config(args) => handle_config_command(args),
    }
}
