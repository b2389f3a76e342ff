use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ZoomConfig;
use crate::zoom::Credentials;

#[derive(Parser, Debug)]
#[command(name = "zoomtally")]
#[command(about = "Zoom meeting attendance and poll scores", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Build the attendance and poll score report for a finished meeting
    Report(ReportCliArgs),
    /// Check Zoom credentials
    Auth(AuthCliArgs),
    /// Inspect the configuration file
    Config(ConfigCliArgs),
    /// Print version information
    Version,
}

#[derive(ClapArgs, Debug)]
pub struct ReportCliArgs {
    /// Meeting ID (or UUID) of a meeting that has ended
    pub meeting_id: String,
    /// JSON file mapping display names to {"Email", "LTId"}
    #[arg(short, long)]
    pub mappings: Option<PathBuf>,
    /// Write the report here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,
    /// Include per-question poll results for each attendee
    #[arg(long)]
    pub breakdown: bool,
    /// Fetch participants and polls concurrently
    #[arg(long)]
    pub parallel: bool,
    #[command(flatten)]
    pub credentials: CredentialArgs,
}

/// Overrides for the credentials in the config file.
#[derive(ClapArgs, Debug, Default)]
pub struct CredentialArgs {
    #[arg(long, env = "ZOOM_ACCOUNT_ID")]
    pub account_id: Option<String>,
    #[arg(long, env = "ZOOM_CLIENT_ID")]
    pub client_id: Option<String>,
    #[arg(long, env = "ZOOM_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,
}

impl CredentialArgs {
    pub fn resolve(&self, config: &ZoomConfig) -> Credentials {
        let mut credentials = config.credentials();
        for (flag, field) in [
            (&self.account_id, &mut credentials.account_id),
            (&self.client_id, &mut credentials.client_id),
            (&self.client_secret, &mut credentials.client_secret),
        ] {
            if let Some(value) = flag {
                *field = value.clone();
            }
        }
        credentials
    }
}

#[derive(ClapArgs, Debug)]
pub struct AuthCliArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Exchange the configured credentials for a token without fetching any data
    Test {
        #[command(flatten)]
        credentials: CredentialArgs,
    },
}

#[derive(ClapArgs, Debug)]
pub struct ConfigCliArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the current configuration (secret redacted)
    Show,
    /// Print the configuration file location
    Path,
}
