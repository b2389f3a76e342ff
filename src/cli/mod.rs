use crate::config::Config;
use anyhow::Result;

pub mod args;
pub mod report;

pub use args::{
    AuthCliArgs, AuthCommand, Cli, CliCommand, ConfigCliArgs, ConfigCommand, CredentialArgs,
    ReportCliArgs,
};
pub use report::{handle_auth_command, handle_report_command};

pub fn handle_config_command(args: ConfigCliArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = Config::load()?;
            print!("{}", toml::to_string_pretty(&config.redacted())?);
        }
        ConfigCommand::Path => {
            println!("{}", Config::config_path()?.display());
        }
    }
    Ok(())
}
