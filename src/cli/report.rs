//! CLI handlers that talk to Zoom.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::attendance::EmailMappings;
use crate::cli::args::{AuthCliArgs, AuthCommand, ReportCliArgs};
use crate::config::Config;
use crate::report::generate_report;
use crate::zoom::{Credentials, ZoomClient};

pub async fn handle_report_command(args: ReportCliArgs) -> Result<()> {
    let config = Config::load()?;
    let credentials = args.credentials.resolve(&config.zoom);
    ensure_complete(&credentials)?;

    let mappings_path = args.mappings.clone().or_else(|| {
        config
            .output
            .email_mappings_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    });
    let mappings = match &mappings_path {
        Some(path) => {
            info!("Reading email mappings from {:?}", path);
            Some(EmailMappings::read_file(path)?)
        }
        None => None,
    };

    let mut options = config.report_options();
    options.include_breakdown |= args.breakdown;
    options.parallel_fetches |= args.parallel;

    let client = ZoomClient::from_config(&config.zoom)?;
    let report = generate_report(
        &client,
        &credentials,
        &args.meeting_id,
        mappings.as_deref(),
        &options,
    )
    .await?;

    let json = report
        .to_json(args.pretty || config.output.pretty)
        .context("Failed to serialize report")?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write report to {:?}", path))?;
            eprintln!(
                "Wrote report for meeting {} ({} attendees) to {}",
                report.meeting_id,
                report.attendees.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}

pub async fn handle_auth_command(args: AuthCliArgs) -> Result<()> {
    match args.command {
        AuthCommand::Test { credentials } => {
            let config = Config::load()?;
            let credentials = credentials.resolve(&config.zoom);
            ensure_complete(&credentials)?;

            let client = ZoomClient::from_config(&config.zoom)?;
            let token = client.fetch_access_token(&credentials).await?;

            match token.expires_in() {
                Some(secs) => println!("Credentials OK (token valid for {}s)", secs),
                None => println!("Credentials OK"),
            }
            Ok(())
        }
    }
}

fn ensure_complete(credentials: &Credentials) -> Result<()> {
    let missing = credentials.missing_fields();
    if !missing.is_empty() {
        bail!(
            "Missing Zoom credentials: {}. Set them in {:?}, pass --account-id/--client-id/--client-secret, or export ZOOM_ACCOUNT_ID/ZOOM_CLIENT_ID/ZOOM_CLIENT_SECRET",
            missing.join(", "),
            Config::config_path().unwrap_or_default()
        );
    }
    Ok(())
}
