use anyhow::{Context as _, Result};
use clap::Subcommand;

use crate::app::AppConfig;
use crate::schedule::OffsetSource;

#[derive(Subcommand)]
pub enum ConfigCommand {
    Show,
    /// Backend base URL, e.g. http://localhost:8000
    SetUrl { url: String },
    /// IANA zone (e.g. Europe/Rome), "auto", or "none" for the host's current offset
    SetTimezone { zone: String },
    SetTimeouts {
        #[arg(long)]
        auth: Option<u64>,
        #[arg(long)]
        request: Option<u64>,
    },
}

pub fn run(mut config: AppConfig, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            if let Some(path) = AppConfig::toml_path() {
                println!("# {}", path.display());
            }
            print!("{}", toml::to_string_pretty(&config)?);
            return Ok(());
        }
        ConfigCommand::SetUrl { url } => {
            url::Url::parse(&crate::utils::normalize_url(&url)).context("invalid URL")?;
            config.base_url = url.trim().to_string();
        }
        ConfigCommand::SetTimezone { zone } => {
            config.timezone = match zone.trim() {
                "none" | "" => None,
                "auto" => Some("auto".into()),
                name => {
                    OffsetSource::zone(name)?;
                    Some(name.to_string())
                }
            };
        }
        ConfigCommand::SetTimeouts { auth, request } => {
            if let Some(secs) = auth {
                config.auth_timeout_secs = secs;
            }
            if let Some(secs) = request {
                config.request_timeout_secs = secs;
            }
        }
    }
    config.save().context("could not save config")?;
    println!("Saved.");
    Ok(())
}
