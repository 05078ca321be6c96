//! Rate limit display.

use std::error::Error;

use clap::ValueEnum;
use serde::Serialize;
use tabled::{Table, Tabled};

use attest::RateLimitInfo;

use crate::commands::checks::read_client;
use crate::config::Config;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Display as a formatted table (default)
    #[default]
    Table,
    /// Display as JSON
    Json,
}

/// Rate limit information for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub(crate) struct RateLimitDisplay {
    #[tabled(rename = "Limit")]
    pub limit: String,
    #[tabled(rename = "Remaining")]
    pub remaining: String,
    #[tabled(rename = "Resets At")]
    pub reset_at: String,
    #[tabled(rename = "Resets In")]
    pub reset_in: String,
}

impl RateLimitDisplay {
    fn from_info(info: &RateLimitInfo) -> Self {
        let now = chrono::Utc::now();
        let reset_in = if info.reset_at > now {
            let secs = (info.reset_at - now).num_seconds();
            format!("{}m {}s", secs / 60, secs % 60)
        } else {
            "now".to_string()
        };

        Self {
            limit: info.limit.to_string(),
            remaining: info.remaining.to_string(),
            reset_at: info.reset_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            reset_in,
        }
    }
}

/// Handle the limits command.
pub(crate) async fn handle_limits(
    config: &Config,
    output: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let client = read_client(config)?;
    let info = client.rate_limit().await?;

    let row = RateLimitDisplay::from_info(&info);
    match output {
        OutputFormat::Table => println!("{}", Table::new(vec![row])),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&row)?),
    }
    Ok(())
}
