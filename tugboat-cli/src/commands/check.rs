//! Tool availability check

use anyhow::{Context, Result};
use colored::*;

use crate::config::{Config, OutputFormat};

/// Runs each deployment tool once and reports its version
pub async fn check_tools(config: &Config) -> Result<()> {
    let backend = config.backend()?;
    let versions = backend
        .check_tools()
        .await
        .context("Deployment tools are not available")?;

    match config.output {
        OutputFormat::Json => {
            let report: serde_json::Map<String, serde_json::Value> = versions
                .into_iter()
                .map(|(program, version)| (program, serde_json::Value::String(version)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!("{}", "✓ All deployment tools are available".green().bold());
            for (program, version) in versions {
                println!("  {} {}", program.cyan(), version.dimmed());
            }
        }
    }

    Ok(())
}
