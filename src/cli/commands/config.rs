//! Show-config command - print the effective configuration

use clap::Args;

use crate::cli::OutputFormat;
use crate::core::config::Config;

/// Arguments for the show-config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Output format
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,

    /// Print the store URI without masking credentials
    #[arg(long)]
    pub reveal_secrets: bool,
}

/// Render the configuration in the requested format
pub fn render(args: &ConfigArgs, config: &Config) -> Result<String, Box<dyn std::error::Error>> {
    let mut shown = config.clone();
    if !args.reveal_secrets {
        shown.store.uri = shown.store.redacted_uri();
    }

    Ok(match args.format {
        OutputFormat::Human => toml::to_string_pretty(&shown)?,
        OutputFormat::Json => serde_json::to_string_pretty(&shown)?,
    })
}

/// Execute the show-config command
pub fn execute(args: ConfigArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render(&args, config)?);
    Ok(())
}
