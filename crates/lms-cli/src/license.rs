//! # License Subcommand
//!
//! Parses a content license code and prints its stored record together
//! with the derived Creative Commons attributes and URLs.

use anyhow::Result;
use clap::Args;
use serde_json::json;

use lms_license::{License, LicenseConfig};

use crate::OutputFormat;

/// Arguments for the license subcommand.
#[derive(Args, Debug)]
pub struct LicenseArgs {
    /// License code (`ARR`, `CC0`, `CC-BY-NC-SA`, ...).
    pub code: String,

    /// License version; Creative Commons licenses default to the
    /// configured version.
    #[arg(long = "version")]
    pub license_version: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Render the license described by `code` and `version`.
pub fn render_license(
    code: &str,
    version: Option<&str>,
    config: &LicenseConfig,
    format: OutputFormat,
) -> Result<String> {
    let Some(license) = License::parse(code, version, config)? else {
        return Ok(match format {
            OutputFormat::Json => "null".to_string(),
            OutputFormat::Text => "no license".to_string(),
        });
    };
    let cc = license.creative_commons();

    match format {
        OutputFormat::Json => {
            let value = json!({
                "record": license.to_record(),
                "description": license.description(),
                "img_src": config.image_src(&license, true),
                "deed_url": license.deed_url(),
                "cc_attributes": cc.map(|cc| cc.cc_attributes()),
                "api_query_url": cc.map(|cc| cc.api_query_url()),
            });
            Ok(serde_json::to_string_pretty(&value)?)
        }
        OutputFormat::Text => {
            let mut lines = vec![
                format!("license:      {}", license.code()),
                format!("version:      {}", license.version().unwrap_or("-")),
                format!("description:  {}", license.description()),
            ];
            if let Some(cc) = cc {
                let (class, commercial, derivatives) = cc.cc_attributes();
                lines.push(format!(
                    "attributes:   class={class} commercial={commercial} derivatives={derivatives}"
                ));
                if let Some(img) = config.image_src(&license, true) {
                    lines.push(format!("image:        {img}"));
                }
                lines.push(format!("deed:         {}", cc.deed_url()));
                lines.push(format!("api query:    {}", cc.api_query_url()));
            }
            Ok(lines.join("\n"))
        }
    }
}

/// Execute the license subcommand.
pub fn run_license(args: &LicenseArgs, config: &LicenseConfig) -> Result<u8> {
    println!(
        "{}",
        render_license(&args.code, args.license_version.as_deref(), config, args.format)?
    );
    Ok(0)
}
