use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;

/// Graphpost - send mail through Microsoft Graph with large attachments
#[derive(Parser)]
#[command(name = "graphpost")]
#[command(about = "Send mail through Microsoft Graph with resumable large-attachment uploads")]
#[command(version)]
pub struct Cli {
    /// Recipient email address
    #[arg(long, short = 't')]
    pub to: String,

    /// Mail subject
    #[arg(long, short)]
    pub subject: String,

    /// HTML mail body
    #[arg(long, conflicts_with = "body_file")]
    pub body: Option<String>,

    /// Read the HTML mail body from a file
    #[arg(long)]
    pub body_file: Option<PathBuf>,

    /// File to attach (repeatable)
    #[arg(long = "attach", short = 'a')]
    pub attachments: Vec<PathBuf>,

    /// Account identifier used for token lookup
    #[arg(long, default_value = "default")]
    pub account: String,

    /// Configuration directory path
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// Fail the whole transaction on the first attachment that does not upload
    #[arg(long)]
    pub abort_on_attachment_failure: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Resolve the mail body from `--body` or `--body-file`
    pub fn body_html(&self) -> Result<String> {
        if let Some(body) = &self.body {
            return Ok(body.clone());
        }
        if let Some(path) = &self.body_file {
            return Ok(std::fs::read_to_string(path)?);
        }
        Err(anyhow!("either --body or --body-file is required"))
    }
}
