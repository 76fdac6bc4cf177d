use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use graphpost::attachment::ChunkFailurePolicy;
use graphpost::auth::TokenStore;
use graphpost::cli::Cli;
use graphpost::config::Config;
use graphpost::graph::GraphClient;
use graphpost::transaction::{AttachmentFailurePolicy, MailTransaction};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config_dir = cli
        .config_dir
        .clone()
        .or_else(Config::default_config_dir)
        .ok_or_else(|| anyhow!("cannot determine configuration directory"))?;

    let config = Config::load(&config_dir)?;
    let token = TokenStore::new(&config_dir).load(&cli.account)?;
    let client = GraphClient::new(&config, token)?;

    let attachment_policy = if cli.abort_on_attachment_failure {
        AttachmentFailurePolicy::AbortOnFirstFailure
    } else {
        AttachmentFailurePolicy::ContinueOnFailure
    };

    let mut transaction = MailTransaction::new(client, cli.to.clone())
        .with_attachment_policy(attachment_policy)
        .with_chunk_policy(ChunkFailurePolicy::AbortOnError);

    transaction.create_draft(&cli.subject, &cli.body_html()?).await?;

    let mut failed = 0usize;
    for path in &cli.attachments {
        if !transaction.add_attachment(path).await? {
            failed += 1;
        }
    }

    transaction.send().await?;

    if failed > 0 {
        tracing::warn!("{} attachment(s) were not uploaded", failed);
    }
    tracing::info!("Mail sent to {}", cli.to);

    Ok(())
}
