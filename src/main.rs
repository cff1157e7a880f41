use std::sync::Arc;

use clap::Parser;
use log::{info, warn};

use tabchat::api::TabchatApi;
use tabchat::cache::UploadCache;
use tabchat::conf::Config;
use tabchat::core::{CliArgs, setup_logging};
use tabchat::delegate::OpenAiDelegate;
use tabchat::service::TabchatService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    // Loaded before logging so RUST_LOG can come from .env.
    let dotenv = (!args.no_dotenv).then(dotenvy::dotenv);
    setup_logging();
    if let Some(Err(e)) = &dotenv {
        if !e.not_found() {
            warn!(error:% = e; "ignoring unreadable .env");
        }
    }
    info!(args = args; "Tabchat started.");

    let config = Config::load(args.config.as_deref())?;
    let cache = UploadCache::from_config(&config.cache).await?;
    let delegate = Arc::new(OpenAiDelegate::new(config.delegate.clone())?);
    let service = TabchatService::new(cache, delegate);

    TabchatApi::new(service).serve(&config.server.addr()).await?;
    Ok(())
}
