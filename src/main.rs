use chrono::Utc;
use tracing::{info, warn};

use opensea_sales_bot::services::discord::{self, DiscordClient};
use opensea_sales_bot::services::opensea::OpenSeaClient;
use opensea_sales_bot::services::renderer::RenderClient;
use opensea_sales_bot::{Config, Dispatcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "opensea_sales_bot=info".into()),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        collection = %config.collection_slug,
        lookback_seconds = config.lookback_seconds,
        "Configuration loaded"
    );

    // Open the Discord session before touching the feed
    let channel = DiscordClient::new(discord::DEFAULT_API_URL)
        .connect(&config.discord_bot_token, &config.discord_channel_id)
        .await?;

    let feed = OpenSeaClient::new(&config.opensea_api_url);
    let renderer = RenderClient::new(&config.renderer_url);

    let occurred_after = Utc::now().timestamp() - config.lookback_seconds as i64;
    let summary = Dispatcher::new(&feed, &renderer, &channel)
        .run(
            occurred_after,
            &config.collection_slug,
            config.contract_address.as_deref(),
        )
        .await?;

    if summary.failures.is_empty() {
        info!(
            attempted = summary.attempted,
            sent = summary.sent,
            "Run complete"
        );
    } else {
        // Per-sale failures were already logged with their causes
        warn!(
            attempted = summary.attempted,
            sent = summary.sent,
            failed = summary.failures.len(),
            "Run complete with failures"
        );
    }

    channel.close();
    Ok(())
}
