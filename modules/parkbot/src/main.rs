use std::convert::Infallible;
use std::sync::Arc;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bluesky_client::BlueskyClient;
use image_search_client::ImageSearchClient;
use parkbot::fetch::HttpImageFetcher;
use parkbot::traits::TokioSleeper;
use parkbot::{
    health, BlueskyNetwork, BotError, Config, ImageCompressor, ImageResolver, PostingBot,
    Publisher, Scheduler, SiteLists,
};
use registry_client::{NpsClient, RidbClient};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("parkbot=info".parse()?))
        .init();

    let config = Config::from_env()?;
    config.log_redacted();

    // Liveness responder runs beside the posting loop
    let listener = health::bind(config.port).await?;
    info!(port = config.port, "Health check server running");
    tokio::spawn(async move {
        if let Err(e) = health::serve(listener).await {
            error!(error = %e, "Health check server stopped");
        }
    });

    match run(&config).await {
        Ok(never) => match never {},
        Err(e) => {
            error!(error = %e, "Bot stopped");
            Err(e.into())
        }
    }
}

async fn run(config: &Config) -> Result<Infallible, BotError> {
    info!("Updating list of national parks, forests, monuments, and recreation areas...");
    let parks = NpsClient::new(&config.nps_api_key).fetch_parks().await?;
    let rec_areas = RidbClient::new(&config.recreation_gov_api_key)
        .fetch_rec_areas()
        .await?;
    let sites = SiteLists::new(parks, rec_areas);
    info!(total = sites.len(), "Site lists ready");

    let network = BlueskyNetwork::new(
        BlueskyClient::new(),
        &config.bluesky_handle,
        &config.bluesky_password,
    );
    let bot = PostingBot::new(
        sites,
        StdRng::from_os_rng(),
        ImageResolver::new(Arc::new(ImageSearchClient::new(&config.bing_api_key))),
        Arc::new(HttpImageFetcher::new()),
        ImageCompressor::default(),
        Publisher::new(Arc::new(network)),
    );

    Scheduler::new(bot, Arc::new(TokioSleeper), config.post_interval)
        .run()
        .await
}
