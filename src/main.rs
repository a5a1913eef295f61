use anyhow::{Context, Result};
use tubex::api::ApiClient;
use tubex::config;
use tubex::loader::ResourceLoader;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    dotenvy::dotenv().ok();
    env_logger::init();

    let cfg = config::load().context("Failed to load configuration")?;
    cfg.print_summary();

    let client = ApiClient::new(cfg.api_url.clone(), cfg.timeout_ms, cfg.retries)
        .with_auth_token(cfg.auth_token.clone());

    // One loader per resource the (hypothetical) view would render.
    let channel_loader = {
        let client = client.clone();
        let channel = cfg.channel.clone();
        ResourceLoader::new(move || {
            let client = client.clone();
            let channel = channel.clone();
            async move { client.fetch_channel(&channel).await }
        })
    };
    channel_loader.start();

    let analytics_loader = {
        let client = client.clone();
        let channel = cfg.channel.clone();
        ResourceLoader::new(move || {
            let client = client.clone();
            let channel = channel.clone();
            async move { client.fetch_analytics(&channel).await }
        })
    };
    analytics_loader.start();

    let mut channel_state = channel_loader.settled().await;
    if channel_state.error.is_some() {
        log::info!("[tubex][main] channel fetch failed, refetching once");
        channel_loader.refetch();
        channel_state = channel_loader.settled().await;
    }
    match (&channel_state.data, &channel_state.error) {
        (Some(channel), _) => {
            println!("{}", serde_json::to_string_pretty(channel)?);
        }
        (None, Some(msg)) => eprintln!("channel: {msg}"),
        (None, None) => {}
    }

    let analytics_state = analytics_loader.settled().await;
    match (&analytics_state.data, &analytics_state.error) {
        (Some(analytics), _) => {
            println!("{}", serde_json::to_string_pretty(analytics)?);
        }
        (None, Some(msg)) => eprintln!("analytics: {msg}"),
        (None, None) => {}
    }

    if let Some(user) = &cfg.user {
        let history_loader = {
            let client = client.clone();
            let user = user.clone();
            ResourceLoader::new(move || {
                let client = client.clone();
                let user = user.clone();
                async move { client.fetch_history(&user).await }
            })
        };
        history_loader.start();
        let history_state = history_loader.settled().await;
        match (&history_state.data, &history_state.error) {
            (Some(entries), _) => {
                println!("{}", serde_json::to_string_pretty(entries)?);
            }
            (None, Some(msg)) => eprintln!("history: {msg}"),
            (None, None) => {}
        }
    }

    Ok(())
}
