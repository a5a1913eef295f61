use anyhow::{anyhow, Result};
use clap::Parser;

/// Tubex - video platform data client
///
/// Headless client for the platform's channel, history, and analytics
/// endpoints. Configuration priority: CLI args > Environment variables > Defaults
#[derive(Parser, Debug)]
#[command(name = "tubex")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Video platform data client", long_about = None)]
pub struct CliArgs {
    /// Platform API base URL
    #[arg(long, env = "TUBEX_API_URL")]
    pub api_url: Option<String>,

    /// API bearer token (recommended to avoid rate limits)
    #[arg(long, env = "TUBEX_AUTH_TOKEN")]
    pub auth_token: Option<String>,

    /// HTTP request timeout in milliseconds (1000-60000)
    #[arg(long, env = "TUBEX_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Number of retry attempts for failed requests (0-10)
    #[arg(long, env = "TUBEX_RETRIES")]
    pub retries: Option<u8>,

    /// Channel to load (id or handle)
    #[arg(long, env = "TUBEX_CHANNEL")]
    pub channel: Option<String>,

    /// User whose watch history to load
    #[arg(long, env = "TUBEX_USER")]
    pub user: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub auth_token: Option<String>,
    pub timeout_ms: u64,
    pub retries: u8,
    pub channel: String,
    pub user: Option<String>,
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Validate URL format (basic check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

/// Load configuration from CLI args and environment variables
/// Priority: CLI args > Environment variables > Defaults
pub fn load() -> Result<Config> {
    from_args(CliArgs::parse())
}

fn from_args(args: CliArgs) -> Result<Config> {
    let api_url = args
        .api_url
        .unwrap_or_else(|| "https://api.tubex.example".to_string());
    validate_url(&api_url, "TUBEX_API_URL")?;

    let timeout_ms = args.timeout_ms.unwrap_or(8000);
    let timeout_ms = validate_in_range(timeout_ms, 1000, 60000, "TUBEX_TIMEOUT_MS")?;

    let retries = args.retries.unwrap_or(2);
    let retries = validate_in_range(retries, 0, 10, "TUBEX_RETRIES")?;

    let channel = args.channel.unwrap_or_else(|| "featured".to_string());
    if channel.is_empty() {
        return Err(anyhow!("TUBEX_CHANNEL cannot be empty"));
    }

    Ok(Config {
        api_url,
        auth_token: args.auth_token,
        timeout_ms,
        retries,
        channel,
        user: args.user,
    })
}

/// Print current configuration (useful for debugging)
impl Config {
    pub fn print_summary(&self) {
        log::info!("[tubex][config] API URL: {}", self.api_url);
        log::info!("[tubex][config] Timeout: {}ms", self.timeout_ms);
        log::info!("[tubex][config] Retries: {}", self.retries);
        log::info!("[tubex][config] Channel: {}", self.channel);
        if let Some(user) = &self.user {
            log::info!("[tubex][config] User: {user}");
        }
        if self.auth_token.is_some() {
            log::info!("[tubex][config] Auth: Configured");
        }
    }
}
