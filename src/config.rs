// Client configuration shared by every service client

use std::path::PathBuf;
use std::time::Duration;

pub const STORE_API_BASE: &str = "https://api.bricklink.com/api/store/v1";
pub const WWW_BASE: &str = "https://www.bricklink.com";
pub const STORE_BASE: &str = "https://store.bricklink.com";
pub const BRICKSET_BASE: &str = "https://brickset.com/api";
pub const LEGO_BASE: &str = "https://www.lego.com/en-US/service/rpservice";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub store_api_base: String,
    pub www_base: String,
    pub store_base: String,
    pub brickset_base: String,
    pub lego_base: String,
    pub timeout_ms: u64,
    pub user_agent: String,
    pub retry_config: RetryConfig,
    // Raw response bodies are written here when set
    pub archive_dir: Option<PathBuf>,
    pub wanted_page_size: u32,
    pub max_concurrent_requests: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            store_api_base: STORE_API_BASE.to_string(),
            www_base: WWW_BASE.to_string(),
            store_base: STORE_BASE.to_string(),
            brickset_base: BRICKSET_BASE.to_string(),
            lego_base: LEGO_BASE.to_string(),
            timeout_ms: 30_000,
            user_agent: concat!("brick-apis/", env!("CARGO_PKG_VERSION")).to_string(),
            retry_config: RetryConfig::default(),
            archive_dir: None,
            wanted_page_size: 100,
            max_concurrent_requests: 4,
        }
    }
}

impl ClientConfig {
    // Point every service at one host, used against local test servers
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            store_api_base: format!("{}/api/store/v1", base),
            www_base: base.to_string(),
            store_base: base.to_string(),
            brickset_base: format!("{}/api", base),
            lego_base: format!("{}/service/rpservice", base),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff_ms: 250,
            max_backoff_ms: 5_000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

impl RetryConfig {
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

// Exponential backoff with jitter
pub fn calculate_backoff(retry_attempt: u32, config: &RetryConfig) -> Duration {
    let base_backoff_ms = (config.initial_backoff_ms as f64
        * config.backoff_multiplier.powf(retry_attempt as f64))
    .min(config.max_backoff_ms as f64);

    let jitter = rand::random::<f64>() * config.jitter_factor * base_backoff_ms;
    let backoff_ms = base_backoff_ms * (1.0 - config.jitter_factor / 2.0) + jitter;

    Duration::from_millis(backoff_ms as u64)
}
