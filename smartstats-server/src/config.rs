use std::env;

use smartstats_persistence::connection::DEFAULT_DATABASE_URL;

pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-5-20250929";

/// Placeholder shipped in the sample `.env`; treated as "no key"
pub const PLACEHOLDER_API_KEY: &str = "your-api-key-here";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_base_url: String,
    pub anthropic_model: String,
    pub max_upload_bytes: u64,
    pub analyze_rate_limit: u32,
    pub analyze_refill_seconds: u64,
    pub static_dir: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .expect("Invalid PORT"),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            anthropic_api_key: env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
            anthropic_base_url: env::var("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_ANTHROPIC_BASE_URL.to_string()),
            anthropic_model: env::var("ANTHROPIC_MODEL")
                .unwrap_or_else(|_| DEFAULT_ANTHROPIC_MODEL.to_string()),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| (10 * 1024 * 1024).to_string())
                .parse()
                .expect("Invalid MAX_UPLOAD_BYTES"),
            analyze_rate_limit: env::var("ANALYZE_RATE_LIMIT")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("Invalid ANALYZE_RATE_LIMIT"),
            analyze_refill_seconds: env::var("ANALYZE_REFILL_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("Invalid ANALYZE_REFILL_SECONDS"),
            static_dir: env::var("STATIC_DIR").ok().filter(|dir| !dir.is_empty()),
        }
    }

    /// Key from the request header wins over the configured one
    pub fn resolve_api_key(&self, header: Option<String>) -> Option<String> {
        header
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.anthropic_api_key.clone())
            .filter(|key| key != PLACEHOLDER_API_KEY)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
