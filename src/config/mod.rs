use crate::core::{AppError, Result};
use crate::modules::channels::services::alipay::{AlipayExtra, MAX_RETRIES};
use crate::modules::channels::ChannelConfig;
use std::env;
use std::str::FromStr;

pub mod alipay;
pub mod server;

pub use alipay::AlipayConfig;
pub use server::ServerConfig;

/// Source of configuration values, keyed by variable name
pub type Lookup<'a> = dyn Fn(&str) -> Option<String> + 'a;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub alipay: AlipayConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

/// Outbound HTTP settings for vendor calls
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_lookup(&|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value source
    pub fn from_lookup(lookup: &Lookup<'_>) -> Result<Self> {
        Ok(Config {
            app: AppConfig {
                env: lookup("APP_ENV").unwrap_or_else(|| "development".to_string()),
                log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            },
            server: ServerConfig::from_lookup(lookup)?,
            alipay: AlipayConfig::from_lookup(lookup)?,
            http: HttpConfig {
                timeout_secs: parse_var(lookup, "HTTP_TIMEOUT_SECS", 10)?,
                max_retries: parse_var(lookup, "HTTP_MAX_RETRIES", MAX_RETRIES)?,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.http.timeout_secs == 0 {
            return Err(AppError::configuration(
                "HTTP_TIMEOUT_SECS must be greater than 0",
            ));
        }

        if self.http.max_retries > MAX_RETRIES {
            return Err(AppError::configuration(format!(
                "HTTP_MAX_RETRIES must be at most {}",
                MAX_RETRIES
            )));
        }

        if self.server.workers == 0 {
            return Err(AppError::configuration("SERVER_WORKERS must be greater than 0"));
        }

        if !self.alipay.notify_url.starts_with("http://")
            && !self.alipay.notify_url.starts_with("https://")
        {
            return Err(AppError::configuration(
                "ALIPAY_NOTIFY_URL must be an http(s) URL",
            ));
        }

        Ok(())
    }

    /// Channel configuration handed to the channel registry
    pub fn channel_config(&self) -> Result<ChannelConfig> {
        let extra = AlipayExtra {
            sign_type: Some(self.alipay.sign_type.clone()),
            is_sandbox: self.alipay.sandbox,
            specified_channel: self.alipay.specified_channel.clone(),
            gateway_url: self.alipay.gateway_url.clone(),
            timeout_secs: Some(self.http.timeout_secs),
            max_retries: Some(self.http.max_retries),
        };

        Ok(ChannelConfig {
            client_id: 0,
            channel: self.alipay.channel.clone(),
            app_id: self.alipay.app_id.clone(),
            app_secret: String::new(),
            private_key: self.alipay.private_key.clone(),
            public_key: self.alipay.public_key.clone(),
            notify_url: self.alipay.notify_url.clone(),
            extra: serde_json::to_string(&extra)?,
        })
    }
}

pub(crate) fn required_var(lookup: &Lookup<'_>, key: &str) -> Result<String> {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Configuration(format!("{} not set", key)))
}

pub(crate) fn parse_var<T: FromStr>(lookup: &Lookup<'_>, key: &str, default: T) -> Result<T> {
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}", key))),
        _ => Ok(default),
    }
}
