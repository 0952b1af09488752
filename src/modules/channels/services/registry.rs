use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info};

use super::super::models::ChannelConfig;
use super::alipay::{self, alipay_constructor};
use super::channel_trait::PaymentChannel;
use crate::core::{AppError, Result};

/// Builds a channel client from configuration
pub type ChannelConstructor = fn(&ChannelConfig) -> Result<Arc<dyn PaymentChannel>>;

/// Table of channel constructors keyed by channel name
///
/// Populated explicitly at process start, then only read.
#[derive(Clone, Default)]
pub struct ChannelRegistry {
    constructors: HashMap<String, ChannelConstructor>,
}

impl ChannelRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every channel this crate implements
    pub fn with_builtin_channels() -> Self {
        let mut registry = Self::new();
        registry.register(alipay::CHANNEL_NAME, alipay_constructor);
        registry
    }

    /// Register a constructor, replacing any previous one with the same name
    pub fn register(&mut self, name: impl Into<String>, constructor: ChannelConstructor) {
        self.constructors.insert(name.into(), constructor);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered channel names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.constructors.keys().cloned().collect();
        names.sort();
        names
    }

    /// Instantiate the client named by `config.channel`
    ///
    /// An unknown name is [`AppError::UnregisteredChannel`]; callers resolve their
    /// channel once at startup and treat that as fatal.
    pub fn client(&self, config: &ChannelConfig) -> Result<Arc<dyn PaymentChannel>> {
        let constructor = self.constructors.get(&config.channel).ok_or_else(|| {
            error!(channel = %config.channel, "Payment channel is not registered");
            AppError::UnregisteredChannel(config.channel.clone())
        })?;

        let client = constructor(config)?;
        info!(channel = %config.channel, app_id = %config.app_id, "Payment channel initialized");
        Ok(client)
    }
}
