use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration a channel constructor is built from
///
/// `extra` is channel specific JSON, parsed by the constructor for that channel.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Tenant the configuration belongs to
    pub client_id: i64,
    /// Registry key, e.g. `ali`
    pub channel: String,
    pub app_id: String,
    #[serde(default)]
    pub app_secret: String,
    /// Merchant private key, signs requests
    pub private_key: String,
    /// Vendor public key, verifies callbacks
    pub public_key: String,
    pub notify_url: String,
    #[serde(default)]
    pub extra: String,
}

impl fmt::Debug for ChannelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelConfig")
            .field("client_id", &self.client_id)
            .field("channel", &self.channel)
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .field("private_key", &"<redacted>")
            .field("public_key", &"<redacted>")
            .field("notify_url", &self.notify_url)
            .field("extra", &self.extra)
            .finish()
    }
}
