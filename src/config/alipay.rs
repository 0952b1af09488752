use super::{parse_var, required_var, Lookup};
use crate::core::Result;
use std::fmt;

/// Payment channel configuration read from the environment
#[derive(Clone)]
pub struct AlipayConfig {
    /// Registry name of the channel to start, `ali` by default
    pub channel: String,
    pub app_id: String,
    pub private_key: String,
    pub public_key: String,
    pub notify_url: String,
    pub sign_type: String,
    pub sandbox: bool,
    pub specified_channel: Option<String>,
    pub gateway_url: Option<String>,
}

impl AlipayConfig {
    pub(super) fn from_lookup(lookup: &Lookup<'_>) -> Result<Self> {
        Ok(AlipayConfig {
            channel: lookup("PAYMENT_CHANNEL").unwrap_or_else(|| "ali".to_string()),
            app_id: required_var(lookup, "ALIPAY_APP_ID")?,
            private_key: unescape_newlines(&required_var(lookup, "ALIPAY_PRIVATE_KEY")?),
            public_key: unescape_newlines(&required_var(lookup, "ALIPAY_PUBLIC_KEY")?),
            notify_url: required_var(lookup, "ALIPAY_NOTIFY_URL")?,
            sign_type: lookup("ALIPAY_SIGN_TYPE").unwrap_or_else(|| "RSA2".to_string()),
            sandbox: parse_var(lookup, "ALIPAY_SANDBOX", false)?,
            specified_channel: lookup("ALIPAY_SPECIFIED_CHANNEL").filter(|v| !v.trim().is_empty()),
            gateway_url: lookup("ALIPAY_GATEWAY_URL").filter(|v| !v.trim().is_empty()),
        })
    }
}

impl fmt::Debug for AlipayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlipayConfig")
            .field("channel", &self.channel)
            .field("app_id", &self.app_id)
            .field("private_key", &"<redacted>")
            .field("public_key", &"<redacted>")
            .field("notify_url", &self.notify_url)
            .field("sign_type", &self.sign_type)
            .field("sandbox", &self.sandbox)
            .field("specified_channel", &self.specified_channel)
            .field("gateway_url", &self.gateway_url)
            .finish()
    }
}

/// PEM keys kept on one line in `.env` files use literal `\n`
fn unescape_newlines(value: &str) -> String {
    value.replace("\\n", "\n")
}
