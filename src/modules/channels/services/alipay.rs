use super::super::models::{
    CallbackNotification, CallbackParams, ChannelConfig, ChargeRequest, OrderStatus,
    SignedParameters, TradeQueryEnvelope, TradeQueryResponse,
};
use super::channel_trait::PaymentChannel;
use crate::core::canonical::{self, SIGN_FIELD, SIGN_TYPE_FIELD};
use crate::core::signature::{self, DigestAlgorithm};
use crate::core::timestamp::vendor_timestamp_now;
use crate::core::{AppError, Result};
use async_trait::async_trait;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Registry name of this channel
pub const CHANNEL_NAME: &str = "ali";

pub const PRODUCTION_GATEWAY_URL: &str = "https://openapi.alipay.com/gateway.do";
pub const SANDBOX_GATEWAY_URL: &str = "https://openapi-sandbox.dl.alipaydev.com/gateway.do";

const METHOD_APP_PAY: &str = "alipay.trade.app.pay";
const METHOD_TRADE_QUERY: &str = "alipay.trade.query";
const PRODUCT_CODE_APP: &str = "QUICK_MSECURITY_PAY";
const FORMAT: &str = "json";
const CHARSET: &str = "utf-8";
const VERSION: &str = "1.0";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Upper bound on transport retries for a single call
pub const MAX_RETRIES: u32 = 1;

/// Signature algorithm discriminator sent as `sign_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignType {
    /// RSA with SHA-256
    Rsa2,
}

impl SignType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignType::Rsa2 => "RSA2",
        }
    }

    pub fn digest(&self) -> DigestAlgorithm {
        match self {
            SignType::Rsa2 => DigestAlgorithm::Sha256,
        }
    }
}

impl FromStr for SignType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "" | "RSA2" => Ok(SignType::Rsa2),
            "RSA" => Err(AppError::configuration(
                "sign type RSA (SHA-1) is not supported, use RSA2",
            )),
            other => Err(AppError::configuration(format!(
                "unknown sign type '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for SignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to build an [`AlipayClient`]
#[derive(Clone)]
pub struct AlipaySettings {
    pub app_id: String,
    /// Merchant private key, PEM or base64 DER
    pub private_key: String,
    /// Alipay public key, PEM or base64 DER
    pub alipay_public_key: String,
    pub notify_url: String,
    pub sign_type: SignType,
    pub is_sandbox: bool,
    /// Default `specified_channel` put into every charge
    pub specified_channel: Option<String>,
    /// Overrides the production/sandbox gateway
    pub gateway_url: Option<String>,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl AlipaySettings {
    pub fn new(
        app_id: impl Into<String>,
        private_key: impl Into<String>,
        alipay_public_key: impl Into<String>,
        notify_url: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            private_key: private_key.into(),
            alipay_public_key: alipay_public_key.into(),
            notify_url: notify_url.into(),
            sign_type: SignType::Rsa2,
            is_sandbox: false,
            specified_channel: None,
            gateway_url: None,
            timeout: DEFAULT_TIMEOUT,
            max_retries: MAX_RETRIES,
        }
    }
}

/// Channel specific part of [`ChannelConfig::extra`]
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AlipayExtra {
    pub sign_type: Option<String>,
    pub is_sandbox: bool,
    pub specified_channel: Option<String>,
    pub gateway_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

#[derive(Serialize)]
struct AppPayBizContent<'a> {
    out_trade_no: &'a str,
    total_amount: &'a str,
    subject: &'a str,
    product_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    specified_channel: Option<&'a str>,
}

#[derive(Serialize)]
struct TradeQueryBizContent<'a> {
    out_trade_no: &'a str,
}

/// Alipay open platform client
///
/// Keys are parsed once here; the client is read-only afterwards and can be
/// shared freely.
pub struct AlipayClient {
    http: ClientWithMiddleware,
    app_id: String,
    private_key: RsaPrivateKey,
    alipay_public_key: RsaPublicKey,
    notify_url: String,
    sign_type: SignType,
    gateway_url: String,
    specified_channel: Option<String>,
}

impl AlipayClient {
    /// Create a new Alipay client
    ///
    /// # Errors
    /// * `Configuration` - empty app id, zero timeout or unusable HTTP settings
    /// * `KeyParse` - either key cannot be decoded
    pub fn new(settings: AlipaySettings) -> Result<Self> {
        if settings.app_id.trim().is_empty() {
            return Err(AppError::configuration("alipay app_id is required"));
        }
        if settings.timeout.is_zero() {
            return Err(AppError::configuration(
                "alipay request timeout must be greater than 0",
            ));
        }

        let private_key = signature::load_private_key(settings.private_key.as_bytes())?;
        let alipay_public_key = signature::load_public_key(settings.alipay_public_key.as_bytes())?;

        let gateway_url = settings.gateway_url.unwrap_or_else(|| {
            if settings.is_sandbox {
                SANDBOX_GATEWAY_URL.to_string()
            } else {
                PRODUCTION_GATEWAY_URL.to_string()
            }
        });

        let http = build_http_client(settings.timeout, settings.max_retries)?;

        Ok(Self {
            http,
            app_id: settings.app_id,
            private_key,
            alipay_public_key,
            notify_url: settings.notify_url,
            sign_type: settings.sign_type,
            gateway_url,
            specified_channel: settings
                .specified_channel
                .filter(|c| !c.trim().is_empty()),
        })
    }

    /// Build from registry configuration, reading options from `extra`
    pub fn from_channel_config(config: &ChannelConfig) -> Result<Self> {
        let extra: AlipayExtra = if config.extra.trim().is_empty() {
            AlipayExtra::default()
        } else {
            serde_json::from_str(&config.extra).map_err(|e| {
                AppError::configuration(format!("invalid alipay extra config: {}", e))
            })?
        };

        let sign_type = SignType::from_str(extra.sign_type.as_deref().unwrap_or_default())?;

        let mut settings = AlipaySettings::new(
            config.app_id.clone(),
            config.private_key.clone(),
            config.public_key.clone(),
            config.notify_url.clone(),
        );
        settings.sign_type = sign_type;
        settings.is_sandbox = extra.is_sandbox;
        settings.specified_channel = extra.specified_channel;
        settings.gateway_url = extra.gateway_url;
        if let Some(secs) = extra.timeout_secs {
            settings.timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = extra.max_retries {
            settings.max_retries = retries;
        }

        Self::new(settings)
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn gateway_url(&self) -> &str {
        &self.gateway_url
    }

    pub fn sign_type(&self) -> SignType {
        self.sign_type
    }

    /// Signed `alipay.trade.app.pay` parameters for an order
    pub fn build_charge_parameters(
        &self,
        out_trade_no: &str,
        total_amount: &str,
        subject: &str,
    ) -> Result<SignedParameters> {
        let request = ChargeRequest::new(out_trade_no, total_amount, subject)?;
        self.app_charge(&request)
    }

    /// Query an order and return the full vendor response
    ///
    /// # Errors
    /// * `Network` - transport failure after retries
    /// * `Encoding` - body is not the expected JSON envelope
    /// * `Remote` - vendor answered with a code other than `10000`
    pub async fn query_trade(&self, out_trade_no: &str) -> Result<TradeQueryResponse> {
        if out_trade_no.trim().is_empty() {
            return Err(AppError::validation("out_trade_no is required"));
        }

        let biz_content = serde_json::to_string(&TradeQueryBizContent { out_trade_no })?;
        let mut fields = self.common_fields(METHOD_TRADE_QUERY);
        fields.insert("biz_content".to_string(), biz_content);
        let params = self.sign_fields(fields)?;

        debug!(out_trade_no = %out_trade_no, gateway = %self.gateway_url, "Querying alipay trade");

        let response = self
            .http
            .get(&self.gateway_url)
            .query(params.fields())
            .send()
            .await?;

        let status_code = response.status();
        let body = response.text().await?;

        if !status_code.is_success() {
            warn!(
                out_trade_no = %out_trade_no,
                status = status_code.as_u16(),
                "Alipay gateway returned HTTP error"
            );
            return Err(AppError::Remote {
                code: status_code.as_u16().to_string(),
                msg: "HTTP error".to_string(),
                sub_msg: body,
            });
        }

        let envelope: TradeQueryEnvelope = serde_json::from_str(&body)?;
        let trade = envelope.response;

        if !trade.is_success() {
            warn!(
                out_trade_no = %out_trade_no,
                code = %trade.code,
                msg = %trade.msg,
                "Alipay trade query failed"
            );
            return Err(AppError::Remote {
                code: trade.code,
                msg: trade.msg,
                sub_msg: trade.sub_msg.unwrap_or_default(),
            });
        }

        Ok(trade)
    }

    fn common_fields(&self, method: &str) -> BTreeMap<String, String> {
        let mut fields = BTreeMap::new();
        fields.insert("app_id".to_string(), self.app_id.clone());
        fields.insert("method".to_string(), method.to_string());
        fields.insert("format".to_string(), FORMAT.to_string());
        fields.insert("charset".to_string(), CHARSET.to_string());
        fields.insert(SIGN_TYPE_FIELD.to_string(), self.sign_type.as_str().to_string());
        fields.insert("timestamp".to_string(), vendor_timestamp_now());
        fields.insert("version".to_string(), VERSION.to_string());
        fields
    }

    fn sign_fields(&self, fields: BTreeMap<String, String>) -> Result<SignedParameters> {
        let content = canonical::request_content(&fields);
        let sign = signature::sign_base64(&content, &self.private_key, self.sign_type.digest())?;
        Ok(SignedParameters::new(fields, sign))
    }
}

#[async_trait]
impl PaymentChannel for AlipayClient {
    fn name(&self) -> &str {
        CHANNEL_NAME
    }

    fn app_charge(&self, request: &ChargeRequest) -> Result<SignedParameters> {
        let specified_channel = request
            .specified_channel()
            .or(self.specified_channel.as_deref());

        let biz_content = serde_json::to_string(&AppPayBizContent {
            out_trade_no: request.out_trade_no(),
            total_amount: request.total_amount(),
            subject: request.subject(),
            product_code: PRODUCT_CODE_APP,
            specified_channel,
        })?;

        let mut fields = self.common_fields(METHOD_APP_PAY);
        fields.insert("notify_url".to_string(), self.notify_url.clone());
        fields.insert("biz_content".to_string(), biz_content);

        let params = self.sign_fields(fields)?;

        info!(
            out_trade_no = %request.out_trade_no(),
            total_amount = %request.total_amount(),
            "Built alipay app pay parameters"
        );

        Ok(params)
    }

    fn verify_callback(&self, mut params: CallbackParams) -> Result<CallbackNotification> {
        let sign = params
            .remove(SIGN_FIELD)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::signature_mismatch("callback carries no sign"))?;
        params.remove(SIGN_TYPE_FIELD);

        let content = canonical::callback_content(&params);
        if let Err(err) =
            signature::verify_base64(&content, &sign, &self.alipay_public_key, self.sign_type.digest())
        {
            warn!(
                out_trade_no = params.get("out_trade_no").map(String::as_str).unwrap_or_default(),
                notify_id = params.get("notify_id").map(String::as_str).unwrap_or_default(),
                error = %err,
                "Rejected alipay callback"
            );
            return Err(err);
        }

        if let Some(app_id) = params.get("app_id") {
            if app_id != &self.app_id {
                warn!(app_id = %app_id, "Alipay callback addressed to another app");
                return Err(AppError::validation(format!(
                    "callback app_id '{}' does not match",
                    app_id
                )));
            }
        }

        let notification = CallbackNotification::from_verified(params)?;
        info!(
            out_trade_no = %notification.out_trade_no,
            trade_no = %notification.trade_no,
            trade_status = %notification.trade_status,
            "Verified alipay callback"
        );
        Ok(notification)
    }

    async fn query_status(&self, out_trade_no: &str) -> Result<OrderStatus> {
        let trade = self.query_trade(out_trade_no).await?;
        let status = OrderStatus::from_trade_status(trade.trade_status.as_deref().unwrap_or_default())?;

        debug!(out_trade_no = %out_trade_no, status = %status, "Alipay trade status");
        Ok(status)
    }
}

/// Registry constructor for [`CHANNEL_NAME`]
pub fn alipay_constructor(config: &ChannelConfig) -> Result<Arc<dyn PaymentChannel>> {
    let client = AlipayClient::from_channel_config(config)?;
    Ok(Arc::new(client))
}

fn build_http_client(timeout: Duration, max_retries: u32) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::configuration(format!("failed to build HTTP client: {}", e)))?;

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries.min(MAX_RETRIES));

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}
