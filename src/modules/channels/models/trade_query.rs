use serde::{Deserialize, Serialize};

/// Business code the vendor uses for success
pub const SUCCESS_CODE: &str = "10000";

/// Top level body of an `alipay.trade.query` reply
#[derive(Debug, Clone, Deserialize)]
pub struct TradeQueryEnvelope {
    #[serde(rename = "alipay_trade_query_response")]
    pub response: TradeQueryResponse,

    /// Vendor signature over the response object
    #[serde(default)]
    pub sign: Option<String>,
}

/// `alipay_trade_query_response` object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeQueryResponse {
    pub code: String,
    pub msg: String,
    pub sub_code: Option<String>,
    /// Error detail when `code` is not `10000`
    pub sub_msg: Option<String>,
    pub trade_no: Option<String>,
    pub out_trade_no: Option<String>,
    pub buyer_logon_id: Option<String>,
    pub trade_status: Option<String>,
    pub total_amount: Option<String>,
    pub pay_currency: Option<String>,
    pub pay_amount: Option<String>,
    /// `YYYY-MM-DD HH:MM:SS`
    pub send_pay_date: Option<String>,
}

impl TradeQueryResponse {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}
