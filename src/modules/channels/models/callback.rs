use super::order_status::OrderStatus;
use crate::core::timestamp::parse_vendor_timestamp;
use crate::core::{AppError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Raw form fields of an asynchronous notification
pub type CallbackParams = HashMap<String, String>;

/// Notification fields, available only after the signature checked out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackNotification {
    /// Vendor trade number
    pub trade_no: String,
    /// Merchant order number of the original charge
    pub out_trade_no: String,
    pub trade_status: String,
    pub total_amount: Option<String>,
    pub app_id: Option<String>,
    pub notify_id: Option<String>,
    pub notify_time: Option<String>,
    pub notify_type: Option<String>,
    pub out_biz_no: Option<String>,
    /// Every signed field, for auditing
    pub raw: BTreeMap<String, String>,
}

impl CallbackNotification {
    /// Build from verified fields (`sign` and `sign_type` already removed).
    pub(crate) fn from_verified(fields: CallbackParams) -> Result<Self> {
        let raw: BTreeMap<String, String> = fields.into_iter().collect();

        let required = |key: &str| -> Result<String> {
            raw.get(key)
                .filter(|v| !v.is_empty())
                .cloned()
                .ok_or_else(|| AppError::validation(format!("callback is missing '{}'", key)))
        };
        let optional = |key: &str| raw.get(key).filter(|v| !v.is_empty()).cloned();

        Ok(Self {
            trade_no: required("trade_no")?,
            out_trade_no: required("out_trade_no")?,
            trade_status: required("trade_status")?,
            total_amount: optional("total_amount"),
            app_id: optional("app_id"),
            notify_id: optional("notify_id"),
            notify_time: optional("notify_time"),
            notify_type: optional("notify_type"),
            out_biz_no: optional("out_biz_no"),
            raw,
        })
    }

    /// Local status for the reported trade status
    pub fn status(&self) -> Result<OrderStatus> {
        OrderStatus::from_trade_status(&self.trade_status)
    }

    pub fn notified_at(&self) -> Option<NaiveDateTime> {
        self.notify_time
            .as_deref()
            .and_then(|t| parse_vendor_timestamp(t).ok())
    }
}
