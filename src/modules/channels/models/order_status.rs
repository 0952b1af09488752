use crate::core::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Local payment state of an order as reported by the channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Created, buyer has not paid yet
    Init,
    /// Paid (or paid and no longer refundable)
    Success,
    /// Closed without payment, or fully refunded
    Failed,
}

/// Vendor trade status strings
pub mod trade_status {
    pub const WAIT_BUYER_PAY: &str = "WAIT_BUYER_PAY";
    pub const TRADE_CLOSED: &str = "TRADE_CLOSED";
    pub const TRADE_SUCCESS: &str = "TRADE_SUCCESS";
    pub const TRADE_FINISHED: &str = "TRADE_FINISHED";
}

impl OrderStatus {
    /// Map a vendor trade status. Unmapped values are an error, never a default.
    pub fn from_trade_status(value: &str) -> Result<Self> {
        match value {
            trade_status::WAIT_BUYER_PAY => Ok(OrderStatus::Init),
            trade_status::TRADE_CLOSED => Ok(OrderStatus::Failed),
            trade_status::TRADE_SUCCESS | trade_status::TRADE_FINISHED => Ok(OrderStatus::Success),
            other => Err(AppError::UnknownStatus(other.to_string())),
        }
    }

    pub fn is_final(&self) -> bool {
        !matches!(self, OrderStatus::Init)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Init => write!(f, "init"),
            OrderStatus::Success => write!(f, "success"),
            OrderStatus::Failed => write!(f, "failed"),
        }
    }
}
