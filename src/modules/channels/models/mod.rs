pub mod callback;
pub mod channel_config;
pub mod charge;
pub mod order_status;
pub mod trade_query;

pub use callback::{CallbackNotification, CallbackParams};
pub use channel_config::ChannelConfig;
pub use charge::{ChargeRequest, SignedParameters};
pub use order_status::OrderStatus;
pub use trade_query::{TradeQueryEnvelope, TradeQueryResponse};
