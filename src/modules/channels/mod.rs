pub mod models;
pub mod services;

pub use models::{
    CallbackNotification, CallbackParams, ChannelConfig, ChargeRequest, OrderStatus,
    SignedParameters, TradeQueryResponse,
};
pub use services::{
    AlipayClient, AlipaySettings, ChannelConstructor, ChannelRegistry, PaymentChannel, SignType,
};
