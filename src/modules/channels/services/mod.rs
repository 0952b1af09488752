pub mod alipay;
pub mod channel_trait;
pub mod registry;

pub use alipay::{AlipayClient, AlipayExtra, AlipaySettings, SignType};
pub use channel_trait::PaymentChannel;
pub use registry::{ChannelConstructor, ChannelRegistry};
