use super::super::models::{
    CallbackNotification, CallbackParams, ChargeRequest, OrderStatus, SignedParameters,
};
use crate::core::Result;
use async_trait::async_trait;

/// A payment channel: builds signed charges, checks notifications, polls status
#[async_trait]
pub trait PaymentChannel: Send + Sync {
    /// Registry name of the channel
    fn name(&self) -> &str;

    /// Signed parameter set the mobile SDK needs to start payment
    fn app_charge(&self, request: &ChargeRequest) -> Result<SignedParameters>;

    /// Verify an asynchronous notification and extract its trade fields
    fn verify_callback(&self, params: CallbackParams) -> Result<CallbackNotification>;

    /// Ask the vendor for the current status of an order
    async fn query_status(&self, out_trade_no: &str) -> Result<OrderStatus>;
}
