//! Alipay app-payment gateway integration
//!
//! Builds signed `alipay.trade.app.pay` parameters, verifies asynchronous payment
//! notifications and polls trade status, plus the actix-web routes exposing them.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

use actix_web::web;

// Re-export commonly used types
pub use crate::core::{AppError, Result};
pub use modules::channels;

/// Register every route and extractor config of the service
///
/// The caller installs the channel client as `web::Data<dyn PaymentChannel>`.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.configure(middleware::error_handler::configure)
        .configure(modules::health::configure)
        .configure(modules::payments::configure);
}
