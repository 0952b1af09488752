use crate::modules::channels::PaymentChannel;
use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

/// Health check response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub channel: Option<String>,
    pub timestamp: String,
}

/// Readiness probe response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    /// Name of the configured payment channel, if any
    pub channel: Option<String>,
}

/// GET /health - Liveness probe
pub async fn health_check(channel: Option<web::Data<dyn PaymentChannel>>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        channel: channel.map(|c| c.name().to_string()),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// GET /ready - Readiness probe
/// Ready once a payment channel client has been installed
pub async fn readiness_check(channel: Option<web::Data<dyn PaymentChannel>>) -> impl Responder {
    let response = ReadinessResponse {
        ready: channel.is_some(),
        channel: channel.map(|c| c.name().to_string()),
    };

    if response.ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// Configure health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/ready", web::get().to(readiness_check));
}
