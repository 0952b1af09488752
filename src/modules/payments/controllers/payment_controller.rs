use crate::core::Result;
use crate::modules::channels::{CallbackParams, ChargeRequest, OrderStatus, PaymentChannel, SignedParameters};
use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Body the vendor expects back once a notification is accepted
pub const NOTIFY_ACK: &str = "success";
/// Body for a rejected notification; the vendor will redeliver
pub const NOTIFY_NACK: &str = "failure";

/// Register payment routes under `/api`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(create_charge)
            .service(receive_notify)
            .service(get_order_status),
    );
}

/// Charge creation request body
#[derive(Debug, Deserialize)]
pub struct CreateChargeRequest {
    pub out_trade_no: String,
    pub total_amount: String,
    pub subject: String,
    #[serde(default)]
    pub specified_channel: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateChargeResponse {
    pub parameters: SignedParameters,
    /// Encoded, signed string for the mobile SDK
    pub order_string: String,
}

#[derive(Debug, Serialize)]
pub struct OrderStatusResponse {
    pub out_trade_no: String,
    pub status: OrderStatus,
}

/// POST /api/charges
///
/// # Returns
/// * `201 Created` - signed parameters and order string
/// * `400 Bad Request` - invalid order number, amount or subject
#[post("/charges")]
async fn create_charge(
    channel: web::Data<dyn PaymentChannel>,
    body: web::Json<CreateChargeRequest>,
) -> Result<HttpResponse> {
    let body = body.into_inner();

    let mut request = ChargeRequest::new(body.out_trade_no, &body.total_amount, body.subject)?;
    if let Some(specified_channel) = body.specified_channel {
        request = request.with_specified_channel(specified_channel);
    }

    let parameters = channel.app_charge(&request)?;
    let order_string = parameters.to_order_string();

    Ok(HttpResponse::Created().json(CreateChargeResponse {
        parameters,
        order_string,
    }))
}

/// POST /api/notify
///
/// Asynchronous payment notification, form encoded. A notification that fails
/// verification is answered with `failure` and otherwise ignored.
#[post("/notify")]
async fn receive_notify(
    channel: web::Data<dyn PaymentChannel>,
    form: web::Form<CallbackParams>,
) -> HttpResponse {
    match channel.verify_callback(form.into_inner()) {
        Ok(notification) => {
            info!(
                channel = channel.name(),
                out_trade_no = %notification.out_trade_no,
                trade_status = %notification.trade_status,
                "Payment notification accepted"
            );
            HttpResponse::Ok().content_type("text/plain").body(NOTIFY_ACK)
        }
        Err(err) => {
            if err.is_rejection() {
                warn!(channel = channel.name(), error = %err, "Payment notification rejected");
            } else {
                error!(channel = channel.name(), error = %err, "Payment notification could not be processed");
            }
            HttpResponse::BadRequest()
                .content_type("text/plain")
                .body(NOTIFY_NACK)
        }
    }
}

/// GET /api/orders/{out_trade_no}/status
///
/// # Returns
/// * `200 OK` - current local status
/// * `502 Bad Gateway` - vendor error, transport failure or unmapped trade status
#[get("/orders/{out_trade_no}/status")]
async fn get_order_status(
    channel: web::Data<dyn PaymentChannel>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let out_trade_no = path.into_inner();
    let status = channel.query_status(&out_trade_no).await?;

    Ok(HttpResponse::Ok().json(OrderStatusResponse {
        out_trade_no,
        status,
    }))
}
