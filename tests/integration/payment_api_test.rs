// HTTP surface of the payment service
//
// Routes run against a real AlipayClient whose gateway is a wiremock server.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{http::StatusCode, test, web, App};
use alipay_gateway::channels::PaymentChannel;
use helpers::*;
use serde_json::{json, Value};
use std::sync::Arc;

fn channel_data(gateway_url: &str) -> web::Data<dyn PaymentChannel> {
    let channel: Arc<dyn PaymentChannel> = Arc::new(test_client(gateway_url));
    web::Data::from(channel)
}

macro_rules! init_app {
    ($gateway_url:expr) => {
        test::init_service(
            App::new()
                .app_data(channel_data($gateway_url))
                .configure(alipay_gateway::configure_app),
        )
        .await
    };
}

#[actix_web::test]
async fn test_create_charge_returns_signed_parameters() {
    let app = init_app!("http://127.0.0.1:1/gateway.do");

    let req = test::TestRequest::post()
        .uri("/api/charges")
        .set_json(json!({
            "out_trade_no": "ORDER123",
            "total_amount": "10.00",
            "subject": "Test Item"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["parameters"]["method"], "alipay.trade.app.pay");
    assert_eq!(body["parameters"]["app_id"], TEST_APP_ID);
    assert!(body["parameters"]["sign"].as_str().is_some_and(|s| !s.is_empty()));

    let order_string = body["order_string"].as_str().unwrap();
    assert!(order_string.contains("sign="));
    assert!(order_string.contains("method=alipay.trade.app.pay"));
}

#[actix_web::test]
async fn test_create_charge_rejects_bad_amount() {
    let app = init_app!("http://127.0.0.1:1/gateway.do");

    let req = test::TestRequest::post()
        .uri("/api/charges")
        .set_json(json!({
            "out_trade_no": "ORDER123",
            "total_amount": "10.001",
            "subject": "Test Item"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], 400);
}

#[actix_web::test]
async fn test_create_charge_rejects_malformed_json() {
    let app = init_app!("http://127.0.0.1:1/gateway.do");

    let req = test::TestRequest::post()
        .uri("/api/charges")
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"out_trade_no": "ORDER123""#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_notify_acknowledges_genuine_callback() {
    let app = init_app!("http://127.0.0.1:1/gateway.do");

    let req = test::TestRequest::post()
        .uri("/api/notify")
        .set_form(vendor_callback("ORDER123", "TRADE_SUCCESS"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"success");
}

#[actix_web::test]
async fn test_notify_rejects_tampered_callback() {
    let app = init_app!("http://127.0.0.1:1/gateway.do");

    let mut params = vendor_callback("ORDER123", "WAIT_BUYER_PAY");
    params.insert("trade_status".to_string(), "TRADE_SUCCESS".to_string());

    let req = test::TestRequest::post()
        .uri("/api/notify")
        .set_form(params)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"failure");
}

#[actix_web::test]
async fn test_order_status_polls_vendor() {
    let sandbox = VendorSandbox::start().await;
    sandbox
        .mock_trade_query(query_success("ORDER123", "TRADE_SUCCESS"))
        .await;
    let app = init_app!(&sandbox.gateway_url());

    let req = test::TestRequest::get()
        .uri("/api/orders/ORDER123/status")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["out_trade_no"], "ORDER123");
    assert_eq!(body["status"], "success");
}

#[actix_web::test]
async fn test_order_status_pending_trade_is_init() {
    let sandbox = VendorSandbox::start().await;
    sandbox
        .mock_trade_query(query_success("ORDER123", "WAIT_BUYER_PAY"))
        .await;
    let app = init_app!(&sandbox.gateway_url());

    let req = test::TestRequest::get()
        .uri("/api/orders/ORDER123/status")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "init");
}

#[actix_web::test]
async fn test_order_status_remote_error_is_bad_gateway() {
    let sandbox = VendorSandbox::start().await;
    sandbox
        .mock_trade_query(query_error("40004", "Business Failed", "trade not exist"))
        .await;
    let app = init_app!(&sandbox.gateway_url());

    let req = test::TestRequest::get()
        .uri("/api/orders/ORDER404/status")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], 502);
}

#[actix_web::test]
async fn test_health_and_readiness() {
    let app = init_app!("http://127.0.0.1:1/gateway.do");

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["channel"], "ali");

    let req = test::TestRequest::get().uri("/ready").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["ready"], true);
    assert_eq!(body["channel"], "ali");
}
