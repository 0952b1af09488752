use crate::core::AppError;
use crate::modules::payments::controllers::payment_controller::NOTIFY_NACK;
use actix_web::{
    error::{InternalError, JsonPayloadError, UrlencodedError},
    web, Error, HttpRequest, HttpResponse,
};

/// Body extractor configuration with consistent error responses
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::FormConfig::default().error_handler(form_error_handler));
}

/// Malformed JSON bodies become the usual JSON validation error
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    tracing::warn!(path = %req.path(), error = %err, "Rejected JSON body");
    AppError::validation(format!("invalid JSON body: {}", err)).into()
}

/// Unparseable notifications get the same plain `failure` answer as forged ones
pub fn form_error_handler(err: UrlencodedError, req: &HttpRequest) -> Error {
    tracing::warn!(path = %req.path(), error = %err, "Rejected form body");
    InternalError::from_response(
        err,
        HttpResponse::BadRequest()
            .content_type("text/plain")
            .body(NOTIFY_NACK),
    )
    .into()
}
