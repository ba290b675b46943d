use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::{ApiResponse, AppError};
use crate::modules::payments::models::RecordPaymentRequest;
use crate::modules::payments::services::PaymentService;

/// POST /api/fees/{id}/payments
pub async fn record_payment(
    service: web::Data<Arc<PaymentService>>,
    path: web::Path<i64>,
    request: web::Json<RecordPaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let event = service
        .record(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(event)))
}

/// GET /api/fees/{id}/payments
pub async fn list_payments(
    service: web::Data<Arc<PaymentService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let events = service.list_for_fee(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(events)))
}

/// Configure payment routes. Registered as full-path resources (not a
/// nested scope) and configured before the fee scope so the `/fees` prefix
/// does not swallow them.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/fees/{id}/payments", web::post().to(record_payment))
        .route("/fees/{id}/payments", web::get().to(list_payments));
}
