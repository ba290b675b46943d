use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::{ApiResponse, AppError};
use crate::modules::notifications::models::SendNotificationsRequest;
use crate::modules::notifications::services::NotificationService;

/// POST /api/notifications/fees
pub async fn send_bulk_notifications(
    service: web::Data<Arc<NotificationService>>,
    request: web::Json<SendNotificationsRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let report = service
        .send_bulk(&request.ids, request.custom_message)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(report)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notifications")
            .route("/fees", web::post().to(send_bulk_notifications)),
    );
}
