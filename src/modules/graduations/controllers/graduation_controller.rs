use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::{ApiResponse, AppError};
use crate::modules::graduations::services::EligibilityService;

/// GET /api/students/{id}/eligibility
pub async fn get_eligibility(
    service: web::Data<Arc<EligibilityService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let report = service.compute_eligibility(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(report)))
}

/// GET /api/students/{id}/projection
pub async fn get_projection(
    service: web::Data<Arc<EligibilityService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let report = service.project_eligibility_date(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(report)))
}

/// GET /api/students/{id}/timeline
pub async fn get_timeline(
    service: web::Data<Arc<EligibilityService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let timeline = service.belt_timeline(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(timeline)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/students/{id}")
            .route("/eligibility", web::get().to(get_eligibility))
            .route("/projection", web::get().to(get_projection))
            .route("/timeline", web::get().to(get_timeline)),
    );
}
