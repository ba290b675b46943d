use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::{ApiResponse, AppError};
use crate::modules::fees::models::{CreateFeeRequest, EditFeeFields, FeeFilters, FeeStatus};
use crate::modules::fees::services::FeeService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkEditRequest {
    pub ids: Vec<i64>,
    pub fields: EditFeeFields,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkStatusRequest {
    pub ids: Vec<i64>,
    pub status: FeeStatus,
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<i64>,
}

/// POST /api/fees
pub async fn create_fee(
    service: web::Data<Arc<FeeService>>,
    request: web::Json<CreateFeeRequest>,
) -> Result<HttpResponse, AppError> {
    let outcome = service.create(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(outcome)))
}

/// GET /api/fees
pub async fn list_fees(
    service: web::Data<Arc<FeeService>>,
    query: web::Query<FeeFilters>,
) -> Result<HttpResponse, AppError> {
    let page = service.list(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(page.items, page.pagination)))
}

/// GET /api/fees/open — the pendências view
pub async fn list_open_fees(
    service: web::Data<Arc<FeeService>>,
    query: web::Query<FeeFilters>,
) -> Result<HttpResponse, AppError> {
    let page = service.list_open(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(page.items, page.pagination)))
}

/// GET /api/fees/{id}
pub async fn get_fee(
    service: web::Data<Arc<FeeService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let record = service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(record)))
}

/// PUT /api/fees/{id}
pub async fn edit_fee(
    service: web::Data<Arc<FeeService>>,
    path: web::Path<i64>,
    request: web::Json<EditFeeFields>,
) -> Result<HttpResponse, AppError> {
    let record = service.edit(path.into_inner(), request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(record)))
}

/// POST /api/fees/bulk-edit
pub async fn bulk_edit(
    service: web::Data<Arc<FeeService>>,
    request: web::Json<BulkEditRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let outcome = service.bulk_edit(&request.ids, request.fields).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(outcome)))
}

/// POST /api/fees/bulk-status
pub async fn bulk_update_status(
    service: web::Data<Arc<FeeService>>,
    request: web::Json<BulkStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let outcome = service
        .bulk_update_status(&request.ids, request.status)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(outcome)))
}

/// POST /api/fees/bulk-delete
pub async fn bulk_delete(
    service: web::Data<Arc<FeeService>>,
    request: web::Json<BulkDeleteRequest>,
) -> Result<HttpResponse, AppError> {
    let outcome = service.bulk_delete(&request.ids).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(outcome)))
}

/// Configure fee routes. Literal paths are registered before `{id}` so
/// `/fees/open` does not get captured as an id.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/fees")
            .route("", web::post().to(create_fee))
            .route("", web::get().to(list_fees))
            .route("/open", web::get().to(list_open_fees))
            .route("/bulk-edit", web::post().to(bulk_edit))
            .route("/bulk-status", web::post().to(bulk_update_status))
            .route("/bulk-delete", web::post().to(bulk_delete))
            .route("/{id}", web::get().to(get_fee))
            .route("/{id}", web::put().to(edit_fee)),
    );
}
