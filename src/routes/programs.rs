use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use crate::models::CatalogResponse;
use crate::routes::{error_response, matches::fetch_catalog, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/programs", web::get().to(list_programs));
}

/// Full catalog snapshot, the same one the matcher ranks
///
/// GET /api/v1/programs
async fn list_programs(state: web::Data<AppState>) -> impl Responder {
    match fetch_catalog(&state).await {
        Ok(programs) => HttpResponse::Ok().json(CatalogResponse {
            count: programs.len(),
            programs,
        }),
        Err(e) => {
            tracing::error!("Failed to load program catalog: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "catalog_unavailable", e.to_string())
        }
    }
}
