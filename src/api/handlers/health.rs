// src/api/handlers/health.rs
use actix_web::{web, HttpResponse, Scope};

use crate::core::services::HealthService;

pub fn scope() -> Scope {
    web::scope("/health").service(web::resource("").route(web::get().to(health)))
}

async fn health(service: web::Data<HealthService>) -> HttpResponse {
    HttpResponse::Ok().json(service.get_metrics())
}
