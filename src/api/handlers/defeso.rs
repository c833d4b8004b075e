// src/api/handlers/defeso.rs
use actix_web::{
    web::{self, Data, Path},
    HttpResponse, Scope,
};
use tracing::error;

use crate::{
    api::types::{DefesoPayload, RegionsResponse},
    core::services::DefesoService,
};

pub fn scope() -> Scope {
    web::scope("/defeso")
        .service(web::resource("/regions").route(web::get().to(list_regions)))
        .service(web::resource("/{region}").route(web::get().to(window_for_region)))
}

async fn list_regions(service: Data<DefesoService>) -> HttpResponse {
    HttpResponse::Ok().json(RegionsResponse {
        regions: service.regions(),
    })
}

async fn window_for_region(
    service: Data<DefesoService>,
    region: Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    let response = service.window_for_region(&region).map_err(|e| {
        error!("Defeso calculation failed for {}: {}", region, e);
        e
    })?;

    Ok(HttpResponse::Ok().json(DefesoPayload::from(response)))
}
