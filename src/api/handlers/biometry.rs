// src/api/handlers/biometry.rs
use actix_web::{
    web::{self, Data, Json},
    HttpResponse, Scope,
};
use tracing::{debug, warn};

use crate::{
    api::types::{CompareRequest, LivenessRequest, LivenessResponse},
    core::biometry::FaceBiometryAdapter,
    utils::error::AppError,
};

/// Stateless helpers for front ends that run the detector themselves and
/// only need the gate and the matcher.
pub fn scope() -> Scope {
    web::scope("/biometry")
        .service(web::resource("/liveness").route(web::post().to(check_liveness)))
        .service(web::resource("/compare").route(web::post().to(compare)))
}

async fn check_liveness(
    adapter: Data<FaceBiometryAdapter>,
    request: Json<LivenessRequest>,
) -> HttpResponse {
    let verdict = adapter.check_liveness(
        request.detection.as_ref(),
        request.frame_width,
        request.frame_height,
    );
    debug!(valid = verdict.is_valid(), "Liveness checked");

    HttpResponse::Ok().json(LivenessResponse::from(verdict))
}

async fn compare(
    adapter: Data<FaceBiometryAdapter>,
    request: Json<CompareRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    let result = adapter.compare(&request.a, &request.b).map_err(|e| {
        warn!("Descriptor comparison failed: {}", e);
        AppError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(result))
}
