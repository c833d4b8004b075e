// src/api/handlers/identity.rs
use actix_web::{
    web::{self, Data, Json, Path},
    HttpResponse, Scope,
};
use tracing::{error, info, warn};

use crate::{
    api::types::{
        DefesoPayload, EnrollFaceRequest, LoginResponse, ProfileView, RegisterRequest,
        SetPinRequest,
    },
    core::{
        identity::{LoginAttempt, ProfileUpdate},
        services::{DefesoService, IdentityService},
    },
    utils::error::AppError,
};

pub fn scope() -> Scope {
    web::scope("/identity")
        .service(web::resource("").route(web::post().to(register)))
        .service(web::resource("/current").route(web::get().to(current_profile)))
        .service(
            web::resource("/{cpf}")
                .route(web::get().to(get_profile))
                .route(web::put().to(update_profile))
                .route(web::delete().to(delete_profile)),
        )
        .service(web::resource("/{cpf}/login").route(web::post().to(login)))
        .service(web::resource("/{cpf}/face").route(web::post().to(enroll_face)))
        .service(web::resource("/{cpf}/pin").route(web::post().to(set_pin)))
        .service(web::resource("/{cpf}/defeso").route(web::get().to(defeso_for_profile)))
}

fn not_found(cpf: &str) -> AppError {
    AppError::NotFound(format!("profile {}", cpf))
}

async fn register(
    service: Data<IdentityService>,
    request: Json<RegisterRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    info!("Received registration request");
    let RegisterRequest { form, security } = request.into_inner();

    let profile = service.register(form, security).await.map_err(|e| {
        warn!("Registration failed: {}", e);
        e
    })?;

    Ok(HttpResponse::Created().json(ProfileView::from(&profile)))
}

async fn current_profile(service: Data<IdentityService>) -> Result<HttpResponse, actix_web::Error> {
    let profile = service
        .current_profile()
        .await
        .map_err(|e| {
            error!("Failed to load current profile: {}", e);
            e
        })?
        .ok_or_else(|| AppError::NotFound("current profile".into()))?;

    Ok(HttpResponse::Ok().json(ProfileView::from(&profile)))
}

async fn get_profile(
    service: Data<IdentityService>,
    cpf: Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    let profile = service
        .get_profile(&cpf)
        .await
        .map_err(|e| {
            error!("Failed to retrieve profile: {}", e);
            e
        })?
        .ok_or_else(|| not_found(&cpf))?;

    Ok(HttpResponse::Ok().json(ProfileView::from(&profile)))
}

async fn update_profile(
    service: Data<IdentityService>,
    cpf: Path<String>,
    request: Json<ProfileUpdate>,
) -> Result<HttpResponse, actix_web::Error> {
    let profile = service
        .update_profile(&cpf, request.into_inner())
        .await
        .map_err(|e| {
            warn!("Profile update failed: {}", e);
            e
        })?;

    Ok(HttpResponse::Ok().json(ProfileView::from(&profile)))
}

async fn delete_profile(
    service: Data<IdentityService>,
    cpf: Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    service.delete_profile(&cpf).await.map_err(|e| {
        warn!("Profile deletion failed: {}", e);
        e
    })?;

    Ok(HttpResponse::NoContent().finish())
}

async fn login(
    service: Data<IdentityService>,
    cpf: Path<String>,
    request: Json<LoginAttempt>,
) -> Result<HttpResponse, actix_web::Error> {
    let outcome = service
        .login(&cpf, request.into_inner())
        .await
        .map_err(|e| {
            warn!("Login failed: {}", e);
            e
        })?;

    Ok(HttpResponse::Ok().json(LoginResponse::from(&outcome)))
}

async fn enroll_face(
    service: Data<IdentityService>,
    cpf: Path<String>,
    request: Json<EnrollFaceRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    let EnrollFaceRequest { descriptor, photo } = request.into_inner();

    let profile = service
        .enroll_face(&cpf, descriptor, photo)
        .await
        .map_err(|e| {
            warn!("Face enrollment failed: {}", e);
            e
        })?;

    Ok(HttpResponse::Ok().json(ProfileView::from(&profile)))
}

async fn set_pin(
    service: Data<IdentityService>,
    cpf: Path<String>,
    request: Json<SetPinRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    let profile = service
        .set_pin(&cpf, &request.pin, &request.confirmation)
        .await
        .map_err(|e| {
            warn!("PIN setup failed: {}", e);
            e
        })?;

    Ok(HttpResponse::Ok().json(ProfileView::from(&profile)))
}

async fn defeso_for_profile(
    identity: Data<IdentityService>,
    defeso: Data<DefesoService>,
    cpf: Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    let profile = identity
        .get_profile(&cpf)
        .await?
        .ok_or_else(|| not_found(&cpf))?;

    let response = defeso.window_for_profile(&profile).map_err(|e| {
        error!("Defeso calculation failed: {}", e);
        e
    })?;

    Ok(HttpResponse::Ok().json(DefesoPayload::from(response)))
}
