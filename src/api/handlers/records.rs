// src/api/handlers/records.rs
use actix_web::{
    web::{self, Data, Json, Path},
    HttpResponse, Scope,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{error, info, warn};

use crate::{
    api::types::{CalculateInssRequest, DocumentUpload, InsuranceRequestBody},
    core::{
        records::{inss::parse_brl, DocumentType, InssContribution, ReapDraft},
        services::RecordsService,
    },
    utils::error::AppError,
};

pub fn scope() -> Scope {
    web::scope("/records")
        .service(
            web::resource("/reap")
                .route(web::get().to(list_reaps))
                .route(web::post().to(save_reap)),
        )
        .service(
            web::resource("/reap/{id}")
                .route(web::get().to(get_reap))
                .route(web::delete().to(delete_reap)),
        )
        .service(web::resource("/inss/calculate").route(web::post().to(calculate_contribution)))
        .service(
            web::resource("/inss")
                .route(web::get().to(list_contributions))
                .route(web::post().to(save_contribution)),
        )
        .service(web::resource("/inss/{id}").route(web::delete().to(delete_contribution)))
        .service(web::resource("/inss/{id}/paid").route(web::post().to(mark_paid)))
        .service(web::resource("/documents").route(web::get().to(list_documents)))
        .service(
            web::resource("/documents/{type}")
                .route(web::get().to(get_document))
                .route(web::put().to(save_document))
                .route(web::delete().to(delete_document)),
        )
        .service(
            web::resource("/insurance")
                .route(web::get().to(list_insurance_requests))
                .route(web::post().to(submit_insurance_request)),
        )
}

fn log_failure(action: &'static str) -> impl Fn(AppError) -> AppError {
    move |e| {
        match &e {
            AppError::Storage(_) | AppError::Config(_) => error!("{} failed: {}", action, e),
            _ => warn!("{} failed: {}", action, e),
        }
        e
    }
}

fn document_type(raw: &str) -> Result<DocumentType, AppError> {
    raw.parse().map_err(AppError::Validation)
}

async fn list_reaps(service: Data<RecordsService>) -> Result<HttpResponse, actix_web::Error> {
    let reports = service.list_reaps().await.map_err(log_failure("Listing REAP reports"))?;
    Ok(HttpResponse::Ok().json(reports))
}

async fn save_reap(
    service: Data<RecordsService>,
    draft: Json<ReapDraft>,
) -> Result<HttpResponse, actix_web::Error> {
    let report = service
        .save_reap(draft.into_inner())
        .await
        .map_err(log_failure("Saving REAP report"))?;
    Ok(HttpResponse::Ok().json(report))
}

async fn get_reap(
    service: Data<RecordsService>,
    id: Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    let report = service.get_reap(&id).await?;
    Ok(HttpResponse::Ok().json(report))
}

async fn delete_reap(
    service: Data<RecordsService>,
    id: Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    service
        .delete_reap(&id)
        .await
        .map_err(log_failure("Deleting REAP report"))?;
    Ok(HttpResponse::NoContent().finish())
}

async fn calculate_contribution(
    service: Data<RecordsService>,
    request: Json<CalculateInssRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    let income = parse_brl(&request.income)
        .ok_or_else(|| AppError::Validation("Por favor, informe uma renda válida.".into()))?;

    let contribution = service.calculate_contribution(&request.month, income)?;
    Ok(HttpResponse::Ok().json(contribution))
}

async fn list_contributions(service: Data<RecordsService>) -> Result<HttpResponse, actix_web::Error> {
    let contributions = service
        .list_contributions()
        .await
        .map_err(log_failure("Listing INSS contributions"))?;
    Ok(HttpResponse::Ok().json(contributions))
}

async fn save_contribution(
    service: Data<RecordsService>,
    contribution: Json<InssContribution>,
) -> Result<HttpResponse, actix_web::Error> {
    service
        .save_contribution(&contribution)
        .await
        .map_err(log_failure("Saving INSS contribution"))?;
    Ok(HttpResponse::Created().json(contribution.into_inner()))
}

async fn delete_contribution(
    service: Data<RecordsService>,
    id: Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    service
        .delete_contribution(&id)
        .await
        .map_err(log_failure("Deleting INSS contribution"))?;
    Ok(HttpResponse::NoContent().finish())
}

async fn mark_paid(
    service: Data<RecordsService>,
    id: Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    let contribution = service
        .mark_paid(&id)
        .await
        .map_err(log_failure("Marking INSS contribution as paid"))?;
    Ok(HttpResponse::Ok().json(contribution))
}

async fn list_documents(service: Data<RecordsService>) -> Result<HttpResponse, actix_web::Error> {
    let documents = service
        .list_documents()
        .await
        .map_err(log_failure("Listing documents"))?;
    Ok(HttpResponse::Ok().json(documents))
}

async fn get_document(
    service: Data<RecordsService>,
    doc_type: Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    let doc_type = document_type(&doc_type)?;
    let record = service
        .get_document(doc_type)
        .await
        .map_err(log_failure("Loading document"))?
        .ok_or_else(|| AppError::NotFound(format!("document {}", doc_type)))?;

    Ok(HttpResponse::Ok().json(record))
}

async fn save_document(
    service: Data<RecordsService>,
    doc_type: Path<String>,
    upload: Json<DocumentUpload>,
) -> Result<HttpResponse, actix_web::Error> {
    let doc_type = document_type(&doc_type)?;
    let bytes = STANDARD.decode(upload.content.trim()).map_err(|e| {
        warn!("Rejected document upload: {}", e);
        AppError::Validation("Não foi possível ler a foto do documento.".into())
    })?;

    let summary = service
        .save_document(doc_type, &upload.content_type, bytes)
        .await
        .map_err(log_failure("Saving document"))?;

    info!(doc_type = %doc_type, "Document uploaded");
    Ok(HttpResponse::Ok().json(summary))
}

async fn delete_document(
    service: Data<RecordsService>,
    doc_type: Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    let doc_type = document_type(&doc_type)?;
    service
        .delete_document(doc_type)
        .await
        .map_err(log_failure("Deleting document"))?;
    Ok(HttpResponse::NoContent().finish())
}

async fn submit_insurance_request(
    service: Data<RecordsService>,
    body: Json<InsuranceRequestBody>,
) -> Result<HttpResponse, actix_web::Error> {
    let request = service
        .submit_insurance_request(&body.cpf, body.fishing_type)
        .await
        .map_err(log_failure("Submitting insurance request"))?;
    Ok(HttpResponse::Created().json(request))
}

async fn list_insurance_requests(
    service: Data<RecordsService>,
) -> Result<HttpResponse, actix_web::Error> {
    let requests = service
        .list_insurance_requests()
        .await
        .map_err(log_failure("Listing insurance requests"))?;
    Ok(HttpResponse::Ok().json(requests))
}
