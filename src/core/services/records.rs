// src/core/services/records.rs
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::{defeso::DefesoService, identity::IdentityService};
use crate::{
    core::records::{
        inss::{contribution_for, parse_reference_month},
        ContributionStatus, DocumentRecord, DocumentSummary, DocumentType, FishingType,
        InssContribution, InsuranceRequest, ReapDraft, ReapReport, RequestStatus,
    },
    storage::encrypted::EncryptedStore,
    utils::error::{AppError, Result},
};

const REAP_PREFIX: &str = "reap:";
const INSS_PREFIX: &str = "inss:";
const DOCUMENT_PREFIX: &str = "document:";
const INSURANCE_PREFIX: &str = "insurance:";

fn new_record_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// The fisher's paperwork: activity reports, INSS slips, the document
/// wallet and insurance requests.
pub struct RecordsService {
    storage: Arc<EncryptedStore>,
    identity: Arc<IdentityService>,
    defeso: Arc<DefesoService>,
}

impl RecordsService {
    pub fn new(storage: Arc<EncryptedStore>, identity: Arc<IdentityService>, defeso: Arc<DefesoService>) -> Self {
        Self {
            storage,
            identity,
            defeso,
        }
    }

    // ---- REAP ----

    /// Creates a report, or replaces the one with the draft's `id`.
    pub async fn save_reap(&self, draft: ReapDraft) -> Result<ReapReport> {
        let (start_date, end_date, water_type, mode) =
            match (draft.start_date, draft.end_date, draft.water_type, draft.mode) {
                (Some(start), Some(end), Some(water), Some(mode)) => (start, end, water, mode),
                _ => {
                    return Err(AppError::Validation(
                        "Preencha todos os campos obrigatórios.".into(),
                    ))
                }
            };
        if end_date < start_date {
            return Err(AppError::Validation(
                "A data final não pode ser anterior à data inicial.".into(),
            ));
        }

        let existing = match &draft.id {
            Some(id) => self.storage.retrieve::<ReapReport>(&format!("{}{}", REAP_PREFIX, id)).await?,
            None => None,
        };

        let report = ReapReport {
            id: draft.id.unwrap_or_else(new_record_id),
            start_date,
            end_date,
            water_type,
            mode,
            quantity: draft.quantity.unwrap_or_default(),
            status: draft.status.unwrap_or_default(),
            photo: draft.photo,
            created_at: existing.map(|r| r.created_at).unwrap_or_else(Utc::now),
        };

        self.storage
            .store(&format!("{}{}", REAP_PREFIX, report.id), &report)
            .await?;
        info!(id = %report.id, "Saved REAP report");

        Ok(report)
    }

    /// Newest first.
    pub async fn list_reaps(&self) -> Result<Vec<ReapReport>> {
        let mut reports: Vec<ReapReport> = self
            .storage
            .list(REAP_PREFIX)
            .await?
            .into_iter()
            .map(|(_, report)| report)
            .collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reports)
    }

    pub async fn get_reap(&self, id: &str) -> Result<ReapReport> {
        self.storage
            .retrieve(&format!("{}{}", REAP_PREFIX, id))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("reap {}", id)))
    }

    pub async fn delete_reap(&self, id: &str) -> Result<()> {
        if !self.storage.delete(&format!("{}{}", REAP_PREFIX, id)).await? {
            return Err(AppError::NotFound(format!("reap {}", id)));
        }
        info!(id, "Deleted REAP report");
        Ok(())
    }

    // ---- INSS ----

    /// Builds an unsaved slip for `month` (`YYYY-MM`).
    pub fn calculate_contribution(&self, month: &str, income_cents: i64) -> Result<InssContribution> {
        let year = parse_reference_month(month)?;
        if income_cents <= 0 {
            return Err(AppError::Validation("Por favor, informe uma renda válida.".into()));
        }

        Ok(InssContribution {
            id: new_record_id(),
            month: month.trim().to_string(),
            year,
            income_cents,
            contribution_cents: contribution_for(income_cents)?,
            status: ContributionStatus::Generated,
            created_at: Utc::now(),
        })
    }

    pub async fn save_contribution(&self, contribution: &InssContribution) -> Result<()> {
        parse_reference_month(&contribution.month)?;
        self.storage
            .store(&format!("{}{}", INSS_PREFIX, contribution.id), contribution)
            .await?;
        info!(id = %contribution.id, month = %contribution.month, "Saved INSS contribution");
        Ok(())
    }

    /// Latest reference month first.
    pub async fn list_contributions(&self) -> Result<Vec<InssContribution>> {
        let mut contributions: Vec<InssContribution> = self
            .storage
            .list(INSS_PREFIX)
            .await?
            .into_iter()
            .map(|(_, c)| c)
            .collect();
        contributions.sort_by(|a, b| {
            b.month
                .cmp(&a.month)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(contributions)
    }

    pub async fn delete_contribution(&self, id: &str) -> Result<()> {
        if !self.storage.delete(&format!("{}{}", INSS_PREFIX, id)).await? {
            return Err(AppError::NotFound(format!("inss {}", id)));
        }
        Ok(())
    }

    pub async fn mark_paid(&self, id: &str) -> Result<InssContribution> {
        let key = format!("{}{}", INSS_PREFIX, id);
        let mut contribution: InssContribution = self
            .storage
            .retrieve(&key)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("inss {}", id)))?;

        contribution.status = ContributionStatus::Paid;
        self.storage.store(&key, &contribution).await?;
        info!(id, "INSS contribution marked as paid");

        Ok(contribution)
    }

    // ---- Documents ----

    /// Stores the photo for `doc_type`, replacing any previous one.
    pub async fn save_document(
        &self,
        doc_type: DocumentType,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<DocumentSummary> {
        if bytes.is_empty() {
            return Err(AppError::Validation("O arquivo do documento está vazio.".into()));
        }

        let record = DocumentRecord {
            doc_type,
            content_type: content_type.to_string(),
            bytes,
            timestamp: Utc::now(),
        };
        self.storage
            .store(&format!("{}{}", DOCUMENT_PREFIX, doc_type), &record)
            .await?;
        info!(doc_type = %doc_type, size = record.bytes.len(), "Saved document");

        Ok(DocumentSummary::from(&record))
    }

    pub async fn get_document(&self, doc_type: DocumentType) -> Result<Option<DocumentRecord>> {
        Ok(self
            .storage
            .retrieve(&format!("{}{}", DOCUMENT_PREFIX, doc_type))
            .await?)
    }

    pub async fn list_documents(&self) -> Result<Vec<DocumentSummary>> {
        Ok(self
            .storage
            .list::<DocumentRecord>(DOCUMENT_PREFIX)
            .await?
            .iter()
            .map(|(_, record)| DocumentSummary::from(record))
            .collect())
    }

    pub async fn delete_document(&self, doc_type: DocumentType) -> Result<()> {
        if !self
            .storage
            .delete(&format!("{}{}", DOCUMENT_PREFIX, doc_type))
            .await?
        {
            return Err(AppError::NotFound(format!("document {}", doc_type)));
        }
        Ok(())
    }

    // ---- Insurance ----

    /// Files a request against the profile's current defeso window. Needs a
    /// fishing type and the RGP and CPF photos in the wallet.
    pub async fn submit_insurance_request(
        &self,
        cpf: &str,
        fishing_type: Option<FishingType>,
    ) -> Result<InsuranceRequest> {
        let profile = self
            .identity
            .get_profile(cpf)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("profile {}", cpf)))?;

        let fishing_type = fishing_type.ok_or_else(|| {
            AppError::Validation("Por favor, selecione o tipo de pesca antes de continuar.".into())
        })?;

        for required in [DocumentType::Rgp, DocumentType::Cpf] {
            let key = format!("{}{}", DOCUMENT_PREFIX, required);
            if !self.storage.contains(&key).await? {
                warn!(missing = %required, "Insurance request missing document");
                return Err(AppError::Validation(
                    "Precisamos das fotos do seu RGP e CPF. Por favor, adicione as fotos.".into(),
                ));
            }
        }

        let defeso = self.defeso.window_for_profile(&profile)?.data;
        let request = InsuranceRequest {
            id: Uuid::new_v4(),
            cpf: profile.cpf,
            fishing_type,
            defeso,
            status: RequestStatus::Submitted,
            created_at: Utc::now(),
        };

        self.storage
            .store(&format!("{}{}", INSURANCE_PREFIX, request.id), &request)
            .await?;
        info!(id = %request.id, fishing_type = ?request.fishing_type, "Insurance request submitted");

        Ok(request)
    }

    pub async fn list_insurance_requests(&self) -> Result<Vec<InsuranceRequest>> {
        let mut requests: Vec<InsuranceRequest> = self
            .storage
            .list(INSURANCE_PREFIX)
            .await?
            .into_iter()
            .map(|(_, r)| r)
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }
}
