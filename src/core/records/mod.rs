// src/core/records/mod.rs
pub mod inss;
mod types;

pub use types::{
    ContributionStatus, DocumentRecord, DocumentSummary, DocumentType, FishingMode, FishingType,
    InssContribution, InsuranceRequest, ReapDraft, ReapReport, ReapStatus, RequestStatus,
    WaterType,
};
