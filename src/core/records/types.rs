// src/core/records/types.rs
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::defeso::DefesoWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterType {
    Mar,
    Rio,
    Lago,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FishingMode {
    Embarcado,
    Terra,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReapStatus {
    Pending,
    #[default]
    Analysis,
    Approved,
}

/// Activity report (REAP) filed for one fishing period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReapReport {
    pub id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(rename = "type")]
    pub water_type: WaterType,
    pub mode: FishingMode,
    /// Free text, as typed ("200 kg").
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub status: ReapStatus,
    #[serde(default)]
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Report as submitted by the form; `id` is present when editing.
#[derive(Debug, Clone, Deserialize)]
pub struct ReapDraft {
    #[serde(default)]
    pub id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub water_type: Option<WaterType>,
    pub mode: Option<FishingMode>,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub status: Option<ReapStatus>,
    #[serde(default)]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionStatus {
    Generated,
    Paid,
}

/// Monthly INSS payment slip. Money is in centavos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InssContribution {
    pub id: String,
    /// Reference month, `YYYY-MM`.
    pub month: String,
    pub year: i32,
    pub income_cents: i64,
    pub contribution_cents: i64,
    pub status: ContributionStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Rgp,
    Cpf,
    Address,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [DocumentType::Rgp, DocumentType::Cpf, DocumentType::Address];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Rgp => "rgp",
            DocumentType::Cpf => "cpf",
            DocumentType::Address => "address",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Tipo de documento desconhecido: {}", s))
    }
}

/// Photo of a document in the wallet. One per type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub content_type: String,
    #[serde(with = "base64_bytes")]
    pub bytes: Vec<u8>,
    pub timestamp: DateTime<Utc>,
}

/// Listing entry without the payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSummary {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub content_type: String,
    pub size: usize,
    pub timestamp: DateTime<Utc>,
}

impl From<&DocumentRecord> for DocumentSummary {
    fn from(record: &DocumentRecord) -> Self {
        Self {
            doc_type: record.doc_type,
            content_type: record.content_type.clone(),
            size: record.bytes.len(),
            timestamp: record.timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FishingType {
    Artesanal,
    Industrial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Submitted,
}

/// Closed-season insurance request with the window it was filed against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceRequest {
    pub id: Uuid,
    pub cpf: String,
    pub fishing_type: FishingType,
    pub defeso: DefesoWindow,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// Document payloads travel and rest as base64 text.
pub(crate) mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD.decode(text).map_err(serde::de::Error::custom)
    }
}
