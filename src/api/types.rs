// src/api/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{
    biometry::{FaceDescriptor, FaceDetection, LivenessVerdict, MatchResult},
    defeso::format_br,
    identity::{FisherProfile, Region, RegistrationForm, SecurityMode, SecuritySetup},
    records::FishingType,
    services::{DefesoResponse, LoginOutcome},
};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(flatten)]
    pub form: RegistrationForm,
    pub security: SecuritySetup,
}

#[derive(Debug, Deserialize)]
pub struct EnrollFaceRequest {
    pub descriptor: FaceDescriptor,
    #[serde(default)]
    pub photo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetPinRequest {
    pub pin: String,
    pub confirmation: String,
}

/// Profile as exposed to the front end. Credential material stays inside.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub id: Uuid,
    pub name: String,
    pub cpf: String,
    pub rgp: String,
    pub region: Region,
    pub has_right: bool,
    pub security_mode: SecurityMode,
    pub face_enrolled: bool,
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&FisherProfile> for ProfileView {
    fn from(profile: &FisherProfile) -> Self {
        Self {
            id: profile.id,
            name: profile.name.clone(),
            cpf: profile.cpf.clone(),
            rgp: profile.rgp.clone(),
            region: profile.region,
            has_right: profile.has_right,
            security_mode: profile.security_mode(),
            face_enrolled: profile.security.descriptor().is_some(),
            photo: profile.photo.clone(),
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub profile: ProfileView,
    pub match_result: Option<MatchResult>,
}

impl From<&LoginOutcome> for LoginResponse {
    fn from(outcome: &LoginOutcome) -> Self {
        Self {
            profile: ProfileView::from(&outcome.profile),
            match_result: outcome.match_result,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DisplayDates {
    pub start: String,
    pub end: String,
}

/// Window plus its dates in `DD/MM/YYYY` for the calendar screen.
#[derive(Debug, Serialize)]
pub struct DefesoPayload {
    #[serde(flatten)]
    pub response: DefesoResponse,
    pub display: DisplayDates,
}

impl From<DefesoResponse> for DefesoPayload {
    fn from(response: DefesoResponse) -> Self {
        let display = DisplayDates {
            start: format_br(response.data.start_date),
            end: format_br(response.data.end_date),
        };
        Self { response, display }
    }
}

#[derive(Debug, Serialize)]
pub struct RegionsResponse {
    pub regions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct LivenessRequest {
    pub detection: Option<FaceDetection>,
    pub frame_width: u32,
    pub frame_height: u32,
}

#[derive(Debug, Serialize)]
pub struct LivenessResponse {
    #[serde(flatten)]
    pub verdict: LivenessVerdict,
    pub valid: bool,
    /// Hint to show over the camera preview.
    pub message: Option<&'static str>,
}

impl From<LivenessVerdict> for LivenessResponse {
    fn from(verdict: LivenessVerdict) -> Self {
        Self {
            verdict,
            valid: verdict.is_valid(),
            message: verdict.reason(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub a: FaceDescriptor,
    pub b: FaceDescriptor,
}

#[derive(Debug, Deserialize)]
pub struct CalculateInssRequest {
    pub month: String,
    /// As typed, e.g. `R$ 1.500,00`.
    pub income: String,
}

#[derive(Debug, Deserialize)]
pub struct DocumentUpload {
    pub content_type: String,
    /// Base64 payload.
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct InsuranceRequestBody {
    pub cpf: String,
    #[serde(default)]
    pub fishing_type: Option<FishingType>,
}
