// src/core/identity/types.rs
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::biometry::FaceDescriptor;

/// Fishing regions with an official closed-season table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "Norte - Bacia Amazônica")]
    Norte,
    #[serde(rename = "Nordeste - Bacia do Parnaíba")]
    Nordeste,
    #[serde(rename = "Centro-Oeste - Bacia do Paraguai")]
    CentroOeste,
    #[serde(rename = "Sudeste - Bacia do Paraná")]
    Sudeste,
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::Norte,
        Region::Nordeste,
        Region::CentroOeste,
        Region::Sudeste,
    ];

    /// Display label, also the defeso catalog key.
    pub fn label(&self) -> &'static str {
        match self {
            Region::Norte => "Norte - Bacia Amazônica",
            Region::Nordeste => "Nordeste - Bacia do Parnaíba",
            Region::CentroOeste => "Centro-Oeste - Bacia do Paraguai",
            Region::Sudeste => "Sudeste - Bacia do Paraná",
        }
    }
}

impl Default for Region {
    fn default() -> Self {
        Region::Norte
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Region::ALL
            .into_iter()
            .find(|r| r.label() == s)
            .ok_or_else(|| format!("Região desconhecida: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityMode {
    Biometric,
    Pin,
}

/// The one active login method of a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SecurityCredential {
    /// `descriptor` is absent until a face has been enrolled.
    Biometric { descriptor: Option<FaceDescriptor> },
    /// Salted SHA3-256 of the PIN, both hex encoded.
    Pin { hash: String, salt: String },
}

impl SecurityCredential {
    pub fn mode(&self) -> SecurityMode {
        match self {
            SecurityCredential::Biometric { .. } => SecurityMode::Biometric,
            SecurityCredential::Pin { .. } => SecurityMode::Pin,
        }
    }

    pub fn descriptor(&self) -> Option<&FaceDescriptor> {
        match self {
            SecurityCredential::Biometric { descriptor } => descriptor.as_ref(),
            SecurityCredential::Pin { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FisherProfile {
    pub id: Uuid,
    pub name: String,
    pub cpf: String,
    pub rgp: String,
    pub region: Region,
    pub has_right: bool,
    pub security: SecurityCredential,
    /// Data URL of the profile picture.
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FisherProfile {
    pub fn security_mode(&self) -> SecurityMode {
        self.security.mode()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Fields typed on the registration screen.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationForm {
    pub name: String,
    pub cpf: String,
    pub rgp: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SecuritySetup {
    Biometric { descriptor: Option<FaceDescriptor> },
    Pin { pin: String, confirmation: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LoginAttempt {
    Pin { pin: String },
    Face { descriptor: FaceDescriptor },
}

/// Partial edit from the account screen. Absent fields are left as they are.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub rgp: Option<String>,
    pub region: Option<String>,
    pub has_right: Option<bool>,
    pub photo: Option<String>,
}

/// Reduces a typed CPF (`123.456.789-00`) to its digits.
pub fn normalize_cpf(cpf: &str) -> String {
    cpf.chars().filter(char::is_ascii_digit).collect()
}
