// src/core/services/identity.rs
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    core::{
        biometry::{self, BiometricError, BiometryPolicy, FaceDescriptor, MatchResult},
        identity::{
            normalize_cpf,
            pin::{pin_credential, validate_pin, verify_pin},
            FisherProfile, LoginAttempt, ProfileUpdate, Region, RegistrationForm,
            SecurityCredential, SecuritySetup,
        },
    },
    storage::encrypted::{EncryptedStore, StorageError},
    utils::error::{AppError, Result},
};

const CURRENT_PROFILE_KEY: &str = "profile:current";
const REQUIRED_FIELDS: &str = "Por favor, preencha todos os campos obrigatórios.";

fn profile_key(cpf: &str) -> String {
    format!("profile:{}", cpf)
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub profile: FisherProfile,
    /// Present for face logins.
    pub match_result: Option<MatchResult>,
}

/// Registration, security setup and login for fisher profiles.
///
/// Owns the descriptor cache: enrolled descriptors keyed by CPF, filled on
/// enrollment and successful face login, dropped on any profile change.
pub struct IdentityService {
    storage: Arc<EncryptedStore>,
    policy: BiometryPolicy,
    default_region: Region,
    descriptors: RwLock<HashMap<String, FaceDescriptor>>,
}

impl IdentityService {
    pub fn new(storage: Arc<EncryptedStore>, policy: BiometryPolicy, default_region: Region) -> Self {
        Self {
            storage,
            policy,
            default_region,
            descriptors: RwLock::new(HashMap::new()),
        }
    }

    pub async fn register(&self, form: RegistrationForm, setup: SecuritySetup) -> Result<FisherProfile> {
        let name = form.name.trim();
        let cpf = normalize_cpf(&form.cpf);
        let rgp = form.rgp.trim();
        if name.is_empty() || cpf.is_empty() || rgp.is_empty() {
            return Err(AppError::Validation(REQUIRED_FIELDS.into()));
        }

        let region = match form.region.as_deref() {
            Some(label) => label.parse::<Region>().map_err(AppError::Validation)?,
            None => self.default_region,
        };

        if self.storage.contains(&profile_key(&cpf)).await? {
            warn!("Registration rejected, CPF already registered");
            return Err(AppError::Conflict(format!("profile {} already exists", cpf)));
        }

        let security = match setup {
            SecuritySetup::Biometric { descriptor } => SecurityCredential::Biometric {
                descriptor: descriptor.map(|d| self.check_length(d)).transpose()?,
            },
            SecuritySetup::Pin { pin, confirmation } => {
                validate_pin(&pin, &confirmation)?;
                pin_credential(&pin)
            }
        };

        let now = Utc::now();
        let profile = FisherProfile {
            id: Uuid::new_v4(),
            name: name.to_string(),
            cpf: cpf.clone(),
            rgp: rgp.to_string(),
            region,
            has_right: true,
            security,
            photo: form.photo,
            created_at: now,
            updated_at: now,
        };

        self.save(&profile).await?;
        self.storage.store(CURRENT_PROFILE_KEY, &cpf).await?;

        if let Some(descriptor) = profile.security.descriptor() {
            self.descriptors.write().insert(cpf, descriptor.clone());
        }

        info!(id = %profile.id, mode = ?profile.security_mode(), "Registered new profile");
        Ok(profile)
    }

    /// Switches the profile to face login with a freshly captured descriptor.
    pub async fn enroll_face(
        &self,
        cpf: &str,
        descriptor: FaceDescriptor,
        photo: Option<String>,
    ) -> Result<FisherProfile> {
        let descriptor = self.check_length(descriptor)?;
        let mut profile = self.require_profile(cpf).await?;

        profile.security = SecurityCredential::Biometric {
            descriptor: Some(descriptor.clone()),
        };
        if photo.is_some() {
            profile.photo = photo;
        }
        profile.touch();

        self.save(&profile).await?;
        self.descriptors.write().insert(profile.cpf.clone(), descriptor);

        info!(id = %profile.id, "Face enrolled");
        Ok(profile)
    }

    pub async fn set_pin(&self, cpf: &str, pin: &str, confirmation: &str) -> Result<FisherProfile> {
        validate_pin(pin, confirmation)?;
        let mut profile = self.require_profile(cpf).await?;

        profile.security = pin_credential(pin);
        profile.touch();

        self.save(&profile).await?;
        self.descriptors.write().remove(&profile.cpf);

        info!(id = %profile.id, "PIN set");
        Ok(profile)
    }

    pub async fn login(&self, cpf: &str, attempt: LoginAttempt) -> Result<LoginOutcome> {
        let profile = self.require_profile(cpf).await?;

        let match_result = match (&attempt, &profile.security) {
            (LoginAttempt::Pin { pin }, SecurityCredential::Pin { hash, salt }) => {
                if !verify_pin(pin, hash, salt) {
                    warn!(id = %profile.id, "PIN login rejected");
                    return Err(AppError::Authentication("PIN incorreto.".into()));
                }
                None
            }
            (LoginAttempt::Face { descriptor }, SecurityCredential::Biometric { .. }) => {
                let enrolled = self.enrolled_descriptor(&profile)?;
                let result = biometry::compare(&enrolled, descriptor, self.policy.match_threshold)?;
                debug!(distance = result.distance, "Face login compared");

                if !result.is_match {
                    warn!(id = %profile.id, distance = result.distance, "Face login rejected");
                    return Err(BiometricError::DescriptorMismatch {
                        distance: result.distance,
                    }
                    .into());
                }
                Some(result)
            }
            (_, credential) => return Err(AppError::WrongSecurityMode(credential.mode())),
        };

        self.storage.store(CURRENT_PROFILE_KEY, &profile.cpf).await?;
        info!(id = %profile.id, "Login succeeded");

        Ok(LoginOutcome {
            profile,
            match_result,
        })
    }

    pub async fn update_profile(&self, cpf: &str, update: ProfileUpdate) -> Result<FisherProfile> {
        let mut profile = self.require_profile(cpf).await?;

        if let Some(name) = update.name {
            profile.name = non_blank(&name)?;
        }
        if let Some(rgp) = update.rgp {
            profile.rgp = non_blank(&rgp)?;
        }
        if let Some(region) = update.region {
            profile.region = region.parse().map_err(AppError::Validation)?;
        }
        if let Some(has_right) = update.has_right {
            profile.has_right = has_right;
        }
        if update.photo.is_some() {
            profile.photo = update.photo;
        }
        profile.touch();

        self.save(&profile).await?;
        self.descriptors.write().remove(&profile.cpf);

        info!(id = %profile.id, "Profile updated");
        Ok(profile)
    }

    /// A record that can no longer be read is treated as absent so the app
    /// falls back to registration instead of failing.
    pub async fn get_profile(&self, cpf: &str) -> Result<Option<FisherProfile>> {
        let cpf = normalize_cpf(cpf);
        match self.storage.retrieve::<FisherProfile>(&profile_key(&cpf)).await {
            Ok(profile) => Ok(profile),
            Err(e @ (StorageError::InvalidFormat(_) | StorageError::DecryptionError(_))) => {
                warn!("Ignoring unreadable profile record: {}", e);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete_profile(&self, cpf: &str) -> Result<()> {
        let cpf = normalize_cpf(cpf);
        if !self.storage.delete(&profile_key(&cpf)).await? {
            return Err(AppError::NotFound(format!("profile {}", cpf)));
        }

        let current: Option<String> = self.storage.retrieve(CURRENT_PROFILE_KEY).await.ok().flatten();
        if current.as_deref() == Some(cpf.as_str()) {
            self.storage.delete(CURRENT_PROFILE_KEY).await?;
        }
        self.descriptors.write().remove(&cpf);

        info!("Profile deleted");
        Ok(())
    }

    /// Profile of the last registration or login on this device.
    pub async fn current_profile(&self) -> Result<Option<FisherProfile>> {
        let cpf: Option<String> = match self.storage.retrieve(CURRENT_PROFILE_KEY).await {
            Ok(cpf) => cpf,
            Err(e) => {
                warn!("Ignoring unreadable current-profile pointer: {}", e);
                None
            }
        };

        match cpf {
            Some(cpf) => self.get_profile(&cpf).await,
            None => Ok(None),
        }
    }

    pub fn clear_cache(&self) {
        let mut descriptors = self.descriptors.write();
        debug!(entries = descriptors.len(), "Clearing descriptor cache");
        descriptors.clear();
    }

    pub fn cached_descriptors(&self) -> usize {
        self.descriptors.read().len()
    }

    fn enrolled_descriptor(&self, profile: &FisherProfile) -> Result<FaceDescriptor> {
        if let Some(cached) = self.descriptors.read().get(&profile.cpf) {
            return Ok(cached.clone());
        }

        let descriptor = profile
            .security
            .descriptor()
            .cloned()
            .ok_or(BiometricError::DescriptorMissing)?;
        self.descriptors
            .write()
            .insert(profile.cpf.clone(), descriptor.clone());

        Ok(descriptor)
    }

    async fn require_profile(&self, cpf: &str) -> Result<FisherProfile> {
        self.get_profile(cpf)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("profile {}", normalize_cpf(cpf))))
    }

    async fn save(&self, profile: &FisherProfile) -> Result<()> {
        self.storage.store(&profile_key(&profile.cpf), profile).await?;
        Ok(())
    }

    fn check_length(&self, descriptor: FaceDescriptor) -> Result<FaceDescriptor> {
        if descriptor.len() != self.policy.descriptor_length {
            return Err(BiometricError::DescriptorLength {
                expected: self.policy.descriptor_length,
                actual: descriptor.len(),
            }
            .into());
        }
        Ok(descriptor)
    }
}

fn non_blank(value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(REQUIRED_FIELDS.into()));
    }
    Ok(value.to_string())
}
