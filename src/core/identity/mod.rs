// src/core/identity/mod.rs
pub mod pin;
pub mod types;

pub use types::{
    normalize_cpf, FisherProfile, LoginAttempt, ProfileUpdate, Region, RegistrationForm,
    SecurityCredential, SecurityMode, SecuritySetup,
};
