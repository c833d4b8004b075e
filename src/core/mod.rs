// src/core/mod.rs
pub mod biometry;
pub mod defeso;
pub mod identity;
pub mod records;
pub mod services;
