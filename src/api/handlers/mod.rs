// src/api/handlers/mod.rs
pub mod biometry;
pub mod defeso;
pub mod health;
pub mod identity;
pub mod records;
