// src/utils/mod.rs
pub mod clock;
pub mod config;
pub mod error;
