// src/storage/mod.rs
pub mod encrypted;
