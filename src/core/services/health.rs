// src/core/services/health.rs
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::Serialize;

/// Liveness data for `GET /health`.
pub struct HealthService {
    start_time: i64,
    processed_requests: AtomicU64,
    models_loaded: AtomicBool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthMetrics {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime: i64,
    pub processed_requests: u64,
    pub models_loaded: bool,
}

impl HealthService {
    pub fn new() -> Self {
        Self {
            start_time: chrono::Utc::now().timestamp(),
            processed_requests: AtomicU64::new(0),
            models_loaded: AtomicBool::new(false),
        }
    }

    pub fn record_request(&self) {
        self.processed_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_models_loaded(&self, loaded: bool) {
        self.models_loaded.store(loaded, Ordering::Relaxed);
    }

    pub fn get_metrics(&self) -> HealthMetrics {
        HealthMetrics {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            uptime: chrono::Utc::now().timestamp() - self.start_time,
            processed_requests: self.processed_requests.load(Ordering::Relaxed),
            models_loaded: self.models_loaded.load(Ordering::Relaxed),
        }
    }
}

impl Default for HealthService {
    fn default() -> Self {
        Self::new()
    }
}
