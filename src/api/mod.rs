// src/api/mod.rs
pub mod error;
pub mod handlers;
pub mod types;

use std::sync::Arc;

use actix_web::web;

use crate::core::{
    biometry::FaceBiometryAdapter,
    services::{DefesoService, HealthService, IdentityService, RecordsService},
};

/// Largest JSON body accepted; document photos travel as base64.
const JSON_LIMIT: usize = 8 * 1024 * 1024;

/// Shared services handed to every worker.
#[derive(Clone)]
pub struct ApiState {
    pub identity: Arc<IdentityService>,
    pub defeso: Arc<DefesoService>,
    pub records: Arc<RecordsService>,
    pub biometry: Arc<FaceBiometryAdapter>,
    pub health: Arc<HealthService>,
}

impl ApiState {
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(
            web::JsonConfig::default()
                .limit(JSON_LIMIT)
                .error_handler(error::json_error),
        )
        .app_data(web::Data::from(self.identity.clone()))
        .app_data(web::Data::from(self.defeso.clone()))
        .app_data(web::Data::from(self.records.clone()))
        .app_data(web::Data::from(self.biometry.clone()))
        .app_data(web::Data::from(self.health.clone()))
        .service(handlers::health::scope())
        .service(handlers::defeso::scope())
        .service(handlers::biometry::scope())
        .service(handlers::identity::scope())
        .service(handlers::records::scope());
    }
}
