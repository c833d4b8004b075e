// src/core/services/mod.rs
pub mod defeso;
pub mod health;
pub mod identity;
pub mod records;

pub use defeso::{DataSource, DefesoResponse, DefesoService};
pub use health::{HealthMetrics, HealthService};
pub use identity::{IdentityService, LoginOutcome};
pub use records::RecordsService;
