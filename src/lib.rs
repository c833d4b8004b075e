pub mod api;
pub mod core;
pub mod storage;
pub mod utils;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{dev::Service as _, dev::ServerHandle, web, App, HttpServer};
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::{
    api::ApiState,
    core::{
        biometry::{CameraSource, CaptureSession, FaceBiometryAdapter, FaceDetector},
        defeso::DefesoCatalog,
        identity::Region,
        services::{DefesoService, HealthService, IdentityService, RecordsService},
    },
    storage::encrypted::EncryptedStore,
    utils::{
        clock::{Clock, SystemClock},
        config::Config,
        error::{AppError, Result},
    },
};

pub struct Application {
    config: Arc<Config>,
    state: ApiState,
    storage: Arc<EncryptedStore>,
    server: Mutex<Option<ServerHandle>>,
}

impl Application {
    pub async fn new(config: Config, detector: Arc<dyn FaceDetector>) -> Result<Self> {
        Self::with_clock(config, detector, Arc::new(SystemClock)).await
    }

    pub async fn with_clock(
        config: Config,
        detector: Arc<dyn FaceDetector>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        let config = Arc::new(config);

        info!("Initializing storage...");
        let storage = Arc::new(
            EncryptedStore::new(&config.storage.path, &config.storage.encryption_key).await?,
        );

        info!("Initializing services...");
        let default_region: Region = config
            .defeso
            .default_region
            .parse()
            .map_err(AppError::Config)?;

        let biometry = Arc::new(FaceBiometryAdapter::new(
            detector,
            config.biometry.policy.clone(),
            config.get_model_load_timeout(),
        ));
        let identity = Arc::new(IdentityService::new(
            storage.clone(),
            config.biometry.policy.clone(),
            default_region,
        ));
        let defeso = Arc::new(DefesoService::new(
            DefesoCatalog::builtin(),
            clock,
            config.get_cache_ttl(),
        ));
        let records = Arc::new(RecordsService::new(
            storage.clone(),
            identity.clone(),
            defeso.clone(),
        ));

        let state = ApiState {
            identity,
            defeso,
            records,
            biometry,
            health: Arc::new(HealthService::new()),
        };

        Ok(Self {
            config,
            state,
            storage,
            server: Mutex::new(None),
        })
    }

    pub fn state(&self) -> &ApiState {
        &self.state
    }

    pub fn storage(&self) -> &Arc<EncryptedStore> {
        &self.storage
    }

    /// A capture screen bound to `camera`, with the configured frame budget.
    pub fn capture_session(&self, camera: Arc<dyn CameraSource>) -> CaptureSession {
        CaptureSession::new(self.state.biometry.clone(), camera)
            .with_frame_budget(self.config.biometry.capture_frame_budget)
    }

    pub async fn start(&self) -> Result<()> {
        info!("Loading face models...");
        match self.state.biometry.ensure_loaded().await {
            Ok(()) => self.state.health.set_models_loaded(true),
            Err(e) => warn!("Face models unavailable, on-device capture disabled: {}", e),
        }

        info!("Starting API server...");
        self.start_api_server()?;

        info!("Application successfully started");
        Ok(())
    }

    fn start_api_server(&self) -> Result<()> {
        let state = self.state.clone();
        let allowed_origin = self.config.server.allowed_origin.clone();
        if allowed_origin.is_none() {
            warn!("No allowed_origin configured, accepting requests from any origin");
        }

        let server = HttpServer::new(move || {
            let health = state.health.clone();
            let cors = match &allowed_origin {
                Some(origin) => Cors::default()
                    .allowed_origin(origin)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
                    .allow_any_header()
                    .max_age(3600),
                None => Cors::permissive(),
            };

            App::new()
                .wrap(cors)
                .wrap_fn(move |req, srv| {
                    health.record_request();
                    srv.call(req)
                })
                .configure(|cfg: &mut web::ServiceConfig| state.configure(cfg))
        })
        .bind((self.config.server.host.as_str(), self.config.server.port))
        .map_err(|e| AppError::Config(format!("Failed to bind API server: {}", e)))?
        .run();

        *self.server.lock() = Some(server.handle());
        actix_web::rt::spawn(server);

        info!(
            "API listening on {}:{}",
            self.config.server.host, self.config.server.port
        );
        Ok(())
    }

    pub async fn shutdown(&self) -> Result<()> {
        info!("Shutting down application...");

        let handle = self.server.lock().take();
        if let Some(handle) = handle {
            info!("Stopping API server...");
            handle.stop(true).await;
        }

        info!("Clearing caches...");
        self.state.identity.clear_cache();
        self.state.defeso.clear_cache();

        info!("Application shutdown complete");
        Ok(())
    }
}
