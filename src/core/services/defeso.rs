// src/core/services/defeso.rs
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    core::{
        defeso::{calculate_window, DefesoCatalog, DefesoWindow, DEFAULT_KEY},
        identity::FisherProfile,
    },
    utils::{clock::Clock, error::Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Cache,
    Computed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefesoResponse {
    pub data: DefesoWindow,
    pub last_updated: NaiveDateTime,
    pub source: DataSource,
}

struct CachedWindow {
    window: DefesoWindow,
    computed_at: NaiveDateTime,
}

/// Serves closed-season windows, remembering each region's answer for the
/// rest of the day it was computed on (bounded by the TTL).
pub struct DefesoService {
    catalog: DefesoCatalog,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    cache: RwLock<HashMap<String, CachedWindow>>,
}

impl DefesoService {
    pub fn new(catalog: DefesoCatalog, clock: Arc<dyn Clock>, ttl: std::time::Duration) -> Self {
        let ttl = Duration::from_std(ttl).unwrap_or_else(|_| Duration::days(1));
        Self {
            catalog,
            clock,
            ttl,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn window_for_region(&self, region: &str) -> Result<DefesoResponse> {
        let now = self.clock.now();
        // Unknown regions all share the fallback rule, so they share one entry.
        let key = if self.catalog.get(region).is_some() {
            region
        } else {
            DEFAULT_KEY
        };

        if let Some(entry) = self.cache.read().get(key) {
            let same_day = entry.computed_at.date() == now.date();
            if same_day && now - entry.computed_at < self.ttl {
                debug!(region, key, "Defeso window served from cache");
                let mut data = entry.window.clone();
                data.region = region.to_string();
                return Ok(DefesoResponse {
                    data,
                    last_updated: entry.computed_at,
                    source: DataSource::Cache,
                });
            }
        }

        let window = calculate_window(&self.catalog, region, now)?;
        info!(region, status = ?window.status, days_remaining = window.days_remaining, "Computed defeso window");

        let mut cache = self.cache.write();
        cache.retain(|_, entry| entry.computed_at.date() == now.date());
        cache.insert(
            key.to_string(),
            CachedWindow {
                window: window.clone(),
                computed_at: now,
            },
        );
        drop(cache);

        Ok(DefesoResponse {
            data: window,
            last_updated: now,
            source: DataSource::Computed,
        })
    }

    /// Window for the profile's region with the profile's own eligibility.
    pub fn window_for_profile(&self, profile: &FisherProfile) -> Result<DefesoResponse> {
        let mut response = self.window_for_region(profile.region.label())?;
        response.data.has_right_to_insurance = profile.has_right;
        Ok(response)
    }

    pub fn regions(&self) -> Vec<String> {
        self.catalog.regions().map(str::to_string).collect()
    }

    pub fn catalog(&self) -> &DefesoCatalog {
        &self.catalog
    }

    pub fn clear_cache(&self) {
        self.cache.write().clear();
    }
}
