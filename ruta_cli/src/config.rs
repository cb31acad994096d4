use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use ruta_matrix_providers::{
    cache::LegCache,
    travel_matrix_client::TravelMatrixClient,
    travel_matrix_provider::{DEFAULT_FALLBACK_SPEED_KMH, TravelMatrixProvider},
};
use tracing::debug;

pub const OSRM_URL_VAR: &str = "RUTA_OSRM_URL";
pub const OSRM_TIMEOUT_VAR: &str = "RUTA_OSRM_TIMEOUT_MS";
pub const DEFAULT_OSRM_TIMEOUT_MS: u64 = 2000;
/// File the road leg cache is loaded from and saved to between runs.
pub const LEG_CACHE_VAR: &str = "RUTA_LEG_CACHE";

/// OSRM when a server url is configured, straight lines otherwise.
pub fn provider(url: Option<String>, timeout_ms: Option<String>) -> anyhow::Result<TravelMatrixProvider> {
    let Some(url) = url.filter(|url| !url.trim().is_empty()) else {
        return Ok(TravelMatrixProvider::default());
    };

    let timeout_ms = match timeout_ms {
        Some(timeout_ms) => timeout_ms
            .trim()
            .parse()
            .with_context(|| format!("{OSRM_TIMEOUT_VAR} must be a number of milliseconds"))?,
        None => DEFAULT_OSRM_TIMEOUT_MS,
    };

    Ok(TravelMatrixProvider::Osrm {
        url,
        timeout_ms,
        fallback_speed_kmh: DEFAULT_FALLBACK_SPEED_KMH,
    })
}

pub fn travel_matrix_client_from_env() -> anyhow::Result<TravelMatrixClient> {
    let provider = provider(
        std::env::var(OSRM_URL_VAR).ok(),
        std::env::var(OSRM_TIMEOUT_VAR).ok(),
    )?;
    debug!(?provider, "Using travel matrix provider");

    let cache = match leg_cache_path() {
        Some(path) => load_leg_cache(&path)?,
        None => LegCache::default(),
    };

    Ok(TravelMatrixClient::new(provider, Arc::new(cache))?)
}

fn leg_cache_path() -> Option<PathBuf> {
    std::env::var_os(LEG_CACHE_VAR)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
}

fn load_leg_cache(path: &Path) -> anyhow::Result<LegCache> {
    let cache = LegCache::load_from_file(path)
        .with_context(|| format!("cannot read leg cache {}", path.display()))?;
    debug!(legs = cache.len(), path = %path.display(), "Loaded leg cache");

    Ok(cache)
}

/// Writes the legs fetched this run back to the cache file, when one is configured.
pub fn save_leg_cache(client: &TravelMatrixClient) -> anyhow::Result<()> {
    let Some(path) = leg_cache_path() else {
        return Ok(());
    };

    client
        .cache()
        .save_to_file(&path)
        .with_context(|| format!("cannot write leg cache {}", path.display()))
}
