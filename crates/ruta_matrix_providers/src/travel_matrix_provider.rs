use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FALLBACK_SPEED_KMH: f64 = 40.0;

#[derive(Deserialize, Serialize, JsonSchema, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TravelMatrixProvider {
    /// OSRM routing server, falls back to haversine at `fallback_speed_kmh` when unreachable
    Osrm {
        url: String,
        timeout_ms: u64,
        fallback_speed_kmh: f64,
    },
    AsTheCrowFlies {
        speed_kmh: f64,
    },
}

impl Default for TravelMatrixProvider {
    fn default() -> Self {
        TravelMatrixProvider::AsTheCrowFlies {
            speed_kmh: DEFAULT_FALLBACK_SPEED_KMH,
        }
    }
}

impl TravelMatrixProvider {
    pub fn fallback_speed_kmh(&self) -> f64 {
        match self {
            TravelMatrixProvider::Osrm {
                fallback_speed_kmh, ..
            } => *fallback_speed_kmh,
            TravelMatrixProvider::AsTheCrowFlies { speed_kmh } => *speed_kmh,
        }
    }
}
