use std::{sync::Arc, time::Duration};

use tracing::{debug, warn};

use crate::{
    as_the_crow_flies::as_the_crow_flies_matrices,
    cache::{LegCache, LegKey, TravelLeg},
    osrm::{OsrmClient, OsrmClientParams, OsrmError},
    travel_matrices::TravelMatrices,
    travel_matrix_provider::TravelMatrixProvider,
};

/// Road-network facade. Never fails: any provider error degrades to the haversine approximation.
pub struct TravelMatrixClient {
    osrm_client: Option<OsrmClient>,
    fallback_speed_kmh: f64,
    cache: Arc<LegCache>,
}

impl TravelMatrixClient {
    pub fn new(provider: TravelMatrixProvider, cache: Arc<LegCache>) -> Result<Self, OsrmError> {
        let fallback_speed_kmh = provider.fallback_speed_kmh();
        let osrm_client = match provider {
            TravelMatrixProvider::Osrm {
                url, timeout_ms, ..
            } => Some(OsrmClient::new(OsrmClientParams {
                osrm_url: url,
                timeout: Duration::from_millis(timeout_ms),
            })?),
            TravelMatrixProvider::AsTheCrowFlies { .. } => None,
        };

        Ok(Self {
            osrm_client,
            fallback_speed_kmh,
            cache,
        })
    }

    pub fn cache(&self) -> &Arc<LegCache> {
        &self.cache
    }

    fn cached_matrices<P>(&self, points: &[P]) -> Option<TravelMatrices>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        let size = points.len();
        let mut distances = Vec::with_capacity(size * size);
        let mut times = Vec::with_capacity(size * size);

        for from in points {
            for to in points {
                let leg = self.cache.get(&LegKey::new(from, to))?;
                distances.push(leg.meters);
                times.push(leg.seconds);
            }
        }

        Some(TravelMatrices {
            size,
            distances,
            times,
        })
    }

    fn store<P>(&self, points: &[P], matrices: &TravelMatrices)
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        self.cache.extend(points.iter().enumerate().flat_map(|(i, from)| {
            points.iter().enumerate().map(move |(j, to)| {
                (
                    LegKey::new(from, to),
                    TravelLeg {
                        meters: matrices.distance(i, j),
                        seconds: matrices.time(i, j),
                    },
                )
            })
        }));
    }

    pub async fn fetch_matrix<P>(&self, points: &[P]) -> TravelMatrices
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        let Some(osrm_client) = &self.osrm_client else {
            return as_the_crow_flies_matrices(points, self.fallback_speed_kmh);
        };

        if let Some(matrices) = self.cached_matrices(points) {
            debug!("Travel matrix for {} points served from cache", points.len());
            return matrices;
        }

        match osrm_client.fetch_matrix(points).await {
            Ok(matrices) => {
                self.store(points, &matrices);
                matrices
            }
            Err(error) => {
                warn!(%error, "Road-network provider degraded, falling back to haversine");
                as_the_crow_flies_matrices(points, self.fallback_speed_kmh)
            }
        }
    }

    /// Consecutive legs `0 -> 1 -> ... -> n - 1`, served from the cache when every leg is known.
    pub async fn fetch_path_legs<P>(&self, points: &[P]) -> Vec<TravelLeg>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        let cached = points
            .windows(2)
            .map(|pair| self.cache.get(&LegKey::new(&pair[0], &pair[1])))
            .collect::<Option<Vec<_>>>();

        if let Some(legs) = cached {
            debug!("{} path legs served from cache", legs.len());
            return legs;
        }

        self.fetch_matrix(points).await.path_legs()
    }

    /// Polyline through `points`. Straight segments when no road geometry is available.
    pub async fn fetch_geometry<P>(&self, points: &[P]) -> Vec<[f64; 2]>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        let straight_line = || {
            points
                .iter()
                .map(|point| {
                    let point: geo_types::Point = point.into();
                    [point.x(), point.y()]
                })
                .collect::<Vec<_>>()
        };

        let Some(osrm_client) = &self.osrm_client else {
            return straight_line();
        };

        match osrm_client.fetch_route_geometry(points).await {
            Ok(geometry) => geometry,
            Err(error) => {
                warn!(%error, "Road geometry unavailable, using straight segments");
                straight_line()
            }
        }
    }
}
