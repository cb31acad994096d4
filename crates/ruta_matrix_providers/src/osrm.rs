use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::travel_matrices::TravelMatrices;

pub const OSRM_TABLE_API_PATH: &str = "/table/v1/driving/";
pub const OSRM_ROUTE_API_PATH: &str = "/route/v1/driving/";

#[derive(Debug, Error)]
pub enum OsrmError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {code} - {message}")]
    Api { code: String, message: String },

    #[error("Incomplete response")]
    IncompleteResponse,

    #[error("Not enough points: {0}")]
    NotEnoughPoints(usize),
}

#[derive(Clone, Debug)]
pub struct OsrmClientParams {
    pub osrm_url: String,
    pub timeout: Duration,
}

#[derive(Deserialize)]
struct OsrmTableResponse {
    code: String,
    message: Option<String>,
    durations: Option<Vec<Vec<Option<f64>>>>,
    distances: Option<Vec<Vec<Option<f64>>>>,
}

#[derive(Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
}

#[derive(Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

pub struct OsrmClient {
    params: OsrmClientParams,
    client: reqwest::Client,
}

fn coordinates_path<P>(points: &[P]) -> String
where
    for<'a> &'a P: Into<geo_types::Point>,
{
    points
        .iter()
        .map(|point| {
            let point: geo_types::Point = point.into();
            format!("{},{}", point.x(), point.y())
        })
        .collect::<Vec<_>>()
        .join(";")
}

fn flatten(rows: Vec<Vec<Option<f64>>>, size: usize) -> Result<Vec<f64>, OsrmError> {
    if rows.len() != size {
        return Err(OsrmError::IncompleteResponse);
    }

    let mut values = Vec::with_capacity(size * size);
    for row in rows {
        if row.len() != size {
            return Err(OsrmError::IncompleteResponse);
        }
        for value in row {
            // null means the pair is unroutable
            values.push(value.ok_or(OsrmError::IncompleteResponse)?);
        }
    }

    Ok(values)
}

impl OsrmClient {
    pub fn new(params: OsrmClientParams) -> Result<Self, OsrmError> {
        let client = reqwest::Client::builder()
            .timeout(params.timeout)
            .build()?;

        Ok(Self { params, client })
    }

    pub async fn fetch_matrix<P>(&self, points: &[P]) -> Result<TravelMatrices, OsrmError>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        if points.len() < 2 {
            return Err(OsrmError::NotEnoughPoints(points.len()));
        }

        let url = format!(
            "{}{}{}",
            self.params.osrm_url.trim_end_matches('/'),
            OSRM_TABLE_API_PATH,
            coordinates_path(points)
        );

        debug!("Fetching OSRM table for {} points", points.len());

        let response: OsrmTableResponse = self
            .client
            .get(url)
            .query(&[("annotations", "duration,distance")])
            .send()
            .await?
            .json()
            .await?;

        if response.code != "Ok" {
            return Err(OsrmError::Api {
                code: response.code,
                message: response.message.unwrap_or_default(),
            });
        }

        let size = points.len();
        let times = flatten(
            response.durations.ok_or(OsrmError::IncompleteResponse)?,
            size,
        )?;
        let distances = flatten(
            response.distances.ok_or(OsrmError::IncompleteResponse)?,
            size,
        )?;

        Ok(TravelMatrices {
            size,
            distances,
            times,
        })
    }

    /// Road geometry through `points` in order, as `[lon, lat]` pairs.
    pub async fn fetch_route_geometry<P>(&self, points: &[P]) -> Result<Vec<[f64; 2]>, OsrmError>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        if points.len() < 2 {
            return Err(OsrmError::NotEnoughPoints(points.len()));
        }

        let url = format!(
            "{}{}{}",
            self.params.osrm_url.trim_end_matches('/'),
            OSRM_ROUTE_API_PATH,
            coordinates_path(points)
        );

        let response: OsrmRouteResponse = self
            .client
            .get(url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await?
            .json()
            .await?;

        if response.code != "Ok" {
            return Err(OsrmError::Api {
                code: response.code,
                message: response.message.unwrap_or_default(),
            });
        }

        response
            .routes
            .into_iter()
            .next()
            .map(|route| route.geometry.coordinates)
            .ok_or(OsrmError::IncompleteResponse)
    }
}
