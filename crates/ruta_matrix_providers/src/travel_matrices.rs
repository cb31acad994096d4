use serde::{Deserialize, Serialize};

use crate::cache::TravelLeg;

/// TravelMatrices holds the travel distance and time matrices.
/// Stored as flat row-major vectors, distances in meters and times in seconds.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TravelMatrices {
    pub size: usize,
    pub distances: Vec<f64>,
    pub times: Vec<f64>,
}

impl TravelMatrices {
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances[from * self.size + to]
    }

    pub fn time(&self, from: usize, to: usize) -> f64 {
        self.times[from * self.size + to]
    }

    /// The consecutive legs `0 -> 1 -> ... -> size - 1`.
    pub fn path_legs(&self) -> Vec<TravelLeg> {
        (1..self.size)
            .map(|i| TravelLeg {
                meters: self.distance(i - 1, i),
                seconds: self.time(i - 1, i),
            })
            .collect()
    }
}
