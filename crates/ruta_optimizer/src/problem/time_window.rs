use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::utils::time::ceil_minutes;

/// Half-open window `[start, end)`, either bound may be absent.
#[derive(Deserialize, Debug, Serialize, Clone, Copy, PartialEq, Default, JsonSchema)]
pub struct TimeWindow {
    start: Option<Timestamp>,
    end: Option<Timestamp>,
}

impl TimeWindow {
    pub fn new(start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        TimeWindow { start, end }
    }

    pub fn from_iso(start: Option<&str>, end: Option<&str>) -> Result<Self, jiff::Error> {
        Ok(TimeWindow {
            start: start.map(str::parse).transpose()?,
            end: end.map(str::parse).transpose()?,
        })
    }

    /// Visit-level window when present, otherwise the customer-level one.
    pub fn resolve(visit_level: Option<TimeWindow>, customer_level: Option<TimeWindow>) -> Self {
        visit_level
            .filter(|window| !window.is_empty())
            .or(customer_level)
            .unwrap_or_default()
    }

    pub fn start(&self) -> Option<Timestamp> {
        self.start
    }

    pub fn end(&self) -> Option<Timestamp> {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn is_well_formed(&self) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start < end,
            _ => true,
        }
    }

    pub fn contains(&self, timestamp: Timestamp) -> bool {
        self.start.is_none_or(|start| timestamp >= start)
            && self.end.is_none_or(|end| timestamp < end)
    }

    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        let starts_before_other_ends = match (self.start, other.end) {
            (Some(start), Some(end)) => start < end,
            _ => true,
        };
        let ends_after_other_starts = match (self.end, other.start) {
            (Some(end), Some(start)) => end > start,
            _ => true,
        };

        starts_before_other_ends && ends_after_other_starts
    }
}

impl TimeWindow {
    /// Whole minutes that `arrival` precedes the window start.
    pub fn early_minutes(&self, arrival: Timestamp) -> i64 {
        match self.start {
            Some(start) => ceil_minutes(start.duration_since(arrival)),
            None => 0,
        }
    }

    /// Whole minutes that `arrival` follows the window end.
    pub fn late_minutes(&self, arrival: Timestamp) -> i64 {
        match self.end {
            Some(end) => ceil_minutes(arrival.duration_since(end)),
            None => 0,
        }
    }
}

#[derive(Default)]
pub struct TimeWindowBuilder {
    start: Option<Timestamp>,
    end: Option<Timestamp>,
}

impl TimeWindowBuilder {
    pub fn with_start(mut self, start: Timestamp) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_end(mut self, end: Timestamp) -> Self {
        self.end = Some(end);
        self
    }

    pub fn build(self) -> TimeWindow {
        TimeWindow {
            start: self.start,
            end: self.end,
        }
    }
}
