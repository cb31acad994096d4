use serde::Serialize;

use crate::define_index_newtype;

use super::{amount::Amount, error::ProblemError, location::Location, time_window::TimeWindow};

define_index_newtype!(VisitIdx, Visit);

pub const DEFAULT_SERVICE_MINUTES: i64 = 10;

/// A delivery stop derived from one order.
#[derive(Serialize, Debug, Clone)]
pub struct Visit {
    external_id: String,
    order_id: String,
    customer_id: Option<String>,
    location: Location,
    demand: Amount,
    priority: u32,
    service_minutes: i64,
    time_window: TimeWindow,
}

impl Visit {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn customer_id(&self) -> Option<&str> {
        self.customer_id.as_deref()
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn demand(&self) -> &Amount {
        &self.demand
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn service_minutes(&self) -> i64 {
        self.service_minutes
    }

    /// Effective window, the visit-level one taking precedence over the customer-level one.
    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }
}

#[derive(Default)]
pub struct VisitBuilder {
    external_id: Option<String>,
    order_id: Option<String>,
    customer_id: Option<String>,
    location: Option<Location>,
    demand: Option<Amount>,
    priority: Option<u32>,
    service_minutes: Option<i64>,
    time_window: Option<TimeWindow>,
    customer_time_window: Option<TimeWindow>,
}

impl VisitBuilder {
    pub fn set_external_id(&mut self, external_id: String) -> &mut VisitBuilder {
        self.external_id = Some(external_id);
        self
    }

    pub fn set_order_id(&mut self, order_id: String) -> &mut VisitBuilder {
        self.order_id = Some(order_id);
        self
    }

    pub fn set_customer_id(&mut self, customer_id: String) -> &mut VisitBuilder {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn set_location(&mut self, location: Location) -> &mut VisitBuilder {
        self.location = Some(location);
        self
    }

    pub fn set_demand(&mut self, demand: Amount) -> &mut VisitBuilder {
        self.demand = Some(demand);
        self
    }

    pub fn set_priority(&mut self, priority: u32) -> &mut VisitBuilder {
        self.priority = Some(priority);
        self
    }

    pub fn set_service_minutes(&mut self, service_minutes: i64) -> &mut VisitBuilder {
        self.service_minutes = Some(service_minutes);
        self
    }

    pub fn set_time_window(&mut self, time_window: TimeWindow) -> &mut VisitBuilder {
        self.time_window = Some(time_window);
        self
    }

    pub fn set_customer_time_window(&mut self, time_window: TimeWindow) -> &mut VisitBuilder {
        self.customer_time_window = Some(time_window);
        self
    }

    pub fn build(self) -> Result<Visit, ProblemError> {
        let external_id = self.external_id.ok_or(ProblemError::MissingField {
            entity: "visit",
            field: "id",
        })?;
        let location = self.location.ok_or(ProblemError::MissingField {
            entity: "visit",
            field: "location",
        })?;
        let demand = self.demand.unwrap_or_default();
        let priority = self.priority.unwrap_or(1);
        let service_minutes = self.service_minutes.unwrap_or(DEFAULT_SERVICE_MINUTES);
        let time_window = TimeWindow::resolve(self.time_window, self.customer_time_window);

        if priority < 1 {
            return Err(ProblemError::InvalidPriority(external_id));
        }

        if !demand.is_non_negative() || service_minutes < 0 {
            return Err(ProblemError::InvalidDemand(external_id));
        }

        if !location.is_valid() {
            return Err(ProblemError::InvalidCoordinates(external_id));
        }

        Ok(Visit {
            order_id: self.order_id.unwrap_or_else(|| external_id.clone()),
            external_id,
            customer_id: self.customer_id,
            location,
            demand,
            priority,
            service_minutes,
            time_window,
        })
    }
}
