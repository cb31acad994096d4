use std::collections::BTreeMap;

use futures::future::{join, join_all};
use jiff::Timestamp;
use ruta_matrix_providers::travel_matrix_client::TravelMatrixClient;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    problem::{amount::Amount, location::Location, vehicle::VehicleIdx},
    utils::time::ceil_minutes,
};

use super::{
    accepted_solution::AcceptedSolution,
    score::Score,
    solver::PlanStatus,
};

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct PlannedStop {
    /// 1-based position in the route.
    pub sequence: usize,
    pub visit_id: String,
    pub order_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub eta: Timestamp,
    pub etd: Timestamp,
    pub wait_minutes: i64,
    pub service_minutes: i64,
    pub distance_km_from_previous: f64,
    pub travel_minutes_from_previous: i64,
    pub accumulated: Amount,
    pub demand: Amount,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct PlannedRoute {
    pub vehicle_id: String,
    pub stops: Vec<PlannedStop>,
    pub distance_km: f64,
    /// Travel, service, wait and the drive back to the depot.
    pub total_minutes: i64,
    pub travel_minutes: i64,
    pub service_minutes: i64,
    pub wait_minutes: i64,
    pub cost: f64,
    pub return_to_depot_km: f64,
    pub return_to_depot_minutes: i64,
    /// `[lon, lat]` pairs from the depot and back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Vec<[f64; 2]>>,
    /// Depot to depot over the road network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road_distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road_minutes: Option<i64>,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default, PartialEq)]
pub struct PlanMetrics {
    pub total_km: f64,
    pub total_cost: f64,
    pub total_minutes: i64,
    pub travel_minutes: i64,
    pub service_minutes: i64,
    pub wait_minutes: i64,
    pub vehicles_used: usize,
    pub assigned_visits: usize,
    pub unassigned_visits: usize,
}

/// Rendered result of a solve.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct RoutePlan {
    pub id: String,
    pub status: PlanStatus,
    pub score: String,
    pub hard_score: i64,
    pub soft_score: i64,
    pub score_analysis: BTreeMap<String, Score>,
    pub routes: Vec<PlannedRoute>,
    pub unassigned_visits: Vec<String>,
    pub metrics: PlanMetrics,
}

fn round_km(km: f64) -> f64 {
    (km * 1000.0).round() / 1000.0
}

fn round_cost(cost: f64) -> f64 {
    (cost * 100.0).round() / 100.0
}

impl RoutePlan {
    pub fn from_solution(accepted: &AcceptedSolution, status: PlanStatus) -> Self {
        let solution = &accepted.solution;
        let problem = solution.problem();

        let routes = solution
            .routes()
            .into_iter()
            .filter(|(_, visits)| !visits.is_empty())
            .map(|(vehicle_id, visits)| {
                let vehicle = problem.vehicle(vehicle_id);
                let stops = visits
                    .iter()
                    .enumerate()
                    .map(|(position, &visit_id)| {
                        let visit = problem.visit(visit_id);
                        let shadow = solution.shadow(visit_id);
                        let eta = shadow.arrival_time.unwrap_or(problem.solve_start());

                        PlannedStop {
                            sequence: position + 1,
                            visit_id: visit.external_id().to_owned(),
                            order_id: visit.order_id().to_owned(),
                            customer_id: visit.customer_id().map(str::to_owned),
                            latitude: visit.location().lat(),
                            longitude: visit.location().lon(),
                            eta,
                            etd: shadow.departure_time.unwrap_or(eta),
                            wait_minutes: ceil_minutes(shadow.waiting_duration),
                            service_minutes: problem.effective_service_minutes(visit_id),
                            distance_km_from_previous: round_km(
                                shadow.distance_from_predecessor_km,
                            ),
                            travel_minutes_from_previous: shadow.travel_minutes_from_predecessor,
                            accumulated: shadow.accumulated,
                            demand: *visit.demand(),
                        }
                    })
                    .collect::<Vec<_>>();

                let distance_km = visits
                    .iter()
                    .map(|&visit_id| solution.shadow(visit_id).distance_from_predecessor_km)
                    .sum::<f64>();
                let travel_minutes = stops.iter().map(|s| s.travel_minutes_from_previous).sum();
                let service_minutes = stops.iter().map(|s| s.service_minutes).sum();
                let wait_minutes = stops.iter().map(|s| s.wait_minutes).sum();

                let return_leg = visits
                    .last()
                    .map(|&last| problem.leg_to_depot(vehicle_id, last));
                let return_to_depot_km = return_leg.map_or(0.0, |leg| leg.distance_km);
                let return_to_depot_minutes = return_leg.map_or(0, |leg| leg.minutes);

                PlannedRoute {
                    vehicle_id: vehicle.external_id().to_owned(),
                    stops,
                    distance_km: round_km(distance_km),
                    total_minutes: travel_minutes
                        + service_minutes
                        + wait_minutes
                        + return_to_depot_minutes,
                    travel_minutes,
                    service_minutes,
                    wait_minutes,
                    cost: round_cost(distance_km * vehicle.cost_per_km()),
                    return_to_depot_km: round_km(return_to_depot_km),
                    return_to_depot_minutes,
                    geometry: None,
                    road_distance_km: None,
                    road_minutes: None,
                }
            })
            .collect::<Vec<_>>();

        let unassigned_visits = solution
            .unassigned_visits()
            .map(|visit_id| problem.visit(visit_id).external_id().to_owned())
            .collect::<Vec<_>>();

        let metrics = PlanMetrics {
            total_km: round_km(routes.iter().map(|route| route.distance_km).sum()),
            total_cost: round_cost(routes.iter().map(|route| route.cost).sum()),
            total_minutes: routes.iter().map(|route| route.total_minutes).sum(),
            travel_minutes: routes.iter().map(|route| route.travel_minutes).sum(),
            service_minutes: routes.iter().map(|route| route.service_minutes).sum(),
            wait_minutes: routes.iter().map(|route| route.wait_minutes).sum(),
            vehicles_used: routes.len(),
            assigned_visits: routes.iter().map(|route| route.stops.len()).sum(),
            unassigned_visits: unassigned_visits.len(),
        };

        RoutePlan {
            id: problem.id().to_owned(),
            status,
            score: accepted.score.to_string(),
            hard_score: accepted.score.hard_score,
            soft_score: accepted.score.soft_score,
            score_analysis: accepted
                .score_analysis
                .scores
                .iter()
                .map(|(&name, &score)| (name.to_owned(), score))
                .collect(),
            routes,
            unassigned_visits,
            metrics,
        }
    }

    /// Attaches road geometry and road totals to every route, depot to depot.
    #[instrument(skip_all, level = "debug")]
    pub async fn attach_road_network(
        &mut self,
        accepted: &AcceptedSolution,
        client: &TravelMatrixClient,
    ) {
        let solution = &accepted.solution;
        let problem = solution.problem();

        let paths = self
            .routes
            .iter()
            .map(|route| {
                let mut path: Vec<Location> = Vec::with_capacity(route.stops.len() + 2);
                let depot = problem
                    .vehicle_idx(&route.vehicle_id)
                    .map(|vehicle_id: VehicleIdx| problem.vehicle(vehicle_id).depot().clone());

                path.extend(depot.clone());
                path.extend(route.stops.iter().filter_map(|stop| {
                    problem
                        .visit_idx(&stop.visit_id)
                        .map(|visit_id| problem.visit(visit_id).location().clone())
                }));
                path.extend(depot);
                path
            })
            .collect::<Vec<_>>();

        let rendered = join_all(
            paths
                .iter()
                .map(|path| join(client.fetch_geometry(path), client.fetch_path_legs(path))),
        )
        .await;

        for (route, (geometry, legs)) in self.routes.iter_mut().zip(rendered) {
            let meters = legs.iter().map(|leg| leg.meters).sum::<f64>();
            let seconds = legs.iter().map(|leg| leg.seconds).sum::<f64>();

            route.geometry = Some(geometry);
            route.road_distance_km = Some(round_km(meters / 1000.0));
            route.road_minutes = Some((seconds / 60.0).ceil() as i64);
        }
    }
}
