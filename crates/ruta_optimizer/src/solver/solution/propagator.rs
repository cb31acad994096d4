use std::sync::Arc;

use crate::{
    problem::{amount::Amount, visit::VisitIdx},
    utils::time::add_minutes,
};

use super::{shadow::ShadowState, working_solution::WorkingSolution};

/// Recomputes the derived state of `visit_id` and of every visit following it in its chain.
///
/// An unassigned visit gets a zeroed state and nothing is propagated. Times saturate at the
/// bounds of `Timestamp` instead of overflowing. The walk is bounded by the
/// number of visits so a corrupted topology cannot loop forever.
pub fn recompute(solution: &mut WorkingSolution, visit_id: VisitIdx) {
    let problem = Arc::clone(solution.problem());
    let mut current = Some(visit_id);
    let mut remaining = problem.visits().len();

    while let Some(visit_id) = current {
        if remaining == 0 {
            break;
        }
        remaining -= 1;

        let Some(vehicle_id) = solution.vehicle_of(visit_id) else {
            solution.set_shadow(visit_id, ShadowState::default());
            return;
        };

        let vehicle = problem.vehicle(vehicle_id);
        let visit = problem.visit(visit_id);
        let predecessor = solution.predecessor_of(visit_id);
        let leg = problem.leg_to_visit(vehicle_id, predecessor, visit_id);

        let depot_departure = vehicle.departure_from_depot(problem.solve_start());
        let (ready_at, accumulated_before) = match predecessor {
            Some(predecessor) => {
                let shadow = solution.shadow(predecessor);
                (
                    shadow.departure_time.unwrap_or(depot_departure),
                    shadow.accumulated,
                )
            }
            None => (depot_departure, Amount::ZERO),
        };

        let arrival_time = add_minutes(ready_at, leg.minutes);
        let service_start = match visit.time_window().start() {
            Some(start) if start > arrival_time => start,
            _ => arrival_time,
        };
        let departure_time =
            add_minutes(service_start, problem.effective_service_minutes(visit_id));

        solution.set_shadow(
            visit_id,
            ShadowState {
                arrival_time: Some(arrival_time),
                departure_time: Some(departure_time),
                waiting_duration: service_start.duration_since(arrival_time),
                distance_from_predecessor_km: leg.distance_km,
                travel_minutes_from_predecessor: leg.minutes,
                accumulated: accumulated_before + *visit.demand(),
            },
        );

        current = solution.successor_of(visit_id);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use jiff::{SignedDuration, Timestamp};

    use super::*;
    use crate::{
        problem::{time_window::TimeWindow, vehicle::VehicleIdx},
        test_utils::{self, TestVisit},
    };

    fn ts(value: &str) -> Timestamp {
        value.parse().unwrap()
    }

    fn ids(values: &[usize]) -> Vec<VisitIdx> {
        values.iter().copied().map(VisitIdx::new).collect()
    }

    fn three_in_a_row() -> WorkingSolution {
        let problem = Arc::new(test_utils::create_test_problem(
            vec![test_utils::vehicle("v1")],
            vec![
                TestVisit::at(0.0, 0.01).demand(10.0).service(5),
                TestVisit::at(0.0, 0.02).demand(10.0).service(5),
                TestVisit::at(0.0, 0.03).demand(10.0).service(5),
            ],
        ));

        WorkingSolution::from_routes(problem, &[(VehicleIdx::new(0), ids(&[0, 1, 2]))]).unwrap()
    }

    #[test]
    fn test_arrival_and_departure_chain() {
        let solution = three_in_a_row();

        // 1.112 km at 40 km/h rounds up to 2 minutes
        let first = solution.shadow(VisitIdx::new(0));
        assert_eq!(first.arrival_time, Some(ts("2025-06-10T08:02:00Z")));
        assert_eq!(first.departure_time, Some(ts("2025-06-10T08:07:00Z")));

        let second = solution.shadow(VisitIdx::new(1));
        assert_eq!(second.arrival_time, Some(ts("2025-06-10T08:09:00Z")));
        assert_eq!(second.travel_minutes_from_predecessor, 2);
        assert_eq!(second.distance_from_predecessor_meters(), 1112);

        let third = solution.shadow(VisitIdx::new(2));
        assert_eq!(third.departure_time, Some(ts("2025-06-10T08:21:00Z")));
        assert_eq!(third.accumulated.quantity, 30.0);
    }

    #[test]
    fn test_waits_for_time_window_start() {
        let problem = Arc::new(test_utils::create_test_problem(
            vec![test_utils::vehicle("v1")],
            vec![
                TestVisit::at(0.0, 0.01)
                    .service(10)
                    .window(Some("2025-06-10T09:00:00Z"), None),
            ],
        ));
        let solution =
            WorkingSolution::from_routes(problem, &[(VehicleIdx::new(0), ids(&[0]))]).unwrap();

        let shadow = solution.shadow(VisitIdx::new(0));
        assert_eq!(shadow.arrival_time, Some(ts("2025-06-10T08:02:00Z")));
        assert_eq!(shadow.waiting_duration, SignedDuration::from_mins(58));
        assert_eq!(shadow.departure_time, Some(ts("2025-06-10T09:10:00Z")));
    }

    #[test]
    fn test_unassigned_visit_is_zeroed() {
        let mut solution = three_in_a_row();
        solution.unassign(VisitIdx::new(1));

        assert_eq!(solution.shadow(VisitIdx::new(1)), &ShadowState::default());
        // the last visit now follows the first one directly
        let third = solution.shadow(VisitIdx::new(2));
        assert_eq!(third.accumulated.quantity, 20.0);
        assert!((third.distance_from_predecessor_km - 2.224).abs() < 1e-3);
    }

    #[test]
    fn test_propagation_is_idempotent() {
        let mut solution = three_in_a_row();
        let before = solution.clone();

        solution.propagate_all();
        assert!(solution.is_equivalent(&before));

        recompute(&mut solution, VisitIdx::new(0));
        recompute(&mut solution, VisitIdx::new(0));
        assert!(solution.is_equivalent(&before));
    }

    #[test]
    fn test_load_is_monotonic_along_chains() {
        let solution = three_in_a_row();
        let loads = solution
            .chain(VehicleIdx::new(0))
            .map(|visit_id| solution.shadow(visit_id).accumulated)
            .collect::<Vec<_>>();

        assert!(loads.windows(2).all(|pair| pair[1].dominates(&pair[0])));
    }

    #[test]
    fn test_arrival_respects_predecessor_departure() {
        let solution = three_in_a_row();

        for visit_id in solution.chain(VehicleIdx::new(0)) {
            let shadow = solution.shadow(visit_id);
            let ready_at = match solution.predecessor_of(visit_id) {
                Some(predecessor) => solution.shadow(predecessor).departure_time.unwrap(),
                None => solution.problem().solve_start(),
            };

            assert!(
                shadow.arrival_time.unwrap()
                    >= ready_at + SignedDuration::from_mins(shadow.travel_minutes_from_predecessor)
            );
        }
    }

    #[test]
    fn test_first_visit_leaves_at_shift_start() {
        let problem = Arc::new(test_utils::create_test_problem_starting_at(
            ts("2025-06-10T06:00:00Z"),
            vec![test_utils::vehicle_with_shift(
                "v1",
                TimeWindow::from_iso(Some("2025-06-10T08:00:00Z"), Some("2025-06-10T18:00:00Z"))
                    .unwrap(),
            )],
            vec![TestVisit::at(0.0, 0.01)],
        ));
        let solution =
            WorkingSolution::from_routes(problem, &[(VehicleIdx::new(0), ids(&[0]))]).unwrap();

        assert_eq!(
            solution.shadow(VisitIdx::new(0)).arrival_time,
            Some(ts("2025-06-10T08:02:00Z"))
        );
    }

    #[test]
    fn test_huge_service_time_saturates() {
        let problem = Arc::new(test_utils::create_test_problem(
            vec![test_utils::vehicle("v1")],
            vec![
                TestVisit::at(0.0, 0.01).service(i64::MAX / 2),
                TestVisit::at(0.0, 0.02),
            ],
        ));
        let solution =
            WorkingSolution::from_routes(problem, &[(VehicleIdx::new(0), ids(&[0, 1]))]).unwrap();

        let first = solution.shadow(VisitIdx::new(0));
        assert!(first.departure_time.unwrap() > first.arrival_time.unwrap());

        let second = solution.shadow(VisitIdx::new(1));
        assert!(second.arrival_time.unwrap() >= first.departure_time.unwrap());
    }

    #[test]
    fn test_crawling_vehicle_saturates_at_timestamp_max() {
        let problem = Arc::new(test_utils::create_test_problem(
            vec![test_utils::vehicle_with_speed("v1", 1e-12)],
            vec![TestVisit::at(0.0, 0.01), TestVisit::at(0.0, 0.02)],
        ));
        let solution =
            WorkingSolution::from_routes(problem, &[(VehicleIdx::new(0), ids(&[0, 1]))]).unwrap();

        let second = solution.shadow(VisitIdx::new(1));
        assert_eq!(second.arrival_time, Some(Timestamp::MAX));
        assert_eq!(second.departure_time, Some(Timestamp::MAX));
    }
}
