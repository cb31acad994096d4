use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use ruta_optimizer::{
    json::types::JsonRoutePlanRequest,
    solver::{
        accepted_solution::AcceptedSolution, route_plan::RoutePlan, solver::Solver,
        solver_params::SolverParams,
    },
};
use tracing::info;

use crate::{
    config,
    file_utils::{read_json, write_json},
    parsers, summary,
};

#[derive(Args)]
pub struct OptimizeArgs {
    /// The request file
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Overrides the request's optimization time (e.g. "30s", "PT1M")
    #[arg(short, long, value_parser = parsers::parse_duration)]
    timeout: Option<jiff::SignedDuration>,

    /// Result file, stdout when absent
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Adds road geometry and road totals to every route
    #[arg(long)]
    geometry: bool,
}

fn solver_params(
    request: &JsonRoutePlanRequest,
    timeout: Option<jiff::SignedDuration>,
) -> anyhow::Result<SolverParams> {
    let params = request.solver_params()?;

    Ok(match timeout {
        Some(timeout) => SolverParams {
            zone_affinity: params.zone_affinity,
            ..SolverParams::from_optimization_seconds(timeout.as_secs())?
        },
        None => params,
    })
}

pub fn progress_bar() -> anyhow::Result<ProgressBar> {
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::default_spinner().template("{spinner} [{elapsed}] {msg}")?);
    bar.enable_steady_tick(Duration::from_millis(200));
    bar.set_message("constructing...");

    Ok(bar)
}

/// Runs the search on the blocking pool, the runtime keeps driving other tasks.
async fn solve_blocking(solver: Solver) -> anyhow::Result<(Arc<Solver>, AcceptedSolution)> {
    let solver = Arc::new(solver);
    let solution = tokio::task::spawn_blocking({
        let solver = Arc::clone(&solver);
        move || solver.solve()
    })
    .await??;

    Ok((solver, solution))
}

pub async fn run(args: OptimizeArgs) -> anyhow::Result<()> {
    let request: JsonRoutePlanRequest = read_json(&args.input)?;
    let params = solver_params(&request, args.timeout)?;
    let problem = request.build_problem()?;

    info!(
        plan_id = problem.id(),
        vehicles = problem.vehicles().len(),
        visits = problem.visits().len(),
        "Loaded request"
    );

    let mut solver = Solver::new(problem, params)?;

    let bar = progress_bar()?;
    let callback_bar = bar.clone();
    solver.on_best_solution(move |best_solution| {
        callback_bar.set_message(format!(
            "searching... score = {}, vehicles = {}",
            best_solution.score,
            best_solution.solution.used_vehicles_count(),
        ));
    });

    let solved = solve_blocking(solver).await;
    bar.finish_and_clear();
    let (solver, best_solution) = solved?;

    let mut plan = RoutePlan::from_solution(&best_solution, solver.status());

    if args.geometry {
        let client = config::travel_matrix_client_from_env()?;
        plan.attach_road_network(&best_solution, &client).await;
        config::save_leg_cache(&client)?;
    }

    summary::print_summary(&plan);
    write_json(&plan, args.output.as_deref())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use jiff::SignedDuration;
    use ruta_optimizer::solver::{solver::PlanStatus, solver_params::Termination};

    use super::*;

    fn request(json: serde_json::Value) -> JsonRoutePlanRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_timeout_overrides_request() {
        let request = request(serde_json::json!({
            "vehicles": [],
            "visits": [],
            "max_optimization_time_seconds": 60,
            "zone_affinity": true
        }));

        let params = solver_params(&request, Some(SignedDuration::from_secs(10))).unwrap();
        assert_eq!(params.max_duration(), Some(SignedDuration::from_secs(10)));
        assert!(params.zone_affinity);

        let params = solver_params(&request, None).unwrap();
        assert_eq!(params.max_duration(), Some(SignedDuration::from_secs(60)));
    }

    #[test]
    fn test_timeout_out_of_range() {
        let request = request(serde_json::json!({ "vehicles": [], "visits": [] }));

        assert!(solver_params(&request, Some(SignedDuration::from_secs(1))).is_err());
    }

    #[tokio::test]
    async fn test_search_runs_off_the_runtime_thread() {
        let request = request(serde_json::json!({
            "id": "plan-1",
            "planning_start": "2025-06-10T08:00:00Z",
            "vehicles": [{ "id": "truck-1", "depot": [-70.65, -33.45] }],
            "visits": [
                { "id": "visit-1", "coordinates": [-70.64, -33.44] },
                { "id": "visit-2", "coordinates": [-70.60, -33.40] }
            ]
        }));
        let params = SolverParams::default().with_termination(Termination::Iterations(50));
        let mut solver = Solver::new(request.build_problem().unwrap(), params).unwrap();

        // The listener blocks until a task on this single-threaded runtime answers.
        let (sender, receiver) = std::sync::mpsc::channel::<()>();
        let answered = Arc::new(AtomicBool::new(false));
        let listener_answered = Arc::clone(&answered);
        solver.on_best_solution(move |_| {
            if receiver.recv_timeout(Duration::from_secs(5)).is_ok() {
                listener_answered.store(true, Ordering::Relaxed);
            }
        });

        let (solved, _) = tokio::join!(solve_blocking(solver), async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            sender.send(()).unwrap();
        });

        let (solver, solution) = solved.unwrap();
        assert!(answered.load(Ordering::Relaxed));
        assert_eq!(solver.status(), PlanStatus::Optimized);
        assert_eq!(solution.solution.unassigned_count(), 0);
    }
}
