use std::{path::PathBuf, sync::Arc};

use clap::Args;
use jiff::Timestamp;
use ruta_optimizer::{
    json::{
        previous_plan::restore_solution,
        types::{JsonRoutePlanRequest, JsonTrafficEvents, build_traffic_events},
    },
    solver::{route_plan::RoutePlan, solver::Solver},
};
use tracing::info;

use crate::{
    file_utils::{read_json, write_json},
    optimize::progress_bar,
    summary,
};

#[derive(Args)]
pub struct ReoptimizeArgs {
    /// The request the plan was optimized from
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Result of a previous `ruta optimize`
    #[arg(short, long)]
    plan: PathBuf,

    /// Traffic events to apply
    #[arg(short, long)]
    events: PathBuf,

    /// Result file, stdout when absent
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: ReoptimizeArgs) -> anyhow::Result<()> {
    let mut request: JsonRoutePlanRequest = read_json(&args.input)?;
    let previous: RoutePlan = read_json(&args.plan)?;
    let events: JsonTrafficEvents = read_json(&args.events)?;

    request.id.get_or_insert_with(|| previous.id.clone());

    let params = request.solver_params()?;
    let mut traffic_events = request.traffic_events()?;
    traffic_events.extend(build_traffic_events(&events.events)?);
    let at = events.at.unwrap_or_else(Timestamp::now);

    let problem = Arc::new(request.build_problem()?);
    let restored = restore_solution(problem, &previous, params.zone_affinity)?;
    info!(
        plan_id = %previous.id,
        events = traffic_events.len(),
        "Restored plan with score {}",
        restored.score
    );

    let solver = Arc::new(Solver::from_solution(restored, params));

    let bar = progress_bar()?;
    bar.set_message("re-optimizing...");
    let outcome = tokio::task::spawn_blocking({
        let solver = Arc::clone(&solver);
        move || solver.reoptimize(&traffic_events, at, None)
    })
    .await;
    bar.finish_and_clear();
    let outcome = outcome??;

    if outcome.is_unchanged() {
        info!(plan_id = %previous.id, "No visit affected, plan unchanged");
    }

    let plan = RoutePlan::from_solution(outcome.solution(), solver.status());

    summary::print_summary(&plan);
    write_json(&plan, args.output.as_deref())?;

    Ok(())
}
