use comfy_table::{Table, presets::UTF8_FULL};
use ruta_optimizer::solver::route_plan::RoutePlan;

/// One row per route plus a totals row.
pub fn plan_table(plan: &RoutePlan) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Vehicle", "Stops", "Km", "Travel", "Service", "Wait", "Total", "Cost",
    ]);

    for route in &plan.routes {
        table.add_row(vec![
            route.vehicle_id.clone(),
            route.stops.len().to_string(),
            format!("{:.3}", route.distance_km),
            route.travel_minutes.to_string(),
            route.service_minutes.to_string(),
            route.wait_minutes.to_string(),
            route.total_minutes.to_string(),
            format!("{:.2}", route.cost),
        ]);
    }

    let metrics = &plan.metrics;
    table.add_row(vec![
        String::from("total"),
        metrics.assigned_visits.to_string(),
        format!("{:.3}", metrics.total_km),
        metrics.travel_minutes.to_string(),
        metrics.service_minutes.to_string(),
        metrics.wait_minutes.to_string(),
        metrics.total_minutes.to_string(),
        format!("{:.2}", metrics.total_cost),
    ]);

    table
}

pub fn print_summary(plan: &RoutePlan) {
    eprintln!("{}", plan_table(plan));
    eprintln!("plan {} {:?} score {}", plan.id, plan.status, plan.score);

    if !plan.unassigned_visits.is_empty() {
        eprintln!("unassigned: {}", plan.unassigned_visits.join(", "));
    }
}
