use std::{hint::black_box, sync::Arc};

use criterion::{Criterion, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use ruta_optimizer::{
    problem::{
        amount::Amount,
        location::Location,
        vehicle::VehicleBuilder,
        vehicle_routing_problem::{VehicleRoutingProblem, VehicleRoutingProblemBuilder},
        visit::VisitBuilder,
    },
    solver::{
        constraints::constraint_set::ConstraintSet,
        construction::construct_solution::construct_solution,
    },
};

fn random_problem(vehicles: usize, visits: usize) -> Arc<VehicleRoutingProblem> {
    let mut rng = SmallRng::seed_from_u64(42);
    let mut builder = VehicleRoutingProblemBuilder::default();

    builder
        .set_id(String::from("bench"))
        .set_solve_start("2025-06-10T08:00:00Z".parse().unwrap());

    for index in 0..vehicles {
        let mut vehicle = VehicleBuilder::default();
        vehicle
            .set_vehicle_id(format!("vehicle-{index}"))
            .set_depot(Location::from_lat_lon(-33.45, -70.65))
            .set_capacity(Amount::quantity(50.0));
        builder.add_vehicle(vehicle.build().unwrap());
    }

    for index in 0..visits {
        let mut visit = VisitBuilder::default();
        visit
            .set_external_id(format!("visit-{index}"))
            .set_location(Location::from_lat_lon(
                rng.random_range(-33.60..-33.30),
                rng.random_range(-70.80..-70.50),
            ))
            .set_demand(Amount::quantity(rng.random_range(1.0..5.0)));
        builder.add_visit(visit.build().unwrap());
    }

    Arc::new(builder.build().unwrap())
}

fn scoring_benchmark(c: &mut Criterion) {
    let problem = random_problem(10, 200);
    let solution = construct_solution(problem).unwrap();
    let constraints = ConstraintSet::default();

    c.bench_function("compute score (200 visits)", |b| {
        b.iter(|| constraints.compute_score(black_box(&solution)))
    });
}

fn propagation_benchmark(c: &mut Criterion) {
    let problem = random_problem(10, 200);
    let mut solution = construct_solution(problem).unwrap();

    c.bench_function("propagate all (200 visits)", |b| {
        b.iter(|| black_box(&mut solution).propagate_all())
    });
}

fn construction_benchmark(c: &mut Criterion) {
    let problem = random_problem(10, 200);

    c.bench_function("construct solution (200 visits)", |b| {
        b.iter(|| construct_solution(Arc::clone(black_box(&problem))))
    });
}

criterion_group!(
    benches,
    scoring_benchmark,
    propagation_benchmark,
    construction_benchmark
);
criterion_main!(benches);
