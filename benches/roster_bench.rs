//! Criterion benchmarks for the CP engine and the rostering model.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_roster::cp::{Constraint, CpModel, CpSolver, DepthFirstSolver, SolverConfig, VarSelection};
use u_roster::roster::{
    solve_roster, GeneratorConfig, InstanceGenerator, RosterConfig, RosterInstance,
};

// ===========================================================================
// SEND + MORE = MONEY
// ===========================================================================

fn send_more_money() -> CpModel {
    let mut model = CpModel::new("send_more_money");
    let letters = [
        ("S", 1),
        ("E", 0),
        ("N", 0),
        ("D", 0),
        ("M", 1),
        ("O", 0),
        ("R", 0),
        ("Y", 0),
    ];
    let vars: Vec<_> = letters
        .iter()
        .map(|&(name, min)| model.int_var(name, min, 9).unwrap())
        .collect();
    model
        .register(Constraint::all_different(vars.clone()))
        .unwrap();
    model
        .register(Constraint::linear(
            vars,
            vec![1000, 91, -90, 1, -9000, -900, 10, -1],
            0,
            0,
        ))
        .unwrap();
    model
}

fn bench_send_more_money(c: &mut Criterion) {
    let mut group = c.benchmark_group("send_more_money");
    let model = send_more_money();

    for selection in [VarSelection::FirstUnbound, VarSelection::MinDomain] {
        let config = SolverConfig::default().with_var_selection(selection);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{selection:?}")),
            &config,
            |b, config| b.iter(|| DepthFirstSolver::new().solve(black_box(&model), config)),
        );
    }
    group.finish();
}

// ===========================================================================
// Rostering
// ===========================================================================

fn bench_uniform_roster(c: &mut Criterion) {
    let mut group = c.benchmark_group("roster_uniform");
    group.sample_size(10);

    for (weeks, employees) in [(1usize, 4usize), (2, 4), (2, 6)] {
        let instance = RosterInstance::uniform(weeks, employees, 4, &[1, 1, 1]);
        let config = RosterConfig::default();
        group.bench_with_input(
            BenchmarkId::new(format!("w{weeks}_e{employees}"), employees),
            &(instance, config),
            |b, (instance, config)| b.iter(|| solve_roster(black_box(instance), config)),
        );
    }
    group.finish();
}

fn bench_generated_roster(c: &mut Criterion) {
    let mut group = c.benchmark_group("roster_generated");
    group.sample_size(10);

    let instances: Vec<RosterInstance> = (0..8)
        .map(|seed| InstanceGenerator::new(GeneratorConfig::easy(), seed).generate())
        .collect();
    let config =
        RosterConfig::default().with_solver(SolverConfig::default().with_fail_limit(5_000));
    group.bench_function("easy_x8", |b| {
        b.iter(|| {
            for instance in &instances {
                let _ = solve_roster(black_box(instance), &config);
            }
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_send_more_money,
    bench_uniform_roster,
    bench_generated_roster
);
criterion_main!(benches);
