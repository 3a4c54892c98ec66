//! Benchmark tour ordering and route search.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use marga::planning::{BranchAndBound, NearestNeighbor, TourStrategy};
use marga::{Bearing, Cell, GridMap, MotionPlanner, Obstacle, RouteSearch};

/// Deterministic spread of stops over the arena.
fn stops(n: usize) -> Vec<Cell> {
    (0..n)
        .map(|i| {
            let i = i as i32;
            Cell::new((i * 7 + 3) % 20, (i * 11 + 5) % 20)
        })
        .collect()
}

fn layout() -> Vec<Obstacle> {
    vec![
        Obstacle::new(0, 7, 1, Bearing::West),
        Obstacle::new(1, 15, 14, Bearing::North),
        Obstacle::new(2, 4, 9, Bearing::South),
        Obstacle::new(3, 12, 6, Bearing::East),
        Obstacle::new(4, 17, 3, Bearing::West),
    ]
}

fn bench_tour(c: &mut Criterion) {
    let mut group = c.benchmark_group("tour");
    let start = Cell::new(1, 18);

    for n in [4, 6, 8].iter() {
        let cells = stops(*n);
        group.bench_with_input(BenchmarkId::new("branch_and_bound", n), n, |b, _| {
            b.iter(|| black_box(BranchAndBound.order(start, black_box(&cells))))
        });
        group.bench_with_input(BenchmarkId::new("nearest_neighbor", n), n, |b, _| {
            b.iter(|| black_box(NearestNeighbor.order(start, black_box(&cells))))
        });
    }

    group.finish();
}

fn bench_route_search(c: &mut Criterion) {
    let mut grid = GridMap::default();
    if grid.populate(&layout()).is_err() {
        return;
    }
    let search = RouteSearch::default();

    c.bench_function("route_search_corner_to_corner", |b| {
        b.iter(|| {
            black_box(search.find(
                &grid,
                black_box(Cell::new(1, 18)),
                Bearing::North,
                black_box(Cell::new(18, 1)),
            ))
        })
    });
}

fn bench_mission(c: &mut Criterion) {
    let planner = MotionPlanner::default();
    let obstacles = layout();

    c.bench_function("plan_five_obstacles", |b| {
        b.iter(|| black_box(planner.plan(black_box(&obstacles))))
    });
}

criterion_group!(benches, bench_tour, bench_route_search, bench_mission);
criterion_main!(benches);
