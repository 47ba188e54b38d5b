use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use squad_pulse::aggregate::{
    age_distribution, position_distribution, squad_totals, top_n_by_minutes, unique_players,
};
use squad_pulse::dataset::{parse_csv_records, records_to_csv};
use squad_pulse::mock_roster;

fn bench_aggregate(c: &mut Criterion) {
    let records = mock_roster::generate(7, 200, 20);

    c.bench_function("unique_players", |b| {
        b.iter(|| black_box(unique_players(black_box(&records))).len())
    });
    c.bench_function("position_distribution", |b| {
        b.iter(|| black_box(position_distribution(black_box(&records))).len())
    });
    c.bench_function("age_distribution", |b| {
        b.iter(|| black_box(age_distribution(black_box(&records))).total())
    });
    c.bench_function("top_n_by_minutes", |b| {
        b.iter(|| black_box(top_n_by_minutes(black_box(&records), 5)).len())
    });
    c.bench_function("squad_totals", |b| {
        b.iter(|| black_box(squad_totals(black_box(&records))).players)
    });
}

fn bench_csv_parse(c: &mut Criterion) {
    let records = mock_roster::generate(7, 200, 20);
    let raw = records_to_csv(&records).expect("mock squad should render");

    c.bench_function("csv_parse", |b| {
        b.iter(|| {
            let rows = parse_csv_records(black_box(&raw)).unwrap();
            black_box(rows.len());
        })
    });
}

criterion_group!(benches, bench_aggregate, bench_csv_parse);
criterion_main!(benches);
