use chrono::{Days, NaiveDate};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use cycle_engine::algorithms::{forecast_cycle, predict_phase, PhaseEvidence};
use cycle_engine::models::{CycleRecord, Severity, SymptomObservation};
use cycle_engine::parsing::{history_to_json, parse_history_json_str};

fn build_history(cycles: usize) -> Vec<CycleRecord> {
    let mut start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
    let mut history = Vec::with_capacity(cycles * 2);
    for i in 0..cycles {
        history.push(CycleRecord::period(start).with_period_end(start + Days::new(4)));
        let day = start + Days::new(13);
        history.push(
            CycleRecord::observation(day)
                .with_basal_temp(36.4 + (i % 3) as f64 * 0.1)
                .with_lh_test(i % 2 == 0),
        );
        start = start + Days::new(26 + (i % 5) as u64);
    }
    history
}

fn bench_predict_phase(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict_phase");

    for cycles in [1usize, 12, 120, 1200] {
        let history = build_history(cycles);
        let target = history
            .iter()
            .filter_map(|r| r.period_start)
            .max()
            .unwrap()
            + Days::new(14);
        let evidence = PhaseEvidence::new()
            .with_basal_temp(36.6)
            .with_lh_test(true)
            .with_symptoms(vec![SymptomObservation::new(
                "ovulation pain",
                "physical",
                Severity::Mild,
                target,
            )]);

        group.bench_with_input(BenchmarkId::new("cycles", cycles), &history, |b, history| {
            b.iter(|| predict_phase(black_box(history), black_box(target), &evidence));
        });
    }

    group.finish();
}

fn bench_forecast(c: &mut Criterion) {
    let mut group = c.benchmark_group("forecast_cycle");

    let history = build_history(120);
    let target = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    group.bench_function("120_cycles", |b| {
        b.iter(|| forecast_cycle(black_box(&history), target, &PhaseEvidence::new()));
    });

    group.finish();
}

fn bench_history_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("history_parsing");

    for cycles in [12usize, 120] {
        let json = history_to_json(&build_history(cycles)).unwrap();
        group.bench_with_input(BenchmarkId::new("cycles", cycles), &json, |b, json| {
            b.iter(|| parse_history_json_str(black_box(json)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_predict_phase,
    bench_forecast,
    bench_history_parsing
);
criterion_main!(benches);
