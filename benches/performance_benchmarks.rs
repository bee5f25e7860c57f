use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use liftlog::advisory::OfflineAdvisor;
use liftlog::analytics::{evaluate_records, AnalyticsConfig, AnalyticsEngine};
use liftlog::search::{SearchConfig, SearchIndex, WorkoutSearch};
use liftlog::{
    parse_workout_text, ExerciseMappingTable, MuscleGroupResolver, OverloadConfig, OverloadSuggester,
    RecoveryConfig, RecoveryTracker, TrainingHistory, WorkoutEntry,
};
use std::sync::Arc;

/// Performance benchmarks for journal analysis
///
/// Histories grow from a few weeks to several years of training so that
/// per-request rebuilds stay cheap as a journal ages.

const ROTATION: [&str; 4] = [
    "bench press - 135 * 10; 185 * 6, 6, 5\nincline dumbbell press - 60 * 10, 9\ntricep pushdown - 50 * 12, 12",
    "squat - 225 * 5, 5, 5\nromanian deadlift - 185 * 8, 8\ncalf raise - 90 * 15\nrun 2 mi",
    "pull-up 10, 8, 7\nbarbell row - 135 * 8, 8\nbicep curl - 30 * 12, 10",
    "overhead press - 95 * 8, 7\nlateral raise - 20 * 15, 12\nplank 60s\nfelt strong",
];

fn create_journal(sessions: usize) -> Vec<WorkoutEntry> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    (0..sessions)
        .map(|i| WorkoutEntry::new(start + Duration::days(i as i64 * 2), ROTATION[i % ROTATION.len()]))
        .collect()
}

fn last_day(entries: &[WorkoutEntry]) -> NaiveDate {
    entries.last().map(|e| e.date + Duration::days(1)).unwrap()
}

fn bench_parsing(c: &mut Criterion) {
    let text = ROTATION.join("\n");
    let mut group = c.benchmark_group("Parsing");
    group.throughput(Throughput::Elements(text.lines().count() as u64));
    group.bench_function("parse_workout_text", |b| {
        b.iter(|| parse_workout_text(black_box(&text)));
    });
    group.finish();
}

fn bench_history(c: &mut Criterion) {
    let resolver = MuscleGroupResolver::builtin();
    let mut group = c.benchmark_group("History");

    for &size in &[10, 100, 1000] {
        let entries = create_journal(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("build", size), &entries, |b, entries| {
            b.iter(|| TrainingHistory::build(black_box(entries), &resolver));
        });
        group.bench_with_input(BenchmarkId::new("evaluate_records", size), &entries, |b, entries| {
            b.iter_batched(
                || entries.clone(),
                |mut entries| evaluate_records(&mut entries, &resolver),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_analytics(c: &mut Criterion) {
    let resolver = MuscleGroupResolver::builtin();
    let config = AnalyticsConfig::default();
    let recovery = RecoveryConfig::default();
    let engine = AnalyticsEngine::new(&config, &recovery.tracked_groups);
    let mut group = c.benchmark_group("Analytics");

    for &size in &[10, 100, 1000] {
        let entries = create_journal(size);
        let history = TrainingHistory::build(&entries, &resolver);
        let today = last_day(&entries);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("all_reports", size), &history, |b, history| {
            b.iter(|| engine.analyze(black_box(history), today));
        });
    }

    group.finish();
}

fn bench_recovery_and_overload(c: &mut Criterion) {
    let table = ExerciseMappingTable::builtin();
    let resolver = MuscleGroupResolver::builtin();
    let recovery = RecoveryConfig::default();
    let overload = OverloadConfig::default();
    let tracker = RecoveryTracker::new(&recovery, &table);
    let suggester = OverloadSuggester::new(&overload, &resolver);

    let entries = create_journal(500);
    let history = TrainingHistory::build(&entries, &resolver);
    let today = last_day(&entries);

    let mut group = c.benchmark_group("Recovery");
    group.bench_function("check", |b| b.iter(|| tracker.check(black_box(&history), today)));
    group.bench_function("suggest_workout", |b| {
        b.iter(|| tracker.suggest_workout(black_box(&history), &suggester, today))
    });
    group.bench_function("overload_suggest", |b| {
        b.iter(|| suggester.suggest(black_box(ROTATION[0]), &history, today))
    });
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let resolver = MuscleGroupResolver::builtin();
    let advisor = OfflineAdvisor::new(Arc::new(ExerciseMappingTable::builtin()));
    let search = WorkoutSearch::new(&advisor);
    let config = SearchConfig::default();
    let mut group = c.benchmark_group("Search");

    for &size in &[100, 1000] {
        let entries = create_journal(size);
        let history = TrainingHistory::build(&entries, &resolver);

        group.bench_with_input(BenchmarkId::new("build_index", size), &entries, |b, entries| {
            b.iter(|| SearchIndex::build(black_box(entries), &history, &config));
        });

        let index = SearchIndex::build(&entries, &history, &config);
        group.bench_with_input(BenchmarkId::new("offline_query", size), &entries, |b, entries| {
            b.iter(|| search.search(black_box("heavy squat"), entries, &history, Some(&index)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parsing,
    bench_history,
    bench_analytics,
    bench_recovery_and_overload,
    bench_search
);
criterion_main!(benches);
