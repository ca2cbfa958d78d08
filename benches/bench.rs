// Criterion benchmarks for Pet Matcher

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pet_matcher::core::{normalize_preferences, CandidateTable, MatchClassifier, Matcher};
use serde_json::{json, Map, Value};
use std::sync::Arc;

const MODEL: &str = include_str!("../tests/fixtures/pet_matcher_model.json");

fn create_pet(id: usize) -> Map<String, Value> {
    let species = ["dog", "cat", "rabbit"];
    let breeds = ["beagle", "labrador", "persian", "poodle", "siamese"];
    json!({
        "animal_id": format!("A{}", id),
        "species": species[id % species.len()],
        "breed": breeds[id % breeds.len()],
        "age": (id % 8) + 1,
        "weight": if id % 2 == 0 { json!(12.5) } else { json!(25) },
        "sex": if id % 2 == 0 { "female" } else { "male" },
    })
    .as_object()
    .cloned()
    .unwrap()
}

fn answers() -> Value {
    json!({
        "a1": "house",
        "a3": false,
        "p1": ["dog"],
        "p2": {"fromAge": "1", "toAge": "5"},
        "p3": ["medium"],
        "p4": ["active"]
    })
}

fn bench_normalize(c: &mut Criterion) {
    let raw = answers();
    c.bench_function("normalize_preferences", |b| {
        b.iter(|| normalize_preferences(black_box(&raw)))
    });
}

fn bench_find_matches(c: &mut Criterion) {
    let matcher = Matcher::new(Arc::new(MatchClassifier::from_json_str(MODEL).unwrap()));
    let preferences = normalize_preferences(&answers()).unwrap();

    let mut group = c.benchmark_group("find_matches");
    for size in [100, 1_000, 10_000] {
        let table = CandidateTable::from_documents((0..size).map(create_pet).collect()).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &table, |b, table| {
            b.iter(|| matcher.find_matches(black_box(table), black_box(&preferences), 15))
        });
    }
    group.finish();
}

fn bench_build_table(c: &mut Criterion) {
    let docs: Vec<Map<String, Value>> = (0..1_000).map(create_pet).collect();
    c.bench_function("candidate_table_1000", |b| {
        b.iter(|| CandidateTable::from_documents(black_box(docs.clone())))
    });
}

criterion_group!(benches, bench_normalize, bench_find_matches, bench_build_table);
criterion_main!(benches);
