// Unit tests for Pet Matcher's public API

use pet_matcher::core::{
    normalize_preferences, CandidateTable, MatchClassifier, Matcher, ScoringError,
};
use pet_matcher::models::AdopterPreferences;
use serde_json::{json, Map, Value};
use std::sync::Arc;

const MODEL: &str = include_str!("fixtures/pet_matcher_model.json");

fn matcher() -> Matcher {
    Matcher::new(Arc::new(MatchClassifier::from_json_str(MODEL).unwrap()))
}

fn create_pet(id: usize, species: &str, age: u32) -> Map<String, Value> {
    json!({
        "animal_id": id,
        "species": species,
        "breed": "labrador",
        "age": age,
        "weight": 25.0,
        "sex": "female"
    })
    .as_object()
    .cloned()
    .unwrap()
}

fn create_table(n: usize) -> CandidateTable {
    let species = ["dog", "cat", "rabbit"];
    let pets = (0..n)
        .map(|i| create_pet(i, species[i % 3], (i % 8) as u32 + 1))
        .collect();
    CandidateTable::from_documents(pets).unwrap()
}

fn active_dog_lover() -> AdopterPreferences {
    normalize_preferences(&json!({
        "a1": "house",
        "a3": false,
        "p1": ["dog"],
        "p2": {"fromAge": "1", "toAge": "5"},
        "p3": ["medium"],
        "p4": ["active"]
    }))
    .unwrap()
}

#[test]
fn test_fixture_model_loads() {
    let classifier = MatchClassifier::from_json_str(MODEL).unwrap();
    assert_eq!(classifier.n_features(), 12);
    assert_eq!(classifier.feature_cols()[0], "Species");
}

#[test]
fn test_result_length_is_min_of_k_and_candidates() {
    let matcher = matcher();
    let prefs = active_dog_lover();

    for (n, k) in [(20, 15), (5, 15), (15, 15), (1, 3), (30, 1)] {
        let result = matcher.find_matches(&create_table(n), &prefs, k).unwrap();
        assert_eq!(result.matches.len(), n.min(k), "n={} k={}", n, k);
        assert_eq!(result.total_candidates, n);
    }
}

#[test]
fn test_scores_sorted_and_bounded() {
    let result = matcher()
        .find_matches(&create_table(40), &active_dog_lover(), 40)
        .unwrap();

    for pair in result.matches.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    for m in &result.matches {
        assert!((0.0..=100.0).contains(&m.score), "Score {} out of range", m.score);
    }
}

#[test]
fn test_known_scores() {
    let table = CandidateTable::from_documents(vec![
        create_pet(1, "dog", 7),
        create_pet(2, "dog", 2),
        create_pet(3, "cat", 3),
    ])
    .unwrap();

    let result = matcher().find_matches(&table, &active_dog_lover(), 15).unwrap();
    let ranked: Vec<(Value, f64)> = result
        .matches
        .into_iter()
        .map(|m| (m.animal_id, m.score))
        .collect();

    assert_eq!(
        ranked,
        vec![(json!(2), 77.5), (json!(3), 72.5), (json!(1), 57.5)]
    );
}

#[test]
fn test_allergies_and_activity_change_scores() {
    let table = CandidateTable::from_documents(vec![create_pet(1, "cat", 3)]).unwrap();
    let matcher = matcher();

    let allergic_calm = normalize_preferences(&json!({"a3": "yes", "p4": ["Calm"]})).unwrap();
    let result = matcher.find_matches(&table, &allergic_calm, 1).unwrap();

    // (0.1 + 0.45) / 2
    assert_eq!(result.matches[0].score, 27.5);
}

#[test]
fn test_unseen_and_missing_values_do_not_fail() {
    let mut odd = create_pet(1, "hamster", 40);
    odd.remove("breed");
    odd.insert("weight".to_string(), json!(0.35));
    let table = CandidateTable::from_documents(vec![odd]).unwrap();

    let result = matcher().find_matches(&table, &AdopterPreferences::default(), 5).unwrap();
    assert_eq!(result.matches.len(), 1);
    assert!((0.0..=100.0).contains(&result.matches[0].score));
}

#[test]
fn test_missing_feature_column_errors() {
    let mut pet = create_pet(1, "dog", 2);
    pet.remove("sex");
    let table = CandidateTable::from_documents(vec![pet]).unwrap();

    let err = matcher()
        .find_matches(&table, &AdopterPreferences::default(), 5)
        .unwrap_err();
    assert_eq!(err, ScoringError::MissingFeature("Sex".to_string()));
}

#[test]
fn test_missing_questionnaire_fields_default() {
    let prefs = normalize_preferences(&json!({"a1": "Apartment"})).unwrap();

    assert_eq!(prefs.housing_type, "apartment");
    assert_eq!((prefs.age_min, prefs.age_max), (0, 999));
    assert_eq!(prefs.animal_pref, "");
    assert!(!prefs.allergies);
}
