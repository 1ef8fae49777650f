//! End-to-end tests over the full pipeline
//!
//! These tests run the whole flow against the fixture roster: load and clean
//! the CSV, estimate power levels, train both models, build the affiliation
//! network, and exercise the API router in-process.

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use powerverse::api::{self, AppState};
use powerverse::dataset::Dataset;
use powerverse::features::TfidfVectorizer;
use powerverse::models::PowerLevel;
use powerverse::network::AffiliationNetwork;
use powerverse::predictor::{
    PowerPredictor, PowerTrainConfig, RolePredictor, RoleTrainConfig,
};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/characters.csv")
}

fn load_fixture() -> Dataset {
    let (mut dataset, _) = Dataset::load(&fixture_path()).expect("fixture loads");
    dataset.estimate_power_levels();
    dataset
}

fn small_power_config() -> PowerTrainConfig {
    PowerTrainConfig {
        num_trees: 10,
        max_depth: 3,
        ..PowerTrainConfig::default()
    }
}

#[test]
fn test_load_cleans_and_dedupes() {
    let (dataset, report) = Dataset::load(&fixture_path()).expect("fixture loads");
    // 19 raw rows, one duplicate Spider-Man
    assert_eq!(report.total_input, 19);
    assert_eq!(report.duplicates_removed, 1);
    assert_eq!(dataset.len(), 18);

    // Hyphenated names keep the capital after the separator
    let spidey = dataset.get("Spider-Man").expect("Spider-Man kept");
    // First occurrence wins, so the real powers survive
    assert!(spidey.powers_text.contains("wall-crawling"));
}

#[test]
fn test_power_level_estimation() {
    let dataset = load_fixture();
    assert_eq!(dataset.get("Thor").unwrap().power_level, PowerLevel::High);
    assert_eq!(dataset.get("Magneto").unwrap().power_level, PowerLevel::High);
    assert_eq!(dataset.get("Deadpool").unwrap().power_level, PowerLevel::Medium);
    assert_eq!(dataset.get("Punisher").unwrap().power_level, PowerLevel::Low);
}

#[test]
fn test_power_training_and_bundle_round_trip() {
    let dataset = load_fixture();
    let (predictor, report) =
        PowerPredictor::train(&dataset, &small_power_config()).expect("training succeeds");

    assert!(report.rmse.is_finite());
    assert!(report.train_size + report.test_size == dataset.len());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("power.json");
    predictor.save(&path).expect("save succeeds");

    let loaded = PowerPredictor::load(&path).expect("load succeeds");
    let before = predictor
        .predict_power_level("Hero", PowerLevel::High)
        .unwrap();
    let after = loaded.predict_power_level("Hero", PowerLevel::High).unwrap();
    assert_eq!(before, after);
    assert!((1.0..=10.0).contains(&after));
}

#[test]
fn test_role_training_and_text_prediction() {
    let dataset = load_fixture();
    let documents: Vec<&str> = dataset
        .records()
        .iter()
        .map(|r| r.powers_text.as_str())
        .collect();
    let vectorizer = TfidfVectorizer::fit(&documents, 2);
    let features = vectorizer.transform_all(&documents);
    let labels: Vec<String> = dataset
        .records()
        .iter()
        .map(|r| r.role_label.clone())
        .collect();

    let config = RoleTrainConfig {
        num_trees: 10,
        max_depth: 3,
        ..RoleTrainConfig::default()
    };
    let (predictor, report) =
        RolePredictor::train(&features, &labels, vectorizer.feature_names(), &config)
            .expect("training succeeds");

    assert_eq!(report.classes.len(), 3);
    assert!((0.0..=1.0).contains(&report.accuracy));

    let (label, proba) = predictor
        .predict_role_from_text("superhuman strength and energy projection", &vectorizer)
        .expect("prediction succeeds");
    assert!(report.classes.contains(&label));
    let total: f64 = proba.values().sum();
    assert!((total - 1.0).abs() < 1e-9);

    // Bundle round trip keeps the vectorizer paired with the model
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("role.json");
    predictor.save(vectorizer, &path).expect("save succeeds");
    let (loaded, loaded_vec) = RolePredictor::load(&path).expect("load succeeds");
    let (label_again, _) = loaded
        .predict_role_from_text("superhuman strength and energy projection", &loaded_vec)
        .unwrap();
    assert_eq!(label, label_again);
}

#[test]
fn test_network_build_and_export() {
    let dataset = load_fixture();
    let mut network = AffiliationNetwork::new(42);
    network.build(&dataset);

    assert_eq!(network.node_count(), dataset.len());
    // Avengers: Spider-Man, Iron Man, Thor, Doctor Strange, Hawkeye -> C(5,2)
    let connections = network.connections("Iron Man").expect("Iron Man exists");
    assert_eq!(connections.len(), 4);
    assert!(connections.contains(&"Thor".to_string()));

    // Unaffiliated characters have no edges
    assert_eq!(network.connections("Deadpool").unwrap().len(), 0);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("network.json");
    network.export(&path).expect("export succeeds");

    let raw = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed["nodes"].as_array().unwrap().len(), dataset.len());
    assert!(parsed["links"].as_array().unwrap().len() >= 10);
    // Every node carries layout coordinates in the unit square
    for node in parsed["nodes"].as_array().unwrap() {
        let x = node["x"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&x));
    }
}

#[test]
fn test_layout_is_deterministic_across_builds() {
    let dataset = load_fixture();
    let mut first = AffiliationNetwork::new(42);
    first.build(&dataset);
    let mut second = AffiliationNetwork::new(42);
    second.build(&dataset);

    let a = serde_json::to_string(&first.to_json().unwrap()).unwrap();
    let b = serde_json::to_string(&second.to_json().unwrap()).unwrap();
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// API
// ---------------------------------------------------------------------------

fn test_state() -> AppState {
    let dataset = load_fixture();
    let (predictor, _) =
        PowerPredictor::train(&dataset, &small_power_config()).expect("training succeeds");
    AppState::new(dataset, predictor)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_api_status() {
    let app = api::router(test_state());
    let response = app
        .oneshot(Request::get("/api/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["dataLoaded"], true);
    assert_eq!(json["characterCount"], 18);
}

#[tokio::test]
async fn test_api_characters() {
    let app = api::router(test_state());
    let response = app
        .oneshot(Request::get("/api/characters").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let characters = json.as_array().unwrap();
    assert_eq!(characters.len(), 18);
    assert!(characters
        .iter()
        .any(|c| c["name"] == "Thor" && c["powerLevel"] == "High"));
}

#[tokio::test]
async fn test_api_predict_power_attributes() {
    let app = api::router(test_state());
    let payload = serde_json::json!({
        "strength": 5, "speed": 5, "durability": 5,
        "intelligence": 5, "energyProjection": 5, "fightingSkills": 5
    });
    let response = app
        .oneshot(
            Request::post("/api/predict-power")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    // All-fives inputs average to exactly 5.0 under the attribute weighting
    assert_eq!(json["powerLevel"], 5.0);
    assert_eq!(json["powerCategory"], "Medium");
}

#[tokio::test]
async fn test_api_predict_power_legacy() {
    let app = api::router(test_state());
    let payload = serde_json::json!({"heroVillain": "hero", "estimatedPowerLevel": 9.0});
    let response = app
        .oneshot(
            Request::post("/api/predict-power")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let score = json["powerLevel"].as_f64().unwrap();
    assert!((1.0..=10.0).contains(&score));
}

#[tokio::test]
async fn test_api_predict_power_legacy_label() {
    let app = api::router(test_state());
    // The front-end form sends the bucket as a label, not a number
    let payload = serde_json::json!({"heroVillain": "Hero", "estimatedPowerLevel": "High"});
    let response = app
        .oneshot(
            Request::post("/api/predict-power")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let score = json["powerLevel"].as_f64().unwrap();
    assert!((1.0..=10.0).contains(&score));
}

#[tokio::test]
async fn test_api_predict_power_legacy_unknown_label() {
    let app = api::router(test_state());
    let payload = serde_json::json!({"heroVillain": "Hero", "estimatedPowerLevel": "colossal"});
    let response = app
        .oneshot(
            Request::post("/api/predict-power")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_api_predict_power_bad_payload() {
    let app = api::router(test_state());
    let response = app
        .oneshot(
            Request::post("/api/predict-power")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"unexpected": true}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().unwrap().contains("attributes"));
}
