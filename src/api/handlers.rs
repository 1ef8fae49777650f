//! Handlers for the REST endpoints.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{title_case, PowerLevel};
use crate::predictor::{weighted_power_score, PowerAttributes};

use super::error::{ApiError, ApiResult};
use super::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// One character in the `GET /api/characters` response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterJson {
    pub name: String,
    pub role: String,
    pub affiliation: String,
    pub powers: String,
    pub power_level: String,
}

/// `GET /api/status` response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub data_loaded: bool,
    pub character_count: usize,
}

/// `POST /api/predict-power` accepts either the six-attribute form or the
/// legacy `{heroVillain, estimatedPowerLevel}` form.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PredictPowerRequest {
    Attributes(PowerAttributes),
    Legacy(LegacyPowerRequest),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPowerRequest {
    pub hero_villain: String,
    pub estimated_power_level: EstimatedLevel,
}

/// The legacy form's power level is either a bucket label ("High", "Medium",
/// "Low") or a numeric 1-10 score that gets bucketed by threshold.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum EstimatedLevel {
    Score(f64),
    Label(String),
}

impl EstimatedLevel {
    fn resolve(&self) -> Result<PowerLevel, ApiError> {
        match self {
            EstimatedLevel::Score(score) => Ok(PowerLevel::from_score(*score)),
            EstimatedLevel::Label(label) => PowerLevel::parse(label).ok_or_else(|| {
                ApiError::BadRequest(format!(
                    "Unknown power level '{label}'; expected High, Medium, or Low"
                ))
            }),
        }
    }
}

/// `POST /api/predict-power` response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictPowerResponse {
    pub power_level: f64,
    pub power_category: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/characters
///
/// List all loaded characters with their cleaned fields and estimated
/// power-level bucket.
pub async fn characters(State(state): State<AppState>) -> Json<Vec<CharacterJson>> {
    let out = state
        .dataset
        .records()
        .iter()
        .map(|r| CharacterJson {
            name: r.name.clone(),
            role: r.role_label.clone(),
            affiliation: r.affiliation.clone(),
            powers: r.powers_text.clone(),
            power_level: r.power_level.to_string(),
        })
        .collect();
    Json(out)
}

/// GET /api/status
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
        data_loaded: !state.dataset.is_empty(),
        character_count: state.dataset.len(),
    })
}

/// POST /api/predict-power
///
/// The six-attribute form scores with the fixed attribute weighting; the
/// legacy form runs the trained regressor on `{role, power bucket}`.
pub async fn predict_power(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<PredictPowerResponse>> {
    let request: PredictPowerRequest = serde_json::from_value(body).map_err(|_| {
        ApiError::BadRequest(
            "Expected six numeric attributes (strength, speed, durability, intelligence, \
             energyProjection, fightingSkills) or {heroVillain, estimatedPowerLevel}"
                .to_string(),
        )
    })?;

    let score = match request {
        PredictPowerRequest::Attributes(attrs) => weighted_power_score(&attrs),
        PredictPowerRequest::Legacy(legacy) => {
            let role_label = title_case(&legacy.hero_villain);
            let bucket = legacy.estimated_power_level.resolve()?;
            state
                .predictor
                .predict_power_level(&role_label, bucket)
                .map_err(ApiError::Domain)?
        }
    };

    Ok(Json(PredictPowerResponse {
        power_level: (score * 100.0).round() / 100.0,
        power_category: PowerLevel::from_score(score).to_string(),
    }))
}
