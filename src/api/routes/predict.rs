//! Prediction and per-team statistics endpoints under `/api/v1/predict`.

use axum::extract::{Path, State};
use axum::Json;

use crate::api::state::AppState;
use crate::api::{ensure_loaded, normalize_code, ApiError};
use crate::calculate;
use crate::models::{
    FeatureReport, GoalRate, GoalStats, GraphStats, HeadToHeadStats, HomeAwayStats,
    MatchPrediction, MomentumStats, StreakStats,
};

/// Resolve a single-team path segment against a loaded store.
fn team_code(state: &AppState, raw: &str) -> Result<String, ApiError> {
    ensure_loaded(state)?;
    normalize_code(raw)
}

fn team_pair(state: &AppState, a: &str, b: &str) -> Result<(String, String), ApiError> {
    ensure_loaded(state)?;
    Ok((normalize_code(a)?, normalize_code(b)?))
}

// ── Head-to-head ────────────────────────────────────────────────

pub async fn history(
    State(state): State<AppState>,
    Path((team_a, team_b)): Path<(String, String)>,
) -> Result<Json<HeadToHeadStats>, ApiError> {
    let (a, b) = team_pair(&state, &team_a, &team_b)?;
    let stats = calculate::head_to_head(
        state.store.as_ref(),
        &a,
        &b,
        state.analytics.recent_matches_limit,
    )?;
    Ok(Json(stats))
}

// ── Team statistics ─────────────────────────────────────────────

pub async fn goals(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<GoalStats>, ApiError> {
    let code = team_code(&state, &code)?;
    Ok(Json(calculate::goal_stats(state.store.as_ref(), &code)))
}

pub async fn streaks(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StreakStats>, ApiError> {
    let code = team_code(&state, &code)?;
    Ok(Json(calculate::streak_stats(state.store.as_ref(), &code)))
}

pub async fn home_away(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<HomeAwayStats>, ApiError> {
    let code = team_code(&state, &code)?;
    Ok(Json(calculate::home_away(state.store.as_ref(), &code)))
}

pub async fn momentum(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<MomentumStats>, ApiError> {
    let code = team_code(&state, &code)?;
    Ok(Json(calculate::momentum(
        state.store.as_ref(),
        &code,
        state.analytics.momentum_span,
    )))
}

pub async fn graph(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<GraphStats>, ApiError> {
    let code = team_code(&state, &code)?;
    Ok(Json(calculate::indirect_wins(state.store.as_ref(), &code)))
}

// ── Feature availability ────────────────────────────────────────

pub async fn goal_percentage(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<FeatureReport<GoalRate>>, ApiError> {
    let code = team_code(&state, &code)?;
    Ok(Json(calculate::goal_percentage(state.store.as_ref(), &code)))
}

pub async fn effectiveness(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<FeatureReport>, ApiError> {
    let code = team_code(&state, &code)?;
    Ok(Json(calculate::effectiveness(&code)))
}

pub async fn possession(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<FeatureReport>, ApiError> {
    let code = team_code(&state, &code)?;
    Ok(Json(calculate::possession(&code)))
}

// ── Prediction ──────────────────────────────────────────────────

pub async fn match_prediction(
    State(state): State<AppState>,
    Path((team_a, team_b)): Path<(String, String)>,
) -> Result<Json<MatchPrediction>, ApiError> {
    let (a, b) = team_pair(&state, &team_a, &team_b)?;
    let prediction = calculate::predict_match(state.store.as_ref(), &a, &b, &state.analytics)?;
    Ok(Json(prediction))
}
