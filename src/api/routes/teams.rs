use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::{ensure_loaded, normalize_code, ApiError};
use crate::calculate;
use crate::models::{Match, Team, TeamStats};
use crate::storage::MatchStore;

// ── Teams ───────────────────────────────────────────────────────

/// Every team in the store, sorted by name.
pub async fn list_teams(State(state): State<AppState>) -> Result<Json<Vec<Team>>, ApiError> {
    ensure_loaded(&state)?;
    Ok(Json(state.store.teams()))
}

pub async fn team_stats(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<TeamStats>, ApiError> {
    ensure_loaded(&state)?;
    let code = normalize_code(&code)?;
    Ok(Json(calculate::team_stats(state.store.as_ref(), &code)))
}

// ── Matches ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchParams {
    pub team: Option<String>,
    pub year: Option<u16>,
}

/// All matches in dataset order, optionally filtered by team and/or year.
pub async fn list_matches(
    State(state): State<AppState>,
    Query(params): Query<MatchParams>,
) -> Result<Json<Vec<Match>>, ApiError> {
    ensure_loaded(&state)?;

    let team = params.team.as_deref().map(normalize_code).transpose()?;
    let matches = state
        .store
        .matches()
        .iter()
        .filter(|m| team.as_deref().map_or(true, |code| m.involves(code)))
        .filter(|m| params.year.map_or(true, |year| m.year == year))
        .cloned()
        .collect();

    Ok(Json(matches))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{app, app_with, get_json};
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_teams_sorted_by_name() {
        let (status, body) = get_json(app(), "/api/v1/teams").await;
        assert_eq!(status, StatusCode::OK);

        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["Argentina", "Croatia", "France", "Morocco", "Nigeria"]
        );
    }

    #[tokio::test]
    async fn test_team_stats_normalizes_code() {
        let (status, body) = get_json(app(), "/api/v1/teams/arg/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_matches"], 5);
        assert_eq!(body["wins"], 2);
        assert_eq!(body["draws"], 1);
        assert_eq!(body["losses"], 2);
        assert_eq!(body["win_percentage"], 40.0);
    }

    #[tokio::test]
    async fn test_unknown_team_is_all_zero() {
        let (status, body) = get_json(app(), "/api/v1/teams/ZZZ/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_matches"], 0);
        assert_eq!(body["win_percentage"], 0.0);
    }

    #[tokio::test]
    async fn test_matches_filters() {
        let (_, all) = get_json(app(), "/api/v1/matches").await;
        assert_eq!(all.as_array().unwrap().len(), 6);
        assert_eq!(all[0]["team_a_code"], "ARG");

        let (_, filtered) = get_json(app(), "/api/v1/matches?team=fra&year=2022").await;
        assert_eq!(filtered.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_store_is_service_unavailable() {
        let (status, body) = get_json(app_with(vec![]), "/api/v1/teams").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
    }
}
