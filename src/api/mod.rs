//! REST API endpoints.
//!
//! Axum-based HTTP API for querying historical matches, per-team statistics
//! and match predictions.

pub mod routes;
pub mod state;

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::calculate::AnalyticsError;
use crate::storage::MatchStore;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AnalyticsError> for ApiError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::InvalidInput(msg) => ApiError::BadRequest(msg),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Canonical form of a team code taken from a path: trimmed, upper-cased.
pub fn normalize_code(raw: &str) -> Result<String, ApiError> {
    let code = raw.trim().to_uppercase();
    if code.is_empty() {
        return Err(ApiError::BadRequest("team code must not be empty".to_string()));
    }
    Ok(code)
}

/// Reject requests while no matches are loaded.
pub fn ensure_loaded(state: &AppState) -> Result<(), ApiError> {
    if state.store.is_empty() {
        return Err(ApiError::ServiceUnavailable("data not loaded".to_string()));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub matches_loaded: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        matches_loaded: state.store.matches().len(),
    })
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            warn!("Invalid CORS origin {:?}, allowing any origin", origin);
            layer.allow_origin(Any)
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    use routes::{predict, teams};

    let api = Router::new()
        .route("/teams", get(teams::list_teams))
        .route("/teams/:code/stats", get(teams::team_stats))
        .route("/matches", get(teams::list_matches))
        .route("/predict/history/:team_a/:team_b", get(predict::history))
        .route("/predict/stats/goals/:code", get(predict::goals))
        .route("/predict/stats/streaks/:code", get(predict::streaks))
        .route("/predict/stats/home-away/:code", get(predict::home_away))
        .route("/predict/stats/momentum/:code", get(predict::momentum))
        .route("/predict/stats/graph/:code", get(predict::graph))
        .route(
            "/predict/stats/goal-percentage/:code",
            get(predict::goal_percentage),
        )
        .route(
            "/predict/stats/effectiveness/:code",
            get(predict::effectiveness),
        )
        .route("/predict/stats/possession/:code", get(predict::possession))
        .route(
            "/predict/match-prediction/:team_a/:team_b",
            get(predict::match_prediction),
        );

    Router::new()
        .route("/api/health", get(health))
        .nest("/api/v1", api)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origin))
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::util::ServiceExt;

    use super::build_router;
    use super::state::AppState;
    use crate::config::AnalyticsConfig;
    use crate::models::{Match, Team};
    use crate::storage::InMemoryMatchStore;

    pub const ARG: (&str, &str) = ("Argentina", "ARG");
    pub const FRA: (&str, &str) = ("France", "FRA");
    pub const CRO: (&str, &str) = ("Croatia", "CRO");
    pub const MAR: (&str, &str) = ("Morocco", "MAR");
    pub const NGA: (&str, &str) = ("Nigeria", "NGA");

    pub fn game(a: (&str, &str), b: (&str, &str), score: (u32, u32), year: u16) -> Match {
        Match::new(Team::new(a.0, a.1), Team::new(b.0, b.1), score, year, "World Cup")
    }

    pub fn app_with(matches: Vec<Match>) -> Router {
        let state = AppState::new(
            Arc::new(InMemoryMatchStore::new(matches)),
            AnalyticsConfig::default(),
        );
        build_router(state, "*")
    }

    pub fn app() -> Router {
        app_with(vec![
            game(ARG, NGA, (2, 1), 2014),
            game(FRA, ARG, (4, 3), 2018),
            game(CRO, ARG, (3, 0), 2018),
            game(ARG, CRO, (3, 0), 2022),
            game(FRA, MAR, (2, 0), 2022),
            game(ARG, FRA, (3, 3), 2022),
        ])
    }

    pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{app, app_with, get_json};
    use super::*;

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code(" bra ").unwrap(), "BRA");
        assert_eq!(normalize_code("Ger").unwrap(), "GER");
        assert!(matches!(normalize_code("   "), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_analytics_error_maps_to_bad_request() {
        let err: ApiError = AnalyticsError::InvalidInput("same team".to_string()).into();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "same team"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                ApiError::ServiceUnavailable("data not loaded".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn test_health_reports_loaded_matches() {
        let (status, body) = get_json(app(), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["matches_loaded"], 6);

        let (status, body) = get_json(app_with(vec![]), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["matches_loaded"], 0);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let (status, body) = get_json(app(), "/api/v1/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
