use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::{
    app_state::{AppState, Status},
    dashboard::{self, Dashboard, FilterOptions},
    models::FilterSelection,
};

// --- Payloads de la API ---

/// Parámetros de `/api/dashboard`. Un valor vacío equivale a "sin filtro".
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    genre: Option<String>,
    decade: Option<String>,
    actor: Option<String>,
    director: Option<String>,
}

impl FilterQuery {
    pub fn into_selection(self) -> Result<FilterSelection, String> {
        let decade = match non_empty(self.decade) {
            Some(raw) => Some(
                raw.trim()
                    .parse::<i32>()
                    .map_err(|_| format!("Década no válida: '{raw}'"))?,
            ),
            None => None,
        };
        Ok(FilterSelection {
            genre: non_empty(self.genre),
            decade,
            actor: non_empty(self.actor),
            director: non_empty(self.director),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

type ApiError = (StatusCode, Json<serde_json::Value>);

// --- Router ---

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/filters", get(filters_handler))
        .route("/api/dashboard", get(dashboard_handler))
        .route("/api/status", get(status_handler))
        .route("/api/shutdown", post(shutdown_handler))
        .with_state(app_state)
}

// --- Handlers ---

#[axum::debug_handler]
async fn filters_handler(State(state): State<AppState>) -> Json<FilterOptions> {
    Json(dashboard::filter_options(&state.data))
}

#[axum::debug_handler]
async fn dashboard_handler(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<Dashboard>, ApiError> {
    let selection = query
        .into_selection()
        .map_err(|msg| (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))))?;

    match dashboard::render(&state.data, &selection) {
        Ok(dashboard) => Ok(Json(dashboard)),
        Err(e) => {
            error!("Error generando el dashboard para {:?}: {}", selection, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": format!("Error al generar los gráficos: {}", e)})),
            ))
        }
    }
}

#[axum::debug_handler]
async fn status_handler(State(state): State<AppState>) -> Json<Status> {
    Json(state.status.as_ref().clone())
}

#[axum::debug_handler]
async fn shutdown_handler(State(state): State<AppState>) -> impl IntoResponse {
    info!("Petición de apagado recibida.");
    let sender = match state.shutdown_sender.lock() {
        Ok(mut guard) => guard.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    };
    if let Some(sender) = sender {
        let _ = sender.send(());
    }
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, Response},
    };
    use serde_json::Value;
    use tokio::sync::oneshot;
    use tower::util::ServiceExt; // para `oneshot`

    use crate::{
        config::AppConfig,
        dataset::{self, tests::{write_fixture, COLLABS, MOVIES}},
        normalize,
    };

    fn test_state(shutdown: Option<oneshot::Sender<()>>) -> AppState {
        let (_dir, paths) = write_fixture(MOVIES, COLLABS);
        let mut data = dataset::load(&paths).unwrap();
        let derived = normalize::normalize(&mut data);
        let config = AppConfig::from_lookup(|_| None).unwrap();
        AppState::new(&config, data, derived, shutdown)
    }

    async fn call(state: AppState, method: &str, uri: &str) -> Response<Body> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        create_router(state).oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn blank_parameters_mean_unset() {
        let query = FilterQuery {
            genre: Some(String::new()),
            decade: Some(" ".into()),
            actor: None,
            director: Some("Karan Johar".into()),
        };
        let selection = query.into_selection().unwrap();
        assert_eq!(
            selection,
            FilterSelection {
                director: Some("Karan Johar".into()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn decade_is_trimmed_before_parsing() {
        let query = FilterQuery {
            decade: Some(" 1990 ".into()),
            ..Default::default()
        };
        assert_eq!(query.into_selection().unwrap().decade, Some(1990));
    }

    #[tokio::test]
    async fn dashboard_endpoint_accepts_padded_decade() {
        let response = call(test_state(None), "GET", "/api/dashboard?decade=%202000").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["filters"]["decade"], 2000);
        assert_eq!(body["matched_movies"], 3);
    }

    #[test]
    fn invalid_decade_is_rejected() {
        let query = FilterQuery {
            decade: Some("noventas".into()),
            ..Default::default()
        };
        assert!(query.into_selection().unwrap_err().contains("noventas"));
    }

    #[tokio::test]
    async fn filters_endpoint_lists_options() {
        let response = call(test_state(None), "GET", "/api/filters").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["genres"], serde_json::json!(["Drama", "Comedy"]));
        assert_eq!(body["decades"], serde_json::json!([1990, 2000]));
    }

    #[tokio::test]
    async fn dashboard_endpoint_applies_query() {
        let response = call(test_state(None), "GET", "/api/dashboard?genre=Drama&decade=2000&actor=").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["matched_movies"], 2);
        assert_eq!(body["filters"]["genre"], "Drama");
        assert_eq!(body["filters"]["actor"], Value::Null);
        assert_eq!(body["charts"].as_array().map(Vec::len), Some(5));
        assert_eq!(body["charts"][1]["title"], "Average IMDb Ratings by Decade for Drama");
    }

    #[tokio::test]
    async fn dashboard_endpoint_rejects_bad_decade() {
        let response = call(test_state(None), "GET", "/api/dashboard?decade=abc").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("abc"));
    }

    #[tokio::test]
    async fn status_reports_row_counts() {
        let response = call(test_state(None), "GET", "/api/status").await;
        let body = json_body(response).await;
        assert_eq!(body["movie_rows"], 4);
        assert_eq!(body["collaboration_rows"], 4);
        assert_eq!(body["derived"]["decade_derived"], true);
        assert!(body["loaded_at"].is_string());
    }

    #[tokio::test]
    async fn shutdown_fires_the_signal_once() {
        let (tx, rx) = oneshot::channel();
        let state = test_state(Some(tx));

        let response = call(state.clone(), "POST", "/api/shutdown").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(rx.await.is_ok());

        let again = call(state, "POST", "/api/shutdown").await;
        assert_eq!(again.status(), StatusCode::OK);
    }
}
