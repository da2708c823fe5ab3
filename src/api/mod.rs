//! Rutas HTTP de Storchenkamera.
//!
//! Capa fina sobre el índice de fotos; cada handler delega la consulta en
//! `AppState::query_index`.

pub mod depends;

pub use depends::params::{parse_datetime_param, RangeParams};
pub use depends::response::{picture_headers, picture_response};

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Local;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::error::StorchenError;
use crate::metrics::metrics_handler;
use crate::pictures::PictureSummary;
use crate::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/", get(root))
        .route("/api/getNewestPicture", get(get_newest_picture))
        .route("/api/getAllPictureInformations", get(get_all_picture_informations))
        .route("/api/getPictureInformation", get(get_picture_information))
        .route("/api/getPicture/:unix_timestamp", get(get_picture))
        .route("/metrics", get(metrics_handler));

    if state.config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers(Any);
        app = app.layer(cors);
    }

    app.with_state(state)
}

// `null` cuando el índice no tiene ninguna foto
fn summaries_or_null(
    result: Result<Vec<PictureSummary>, StorchenError>,
) -> Result<Json<Option<Vec<PictureSummary>>>, StorchenError> {
    match result {
        Ok(summaries) => Ok(Json(Some(summaries))),
        Err(StorchenError::EmptyIndex) => Ok(Json(None)),
        Err(e) => Err(e),
    }
}

// GET /
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({ "greeting": "Hello Phips" }))
}

// GET /api/getNewestPicture
pub async fn get_newest_picture(
    State(state): State<Arc<AppState>>,
) -> Result<Response, StorchenError> {
    let record = state
        .query_index(|index| index.newest().cloned())
        .await?;
    log::debug!("api: foto más reciente {}", record.filename());

    picture_response(&state.resolver, &record).await
}

// GET /api/getAllPictureInformations
pub async fn get_all_picture_informations(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, StorchenError> {
    summaries_or_null(state.query_index(|index| index.all_summaries()).await)
}

// GET /api/getPictureInformation?start=...&end=...
pub async fn get_picture_information(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> Result<impl IntoResponse, StorchenError> {
    let (start, end) = params.bounds_in(&Local)?;
    summaries_or_null(
        state
            .query_index(move |index| index.summaries_in_range(start, end))
            .await,
    )
}

// GET /api/getPicture/:unix_timestamp
pub async fn get_picture(
    State(state): State<Arc<AppState>>,
    Path(unix_timestamp): Path<i64>,
) -> Result<Response, StorchenError> {
    let record = state
        .query_index(move |index| index.by_timestamp(unix_timestamp).map(|r| r.cloned()))
        .await?
        .ok_or_else(|| {
            StorchenError::NotFound(format!(
                "No Picture found with timestamp: {}",
                unix_timestamp
            ))
        })?;

    picture_response(&state.resolver, &record).await
}
