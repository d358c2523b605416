use std::{collections::BTreeMap, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{AppState, entities::title, error::AppResult};

#[derive(Debug, Serialize)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub methods: &'static [&'static str],
    pub middlewares: &'static [&'static str],
}

/// Static route registry served at the root path. Kept next to `app` so
/// the two cannot drift apart unnoticed.
pub const ROUTES: &[RouteDescriptor] = &[
    RouteDescriptor { path: "/", methods: &["GET"], middlewares: &["cors", "trace"] },
    RouteDescriptor { path: "/movies", methods: &["GET"], middlewares: &["cors", "trace"] },
    RouteDescriptor { path: "/country", methods: &["GET"], middlewares: &["cors", "trace"] },
    RouteDescriptor { path: "/movies/{id}", methods: &["GET"], middlewares: &["cors", "trace"] },
];

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/movies", get(movies))
        .route("/country", get(by_country))
        .route("/movies/{id}", get(movie_by_id))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

pub async fn index() -> Json<&'static [RouteDescriptor]> {
    Json(ROUTES)
}

pub async fn movies(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<title::Model>>> {
    let store = state.store()?;
    Ok(Json(store.movies().await?))
}

pub async fn by_country(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<BTreeMap<String, Vec<title::Model>>>> {
    let store = state.store()?;
    Ok(Json(store.titles_by_country().await?))
}

pub async fn movie_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let store = state.store()?;

    // A non-numeric token coerces to no match, same as an unknown id.
    let Ok(show_id) = id.parse::<i64>() else {
        return Ok(not_found());
    };

    match store.movie_by_show_id(show_id).await? {
        Some(movie) => Ok(Json(movie).into_response()),
        None => Ok(not_found()),
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Movie not found" }))).into_response()
}
