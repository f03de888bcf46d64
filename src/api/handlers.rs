use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Movie, Recommendation},
};

use super::{
    pages::{self, Outcome},
    AppState,
};

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    pub movie: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: i64,
    pub title: String,
}

impl From<&Movie> for MovieResponse {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
        }
    }
}

fn required_title(query: &TitleQuery) -> AppResult<&str> {
    match query.title.as_deref() {
        Some(title) if !title.trim().is_empty() => Ok(title),
        _ => Err(AppError::InvalidInput("title must not be empty".to_string())),
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Recommendation page: the selection form, plus results when a movie was chosen
pub async fn index(
    State(state): State<AppState>,
    request_id: RequestId,
    Query(query): Query<IndexQuery>,
) -> Response {
    let columns = state.recommender.count();
    let selected = query.movie.as_deref().filter(|m| !m.is_empty());

    let (status, outcome) = match selected {
        None => (StatusCode::OK, Outcome::Idle),
        Some(title) => match state.recommendations_for(title).await {
            Ok(recommendations) => {
                tracing::info!(
                    request_id = %request_id,
                    title = %title,
                    results = recommendations.len(),
                    "Rendered recommendations"
                );
                (StatusCode::OK, Outcome::Recommendations(recommendations))
            }
            Err(AppError::NotFound(message)) => {
                tracing::warn!(request_id = %request_id, title = %title, "Unknown title selected");
                (StatusCode::NOT_FOUND, Outcome::Error(message))
            }
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "Recommendation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Outcome::Error("Something went wrong, please try again.".to_string()),
                )
            }
        },
    };

    let html = pages::render_index(state.recommender.titles(), selected, &outcome, columns);
    (status, Html(html)).into_response()
}

/// All movies in table order
pub async fn list_movies(State(state): State<AppState>) -> Json<Vec<MovieResponse>> {
    Json(
        state
            .recommender
            .movies()
            .iter()
            .map(MovieResponse::from)
            .collect(),
    )
}

/// Similar movies with posters for a title
pub async fn recommendations(
    State(state): State<AppState>,
    request_id: RequestId,
    Query(query): Query<TitleQuery>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let title = required_title(&query)?;

    tracing::info!(request_id = %request_id, title = %title, "Processing recommendation request");

    let recommendations = state.recommendations_for(title).await?;

    tracing::info!(
        request_id = %request_id,
        results = recommendations.len(),
        "Recommendation completed"
    );

    Ok(Json(recommendations))
}

/// Poster lookup for a single title from the movie table
pub async fn poster(
    State(state): State<AppState>,
    request_id: RequestId,
    Query(query): Query<TitleQuery>,
) -> AppResult<Json<Recommendation>> {
    let title = required_title(&query)?;
    // Memo keys are limited to known titles
    if state.recommender.find_index(title).is_none() {
        tracing::warn!(request_id = %request_id, title = %title, "Poster requested for unknown title");
        return Err(AppError::NotFound(format!("No movie titled '{}'", title)));
    }

    let poster_url = state.posters.fetch_poster(title).await;

    Ok(Json(Recommendation {
        title: title.to_string(),
        poster_url,
    }))
}
