use axum::{extract::State, Json};

use crate::{
    error::{AppError, AppResult},
    models::{JourneyTrack, RecommendationRequest},
    routes::AppState,
};

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<Vec<JourneyTrack>>> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::InvalidInput("No prompt provided".to_string()));
    }

    let tracks = state.recommender.produce(&request).await;
    Ok(Json(tracks.into_iter().map(JourneyTrack::from).collect()))
}
