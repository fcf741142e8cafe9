use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::{CreateJourneyRequest, JourneyResponse},
    routes::AppState,
    services::playlist,
};

/// Handler for the create-journey endpoint
pub async fn create_journey(
    State(state): State<AppState>,
    Json(request): Json<CreateJourneyRequest>,
) -> AppResult<Json<JourneyResponse>> {
    let response = playlist::create_journey(state.music.clone(), &state.recommender, request).await?;
    Ok(Json(response))
}
