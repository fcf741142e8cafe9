use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{Paging, SpotifyArtist, SpotifyTrack, TimeRange, UserProfile},
    routes::AppState,
    services::providers::DEFAULT_TOP_LIMIT,
};

/// Largest page the personalization endpoints accept
const MAX_TOP_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    access_token: String,
    #[serde(default)]
    time_range: TimeRange,
    limit: Option<u32>,
}

impl TopQuery {
    fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_TOP_LIMIT).clamp(1, MAX_TOP_LIMIT)
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    access_token: String,
}

pub(crate) fn require_token(token: &str) -> AppResult<&str> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::InvalidInput("No access token provided".to_string()));
    }
    Ok(token)
}

pub async fn top_artists(
    State(state): State<AppState>,
    Query(query): Query<TopQuery>,
) -> AppResult<Json<Paging<SpotifyArtist>>> {
    let token = require_token(&query.access_token)?;
    let page = state
        .music
        .top_artists(token, query.time_range, query.limit())
        .await?;
    Ok(Json(page))
}

pub async fn top_tracks(
    State(state): State<AppState>,
    Query(query): Query<TopQuery>,
) -> AppResult<Json<Paging<SpotifyTrack>>> {
    let token = require_token(&query.access_token)?;
    let page = state
        .music
        .top_tracks(token, query.time_range, query.limit())
        .await?;
    Ok(Json(page))
}

pub async fn user_profile(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> AppResult<Json<UserProfile>> {
    let token = require_token(&query.access_token)?;
    Ok(Json(state.music.current_user(token).await?))
}
