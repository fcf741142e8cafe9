use std::sync::Arc;
use tokio::task::JoinSet;

use crate::{
    error::{AppError, AppResult},
    models::{
        ArtistRef, CreateJourneyRequest, JourneyResponse, JourneyTrack, RecommendationRequest,
        TimeRange, TrackRecommendation, TrackRef,
    },
    services::{
        providers::{MusicService, DEFAULT_TOP_LIMIT},
        recommendations::Recommender,
    },
};

const PLAYLIST_NAME_PREFIX: &str = "Journey: ";
const PLAYLIST_NAME_PROMPT_CHARS: usize = 30;
const PLAYLIST_DESCRIPTION_MAX_CHARS: usize = 300;

/// Playlist name derived from the prompt
pub fn playlist_name(prompt: &str) -> String {
    let head: String = prompt.trim().chars().take(PLAYLIST_NAME_PROMPT_CHARS).collect();
    format!("{}{}", PLAYLIST_NAME_PREFIX, head.trim_end())
}

pub fn playlist_description(prompt: &str) -> String {
    format!("Created with prompt: {}", prompt.trim())
        .chars()
        .take(PLAYLIST_DESCRIPTION_MAX_CHARS)
        .collect()
}

/// Builds a journey from the listener's Spotify data and optionally saves it
/// as a private playlist
pub async fn create_journey(
    music: Arc<dyn MusicService>,
    recommender: &Recommender,
    request: CreateJourneyRequest,
) -> AppResult<JourneyResponse> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::InvalidInput("No prompt provided".to_string()));
    }
    if request.access_token.trim().is_empty() {
        return Err(AppError::InvalidInput("No access token provided".to_string()));
    }

    let token = request.access_token.as_str();
    let (artists, tracks) = tokio::try_join!(
        music.top_artists(token, TimeRange::MediumTerm, DEFAULT_TOP_LIMIT),
        music.top_tracks(token, TimeRange::MediumTerm, DEFAULT_TOP_LIMIT),
    )?;

    let engine_request = RecommendationRequest {
        prompt: request.prompt.clone(),
        top_artists: artists.items.iter().map(ArtistRef::from).collect(),
        top_tracks: tracks.items.iter().map(TrackRef::from).collect(),
        limit: request.limit,
    };
    let recommendations = recommender.produce(&engine_request).await;

    let name = playlist_name(&request.prompt);
    let mut response = JourneyResponse {
        name: name.clone(),
        tracks: Vec::new(),
        playlist_url: None,
        unmatched: Vec::new(),
    };

    if request.save_playlist {
        let (uris, unmatched) = resolve_uris(music.clone(), token, &recommendations).await?;

        let user = music.current_user(token).await?;
        let playlist = music
            .create_playlist(token, &user.id, &name, &playlist_description(&request.prompt))
            .await?;
        if !uris.is_empty() {
            music.add_tracks(token, &playlist.id, &uris).await?;
        }

        tracing::info!(
            playlist_id = %playlist.id,
            matched = uris.len(),
            unmatched = unmatched.len(),
            provider = music.name(),
            "Saved journey playlist"
        );

        response.playlist_url = playlist.web_url().map(str::to_string);
        response.unmatched = unmatched;
    }

    response.tracks = recommendations.into_iter().map(JourneyTrack::from).collect();
    Ok(response)
}

/// Looks up every recommendation concurrently, keeping journey order.
///
/// Returns the matched URIs and the titles that had no match.
async fn resolve_uris(
    music: Arc<dyn MusicService>,
    token: &str,
    recommendations: &[TrackRecommendation],
) -> AppResult<(Vec<String>, Vec<String>)> {
    let mut searches = JoinSet::new();

    for (index, track) in recommendations.iter().enumerate() {
        let music = music.clone();
        let token = token.to_string();
        let title = track.title.clone();
        let artist = track.primary_artist().unwrap_or_default().to_string();

        searches.spawn(async move {
            let found = music.search_track(&token, &title, &artist).await;
            (index, found)
        });
    }

    let mut found = vec![None; recommendations.len()];
    while let Some(joined) = searches.join_next().await {
        let (index, result) =
            joined.map_err(|e| AppError::Internal(format!("Track search task failed: {}", e)))?;
        found[index] = result?.map(|track| track.uri);
    }

    let mut uris = Vec::with_capacity(found.len());
    let mut unmatched = Vec::new();
    for (uri, track) in found.into_iter().zip(recommendations) {
        match uri {
            Some(uri) => uris.push(uri),
            None => unmatched.push(track.title.clone()),
        }
    }

    Ok((uris, unmatched))
}
