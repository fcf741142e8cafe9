use serde::{Deserialize, Serialize};

mod mood;
mod spotify;
mod track;

pub use mood::{Mood, MoodMap, MoodTag};
pub use spotify::{
    Paging, SimplifiedAlbum, SimplifiedArtist, SpotifyArtist, SpotifyPlaylist, SpotifyTrack,
    TimeRange, TokenResponse, TrackSearchResponse, UserProfile,
};
pub use track::{AlbumRef, ArtistRef, JourneyTrack, TrackRecommendation, TrackRef, UNKNOWN_ALBUM};

/// Input to the recommendation engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub top_artists: Vec<ArtistRef>,
    #[serde(default)]
    pub top_tracks: Vec<TrackRef>,
    /// Track budget used when the prompt names no count
    #[serde(default)]
    pub limit: Option<usize>,
}

impl RecommendationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_top_artists<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.top_artists = names.into_iter().map(ArtistRef::new).collect();
        self
    }
}

/// Request to build a journey from the user's Spotify data
#[derive(Debug, Clone, Deserialize)]
pub struct CreateJourneyRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default = "default_save_playlist")]
    pub save_playlist: bool,
}

fn default_save_playlist() -> bool {
    true
}

/// Journey returned to the frontend, optionally saved as a playlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyResponse {
    pub name: String,
    pub tracks: Vec<JourneyTrack>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist_url: Option<String>,
    /// Titles that could not be matched to a Spotify track
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmatched: Vec<String>,
}
