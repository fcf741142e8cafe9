/// Music streaming provider abstraction
///
/// The HTTP layer only talks to [`MusicService`], so the Spotify client can be
/// swapped for a stub in tests.
use crate::{
    error::AppResult,
    models::{Paging, SpotifyArtist, SpotifyPlaylist, SpotifyTrack, TimeRange, TokenResponse, UserProfile},
};

pub mod spotify;

pub use spotify::SpotifyClient;

/// Default number of items requested from the personalization endpoints
pub const DEFAULT_TOP_LIMIT: u32 = 10;

/// Operations the service needs from a music provider
///
/// Every call that acts for a listener takes their OAuth access token.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MusicService: Send + Sync {
    /// URL the listener is sent to for granting access
    fn authorize_url(&self) -> AppResult<String>;

    /// Trades an authorization code for tokens
    async fn exchange_code(&self, code: &str) -> AppResult<TokenResponse>;

    async fn top_artists(
        &self,
        access_token: &str,
        time_range: TimeRange,
        limit: u32,
    ) -> AppResult<Paging<SpotifyArtist>>;

    async fn top_tracks(
        &self,
        access_token: &str,
        time_range: TimeRange,
        limit: u32,
    ) -> AppResult<Paging<SpotifyTrack>>;

    async fn current_user(&self, access_token: &str) -> AppResult<UserProfile>;

    /// Creates a private playlist owned by `user_id`
    async fn create_playlist(
        &self,
        access_token: &str,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> AppResult<SpotifyPlaylist>;

    /// Appends tracks in order
    async fn add_tracks(&self, access_token: &str, playlist_id: &str, uris: &[String]) -> AppResult<()>;

    /// Best match for a title/artist pair, `None` when nothing matches
    async fn search_track(
        &self,
        access_token: &str,
        title: &str,
        artist: &str,
    ) -> AppResult<Option<SpotifyTrack>>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
