/// Spotify Web API provider
///
/// API Flow:
/// 1. Authorization: /authorize → code → /api/token (client credentials via HTTP Basic)
/// 2. Personalization: /me/top/{artists,tracks}
/// 3. Playlist: /me → /users/{id}/playlists → /playlists/{id}/tracks
use crate::{
    error::{AppError, AppResult},
    models::{
        Paging, SpotifyArtist, SpotifyPlaylist, SpotifyTrack, TimeRange, TokenResponse,
        TrackSearchResponse, UserProfile,
    },
    services::providers::MusicService,
};
use reqwest::{Client as HttpClient, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};

pub const ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const API_URL: &str = "https://api.spotify.com/v1";

const SCOPES: &str = "user-top-read playlist-modify-public playlist-modify-private";

/// Spotify accepts at most this many URIs per add-tracks call
const MAX_URIS_PER_REQUEST: usize = 100;

#[derive(Clone)]
pub struct SpotifyClient {
    http_client: HttpClient,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    accounts_url: String,
    api_url: String,
}

#[derive(Serialize)]
struct CreatePlaylistBody<'a> {
    name: &'a str,
    description: &'a str,
    public: bool,
}

#[derive(Serialize)]
struct AddTracksBody<'a> {
    uris: &'a [String],
}

impl SpotifyClient {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            http_client: HttpClient::new(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            accounts_url: ACCOUNTS_URL.to_string(),
            api_url: API_URL.to_string(),
        }
    }

    /// Points the client at other hosts, e.g. a local mock server
    pub fn with_base_urls(mut self, accounts_url: impl Into<String>, api_url: impl Into<String>) -> Self {
        self.accounts_url = accounts_url.into();
        self.api_url = api_url.into();
        self
    }

    /// Maps non-success statuses onto application errors
    async fn check(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED {
            return Err(AppError::Unauthorized(format!(
                "Spotify rejected the access token: {}",
                body
            )));
        }
        Err(AppError::ExternalApi(format!(
            "Spotify API returned status {}: {}",
            status, body
        )))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        access_token: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = format!("{}/{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    async fn top_items<T: DeserializeOwned>(
        &self,
        access_token: &str,
        kind: &str,
        time_range: TimeRange,
        limit: u32,
    ) -> AppResult<Paging<T>> {
        let limit = limit.to_string();
        let page: Paging<T> = self
            .get_json(
                access_token,
                &format!("me/top/{}", kind),
                &[("time_range", time_range.as_str()), ("limit", &limit)],
            )
            .await?;

        tracing::info!(
            kind = kind,
            time_range = time_range.as_str(),
            items = page.items.len(),
            provider = "spotify",
            "Fetched top items"
        );

        Ok(page)
    }
}

/// Field-filtered search query for a title/artist pair
fn track_query(title: &str, artist: &str) -> String {
    if artist.trim().is_empty() {
        format!("track:{}", title.trim())
    } else {
        format!("track:{} artist:{}", title.trim(), artist.trim())
    }
}

#[async_trait::async_trait]
impl MusicService for SpotifyClient {
    fn authorize_url(&self) -> AppResult<String> {
        let url = Url::parse_with_params(
            &format!("{}/authorize", self.accounts_url),
            &[
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", SCOPES),
            ],
        )
        .map_err(|e| AppError::Internal(format!("Invalid authorization URL: {}", e)))?;

        Ok(url.into())
    }

    async fn exchange_code(&self, code: &str) -> AppResult<TokenResponse> {
        if code.trim().is_empty() {
            return Err(AppError::InvalidInput("Authorization code cannot be empty".to_string()));
        }

        let url = format!("{}/api/token", self.accounts_url);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await?;

        let token: TokenResponse = Self::check(response).await?.json().await?;
        tracing::info!(expires_in = token.expires_in, "Exchanged authorization code");
        Ok(token)
    }

    async fn top_artists(
        &self,
        access_token: &str,
        time_range: TimeRange,
        limit: u32,
    ) -> AppResult<Paging<SpotifyArtist>> {
        self.top_items(access_token, "artists", time_range, limit).await
    }

    async fn top_tracks(
        &self,
        access_token: &str,
        time_range: TimeRange,
        limit: u32,
    ) -> AppResult<Paging<SpotifyTrack>> {
        self.top_items(access_token, "tracks", time_range, limit).await
    }

    async fn current_user(&self, access_token: &str) -> AppResult<UserProfile> {
        self.get_json(access_token, "me", &[]).await
    }

    async fn create_playlist(
        &self,
        access_token: &str,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> AppResult<SpotifyPlaylist> {
        let url = format!("{}/users/{}/playlists", self.api_url, user_id);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(access_token)
            .json(&CreatePlaylistBody {
                name,
                description,
                public: false,
            })
            .send()
            .await?;

        let playlist: SpotifyPlaylist = Self::check(response).await?.json().await?;
        tracing::info!(playlist_id = %playlist.id, user_id = %user_id, "Created playlist");
        Ok(playlist)
    }

    async fn add_tracks(&self, access_token: &str, playlist_id: &str, uris: &[String]) -> AppResult<()> {
        let url = format!("{}/playlists/{}/tracks", self.api_url, playlist_id);

        for chunk in uris.chunks(MAX_URIS_PER_REQUEST) {
            let response = self
                .http_client
                .post(&url)
                .bearer_auth(access_token)
                .json(&AddTracksBody { uris: chunk })
                .send()
                .await?;
            Self::check(response).await?;
        }

        tracing::info!(playlist_id = %playlist_id, tracks = uris.len(), "Added tracks to playlist");
        Ok(())
    }

    async fn search_track(
        &self,
        access_token: &str,
        title: &str,
        artist: &str,
    ) -> AppResult<Option<SpotifyTrack>> {
        let query = track_query(title, artist);
        let results: TrackSearchResponse = self
            .get_json(
                access_token,
                "search",
                &[("q", query.as_str()), ("type", "track"), ("limit", "1")],
            )
            .await?;

        let track = results.tracks.items.into_iter().next();
        if track.is_none() {
            tracing::debug!(title = %title, artist = %artist, "No Spotify match for track");
        }
        Ok(track)
    }

    fn name(&self) -> &'static str {
        "spotify"
    }
}
