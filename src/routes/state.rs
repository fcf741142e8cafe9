use std::sync::Arc;

use crate::services::{providers::MusicService, recommendations::Recommender};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub music: Arc<dyn MusicService>,
    pub recommender: Arc<Recommender>,
    /// Where the OAuth callback sends the listener back to
    pub frontend_url: String,
}

impl AppState {
    pub fn new(
        music: Arc<dyn MusicService>,
        recommender: Recommender,
        frontend_url: impl Into<String>,
    ) -> Self {
        Self {
            music,
            recommender: Arc::new(recommender),
            frontend_url: frontend_url.into().trim_end_matches('/').to_string(),
        }
    }
}
