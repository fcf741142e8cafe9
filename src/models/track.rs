use serde::{Deserialize, Serialize};

use super::MoodTag;

/// Album shown when a recommendation carries none
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// A single recommended track as produced by the recommendation engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecommendation {
    pub title: String,
    /// Credited artists, the first one is the primary artist
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub mood: MoodTag,
    pub reason: String,
}

impl TrackRecommendation {
    pub fn primary_artist(&self) -> Option<&str> {
        self.artists.first().map(String::as_str)
    }

    pub fn album_name(&self) -> &str {
        self.album.as_deref().unwrap_or(UNKNOWN_ALBUM)
    }

    /// Whether `artist` appears anywhere in the credits
    pub fn is_credited_to(&self, artist: &str) -> bool {
        self.artists
            .iter()
            .any(|credited| credited.eq_ignore_ascii_case(artist))
    }
}

/// Artist reference as sent by clients (`{name}`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtistRef {
    pub name: String,
}

impl ArtistRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Track reference as sent by clients (`{name, artists: [{name}]}`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackRef {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

impl TrackRef {
    pub fn primary_artist(&self) -> &str {
        self.artists
            .first()
            .map(|artist| artist.name.as_str())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlbumRef {
    pub name: String,
}

/// Serialized form of a recommendation returned to clients.
///
/// The title travels as `name` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JourneyTrack {
    pub name: String,
    pub artists: Vec<ArtistRef>,
    pub album: AlbumRef,
    pub mood: MoodTag,
    pub reason: String,
}

impl From<TrackRecommendation> for JourneyTrack {
    fn from(track: TrackRecommendation) -> Self {
        let album = AlbumRef {
            name: track.album_name().to_string(),
        };
        Self {
            name: track.title,
            artists: track.artists.into_iter().map(ArtistRef::new).collect(),
            album,
            mood: track.mood,
            reason: track.reason,
        }
    }
}
