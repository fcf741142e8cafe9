use serde::{Deserialize, Serialize};
use std::{
    fmt::Display,
    ops::{Index, IndexMut},
};

/// One of the five buckets a journey moves through, in journey order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    HighEnergy,
    Vibey,
    Melancholic,
    Sad,
    Upbeat,
}

impl Mood {
    /// Canonical journey order
    pub const ALL: [Mood; 5] = [
        Mood::HighEnergy,
        Mood::Vibey,
        Mood::Melancholic,
        Mood::Sad,
        Mood::Upbeat,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::HighEnergy => "high_energy",
            Mood::Vibey => "vibey",
            Mood::Melancholic => "melancholic",
            Mood::Sad => "sad",
            Mood::Upbeat => "upbeat",
        }
    }

    /// How the mood is written in free text, e.g. "more high energy"
    pub fn phrase(self) -> &'static str {
        match self {
            Mood::HighEnergy => "high energy",
            other => other.as_str(),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Mood::ALL
            .into_iter()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(value.trim()))
    }

    fn position(self) -> usize {
        self as usize
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mood label carried by a recommendation.
///
/// Only [`MoodTag::Bucket`] takes part in allocation. `Custom` marks tracks the
/// user injected through the prompt, `Other` keeps whatever free text an
/// external generator produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MoodTag {
    Bucket(Mood),
    Custom,
    Other(String),
}

const CUSTOM_TAG: &str = "custom";

impl MoodTag {
    pub fn mood(&self) -> Option<Mood> {
        match self {
            MoodTag::Bucket(mood) => Some(*mood),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MoodTag::Bucket(mood) => mood.as_str(),
            MoodTag::Custom => CUSTOM_TAG,
            MoodTag::Other(label) => label,
        }
    }
}

impl From<Mood> for MoodTag {
    fn from(mood: Mood) -> Self {
        MoodTag::Bucket(mood)
    }
}

impl From<String> for MoodTag {
    fn from(value: String) -> Self {
        if let Some(mood) = Mood::parse(&value) {
            MoodTag::Bucket(mood)
        } else if value.trim().eq_ignore_ascii_case(CUSTOM_TAG) {
            MoodTag::Custom
        } else {
            MoodTag::Other(value)
        }
    }
}

impl From<MoodTag> for String {
    fn from(tag: MoodTag) -> Self {
        match tag {
            MoodTag::Other(label) => label,
            other => other.as_str().to_string(),
        }
    }
}

impl Display for MoodTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-size table with one slot per [`Mood`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoodMap<T>([T; 5]);

impl<T> MoodMap<T> {
    /// Values in canonical mood order
    pub const fn new(values: [T; 5]) -> Self {
        Self(values)
    }

    pub fn from_fn(f: impl FnMut(Mood) -> T) -> Self {
        Self(Mood::ALL.map(f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Mood, &T)> {
        Mood::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    pub fn into_values(self) -> impl Iterator<Item = T> {
        self.0.into_iter()
    }
}

impl<T> Index<Mood> for MoodMap<T> {
    type Output = T;

    fn index(&self, mood: Mood) -> &T {
        &self.0[mood.position()]
    }
}

impl<T> IndexMut<Mood> for MoodMap<T> {
    fn index_mut(&mut self, mood: Mood) -> &mut T {
        &mut self.0[mood.position()]
    }
}
