//! Keyword analysis of the free-text prompt: journey classification and the
//! independent directives (counts, weights, include/exclude, custom tracks).

use regex::Regex;
use std::sync::LazyLock;

use super::catalog::{self, ArtistCatalog, CatalogTrack, ARTISTS, INTRO_ANCHORS};
use crate::models::{MoodMap, MoodTag, TrackRecommendation};

/// Longest journey every branch can fill from the catalogs (5 moods x 5 tracks).
/// Larger counts are clamped to it.
pub const MAX_TRACKS: usize = 25;

pub const CUSTOM_TRACK_REASON: &str = "User specifically requested this track";

const EXCLUDE_MARKER: &str = "exclude:";
const INCLUDE_MARKER: &str = "include:";
const ADD_TRACK_MARKERS: [&str; 2] = ["add track:", "add song:"];
const CLAUSE_MARKERS: [&str; 4] = [EXCLUDE_MARKER, INCLUDE_MARKER, "add track:", "add song:"];

/// Fixed phrases that exclude an artist without an `exclude:` clause
const NAMED_EXCLUSIONS: [(&str, &str); 3] = [
    ("exclude kendrick", "Kendrick Lamar"),
    ("exclude xxxtentacion", "XXXTENTACION"),
    ("exclude xxx", "XXXTENTACION"),
];

const NUMBER_WORDS: [&str; 20] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen", "nineteen",
    "twenty",
];

static TRACK_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(\d{{1,3}}|{})\s+(?:tracks?|songs?)\b",
        NUMBER_WORDS.join("|")
    ))
    .expect("track count pattern is valid")
});

static TRACKS_PER_MOOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(1|2|3|one|two|three)\s+(?:tracks?|songs?)\s+per\s+mood\b")
        .expect("tracks per mood pattern is valid")
});

static FINALE_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:end|ending|finally)\b").expect("finale cue pattern is valid")
});

fn parse_count(token: &str) -> Option<usize> {
    token.parse().ok().or_else(|| {
        NUMBER_WORDS
            .iter()
            .position(|word| *word == token)
            .map(|index| index + 1)
    })
}

/// Capitalizes the first letter of every alphabetic run, lower-casing the rest
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;
    for c in value.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Maps a user-typed artist name onto the catalog spelling when it is known
fn canonical_artist_name(token: &str) -> String {
    let lowered = token.to_lowercase();
    ARTISTS
        .iter()
        .find(|artist| {
            artist.name.eq_ignore_ascii_case(token) || artist.aliases.contains(&lowered.as_str())
        })
        .map(|artist| artist.name.to_string())
        .unwrap_or_else(|| title_case(token))
}

/// A prompt together with its normalized matching form.
///
/// Normalization lower-cases ASCII letters and turns `-`/`_` into spaces, so
/// byte offsets in the normalized text are valid offsets into the raw text.
#[derive(Debug)]
pub struct Prompt<'a> {
    raw: &'a str,
    text: String,
}

impl<'a> Prompt<'a> {
    pub fn new(raw: &'a str) -> Self {
        let text = raw
            .chars()
            .map(|c| match c {
                '-' | '_' => ' ',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        Self { raw, text }
    }

    /// Substring match, `phrase` must already be lowercase
    pub fn contains(&self, phrase: &str) -> bool {
        self.text.contains(phrase)
    }

    /// Match that is not part of a longer word
    pub fn contains_word(&self, phrase: &str) -> bool {
        self.text.match_indices(phrase).any(|(start, matched)| {
            let before = self.text[..start].chars().next_back();
            let after = self.text[start + matched.len()..].chars().next();
            !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        })
    }

    pub fn mentions(&self, artist: &ArtistCatalog) -> bool {
        let name = artist.name.to_ascii_lowercase();
        self.contains_word(&name)
            || self.contains_word(&name.replace(',', ""))
            || artist.aliases.iter().any(|alias| self.contains_word(alias))
    }

    /// Catalog artists named anywhere in the prompt, in catalog order
    pub fn mentioned_artists(&self) -> Vec<&'static ArtistCatalog> {
        ARTISTS.iter().filter(|artist| self.mentions(artist)).collect()
    }

    /// "top artists" together with "journey"
    pub fn asks_for_mixed_journey(&self) -> bool {
        self.contains("top artist") && self.contains("journey")
    }

    /// Anchor track named together with its artist and an intro phrase
    pub fn intro_anchor(&self) -> Option<&'static CatalogTrack> {
        if !self.contains("intro") {
            return None;
        }
        INTRO_ANCHORS.iter().find(|track| {
            self.contains_word(&track.title.to_ascii_lowercase())
                && catalog::find_artist(track.primary_artist())
                    .is_some_and(|artist| self.mentions(artist))
        })
    }

    pub fn has_finale_cue(&self) -> bool {
        FINALE_CUE.is_match(&self.text)
    }

    pub fn track_count(&self) -> Option<usize> {
        TRACK_COUNT
            .captures_iter(&self.text)
            .filter(|caps| {
                let end = caps.get(0).map_or(0, |m| m.end());
                !self.text[end..].trim_start().starts_with("per mood")
            })
            .filter_map(|caps| parse_count(&caps[1]))
            .find(|count| *count > 0)
            .map(|count| count.min(MAX_TRACKS))
    }

    pub fn tracks_per_mood(&self) -> Option<usize> {
        TRACKS_PER_MOOD
            .captures(&self.text)
            .and_then(|caps| parse_count(&caps[1]))
    }

    pub fn mood_weights(&self) -> MoodMap<f64> {
        MoodMap::from_fn(|mood| {
            let phrase = mood.phrase();
            let mut weight = 1.0;
            if self.contains(&format!("more {phrase}")) || self.contains(&format!("extra {phrase}")) {
                weight *= 2.0;
            }
            if self.contains(&format!("less {phrase}")) || self.contains(&format!("fewer {phrase}")) {
                weight *= 0.5;
            }
            weight
        })
    }

    pub fn wants_surprise(&self) -> bool {
        self.contains("random") || self.contains("surprise me")
    }

    /// Raw text following each of `markers`, cut at the next clause marker
    /// or the first of `stops`, in prompt order
    fn clause_bodies(&self, markers: &[&str], stops: &[&str]) -> Vec<&'a str> {
        let mut starts: Vec<usize> = markers
            .iter()
            .flat_map(|marker| {
                self.text
                    .match_indices(marker)
                    .map(move |(start, _)| start + marker.len())
            })
            .collect();
        starts.sort_unstable();

        starts
            .into_iter()
            .map(|start| {
                let rest = &self.text[start..];
                let end = CLAUSE_MARKERS
                    .iter()
                    .chain(stops)
                    .filter_map(|stop| rest.find(stop))
                    .min()
                    .unwrap_or(rest.len());
                &self.raw[start..start + end]
            })
            .collect()
    }

    fn artist_list(&self, marker: &str) -> Vec<String> {
        self.clause_bodies(&[marker], &[".", "\n", ";"])
            .into_iter()
            .flat_map(|body| body.split(','))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(canonical_artist_name)
            .collect()
    }

    pub fn exclusions(&self) -> Exclusions {
        let mut exclusions = Exclusions::default();
        for (phrase, artist) in NAMED_EXCLUSIONS {
            if self.contains(phrase) {
                exclusions.insert(artist);
            }
        }
        for artist in self.artist_list(EXCLUDE_MARKER) {
            exclusions.insert(artist);
        }
        exclusions
    }

    pub fn inclusions(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for artist in self.artist_list(INCLUDE_MARKER) {
            if !names.iter().any(|name| name.eq_ignore_ascii_case(&artist)) {
                names.push(artist);
            }
        }
        names
    }

    pub fn custom_tracks(&self) -> Vec<CustomTrack> {
        self.clause_bodies(&ADD_TRACK_MARKERS, &[". ", "\n", ";"])
            .into_iter()
            .filter_map(CustomTrack::parse)
            .collect()
    }
}

/// Artists removed from candidate pools, compared case-insensitively
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exclusions(Vec<String>);

impl Exclusions {
    pub fn insert(&mut self, artist: impl Into<String>) {
        let artist = artist.into();
        if !self.contains(&artist) {
            self.0.push(artist);
        }
    }

    pub fn contains(&self, artist: &str) -> bool {
        self.0.iter().any(|name| name.eq_ignore_ascii_case(artist.trim()))
    }

    /// A track is excluded when its primary artist is; featured credits are kept
    pub fn rejects(&self, track: &CatalogTrack) -> bool {
        self.contains(track.primary_artist())
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A `add track: <song> by <artist>` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomTrack {
    pub title: String,
    pub artist: String,
}

impl CustomTrack {
    fn parse(body: &str) -> Option<Self> {
        let body = body.trim().trim_end_matches('.');
        let split = body.to_ascii_lowercase().find(" by ")?;
        let title = body[..split].trim();
        let artist = body[split + " by ".len()..].trim();
        if title.is_empty() || artist.is_empty() {
            return None;
        }
        Some(Self {
            title: title.to_string(),
            artist: title_case(artist),
        })
    }

    pub fn to_recommendation(&self) -> TrackRecommendation {
        TrackRecommendation {
            title: self.title.clone(),
            artists: vec![self.artist.clone()],
            album: None,
            mood: MoodTag::Custom,
            reason: CUSTOM_TRACK_REASON.to_string(),
        }
    }
}

/// Optional modifiers extracted from a prompt, independent of classification
#[derive(Debug, Clone)]
pub struct Directives {
    pub track_count: Option<usize>,
    pub tracks_per_mood: Option<usize>,
    pub weights: MoodMap<f64>,
    pub shuffle_passes: usize,
    pub exclusions: Exclusions,
    pub inclusions: Vec<String>,
    pub custom_tracks: Vec<CustomTrack>,
    /// Anchored opener, already dropped when its artist is excluded
    pub intro: Option<&'static CatalogTrack>,
    pub different_outro: bool,
    pub finale_cue: bool,
}

impl Directives {
    pub fn from_prompt(prompt: &Prompt<'_>) -> Self {
        let exclusions = prompt.exclusions();
        let intro = prompt
            .intro_anchor()
            .filter(|track| !exclusions.rejects(track));

        Self {
            track_count: prompt.track_count(),
            tracks_per_mood: prompt.tracks_per_mood(),
            weights: prompt.mood_weights(),
            shuffle_passes: if prompt.wants_surprise() { 3 } else { 1 },
            inclusions: prompt.inclusions(),
            custom_tracks: prompt.custom_tracks(),
            intro,
            exclusions,
            different_outro: prompt.contains("different outro"),
            finale_cue: prompt.has_finale_cue(),
        }
    }

    /// Total journey length: prompt count, then the request limit, then 20
    pub fn total_tracks(&self, requested: Option<usize>) -> usize {
        self.track_count
            .or(requested.filter(|limit| *limit > 0).map(|limit| limit.min(MAX_TRACKS)))
            .unwrap_or(DEFAULT_TRACK_COUNT)
    }

    pub fn is_weighted(&self) -> bool {
        self.weights.values().any(|weight| *weight != 1.0)
    }
}

pub const DEFAULT_TRACK_COUNT: usize = 20;

/// Which candidate pools a journey is built from
#[derive(Debug, Clone, Copy)]
pub enum JourneyKind {
    /// Mixed journey across the listener's top artists
    Personalized,
    /// Journey through one catalog artist
    SingleArtist(&'static ArtistCatalog),
    /// Fixed mood catalog, no user data
    Generic,
}

impl JourneyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JourneyKind::Personalized => "personalized",
            JourneyKind::SingleArtist(_) => "single_artist",
            JourneyKind::Generic => "generic",
        }
    }
}

struct Signals<'p, 'a> {
    prompt: &'p Prompt<'a>,
    directives: &'p Directives,
    has_top_artists: bool,
}

type Rule = fn(&Signals<'_, '_>) -> Option<JourneyKind>;

/// Evaluated in order, first match wins; [`JourneyKind::Generic`] otherwise
const RULES: [Rule; 2] = [personalized_rule, single_artist_rule];

fn personalized_rule(signals: &Signals<'_, '_>) -> Option<JourneyKind> {
    let triggered = signals.prompt.asks_for_mixed_journey() || signals.directives.intro.is_some();
    (triggered && signals.has_top_artists).then_some(JourneyKind::Personalized)
}

fn single_artist_rule(signals: &Signals<'_, '_>) -> Option<JourneyKind> {
    if signals.prompt.asks_for_mixed_journey() {
        return None;
    }
    let named: Vec<&'static ArtistCatalog> = signals
        .prompt
        .mentioned_artists()
        .into_iter()
        .filter(|artist| !signals.directives.exclusions.contains(artist.name))
        .collect();
    match named.as_slice() {
        [artist] => Some(JourneyKind::SingleArtist(artist)),
        _ => None,
    }
}

pub fn classify(prompt: &Prompt<'_>, directives: &Directives, has_top_artists: bool) -> JourneyKind {
    let signals = Signals {
        prompt,
        directives,
        has_top_artists,
    };
    RULES
        .iter()
        .find_map(|rule| rule(&signals))
        .unwrap_or(JourneyKind::Generic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mood;

    fn directives(raw: &str) -> Directives {
        Directives::from_prompt(&Prompt::new(raw))
    }

    #[test]
    fn test_title_case_matches_word_starts() {
        assert_eq!(title_case("kendrick lamar"), "Kendrick Lamar");
        assert_eq!(title_case("XXXTENTACION"), "Xxxtentacion");
        assert_eq!(title_case("tyler, the creator"), "Tyler, The Creator");
    }

    #[test]
    fn test_track_count_words_and_digits() {
        assert_eq!(directives("12 tracks total").track_count, Some(12));
        assert_eq!(directives("give me twelve songs").track_count, Some(12));
        assert_eq!(directives("Ten Tracks please").track_count, Some(10));
        assert_eq!(directives("a sad journey").track_count, None);
    }

    #[test]
    fn test_track_count_clamps_and_ignores_per_mood() {
        assert_eq!(directives("500 tracks").track_count, Some(MAX_TRACKS));
        assert_eq!(directives("26 songs").track_count, Some(MAX_TRACKS));
        assert_eq!(directives("0 tracks").track_count, None);
        assert_eq!(directives("2 tracks per mood").track_count, None);
        assert_eq!(directives("2 tracks per mood, 8 tracks total").track_count, Some(8));
    }

    #[test]
    fn test_tracks_per_mood() {
        assert_eq!(directives("two tracks per mood").tracks_per_mood, Some(2));
        assert_eq!(directives("3 songs per mood").tracks_per_mood, Some(3));
        assert_eq!(directives("5 tracks per mood").tracks_per_mood, None);
    }

    #[test]
    fn test_total_tracks_precedence() {
        assert_eq!(directives("15 tracks").total_tracks(Some(30)), 15);
        assert_eq!(directives("a journey").total_tracks(Some(22)), 22);
        assert_eq!(directives("a journey").total_tracks(Some(50)), MAX_TRACKS);
        assert_eq!(directives("a journey").total_tracks(Some(0)), DEFAULT_TRACK_COUNT);
        assert_eq!(directives("a journey").total_tracks(None), DEFAULT_TRACK_COUNT);
    }

    #[test]
    fn test_mood_weights_multiply() {
        let weights = directives("more high-energy, less sad, extra vibey").weights;
        assert_eq!(weights[Mood::HighEnergy], 2.0);
        assert_eq!(weights[Mood::Vibey], 2.0);
        assert_eq!(weights[Mood::Sad], 0.5);
        assert_eq!(weights[Mood::Upbeat], 1.0);

        let both = directives("more upbeat but also fewer upbeat").weights;
        assert_eq!(both[Mood::Upbeat], 1.0);
    }

    #[test]
    fn test_surprise_triples_shuffles() {
        assert_eq!(directives("surprise me").shuffle_passes, 3);
        assert_eq!(directives("randomize it").shuffle_passes, 3);
        assert_eq!(directives("calm").shuffle_passes, 1);
    }

    #[test]
    fn test_exclude_clause_is_title_cased_and_canonicalized() {
        let exclusions = directives("sad journey, exclude: xxxtentacion, kendrick. more vibey").exclusions;
        assert!(exclusions.contains("XXXTENTACION"));
        assert!(exclusions.contains("Kendrick Lamar"));
        assert_eq!(exclusions.names().len(), 2);
    }

    #[test]
    fn test_named_exclusions() {
        let exclusions = directives("exclude kendrick and exclude xxx please").exclusions;
        assert_eq!(exclusions.names(), ["Kendrick Lamar", "XXXTENTACION"]);
    }

    #[test]
    fn test_every_exclude_clause_applies() {
        let exclusions = directives("exclude: drake; upbeat stuff; exclude: the weeknd").exclusions;
        assert!(exclusions.contains("Drake"));
        assert!(exclusions.contains("The Weeknd"));
    }

    #[test]
    fn test_empty_exclude_clause_is_ignored() {
        assert!(directives("exclude: , ;").exclusions.is_empty());
    }

    #[test]
    fn test_include_clause_stops_at_next_marker() {
        let d = directives("include: sza, frank ocean exclude: drake");
        assert_eq!(d.inclusions, vec!["Sza".to_string(), "Frank Ocean".to_string()]);
        assert!(d.exclusions.contains("drake"));
    }

    #[test]
    fn test_custom_tracks_in_prompt_order() {
        let d = directives(
            "a journey. add song: Pink + White by frank ocean. Add Track: Ivy by Frank Ocean",
        );
        assert_eq!(
            d.custom_tracks,
            vec![
                CustomTrack {
                    title: "Pink + White".to_string(),
                    artist: "Frank Ocean".to_string()
                },
                CustomTrack {
                    title: "Ivy".to_string(),
                    artist: "Frank Ocean".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_malformed_custom_track_is_skipped() {
        assert!(directives("add track: just a title").custom_tracks.is_empty());
        assert!(directives("add track:  by someone").custom_tracks.is_empty());
    }

    #[test]
    fn test_custom_track_recommendation() {
        let rec = directives("add track: Nights by frank ocean").custom_tracks[0].to_recommendation();
        assert_eq!(rec.mood, MoodTag::Custom);
        assert_eq!(rec.artists, vec!["Frank Ocean".to_string()]);
        assert_eq!(rec.reason, CUSTOM_TRACK_REASON);
        assert_eq!(rec.album, None);
    }

    #[test]
    fn test_intro_anchor_requires_artist_title_and_intro() {
        let d = directives("Playboi Carti journey starting with WALK as the intro");
        assert_eq!(d.intro.map(|t| t.title), Some("WALK"));

        assert!(directives("WALK as the intro").intro.is_none());
        assert!(directives("carti walking intro").intro.is_none());
        assert!(directives("carti WALK intro, exclude: playboi carti").intro.is_none());
    }

    #[test]
    fn test_finale_cue_is_a_whole_word() {
        assert!(directives("end with carti").finale_cue);
        assert!(directives("and finally something calm").finale_cue);
        assert!(!directives("weekend vibes").finale_cue);
        assert!(directives("a different outro").different_outro);
    }

    #[test]
    fn test_mentions_use_aliases_and_word_boundaries() {
        let prompt = Prompt::new("kanye and tyler the creator");
        let names: Vec<&str> = prompt.mentioned_artists().iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["Kanye West", "Tyler, The Creator"]);

        assert!(Prompt::new("mandrake roots").mentioned_artists().is_empty());
    }

    #[test]
    fn test_classify_personalized_needs_top_artists() {
        let prompt = Prompt::new("a journey through my top artists");
        let d = Directives::from_prompt(&prompt);
        assert!(matches!(classify(&prompt, &d, true), JourneyKind::Personalized));
        assert!(matches!(classify(&prompt, &d, false), JourneyKind::Generic));
    }

    #[test]
    fn test_classify_intro_anchor_is_personalized() {
        let prompt = Prompt::new("Playboi Carti journey starting with WALK as the intro");
        let d = Directives::from_prompt(&prompt);
        assert!(matches!(classify(&prompt, &d, true), JourneyKind::Personalized));
        assert!(matches!(
            classify(&prompt, &d, false),
            JourneyKind::SingleArtist(artist) if artist.name == "Playboi Carti"
        ));
    }

    #[test]
    fn test_classify_single_artist_needs_exactly_one() {
        let one = Prompt::new("a frank ocean journey");
        let d = Directives::from_prompt(&one);
        assert!(matches!(classify(&one, &d, false), JourneyKind::SingleArtist(a) if a.name == "Frank Ocean"));

        let two = Prompt::new("drake into frank ocean");
        let d = Directives::from_prompt(&two);
        assert!(matches!(classify(&two, &d, false), JourneyKind::Generic));
    }

    #[test]
    fn test_classify_ignores_excluded_mentions() {
        let prompt = Prompt::new("drake to frank ocean, exclude: drake");
        let d = Directives::from_prompt(&prompt);
        assert!(matches!(classify(&prompt, &d, false), JourneyKind::SingleArtist(a) if a.name == "Frank Ocean"));
    }

    #[test]
    fn test_exclusion_keeps_featured_credits() {
        let mut exclusions = Exclusions::default();
        exclusions.insert("Kendrick Lamar");
        let goosebumps = &catalog::GENERIC.high_energy[4];
        let dna = &catalog::GENERIC.high_energy[1];
        assert!(!exclusions.rejects(goosebumps));
        assert!(exclusions.rejects(dna));
    }
}
