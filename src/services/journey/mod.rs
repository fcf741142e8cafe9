//! Rule-based journey engine.
//!
//! A prompt is classified once into a [`JourneyKind`], its directives are
//! extracted independently, and the journey is assembled as
//! `custom tracks + intro + mood block + finale`.

mod allocation;
mod catalog;
mod prompt;

use rand::Rng;
use tracing::{debug, info};

pub use allocation::{allocate, assemble};
pub use catalog::{ArtistCatalog, CatalogTrack};
pub use prompt::{
    classify, title_case, CustomTrack, Directives, Exclusions, JourneyKind, Prompt,
    DEFAULT_TRACK_COUNT, MAX_TRACKS,
};

use catalog::{MoodCatalog, ALTERNATE_OUTROS, DEFAULT_FINALE, FILLERS, GENERIC, GENERIC_FINALE};
use crate::models::{Mood, MoodMap, RecommendationRequest, TrackRecommendation};

/// Buckets are topped up from the filler tables until they hold this many tracks
const BUCKET_FLOOR: usize = 3;

/// Personalized journeys draw from at most this many of the listener's top artists
const MAX_WORKING_ARTISTS: usize = 10;

/// Intro and finale tracks are tagged as high energy
const FIXED_TRACK_MOOD: Mood = Mood::HighEnergy;

/// A classified prompt ready to be turned into a journey
#[derive(Debug)]
pub struct JourneyPlan<'a> {
    prompt: Prompt<'a>,
    directives: Directives,
    kind: JourneyKind,
    top_artists: Vec<&'a str>,
    limit: Option<usize>,
}

impl<'a> JourneyPlan<'a> {
    pub fn analyze(request: &'a RecommendationRequest) -> Self {
        let prompt = Prompt::new(&request.prompt);
        let directives = Directives::from_prompt(&prompt);
        let top_artists: Vec<&str> = request
            .top_artists
            .iter()
            .map(|artist| artist.name.trim())
            .filter(|name| !name.is_empty())
            .collect();
        let kind = classify(&prompt, &directives, !top_artists.is_empty());

        debug!(
            kind = kind.as_str(),
            track_count = ?directives.track_count,
            tracks_per_mood = ?directives.tracks_per_mood,
            weighted = directives.is_weighted(),
            excluded = ?directives.exclusions.names(),
            included = ?directives.inclusions,
            custom_tracks = directives.custom_tracks.len(),
            intro = directives.intro.is_some(),
            "Analyzed journey prompt"
        );

        Self {
            prompt,
            directives,
            kind,
            top_artists,
            limit: request.limit,
        }
    }

    pub fn kind(&self) -> JourneyKind {
        self.kind
    }

    /// Final journey length, fixed tracks included
    pub fn total_tracks(&self) -> usize {
        self.directives.total_tracks(self.limit)
    }

    /// Fixed tracks and candidate pools, everything but the random draw
    fn layout(&self) -> Layout {
        let directives = &self.directives;
        let limit = self.total_tracks();

        let (working_artists, mut finale) = match self.kind {
            JourneyKind::Personalized => {
                let names = self.personalized_artists();
                let finale = self.personalized_finale(&names);
                (names, finale)
            }
            JourneyKind::SingleArtist(artist) => {
                let mut names = vec![artist.name.to_string()];
                self.extend_unique(&mut names, directives.inclusions.iter().map(String::as_str));
                let finale = self.single_artist_finale(artist, &names);
                (names, finale)
            }
            JourneyKind::Generic => (Vec::new(), self.without_excluded(GENERIC_FINALE)),
        };

        // Fixed tracks claim the budget in order: custom, intro, finale
        let mut customs: Vec<TrackRecommendation> = directives
            .custom_tracks
            .iter()
            .map(CustomTrack::to_recommendation)
            .collect();
        customs.truncate(limit);
        let mut room = limit - customs.len();
        let intro = directives.intro.filter(|_| room > 0);
        room -= usize::from(intro.is_some());
        finale.truncate(room);
        let remaining = room - finale.len();

        let reserved: Vec<&str> = customs
            .iter()
            .map(|track| track.title.as_str())
            .chain(intro.map(|track| track.title))
            .chain(finale.iter().map(|track| track.title))
            .collect();
        let mut pools = PoolBuilder::new(&directives.exclusions, reserved);
        match self.kind {
            JourneyKind::Generic => pools.add_catalog(&GENERIC),
            _ => {
                for artist in working_artists.iter().filter_map(|name| catalog::find_artist(name)) {
                    pools.add_catalog(&artist.moods);
                }
            }
        }
        let buckets = pools.fill_floor().top_up(remaining).finish();

        Layout {
            customs,
            intro,
            finale,
            buckets,
            remaining,
        }
    }

    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<TrackRecommendation> {
        let layout = self.layout();
        let alloc = allocate(
            layout.remaining,
            &self.directives.weights,
            self.directives.tracks_per_mood,
        );

        info!(
            kind = self.kind.as_str(),
            limit = self.total_tracks(),
            remaining = layout.remaining,
            allocation = ?alloc,
            finale = layout.finale.len(),
            "Building journey"
        );

        let candidates = MoodMap::from_fn(|mood| {
            layout.buckets[mood]
                .iter()
                .map(|track| track.to_recommendation(mood))
                .collect::<Vec<_>>()
        });
        let mood_block = assemble(
            candidates,
            &alloc,
            layout.remaining,
            self.directives.shuffle_passes,
            rng,
        );

        let mut journey = layout.customs;
        journey.extend(layout.intro.map(|track| track.to_recommendation(FIXED_TRACK_MOOD)));
        journey.extend(mood_block);
        journey.extend(
            layout
                .finale
                .iter()
                .map(|track| track.to_recommendation(FIXED_TRACK_MOOD)),
        );
        journey
    }

    /// Top artists, then `include:` artists, then catalog artists named in the prompt
    fn personalized_artists(&self) -> Vec<String> {
        let mut names = Vec::new();
        let top = self
            .top_artists
            .iter()
            .copied()
            .filter(|name| !self.directives.exclusions.contains(name));
        self.extend_unique(&mut names, top);
        names.truncate(MAX_WORKING_ARTISTS);

        self.extend_unique(&mut names, self.directives.inclusions.iter().map(String::as_str));
        let mentioned = self.prompt.mentioned_artists();
        self.extend_unique(&mut names, mentioned.iter().map(|artist| artist.name));
        names
    }

    fn extend_unique<'n>(&self, names: &mut Vec<String>, extra: impl IntoIterator<Item = &'n str>) {
        for name in extra {
            let known = names.iter().any(|existing| existing.eq_ignore_ascii_case(name));
            if !known && !self.directives.exclusions.contains(name) {
                names.push(name.to_string());
            }
        }
    }

    /// Catalog artist with a dedicated finale who is named in the prompt
    fn finale_artist(&self) -> Option<&'static ArtistCatalog> {
        self.prompt
            .mentioned_artists()
            .into_iter()
            .find(|artist| !artist.finale.is_empty() && !self.directives.exclusions.contains(artist.name))
    }

    fn personalized_finale(&self, names: &[String]) -> Vec<&'static CatalogTrack> {
        let directives = &self.directives;
        match self.finale_artist() {
            Some(_) if directives.different_outro => self.alternate_outro(names),
            Some(artist) if directives.finale_cue => artist.finale.iter().collect(),
            None if directives.finale_cue => self.without_excluded(DEFAULT_FINALE),
            _ => Vec::new(),
        }
    }

    fn single_artist_finale(
        &self,
        artist: &'static ArtistCatalog,
        names: &[String],
    ) -> Vec<&'static CatalogTrack> {
        if self.directives.different_outro {
            self.alternate_outro(names)
        } else if !artist.finale.is_empty() {
            artist.finale.iter().collect()
        } else if self.directives.finale_cue {
            self.without_excluded(DEFAULT_FINALE)
        } else {
            Vec::new()
        }
    }

    /// First alternate outro by a working artist, else the first one still allowed
    fn alternate_outro(&self, names: &[String]) -> Vec<&'static CatalogTrack> {
        let allowed = || {
            ALTERNATE_OUTROS
                .iter()
                .filter(move |track| !self.directives.exclusions.rejects(track))
        };
        allowed()
            .find(|track| {
                names
                    .iter()
                    .any(|name| name.eq_ignore_ascii_case(track.primary_artist()))
            })
            .or_else(|| allowed().next())
            .into_iter()
            .collect()
    }

    fn without_excluded(&self, tracks: &'static [CatalogTrack]) -> Vec<&'static CatalogTrack> {
        tracks
            .iter()
            .filter(|track| !self.directives.exclusions.rejects(track))
            .collect()
    }
}

struct Layout {
    customs: Vec<TrackRecommendation>,
    intro: Option<&'static CatalogTrack>,
    finale: Vec<&'static CatalogTrack>,
    buckets: MoodMap<Vec<&'static CatalogTrack>>,
    /// Slots left for the mood block
    remaining: usize,
}

/// Collects per-mood candidates, skipping excluded artists, reserved titles
/// and duplicates
struct PoolBuilder<'d> {
    exclusions: &'d Exclusions,
    reserved: Vec<&'d str>,
    buckets: MoodMap<Vec<&'static CatalogTrack>>,
}

impl<'d> PoolBuilder<'d> {
    fn new(exclusions: &'d Exclusions, reserved: Vec<&'d str>) -> Self {
        Self {
            exclusions,
            reserved,
            buckets: MoodMap::from_fn(|_| Vec::new()),
        }
    }

    fn add(&mut self, mood: Mood, track: &'static CatalogTrack) -> bool {
        let taken = |title: &str| title.eq_ignore_ascii_case(track.title);
        if self.exclusions.rejects(track)
            || self.reserved.iter().any(|title| taken(title))
            || self.buckets[mood].iter().any(|existing| taken(existing.title))
        {
            return false;
        }
        self.buckets[mood].push(track);
        true
    }

    fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    fn add_catalog(&mut self, catalog: &'static MoodCatalog) {
        for mood in Mood::ALL {
            for track in catalog.tracks(mood) {
                self.add(mood, track);
            }
        }
    }

    fn fill_floor(mut self) -> Self {
        for mood in Mood::ALL {
            let fillers = FILLERS.tracks(mood).iter().chain(GENERIC.tracks(mood));
            for track in fillers {
                if self.buckets[mood].len() >= BUCKET_FLOOR {
                    break;
                }
                self.add(mood, track);
            }
        }
        self
    }

    /// Adds fillers round-robin across moods until `wanted` candidates exist
    fn top_up(mut self, wanted: usize) -> Self {
        let mut fillers =
            MoodMap::from_fn(|mood| FILLERS.tracks(mood).iter().chain(GENERIC.tracks(mood)));
        loop {
            let mut added = false;
            for mood in Mood::ALL {
                if self.len() >= wanted {
                    return self;
                }
                added |= fillers[mood].by_ref().any(|track| self.add(mood, track));
            }
            if !added {
                return self;
            }
        }
    }

    fn finish(self) -> MoodMap<Vec<&'static CatalogTrack>> {
        self.buckets
    }
}

/// Builds a journey for `request` in one step
pub fn build_journey<R: Rng + ?Sized>(
    request: &RecommendationRequest,
    rng: &mut R,
) -> Vec<TrackRecommendation> {
    JourneyPlan::analyze(request).build(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MoodTag;
    use rand::{rngs::StdRng, SeedableRng};

    fn journey(request: &RecommendationRequest, seed: u64) -> Vec<TrackRecommendation> {
        build_journey(request, &mut StdRng::seed_from_u64(seed))
    }

    fn mood_positions(tracks: &[TrackRecommendation]) -> Vec<usize> {
        tracks
            .iter()
            .filter_map(|track| track.mood.mood())
            .map(|mood| Mood::ALL.iter().position(|m| *m == mood).unwrap_or_default())
            .collect()
    }

    fn is_sorted(values: &[usize]) -> bool {
        values.windows(2).all(|pair| pair[0] <= pair[1])
    }

    #[test]
    fn test_default_journey_is_twenty_with_generic_finale() {
        let request = RecommendationRequest::new("take me from hype to heartbreak");
        let tracks = journey(&request, 1);

        assert_eq!(tracks.len(), DEFAULT_TRACK_COUNT);
        let tail: Vec<&str> = tracks[18..].iter().map(|t| t.title.as_str()).collect();
        assert_eq!(tail, vec!["Stronger", "All of the Lights"]);

        let block = mood_positions(&tracks[..18]);
        assert!(is_sorted(&block));
        for mood in Mood::ALL {
            assert!(tracks[..18].iter().any(|t| t.mood.mood() == Some(mood)));
        }
    }

    #[test]
    fn test_explicit_counts_are_exact() {
        for (prompt, expected) in [
            ("12 tracks total please", 12),
            ("ten tracks of vibes", 10),
            ("a quick 5 tracks", 5),
            ("fifteen songs, more sad", 15),
            ("2 tracks per mood, 14 tracks", 14),
        ] {
            let tracks = journey(&RecommendationRequest::new(prompt), 3);
            assert_eq!(tracks.len(), expected, "prompt: {prompt}");
        }
    }

    #[test]
    fn test_request_limit_used_without_prompt_count() {
        let mut request = RecommendationRequest::new("just vibes");
        request.limit = Some(8);
        assert_eq!(journey(&request, 5).len(), 8);
    }

    #[test]
    fn test_tiny_budget_clips_fixed_tracks() {
        let tracks = journey(&RecommendationRequest::new("1 track"), 2);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title, "Stronger");

        let request = RecommendationRequest::new(
            "2 tracks. add track: Ivy by frank ocean; add track: Nights by frank ocean; add track: Hurt by johnny cash",
        );
        let titles: Vec<String> = journey(&request, 2).into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["Ivy", "Nights"]);
    }

    #[test]
    fn test_xxxtentacion_exclusion_scenario() {
        let request = RecommendationRequest::new(
            "give me a high energy to sad journey, 10 tracks total, exclude: XXXTENTACION",
        );

        for seed in 0..10 {
            let tracks = journey(&request, seed);
            assert_eq!(tracks.len(), 10);
            assert!(tracks.iter().all(|t| !t.is_credited_to("XXXTENTACION")));

            let block = mood_positions(&tracks[..8]);
            assert!(is_sorted(&block));
            for mood in Mood::ALL {
                assert!(tracks.iter().any(|t| t.mood.mood() == Some(mood)));
            }
        }
    }

    #[test]
    fn test_personalized_sad_filler_swaps_when_excluded() {
        let request = RecommendationRequest::new("a journey through my top artists, exclude: xxxtentacion")
            .with_top_artists(["Drake"]);
        let plan = JourneyPlan::analyze(&request);
        assert!(matches!(plan.kind(), JourneyKind::Personalized));

        let tracks = plan.build(&mut StdRng::seed_from_u64(4));
        assert!(tracks.iter().all(|t| t.title != "Jocelyn Flores"));
        assert_eq!(tracks.len(), DEFAULT_TRACK_COUNT);
    }

    #[test]
    fn test_walk_intro_scenario() {
        let request = RecommendationRequest::new("Playboi Carti journey starting with WALK as the intro")
            .with_top_artists(["Playboi Carti"]);

        for seed in 0..5 {
            let tracks = journey(&request, seed);
            assert_eq!(tracks[0].title, "WALK");
            assert_eq!(tracks[0].primary_artist(), Some("Playboi Carti"));
            assert_eq!(tracks[0].album_name(), "WHOLE LOTTA RED");
            assert_eq!(tracks.iter().filter(|t| t.title == "WALK").count(), 1);
        }
    }

    #[test]
    fn test_custom_tracks_lead_and_count_against_budget() {
        let request = RecommendationRequest::new(
            "12 tracks. add track: Pink + White by frank ocean; add song: Nights by Frank Ocean",
        );
        let tracks = journey(&request, 9);

        assert_eq!(tracks.len(), 12);
        assert_eq!(tracks[0].title, "Pink + White");
        assert_eq!(tracks[1].title, "Nights");
        assert_eq!(tracks[0].mood, MoodTag::Custom);
        assert_eq!(tracks[1].mood, MoodTag::Custom);
        assert!(tracks[2..].iter().all(|t| t.mood != MoodTag::Custom));
        assert_eq!(tracks.iter().filter(|t| t.title == "Nights").count(), 1);
    }

    #[test]
    fn test_exclusion_keeps_tracks_featuring_excluded_artist() {
        let request = RecommendationRequest::new("a journey, 40 tracks, exclude kendrick");
        let plan = JourneyPlan::analyze(&request);
        assert_eq!(plan.total_tracks(), MAX_TRACKS);

        let layout = plan.layout();
        assert!(layout.buckets[Mood::HighEnergy].iter().any(|t| t.title == "Goosebumps"));
        assert!(layout
            .buckets
            .values()
            .flatten()
            .all(|t| t.primary_artist() != "Kendrick Lamar"));

        for seed in 0..5 {
            let tracks = plan.build(&mut StdRng::seed_from_u64(seed));
            assert!(tracks
                .iter()
                .all(|t| t.primary_artist() != Some("Kendrick Lamar")));
        }
    }

    #[test]
    fn test_largest_count_is_filled_on_every_branch() {
        let requests = [
            RecommendationRequest::new("a journey, 25 tracks"),
            RecommendationRequest::new("a journey, 50 tracks"),
            RecommendationRequest {
                limit: Some(50),
                ..RecommendationRequest::new("a journey")
            },
            RecommendationRequest::new("a frank ocean journey, 30 tracks"),
            RecommendationRequest::new("journey through my top artists, 50 tracks")
                .with_top_artists(["Drake"]),
        ];

        for request in &requests {
            for seed in 0..4 {
                let tracks = journey(request, seed);
                assert_eq!(tracks.len(), MAX_TRACKS, "prompt: {}", request.prompt);
            }
        }
    }

    #[test]
    fn test_membership_is_stable_across_runs() {
        let request = RecommendationRequest::new("a journey through my top artists, end with carti")
            .with_top_artists(["Drake", "Frank Ocean", "Playboi Carti"]);

        let titles = |layout: &Layout| -> MoodMap<Vec<&'static str>> {
            MoodMap::from_fn(|mood| layout.buckets[mood].iter().map(|t| t.title).collect())
        };
        let first = JourneyPlan::analyze(&request).layout();
        let second = JourneyPlan::analyze(&request).layout();
        assert_eq!(titles(&first), titles(&second));

        let plan = JourneyPlan::analyze(&request);
        for seed in 0..6 {
            let tracks = plan.build(&mut StdRng::seed_from_u64(seed));
            assert_eq!(tracks.len(), DEFAULT_TRACK_COUNT);

            let tail: Vec<&str> = tracks[18..].iter().map(|t| t.title.as_str()).collect();
            assert_eq!(tail, vec!["Teen X", "Metamorphosis"]);
            for track in &tracks[..18] {
                let mood = track.mood.mood().unwrap();
                assert!(first.buckets[mood].iter().any(|t| t.title == track.title));
            }
        }
    }

    #[test]
    fn test_same_seed_same_journey() {
        let request = RecommendationRequest::new("surprise me with more upbeat");
        assert_eq!(journey(&request, 42), journey(&request, 42));
    }

    #[test]
    fn test_single_artist_journey_stays_with_artist() {
        let request = RecommendationRequest::new("a frank ocean journey, 2 tracks per mood, 10 tracks");
        let plan = JourneyPlan::analyze(&request);
        assert!(matches!(plan.kind(), JourneyKind::SingleArtist(a) if a.name == "Frank Ocean"));

        let tracks = plan.build(&mut StdRng::seed_from_u64(8));
        assert_eq!(tracks.len(), 10);
        assert!(tracks.iter().any(|t| t.primary_artist() == Some("Frank Ocean")));
    }

    #[test]
    fn test_single_artist_finale_and_different_outro() {
        let carti = RecommendationRequest::new("playboi carti deep cuts");
        let tracks = journey(&carti, 1);
        let tail: Vec<&str> = tracks[tracks.len() - 2..].iter().map(|t| t.title.as_str()).collect();
        assert_eq!(tail, vec!["Teen X", "Metamorphosis"]);

        let outro = RecommendationRequest::new("playboi carti with a different outro");
        let tracks = journey(&outro, 1);
        assert_eq!(tracks.last().map(|t| t.title.as_str()), Some("Stronger"));
        assert_eq!(tracks.len(), DEFAULT_TRACK_COUNT);
    }

    #[test]
    fn test_different_outro_prefers_working_artist() {
        let request = RecommendationRequest::new(
            "journey through my top artists, end with carti but a different outro",
        )
        .with_top_artists(["Travis Scott", "Playboi Carti"]);
        let tracks = journey(&request, 6);
        assert_eq!(tracks.last().map(|t| t.title.as_str()), Some("STARGAZING"));
        assert!(tracks.iter().all(|t| t.title != "Teen X"));
    }

    #[test]
    fn test_ending_cue_without_finale_artist_uses_default() {
        let request = RecommendationRequest::new("journey through my top artists and end strong")
            .with_top_artists(["Drake"]);
        let tracks = journey(&request, 6);
        assert_eq!(tracks.last().map(|t| t.title.as_str()), Some("Stronger"));

        let excluded = RecommendationRequest::new(
            "journey through my top artists and end strong, exclude: kanye west",
        )
        .with_top_artists(["Drake"]);
        let tracks = journey(&excluded, 6);
        assert!(tracks.iter().all(|t| t.primary_artist() != Some("Kanye West")));
    }

    #[test]
    fn test_included_artists_join_the_pool() {
        let request = RecommendationRequest::new("journey through my top artists, 25 tracks; include: the weeknd")
            .with_top_artists(["Drake"]);
        let tracks = journey(&request, 11);
        assert_eq!(tracks.len(), MAX_TRACKS);
        assert!(tracks.iter().any(|t| t.primary_artist() == Some("The Weeknd")));
    }

    #[test]
    fn test_tracks_per_mood_override() {
        let request = RecommendationRequest::new("1 track per mood, 5 tracks, exclude: kanye west");
        let tracks = journey(&request, 2);
        assert_eq!(tracks.len(), 5);
        let moods: Vec<Option<Mood>> = tracks.iter().map(|t| t.mood.mood()).collect();
        assert_eq!(moods, Mood::ALL.map(Some).to_vec());
    }
}
