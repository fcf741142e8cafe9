//! Hand-authored track tables backing the rule-based journeys.
//!
//! Everything here is immutable `'static` data, shared freely across requests.

use crate::models::{Mood, MoodTag, TrackRecommendation};

/// A track entry in one of the static tables
#[derive(Debug)]
pub struct CatalogTrack {
    pub title: &'static str,
    /// Credited artists, primary first
    pub artists: &'static [&'static str],
    pub album: &'static str,
    pub reason: &'static str,
}

impl CatalogTrack {
    pub fn primary_artist(&self) -> &'static str {
        self.artists.first().copied().unwrap_or_default()
    }

    pub fn to_recommendation(&self, mood: impl Into<MoodTag>) -> TrackRecommendation {
        TrackRecommendation {
            title: self.title.to_string(),
            artists: self.artists.iter().map(|artist| artist.to_string()).collect(),
            album: Some(self.album.to_string()),
            mood: mood.into(),
            reason: self.reason.to_string(),
        }
    }
}

/// Candidate tracks grouped by mood
#[derive(Debug)]
pub struct MoodCatalog {
    pub high_energy: &'static [CatalogTrack],
    pub vibey: &'static [CatalogTrack],
    pub melancholic: &'static [CatalogTrack],
    pub sad: &'static [CatalogTrack],
    pub upbeat: &'static [CatalogTrack],
}

impl MoodCatalog {
    pub fn tracks(&self, mood: Mood) -> &'static [CatalogTrack] {
        match mood {
            Mood::HighEnergy => self.high_energy,
            Mood::Vibey => self.vibey,
            Mood::Melancholic => self.melancholic,
            Mood::Sad => self.sad,
            Mood::Upbeat => self.upbeat,
        }
    }
}

/// Per-artist candidates used by personalized and single-artist journeys
#[derive(Debug)]
pub struct ArtistCatalog {
    pub name: &'static str,
    /// Lowercase short forms also recognized in prompts
    pub aliases: &'static [&'static str],
    pub moods: MoodCatalog,
    /// Closing tracks used when the prompt asks to end with this artist
    pub finale: &'static [CatalogTrack],
}

macro_rules! track {
    ($title:literal, [$($artist:literal),+ $(,)?], $album:literal, $reason:literal $(,)?) => {
        CatalogTrack {
            title: $title,
            artists: &[$($artist),+],
            album: $album,
            reason: $reason,
        }
    };
}

const NO_TRACKS: &[CatalogTrack] = &[];

pub static ARTISTS: &[ArtistCatalog] = &[
    ArtistCatalog {
        name: "Playboi Carti",
        aliases: &["carti"],
        moods: MoodCatalog {
            high_energy: &[
                track!("WALK", ["Playboi Carti"], "WHOLE LOTTA RED", "Relentless opener with blown-out bass"),
                track!("New Tank", ["Playboi Carti"], "Whole Lotta Red", "Rage-type track with aggressive delivery"),
                track!("Stop Breathing", ["Playboi Carti"], "Whole Lotta Red", "Intense, aggressive track with a hard-hitting beat"),
                track!("R.I.P.", ["Playboi Carti"], "Die Lit", "Mosh pit energy with punk-inspired production"),
            ],
            vibey: &[
                track!("Sky", ["Playboi Carti"], "Whole Lotta Red", "More vibey and ambient sound with melodic elements"),
                track!("Place", ["Playboi Carti"], "Whole Lotta Red", "Spacey production with a relaxed flow"),
                track!("Flex", ["Playboi Carti", "Leven Kali"], "Playboi Carti", "Smooth, laid-back track with dreamy production"),
                track!("Location", ["Playboi Carti"], "Playboi Carti", "Ethereal production with ambient qualities"),
            ],
            melancholic: &[
                track!("ILoveUIHateU", ["Playboi Carti"], "Whole Lotta Red", "Melancholic but still energetic with bittersweet lyrics"),
                track!("Over", ["Playboi Carti"], "Whole Lotta Red", "Reflective track with a nostalgic feel"),
                track!("Fell In Luv", ["Playboi Carti", "Bryson Tiller"], "Die Lit", "Emotional track about love with a dreamy beat"),
            ],
            sad: &[
                track!("Long Time (Intro)", ["Playboi Carti"], "Die Lit", "Emotional and reflective with introspective lyrics"),
                track!("F33l Lik3 Dyin", ["Playboi Carti"], "Whole Lotta Red", "Emotional outro to Whole Lotta Red with vulnerable lyrics"),
                track!("Control", ["Playboi Carti"], "Whole Lotta Red", "Emotional track with themes of love and vulnerability"),
            ],
            upbeat: &[
                track!("Magnolia", ["Playboi Carti"], "Playboi Carti", "Bouncy and upbeat with an infectious hook"),
                track!("Shoota", ["Playboi Carti", "Lil Uzi Vert"], "Die Lit", "Energetic collaboration with a playful vibe"),
                track!("wokeuplikethis*", ["Playboi Carti", "Lil Uzi Vert"], "Playboi Carti", "Upbeat track with a catchy melody"),
                track!("Slay3r", ["Playboi Carti"], "Whole Lotta Red", "Bouncy track with a fun, energetic vibe"),
            ],
        },
        finale: &[
            track!("Teen X", ["Playboi Carti", "Future"], "Whole Lotta Red", "Experimental and high-energy finale that blends multiple styles"),
            track!("Metamorphosis", ["Playboi Carti", "Kid Cudi"], "Whole Lotta Red", "Psychedelic track that combines energy with emotional depth - perfect finale"),
        ],
    },
    ArtistCatalog {
        name: "Kendrick Lamar",
        aliases: &["kendrick"],
        moods: MoodCatalog {
            high_energy: &[
                track!("DNA.", ["Kendrick Lamar"], "DAMN.", "Intense lyrics and hard-hitting beat with aggressive delivery"),
                track!("HUMBLE.", ["Kendrick Lamar"], "DAMN.", "Confident, assertive track with a powerful beat"),
                track!("m.A.A.d city", ["Kendrick Lamar", "MC Eiht"], "good kid, m.A.A.d city", "Intense storytelling with a hard-hitting beat"),
            ],
            vibey: NO_TRACKS,
            melancholic: &[
                track!("PRIDE.", ["Kendrick Lamar"], "DAMN.", "Introspective track with a dreamy, nostalgic production"),
            ],
            sad: &[
                track!("u", ["Kendrick Lamar"], "To Pimp A Butterfly", "Intense emotional breakdown with themes of self-loathing and guilt"),
            ],
            upbeat: NO_TRACKS,
        },
        finale: NO_TRACKS,
    },
    ArtistCatalog {
        name: "Drake",
        aliases: &[],
        moods: MoodCatalog {
            high_energy: NO_TRACKS,
            vibey: &[
                track!("Passionfruit", ["Drake"], "More Life", "Tropical house-influenced track with a relaxed, groovy feel"),
            ],
            melancholic: NO_TRACKS,
            sad: &[
                track!("Marvin's Room", ["Drake"], "Take Care", "Raw emotional vulnerability with drunk phone calls and regret"),
            ],
            upbeat: &[
                track!("Nice For What", ["Drake"], "Scorpion", "Bouncy New Orleans bounce-inspired track with an empowering message"),
            ],
        },
        finale: NO_TRACKS,
    },
    ArtistCatalog {
        name: "Travis Scott",
        aliases: &["travis"],
        moods: MoodCatalog {
            high_energy: &[
                track!("Sicko Mode", ["Travis Scott", "Drake"], "Astroworld", "High energy track with dynamic beat changes and multiple sections"),
                track!("Goosebumps", ["Travis Scott", "Kendrick Lamar"], "Birds in the Trap Sing McKnight", "Hypnotic, high-energy track with psychedelic elements"),
            ],
            vibey: &[
                track!("SKELETONS", ["Travis Scott"], "Astroworld", "Psychedelic and dreamy production with a hypnotic feel"),
            ],
            melancholic: NO_TRACKS,
            sad: NO_TRACKS,
            upbeat: NO_TRACKS,
        },
        finale: NO_TRACKS,
    },
    ArtistCatalog {
        name: "Kanye West",
        aliases: &["kanye"],
        moods: MoodCatalog {
            high_energy: &[
                track!("POWER", ["Kanye West"], "My Beautiful Dark Twisted Fantasy", "Powerful production with energetic delivery"),
            ],
            vibey: &[
                track!("Flashing Lights", ["Kanye West", "Dwele"], "Graduation", "Lush production with strings and synths creating an immersive atmosphere"),
            ],
            melancholic: &[
                track!("Runaway", ["Kanye West", "Pusha T"], "My Beautiful Dark Twisted Fantasy", "Beautiful piano intro leading to an introspective journey of self-awareness"),
            ],
            sad: &[
                track!("Street Lights", ["Kanye West"], "808s & Heartbreak", "Emotional track with auto-tuned vocals expressing vulnerability"),
            ],
            upbeat: &[
                track!("Good Life", ["Kanye West", "T-Pain"], "Graduation", "Celebratory track with a positive message and catchy chorus"),
            ],
        },
        finale: NO_TRACKS,
    },
    ArtistCatalog {
        name: "Frank Ocean",
        aliases: &[],
        moods: MoodCatalog {
            high_energy: NO_TRACKS,
            vibey: &[
                track!("Nights", ["Frank Ocean"], "Blonde", "Atmospheric with a beat switch that changes the mood halfway through"),
            ],
            melancholic: &[
                track!("Self Control", ["Frank Ocean"], "Blonde", "Bittersweet lyrics with beautiful guitar and vocal layering"),
                track!("Ivy", ["Frank Ocean"], "Blonde", "Reflective lyrics about past relationships with a nostalgic tone"),
            ],
            sad: NO_TRACKS,
            upbeat: NO_TRACKS,
        },
        finale: NO_TRACKS,
    },
    ArtistCatalog {
        name: "Tyler, The Creator",
        aliases: &["tyler the creator"],
        moods: MoodCatalog {
            high_energy: NO_TRACKS,
            vibey: NO_TRACKS,
            melancholic: &[
                track!("See You Again", ["Tyler, The Creator", "Kali Uchis"], "Flower Boy", "Dreamy production with nostalgic lyrics about longing"),
            ],
            sad: NO_TRACKS,
            upbeat: &[
                track!("EARFQUAKE", ["Tyler, The Creator"], "IGOR", "Bouncy track with a catchy chorus and playful energy"),
            ],
        },
        finale: NO_TRACKS,
    },
    ArtistCatalog {
        name: "The Weeknd",
        aliases: &["weeknd"],
        moods: MoodCatalog {
            high_energy: NO_TRACKS,
            vibey: &[
                track!("After Hours", ["The Weeknd"], "After Hours", "Ambient production with a hypnotic rhythm and nocturnal feel"),
            ],
            melancholic: NO_TRACKS,
            sad: NO_TRACKS,
            upbeat: &[
                track!("Blinding Lights", ["The Weeknd"], "After Hours", "Energetic 80s-inspired synth-pop track with a driving beat"),
            ],
        },
        finale: NO_TRACKS,
    },
];

/// Journey used when the prompt carries no personal signal
pub static GENERIC: MoodCatalog = MoodCatalog {
    high_energy: &[
        track!("Sicko Mode", ["Travis Scott", "Drake"], "Astroworld", "High energy opener with dynamic beat changes and multiple sections"),
        track!("DNA.", ["Kendrick Lamar"], "DAMN.", "Intense lyrics and hard-hitting beat with aggressive delivery"),
        track!("Mo Bamba", ["Sheck Wes"], "Mudboy", "Rage-inducing anthem with heavy bass and crowd-pleasing energy"),
        track!("HUMBLE.", ["Kendrick Lamar"], "DAMN.", "Confident, assertive track with a powerful beat"),
        track!("Goosebumps", ["Travis Scott", "Kendrick Lamar"], "Birds in the Trap Sing McKnight", "Hypnotic, high-energy track with psychedelic elements"),
    ],
    vibey: &[
        track!("Redbone", ["Childish Gambino"], "Awaken, My Love!", "Smooth, funk-inspired groove with atmospheric production"),
        track!("Nights", ["Frank Ocean"], "Blonde", "Atmospheric with a beat switch that changes the mood halfway through"),
        track!("After Hours", ["The Weeknd"], "After Hours", "Ambient production with a hypnotic rhythm and nocturnal feel"),
        track!("Passionfruit", ["Drake"], "More Life", "Tropical house-influenced track with a relaxed, groovy feel"),
        track!("Flashing Lights", ["Kanye West", "Dwele"], "Graduation", "Lush production with strings and synths creating an immersive atmosphere"),
    ],
    melancholic: &[
        track!("Self Control", ["Frank Ocean"], "Blonde", "Bittersweet lyrics with beautiful guitar and vocal layering"),
        track!("505", ["Arctic Monkeys"], "Favourite Worst Nightmare", "Nostalgic and builds to an emotional climax with yearning lyrics"),
        track!("Ivy", ["Frank Ocean"], "Blonde", "Reflective lyrics about past relationships with a nostalgic tone"),
        track!("Runaway", ["Kanye West", "Pusha T"], "My Beautiful Dark Twisted Fantasy", "Beautiful piano intro leading to an introspective journey of self-awareness"),
        track!("Mirrors", ["Justin Timberlake"], "The 20/20 Experience", "Reflective lyrics with a bittersweet melody and expansive production"),
    ],
    sad: &[
        track!("Marvin's Room", ["Drake"], "Take Care", "Raw emotional vulnerability with drunk phone calls and regret"),
        track!("Jocelyn Flores", ["XXXTENTACION"], "17", "Deeply emotional tribute to a friend who passed away"),
        track!("u", ["Kendrick Lamar"], "To Pimp A Butterfly", "Intense emotional breakdown with themes of self-loathing and guilt"),
        track!("Hurt", ["Johnny Cash"], "American IV: The Man Comes Around", "Powerful cover filled with regret and reflection at the end of life"),
        track!("Everybody Hurts", ["R.E.M."], "Automatic for the People", "Universal anthem about pain and the importance of perseverance"),
    ],
    upbeat: &[
        track!("Sunflower", ["Post Malone", "Swae Lee"], "Spider-Man: Into the Spider-Verse", "Bright melody with uplifting lyrics and a catchy chorus"),
        track!("Good Feeling", ["Flo Rida"], "Wild Ones", "Energetic dance track with positive vibes and motivational lyrics"),
        track!("I Wanna Dance With Somebody", ["Whitney Houston"], "Whitney", "Classic feel-good dance anthem with joyful energy"),
        track!("Can't Stop the Feeling!", ["Justin Timberlake"], "Trolls (Original Motion Picture Soundtrack)", "Infectious pop song designed to make people dance and feel good"),
        track!("Uptown Funk", ["Mark Ronson", "Bruno Mars"], "Uptown Special", "Funk-inspired hit with irresistible groove and confident energy"),
    ],
};

pub static GENERIC_FINALE: &[CatalogTrack] = &[
    track!("Stronger", ["Kanye West"], "Graduation", "Triumphant finale that combines electronic elements with motivational themes"),
    track!("All of the Lights", ["Kanye West", "Rihanna", "Kid Cudi"], "My Beautiful Dark Twisted Fantasy", "Grand, orchestral production that brings together multiple elements for an epic conclusion"),
];

/// First choices when a personalized bucket runs short, tried before the generic table
pub static FILLERS: MoodCatalog = MoodCatalog {
    high_energy: &[
        track!("Mo Bamba", ["Sheck Wes"], "Mudboy", "Rage-inducing anthem with heavy bass and crowd-pleasing energy"),
    ],
    vibey: &[
        track!("Redbone", ["Childish Gambino"], "Awaken, My Love!", "Smooth, funk-inspired groove with atmospheric production"),
    ],
    melancholic: &[
        track!("505", ["Arctic Monkeys"], "Favourite Worst Nightmare", "Nostalgic and builds to an emotional climax with yearning lyrics"),
    ],
    sad: &[
        track!("Jocelyn Flores", ["XXXTENTACION"], "17", "Deeply emotional tribute to a friend who passed away"),
        track!("Hurt", ["Johnny Cash"], "American IV: The Man Comes Around", "Powerful cover filled with regret and reflection"),
    ],
    upbeat: &[
        track!("Sunflower", ["Post Malone", "Swae Lee"], "Spider-Man: Into the Spider-Verse", "Bright melody with uplifting lyrics and a catchy chorus"),
    ],
};

/// Tracks that can open a journey when the prompt names them as the intro
pub static INTRO_ANCHORS: &[CatalogTrack] = &[track!(
    "WALK",
    ["Playboi Carti"],
    "WHOLE LOTTA RED",
    "Requested as the intro track - high energy opener",
)];

/// Replacement closers for "different outro", in priority order
pub static ALTERNATE_OUTROS: &[CatalogTrack] = &[
    track!("Stronger", ["Kanye West"], "Graduation", "Triumphant finale that combines electronic elements with motivational themes"),
    track!("STARGAZING", ["Travis Scott"], "Astroworld", "Psychedelic track with a beat switch that serves as a perfect finale"),
    track!("Headlines", ["Drake"], "Take Care", "Confident track with a triumphant feel that works well as a finale"),
];

/// Closer used when the prompt asks for an ending without naming whose
pub static DEFAULT_FINALE: &[CatalogTrack] = &[track!(
    "Stronger",
    ["Kanye West"],
    "Graduation",
    "Triumphant finale that combines electronic elements with motivational themes",
)];

pub fn find_artist(name: &str) -> Option<&'static ArtistCatalog> {
    let name = name.trim();
    ARTISTS
        .iter()
        .find(|artist| artist.name.eq_ignore_ascii_case(name))
}
