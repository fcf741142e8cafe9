use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::Arc;

use crate::{
    models::{RecommendationRequest, TrackRecommendation},
    services::{
        generation::{self, GenerationError, TextGenerator},
        journey::{JourneyKind, JourneyPlan},
    },
};

/// Reason the generation stage handed the request to the rule-based engine
#[derive(Debug, thiserror::Error)]
pub enum Fallback {
    #[error("no text generator configured")]
    NotConfigured,

    #[error("personalized journeys are always built from the catalog")]
    Personalized,

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Produces journeys, preferring the text generator when one is configured.
///
/// Never fails: every generation problem ends in the rule-based journey.
#[derive(Clone, Default)]
pub struct Recommender {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl Recommender {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    /// Recommender that only uses the static catalogs
    pub fn rule_based() -> Self {
        Self::default()
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn produce(&self, request: &RecommendationRequest) -> Vec<TrackRecommendation> {
        let mut rng = StdRng::from_entropy();
        self.produce_with_rng(request, &mut rng).await
    }

    /// Same as [`Recommender::produce`] with a caller-provided shuffle source
    pub async fn produce_with_rng<R>(
        &self,
        request: &RecommendationRequest,
        rng: &mut R,
    ) -> Vec<TrackRecommendation>
    where
        R: Rng + Send + ?Sized,
    {
        let plan = JourneyPlan::analyze(request);

        match self.generate(request, &plan).await {
            Ok(tracks) => {
                tracing::info!(tracks = tracks.len(), "Using generated recommendations");
                tracks
            }
            Err(reason) => {
                match &reason {
                    Fallback::NotConfigured | Fallback::Personalized => {
                        tracing::debug!(reason = %reason, "Using rule-based journey");
                    }
                    Fallback::Generation(_) => {
                        tracing::warn!(reason = %reason, "Generation failed, using rule-based journey");
                    }
                }
                plan.build(rng)
            }
        }
    }

    async fn generate(
        &self,
        request: &RecommendationRequest,
        plan: &JourneyPlan<'_>,
    ) -> Result<Vec<TrackRecommendation>, Fallback> {
        if matches!(plan.kind(), JourneyKind::Personalized) {
            return Err(Fallback::Personalized);
        }
        let generator = self.generator.as_ref().ok_or(Fallback::NotConfigured)?;

        tracing::debug!(generator = generator.name(), "Requesting generated recommendations");
        let text = generator.generate(&generation::build_prompt(request)).await?;
        Ok(generation::parse_generated(&text)?)
    }
}
