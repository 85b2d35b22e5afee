// Analysis orchestrator: detect the formation, read the phase of play,
// mirror the layout, and attach coach commentary.

use serde::{Deserialize, Serialize};

use crate::coach::CoachClient;
use crate::formation::{self, Formation};
use crate::layout;
use crate::metrics;
use crate::persona::Persona;
use crate::phase::{self, Phase};
use crate::pitch::{Point, TrackedPlayer};

/// Provider budget for one analysis comment.
const ANALYSIS_MAX_TOKENS: u32 = 120;
const ANALYSIS_TEMPERATURE: f64 = 0.8;

/// One board snapshot submitted for analysis. `green` is the user's own
/// side, `black` the observed opposing side; either may be empty.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub green: Vec<TrackedPlayer>,
    #[serde(default)]
    pub black: Vec<TrackedPlayer>,
    pub ball: Point,
}

/// The composite analysis returned to the caller and mirrored to every
/// connected board viewer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub detected_formation: Formation,
    pub phase: Phase,
    /// The generated opposing side, goalkeeper first.
    pub red: Vec<TrackedPlayer>,
    /// Persona commentary; provider text when available, local template
    /// otherwise. Never empty.
    pub coach_comment: String,
}

/// Stateless analysis pipeline plus its enrichment collaborators.
pub struct Analyzer {
    pub persona: Persona,
    pub coach: CoachClient,
}

impl Analyzer {
    pub fn new(persona: Persona, coach: CoachClient) -> Self {
        Self { persona, coach }
    }

    /// Run the full pipeline over one snapshot.
    ///
    /// The observed opposing side drives formation detection when it is
    /// tracked; otherwise the user's own side stands in. The phase reads
    /// the raw snapshot, never the generated layout.
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult {
        let observed = if !request.black.is_empty() {
            &request.black
        } else {
            &request.green
        };
        let detected_formation = formation::classify(observed);
        let phase = phase::classify_phase(request.ball, &request.green, &request.black);
        let red = layout::mirror_formation(detected_formation, request.ball, &mut rand::thread_rng());
        let coach_comment = self.comment(detected_formation, phase).await;

        AnalysisResult {
            detected_formation,
            phase,
            red,
            coach_comment,
        }
    }

    /// Commentary for a detected situation. Provider failures of any kind
    /// degrade to the persona's local template; the result is never empty.
    async fn comment(&self, formation: Formation, phase: Phase) -> String {
        let fallback = self.persona.fallback_comment(formation, phase);
        if !self.coach.is_enabled() {
            return fallback;
        }

        let started = std::time::Instant::now();
        let completion = self
            .coach
            .complete(
                &self.persona.system_prompt(),
                &self.persona.analysis_prompt(formation, phase),
                ANALYSIS_MAX_TOKENS,
                ANALYSIS_TEMPERATURE,
            )
            .await;
        metrics::ENRICHMENT_DURATION_SECONDS.observe(started.elapsed().as_secs_f64());

        match completion {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("commentary provider failed: {e}");
                metrics::ENRICHMENT_FAILURES_TOTAL.inc();
                fallback
            }
        }
    }
}
