//! Podcast stages: script writing and audio production.

use super::{Produced, Stage, StageInputs};
use crate::capability::{SpeechSynthesizer, TextGenerator, VoiceParameters};
use crate::core::ArtifactKind;
use crate::errors::CapabilityError;
use crate::knowledge::KnowledgeIndex;
use async_trait::async_trait;
use std::sync::Arc;

const SCRIPT_INSTRUCTIONS: &str = "Turn the daily AI report into a short \
conversational podcast script for a single host. Plain spoken prose, no \
stage directions.";

/// Writes `podcasts/{date}/script.md` from the daily report.
#[derive(Debug)]
pub struct ScriptStage {
    generator: Arc<dyn TextGenerator>,
}

impl ScriptStage {
    /// Creates the script stage.
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Stage for ScriptStage {
    fn name(&self) -> &str {
        "script"
    }

    fn reads(&self) -> &[ArtifactKind] {
        &[ArtifactKind::Report]
    }

    fn writes(&self) -> ArtifactKind {
        ArtifactKind::Script
    }

    async fn produce(
        &self,
        inputs: &StageInputs,
        _knowledge: &KnowledgeIndex,
    ) -> Result<Produced, CapabilityError> {
        let report = inputs.text_or_empty(ArtifactKind::Report);
        let script = self.generator.generate(report, SCRIPT_INSTRUCTIONS).await?;

        Ok(Produced::text(format!(
            "# Podcast Script - {}\n\n{script}\n",
            inputs.run_date()
        )))
    }
}

/// Renders `podcasts/{date}/audio.wav` from the script.
///
/// Runs against whatever script artifact exists, placeholder included: a
/// degraded script upstream must not stop audio production.
#[derive(Debug)]
pub struct AudioStage {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    voice: VoiceParameters,
}

impl AudioStage {
    /// Creates the audio stage with default voice parameters.
    #[must_use]
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self {
            synthesizer,
            voice: VoiceParameters::default(),
        }
    }

    /// Sets the voice parameters.
    #[must_use]
    pub fn with_voice(mut self, voice: VoiceParameters) -> Self {
        self.voice = voice;
        self
    }
}

#[async_trait]
impl Stage for AudioStage {
    fn name(&self) -> &str {
        "audio"
    }

    fn reads(&self) -> &[ArtifactKind] {
        &[ArtifactKind::Script]
    }

    fn writes(&self) -> ArtifactKind {
        ArtifactKind::Audio
    }

    async fn produce(
        &self,
        inputs: &StageInputs,
        _knowledge: &KnowledgeIndex,
    ) -> Result<Produced, CapabilityError> {
        let script = inputs.text_or_empty(ArtifactKind::Script);
        let bytes = self.synthesizer.synthesize(script, &self.voice).await?;
        Ok(Produced::binary(bytes))
    }
}
