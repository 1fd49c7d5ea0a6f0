use anyhow::Result;
use concierge::providers::base::ChatBackend;
use concierge::providers::dify::DifyProvider;
use concierge::tts::{ElevenLabsProvider, OpenAiSpeechProvider, SpeechProvider};
use concierge::voice::VoiceService;
use std::sync::Arc;

use crate::configuration::Settings;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn ChatBackend>,
    pub voice: Arc<VoiceService>,
    pub elevenlabs: Option<Arc<dyn SpeechProvider>>,
    pub openai_tts: Option<Arc<dyn SpeechProvider>>,
}

impl AppState {
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let backend = DifyProvider::new(settings.backend.into_config())?;
        let voice = VoiceService::new(settings.voice.map(|v| v.into_config()))?;

        let elevenlabs = match settings.elevenlabs {
            Some(s) => {
                let provider: Arc<dyn SpeechProvider> =
                    Arc::new(ElevenLabsProvider::new(s.into_config())?);
                Some(provider)
            }
            None => None,
        };
        let openai_tts = match settings.openai_tts {
            Some(s) => {
                let provider: Arc<dyn SpeechProvider> =
                    Arc::new(OpenAiSpeechProvider::new(s.into_config())?);
                Some(provider)
            }
            None => None,
        };

        Ok(Self {
            backend: Arc::new(backend),
            voice: Arc::new(voice),
            elevenlabs,
            openai_tts,
        })
    }
}

#[cfg(test)]
impl AppState {
    /// State around the given backend, with mock voice and no speech providers
    pub fn for_backend(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            voice: Arc::new(VoiceService::new(None).unwrap()),
            elevenlabs: None,
            openai_tts: None,
        }
    }
}
