/// An API key and the voice it is allowed to use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceCredential {
    pub api_key: String,
    pub voice_id: String,
}

impl VoiceCredential {
    pub fn new<K: Into<String>, V: Into<String>>(api_key: K, voice_id: V) -> Self {
        Self {
            api_key: api_key.into(),
            voice_id: voice_id.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ElevenLabsConfig {
    pub host: String,
    pub model_id: String,
    pub primary: VoiceCredential,
    /// Tried once when the primary credential is rejected
    pub fallback: Option<VoiceCredential>,
}

impl ElevenLabsConfig {
    pub const DEFAULT_HOST: &'static str = "https://api.elevenlabs.io";
    pub const DEFAULT_MODEL: &'static str = "eleven_multilingual_v2";

    pub fn new(primary: VoiceCredential) -> Self {
        Self {
            host: Self::DEFAULT_HOST.to_string(),
            model_id: Self::DEFAULT_MODEL.to_string(),
            primary,
            fallback: None,
        }
    }

    pub fn with_host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_fallback(mut self, fallback: Option<VoiceCredential>) -> Self {
        self.fallback = fallback;
        self
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiSpeechConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub voice: String,
}

impl OpenAiSpeechConfig {
    pub const DEFAULT_HOST: &'static str = "https://api.openai.com";

    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            host: Self::DEFAULT_HOST.to_string(),
            api_key: api_key.into(),
            model: "tts-1".to_string(),
            voice: "alloy".to_string(),
        }
    }

    pub fn with_host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = host.into();
        self
    }
}
