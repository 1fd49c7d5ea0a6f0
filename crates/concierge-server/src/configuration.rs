use crate::error::{to_env_var, ConfigError};
use concierge::providers::configs::DifyProviderConfig;
use concierge::tts::{ElevenLabsConfig, OpenAiSpeechConfig, VoiceCredential};
use concierge::voice::VoiceProviderConfig;
use config::{Config, Environment};
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Default, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// The Dify-compatible chat backend
#[derive(Debug, Deserialize)]
pub struct BackendSettings {
    #[serde(default = "default_backend_host")]
    pub host: String,
    pub api_key: String,
}

impl BackendSettings {
    pub fn into_config(self) -> DifyProviderConfig {
        DifyProviderConfig::new(self.host, self.api_key)
    }
}

#[derive(Debug, Deserialize)]
pub struct VoiceSettings {
    pub host: String,
    pub api_key: String,
}

impl VoiceSettings {
    pub fn into_config(self) -> VoiceProviderConfig {
        VoiceProviderConfig::new(self.host, self.api_key)
    }
}

#[derive(Debug, Deserialize)]
pub struct ElevenLabsSettings {
    #[serde(default = "default_elevenlabs_host")]
    pub host: String,
    #[serde(default = "default_elevenlabs_model")]
    pub model_id: String,
    pub api_key: String,
    pub voice_id: String,
    #[serde(default)]
    pub fallback_api_key: Option<String>,
    #[serde(default)]
    pub fallback_voice_id: Option<String>,
}

impl ElevenLabsSettings {
    pub fn into_config(self) -> ElevenLabsConfig {
        // The fallback key may reuse the primary voice
        let fallback = self.fallback_api_key.map(|api_key| {
            let voice_id = self
                .fallback_voice_id
                .unwrap_or_else(|| self.voice_id.clone());
            VoiceCredential::new(api_key, voice_id)
        });

        let mut config = ElevenLabsConfig::new(VoiceCredential::new(self.api_key, self.voice_id))
            .with_host(self.host)
            .with_fallback(fallback);
        config.model_id = self.model_id;
        config
    }
}

#[derive(Debug, Deserialize)]
pub struct OpenAiTtsSettings {
    #[serde(default = "default_openai_host")]
    pub host: String,
    pub api_key: String,
    #[serde(default = "default_openai_tts_model")]
    pub model: String,
    #[serde(default = "default_openai_tts_voice")]
    pub voice: String,
}

impl OpenAiTtsSettings {
    pub fn into_config(self) -> OpenAiSpeechConfig {
        let mut config = OpenAiSpeechConfig::new(self.api_key).with_host(self.host);
        config.model = self.model;
        config.voice = self.voice;
        config
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub backend: BackendSettings,
    #[serde(default)]
    pub voice: Option<VoiceSettings>,
    #[serde(default)]
    pub elevenlabs: Option<ElevenLabsSettings>,
    #[serde(default)]
    pub openai_tts: Option<OpenAiTtsSettings>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load_and_validate()
    }

    fn load_and_validate() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("backend.host", default_backend_host())?
            .add_source(
                Environment::with_prefix("CONCIERGE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Serde only reports the leaf name of a missing field, so check the one
        // required key up front to name the full variable
        if let Err(config::ConfigError::NotFound(field)) = config.get_string("backend.api_key") {
            return Err(ConfigError::MissingEnvVar {
                env_var: to_env_var(&field),
            });
        }

        let result: Result<Self, config::ConfigError> = config.try_deserialize();
        match result {
            Ok(settings) => Ok(settings),
            Err(err) => {
                tracing::debug!("Configuration error: {:?}", &err);

                let error_str = err.to_string();
                if error_str.starts_with("missing field") {
                    let field = error_str
                        .trim_start_matches("missing field `")
                        .trim_end_matches('`');
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(field),
                    })
                } else if let config::ConfigError::NotFound(field) = &err {
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(field),
                    })
                } else {
                    Err(ConfigError::Other(err))
                }
            }
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_backend_host() -> String {
    "https://api.dify.ai".to_string()
}

fn default_elevenlabs_host() -> String {
    ElevenLabsConfig::DEFAULT_HOST.to_string()
}

fn default_elevenlabs_model() -> String {
    ElevenLabsConfig::DEFAULT_MODEL.to_string()
}

fn default_openai_host() -> String {
    OpenAiSpeechConfig::DEFAULT_HOST.to_string()
}

fn default_openai_tts_model() -> String {
    "tts-1".to_string()
}

fn default_openai_tts_voice() -> String {
    "alloy".to_string()
}
