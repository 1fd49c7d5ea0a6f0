#[derive(Debug, Clone)]
pub struct VoiceProviderConfig {
    pub host: String,
    pub api_key: String,
}

impl VoiceProviderConfig {
    pub fn new<H: Into<String>, K: Into<String>>(host: H, api_key: K) -> Self {
        Self {
            host: host.into(),
            api_key: api_key.into(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.host.trim_end_matches('/'), path)
    }
}
