use std::time::Duration;

/// Connection settings for a Dify-compatible chat backend
#[derive(Debug, Clone)]
pub struct DifyProviderConfig {
    pub host: String,
    pub api_key: String,
    /// Upper bound on connecting and sending; the read side is bounded per turn
    pub connect_timeout: Duration,
}

impl DifyProviderConfig {
    pub fn new<H: Into<String>, K: Into<String>>(host: H, api_key: K) -> Self {
        Self {
            host: host.into(),
            api_key: api_key.into(),
            connect_timeout: Duration::from_secs(10),
        }
    }

    pub fn chat_url(&self) -> String {
        format!("{}/v1/chat-messages", self.host.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_url_ignores_trailing_slash() {
        let config = DifyProviderConfig::new("https://api.dify.ai/", "key");
        assert_eq!(config.chat_url(), "https://api.dify.ai/v1/chat-messages");
        let config = DifyProviderConfig::new("http://localhost:5001", "key");
        assert_eq!(config.chat_url(), "http://localhost:5001/v1/chat-messages");
    }
}
