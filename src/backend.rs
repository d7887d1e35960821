use reqwest::Client;
use serenity::async_trait;

use crate::ai::{BridgeError, GeminiClient};
use crate::config::Config;
use crate::inspirobot::InspiroBot;

/// The outbound calls a command may make. Each command makes at most one.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<String, BridgeError>;
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>, BridgeError>;
    async fn inspiration(&self) -> Result<String, BridgeError>;
}

pub struct HttpBackend {
    gemini: GeminiClient,
    inspirobot: InspiroBot,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Self {
        let client = Client::new();
        Self {
            gemini: GeminiClient::new(client.clone(), config.gemini_api_key.clone()),
            inspirobot: InspiroBot::new(client),
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn generate_text(&self, prompt: &str) -> Result<String, BridgeError> {
        self.gemini.generate_text(prompt).await
    }

    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>, BridgeError> {
        self.gemini.generate_image(prompt).await
    }

    async fn inspiration(&self) -> Result<String, BridgeError> {
        self.inspirobot.generate().await
    }
}
