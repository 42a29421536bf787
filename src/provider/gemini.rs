use super::messages::{Content, GenerateContentRequest, GenerateContentResponse, InlineData, Part};
use super::{AudioClassifier, ProviderError};
use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Settings for the Gemini provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API key; the provider is unavailable when unset
    pub api_key: Option<String>,

    pub model: String,

    pub base_url: String,

    /// Upper bound on one classification call
    pub timeout_secs: u64,
}

impl ProviderConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Audio classification through Gemini `generateContent`
pub struct GeminiClassifier {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GeminiClassifier {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ProviderError::NotConfigured)?;

        let client = Client::builder().timeout(config.timeout()).build()?;

        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        info!("Gemini configured (model: {})", config.model);

        Ok(Self {
            client,
            api_key,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn build_request(prompt: &str, audio_wav: &[u8]) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: prompt.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "audio/wav".to_string(),
                            data: base64::engine::general_purpose::STANDARD.encode(audio_wav),
                        },
                    },
                ],
            }],
        }
    }
}

#[async_trait]
impl AudioClassifier for GeminiClassifier {
    async fn classify(&self, prompt: &str, audio_wav: &[u8]) -> Result<String, ProviderError> {
        let body = Self::build_request(prompt, audio_wav);

        let resp = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let body_text = resp.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: body_text,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body_text)
            .map_err(|e| ProviderError::Response(e.to_string()))?;

        let text = parsed.text().unwrap_or_default();
        debug!("Raw Gemini response: {}", text);

        Ok(text.trim().to_string())
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
