//! Audio classification provider
//!
//! The service only needs one thing from a model: given a prompt and a WAV
//! clip, return text. [`AudioClassifier`] is that seam; [`GeminiClassifier`]
//! is the production implementation.

pub mod gemini;
pub mod messages;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub use gemini::{GeminiClassifier, ProviderConfig};

/// Prompt sent along with every clip
pub const ANALYSIS_PROMPT: &str = r#"Analyze the emotional content of this audio clip.

Provide your analysis in the following JSON format:
{
    "primary_emotion": "",
    "confidence": 0-1,
    "voice_characteristics": {
        "pitch": "high/medium/low",
        "pace": "fast/moderate/slow",
        "energy": "high/moderate/low",
        "clarity": "excellent/good/fair/poor"
    },
    "explanation": ""
}
If no clear speech is detected, return neutral with low confidence.
"#;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider API key not configured")]
    NotConfigured,

    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),

    #[error("unexpected provider response: {0}")]
    Response(String),
}

/// Emotion classification backend
#[async_trait]
pub trait AudioClassifier: Send + Sync {
    /// Send a prompt plus WAV bytes, returning the model's raw text answer
    async fn classify(&self, prompt: &str, audio_wav: &[u8]) -> Result<String, ProviderError>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Run `classify` bounded by `limit`.
pub async fn classify_with_timeout(
    classifier: &dyn AudioClassifier,
    prompt: &str,
    audio_wav: &[u8],
    limit: Duration,
) -> Result<String, ProviderError> {
    match tokio::time::timeout(limit, classifier.classify(prompt, audio_wav)).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Slow;

    #[async_trait]
    impl AudioClassifier for Slow {
        async fn classify(&self, _prompt: &str, _audio: &[u8]) -> Result<String, ProviderError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("{}".to_string())
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_is_reported() {
        let err = classify_with_timeout(&Slow, ANALYSIS_PROMPT, b"RIFF", Duration::from_secs(30))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Timeout(d) if d == Duration::from_secs(30)));
    }

    #[test]
    fn prompt_names_the_schema_fields() {
        for field in ["primary_emotion", "confidence", "voice_characteristics", "explanation"] {
            assert!(ANALYSIS_PROMPT.contains(field));
        }
    }
}
