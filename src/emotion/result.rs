use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_ANALYSIS: &str = "Emotion detected from voice analysis";
pub const FALLBACK_ANALYSIS: &str =
    "Could not analyze audio. Please ensure clear speech is present.";

/// Canonical emotion reported to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Frustrated,
    Fearful,
    Nervous,
    Surprised,
    Neutral,
    Calm,
    Confident,
    Excited,
}

impl Emotion {
    pub const ALL: [Emotion; 11] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Frustrated,
        Emotion::Fearful,
        Emotion::Nervous,
        Emotion::Surprised,
        Emotion::Neutral,
        Emotion::Calm,
        Emotion::Confident,
        Emotion::Excited,
    ];

    /// Map a free-text label from the model onto the canonical set.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Anything unrecognized is `Neutral`.
    pub fn from_label(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "happy" | "joyful" | "pleased" | "cheerful" => Emotion::Happy,
            "sad" | "unhappy" | "sorrowful" | "melancholy" => Emotion::Sad,
            "angry" => Emotion::Angry,
            "frustrated" | "irritated" => Emotion::Frustrated,
            "fearful" | "afraid" => Emotion::Fearful,
            "nervous" | "anxious" | "worried" | "tense" | "uneasy" => Emotion::Nervous,
            "surprised" | "shocked" | "amazed" => Emotion::Surprised,
            "calm" | "relaxed" | "peaceful" => Emotion::Calm,
            "confident" | "assured" | "certain" => Emotion::Confident,
            "excited" | "enthusiastic" | "energetic" => Emotion::Excited,
            _ => Emotion::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Frustrated => "frustrated",
            Emotion::Fearful => "fearful",
            Emotion::Nervous => "nervous",
            Emotion::Surprised => "surprised",
            Emotion::Neutral => "neutral",
            Emotion::Calm => "calm",
            Emotion::Confident => "confident",
            Emotion::Excited => "excited",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Voice characteristics as described by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceFeatures {
    /// high / medium / low
    pub pitch: String,
    /// fast / moderate / slow
    pub pace: String,
    /// high / moderate / low
    pub energy: String,
    /// excellent / good / fair / poor
    pub clarity: String,
}

impl Default for VoiceFeatures {
    fn default() -> Self {
        Self {
            pitch: "medium".to_string(),
            pace: "moderate".to_string(),
            energy: "moderate".to_string(),
            clarity: "good".to_string(),
        }
    }
}

/// Normalized analysis of one audio clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionResult {
    pub emotion: Emotion,

    /// Always within 0.0..=1.0
    pub confidence: f64,

    pub voice_features: VoiceFeatures,

    pub analysis: String,
}

impl EmotionResult {
    /// The fixed result returned whenever analysis cannot be completed.
    pub fn fallback() -> Self {
        Self {
            emotion: Emotion::Neutral,
            confidence: DEFAULT_CONFIDENCE,
            voice_features: VoiceFeatures::default(),
            analysis: FALLBACK_ANALYSIS.to_string(),
        }
    }

    /// Fallback result carrying a provider error message.
    pub fn fallback_with_error(message: impl fmt::Display) -> Self {
        Self {
            analysis: format!("Error: {}", message),
            ..Self::fallback()
        }
    }
}
