//! Emotion results and provider response normalization
//!
//! The model answers in free text that usually, but not always, contains a
//! JSON object. Everything here turns that text into a strict
//! [`EmotionResult`] without ever failing: unusable text yields the fixed
//! fallback result.

mod normalize;
mod result;

pub use normalize::{extract_json_candidate, normalize, normalize_to_result, Normalized};
pub use result::{
    Emotion, EmotionResult, VoiceFeatures, DEFAULT_ANALYSIS, DEFAULT_CONFIDENCE, FALLBACK_ANALYSIS,
};
