use super::result::{Emotion, EmotionResult, VoiceFeatures, DEFAULT_ANALYSIS, DEFAULT_CONFIDENCE};
use serde_json::{Map, Value};
use tracing::debug;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Outcome of normalizing a provider response
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// The response contained a JSON object and was mapped onto the schema
    Parsed(EmotionResult),
    /// No usable JSON object was found
    Fallback,
}

impl Normalized {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Normalized::Fallback)
    }

    pub fn into_result(self) -> EmotionResult {
        match self {
            Normalized::Parsed(result) => result,
            Normalized::Fallback => EmotionResult::fallback(),
        }
    }
}

/// Pull the JSON candidate out of free text.
///
/// A ```` ```json ```` fence wins over a bare ```` ``` ```` fence. The
/// candidate runs from the first marker to the next fence, or to the end of
/// the text when the fence is never closed.
pub fn extract_json_candidate(raw: &str) -> &str {
    let text = raw.trim();

    let start = if let Some(pos) = text.find(JSON_FENCE) {
        pos + JSON_FENCE.len()
    } else if let Some(pos) = text.find(FENCE) {
        pos + FENCE.len()
    } else {
        return text;
    };

    let rest = &text[start..];
    match rest.find(FENCE) {
        Some(end) if end > 0 => rest[..end].trim(),
        _ => rest.trim(),
    }
}

/// Normalize raw provider text into an [`EmotionResult`].
pub fn normalize(raw: &str) -> Normalized {
    let candidate = extract_json_candidate(raw);

    let analysis = match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            debug!("Provider JSON is not an object: {}", other);
            return Normalized::Fallback;
        }
        Err(e) => {
            debug!("Provider response is not JSON: {}", e);
            return Normalized::Fallback;
        }
    };

    let emotion = analysis
        .get("primary_emotion")
        .and_then(Value::as_str)
        .map(Emotion::from_label)
        .unwrap_or(Emotion::Neutral);

    let confidence = clamp_confidence(read_confidence(analysis.get("confidence")));

    let voice_features = analysis
        .get("voice_characteristics")
        .and_then(Value::as_object)
        .map(read_voice_features)
        .unwrap_or_default();

    let explanation = analysis
        .get("explanation")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_ANALYSIS)
        .to_string();

    Normalized::Parsed(EmotionResult {
        emotion,
        confidence,
        voice_features,
        analysis: explanation,
    })
}

/// Shorthand for `normalize(raw).into_result()`.
pub fn normalize_to_result(raw: &str) -> EmotionResult {
    normalize(raw).into_result()
}

fn read_confidence(value: Option<&Value>) -> f64 {
    match value {
        // Numbers keep their source text, so values past the f64 range
        // come out as infinities and clamp like any other outlier.
        Some(Value::Number(n)) => n.to_string().parse().unwrap_or(DEFAULT_CONFIDENCE),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(DEFAULT_CONFIDENCE),
        _ => DEFAULT_CONFIDENCE,
    }
}

fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        return DEFAULT_CONFIDENCE;
    }
    value.clamp(0.0, 1.0)
}

fn read_voice_features(chars: &Map<String, Value>) -> VoiceFeatures {
    let defaults = VoiceFeatures::default();
    let pick = |key: &str, default: String| {
        chars
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(default)
    };

    VoiceFeatures {
        pitch: pick("pitch", defaults.pitch),
        pace: pick("pace", defaults.pace),
        energy: pick("energy", defaults.energy),
        clarity: pick("clarity", defaults.clarity),
    }
}
