use base64::Engine;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioDecodeError {
    #[error("audio data must be a non-empty base64 string")]
    Empty,

    #[error("invalid base64 audio: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Decode client audio given as raw base64 or as a data URI
/// (`data:audio/wav;base64,...`).
///
/// Everything up to the first comma is treated as the data URI prefix.
/// ASCII whitespace inside the payload is ignored.
pub fn decode_base64_audio(data: &str) -> Result<Vec<u8>, AudioDecodeError> {
    if data.is_empty() {
        return Err(AudioDecodeError::Empty);
    }

    let payload = match data.split_once(',') {
        Some((_prefix, b64)) => b64,
        None => data,
    };

    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = base64::engine::general_purpose::STANDARD.decode(compact)?;
    if bytes.is_empty() {
        return Err(AudioDecodeError::Empty);
    }

    Ok(bytes)
}
