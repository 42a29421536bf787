use hound::WavReader;
use std::io::Cursor;

/// Header information of an uploaded WAV clip
#[derive(Debug, Clone, PartialEq)]
pub struct WavInfo {
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl WavInfo {
    /// Read the WAV header from in-memory bytes.
    ///
    /// Returns `None` for anything hound cannot parse. Clips are forwarded to
    /// the provider either way; this is only used for logging.
    pub fn probe(bytes: &[u8]) -> Option<Self> {
        let reader = WavReader::new(Cursor::new(bytes)).ok()?;
        let spec = reader.spec();

        let duration_seconds = if spec.sample_rate == 0 {
            0.0
        } else {
            reader.duration() as f64 / spec.sample_rate as f64
        };

        Some(Self {
            duration_seconds,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
        })
    }
}
