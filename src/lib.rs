pub mod audio;
pub mod config;
pub mod emotion;
pub mod http;
pub mod provider;
pub mod session;

pub use audio::{decode_base64_audio, AudioDecodeError, WavInfo};
pub use config::Config;
pub use emotion::{normalize, Emotion, EmotionResult, Normalized, VoiceFeatures};
pub use http::{create_router, AppState, StaticPages};
pub use provider::{AudioClassifier, GeminiClassifier, ProviderConfig, ProviderError};
pub use session::{CleanupScheduler, SessionConfig, SessionSnapshot, SessionStore, SweepReport};
