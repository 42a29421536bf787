pub mod decode;
pub mod wav;

pub use decode::{decode_base64_audio, AudioDecodeError};
pub use wav::WavInfo;
