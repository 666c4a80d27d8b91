mod ffmpeg_audio_extractor;

pub use ffmpeg_audio_extractor::{DEFAULT_CONVERSION_TIMEOUT, FfmpegAudioExtractor};
