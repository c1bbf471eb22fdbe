// --- File: error.rs ---
use std::path::PathBuf;
use thiserror::Error;

/// Fatal start-up errors. Everything after the first frame is infallible
/// except audio, which has its own error type and is only ever logged.
#[derive(Debug, Error)]
pub enum FloresError {
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Window has no drawable area")]
    EmptyWindow,

    #[error("Surface creation failed: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("No suitable GPU adapter found")]
    NoAdapter,

    #[error("Surface reports no supported {0}")]
    UnsupportedSurface(&'static str),

    #[error("Device request failed: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("No audio output device available")]
    NoDevice,

    #[error("No background track loaded")]
    NoTrack,

    #[error("Failed to load '{path}': {message}")]
    Load { path: PathBuf, message: String },

    #[error("Playback refused: {0}")]
    Playback(String),
}

pub type Result<T> = std::result::Result<T, FloresError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failing_input() {
        let err = FloresError::ConfigRead {
            path: PathBuf::from("missing.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "nope"),
        };
        assert!(err.to_string().contains("missing.toml"));

        let err = AudioError::Load {
            path: PathBuf::from("song.mp3"),
            message: "bad header".into(),
        };
        assert_eq!(err.to_string(), "Failed to load 'song.mp3': bad header");
    }
}
// --- End of File: error.rs ---
