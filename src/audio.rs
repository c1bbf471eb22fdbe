// --- File: audio.rs ---
// Background music on top of Kira. Every failure here degrades to silence.
use crate::config::AudioConfig;
use crate::error::AudioError;
use crate::gate::BackgroundAudio;
use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle};
use kira::{AudioManager, AudioManagerSettings, Decibels, DefaultBackend, Tween};

pub struct KiraAudio {
    manager: Option<AudioManager<DefaultBackend>>,
    track: Option<StaticSoundData>,
    handle: Option<StaticSoundHandle>,
    volume: f64,
}

impl KiraAudio {
    pub fn new(config: &AudioConfig) -> Self {
        // No device is not fatal; the scene just runs silent.
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| log::warn!("Audio: no output device ({e}), running silent"))
            .ok();

        let track = config.path.as_deref().and_then(|path| {
            StaticSoundData::from_file(path)
                .map_err(|e| {
                    log::warn!(
                        "{}",
                        AudioError::Load {
                            path: path.to_path_buf(),
                            message: e.to_string(),
                        }
                    )
                })
                .ok()
        });
        if let (Some(path), Some(_)) = (&config.path, &track) {
            log::info!("Loaded background track {}", path.display());
        }

        Self {
            manager,
            track,
            handle: None,
            volume: config.volume,
        }
    }

    /// Stops the music, used on teardown.
    pub fn stop(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.stop(Tween::default());
            log::info!("Background music stopped");
        }
    }
}

impl BackgroundAudio for KiraAudio {
    fn start(&mut self) -> Result<(), AudioError> {
        let manager = self.manager.as_mut().ok_or(AudioError::NoDevice)?;
        let track = self.track.as_ref().ok_or(AudioError::NoTrack)?;
        let data = track
            .clone()
            .volume(amplitude_to_db(self.volume))
            .loop_region(..);
        let handle = manager
            .play(data)
            .map_err(|e| AudioError::Playback(e.to_string()))?;
        self.handle = Some(handle);
        Ok(())
    }
}

const SILENCE_DB: f32 = -60.0;

/// Convert linear amplitude to decibels, floored at silence.
fn amplitude_to_db(amplitude: f64) -> Decibels {
    if amplitude <= 0.0 {
        Decibels(SILENCE_DB)
    } else {
        Decibels((20.0 * (amplitude as f32).log10()).max(SILENCE_DB))
    }
}

// --- End of File: audio.rs ---
