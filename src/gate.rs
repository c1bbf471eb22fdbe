// --- File: gate.rs ---
use crate::error::AudioError;

/// Something that can start the background music.
pub trait BackgroundAudio {
    fn start(&mut self) -> Result<(), AudioError>;
}

/// Fires exactly once, on the first press or touch, and starts the music.
/// Playback failures are logged and otherwise ignored; there are no retries.
#[derive(Debug, Default)]
pub struct InteractionGate {
    fired: bool,
}

impl InteractionGate {
    /// Returns true only for the gesture that opened the gate.
    pub fn on_gesture(&mut self, audio: &mut dyn BackgroundAudio) -> bool {
        if self.fired {
            return false;
        }
        self.fired = true;
        match audio.start() {
            Ok(()) => log::info!("Background music started"),
            Err(e) => log::warn!("Could not start background music: {e}"),
        }
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

// --- End of File: gate.rs ---
