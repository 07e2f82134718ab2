//! Audio sinks that clips are handed to for playback.

use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

use crate::audio::AudioClip;

/// Errors raised by an audio output.
#[derive(Debug, Error)]
pub enum OutputError {
    /// No audio device could be opened.
    #[error("audio output unavailable: {0}")]
    Unavailable(String),

    /// The device accepted the clip but failed to play it.
    #[error("playback failed: {0}")]
    Playback(String),
}

/// Starts playback of a clip. Implementations must return without waiting
/// for the clip to finish; overlapping playback is allowed.
pub trait AudioOutput: Send + Sync {
    fn play(&self, clip: &Arc<AudioClip>) -> Result<(), OutputError>;
}

/// Output that discards clips after logging them.
pub struct NullOutput;

impl AudioOutput for NullOutput {
    fn play(&self, clip: &Arc<AudioClip>) -> Result<(), OutputError> {
        tracing::info!(
            samples = clip.len(),
            duration_ms = clip.duration().as_millis() as u64,
            "audio clip ready (no output device)"
        );
        Ok(())
    }
}

/// Output that records every clip it is given.
#[derive(Default)]
pub struct RecordingOutput {
    played: Mutex<Vec<Arc<AudioClip>>>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<Arc<AudioClip>> {
        self.played
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn play_count(&self) -> usize {
        self.played
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl AudioOutput for RecordingOutput {
    fn play(&self, clip: &Arc<AudioClip>) -> Result<(), OutputError> {
        self.played
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::clone(clip));
        Ok(())
    }
}

#[cfg(feature = "device")]
pub use device::DeviceOutput;

#[cfg(feature = "device")]
mod device {
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;

    use rodio::buffer::SamplesBuffer;
    use rodio::OutputStream;

    use super::{AudioOutput, OutputError};
    use crate::audio::AudioClip;

    /// Plays clips on the default system output device.
    ///
    /// The rodio stream is not `Send`, so it lives on a dedicated thread that
    /// receives clips over a channel. Dropping the output closes the channel
    /// and stops the thread.
    pub struct DeviceOutput {
        sender: mpsc::Sender<Arc<AudioClip>>,
    }

    impl DeviceOutput {
        /// Open the default output device.
        pub fn open() -> Result<Self, OutputError> {
            let (sender, receiver) = mpsc::channel::<Arc<AudioClip>>();
            let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();

            thread::Builder::new()
                .name("lumiere-audio".into())
                .spawn(move || {
                    let (_stream, handle) = match OutputStream::try_default() {
                        Ok(pair) => {
                            let _ = ready_tx.send(Ok(()));
                            pair
                        }
                        Err(e) => {
                            let _ = ready_tx.send(Err(e.to_string()));
                            return;
                        }
                    };

                    while let Ok(clip) = receiver.recv() {
                        let source = SamplesBuffer::new(1, clip.sample_rate, clip.samples.clone());
                        if let Err(e) = handle.play_raw(source) {
                            tracing::warn!(error = %e, "failed to start playback");
                        }
                    }
                    tracing::debug!("audio output thread exiting");
                })
                .map_err(|e| OutputError::Unavailable(e.to_string()))?;

            match ready_rx.recv() {
                Ok(Ok(())) => Ok(Self { sender }),
                Ok(Err(message)) => Err(OutputError::Unavailable(message)),
                Err(_) => Err(OutputError::Unavailable(
                    "audio thread exited during startup".into(),
                )),
            }
        }
    }

    impl AudioOutput for DeviceOutput {
        fn play(&self, clip: &Arc<AudioClip>) -> Result<(), OutputError> {
            self.sender
                .send(Arc::clone(clip))
                .map_err(|_| OutputError::Playback("audio thread is gone".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_output_keeps_clips_in_order() {
        let output = RecordingOutput::new();
        let a = Arc::new(AudioClip::new(vec![0.1]));
        let b = Arc::new(AudioClip::new(vec![0.2, 0.3]));
        output.play(&a).unwrap();
        output.play(&b).unwrap();

        let played = output.played();
        assert_eq!(output.play_count(), 2);
        assert!(Arc::ptr_eq(&played[0], &a));
        assert_eq!(played[1].len(), 2);
    }

    #[test]
    fn null_output_accepts_anything() {
        assert!(NullOutput.play(&Arc::new(AudioClip::new(vec![]))).is_ok());
    }
}
