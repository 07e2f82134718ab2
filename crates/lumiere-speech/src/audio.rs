//! Transport decoding for synthesized speech.
//!
//! The service sends base64 text wrapping raw 16-bit signed little-endian
//! mono PCM at 24 kHz. Decoding tolerates embedded whitespace, the URL-safe
//! alphabet, and missing padding, since the payload may pass through proxies
//! that rewrite any of those.

use std::time::Duration;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;

use lumiere_core::ServiceError;

/// Sample rate of every clip the service produces.
pub const SAMPLE_RATE: u32 = 24_000;

const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A decoded mono clip, ready for playback.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    /// Samples in `[-1.0, 1.0)`.
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioClip {
    pub fn new(samples: Vec<f32>) -> Self {
        Self {
            samples,
            sample_rate: SAMPLE_RATE,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Playback length of the clip.
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }
}

/// Decode the base64 transport text into raw bytes.
pub fn decode_transport(encoded: &str) -> Result<Vec<u8>, ServiceError> {
    let normalized: String = encoded
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();

    if normalized.trim_end_matches('=').is_empty() {
        return Err(ServiceError::DecodeFailed("empty audio payload".into()));
    }

    LENIENT
        .decode(normalized.as_bytes())
        .map_err(|e| ServiceError::DecodeFailed(format!("invalid base64: {e}")))
}

/// Interpret bytes as signed 16-bit little-endian PCM and scale by 1/32768.
pub fn pcm16_to_samples(bytes: &[u8]) -> Result<Vec<f32>, ServiceError> {
    if bytes.len() % 2 != 0 {
        return Err(ServiceError::DecodeFailed(format!(
            "odd PCM byte count ({})",
            bytes.len()
        )));
    }

    Ok(bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
        .collect())
}

/// Full pipeline: transport text to a playable clip.
pub fn decode_clip(encoded: &str) -> Result<AudioClip, ServiceError> {
    let bytes = decode_transport(encoded)?;
    let samples = pcm16_to_samples(&bytes)?;
    Ok(AudioClip::new(samples))
}

/// Encode samples the way the service does. Used by test doubles.
pub fn encode_clip(samples: &[f32]) -> String {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for sample in samples {
        let value = (sample * 32768.0).round().clamp(i16::MIN as f32, i16::MAX as f32) as i16;
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    STANDARD.encode(bytes)
}
