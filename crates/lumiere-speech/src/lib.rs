//! lumiere-speech: Speech synthesis, audio playback, and explanations.
//!
//! Implements the `SpeechService` trait over the HTTP proxy, decodes the
//! PCM transport format, and caches clips per (text, voice) so each phrase
//! is synthesized at most once per process.

pub mod audio;
pub mod config;
pub mod explain;
pub mod mock;
pub mod notice;
pub mod output;
pub mod playback;
pub mod proxy;
pub mod scenario;

pub use audio::AudioClip;
pub use config::{create_service, load_config, LumiereConfig, ServiceConfig};
pub use explain::ExplanationClient;
pub use notice::NoticeSink;
pub use output::{AudioOutput, NullOutput};
pub use playback::AudioPlaybackService;
pub use proxy::ProxyClient;
pub use scenario::{ScenarioPlayer, VoicePair};
