//! Audio playback service: synthesize, decode, cache, and play.
//!
//! Clips are cached for the process lifetime under `"{text}-{voice}"`, so
//! replaying a phrase never touches the network. Concurrent requests for a
//! key that is still being synthesized share the in-flight request instead
//! of issuing a second one.
//!
//! Every failure is converted into a notice; nothing propagates to the
//! caller of [`AudioPlaybackService::speak`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::task::JoinSet;

use lumiere_core::traits::{Cue, CuePlayer, SpeechService, SynthesisRequest};
use lumiere_core::ServiceError;

use crate::audio::{decode_clip, AudioClip};
use crate::notice::{LogNotices, NoticeSink};
use crate::output::AudioOutput;

/// Voice used when the caller does not pick one.
pub const DEFAULT_VOICE: &str = "Kore";

type ClipResult = Result<Arc<AudioClip>, ServiceError>;
type PendingClip = Shared<BoxFuture<'static, ClipResult>>;

/// Where a played clip came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipSource {
    /// Served from the cache.
    Cached,
    /// Synthesized by this call.
    Fetched,
    /// Joined a synthesis that another call had already started.
    Joined,
}

/// Result of a successful `try_speak`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spoken {
    pub source: ClipSource,
    /// Playback length of the clip that was started.
    pub duration: Duration,
}

/// Cache key for a phrase spoken in a voice.
pub fn cache_key(text: &str, voice: &str) -> String {
    format!("{text}-{voice}")
}

struct Inner {
    service: Arc<dyn SpeechService>,
    output: Arc<dyn AudioOutput>,
    notices: Arc<dyn NoticeSink>,
    cache: Mutex<HashMap<String, Arc<AudioClip>>>,
    pending: Mutex<HashMap<String, PendingClip>>,
    detached: Mutex<JoinSet<()>>,
}

/// Cheap to clone; clones share one cache.
#[derive(Clone)]
pub struct AudioPlaybackService {
    inner: Arc<Inner>,
    default_voice: Arc<str>,
    cues_enabled: bool,
}

impl AudioPlaybackService {
    pub fn new(service: Arc<dyn SpeechService>, output: Arc<dyn AudioOutput>) -> Self {
        Self::with_notices(service, output, Arc::new(LogNotices))
    }

    pub fn with_notices(
        service: Arc<dyn SpeechService>,
        output: Arc<dyn AudioOutput>,
        notices: Arc<dyn NoticeSink>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                service,
                output,
                notices,
                cache: Mutex::new(HashMap::new()),
                pending: Mutex::new(HashMap::new()),
                detached: Mutex::new(JoinSet::new()),
            }),
            default_voice: Arc::from(DEFAULT_VOICE),
            cues_enabled: true,
        }
    }

    pub fn with_default_voice(mut self, voice: &str) -> Self {
        self.default_voice = Arc::from(voice);
        self
    }

    /// Turn answer cues on or off. Cues are on by default.
    pub fn with_cues(mut self, enabled: bool) -> Self {
        self.cues_enabled = enabled;
        self
    }

    pub fn default_voice(&self) -> &str {
        &self.default_voice
    }

    /// Number of cached clips.
    pub fn cached_len(&self) -> usize {
        lock(&self.inner.cache).len()
    }

    pub fn is_cached(&self, text: &str, voice: &str) -> bool {
        lock(&self.inner.cache).contains_key(&cache_key(text, voice))
    }

    /// Play `text` in `voice`, reporting failures as notices.
    pub async fn speak(&self, text: &str, voice: &str) {
        if let Err(e) = self.try_speak(text, voice).await {
            self.report(&e);
        }
    }

    /// Play `text` in the default voice.
    pub async fn speak_default(&self, text: &str) {
        let voice = Arc::clone(&self.default_voice);
        self.speak(text, &voice).await;
    }

    /// Play `text` in `voice` and return the failure instead of reporting it.
    pub async fn try_speak(&self, text: &str, voice: &str) -> Result<Spoken, ServiceError> {
        let (clip, source) = self.load(text, voice).await?;
        tracing::debug!(text, voice, ?source, samples = clip.len(), "playing clip");
        if let Err(e) = self.inner.output.play(&clip) {
            tracing::warn!(error = %e, "audio output rejected clip");
        }
        Ok(Spoken {
            source,
            duration: clip.duration(),
        })
    }

    /// Fetch and cache a clip without playing it.
    pub async fn preload(&self, text: &str, voice: &str) -> Result<(), ServiceError> {
        self.load(text, voice).await.map(|_| ())
    }

    /// Start `speak` on the current tokio runtime and return immediately.
    ///
    /// The task is tracked until [`flush`](Self::flush) awaits it. Returns
    /// `false` when called outside a runtime.
    pub fn speak_detached(&self, text: &str, voice: &str) -> bool {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!(text, "no async runtime, dropping speech request");
                return false;
            }
        };

        let this = self.clone();
        let text = text.to_string();
        let voice = voice.to_string();
        let mut tasks = lock(&self.inner.detached);
        while let Some(finished) = tasks.try_join_next() {
            log_detached(finished);
        }
        tasks.spawn_on(async move { this.speak(&text, &voice).await }, &handle);
        true
    }

    /// Wait for every detached `speak` started so far, including ones
    /// started while waiting.
    pub async fn flush(&self) {
        loop {
            let mut tasks = std::mem::take(&mut *lock(&self.inner.detached));
            if tasks.is_empty() {
                return;
            }
            while let Some(finished) = tasks.join_next().await {
                log_detached(finished);
            }
        }
    }

    async fn load(
        &self,
        text: &str,
        voice: &str,
    ) -> Result<(Arc<AudioClip>, ClipSource), ServiceError> {
        let key = cache_key(text, voice);

        let (pending, source) = {
            let mut pending = lock(&self.inner.pending);
            if let Some(clip) = lock(&self.inner.cache).get(&key) {
                return Ok((Arc::clone(clip), ClipSource::Cached));
            }

            match pending.get(&key) {
                Some(in_flight) => (in_flight.clone(), ClipSource::Joined),
                None => {
                    let request = SynthesisRequest {
                        text: text.to_string(),
                        voice: voice.to_string(),
                    };
                    let fetch = fetch_clip(Arc::clone(&self.inner.service), request)
                        .boxed()
                        .shared();
                    pending.insert(key.clone(), fetch.clone());
                    (fetch, ClipSource::Fetched)
                }
            }
        };

        let result = pending.clone().await;

        if let Ok(clip) = &result {
            lock(&self.inner.cache).insert(key.clone(), Arc::clone(clip));
        }
        // A newer request for the key may have replaced ours after a failure.
        let mut in_flight = lock(&self.inner.pending);
        if in_flight.get(&key).is_some_and(|p| p.ptr_eq(&pending)) {
            in_flight.remove(&key);
        }
        drop(in_flight);

        result.map(|clip| (clip, source))
    }

    /// Log a failure and hand it to the notice sink.
    pub fn report(&self, error: &ServiceError) {
        tracing::warn!(error = %error, "speech request failed");
        self.inner.notices.notify(error);
    }
}

impl CuePlayer for AudioPlaybackService {
    fn play_cue(&self, cue: Cue) {
        if !self.cues_enabled {
            return;
        }
        let voice = Arc::clone(&self.default_voice);
        self.speak_detached(cue.text(), &voice);
    }
}

async fn fetch_clip(service: Arc<dyn SpeechService>, request: SynthesisRequest) -> ClipResult {
    let response = service.synthesize(&request).await?;
    let clip = decode_clip(&response.audio)?;
    tracing::debug!(
        text = %request.text,
        voice = %request.voice,
        samples = clip.len(),
        "synthesized clip"
    );
    Ok(Arc::new(clip))
}

fn log_detached(finished: Result<(), tokio::task::JoinError>) {
    if let Err(e) = finished {
        tracing::warn!(error = %e, "detached speech task failed");
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
