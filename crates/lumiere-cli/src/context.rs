//! Per-invocation state shared by the commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use lumiere_core::curriculum::parse_curriculum;
use lumiere_core::ledger::MistakeLedger;
use lumiere_core::model::{Curriculum, Level};
use lumiere_core::storage::{FileStore, KeyValueStore};
use lumiere_core::unlock::UnlockGate;
use lumiere_speech::config::load_config_from;
use lumiere_speech::output::AudioOutput;
use lumiere_speech::{create_service, AudioPlaybackService, ExplanationClient, LumiereConfig};

use crate::console::ConsoleNotices;

pub struct AppContext {
    pub config: LumiereConfig,
    pub curriculum: Curriculum,
    pub ledger: MistakeLedger,
    pub gate: UnlockGate,
    pub state_path: PathBuf,
}

/// Speech services built on demand, so offline commands never create a client.
pub struct Speech {
    pub playback: AudioPlaybackService,
    pub explainer: ExplanationClient,
}

impl AppContext {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = load_config_from(config_path)?;
        let curriculum = load_curriculum(&config)?;

        let state_path = config.state_path();
        tracing::debug!(path = %state_path.display(), "using learner state");
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&state_path));

        Ok(Self {
            ledger: MistakeLedger::new(Arc::clone(&store)),
            gate: UnlockGate::new(store, &config.unlock_code),
            config,
            curriculum,
            state_path,
        })
    }

    pub fn is_unlocked(&self) -> Result<bool> {
        self.gate
            .is_unlocked()
            .with_context(|| format!("failed to read {}", self.state_path.display()))
    }

    /// Look up a level the learner may open.
    pub fn open_level(&self, id: &str) -> Result<&Level> {
        let level = self
            .curriculum
            .level(id)
            .with_context(|| format!("unknown level '{id}' (see `lumiere levels`)"))?;

        if level.is_locked(self.is_unlocked()?) {
            anyhow::bail!("level '{id}' is a premium level; run `lumiere unlock <CODE>` first");
        }
        Ok(level)
    }

    pub fn speech(&self) -> Result<Speech> {
        let service = create_service(&self.config.service)?;
        let notices = Arc::new(ConsoleNotices);

        let playback =
            AudioPlaybackService::with_notices(Arc::clone(&service), open_output(), notices.clone())
                .with_default_voice(&self.config.default_voice)
                .with_cues(self.config.cues);
        let explainer = ExplanationClient::with_notices(service, notices);

        Ok(Speech {
            playback,
            explainer,
        })
    }
}

pub fn load_curriculum(config: &LumiereConfig) -> Result<Curriculum> {
    match &config.curriculum {
        Some(path) => parse_curriculum(path),
        None => Curriculum::builtin(),
    }
}

#[cfg(feature = "device")]
fn open_output() -> Arc<dyn AudioOutput> {
    match lumiere_speech::output::DeviceOutput::open() {
        Ok(output) => Arc::new(output),
        Err(e) => {
            tracing::warn!(error = %e, "no audio device, speech will be silent");
            Arc::new(lumiere_speech::NullOutput)
        }
    }
}

#[cfg(not(feature = "device"))]
fn open_output() -> Arc<dyn AudioOutput> {
    Arc::new(lumiere_speech::NullOutput)
}
