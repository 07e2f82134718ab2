//! Transient user-facing notices for service failures.

use std::sync::{Mutex, PoisonError};

use lumiere_core::ServiceError;

/// Receives a notice whenever a speech or explanation request fails.
///
/// The front end decides how to surface it (a toast, a stderr line, ...).
/// Failures never propagate past the playback and explanation services.
pub trait NoticeSink: Send + Sync {
    fn notify(&self, error: &ServiceError);
}

/// Notice sink that only logs.
pub struct LogNotices;

impl NoticeSink for LogNotices {
    fn notify(&self, error: &ServiceError) {
        tracing::warn!(notice = error.user_message(), error = %error, "service notice");
    }
}

/// Notice sink that keeps every error, for assertions in tests.
#[derive(Default)]
pub struct CollectingNotices {
    errors: Mutex<Vec<ServiceError>>,
}

impl CollectingNotices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> Vec<ServiceError> {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NoticeSink for CollectingNotices {
    fn notify(&self, error: &ServiceError) {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(error.clone());
    }
}
