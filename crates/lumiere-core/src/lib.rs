//! lumiere-core: Curriculum, quiz engine, and learner state.
//!
//! This crate defines the vocabulary data model, the quiz and flashcard
//! study modes, and the locally persisted state (mistake ledger, unlock
//! flag) that the rest of lumiere builds on.

pub mod curriculum;
pub mod engine;
pub mod error;
pub mod flashcard;
pub mod ledger;
pub mod model;
pub mod random;
pub mod storage;
pub mod traits;
pub mod unlock;

pub use error::{QuizError, ServiceError, StoreError};
