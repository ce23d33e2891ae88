use thiserror::Error;

use crate::api::types::{SocketId, WireId};

/// Rejection of an engine operation. Every variant leaves the state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("{0} is not part of this round")]
    InvalidReference(WireId),
    #[error("{socket} is outside 1..={slots}")]
    InvalidSlot { socket: SocketId, slots: usize },
    #[error("illegal transition: {0}")]
    IllegalTransition(#[from] Transition),
    #[error("the round is over, reset to play again")]
    RoundOver,
}

/// Interactions the drag controller and board refuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Transition {
    #[error("{0} is locked into its correct socket")]
    WireLocked(WireId),
    #[error("{0} is already being dragged")]
    DragInProgress(WireId),
    #[error("no drag in progress")]
    NotDragging,
    #[error("the session is paused")]
    SessionPaused,
}

/// Problems with a round configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("a round needs at least one question")]
    NoQuestions,
    #[error("question id {0} appears more than once")]
    DuplicateWire(WireId),
    #[error("{0} has an empty answer")]
    EmptyAnswer(WireId),
    #[error("livesTotal must be at least 1")]
    NoLives,
    #[error("timeLimitSeconds must be at least 1")]
    NoTime,
    #[error("socket order is not a permutation of the answers")]
    NotAPermutation,
    #[error("invalid round config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type QuizResult<T> = Result<T, QuizError>;
