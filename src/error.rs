use crate::guide::GuideStatus;
use crate::transition::GuideAction;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("guide title must not be empty")]
    EmptyTitle,
    #[error("guide title exceeds {limit} characters (got {got})")]
    TitleTooLong { limit: usize, got: usize },
    #[error("guide content must not be empty")]
    EmptyContent,
    #[error("identifier must not be empty or contain '/': {0:?}")]
    InvalidId(String),
}

/// Error taxonomy for the living-guide core.
///
/// All variants except `Storage`, `Encode`, `Decode` and `Id` are
/// deterministic outcomes of input and current state and are surfaced to
/// the caller verbatim. `ConcurrentModification` is the only variant the
/// service retries, and only once.
#[derive(thiserror::Error, Debug)]
pub enum GuideError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("cannot {action} a guide in status {current}")]
    IllegalTransition {
        current: GuideStatus,
        action: GuideAction,
    },

    #[error("invalid rollback target: version {requested} is already the current version ({current})")]
    InvalidRollbackTarget { requested: u64, current: u64 },

    #[error("concurrent modification: expected version {expected}, found {actual}")]
    ConcurrentModification { expected: u64, actual: u64 },

    // Infrastructure failures below are fatal for the request and are not
    // part of the domain taxonomy.
    #[error("storage failure")]
    Storage(#[from] sled::Error),

    #[error("failed to encode record")]
    Encode(#[from] minicbor::encode::Error<std::convert::Infallible>),

    #[error("failed to decode record")]
    Decode(#[from] minicbor::decode::Error),

    #[error("id generation failed")]
    Id(#[source] anyhow::Error),
}
