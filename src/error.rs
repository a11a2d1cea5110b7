//! Error taxonomy (spec §3): a `thiserror` enum. The core performs no
//! recovery — every failure propagates unchanged to the caller.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All failures the core can surface.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport, timeout, or service-side completion failure.
    #[error("completion failure: {0}")]
    Completion(String),

    /// Service output disagreed with the declared schema or a domain
    /// invariant.
    #[error("schema validation failed: {0}")]
    SchemaValidation(String),

    /// Malformed tool-call arguments.
    #[error("invalid tool arguments: {0}")]
    ArgumentValidation(String),

    /// A tool name outside the declared set.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// No student for the given email.
    #[error("student not found: {0}")]
    StudentNotFound(String),

    /// Required profile information is missing.
    #[error("profile incomplete: {0}")]
    ProfileIncomplete(String),

    /// No learning plan for the given student.
    #[error("plan not found: {0}")]
    PlanNotFound(String),

    /// The referenced week is absent from the plan.
    #[error("week not found: {week}")]
    WeekNotFound { week: u32 },

    /// No quiz with the given id.
    #[error("quiz not found: {0}")]
    QuizNotFound(i64),

    /// The quiz has already been completed.
    #[error("quiz already completed: {0}")]
    QuizAlreadyCompleted(i64),

    /// Persistence-layer passthrough.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}
