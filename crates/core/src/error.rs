//! Domain error taxonomy shared across the workspace.

/// Domain-level errors raised by the submission engine.
///
/// `WindowClosed`, `Forbidden` and `NotFound` are authoritative rejections
/// and must never be retried; `Transient` marks storage/network failures
/// that are safe to retry with backoff.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The submission window does not admit writes right now. The message
    /// carries the actual window bounds so it can be surfaced verbatim.
    #[error("{0}")]
    WindowClosed(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Transient error: {0}")]
    Transient(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
