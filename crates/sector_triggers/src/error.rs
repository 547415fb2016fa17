//! Trigger definition errors

use thiserror::Error;

/// Problems found when validating a trigger definition
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TriggerError {
    /// Neither `size` nor `radius` is set
    #[error("trigger '{0}' has no size or radius")]
    MalformedGeometry(String),
    /// Both `size` and `radius` are set
    #[error("trigger '{0}' sets both size and radius")]
    AmbiguousGeometry(String),
    /// Rectangle with a non-positive side
    #[error("trigger '{id}' has invalid size {width}x{depth}")]
    InvalidSize { id: String, width: f32, depth: f32 },
    /// Circle with a non-positive radius
    #[error("trigger '{id}' has invalid radius {radius}")]
    InvalidRadius { id: String, radius: f32 },
}
