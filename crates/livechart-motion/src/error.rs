use thiserror::Error;

/// Errors raised by the motion layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MotionError {
    /// No channel with this name has been registered on the visual.
    #[error("no motion channel named `{name}`")]
    UnknownChannel { name: &'static str },

    /// The channel exists but animates a different value type.
    #[error("motion channel `{name}` holds `{found}`, not `{expected}`")]
    ChannelTypeMismatch {
        name: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

pub type MotionResult<T> = Result<T, MotionError>;
