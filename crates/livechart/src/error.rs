use livechart_motion::MotionError;
use thiserror::Error;

use crate::{SeriesId, VisualHandle};

/// Errors surfaced by the chart core.
///
/// All of these point at a configuration mistake. Expected absence, such as
/// disposing a point that is no longer tracked, is never an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    /// A reference-keyed series met a `None` model.
    #[error(
        "series {series} holds a null model at index {index}; reference-keyed series cannot \
         track null items, use a positional model such as `Option<f64>` for gaps"
    )]
    NullReference { series: SeriesId, index: usize },

    #[error("pie bounds for series {series} need a stacker")]
    MissingStacker { series: SeriesId },

    /// The handle resolved to a visual of another type.
    #[error("visual {handle:?} is not a `{expected}`")]
    VisualTypeMismatch {
        handle: VisualHandle,
        expected: &'static str,
    },

    #[error("visual {handle:?} was already removed from the canvas")]
    StaleVisual { handle: VisualHandle },

    #[error("series {series} scales at {orientation} axis {index}, which does not exist")]
    UnknownAxis {
        series: SeriesId,
        orientation: &'static str,
        index: usize,
    },

    #[error(transparent)]
    Motion(#[from] MotionError),
}

pub type Result<T, E = ChartError> = std::result::Result<T, E>;
