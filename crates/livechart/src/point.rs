use std::any::Any;
use std::sync::Arc;

use livechart_core::{Point, Rect};
use parking_lot::Mutex;

use crate::{CanvasId, Coordinate, KeyHandle, SeriesId, VisualHandle};

/// A chart point shared between the identity map and its consumers.
///
/// Fetching the same key twice yields the same allocation, so identity can
/// be checked with [`Arc::ptr_eq`].
pub type SharedPoint = Arc<Mutex<ChartPoint>>;

/// How a pointer position is matched against hover areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TooltipFindingStrategy {
    /// Let the series decide; rows compare Y, columns compare X.
    #[default]
    Automatic,
    CompareAll,
    CompareOnlyX,
    CompareOnlyY,
}

/// Region of a point used for pointer hit testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverArea {
    pub rect: Rect,
}

impl HoverArea {
    pub const fn new(rect: Rect) -> Self {
        Self { rect }
    }

    pub fn is_pointer_over(&self, pointer: Point, strategy: TooltipFindingStrategy) -> bool {
        let rect = self.rect;
        let over_x = pointer.x >= rect.x && pointer.x <= rect.right();
        let over_y = pointer.y >= rect.y && pointer.y <= rect.bottom();
        match strategy {
            TooltipFindingStrategy::CompareOnlyX => over_x,
            TooltipFindingStrategy::CompareOnlyY => over_y,
            TooltipFindingStrategy::CompareAll | TooltipFindingStrategy::Automatic => {
                over_x && over_y
            }
        }
    }

    /// Where a tooltip for this point should anchor.
    pub fn suggested_tooltip_location(&self) -> Point {
        Point::new(self.rect.center().x, self.rect.y)
    }
}

/// Bookkeeping of a chart point: where it came from and what draws it.
#[derive(Debug)]
pub struct PointContext {
    /// Position in the most recent fetch.
    pub index: usize,
    pub key: KeyHandle,
    pub canvas: CanvasId,
    pub series: SeriesId,
    pub(crate) data_source: Option<Box<dyn Any + Send + Sync>>,
    pub visual: Option<VisualHandle>,
    pub label: Option<VisualHandle>,
    pub hover_area: Option<HoverArea>,
}

/// The unit of plotted data.
#[derive(Debug)]
pub struct ChartPoint {
    pub coordinate: Coordinate,
    pub context: PointContext,
}

impl ChartPoint {
    pub(crate) fn new(key: KeyHandle, canvas: CanvasId, series: SeriesId) -> Self {
        Self {
            coordinate: Coordinate::default(),
            context: PointContext {
                index: 0,
                key,
                canvas,
                series,
                data_source: None,
                visual: None,
                label: None,
                hover_area: None,
            },
        }
    }

    #[inline]
    pub fn primary(&self) -> f64 {
        self.coordinate.primary
    }

    #[inline]
    pub fn secondary(&self) -> f64 {
        self.coordinate.secondary
    }

    #[inline]
    pub fn tertiary(&self) -> f64 {
        self.coordinate.tertiary
    }

    #[inline]
    pub fn quinary(&self) -> f64 {
        self.coordinate.quinary
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.coordinate.is_null
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.context.index
    }

    /// The model this point was last fetched from.
    pub fn data_source<M: 'static>(&self) -> Option<&M> {
        self.context.data_source.as_deref()?.downcast_ref()
    }

    pub fn has_data_source(&self) -> bool {
        self.context.data_source.is_some()
    }
}
