//! Point identity: keys, per-series identity maps and the per-canvas
//! registry that owns them.

use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use livechart_core::alloc::HashMap;

use crate::{ChartModel, SharedPoint};

/// Identifies a series across canvases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesId(u32);

impl SeriesId {
    /// Allocates a process-unique id.
    pub fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifies a [`MotionCanvas`](crate::MotionCanvas).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanvasId(u64);

impl CanvasId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Identity key of a chart point within one series and canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyHandle {
    /// Index of the model in the series values.
    Position(usize),
    /// Address of the shared model.
    Reference(usize),
}

/// How a series keys its points, fixed by the model type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointIdentityStrategy {
    /// One point per position; used for plain values.
    PositionalKey,
    /// One point per shared model; used for `Arc` models.
    ReferenceKey,
}

impl PointIdentityStrategy {
    pub const fn of<M: ChartModel>() -> Self {
        M::IDENTITY
    }

    /// Key of `item` at `index`, or `None` for a null reference.
    #[inline]
    pub fn resolve<M: ChartModel>(&self, item: &M, index: usize) -> Option<KeyHandle> {
        match self {
            Self::PositionalKey => Some(KeyHandle::Position(index)),
            Self::ReferenceKey => item.reference_address().map(KeyHandle::Reference),
        }
    }
}

/// The points one series has on one canvas, by key.
#[derive(Debug, Default)]
pub struct IdentityMap {
    points: HashMap<KeyHandle, SharedPoint>,
}

impl IdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &KeyHandle) -> Option<&SharedPoint> {
        self.points.get(key)
    }

    pub fn contains(&self, key: &KeyHandle) -> bool {
        self.points.contains_key(key)
    }

    pub(crate) fn get_or_insert_with(
        &mut self,
        key: KeyHandle,
        create: impl FnOnce() -> SharedPoint,
    ) -> &SharedPoint {
        self.points.entry(key).or_insert_with(create)
    }

    pub fn remove(&mut self, key: &KeyHandle) -> Option<SharedPoint> {
        self.points.remove(key)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = &SharedPoint> {
        self.points.values()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

/// Every identity map of one canvas, by series.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    maps: HashMap<SeriesId, IdentityMap>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, series: SeriesId) -> Option<&IdentityMap> {
        self.maps.get(&series)
    }

    pub fn get_mut(&mut self, series: SeriesId) -> Option<&mut IdentityMap> {
        self.maps.get_mut(&series)
    }

    /// The map of `series`, created on first use.
    pub fn map_mut(&mut self, series: SeriesId) -> &mut IdentityMap {
        self.maps.entry(series).or_default()
    }

    pub fn remove(&mut self, series: SeriesId) -> Option<IdentityMap> {
        self.maps.remove(&series)
    }

    pub fn series_count(&self) -> usize {
        self.maps.len()
    }

    /// Total number of tracked points.
    pub fn point_count(&self) -> usize {
        self.maps.values().map(IdentityMap::len).sum()
    }

    pub fn clear(&mut self) {
        self.maps.clear();
    }
}
