//! The motion canvas: owner of identity tables, visuals, paint tasks and
//! the frame clock of one chart.

use std::any::{Any, type_name};
use std::cmp::Ordering;

use indexmap::{IndexMap, IndexSet};
use livechart_core::Rect;
use livechart_core::alloc::sparse_set::{IndexSlot, SparseSet};
use livechart_core::profiling::{profile_function, profile_scope};
use livechart_motion::FrameClock;
use livechart_test_utils::{DrawingSurface, PaintStyle};
use tracing::{debug, trace};

use crate::{CanvasId, ChartError, IdentityRegistry, Result, SeriesId, Visual};

/// Generational handle to a visual stored in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualHandle(IndexSlot);

/// What a paint task draws for its series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PaintRole {
    Fill,
    Stroke,
    DataLabels,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaintTaskKey {
    pub series: SeriesId,
    pub role: PaintRole,
}

impl PaintTaskKey {
    pub const fn new(series: SeriesId, role: PaintRole) -> Self {
        Self { series, role }
    }
}

/// A style plus the geometries painted with it.
#[derive(Debug, Clone)]
pub struct PaintTask {
    pub style: PaintStyle,
    pub clip: Option<Rect>,
    geometries: IndexSet<VisualHandle>,
}

impl PaintTask {
    pub fn geometries(&self) -> impl Iterator<Item = VisualHandle> + '_ {
        self.geometries.iter().copied()
    }

    pub fn contains(&self, handle: VisualHandle) -> bool {
        self.geometries.contains(&handle)
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }
}

/// Result of one [`MotionCanvas::draw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Geometries painted this frame.
    pub painted: usize,
    /// Soft-deleted visuals dropped after painting.
    pub collected: usize,
    /// Visuals still moving; the host should schedule another frame.
    pub animating: usize,
}

impl FrameStats {
    pub fn is_animating(&self) -> bool {
        self.animating > 0
    }
}

/// Visuals, paint tasks and clock of a canvas.
///
/// Split from the identity tables so a series can hold a fetch over its
/// identity map while it creates and updates visuals.
#[derive(Debug)]
pub struct Scene {
    visuals: SparseSet<Box<dyn Visual>>,
    paint_tasks: IndexMap<PaintTaskKey, PaintTask>,
    clock: FrameClock,
}

impl Scene {
    fn new(clock: FrameClock) -> Self {
        Self {
            visuals: SparseSet::new(),
            paint_tasks: IndexMap::new(),
            clock,
        }
    }

    /// Canvas time, the reference for every motion target.
    #[inline]
    pub fn now(&self) -> std::time::Duration {
        self.clock.now()
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut FrameClock {
        &mut self.clock
    }

    pub fn add_visual<V: Visual>(&mut self, visual: V) -> VisualHandle {
        VisualHandle(self.visuals.push(Box::new(visual)))
    }

    pub fn contains(&self, handle: VisualHandle) -> bool {
        self.visuals.contains(handle.0)
    }

    pub fn visual(&self, handle: VisualHandle) -> Option<&(dyn Visual + 'static)> {
        self.visuals.try_get(handle.0).map(|visual| visual.as_ref())
    }

    pub fn visual_mut(&mut self, handle: VisualHandle) -> Option<&mut (dyn Visual + 'static)> {
        self.visuals.try_get_mut(handle.0).map(|visual| visual.as_mut())
    }

    /// The visual behind `handle` as a `V`.
    pub fn get<V: Visual>(&self, handle: VisualHandle) -> Result<&V> {
        let visual = self
            .visual(handle)
            .ok_or(ChartError::StaleVisual { handle })?;
        let any: &(dyn Any + 'static) = visual;
        any.downcast_ref().ok_or(ChartError::VisualTypeMismatch {
            handle,
            expected: type_name::<V>(),
        })
    }

    pub fn get_mut<V: Visual>(&mut self, handle: VisualHandle) -> Result<&mut V> {
        let visual = self
            .visual_mut(handle)
            .ok_or(ChartError::StaleVisual { handle })?;
        let any: &mut (dyn Any + 'static) = visual;
        any.downcast_mut().ok_or(ChartError::VisualTypeMismatch {
            handle,
            expected: type_name::<V>(),
        })
    }

    pub fn visual_count(&self) -> usize {
        self.visuals.len()
    }

    /// Drops a visual and unregisters it from every paint task.
    pub fn remove_visual(&mut self, handle: VisualHandle) -> bool {
        for task in self.paint_tasks.values_mut() {
            task.geometries.shift_remove(&handle);
        }
        self.visuals.try_remove(handle.0).is_some()
    }

    /// Creates or restyles the paint task `key`.
    pub fn upsert_paint_task(&mut self, key: PaintTaskKey, style: PaintStyle, clip: Option<Rect>) {
        let task = self.paint_tasks.entry(key).or_insert_with(|| PaintTask {
            style: style.clone(),
            clip,
            geometries: IndexSet::new(),
        });
        task.style = style;
        task.clip = clip;
    }

    /// Registers `handle` with the paint task `key`, if that task exists.
    pub fn add_geometry(&mut self, key: PaintTaskKey, handle: VisualHandle) {
        if let Some(task) = self.paint_tasks.get_mut(&key) {
            task.geometries.insert(handle);
        }
    }

    pub fn paint_task(&self, key: PaintTaskKey) -> Option<&PaintTask> {
        self.paint_tasks.get(&key)
    }

    pub fn paint_task_count(&self) -> usize {
        self.paint_tasks.len()
    }

    /// Removes the paint task `key` and every visual only it painted.
    pub fn remove_paint_task(&mut self, key: PaintTaskKey) {
        let Some(task) = self.paint_tasks.shift_remove(&key) else {
            return;
        };
        for handle in task.geometries {
            if !self.is_painted(handle) {
                self.visuals.try_remove(handle.0);
            }
        }
    }

    /// Removes every paint task of `series` along with its visuals.
    pub fn remove_series(&mut self, series: SeriesId) {
        let keys: Vec<PaintTaskKey> = self
            .paint_tasks
            .keys()
            .filter(|key| key.series == series)
            .copied()
            .collect();
        for key in keys {
            self.remove_paint_task(key);
        }
    }

    /// Whether any paint task draws `handle`.
    pub fn is_painted(&self, handle: VisualHandle) -> bool {
        self.paint_tasks.values().any(|task| task.contains(handle))
    }

    fn clear(&mut self) {
        self.visuals.clear();
        self.paint_tasks.clear();
    }
}

/// Per-chart owner of point identity, visuals and paint tasks.
///
/// One canvas is driven by one chart; nothing here is shared with other
/// canvases, so the same series values bound to two charts produce two
/// independent point graphs.
#[derive(Debug)]
pub struct MotionCanvas {
    id: CanvasId,
    identity: IdentityRegistry,
    scene: Scene,
}

impl MotionCanvas {
    /// A canvas following the wall clock.
    pub fn new() -> Self {
        Self::with_clock(FrameClock::new())
    }

    /// A canvas driven by `clock`; pass [`FrameClock::manual`] for
    /// deterministic headless runs.
    pub fn with_clock(clock: FrameClock) -> Self {
        Self {
            id: CanvasId::next(),
            identity: IdentityRegistry::new(),
            scene: Scene::new(clock),
        }
    }

    #[inline]
    pub fn id(&self) -> CanvasId {
        self.id
    }

    pub fn identity(&self) -> &IdentityRegistry {
        &self.identity
    }

    pub fn identity_mut(&mut self) -> &mut IdentityRegistry {
        &mut self.identity
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Borrows the identity tables and the scene at once.
    pub fn split_mut(&mut self) -> (&mut IdentityRegistry, &mut Scene) {
        (&mut self.identity, &mut self.scene)
    }

    #[inline]
    pub fn now(&self) -> std::time::Duration {
        self.scene.now()
    }

    /// Runs one frame: advances the clock, paints every task in z order and
    /// drops soft-deleted visuals whose transitions have completed. Those are
    /// not painted on the frame that collects them.
    pub fn draw(&mut self, surface: &dyn DrawingSurface) -> FrameStats {
        profile_function!();
        let scene = &mut self.scene;
        scene.clock.update();
        let now = scene.clock.now();
        let mut stats = FrameStats::default();

        let mut collectable = Vec::new();
        {
            profile_scope!("advance_visuals");
            for (slot, visual) in scene.visuals.iter_mut() {
                let motion = visual.motion_mut();
                let completed = motion.advance(now);
                if !completed {
                    stats.animating += 1;
                } else if motion.remove_on_completed() {
                    collectable.push(VisualHandle(slot));
                }
            }
        }

        {
            profile_scope!("paint_tasks");
            let mut order: Vec<&PaintTask> = scene.paint_tasks.values().collect();
            order.sort_by(|a, b| {
                a.style
                    .z_index
                    .partial_cmp(&b.style.z_index)
                    .unwrap_or(Ordering::Equal)
            });

            for task in order {
                surface.begin_paint(&task.style, task.clip);
                for handle in &task.geometries {
                    if let Some(visual) = scene.visuals.try_get(handle.0) {
                        // Collected below; its final state is already off screen.
                        let motion = visual.motion();
                        if motion.remove_on_completed() && motion.is_all_transitions_completed() {
                            continue;
                        }
                        visual.draw(surface, now);
                        stats.painted += 1;
                    }
                }
                surface.end_paint();
            }
        }

        for handle in collectable {
            trace!(?handle, "collecting completed visual");
            scene.remove_visual(handle);
            stats.collected += 1;
        }

        if stats.collected > 0 {
            debug!(
                canvas = self.id.raw(),
                collected = stats.collected,
                remaining = scene.visuals.len(),
                "garbage-collected soft-deleted visuals"
            );
        }

        stats
    }

    /// Drops every identity table, visual and paint task.
    pub fn clear(&mut self) {
        self.identity.clear();
        self.scene.clear();
    }
}

impl Default for MotionCanvas {
    fn default() -> Self {
        Self::new()
    }
}
