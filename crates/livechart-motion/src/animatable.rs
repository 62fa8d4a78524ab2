use std::any::{Any, type_name};
use std::fmt;
use std::time::Duration;

use livechart_core::alloc::HashMap;

use crate::{Interpolate, MotionError, MotionProperty, MotionResult, Transition};

/// Type-erased view of a [`MotionProperty`], so one visual can hold channels
/// of different value types.
pub trait Channel: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;
    fn value_type(&self) -> &'static str;
    fn advance(&mut self, now: Duration);
    fn is_completed(&self) -> bool;
    fn complete(&mut self);
    fn set_transition(&mut self, transition: Option<Transition>);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Interpolate> Channel for MotionProperty<T> {
    fn name(&self) -> &'static str {
        MotionProperty::name(self)
    }

    fn value_type(&self) -> &'static str {
        type_name::<T>()
    }

    fn advance(&mut self, now: Duration) {
        MotionProperty::advance(self, now);
    }

    fn is_completed(&self) -> bool {
        MotionProperty::is_completed(self)
    }

    fn complete(&mut self) {
        MotionProperty::complete(self)
    }

    fn set_transition(&mut self, transition: Option<Transition>) {
        MotionProperty::set_transition(self, transition)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn downcast<T: Interpolate>(channel: &dyn Channel) -> MotionResult<&MotionProperty<T>> {
    let found = channel.value_type();
    let name = channel.name();
    channel
        .as_any()
        .downcast_ref::<MotionProperty<T>>()
        .ok_or(MotionError::ChannelTypeMismatch {
            name,
            expected: type_name::<T>(),
            found,
        })
}

fn downcast_mut<T: Interpolate>(
    channel: &mut dyn Channel,
) -> MotionResult<&mut MotionProperty<T>> {
    let found = channel.value_type();
    let name = channel.name();
    channel
        .as_any_mut()
        .downcast_mut::<MotionProperty<T>>()
        .ok_or(MotionError::ChannelTypeMismatch {
            name,
            expected: type_name::<T>(),
            found,
        })
}

/// The animation state of one visual: its named motion channels plus the
/// flag telling the canvas to drop the visual once everything settles.
#[derive(Debug, Default)]
pub struct Animatable {
    channels: HashMap<&'static str, Box<dyn Channel>>,
    remove_on_completed: bool,
}

impl Animatable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the channel `name` holding `initial`, or returns the existing
    /// one. Registering is idempotent; the initial value of an existing
    /// channel is left alone.
    pub fn register<T: Interpolate>(
        &mut self,
        name: &'static str,
        initial: T,
    ) -> MotionResult<&mut MotionProperty<T>> {
        let channel = self
            .channels
            .entry(name)
            .or_insert_with(|| Box::new(MotionProperty::new(name, initial)) as Box<dyn Channel>);
        downcast_mut(channel.as_mut())
    }

    /// Adds the channel `name` holding `initial`, replacing any channel of
    /// that name. Used when building a visual from scratch.
    pub fn with_channel<T: Interpolate>(mut self, name: &'static str, initial: T) -> Self {
        self.channels
            .insert(name, Box::new(MotionProperty::new(name, initial)));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.channels.keys().copied()
    }

    pub fn property<T: Interpolate>(&self, name: &'static str) -> MotionResult<&MotionProperty<T>> {
        let channel = self
            .channels
            .get(name)
            .ok_or(MotionError::UnknownChannel { name })?;
        downcast(channel.as_ref())
    }

    pub fn property_mut<T: Interpolate>(
        &mut self,
        name: &'static str,
    ) -> MotionResult<&mut MotionProperty<T>> {
        let channel = self
            .channels
            .get_mut(name)
            .ok_or(MotionError::UnknownChannel { name })?;
        downcast_mut(channel.as_mut())
    }

    /// Moves channel `name` toward `value`. The first set of an unknown
    /// channel registers it at `value` without animating.
    ///
    /// Returns whether a new movement started.
    pub fn set<T: Interpolate>(
        &mut self,
        name: &'static str,
        value: T,
        now: Duration,
    ) -> MotionResult<bool> {
        match self.channels.get_mut(name) {
            Some(channel) => Ok(downcast_mut::<T>(channel.as_mut())?.set_target(value, now)),
            None => {
                self.register(name, value)?;
                Ok(false)
            }
        }
    }

    /// Resolves channel `name` at `now`.
    pub fn get<T: Interpolate>(&self, name: &'static str, now: Duration) -> MotionResult<T> {
        Ok(self.property::<T>(name)?.value_at(now))
    }

    /// Attaches `transition` to the named channels, or to every channel when
    /// `names` is `None`. Passing `None` as the transition removes it.
    pub fn set_transition(
        &mut self,
        names: Option<&[&'static str]>,
        transition: Option<Transition>,
    ) -> MotionResult<()> {
        self.for_each_selected(names, |channel| channel.set_transition(transition))
    }

    pub fn remove_transition(&mut self, names: Option<&[&'static str]>) -> MotionResult<()> {
        self.set_transition(names, None)
    }

    /// Jumps the named channels (or all of them) to their targets.
    pub fn complete_transition(&mut self, names: Option<&[&'static str]>) -> MotionResult<()> {
        self.for_each_selected(names, |channel| channel.complete())
    }

    /// Advances every channel to `now`. Returns whether all of them have
    /// completed.
    pub fn advance(&mut self, now: Duration) -> bool {
        let mut all_completed = true;
        for channel in self.channels.values_mut() {
            channel.advance(now);
            all_completed &= channel.is_completed();
        }
        all_completed
    }

    pub fn is_all_transitions_completed(&self) -> bool {
        self.channels.values().all(|channel| channel.is_completed())
    }

    #[inline]
    pub fn remove_on_completed(&self) -> bool {
        self.remove_on_completed
    }

    #[inline]
    pub fn set_remove_on_completed(&mut self, remove: bool) {
        self.remove_on_completed = remove;
    }

    fn for_each_selected(
        &mut self,
        names: Option<&[&'static str]>,
        mut f: impl FnMut(&mut dyn Channel),
    ) -> MotionResult<()> {
        match names {
            None => {
                for channel in self.channels.values_mut() {
                    f(channel.as_mut());
                }
            }
            Some(names) => {
                for &name in names {
                    let channel = self
                        .channels
                        .get_mut(name)
                        .ok_or(MotionError::UnknownChannel { name })?;
                    f(channel.as_mut());
                }
            }
        }
        Ok(())
    }
}
