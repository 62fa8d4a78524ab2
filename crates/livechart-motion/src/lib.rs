//! Motion engine for chart visuals.
//!
//! A visual owns an [`Animatable`]: a set of named [`MotionProperty`]
//! channels, each holding the value it animates from, the value it animates
//! to, and when that movement started. Values are resolved on demand against
//! the time supplied by the owning canvas' [`FrameClock`].
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use livechart_motion::{Animatable, EasingFunction, Transition};
//!
//! let mut visual = Animatable::new();
//! visual.register("X", 0.0f32).unwrap();
//! visual
//!     .set_transition(None, Some(Transition::new(Duration::from_secs(1), EasingFunction::Linear)))
//!     .unwrap();
//!
//! visual.set("X", 100.0f32, Duration::ZERO).unwrap();
//! let halfway: f32 = visual.get("X", Duration::from_millis(500)).unwrap();
//! assert!((halfway - 50.0).abs() < 1e-3);
//! ```

mod animatable;
mod clock;
mod easing;
mod error;
mod interpolate;
mod property;
mod transition;

pub use animatable::*;
pub use clock::*;
pub use easing::*;
pub use error::*;
pub use interpolate::*;
pub use property::*;
pub use transition::*;
