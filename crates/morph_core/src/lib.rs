//! Morph Core Primitives
//!
//! This crate provides the foundational pieces of the Morph shared-element
//! transition system:
//!
//! - **Geometry**: screen-space rects with interpolation and containment
//! - **Tweens**: timed scalar animations with easing
//! - **Timers**: cancelable delayed continuations on a virtual clock
//! - **Registry**: the keyed store of per-transition state
//!
//! # Example
//!
//! ```rust
//! use morph_core::geometry::Rect;
//! use morph_core::registry::TransitionRegistry;
//!
//! let mut registry = TransitionRegistry::new();
//! let entry = registry.ensure_entry("card1");
//! entry.source_bounds = Some(Rect::new(16.0, 120.0, 120.0, 80.0));
//! assert!(registry.entry("card1").is_some());
//! assert!(registry.entry("card2").is_none());
//! ```

pub mod content;
pub mod easing;
pub mod geometry;
pub mod registry;
pub mod timer;
pub mod tween;

pub use content::{Color, FloatingContent};
pub use easing::Easing;
pub use geometry::{Point, Rect, Size};
pub use registry::{
    shared_registry, DirtyFlag, PhaseCallback, SharedRegistry, TransitionEntry, TransitionPhase,
    TransitionRegistry,
};
pub use timer::{shared_timers, SharedTimers, TimerId, TimerService};
pub use tween::Tween;
