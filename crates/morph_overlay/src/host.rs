//! Overlay surface hosting
//!
//! The overlay draws above the normal hierarchy in a transparent,
//! window-sized surface. Input must keep working underneath it, so the
//! surface only claims pointer events inside a currently drawn floating
//! element; everywhere else hit-testing falls through to the content
//! below. One surface exists per application window, mounted the first
//! time the scene becomes active and kept across later activations.

use crate::layer::FloatingElement;
use morph_core::geometry::Point;
use thiserror::Error;

/// Identifies one application window
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowId(pub u32);

/// Application scene lifecycle, as reported by the embedding platform
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScenePhase {
    /// Foregrounded and interactive
    Active,
    /// Visible but not receiving events
    Inactive,
    /// Not visible
    Background,
}

/// Overlay hosting failures. All are non-fatal: the caller logs and
/// skips, and transitions simply will not draw.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("no active window to host the overlay surface")]
    NoActiveWindow,
}

/// The transparent pass-through surface floating elements draw into
pub struct OverlaySurface {
    window: WindowId,
    frame: Vec<FloatingElement>,
}

impl OverlaySurface {
    pub(crate) fn new(window: WindowId) -> Self {
        Self {
            window,
            frame: Vec::new(),
        }
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    /// The floating elements drawn last frame
    pub fn frame(&self) -> &[FloatingElement] {
        &self.frame
    }

    pub(crate) fn set_frame(&mut self, frame: Vec<FloatingElement>) {
        self.frame = frame;
    }

    /// Whether the surface claims a pointer event at `point`.
    ///
    /// `false` means the event passes through to the content below; the
    /// surface only intercepts inside live floating content.
    pub fn hit_test(&self, point: Point) -> bool {
        self.frame.iter().any(|element| element.rect.contains(point))
    }
}
