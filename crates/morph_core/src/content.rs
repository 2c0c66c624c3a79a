//! Floating content descriptions
//!
//! The overlay draws a snapshot of the transitioning element, not the live
//! element itself. Content is a closed set of renderable descriptions
//! rather than a type-erased view, so the renderer can match on it without
//! dynamic dispatch.

/// RGBA color with f32 components (0.0 to 1.0)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const TRANSPARENT: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create from u8 components (0-255)
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Set alpha and return new color
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { a: alpha, ..self }
    }
}

/// What the overlay draws while a transition is in flight.
///
/// The snapshot variant carries an opaque handle into whatever image cache
/// the embedding renderer keeps; this crate never dereferences it.
#[derive(Clone, Debug, PartialEq)]
pub enum FloatingContent {
    /// A solid rounded fill
    Fill { color: Color },
    /// A filled card with a text label
    Card { color: Color, label: String },
    /// A pre-rendered snapshot of the source element
    Snapshot { id: u64 },
}

impl FloatingContent {
    /// Convenience constructor for a solid fill
    pub fn fill(color: Color) -> Self {
        FloatingContent::Fill { color }
    }

    /// Convenience constructor for a labelled card
    pub fn card(color: Color, label: impl Into<String>) -> Self {
        FloatingContent::Card {
            color,
            label: label.into(),
        }
    }
}
