//! Morph Overlay Layer
//!
//! The coordination layer of the Morph shared-element transition system.
//! A transition tracks one element across two independently laid-out view
//! trees: while in flight, the real content at both ends renders
//! transparent and a floating snapshot animates between their measured
//! bounds in a transparent overlay surface above everything else.
//!
//! # Example
//!
//! ```ignore
//! use morph_overlay::prelude::*;
//!
//! let mut runtime = MorphRuntime::new();
//! runtime.scene_phase_changed(ScenePhase::Active, Some(WindowId(1)));
//!
//! let _source = runtime.attach_source("card1", &list_tree, card_node);
//! let _destination = runtime.attach_destination("card1", &detail_tree, detail_node);
//!
//! let hero = runtime
//!     .transition("card1")
//!     .destination_corner_radius(20.0)
//!     .content(FloatingContent::fill(Color::WHITE))
//!     .on_phase_change(|settled| println!("settled: {settled}"))
//!     .build();
//!
//! hero.show();
//! // per frame: runtime.frame(&[&list_tree, &detail_tree], dt_ms);
//! ```

pub mod anchor;
pub mod controller;
pub mod host;
pub mod layer;
pub mod runtime;
pub mod tree;

pub use anchor::{AnchorSet, DestinationAnchor, SourceAnchor};
pub use controller::{
    TransitionBuilder, TransitionHandle, FORWARD_DURATION_MS, PRE_FORWARD_DELAY_MS,
    REVERSE_DURATION_MS,
};
pub use host::{HostError, OverlaySurface, ScenePhase, WindowId};
pub use layer::{FloatingElement, OverlayLayer};
pub use runtime::MorphRuntime;
pub use tree::{LayoutTree, TreeId, ViewId};

/// Common imports for embedders
pub mod prelude {
    pub use crate::controller::{TransitionBuilder, TransitionHandle};
    pub use crate::host::{ScenePhase, WindowId};
    pub use crate::layer::FloatingElement;
    pub use crate::runtime::MorphRuntime;
    pub use crate::tree::{LayoutTree, ViewId};
    pub use morph_core::content::{Color, FloatingContent};
    pub use morph_core::geometry::{Point, Rect, Size};
}
