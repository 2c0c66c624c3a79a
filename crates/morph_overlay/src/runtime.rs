//! The host runtime
//!
//! [`MorphRuntime`] is what an application embeds: it owns the registry,
//! the timer service and the per-window overlay surfaces, and lends them
//! by reference to every anchor and transition handle it creates. Nothing
//! here is a process-global; two runtimes are fully independent.
//!
//! The embedding drives it cooperatively from the UI thread, once per
//! frame:
//!
//! ```ignore
//! runtime.frame(&[&list_tree, &detail_tree], dt_ms);
//! ```
//!
//! which publishes anchor bounds (after the caller's layout passes), runs
//! due timer continuations, advances in-flight blends, and re-renders the
//! overlay when anything marked the registry dirty. Publishing before the
//! timers fire is what upholds the ordering assumption behind the
//! pre-forward delay: a layout pass always reports destination bounds
//! before the delayed animate-start consumes them.

use crate::anchor::{AnchorSet, DestinationAnchor, SourceAnchor};
use crate::controller::TransitionBuilder;
use crate::host::{HostError, OverlaySurface, ScenePhase, WindowId};
use crate::layer::{FloatingElement, OverlayLayer};
use crate::tree::{LayoutTree, ViewId};
use morph_core::registry::{shared_registry, DirtyFlag, SharedRegistry};
use morph_core::timer::{shared_timers, SharedTimers};
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Owns the transition system for one application
pub struct MorphRuntime {
    registry: SharedRegistry,
    timers: SharedTimers,
    dirty: DirtyFlag,
    anchors: AnchorSet,
    layer: OverlayLayer,
    surfaces: FxHashMap<WindowId, OverlaySurface>,
    last_frame: Vec<FloatingElement>,
}

impl MorphRuntime {
    pub fn new() -> Self {
        Self {
            registry: shared_registry(),
            timers: shared_timers(),
            dirty: Arc::new(AtomicBool::new(false)),
            anchors: AnchorSet::new(),
            layer: OverlayLayer::new(),
            surfaces: FxHashMap::default(),
            last_frame: Vec::new(),
        }
    }

    // =========================================================================
    // Host integration
    // =========================================================================

    /// React to a scene lifecycle change. Becoming active mounts the
    /// overlay surface for the foregrounded window; a missing window is
    /// logged and skipped (transitions will not draw, nothing fatal).
    pub fn scene_phase_changed(&mut self, phase: ScenePhase, window: Option<WindowId>) {
        if phase != ScenePhase::Active {
            return;
        }
        if let Err(err) = self.install_overlay(window) {
            warn!(%err, "overlay surface unavailable; transitions will not draw");
        }
    }

    /// Mount the overlay surface for a window. Mounted once; repeat
    /// activations of the same window are no-ops.
    pub fn install_overlay(&mut self, window: Option<WindowId>) -> Result<(), HostError> {
        let window = window.ok_or(HostError::NoActiveWindow)?;
        self.surfaces.entry(window).or_insert_with(|| {
            debug!(?window, "overlay surface mounted");
            OverlaySurface::new(window)
        });
        Ok(())
    }

    /// The overlay surface for a window, if one was mounted
    pub fn surface(&self, window: WindowId) -> Option<&OverlaySurface> {
        self.surfaces.get(&window)
    }

    /// Whether the overlay claims a pointer event at `point` in `window`
    pub fn hit_test(&self, window: WindowId, point: morph_core::geometry::Point) -> bool {
        self.surfaces
            .get(&window)
            .is_some_and(|surface| surface.hit_test(point))
    }

    // =========================================================================
    // Attachment
    // =========================================================================

    /// Mark a layout node's content as the source of a keyed transition
    pub fn attach_source(&mut self, key: &str, tree: &LayoutTree, node: ViewId) -> SourceAnchor {
        let anchor = SourceAnchor::new(
            key.to_owned(),
            tree.id(),
            node,
            self.registry.clone(),
            self.dirty.clone(),
        );
        self.anchors.add_source(anchor.clone());
        anchor
    }

    /// Mark a layout node's content as the destination of a keyed transition
    pub fn attach_destination(
        &mut self,
        key: &str,
        tree: &LayoutTree,
        node: ViewId,
    ) -> DestinationAnchor {
        let anchor = DestinationAnchor::new(
            key.to_owned(),
            tree.id(),
            node,
            self.registry.clone(),
            self.dirty.clone(),
        );
        self.anchors.add_destination(anchor.clone());
        anchor
    }

    /// Declare and configure the transition for a key
    pub fn transition(&self, key: &str) -> TransitionBuilder {
        TransitionBuilder::new(
            key.to_owned(),
            self.registry.clone(),
            self.timers.clone(),
            self.dirty.clone(),
        )
    }

    // =========================================================================
    // Frame driving
    // =========================================================================

    /// Publish anchor bounds from a tree whose layout pass just ran
    pub fn publish_anchors(&self, tree: &LayoutTree) {
        self.anchors.publish(tree);
    }

    /// Run due timer continuations and advance in-flight blends
    pub fn advance(&mut self, dt_ms: f32) {
        let due = self.timers.lock().unwrap().advance(dt_ms);
        for callback in due {
            callback();
        }

        let mut registry = self.registry.lock().unwrap();
        for (_, entry) in registry.iter_mut() {
            if entry.is_active && !entry.blend.is_settled() {
                entry.blend.tick(dt_ms);
                self.dirty.store(true, Ordering::SeqCst);
            }
        }
    }

    /// Re-render the overlay and push the frame to every surface
    pub fn render(&mut self) -> &[FloatingElement] {
        let elements = {
            let registry = self.registry.lock().unwrap();
            self.layer.render(&registry)
        };
        for surface in self.surfaces.values_mut() {
            surface.set_frame(elements.clone());
        }
        self.last_frame = elements;
        self.dirty.store(false, Ordering::SeqCst);
        &self.last_frame
    }

    /// One cooperative frame: publish each tree's anchors, run timers and
    /// blends, and re-render if anything changed. Returns the floating
    /// elements currently on screen.
    pub fn frame(&mut self, trees: &[&LayoutTree], dt_ms: f32) -> &[FloatingElement] {
        for tree in trees {
            self.anchors.publish(tree);
        }
        self.advance(dt_ms);
        if self.dirty.load(Ordering::SeqCst) {
            self.render();
        }
        &self.last_frame
    }

    // =========================================================================
    // Shared state access
    // =========================================================================

    /// The registry, for components that hold their own reference
    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    pub fn timers(&self) -> &SharedTimers {
        &self.timers
    }

    pub fn dirty_flag(&self) -> &DirtyFlag {
        &self.dirty
    }
}

impl Default for MorphRuntime {
    fn default() -> Self {
        Self::new()
    }
}
