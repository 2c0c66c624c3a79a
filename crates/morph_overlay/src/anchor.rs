//! Anchor publishers
//!
//! Anchors tie the two real view-tree locations of a transition to its
//! registry entry. After every layout pass the runtime asks the
//! [`AnchorSet`] to publish current bounds:
//!
//! - the **source** anchor reports its rect once per activation (the
//!   captured rect must not drift while the overlay animates away from it)
//! - the **destination** anchor reports on every pass, so a resize or
//!   rotation mid-flight retargets the overlay
//!
//! Anchors also answer for the opacity of the content they wrap. While the
//! overlay owns the visual, the wrapped content renders fully transparent;
//! a key with no registry entry is a pass-through and renders normally.
//!
//! An anchor belongs to the tree it was attached in. [`ViewId`]s are not
//! meaningful across trees, so publish passes over other trees are
//! skipped.

use crate::tree::{LayoutTree, TreeId, ViewId};
use morph_core::registry::{DirtyFlag, SharedRegistry};
use std::sync::atomic::Ordering;

/// Marks wrapped content as the transition's starting element
#[derive(Clone)]
pub struct SourceAnchor {
    key: String,
    tree: TreeId,
    node: ViewId,
    registry: SharedRegistry,
    dirty: DirtyFlag,
}

impl SourceAnchor {
    pub(crate) fn new(
        key: String,
        tree: TreeId,
        node: ViewId,
        registry: SharedRegistry,
        dirty: DirtyFlag,
    ) -> Self {
        Self {
            key,
            tree,
            node,
            registry,
            dirty,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn node(&self) -> ViewId {
        self.node
    }

    /// Opacity the wrapped content should render at this frame
    pub fn opacity(&self) -> f32 {
        let registry = self.registry.lock().unwrap();
        match registry.entry(&self.key) {
            Some(entry) if entry.is_active => 0.0,
            _ => 1.0,
        }
    }

    fn publish(&self, tree: &LayoutTree) {
        if tree.id() != self.tree {
            return;
        }
        let Some(bounds) = tree.absolute_bounds(self.node) else {
            return;
        };
        let mut registry = self.registry.lock().unwrap();
        let Some(entry) = registry.entry_mut(&self.key) else {
            return;
        };
        // Captured once per activation; never overwritten while active
        if entry.is_active && entry.source_bounds.is_none() {
            entry.source_bounds = Some(bounds);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }
}

/// Marks wrapped content as the transition's landing element
#[derive(Clone)]
pub struct DestinationAnchor {
    key: String,
    tree: TreeId,
    node: ViewId,
    registry: SharedRegistry,
    dirty: DirtyFlag,
}

impl DestinationAnchor {
    pub(crate) fn new(
        key: String,
        tree: TreeId,
        node: ViewId,
        registry: SharedRegistry,
        dirty: DirtyFlag,
    ) -> Self {
        Self {
            key,
            tree,
            node,
            registry,
            dirty,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn node(&self) -> ViewId {
        self.node
    }

    /// Opacity the wrapped content should render at this frame.
    ///
    /// The destination only becomes visible once the overlay has finished
    /// animating in (settled) or no transition is active.
    pub fn opacity(&self) -> f32 {
        let registry = self.registry.lock().unwrap();
        match registry.entry(&self.key) {
            Some(entry) if entry.is_active && !entry.is_settled => 0.0,
            _ => 1.0,
        }
    }

    fn publish(&self, tree: &LayoutTree) {
        if tree.id() != self.tree {
            return;
        }
        let Some(bounds) = tree.absolute_bounds(self.node) else {
            return;
        };
        let mut registry = self.registry.lock().unwrap();
        let Some(entry) = registry.entry_mut(&self.key) else {
            return;
        };
        // Continuous while active: bounds may change under rotation/resize
        if entry.is_active && entry.destination_bounds != Some(bounds) {
            entry.destination_bounds = Some(bounds);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }
}

/// All anchors registered with a runtime
#[derive(Default)]
pub struct AnchorSet {
    sources: Vec<SourceAnchor>,
    destinations: Vec<DestinationAnchor>,
}

impl AnchorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(&mut self, anchor: SourceAnchor) {
        self.sources.push(anchor);
    }

    pub fn add_destination(&mut self, anchor: DestinationAnchor) {
        self.destinations.push(anchor);
    }

    /// Publish current bounds for every anchor belonging to `tree`
    pub fn publish(&self, tree: &LayoutTree) {
        for source in &self.sources {
            source.publish(tree);
        }
        for destination in &self.destinations {
            destination.publish(tree);
        }
    }

    pub fn len(&self) -> usize {
        self.sources.len() + self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.destinations.is_empty()
    }
}
