//! Layout tree with absolute bounds resolution
//!
//! A thin wrapper over Taffy that keeps its own node handles and parent
//! links, so a node's absolute screen-space rect can be resolved after a
//! layout pass. Anchors read those rects and publish them into the
//! transition registry.

use morph_core::geometry::Rect;
use slotmap::{new_key_type, SlotMap};
use std::sync::atomic::{AtomicU64, Ordering};
use taffy::prelude::*;

new_key_type! {
    /// Handle to a node in a [`LayoutTree`]
    pub struct ViewId;
}

/// Distinguishes trees from each other. [`ViewId`]s are only meaningful
/// within the tree that created them, so anchors record the tree they
/// belong to and ignore publish passes over any other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TreeId(u64);

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

struct ViewNode {
    taffy: NodeId,
    parent: Option<ViewId>,
}

/// Maps framework node handles to Taffy nodes and tracks parent links
pub struct LayoutTree {
    id: TreeId,
    taffy: TaffyTree,
    nodes: SlotMap<ViewId, ViewNode>,
}

impl LayoutTree {
    pub fn new() -> Self {
        Self {
            id: TreeId(NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed)),
            taffy: TaffyTree::new(),
            nodes: SlotMap::with_key(),
        }
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    /// Create a new layout node with the given style
    pub fn create_node(&mut self, style: Style) -> ViewId {
        let taffy_node = self.taffy.new_leaf(style).unwrap();
        self.nodes.insert(ViewNode {
            taffy: taffy_node,
            parent: None,
        })
    }

    /// Set the style for a node
    pub fn set_style(&mut self, id: ViewId, style: Style) {
        if let Some(node) = self.nodes.get(id) {
            let _ = self.taffy.set_style(node.taffy, style);
        }
    }

    /// Add a child to a parent node
    pub fn add_child(&mut self, parent: ViewId, child: ViewId) {
        let Some(parent_taffy) = self.nodes.get(parent).map(|n| n.taffy) else {
            return;
        };
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = Some(parent);
            let _ = self.taffy.add_child(parent_taffy, child_node.taffy);
        }
    }

    /// Run a layout pass for the tree rooted at `root`
    pub fn compute_layout(&mut self, root: ViewId, width: f32, height: f32) {
        if let Some(node) = self.nodes.get(root) {
            let available = Size {
                width: AvailableSpace::Definite(width),
                height: AvailableSpace::Definite(height),
            };
            let _ = self.taffy.compute_layout(node.taffy, available);
        }
    }

    /// Resolve a node's absolute screen-space rect by accumulating
    /// parent-relative locations up the tree.
    ///
    /// Returns `None` until a layout pass has run for the node's tree.
    pub fn absolute_bounds(&self, id: ViewId) -> Option<Rect> {
        let node = self.nodes.get(id)?;
        let layout = self.taffy.layout(node.taffy).ok()?;

        let mut x = layout.location.x;
        let mut y = layout.location.y;
        let mut current = node.parent;
        while let Some(parent_id) = current {
            let parent = self.nodes.get(parent_id)?;
            let parent_layout = self.taffy.layout(parent.taffy).ok()?;
            x += parent_layout.location.x;
            y += parent_layout.location.y;
            current = parent.parent;
        }

        Some(Rect::new(x, y, layout.size.width, layout.size.height))
    }

    /// Remove a node (children keep their handles but detach from layout)
    pub fn remove_node(&mut self, id: ViewId) {
        if let Some(node) = self.nodes.remove(id) {
            let _ = self.taffy.remove(node.taffy);
        }
    }
}

impl Default for LayoutTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(width: f32, height: f32) -> Style {
        Style {
            size: Size {
                width: Dimension::Length(width),
                height: Dimension::Length(height),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_absolute_bounds_accumulates_offsets() {
        let mut tree = LayoutTree::new();

        let root = tree.create_node(Style {
            flex_direction: FlexDirection::Column,
            size: Size {
                width: Dimension::Length(400.0),
                height: Dimension::Length(800.0),
            },
            ..Default::default()
        });
        let spacer = tree.create_node(fixed(400.0, 100.0));
        let card = tree.create_node(fixed(120.0, 80.0));
        tree.add_child(root, spacer);
        tree.add_child(root, card);

        tree.compute_layout(root, 400.0, 800.0);

        let bounds = tree.absolute_bounds(card).unwrap();
        assert_eq!(bounds, Rect::new(0.0, 100.0, 120.0, 80.0));
    }

    #[test]
    fn test_absolute_positioning() {
        let mut tree = LayoutTree::new();

        let root = tree.create_node(fixed(400.0, 800.0));
        let mut style = fixed(120.0, 80.0);
        style.position = Position::Absolute;
        style.inset = taffy::Rect {
            left: LengthPercentageAuto::Length(16.0),
            top: LengthPercentageAuto::Length(200.0),
            right: LengthPercentageAuto::Auto,
            bottom: LengthPercentageAuto::Auto,
        };
        let card = tree.create_node(style);
        tree.add_child(root, card);

        tree.compute_layout(root, 400.0, 800.0);

        let bounds = tree.absolute_bounds(card).unwrap();
        assert_eq!(bounds, Rect::new(16.0, 200.0, 120.0, 80.0));
    }

    #[test]
    fn test_relayout_updates_bounds() {
        let mut tree = LayoutTree::new();
        let root = tree.create_node(fixed(400.0, 800.0));
        let card = tree.create_node(fixed(120.0, 80.0));
        tree.add_child(root, card);
        tree.compute_layout(root, 400.0, 800.0);

        tree.set_style(card, fixed(200.0, 160.0));
        tree.compute_layout(root, 400.0, 800.0);

        let bounds = tree.absolute_bounds(card).unwrap();
        assert_eq!(bounds.width, 200.0);
        assert_eq!(bounds.height, 160.0);
    }
}
