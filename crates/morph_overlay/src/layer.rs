//! Overlay layer rendering
//!
//! The layer is a pure reader of the registry: each frame it emits one
//! floating element per renderable entry, with rect and corner radius
//! blended between the source and destination endpoints by the entry's
//! tween value. Entries missing bounds or content are skipped; the
//! controller's continuations own all state changes.

use morph_core::content::FloatingContent;
use morph_core::geometry::{lerp, Rect};
use morph_core::registry::TransitionRegistry;

/// One in-flight element drawn above the normal hierarchy
#[derive(Clone, Debug, PartialEq)]
pub struct FloatingElement {
    pub key: String,
    pub rect: Rect,
    pub corner_radius: f32,
    pub content: FloatingContent,
}

/// Renders floating elements for every active, unsettled transition
#[derive(Default)]
pub struct OverlayLayer;

impl OverlayLayer {
    pub fn new() -> Self {
        Self
    }

    /// Produce this frame's floating elements
    pub fn render(&self, registry: &TransitionRegistry) -> Vec<FloatingElement> {
        let mut elements = Vec::new();

        for (key, entry) in registry.iter() {
            if !entry.is_renderable() {
                continue;
            }
            // is_renderable checked both bounds and content
            let source = entry.source_bounds.unwrap();
            let destination = entry.destination_bounds.unwrap();
            let content = entry.content.clone().unwrap();

            let t = entry.blend.value();
            elements.push(FloatingElement {
                key: key.to_owned(),
                rect: source.lerp(destination, t),
                corner_radius: lerp(
                    entry.source_corner_radius,
                    entry.destination_corner_radius,
                    t.clamp(0.0, 1.0),
                ),
                content,
            });
        }

        elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morph_core::content::Color;
    use morph_core::easing::Easing;

    fn renderable_entry(registry: &mut TransitionRegistry, key: &str) {
        let entry = registry.ensure_entry(key);
        entry.is_active = true;
        entry.source_bounds = Some(Rect::new(0.0, 0.0, 100.0, 100.0));
        entry.destination_bounds = Some(Rect::new(100.0, 200.0, 300.0, 500.0));
        entry.source_corner_radius = 0.0;
        entry.destination_corner_radius = 20.0;
        entry.content = Some(FloatingContent::fill(Color::WHITE));
    }

    #[test]
    fn test_skips_incomplete_entries() {
        let mut registry = TransitionRegistry::new();
        let layer = OverlayLayer::new();

        // Entry with no bounds at all
        registry.ensure_entry("card1").is_active = true;
        assert!(layer.render(&registry).is_empty());

        // Source bounds alone are not enough
        registry.entry_mut("card1").unwrap().source_bounds =
            Some(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(layer.render(&registry).is_empty());
    }

    #[test]
    fn test_blend_endpoints() {
        let mut registry = TransitionRegistry::new();
        renderable_entry(&mut registry, "card1");
        let layer = OverlayLayer::new();

        // Blend at rest: source geometry
        let elements = layer.render(&registry);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].rect, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(elements[0].corner_radius, 0.0);

        // Blend driven to the destination
        {
            let entry = registry.entry_mut("card1").unwrap();
            entry.blend.retarget(1.0, 0.0, Easing::Linear);
        }
        let elements = layer.render(&registry);
        assert_eq!(elements[0].rect, Rect::new(100.0, 200.0, 300.0, 500.0));
        assert_eq!(elements[0].corner_radius, 20.0);
    }

    #[test]
    fn test_settled_entry_not_rendered() {
        let mut registry = TransitionRegistry::new();
        renderable_entry(&mut registry, "card1");
        registry.entry_mut("card1").unwrap().is_settled = true;

        let layer = OverlayLayer::new();
        assert!(layer.render(&registry).is_empty());
    }

    #[test]
    fn test_entries_render_independently() {
        let mut registry = TransitionRegistry::new();
        renderable_entry(&mut registry, "card1");
        renderable_entry(&mut registry, "card2");
        registry.entry_mut("card2").unwrap().destination_bounds = None;

        let layer = OverlayLayer::new();
        let elements = layer.render(&registry);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].key, "card1");
    }
}
