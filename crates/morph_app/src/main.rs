//! Headless hero-transition walkthrough
//!
//! Throwaway demo of the public contract: a list screen with a card, a
//! detail screen, and a transition between them, driven frame by frame
//! without a window. Run with `RUST_LOG=debug` to watch the phase
//! sequencing.

use anyhow::Result;
use morph_overlay::prelude::*;
use morph_overlay::ScenePhase;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const VIEWPORT_W: f32 = 400.0;
const VIEWPORT_H: f32 = 800.0;
const FRAME_MS: f32 = 16.0;

fn fixed(width: f32, height: f32) -> taffy::Style {
    taffy::Style {
        size: taffy::Size {
            width: taffy::Dimension::Length(width),
            height: taffy::Dimension::Length(height),
        },
        ..Default::default()
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut runtime = MorphRuntime::new();
    runtime.scene_phase_changed(ScenePhase::Active, Some(WindowId(1)));

    // List screen: a header and one tappable card
    let mut list = LayoutTree::new();
    let list_root = list.create_node(taffy::Style {
        flex_direction: taffy::FlexDirection::Column,
        ..fixed(VIEWPORT_W, VIEWPORT_H)
    });
    let header = list.create_node(fixed(VIEWPORT_W, 120.0));
    let card = list.create_node(fixed(120.0, 80.0));
    list.add_child(list_root, header);
    list.add_child(list_root, card);
    list.compute_layout(list_root, VIEWPORT_W, VIEWPORT_H);

    // Detail screen: the card expanded to near fullscreen
    let mut detail = LayoutTree::new();
    let detail_root = detail.create_node(fixed(VIEWPORT_W, VIEWPORT_H));
    let detail_view = detail.create_node(fixed(VIEWPORT_W, 700.0));
    detail.add_child(detail_root, detail_view);
    detail.compute_layout(detail_root, VIEWPORT_W, VIEWPORT_H);

    let source = runtime.attach_source("card1", &list, card);
    let destination = runtime.attach_destination("card1", &detail, detail_view);

    let settled = Arc::new(AtomicBool::new(false));
    let settled_flag = settled.clone();
    let hero = runtime
        .transition("card1")
        .source_corner_radius(8.0)
        .destination_corner_radius(24.0)
        .content(FloatingContent::card(Color::rgb(0.2, 0.5, 0.9), "Card 1"))
        .on_phase_change(move |at_destination| {
            info!(at_destination, "phase changed");
            settled_flag.store(at_destination, Ordering::SeqCst);
        })
        .build();

    info!("tapping the card");
    hero.show();

    let mut elapsed = 0.0f32;
    while !settled.load(Ordering::SeqCst) {
        let floating = runtime.frame(&[&list, &detail], FRAME_MS);
        if let Some(element) = floating.first() {
            info!(
                t_ms = elapsed,
                x = element.rect.x,
                y = element.rect.y,
                w = element.rect.width,
                h = element.rect.height,
                radius = element.corner_radius,
                "floating element"
            );
        }
        elapsed += FRAME_MS;
        anyhow::ensure!(elapsed < 2_000.0, "forward transition never settled");
    }
    info!(
        source_opacity = source.opacity(),
        destination_opacity = destination.opacity(),
        "detail view presented"
    );

    info!("dismissing the detail view");
    hero.hide();
    while runtime
        .registry()
        .lock()
        .unwrap()
        .entry("card1")
        .is_some_and(|entry| entry.is_active)
    {
        runtime.frame(&[&list, &detail], FRAME_MS);
        elapsed += FRAME_MS;
        anyhow::ensure!(elapsed < 4_000.0, "reverse transition never reset");
    }
    info!(
        source_opacity = source.opacity(),
        destination_opacity = destination.opacity(),
        "back on the list screen"
    );

    Ok(())
}
