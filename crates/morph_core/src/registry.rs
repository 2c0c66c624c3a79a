//! The transition registry
//!
//! A keyed store of per-transition state, shared by reference between the
//! controller that drives a transition, the anchors that report geometry
//! into it, and the overlay that renders from it. The registry is owned by
//! the host runtime and dependency-injected; there is no process-global
//! singleton.
//!
//! All mutation happens on the UI thread; the mutex in [`SharedRegistry`]
//! only serializes accidental cross-thread access. Mutations that affect
//! what the overlay draws set the shared [`DirtyFlag`] so the host runs a
//! re-render pass.

use crate::content::FloatingContent;
use crate::geometry::Rect;
use crate::timer::TimerId;
use crate::tween::Tween;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Invoked with `true` when the destination phase is reached and `false`
/// once the entry has fully reset
pub type PhaseCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Position in the transition lifecycle.
///
/// The only legal order is
/// `Idle -> Activating -> ToDestination -> Settled -> ToSource -> Idle`;
/// the controller rejects toggles that would leave it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionPhase {
    /// No transition in flight; entry is at its defaults
    #[default]
    Idle,
    /// Activated, waiting out the pre-forward delay
    Activating,
    /// Forward leg running
    ToDestination,
    /// Arrived; overlay removed, destination content visible
    Settled,
    /// Reverse leg running
    ToSource,
}

/// Everything the system tracks for one transition key
#[derive(Default)]
pub struct TransitionEntry {
    /// Whether this entry owns an in-flight or displayed transition
    pub is_active: bool,
    /// Interpolation target: false = source geometry, true = destination
    pub animate_to_destination: bool,
    /// True once the overlay has arrived and handed off to the real
    /// destination content
    pub is_settled: bool,
    /// Captured once per activation, never overwritten while active
    pub source_bounds: Option<Rect>,
    /// Re-published on every layout pass while active
    pub destination_bounds: Option<Rect>,
    pub source_corner_radius: f32,
    pub destination_corner_radius: f32,
    /// Snapshot the overlay draws while in flight
    pub content: Option<FloatingContent>,
    pub on_phase_change: Option<PhaseCallback>,
    /// Blend driver sampled by the overlay: 0 = source, 1 = destination
    pub blend: Tween,
    pub phase: TransitionPhase,
    /// The currently scheduled continuation, if any
    pub pending_timer: Option<TimerId>,
}

impl TransitionEntry {
    /// Clear every field back to its pre-activation default.
    ///
    /// The phase callback is dropped too; the caller must clone it out
    /// first if it still needs to fire.
    pub fn reset(&mut self) {
        *self = TransitionEntry::default();
    }

    /// Whether the overlay has everything it needs to draw this entry
    pub fn is_renderable(&self) -> bool {
        self.is_active
            && !self.is_settled
            && self.source_bounds.is_some()
            && self.destination_bounds.is_some()
            && self.content.is_some()
    }
}

/// Keyed store of transition entries
#[derive(Default)]
pub struct TransitionRegistry {
    entries: FxHashMap<String, TransitionEntry>,
}

impl TransitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an entry by key
    pub fn entry(&self, key: &str) -> Option<&TransitionEntry> {
        self.entries.get(key)
    }

    /// Look up an entry by key, mutably
    pub fn entry_mut(&mut self, key: &str) -> Option<&mut TransitionEntry> {
        self.entries.get_mut(key)
    }

    /// Get the entry for `key`, creating an empty one on first use
    pub fn ensure_entry(&mut self, key: &str) -> &mut TransitionEntry {
        match self.entries.entry(key.to_owned()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!(key, "transition entry created");
                entry.insert(TransitionEntry::default())
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TransitionEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut TransitionEntry)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Registry shared by reference with all attached controllers and anchors
pub type SharedRegistry = Arc<Mutex<TransitionRegistry>>;

/// Flag requesting a re-render pass from the host
pub type DirtyFlag = Arc<AtomicBool>;

/// Create a shareable registry
pub fn shared_registry() -> SharedRegistry {
    Arc::new(Mutex::new(TransitionRegistry::new()))
}
