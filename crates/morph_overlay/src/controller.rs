//! Transition control
//!
//! A [`TransitionHandle`] is the public attachment a caller binds to a
//! source element. Toggling it drives the registry entry through the
//! lifecycle:
//!
//! `Idle -> Activating -> ToDestination -> Settled -> ToSource -> Idle`
//!
//! The forward leg waits out a short pre-delay first, giving the
//! destination anchor one layout pass to report bounds; without it the
//! overlay would animate toward a stale or zero rect. Settle and cleanup
//! run as scheduled continuations on the shared timer service. Every
//! continuation re-checks the entry's phase when it fires, so a cancelled
//! or superseded leg can never settle state it no longer owns.
//!
//! Re-toggling: `hide()` during the forward leg cancels the pending
//! continuation and reverses from the current blend value. `show()` is
//! only honored from `Idle`; anything else is logged and ignored, keeping
//! the phase callback exactly-once per direction.

use morph_core::content::FloatingContent;
use morph_core::easing::Easing;
use morph_core::registry::{DirtyFlag, PhaseCallback, SharedRegistry, TransitionPhase};
use morph_core::timer::SharedTimers;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, warn};

/// Forward (show) animation duration
pub const FORWARD_DURATION_MS: f32 = 350.0;
/// Reverse (dismiss) animation duration
pub const REVERSE_DURATION_MS: f32 = 450.0;
/// Delay before the forward leg starts, sized to exceed one layout pass
pub const PRE_FORWARD_DELAY_MS: f32 = 60.0;

#[derive(Clone)]
struct TransitionConfig {
    source_corner_radius: f32,
    destination_corner_radius: f32,
    forward_ms: f32,
    reverse_ms: f32,
    pre_delay_ms: f32,
    content: Option<FloatingContent>,
    on_phase_change: Option<PhaseCallback>,
}

/// Declares a transition for a key and configures how it runs
pub struct TransitionBuilder {
    key: String,
    registry: SharedRegistry,
    timers: SharedTimers,
    dirty: DirtyFlag,
    config: TransitionConfig,
}

impl TransitionBuilder {
    pub(crate) fn new(
        key: String,
        registry: SharedRegistry,
        timers: SharedTimers,
        dirty: DirtyFlag,
    ) -> Self {
        Self {
            key,
            registry,
            timers,
            dirty,
            config: TransitionConfig {
                source_corner_radius: 0.0,
                destination_corner_radius: 0.0,
                forward_ms: FORWARD_DURATION_MS,
                reverse_ms: REVERSE_DURATION_MS,
                pre_delay_ms: PRE_FORWARD_DELAY_MS,
                content: None,
                on_phase_change: None,
            },
        }
    }

    /// Corner radius of the element at its source position
    pub fn source_corner_radius(mut self, radius: f32) -> Self {
        self.config.source_corner_radius = radius;
        self
    }

    /// Corner radius of the element at its destination position
    pub fn destination_corner_radius(mut self, radius: f32) -> Self {
        self.config.destination_corner_radius = radius;
        self
    }

    /// Override the forward animation duration
    pub fn forward_duration_ms(mut self, duration: f32) -> Self {
        self.config.forward_ms = duration;
        self
    }

    /// Override the reverse animation duration
    pub fn reverse_duration_ms(mut self, duration: f32) -> Self {
        self.config.reverse_ms = duration;
        self
    }

    /// Override the pre-forward delay
    pub fn pre_delay_ms(mut self, delay: f32) -> Self {
        self.config.pre_delay_ms = delay;
        self
    }

    /// The snapshot the overlay draws while the transition is in flight
    pub fn content(mut self, content: FloatingContent) -> Self {
        self.config.content = Some(content);
        self
    }

    /// Callback invoked with `true` at destination settle and `false`
    /// once the entry has fully reset
    pub fn on_phase_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.config.on_phase_change = Some(Arc::new(callback));
        self
    }

    /// Attach to the registry. The entry is created empty on first
    /// attach; its fields are populated per activation.
    pub fn build(self) -> TransitionHandle {
        self.registry.lock().unwrap().ensure_entry(&self.key);
        TransitionHandle {
            key: self.key,
            registry: self.registry,
            timers: self.timers,
            dirty: self.dirty,
            config: self.config,
        }
    }
}

/// Drives one keyed transition between its source and destination
pub struct TransitionHandle {
    key: String,
    registry: SharedRegistry,
    timers: SharedTimers,
    dirty: DirtyFlag,
    config: TransitionConfig,
}

impl TransitionHandle {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Flip the transition toward the given state
    pub fn set_active(&self, active: bool) {
        if active {
            self.show();
        } else {
            self.hide();
        }
    }

    /// Begin the forward transition: capture configuration into the
    /// entry, then animate to the destination after the pre-delay.
    pub fn show(&self) {
        {
            let mut registry = self.registry.lock().unwrap();
            let entry = registry.ensure_entry(&self.key);
            if entry.phase != TransitionPhase::Idle {
                warn!(key = %self.key, phase = ?entry.phase, "show ignored: transition not idle");
                return;
            }
            entry.is_active = true;
            entry.source_corner_radius = self.config.source_corner_radius;
            entry.destination_corner_radius = self.config.destination_corner_radius;
            entry.content = self.config.content.clone();
            entry.on_phase_change = self.config.on_phase_change.clone();
            entry.phase = TransitionPhase::Activating;
        }
        self.dirty.store(true, Ordering::SeqCst);
        debug!(key = %self.key, "transition activated");

        let registry = self.registry.clone();
        let timers = self.timers.clone();
        let dirty = self.dirty.clone();
        let key = self.key.clone();
        let forward_ms = self.config.forward_ms;
        let timer = self
            .timers
            .lock()
            .unwrap()
            .schedule(self.config.pre_delay_ms, move || {
                start_forward_leg(registry, timers, dirty, key, forward_ms);
            });
        if let Some(entry) = self.registry.lock().unwrap().entry_mut(&self.key) {
            entry.pending_timer = Some(timer);
        }
    }

    /// Reverse toward the source. Settled entries animate back; an entry
    /// still on its forward leg cancels the pending continuation and
    /// reverses from the current blend value. A no-op when idle.
    pub fn hide(&self) {
        let cancelled = {
            let mut registry = self.registry.lock().unwrap();
            let Some(entry) = registry.entry_mut(&self.key) else {
                debug!(key = %self.key, "hide ignored: no transition entry");
                return;
            };
            match entry.phase {
                TransitionPhase::Idle => {
                    debug!(key = %self.key, "hide ignored: transition idle");
                    return;
                }
                TransitionPhase::ToSource => {
                    debug!(key = %self.key, "hide ignored: already reversing");
                    return;
                }
                TransitionPhase::Activating
                | TransitionPhase::ToDestination
                | TransitionPhase::Settled => {}
            }
            let cancelled = entry.pending_timer.take();
            entry.is_settled = false;
            entry.animate_to_destination = false;
            entry
                .blend
                .retarget(0.0, self.config.reverse_ms, Easing::snappy());
            entry.phase = TransitionPhase::ToSource;
            cancelled
        };
        if let Some(timer) = cancelled {
            self.timers.lock().unwrap().cancel(timer);
        }
        self.dirty.store(true, Ordering::SeqCst);
        debug!(key = %self.key, "transition reversing");

        let registry = self.registry.clone();
        let dirty = self.dirty.clone();
        let key = self.key.clone();
        let timer = self
            .timers
            .lock()
            .unwrap()
            .schedule(self.config.reverse_ms, move || {
                settle_reverse(registry, dirty, key);
            });
        if let Some(entry) = self.registry.lock().unwrap().entry_mut(&self.key) {
            entry.pending_timer = Some(timer);
        }
    }
}

/// Pre-delay elapsed: launch the forward animation and schedule settle.
fn start_forward_leg(
    registry: SharedRegistry,
    timers: SharedTimers,
    dirty: DirtyFlag,
    key: String,
    forward_ms: f32,
) {
    {
        let mut registry = registry.lock().unwrap();
        let Some(entry) = registry.entry_mut(&key) else {
            return;
        };
        if entry.phase != TransitionPhase::Activating {
            // A reversal raced the pre-delay; this leg no longer owns the entry
            return;
        }
        entry.pending_timer = None;
        entry.animate_to_destination = true;
        entry.blend.retarget(1.0, forward_ms, Easing::snappy());
        entry.phase = TransitionPhase::ToDestination;
        if entry.destination_bounds.is_none() {
            warn!(key = %key, "forward leg starting before destination bounds were reported");
        }
    }
    dirty.store(true, Ordering::SeqCst);

    let settle_registry = registry.clone();
    let settle_dirty = dirty.clone();
    let settle_key = key.clone();
    let timer = timers.lock().unwrap().schedule(forward_ms, move || {
        settle_forward(settle_registry, settle_dirty, settle_key);
    });
    if let Some(entry) = registry.lock().unwrap().entry_mut(&key) {
        entry.pending_timer = Some(timer);
    }
}

/// Forward duration elapsed: hand visibility to the real destination.
fn settle_forward(registry: SharedRegistry, dirty: DirtyFlag, key: String) {
    let callback = {
        let mut registry = registry.lock().unwrap();
        let Some(entry) = registry.entry_mut(&key) else {
            return;
        };
        if entry.phase != TransitionPhase::ToDestination {
            return;
        }
        entry.pending_timer = None;
        entry.is_settled = true;
        entry.phase = TransitionPhase::Settled;
        entry.on_phase_change.clone()
    };
    dirty.store(true, Ordering::SeqCst);
    debug!(key = %key, "transition settled at destination");
    // Invoked unlocked so the callback may toggle the transition again
    if let Some(callback) = callback {
        callback(true);
    }
}

/// Reverse duration elapsed: clear the entry back to its defaults.
fn settle_reverse(registry: SharedRegistry, dirty: DirtyFlag, key: String) {
    let callback = {
        let mut registry = registry.lock().unwrap();
        let Some(entry) = registry.entry_mut(&key) else {
            return;
        };
        if entry.phase != TransitionPhase::ToSource {
            return;
        }
        let callback = entry.on_phase_change.clone();
        entry.reset();
        callback
    };
    dirty.store(true, Ordering::SeqCst);
    debug!(key = %key, "transition reset to source");
    if let Some(callback) = callback {
        callback(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morph_core::content::Color;
    use morph_core::geometry::Rect;
    use morph_core::registry::shared_registry;
    use morph_core::timer::shared_timers;
    use std::sync::atomic::AtomicBool;
    use std::sync::Mutex;

    fn harness() -> (SharedRegistry, SharedTimers, DirtyFlag) {
        (
            shared_registry(),
            shared_timers(),
            Arc::new(AtomicBool::new(false)),
        )
    }

    /// Step virtual time the way the runtime does: timers, then tweens.
    fn pump(registry: &SharedRegistry, timers: &SharedTimers, dt_ms: f32, frames: usize) {
        for _ in 0..frames {
            let due = timers.lock().unwrap().advance(dt_ms);
            for callback in due {
                callback();
            }
            let mut registry = registry.lock().unwrap();
            for (_, entry) in registry.iter_mut() {
                if entry.is_active {
                    entry.blend.tick(dt_ms);
                }
            }
        }
    }

    fn give_bounds(registry: &SharedRegistry, key: &str) {
        let mut registry = registry.lock().unwrap();
        let entry = registry.entry_mut(key).unwrap();
        entry.source_bounds = Some(Rect::new(16.0, 120.0, 120.0, 80.0));
        entry.destination_bounds = Some(Rect::new(0.0, 0.0, 400.0, 700.0));
    }

    #[test]
    fn test_hide_while_idle_is_noop() {
        let (registry, timers, dirty) = harness();
        let phases: Arc<Mutex<Vec<bool>>> = Arc::new(Mutex::new(Vec::new()));
        let phases_clone = phases.clone();

        let handle =
            TransitionBuilder::new("card1".into(), registry.clone(), timers.clone(), dirty)
                .on_phase_change(move |settled| phases_clone.lock().unwrap().push(settled))
                .build();

        handle.hide();
        pump(&registry, &timers, 10.0, 60);

        assert!(phases.lock().unwrap().is_empty());
        assert_eq!(
            registry.lock().unwrap().entry("card1").unwrap().phase,
            TransitionPhase::Idle
        );
        assert_eq!(timers.lock().unwrap().pending(), 0);
    }

    #[test]
    fn test_show_then_settle_fires_callback_once() {
        let (registry, timers, dirty) = harness();
        let phases: Arc<Mutex<Vec<bool>>> = Arc::new(Mutex::new(Vec::new()));
        let phases_clone = phases.clone();

        let handle =
            TransitionBuilder::new("card1".into(), registry.clone(), timers.clone(), dirty)
                .content(FloatingContent::fill(Color::WHITE))
                .on_phase_change(move |settled| phases_clone.lock().unwrap().push(settled))
                .build();

        handle.show();
        give_bounds(&registry, "card1");

        // Pre-delay (60ms) + forward (350ms) at 10ms frames, plus slack
        pump(&registry, &timers, 10.0, 60);

        let registry_guard = registry.lock().unwrap();
        let entry = registry_guard.entry("card1").unwrap();
        assert!(entry.is_settled);
        assert_eq!(entry.phase, TransitionPhase::Settled);
        drop(registry_guard);

        assert_eq!(*phases.lock().unwrap(), vec![true]);
    }

    #[test]
    fn test_show_is_rejected_unless_idle() {
        let (registry, timers, dirty) = harness();
        let handle = TransitionBuilder::new(
            "card1".into(),
            registry.clone(),
            timers.clone(),
            dirty,
        )
        .content(FloatingContent::fill(Color::WHITE))
        .build();

        handle.show();
        let pending_after_first = timers.lock().unwrap().pending();
        handle.show(); // mid-activation: ignored
        assert_eq!(timers.lock().unwrap().pending(), pending_after_first);
    }

    #[test]
    fn test_hide_mid_forward_cancels_settle() {
        let (registry, timers, dirty) = harness();
        let phases: Arc<Mutex<Vec<bool>>> = Arc::new(Mutex::new(Vec::new()));
        let phases_clone = phases.clone();

        let handle =
            TransitionBuilder::new("card1".into(), registry.clone(), timers.clone(), dirty)
                .content(FloatingContent::fill(Color::WHITE))
                .on_phase_change(move |settled| phases_clone.lock().unwrap().push(settled))
                .build();

        handle.show();
        give_bounds(&registry, "card1");

        // Past the pre-delay, partway into the forward leg
        pump(&registry, &timers, 10.0, 20);
        assert_eq!(
            registry.lock().unwrap().entry("card1").unwrap().phase,
            TransitionPhase::ToDestination
        );

        handle.hide();

        // Run well past where the forward settle would have fired
        pump(&registry, &timers, 10.0, 60);

        // Only the reset callback fired; the cancelled settle never did
        assert_eq!(*phases.lock().unwrap(), vec![false]);
        let registry_guard = registry.lock().unwrap();
        let entry = registry_guard.entry("card1").unwrap();
        assert!(!entry.is_active);
        assert_eq!(entry.phase, TransitionPhase::Idle);
    }

    #[test]
    fn test_full_cycle_callbacks() {
        let (registry, timers, dirty) = harness();
        let phases: Arc<Mutex<Vec<bool>>> = Arc::new(Mutex::new(Vec::new()));
        let phases_clone = phases.clone();

        let handle =
            TransitionBuilder::new("card1".into(), registry.clone(), timers.clone(), dirty)
                .content(FloatingContent::fill(Color::WHITE))
                .on_phase_change(move |settled| phases_clone.lock().unwrap().push(settled))
                .build();

        handle.set_active(true);
        give_bounds(&registry, "card1");
        pump(&registry, &timers, 10.0, 60);

        handle.set_active(false);
        pump(&registry, &timers, 10.0, 60);

        assert_eq!(*phases.lock().unwrap(), vec![true, false]);
        assert_eq!(
            registry.lock().unwrap().entry("card1").unwrap().phase,
            TransitionPhase::Idle
        );
        assert_eq!(timers.lock().unwrap().pending(), 0);
    }
}
