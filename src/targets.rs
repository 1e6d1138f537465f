//! Per-mode target point sets, rasterized lazily off the simulation path.
//!
//! A background thread rasterizes all three mode texts shortly after startup
//! and sends the finished sets over a channel; the simulation loop drains
//! the channel once per tick with [`TargetCache::poll`]. A mode whose set
//! has not arrived yet — or arrived empty because the text covered no
//! pixels — simply reads as "no target", and the simulator falls back to
//! the idle formation. Fire-and-forget, no retry.

use std::sync::mpsc::{self, Receiver};
use std::thread;

use glam::Vec3;

use crate::glyph;

/// Number of selectable text modes (1..=MODE_COUNT).
pub const MODE_COUNT: usize = 3;

/// One mode's text target: the string and the size to rasterize it at.
#[derive(Clone, Debug)]
pub struct ModeSpec {
    pub text: String,
    pub font_size: f32,
}

impl ModeSpec {
    pub fn new(text: impl Into<String>, font_size: f32) -> Self {
        ModeSpec { text: text.into(), font_size }
    }
}

/// Session-lifetime cache of rasterized text point sets, keyed by mode.
pub struct TargetCache {
    slots: [Option<Vec<Vec3>>; MODE_COUNT],
    rx: Option<Receiver<(usize, Vec<Vec3>)>>,
}

impl TargetCache {
    /// Start rasterizing every mode's text on a background thread.
    pub fn spawn(specs: [ModeSpec; MODE_COUNT], max_points: usize) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for (i, spec) in specs.into_iter().enumerate() {
                let points = glyph::rasterize(&spec.text, spec.font_size, max_points);
                if tx.send((i + 1, points)).is_err() {
                    return; // cache dropped, nothing left to do
                }
            }
        });
        TargetCache { slots: Default::default(), rx: Some(rx) }
    }

    /// An empty cache with no background work — slots are filled manually
    /// via [`TargetCache::insert`].
    pub fn empty() -> Self {
        TargetCache { slots: Default::default(), rx: None }
    }

    /// Drain any finished rasterizations. Non-blocking; call once per tick.
    pub fn poll(&mut self) {
        if let Some(rx) = &self.rx {
            while let Ok((mode, points)) = rx.try_recv() {
                if (1..=MODE_COUNT).contains(&mode) {
                    self.slots[mode - 1] = Some(points);
                }
            }
        }
    }

    /// Directly store a mode's point set.
    pub fn insert(&mut self, mode: usize, points: Vec<Vec3>) {
        if (1..=MODE_COUNT).contains(&mode) {
            self.slots[mode - 1] = Some(points);
        }
    }

    /// The cached point set for `mode`, or `None` for mode 0, a pending
    /// rasterization, or a set that came back empty. Callers treat all
    /// three the same way: idle fallback.
    pub fn get(&self, mode: usize) -> Option<&[Vec3]> {
        if !(1..=MODE_COUNT).contains(&mode) {
            return None;
        }
        self.slots[mode - 1]
            .as_deref()
            .filter(|points| !points.is_empty())
    }

    /// True once every mode's rasterization has landed (empty or not).
    pub fn all_resolved(&self) -> bool {
        self.slots.iter().all(|s| s.is_some())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn specs() -> [ModeSpec; MODE_COUNT] {
        [
            ModeSpec::new("A", 16.0),
            ModeSpec::new("B", 16.0),
            ModeSpec::new("", 16.0), // rasterizes to nothing
        ]
    }

    #[test]
    fn background_rasterization_lands_via_poll() {
        let mut cache = TargetCache::spawn(specs(), 50);
        let deadline = Instant::now() + Duration::from_secs(5);
        while !cache.all_resolved() {
            assert!(Instant::now() < deadline, "rasterizer thread never finished");
            cache.poll();
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(cache.get(1).map(|p| p.len()), Some(50));
        assert_eq!(cache.get(2).map(|p| p.len()), Some(50));
        // Mode 3's text was empty: resolved, but reads as no target.
        assert!(cache.get(3).is_none());
    }

    #[test]
    fn pending_and_out_of_range_modes_read_as_none() {
        let cache = TargetCache::empty();
        assert!(cache.get(0).is_none());
        assert!(cache.get(1).is_none());
        assert!(cache.get(MODE_COUNT + 1).is_none());
    }

    #[test]
    fn empty_set_is_same_as_missing() {
        let mut cache = TargetCache::empty();
        cache.insert(2, Vec::new());
        assert!(cache.get(2).is_none());
        cache.insert(2, vec![Vec3::ZERO]);
        assert_eq!(cache.get(2).map(|p| p.len()), Some(1));
    }

    #[test]
    fn cached_sets_are_stable_across_polls() {
        let mut cache = TargetCache::empty();
        cache.insert(1, vec![Vec3::new(1.0, 2.0, 0.0)]);
        let before = cache.get(1).unwrap().to_vec();
        cache.poll();
        assert_eq!(cache.get(1).unwrap(), before.as_slice());
    }
}
