//! Frame timing — the single source of elapsed time for the simulation.
//!
//! Elapsed time is read here once per frame and threaded into the particle
//! step as a plain parameter, so the simulator itself never touches a clock.

use std::time::{Duration, Instant};

/// Wall-clock frame timer with a periodically refreshed FPS estimate.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    elapsed_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    fixed_delta: Option<f32>,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        FrameClock {
            start: now,
            elapsed_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            fixed_delta: None,
        }
    }

    /// Step by a fixed delta per frame instead of the wall clock, for
    /// deterministic simulation runs. Pass `None` to restore real timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Advance one frame; returns the new elapsed time in seconds.
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        self.elapsed_secs = match self.fixed_delta {
            Some(delta) => self.elapsed_secs + delta,
            None => now.duration_since(self.start).as_secs_f32(),
        };
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames = self.frame_count - self.fps_frame_count;
            self.fps = frames as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.elapsed_secs
    }

    /// Elapsed seconds as of the last `update`.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Smoothed frames-per-second estimate (0 until the first refresh).
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn update_advances_elapsed_and_frames() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        thread::sleep(Duration::from_millis(5));
        let elapsed = clock.update();
        assert!(elapsed > 0.0);
        assert_eq!(clock.frame(), 1);
        assert_eq!(clock.elapsed(), elapsed);
    }

    #[test]
    fn fixed_delta_steps_deterministically() {
        let mut clock = FrameClock::new();
        clock.set_fixed_delta(Some(1.0 / 60.0));
        for _ in 0..60 {
            clock.update();
        }
        assert!((clock.elapsed() - 1.0).abs() < 1e-4);
        assert_eq!(clock.frame(), 60);
    }

    #[test]
    fn elapsed_is_monotonic() {
        let mut clock = FrameClock::new();
        let a = clock.update();
        thread::sleep(Duration::from_millis(2));
        let b = clock.update();
        assert!(b >= a);
    }
}
