//! Top-level application state and run loop.
//!
//! `AppState` owns the gesture interpreter, the target cache, and the
//! particle field, and advances all three once per display frame. `run`
//! wires the simulated pose source, the visualizer window, and the frame
//! clock together.

use std::sync::mpsc::{self, TryRecvError};

use crate::gesture::{ControlState, GestureInterpreter};
use crate::particles::ParticleField;
use crate::pose::{spawn_pose_source, HandPoseSample, PoseFrame, SimPoseSource};
use crate::targets::{ModeSpec, TargetCache, MODE_COUNT};
use crate::time::FrameClock;
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Startup configuration: one text target per mode plus the population size.
pub struct AppConfig {
    pub modes: [ModeSpec; MODE_COUNT],
    pub particle_count: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            modes: [
                ModeSpec::new("HELLO", 110.0),
                ModeSpec::new("WORLD", 110.0),
                ModeSpec::new("RUST", 130.0),
            ],
            particle_count: 4000,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    interpreter: GestureInterpreter,
    cache: TargetCache,
    field: ParticleField,
    control: ControlState,
}

impl AppState {
    /// Build the state and kick off background rasterization of every mode.
    pub fn new(cfg: AppConfig) -> Self {
        AppState {
            interpreter: GestureInterpreter::new(),
            cache: TargetCache::spawn(cfg.modes, cfg.particle_count),
            field: ParticleField::new(cfg.particle_count),
            control: ControlState::default(),
        }
    }

    #[cfg(test)]
    fn with_cache(cfg: AppConfig, cache: TargetCache) -> Self {
        AppState {
            interpreter: GestureInterpreter::new(),
            cache,
            field: ParticleField::new(cfg.particle_count),
            control: ControlState::default(),
        }
    }

    /// Feed this tick's pose sample (or its absence) to the interpreter.
    pub fn apply_pose(&mut self, pose: Option<&HandPoseSample>) -> ControlState {
        self.control = self.interpreter.interpret(pose);
        self.control
    }

    /// Advance one simulation tick at `elapsed` seconds.
    pub fn tick(&mut self, elapsed: f32) {
        self.cache.poll();
        let targets = if self.control.hand_active {
            self.cache.get(self.control.mode)
        } else {
            None
        };
        self.field.step(self.control, targets, elapsed);
    }

    pub fn control(&self) -> ControlState {
        self.control
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application: simulated pose source on its own thread, the
/// window loop at ~60 fps. Stopping is just falling out of the loop; the
/// source thread ends when its channel disconnects.
pub fn run(cfg: AppConfig) -> Result<(), String> {
    let (sim_tx, sim_rx) = mpsc::channel();
    let pose_rx = spawn_pose_source(SimPoseSource { rx: sim_rx });

    let mut vis = Visualizer::new(sim_tx)?;
    let mut app = AppState::new(cfg);
    let mut clock = FrameClock::new();

    while vis.is_open() {
        if !vis.poll_input() {
            break;
        }

        // Drain pose frames; only the freshest matters this tick. An empty
        // channel means the source hasn't produced yet — the previous
        // control state simply carries over.
        let mut latest = None;
        loop {
            match pose_rx.try_recv() {
                Ok(frame) => latest = Some(frame),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            }
        }
        match &latest {
            Some(PoseFrame::Hand(sample)) => {
                app.apply_pose(Some(sample));
            }
            Some(PoseFrame::NoHand) => {
                app.apply_pose(None);
            }
            None => {}
        }

        let elapsed = clock.update();
        app.tick(elapsed);
        vis.render(app.field(), app.control(), elapsed, clock.fps());
    }

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
