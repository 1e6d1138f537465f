//! # glyph_swarm
//!
//! A cloud of particles that continuously reshapes itself into rasterized
//! text silhouettes, steered in real time by a hand-gesture signal, with a
//! software-rendered visualizer.
//!
//! ## Gesture → control mapping
//!
//! | Gesture | Effect |
//! |---|---|
//! | 1 finger up | Form the mode-1 text |
//! | 2 fingers up | Form the mode-2 text |
//! | 3–4 fingers up | Form the mode-3 text |
//! | Fist (0 fingers) | Keep the current mode |
//! | Palm openness | Dispersion — particles explode off the text |
//! | No hand | Idle double-helix formation, loose dispersion |
//!
//! ## Architecture
//!
//! A [`pose::PoseSource`] delivers one optional 21-landmark hand sample per
//! tick over a channel. The [`gesture::GestureInterpreter`] reduces it to a
//! [`gesture::ControlState`] (mode + dispersion + hand flag). The three mode
//! texts are rasterized lazily on a background thread into the
//! [`targets::TargetCache`]; a mode whose point set hasn't landed yet falls
//! back to the idle formation. Every frame the
//! [`particles::ParticleField`] steers each particle toward its resolved
//! target with a seek-with-arrival step and blends colors toward the mode
//! palette, then the visualizer projects the cloud to the framebuffer.
//!
//! Without a camera or tracker, [`pose::SimPoseSource`] synthesizes poses
//! from the keyboard:
//!
//! | Key | Simulated gesture |
//! |---|---|
//! | `1`–`4` | That many fingers up |
//! | `0` | Fist |
//! | hold `Space` | Open the palm (raise dispersion) |
//! | `H` | Hand present on/off |
//! | `Q` / `Escape` | Quit |

pub mod app;
pub mod gesture;
pub mod glyph;
pub mod particles;
pub mod pose;
pub mod targets;
pub mod time;
pub mod visualizer;
