//! Hand-pose acquisition — the seam between the core and whatever tracks hands.
//!
//! The public interface is [`PoseFrame`] delivered over a `mpsc` channel.
//! Consumers don't need to know whether frames came from a real tracker or
//! the keyboard simulator; one frame arrives per polling tick, and a frame
//! may carry no hand at all.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices (wrist + 4 joints × 5 fingers, tracker ordering)
// ════════════════════════════════════════════════════════════════════════════

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// (tip, pip) pairs for the finger-extension test. Thumb excluded — its tip
/// rarely rises above its IP joint even on an open hand.
pub const FINGER_TIP_PIP: [(usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

/// All five fingertips, thumb included — used for the spread measurement.
pub const FINGERTIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

// ════════════════════════════════════════════════════════════════════════════
// HandPoseSample
// ════════════════════════════════════════════════════════════════════════════

/// One tracked landmark, normalized to [0,1] screen coordinates.
/// `y` grows downward (raster convention), so "up" means smaller `y`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A single hand-pose sample: 21 landmarks plus the sensor timestamp.
///
/// Two consecutive samples with equal timestamps mean the sensor has not
/// produced a new frame; the interpreter skips reprocessing in that case.
#[derive(Clone, Debug, PartialEq)]
pub struct HandPoseSample {
    pub landmarks: [Landmark; 21],
    pub timestamp: f64,
}

/// One tick of the pose pipeline: either a tracked hand or nothing.
#[derive(Clone, Debug, PartialEq)]
pub enum PoseFrame {
    Hand(HandPoseSample),
    NoHand,
}

// ════════════════════════════════════════════════════════════════════════════
// PoseSource trait — unified interface for trackers and the simulator
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`PoseFrame`]s over a channel.
pub trait PoseSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<PoseFrame>);
}

/// Spawn a pose source on its own thread and return the receiving end.
pub fn spawn_pose_source<P: PoseSource>(source: P) -> Receiver<PoseFrame> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// Synthetic poses
// ════════════════════════════════════════════════════════════════════════════

/// Closed-fist wrist→fingertip reach in normalized coordinates.
pub const FIST_REACH: f32 = 0.15;
/// Open-palm wrist→fingertip reach.
pub const OPEN_REACH: f32 = 0.40;

/// Build a plausible 21-landmark pose with the first `extended` fingers
/// (index first, thumb never counted) pointing up and the rest curled.
///
/// `openness` in [0,1] scales every fingertip's distance from the wrist
/// between [`FIST_REACH`] and [`OPEN_REACH`], so the resulting spread maps
/// back to `openness` under the interpreter's dispersion calibration.
///
/// Used by [`SimPoseSource`] and by unit tests as the pose factory.
pub fn synthetic_pose(extended: usize, openness: f32, timestamp: f64) -> HandPoseSample {
    let wrist = Landmark { x: 0.5, y: 0.85 };
    let reach = FIST_REACH + (OPEN_REACH - FIST_REACH) * openness.clamp(0.0, 1.0);

    let mut landmarks = [Landmark::default(); 21];
    landmarks[WRIST] = wrist;

    // Thumb: sideways at full reach, neither up nor down.
    let thumb = [0.35, 0.55, 0.80, 1.0];
    for (j, frac) in thumb.iter().enumerate() {
        landmarks[THUMB_CMC + j] = Landmark {
            x: wrist.x - frac * reach,
            y: wrist.y - 0.03 * frac,
        };
    }

    // Four fingers fanned upward from the wrist; each joint sits along the
    // finger's unit direction so the tip lands at exactly `reach`.
    for finger in 0..4 {
        let base = INDEX_MCP + finger * 4;
        let fan = (finger as f32 - 1.5) * 0.12; // radians off vertical
        let dir = Landmark { x: fan.sin(), y: -fan.cos() };
        let joints = [0.45, 0.65, 0.85, 1.0];
        if finger < extended {
            for (j, frac) in joints.iter().enumerate() {
                landmarks[base + j] = Landmark {
                    x: wrist.x + dir.x * frac * reach,
                    y: wrist.y + dir.y * frac * reach,
                };
            }
        } else {
            // Curled: knuckles rise a little, then the tip folds back out to
            // the side — same wrist distance, but below the PIP joint.
            for (j, frac) in joints[..3].iter().enumerate() {
                landmarks[base + j] = Landmark {
                    x: wrist.x + dir.x * frac * reach * 0.4,
                    y: wrist.y + dir.y * frac * reach * 0.4,
                };
            }
            landmarks[base + 3] = Landmark {
                x: wrist.x + reach,
                y: wrist.y,
            };
        }
    }

    HandPoseSample { landmarks, timestamp }
}

// ════════════════════════════════════════════════════════════════════════════
// SimPoseSource — keyboard simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the visualizer window.
#[derive(Clone, Debug)]
pub enum SimInput {
    /// Set how many fingers the synthetic hand holds up (0–4).
    Fingers(usize),
    /// Toggle whether a hand is present at all.
    HandToggle,
    /// One display frame elapsed; `palm_open` is true while Space is held.
    Tick { palm_open: bool },
    Quit,
}

/// Pose source driven by [`SimInput`] events from the visualizer's window.
///
/// The window loop sends one `Tick` per frame; this source integrates the
/// keyboard state into a synthetic hand (openness eases toward its target
/// so dispersion ramps rather than jumps) and emits one [`PoseFrame`] per
/// tick. This decouples the window event loop from pose synthesis, the
/// same way a hardware tracker would run on its own polling thread.
pub struct SimPoseSource {
    pub rx: Receiver<SimInput>,
}

impl PoseSource for SimPoseSource {
    fn run(self: Box<Self>, tx: Sender<PoseFrame>) {
        const EASE: f32 = 0.12; // per-tick openness approach rate
        const RELAXED: f32 = 0.35; // openness with nothing held

        let started = Instant::now();
        let mut present = true;
        let mut extended = 0usize;
        let mut openness = RELAXED;

        for input in self.rx {
            match input {
                SimInput::Fingers(n) => extended = n.min(4),
                SimInput::HandToggle => present = !present,
                SimInput::Quit => return,
                SimInput::Tick { palm_open } => {
                    let target = if palm_open { 1.0 } else { RELAXED };
                    openness += (target - openness) * EASE;

                    let frame = if present {
                        let ts = started.elapsed().as_secs_f64();
                        PoseFrame::Hand(synthetic_pose(extended, openness, ts))
                    } else {
                        PoseFrame::NoHand
                    };
                    if tx.send(frame).is_err() {
                        return;
                    }
                }
            }
        }
    }
}

/// A pose source that replays a fixed sequence of frames at an interval.
/// Handy for demos and for driving the pipeline headlessly.
pub struct ReplayPoseSource {
    pub frames: Vec<PoseFrame>,
    pub interval: Duration,
}

impl PoseSource for ReplayPoseSource {
    fn run(self: Box<Self>, tx: Sender<PoseFrame>) {
        for frame in self.frames {
            if tx.send(frame).is_err() {
                return;
            }
            thread::sleep(self.interval);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_pose_extends_requested_fingers() {
        let pose = synthetic_pose(2, 0.8, 0.0);
        for (i, (tip, pip)) in FINGER_TIP_PIP.iter().enumerate() {
            let up = pose.landmarks[*tip].y < pose.landmarks[*pip].y;
            assert_eq!(up, i < 2, "finger {} extension mismatch", i);
        }
    }

    #[test]
    fn synthetic_pose_openness_sets_reach() {
        let wrist = Landmark { x: 0.5, y: 0.85 };
        for &(openness, expected) in &[(0.0, FIST_REACH), (1.0, OPEN_REACH)] {
            let pose = synthetic_pose(4, openness, 0.0);
            for &tip in &FINGERTIPS {
                let d = pose.landmarks[tip].distance(&wrist);
                assert!(
                    (d - expected).abs() < 0.01,
                    "tip {} at openness {}: {} vs {}",
                    tip,
                    openness,
                    d,
                    expected
                );
            }
        }
    }

    #[test]
    fn curled_tip_keeps_wrist_distance() {
        // The spread measurement must see curled fingers at the same reach,
        // just folded below their PIP joint.
        let pose = synthetic_pose(0, 0.5, 0.0);
        let wrist = pose.landmarks[WRIST];
        let tip = pose.landmarks[INDEX_TIP];
        let pip = pose.landmarks[INDEX_PIP];
        assert!(tip.y >= pip.y);
        let reach = FIST_REACH + (OPEN_REACH - FIST_REACH) * 0.5;
        assert!((tip.distance(&wrist) - reach).abs() < 0.01);
    }

    #[test]
    fn replay_source_delivers_frames() {
        let rx = spawn_pose_source(ReplayPoseSource {
            frames: vec![PoseFrame::NoHand, PoseFrame::Hand(synthetic_pose(1, 0.5, 1.0))],
            interval: Duration::from_millis(1),
        });
        let first = rx.recv().expect("first frame");
        assert_eq!(first, PoseFrame::NoHand);
        let second = rx.recv().expect("second frame");
        assert!(matches!(second, PoseFrame::Hand(_)));
    }
}
