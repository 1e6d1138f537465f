//! Gesture interpretation — reduces one hand-pose sample per tick into a
//! discrete mode selector and a continuous dispersion scalar.
//!
//! | Fingers up (thumb ignored) | Mode |
//! |---|---|
//! | 1 | 1 |
//! | 2 | 2 |
//! | 3–4 | 3 |
//! | 0 (fist) | previous mode retained |
//!
//! Dispersion comes from the hand's *spread*: the mean wrist→fingertip
//! distance (thumb included), affine-mapped so a closed fist reads 0 and a
//! fully open palm reads 1.

use crate::pose::{HandPoseSample, FINGERTIPS, FINGER_TIP_PIP, WRIST};

// ════════════════════════════════════════════════════════════════════════════
// Calibration constants
// ════════════════════════════════════════════════════════════════════════════

/// Spread of a closed fist, in normalized pose coordinates.
pub const FIST_SPREAD: f32 = 0.15;
/// Spread of a fully open palm.
pub const OPEN_SPREAD: f32 = 0.40;
/// Dispersion reported while no hand is tracked — loose, not collapsed.
pub const IDLE_DISPERSION: f32 = 0.1;

// ════════════════════════════════════════════════════════════════════════════
// ControlState
// ════════════════════════════════════════════════════════════════════════════

/// Per-tick control snapshot handed to the particle simulator.
///
/// Plain value, copied each tick; the simulator never shares state with the
/// interpreter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlState {
    /// 0 = idle (no mode selected yet), 1–3 = text formation.
    pub mode: usize,
    /// Explosion strength in [0,1].
    pub dispersion: f32,
    pub hand_active: bool,
}

impl Default for ControlState {
    fn default() -> Self {
        ControlState {
            mode: 0,
            dispersion: IDLE_DISPERSION,
            hand_active: false,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureInterpreter
// ════════════════════════════════════════════════════════════════════════════

/// Stateful interpreter: carries the last selected mode across no-hand gaps
/// and fist frames, and the last sensor timestamp to skip stale samples.
#[derive(Debug, Default)]
pub struct GestureInterpreter {
    last_mode: usize,
    last_timestamp: Option<f64>,
    last_control: ControlState,
}

impl GestureInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpret one tick's pose sample (or its absence).
    ///
    /// Absent pose: the previously selected mode is kept (a lost hand does
    /// not un-click a mode), dispersion relaxes to [`IDLE_DISPERSION`].
    /// A sample whose timestamp equals the previous one is stale and returns
    /// the previous [`ControlState`] without reprocessing.
    pub fn interpret(&mut self, pose: Option<&HandPoseSample>) -> ControlState {
        let control = match pose {
            None => ControlState {
                mode: self.last_mode,
                dispersion: IDLE_DISPERSION,
                hand_active: false,
            },
            Some(sample) => {
                if self.last_timestamp == Some(sample.timestamp) {
                    return self.last_control;
                }
                self.last_timestamp = Some(sample.timestamp);

                let extended = extended_count(sample);
                // A fist is not a mode-switch signal: count 0 retains the
                // previous mode.
                self.last_mode = match extended {
                    1 => 1,
                    2 => 2,
                    n if n >= 3 => 3,
                    _ => self.last_mode,
                };

                ControlState {
                    mode: self.last_mode,
                    dispersion: dispersion_from_spread(spread(sample)),
                    hand_active: true,
                }
            }
        };
        self.last_control = control;
        control
    }

    pub fn last_mode(&self) -> usize {
        self.last_mode
    }
}

/// Count fingers whose tip sits above its PIP joint (smaller y = higher).
fn extended_count(sample: &HandPoseSample) -> usize {
    FINGER_TIP_PIP
        .iter()
        .filter(|(tip, pip)| sample.landmarks[*tip].y < sample.landmarks[*pip].y)
        .count()
}

/// Mean wrist→fingertip distance over all five fingertips.
fn spread(sample: &HandPoseSample) -> f32 {
    let wrist = sample.landmarks[WRIST];
    let total: f32 = FINGERTIPS
        .iter()
        .map(|&tip| sample.landmarks[tip].distance(&wrist))
        .sum();
    total / FINGERTIPS.len() as f32
}

/// Affine map calibrated on [`FIST_SPREAD`]..[`OPEN_SPREAD`], clamped.
fn dispersion_from_spread(spread: f32) -> f32 {
    ((spread - FIST_SPREAD) / (OPEN_SPREAD - FIST_SPREAD)).clamp(0.0, 1.0)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::synthetic_pose;

    #[test]
    fn two_fingers_select_mode_two() {
        let mut interp = GestureInterpreter::new();
        let control = interp.interpret(Some(&synthetic_pose(2, 0.6, 1.0)));
        assert_eq!(control.mode, 2);
        assert!(control.hand_active);
    }

    #[test]
    fn three_or_more_fingers_select_mode_three() {
        let mut interp = GestureInterpreter::new();
        assert_eq!(interp.interpret(Some(&synthetic_pose(3, 0.6, 1.0))).mode, 3);
        assert_eq!(interp.interpret(Some(&synthetic_pose(4, 0.6, 2.0))).mode, 3);
    }

    #[test]
    fn open_palm_disperses_fist_collapses() {
        let mut interp = GestureInterpreter::new();
        let open = interp.interpret(Some(&synthetic_pose(4, 1.0, 1.0)));
        assert!(open.dispersion > 0.95, "open palm: {}", open.dispersion);

        let fist = interp.interpret(Some(&synthetic_pose(0, 0.0, 2.0)));
        assert!(fist.dispersion < 0.05, "fist: {}", fist.dispersion);
    }

    #[test]
    fn absent_pose_retains_mode() {
        let mut interp = GestureInterpreter::new();
        interp.interpret(Some(&synthetic_pose(3, 0.6, 1.0)));
        let control = interp.interpret(None);
        assert_eq!(control.mode, 3);
        assert!(!control.hand_active);
        assert_eq!(control.dispersion, IDLE_DISPERSION);
    }

    #[test]
    fn fist_retains_previous_mode_while_tracked() {
        let mut interp = GestureInterpreter::new();
        interp.interpret(Some(&synthetic_pose(1, 0.6, 1.0)));
        let control = interp.interpret(Some(&synthetic_pose(0, 0.0, 2.0)));
        assert_eq!(control.mode, 1);
        assert!(control.hand_active);
    }

    #[test]
    fn stale_timestamp_keeps_previous_control() {
        let mut interp = GestureInterpreter::new();
        let first = interp.interpret(Some(&synthetic_pose(2, 0.8, 5.0)));
        // Same timestamp, contradictory pose: must not be reprocessed.
        let again = interp.interpret(Some(&synthetic_pose(3, 0.0, 5.0)));
        assert_eq!(again, first);
    }

    #[test]
    fn default_control_is_idle() {
        let mut interp = GestureInterpreter::new();
        let control = interp.interpret(None);
        assert_eq!(control.mode, 0);
        assert!(!control.hand_active);
        assert_eq!(control.dispersion, IDLE_DISPERSION);
    }

    #[test]
    fn dispersion_map_endpoints() {
        assert_eq!(dispersion_from_spread(FIST_SPREAD), 0.0);
        assert_eq!(dispersion_from_spread(OPEN_SPREAD), 1.0);
        assert_eq!(dispersion_from_spread(0.05), 0.0);
        assert_eq!(dispersion_from_spread(0.9), 1.0);
    }
}
