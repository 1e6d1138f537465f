//! Software-rendered visualizer using `minifb`.
//!
//! Projects the 3D particle cloud onto the framebuffer with a simple
//! perspective camera, applies the slow uniform cloud rotation (a
//! presentation flourish — particle state itself is never rotated), and
//! draws a HUD: mode swatches, hand indicator, dispersion bar, fps, and the
//! keyboard legend for the simulated hand.

use glam::{Mat3, Vec3};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use std::sync::mpsc::Sender;

use crate::gesture::ControlState;
use crate::glyph::glyph_rows;
use crate::particles::{mode_color, ParticleField};
use crate::pose::SimInput;
use crate::targets::MODE_COUNT;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W: usize = 1100;
pub const WIN_H: usize = 720;
const BG_COLOR: u32 = 0xFF10101C;
const HUD_TEXT: u32 = 0xFFDDDDDD;
const HUD_DIM: u32 = 0xFF777777;
const BAR_FILL: u32 = 0xFF57C7FF;
const BAR_BG: u32 = 0xFF202036;

/// Camera distance from the cloud's center along +Z.
const CAMERA_DIST: f32 = 280.0;
/// Perspective focal length in pixels.
const FOCAL: f32 = 520.0;
/// Whole-cloud rotation speed, radians per second.
const CLOUD_SPIN: f32 = 0.15;

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf: Vec<u32>,
    sim_tx: Sender<SimInput>,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>) -> Result<Self, String> {
        let mut window = Window::new(
            "Glyph Swarm — gesture-driven text particles",
            WIN_W,
            WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| e.to_string())?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Poll keyboard inputs, forward them to the simulated pose source, and
    /// emit the per-frame tick. Returns false when the app should quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() {
            return false;
        }

        let one_shot = |w: &Window, k: Key| w.is_key_pressed(k, KeyRepeat::No);

        if one_shot(&self.window, Key::Q) || one_shot(&self.window, Key::Escape) {
            let _ = self.sim_tx.send(SimInput::Quit);
            return false;
        }
        for (key, fingers) in [
            (Key::Key0, 0usize),
            (Key::Key1, 1),
            (Key::Key2, 2),
            (Key::Key3, 3),
            (Key::Key4, 4),
        ] {
            if one_shot(&self.window, key) {
                let _ = self.sim_tx.send(SimInput::Fingers(fingers));
            }
        }
        if one_shot(&self.window, Key::H) {
            let _ = self.sim_tx.send(SimInput::HandToggle);
        }

        // The palm state rides the per-frame tick: held Space = open palm.
        let palm_open = self.window.is_key_down(Key::Space);
        let _ = self.sim_tx.send(SimInput::Tick { palm_open });

        true
    }

    /// Render one frame of the cloud plus the HUD.
    pub fn render(&mut self, field: &ParticleField, control: ControlState, elapsed: f32, fps: f32) {
        self.buf.fill(BG_COLOR);

        // Slow uniform spin of the whole cloud, independent of particle motion.
        let spin = Mat3::from_rotation_y(elapsed * CLOUD_SPIN);

        let positions = field.positions();
        let colors = field.colors();
        for i in 0..field.count() {
            let p = spin * positions[i];
            let depth = p.z + CAMERA_DIST;
            if depth < 1.0 {
                continue; // behind the camera
            }
            let sx = WIN_W as f32 / 2.0 + p.x * FOCAL / depth;
            let sy = WIN_H as f32 / 2.0 - p.y * FOCAL / depth;
            if sx < 0.0 || sy < 0.0 {
                continue;
            }
            let argb = rgb_to_argb(colors[i]);
            let (x, y) = (sx as usize, sy as usize);
            // 2×2 splat per particle
            self.set_pixel(x, y, argb);
            self.set_pixel(x + 1, y, argb);
            self.set_pixel(x, y + 1, argb);
            self.set_pixel(x + 1, y + 1, argb);
        }

        self.draw_hud(control, fps);

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── HUD ───────────────────────────────────────────────────────────────

    fn draw_hud(&mut self, control: ControlState, fps: f32) {
        // Mode swatches across the top-left; the active one gets a border.
        for mode in 1..=MODE_COUNT {
            let x = 10 + (mode - 1) * 34;
            let swatch = rgb_to_argb(mode_color(mode));
            self.fill_rect(x, 10, 26, 18, swatch);
            if control.hand_active && control.mode == mode {
                self.draw_border(x.saturating_sub(2), 8, 30, 22, 0xFFFFFFFF);
            }
        }

        let hand = if control.hand_active { "HAND ON " } else { "HAND OFF" };
        let status = format!(
            "MODE {}  {}  DISP {:>4.2}  FPS {:>3.0}",
            control.mode, hand, control.dispersion, fps
        );
        self.draw_label(&status, 10, 38, HUD_TEXT);

        // Dispersion bar
        self.fill_rect(10, 52, 120, 6, BAR_BG);
        let fill = (control.dispersion.clamp(0.0, 1.0) * 120.0) as usize;
        self.fill_rect(10, 52, fill, 6, BAR_FILL);

        self.draw_label(
            "1-4: FINGERS  0: FIST  SPACE: OPEN PALM  H: HAND ON-OFF  Q: QUIT",
            10,
            WIN_H - 16,
            HUD_DIM,
        );
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(WIN_H) {
            for col in x..(x + w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for col in x..(x + w).min(WIN_W) {
            if y < WIN_H {
                self.buf[y * WIN_W + col] = color;
            }
            if y + h - 1 < WIN_H {
                self.buf[(y + h - 1) * WIN_W + col] = color;
            }
        }
        for row in y..(y + h).min(WIN_H) {
            if x < WIN_W {
                self.buf[row * WIN_W + x] = color;
            }
            if x + w - 1 < WIN_W {
                self.buf[row * WIN_W + x + w - 1] = color;
            }
        }
    }

    /// HUD text in the crate's 5×7 face at one pixel per cell.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let rows = glyph_rows(ch);
            for (row, &bits) in rows.iter().enumerate() {
                for col in 0..5usize {
                    if bits & (1 << (4 - col)) != 0 {
                        self.set_pixel(cx + col, y + row, color);
                    }
                }
            }
            cx += 6; // 5 wide + 1 gap
            if cx + 6 > WIN_W {
                break;
            }
        }
    }
}

/// Pack an RGB triple in [0,1] into opaque 0xAARRGGBB.
fn rgb_to_argb(c: Vec3) -> u32 {
    let ch = |v: f32| (v.clamp(0.0, 1.0) * 255.0) as u32;
    0xFF000000 | (ch(c.x) << 16) | (ch(c.y) << 8) | ch(c.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argb_packing_clamps_and_is_opaque() {
        assert_eq!(rgb_to_argb(Vec3::new(1.0, 0.0, 0.0)), 0xFFFF0000);
        assert_eq!(rgb_to_argb(Vec3::new(0.0, 0.0, 2.0)), 0xFF0000FF);
        assert_eq!(rgb_to_argb(Vec3::new(-1.0, 0.0, 0.0)) >> 24, 0xFF);
    }
}
