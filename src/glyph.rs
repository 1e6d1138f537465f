//! Text rasterization — renders a string with the built-in bold sans-serif
//! bitmap face and samples the opaque pixels into a world-space point set.
//!
//! The face is a 5×7-cell grid per glyph, scaled to the requested font size
//! and thickened by a one-cell horizontal dilation for bold weight. Coverage
//! is box-filtered per pixel, so edge pixels carry fractional alpha and the
//! opacity threshold behaves like sampling an anti-aliased surface.

use glam::Vec3;

// ════════════════════════════════════════════════════════════════════════════
// Raster parameters
// ════════════════════════════════════════════════════════════════════════════

/// Glyph cell grid.
const GLYPH_COLS: usize = 5;
const GLYPH_ROWS: usize = 7;
/// Cells per character including the inter-glyph gap (one gap cell survives
/// the bold dilation).
const ADVANCE_COLS: usize = 7;

/// Sample every 2nd pixel on each axis.
const SAMPLE_STEP: usize = 2;
/// Keep a sample iff its coverage exceeds this.
const COVERAGE_MIN: f32 = 0.5;
/// World units per bitmap pixel.
const WORLD_PER_PX: f32 = 0.15;

// ════════════════════════════════════════════════════════════════════════════
// rasterize
// ════════════════════════════════════════════════════════════════════════════

/// Rasterize `text` at `font_size` (pixels of glyph height) and return
/// exactly `max_points` world-space points on the z = 0 plane, or an empty
/// vector when the text covers no pixels.
///
/// When `max_points` exceeds the number of opaque samples M, selection wraps:
/// output `i` reuses sample `i % M`. Pixel coordinates are re-centered on the
/// bitmap midpoint, the Y axis is flipped (raster Y grows downward), and both
/// axes scale by [`WORLD_PER_PX`]. Deterministic for identical inputs.
pub fn rasterize(text: &str, font_size: f32, max_points: usize) -> Vec<Vec3> {
    let bitmap = match CoverageBitmap::render(text, font_size) {
        Some(b) => b,
        None => return Vec::new(), // no drawing surface — caller falls back to idle
    };

    let valid = bitmap.sample_opaque(SAMPLE_STEP, COVERAGE_MIN);
    if valid.is_empty() || max_points == 0 {
        return Vec::new();
    }

    let half_w = bitmap.width as f32 / 2.0;
    let half_h = bitmap.height as f32 / 2.0;
    (0..max_points)
        .map(|i| {
            let (px, py) = valid[i % valid.len()];
            Vec3::new(
                (px as f32 - half_w) * WORLD_PER_PX,
                (half_h - py as f32) * WORLD_PER_PX,
                0.0,
            )
        })
        .collect()
}

// ════════════════════════════════════════════════════════════════════════════
// CoverageBitmap
// ════════════════════════════════════════════════════════════════════════════

/// Offscreen grayscale coverage surface, one f32 alpha per pixel.
struct CoverageBitmap {
    width: usize,
    height: usize,
    coverage: Vec<f32>,
}

impl CoverageBitmap {
    /// Render `text` centered vertically on a surface sized to the measured
    /// text width and 1.5× the font size. Returns `None` when the surface
    /// would be empty (empty text, non-positive size).
    fn render(text: &str, font_size: f32) -> Option<CoverageBitmap> {
        if text.is_empty() || !(font_size > 0.0) {
            return None;
        }

        let scale = font_size / GLYPH_ROWS as f32; // pixels per cell
        // Each glyph advances 7 cells; the final glyph only needs its 5 cells
        // plus the bold-dilation column.
        let grid_cols = text.chars().count() * ADVANCE_COLS - 1;
        let width = (grid_cols as f32 * scale).ceil() as usize;
        let height = (font_size * 1.5).ceil() as usize;
        if width == 0 || height == 0 {
            return None;
        }

        let glyphs: Vec<[u8; GLYPH_ROWS]> = text.chars().map(glyph_rows).collect();
        let y_off = (height as f32 - GLYPH_ROWS as f32 * scale) / 2.0;

        // 2×2 box filter per pixel against the dilated cell grid.
        const SUB: [f32; 2] = [0.25, 0.75];
        let mut coverage = vec![0.0f32; width * height];
        for py in 0..height {
            for px in 0..width {
                let mut hit = 0u32;
                for sy in SUB {
                    for sx in SUB {
                        let cx = (px as f32 + sx) / scale;
                        let cy = (py as f32 + sy - y_off) / scale;
                        if cell_covered(&glyphs, cx, cy) {
                            hit += 1;
                        }
                    }
                }
                coverage[py * width + px] = hit as f32 / 4.0;
            }
        }

        Some(CoverageBitmap { width, height, coverage })
    }

    /// Walk the surface on a coarse grid and collect sufficiently opaque
    /// pixel coordinates in scan order.
    fn sample_opaque(&self, step: usize, threshold: f32) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        let mut py = 0;
        while py < self.height {
            let mut px = 0;
            while px < self.width {
                if self.coverage[py * self.width + px] > threshold {
                    out.push((px, py));
                }
                px += step;
            }
            py += step;
        }
        out
    }
}

/// Is the cell-space point inside a (bold-dilated) glyph stroke?
fn cell_covered(glyphs: &[[u8; GLYPH_ROWS]], cx: f32, cy: f32) -> bool {
    if cx < 0.0 || cy < 0.0 || cy >= GLYPH_ROWS as f32 {
        return false;
    }
    let col = cx as usize;
    let row = cy as usize;
    let glyph = match glyphs.get(col / ADVANCE_COLS) {
        Some(g) => g,
        None => return false,
    };
    let c = col % ADVANCE_COLS;
    let bit = |c: usize| c < GLYPH_COLS && glyph[row] & (1 << (GLYPH_COLS - 1 - c)) != 0;
    // One-cell rightward dilation gives the face its bold weight.
    bit(c) || (c > 0 && bit(c - 1))
}

// ════════════════════════════════════════════════════════════════════════════
// 5×7 face — A–Z, 0–9, a few marks
// ════════════════════════════════════════════════════════════════════════════

/// Row bitmaps for one glyph, top row first, bit 4 = leftmost cell.
pub(crate) fn glyph_rows(c: char) -> [u8; GLYPH_ROWS] {
    match c {
        'a' | 'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'b' | 'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'c' | 'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'd' | 'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'e' | 'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'f' | 'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'g' | 'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'h' | 'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'i' | 'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'j' | 'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'k' | 'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'l' | 'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'm' | 'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'n' | 'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'o' | 'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'p' | 'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'q' | 'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'r' | 'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        's' | 'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        't' | 'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'u' | 'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'v' | 'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'w' | 'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b11011, 0b10001],
        'x' | 'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'y' | 'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'z' | 'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00110, 0b01000, 0b10000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00110, 0b00110],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        ':' => [0b00000, 0b00110, 0b00110, 0b00000, 0b00110, 0b00110, 0b00000],
        '%' => [0b11001, 0b11010, 0b00010, 0b00100, 0b01000, 0b01011, 0b10011],
        ' ' => [0; GLYPH_ROWS],
        _ => [0b00000, 0b00000, 0b00100, 0b01010, 0b00100, 0b00000, 0b00000], // fallback dot
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
