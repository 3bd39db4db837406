//! Bitmap glyph text for the HUD overlay.
//!
//! Renders text straight into a [`Canvas`] using 5x7 pixel glyphs. There is
//! no font loading, kerning or anti-aliasing; the glyph set covers digits,
//! the punctuation used by numeric readouts, and the letters of the HUD
//! labels. Characters without a glyph advance the cursor and draw nothing.
//!
//! Because the painter composes frames in world Y-up orientation and flips
//! once at the end, [`TextRenderer::draw_flipped`] writes glyph rows
//! bottom-up so the text reads correctly after that flip.

use std::collections::HashMap;

use image::Rgb;

use super::canvas::Canvas;
use crate::scene::BoosterState;

/// Glyph cell width (5 columns) plus one column of spacing.
const ADVANCE: u32 = 6;

/// Glyph height in rows.
const GLYPH_ROWS: u32 = 7;

/// Extra rows between HUD lines.
const LINE_GAP: u32 = 2;

/// Rows are listed top to bottom; bit 4 is the leftmost column.
const GLYPH_TABLE: &[(char, [u8; 7])] = &[
    ('0', [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110]),
    ('1', [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('2', [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111]),
    ('3', [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110]),
    ('4', [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010]),
    ('5', [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110]),
    ('6', [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110]),
    ('7', [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000]),
    ('8', [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110]),
    ('9', [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100]),
    ('A', [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    ('V', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
    ('a', [0b00000, 0b00000, 0b01110, 0b00001, 0b01111, 0b10001, 0b01111]),
    ('d', [0b00001, 0b00001, 0b01101, 0b10011, 0b10001, 0b10001, 0b01111]),
    ('e', [0b00000, 0b00000, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110]),
    ('g', [0b00000, 0b01111, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110]),
    ('l', [0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('m', [0b00000, 0b00000, 0b11010, 0b10101, 0b10101, 0b10001, 0b10001]),
    ('n', [0b00000, 0b00000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001]),
    ('r', [0b00000, 0b00000, 0b10110, 0b11001, 0b10000, 0b10000, 0b10000]),
    ('s', [0b00000, 0b00000, 0b01110, 0b10000, 0b01110, 0b00001, 0b11110]),
    ('w', [0b00000, 0b00000, 0b10001, 0b10001, 0b10101, 0b10101, 0b01010]),
    ('x', [0b00000, 0b00000, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001]),
    ('y', [0b00000, 0b00000, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110]),
    (' ', [0b00000; 7]),
    ('.', [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100]),
    (',', [0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b00100, 0b01000]),
    (':', [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000]),
    ('-', [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000]),
    ('/', [0b00001, 0b00010, 0b00010, 0b00100, 0b01000, 0b01000, 0b10000]),
    ('(', [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010]),
    (')', [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000]),
];

/// The four HUD readout lines for a booster state, top line first.
pub fn hud_lines(state: &BoosterState) -> [String; 4] {
    [
        format!("V: {:.2}, {:.2} m/s", state.vx, state.vy),
        format!("(x,y): {:.2}, {:.2} m", state.x, state.y),
        format!("w: {:.2} rad/s", state.w),
        format!("Angle: {:.2} rad", state.angle),
    ]
}

/// Draws strings with the built-in 5x7 glyph set.
pub struct TextRenderer {
    glyphs: HashMap<char, [u8; 7]>,
}

impl TextRenderer {
    /// Build the glyph lookup table.
    pub fn new() -> Self {
        Self {
            glyphs: GLYPH_TABLE.iter().copied().collect(),
        }
    }

    /// Return the glyph rows for a character, if present.
    pub fn glyph(&self, ch: char) -> Option<&[u8; 7]> {
        self.glyphs.get(&ch)
    }

    /// Width of a rendered string in pixels. The last character has no
    /// trailing gap.
    pub fn text_width(&self, text: &str, scale: u32) -> u32 {
        match text.chars().count() as u32 {
            0 => 0,
            len => (len * ADVANCE - 1) * scale,
        }
    }

    /// Height of one rendered line in pixels.
    pub fn text_height(&self, scale: u32) -> u32 {
        GLYPH_ROWS * scale
    }

    /// Vertical distance between consecutive HUD lines in pixels.
    pub fn line_height(&self, scale: u32) -> u32 {
        (GLYPH_ROWS + LINE_GAP) * scale
    }

    /// Write `text` upside-down into an unflipped canvas.
    ///
    /// `(x, y)` is the lowest-row, leftmost pixel of the text block in
    /// unflipped coordinates, which becomes its bottom-left once the canvas
    /// is flipped. Each glyph pixel is a `scale` x `scale` square.
    pub fn draw_flipped(
        &self,
        canvas: &mut Canvas,
        text: &str,
        x: i32,
        y: i32,
        scale: u32,
        color: Rgb<u8>,
    ) {
        let s = scale as i32;
        for (index, ch) in text.chars().enumerate() {
            let Some(rows) = self.glyphs.get(&ch) else {
                continue;
            };
            let cell_x = x + index as i32 * ADVANCE as i32 * s;
            for (row, bits) in rows.iter().enumerate() {
                // Reading row 0 must land on the highest unflipped row.
                let cell_y = y + (GLYPH_ROWS as i32 - 1 - row as i32) * s;
                for col in 0..5 {
                    if (bits >> (4 - col)) & 1 == 0 {
                        continue;
                    }
                    let px = cell_x + col * s;
                    for dy in 0..s {
                        canvas.hline(px, px + s - 1, cell_y + dy, color);
                    }
                }
            }
        }
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}
