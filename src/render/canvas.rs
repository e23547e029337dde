use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;

const GLYPH_SIZE: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Raster surface with bitmap-font text. Text is scaled by an integer
/// factor, so a scale of 3 gives 24px glyphs.
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn vertical_gradient(&mut self, top: Rgba<u8>, bottom: Rgba<u8>) {
        let height = self.image.height().max(2);
        for y in 0..self.image.height() {
            let t = y as f32 / (height - 1) as f32;
            let color = Rgba([
                lerp(top[0], bottom[0], t),
                lerp(top[1], bottom[1], t),
                lerp(top[2], bottom[2], t),
                255,
            ]);
            for x in 0..self.image.width() {
                self.image.put_pixel(x, y, color);
            }
        }
    }

    pub fn fill_circle(&mut self, center: (i32, i32), radius: i32, color: Rgba<u8>) {
        draw_filled_circle_mut(&mut self.image, center, radius, color);
    }

    /// Draw `text` with its baseline at `baseline`. For `Align::Center`, `x`
    /// is the horizontal midpoint.
    pub fn text(
        &mut self,
        text: &str,
        x: i32,
        baseline: i32,
        scale: u32,
        color: Rgba<u8>,
        align: Align,
    ) {
        let scale = scale.max(1);
        let step = GLYPH_SIZE * scale as i32;
        let top = baseline - (GLYPH_SIZE - 1) * scale as i32;
        let left = match align {
            Align::Left => x,
            Align::Center => x - text_width(text, scale) as i32 / 2,
        };

        for (i, ch) in text.chars().enumerate() {
            let origin_x = left + i as i32 * step;
            for (row, bits) in glyph(ch).iter().enumerate() {
                for col in 0..GLYPH_SIZE {
                    if (bits >> col) & 1 == 1 {
                        let rect = Rect::at(
                            origin_x + col * scale as i32,
                            top + row as i32 * scale as i32,
                        )
                        .of_size(scale, scale);
                        draw_filled_rect_mut(&mut self.image, rect, color);
                    }
                }
            }
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

pub fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * GLYPH_SIZE as u32 * scale.max(1)
}

fn glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn lerp(from: u8, to: u8, t: f32) -> u8 {
    (from as f32 + (to as f32 - from as f32) * t).round() as u8
}
