//! Text rendering with the 8x8 public-domain bitmap font, scaled by whole
//! pixels.

use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::Rgb;
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::shared::frame::RgbCanvas;

const GLYPH_SIZE: u32 = 8;

/// Side of one font pixel on screen for a text scale.
fn pixel_size(scale: f32) -> u32 {
    ((scale * 2.0).round() as u32).max(1)
}

/// Width and height in pixels `text` occupies at `scale`.
pub(crate) fn text_size(text: &str, scale: f32) -> (u32, u32) {
    let cell = GLYPH_SIZE * pixel_size(scale);
    (text.chars().count() as u32 * cell, cell)
}

/// Draw `text` with its top-left corner at (`x`, `y`). Clipped to the canvas.
pub(crate) fn draw_text(
    canvas: &mut RgbCanvas<'_>,
    text: &str,
    x: i32,
    y: i32,
    scale: f32,
    color: [u8; 3],
) {
    let px = pixel_size(scale);
    let cell = (GLYPH_SIZE * px) as i32;

    for (i, ch) in text.chars().enumerate() {
        let Some(glyph) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) else {
            continue;
        };
        let gx = x + i as i32 * cell;
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                if bits & (1 << col) == 0 {
                    continue;
                }
                let rect = Rect::at(gx + (col * px) as i32, y + (row as u32 * px) as i32)
                    .of_size(px, px);
                draw_filled_rect_mut(canvas, rect, Rgb(color));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::frame::Frame;

    #[test]
    fn test_text_size_scales_with_length() {
        assert_eq!(text_size("FPS: 30", 1.5), (7 * 24, 24));
        assert_eq!(text_size("", 1.5), (0, 24));
        assert_eq!(text_size("a", 0.1), (8, 8));
    }

    #[test]
    fn test_draw_text_stays_inside_text_box() {
        let mut frame = Frame::filled(100, 40, [0, 0, 0], 0);
        draw_text(&mut frame.as_canvas(), "Hi", 10, 5, 0.5, [255, 255, 255]);

        let (w, h) = text_size("Hi", 0.5);
        let mut lit = 0;
        for y in 0..40 {
            for x in 0..100 {
                if frame.pixel(x, y) != [0, 0, 0] {
                    lit += 1;
                    assert!((10..10 + w).contains(&x) && (5..5 + h).contains(&y));
                }
            }
        }
        assert!(lit > 0);
    }

    #[test]
    fn test_space_draws_nothing() {
        let mut frame = Frame::filled(20, 20, [0, 0, 0], 0);
        let before = frame.clone();
        draw_text(&mut frame.as_canvas(), " ", 0, 0, 1.0, [255, 0, 0]);
        assert_eq!(frame, before);
    }

    #[test]
    fn test_text_off_canvas_is_clipped() {
        let mut frame = Frame::filled(10, 10, [0, 0, 0], 0);
        draw_text(&mut frame.as_canvas(), "WWW", -30, -30, 1.5, [255, 0, 0]);
        draw_text(&mut frame.as_canvas(), "WWW", 5, 5, 1.5, [255, 0, 0]);
        assert_ne!(frame.pixel(9, 9), [0, 0, 0]);
    }
}
