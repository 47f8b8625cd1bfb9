use image::Rgb;
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::annotation::domain::label::format_label;
use crate::shared::class_names::ClassNameTable;
use crate::shared::constants::{BOX_THICKNESS, TEXT_SCALE};
use crate::shared::detection::{BoundingBox, Detection};
use crate::shared::frame::{Frame, RgbCanvas};

use super::bitmap_text::{draw_text, text_size};
use super::palette::ColorPalette;

const LABEL_TEXT_COLOR: [u8; 3] = [0, 0, 0];
const LABEL_PADDING: u32 = 10;

/// Draws an outlined box per detection with a filled caption tab above it.
///
/// Box color comes from the palette by class id; the caption tab moves
/// inside the box when there is no room above it.
pub struct BoxAnnotator {
    palette: ColorPalette,
    thickness: u32,
    text_scale: f32,
    text_padding: u32,
}

impl BoxAnnotator {
    pub fn new(palette: ColorPalette, thickness: u32, text_scale: f32) -> Self {
        Self {
            palette,
            thickness: thickness.max(1),
            text_scale,
            text_padding: LABEL_PADDING,
        }
    }

    fn draw_box(&self, canvas: &mut RgbCanvas<'_>, bbox: &BoundingBox, color: [u8; 3]) {
        let x = bbox.x_min.round() as i32;
        let y = bbox.y_min.round() as i32;
        let w = bbox.width().round() as i32;
        let h = bbox.height().round() as i32;

        // Each pass is one pixel further inside the box.
        for t in 0..self.thickness as i32 {
            let inner_w = w - 2 * t;
            let inner_h = h - 2 * t;
            if inner_w <= 0 || inner_h <= 0 {
                break;
            }
            let rect = Rect::at(x + t, y + t).of_size(inner_w as u32, inner_h as u32);
            draw_hollow_rect_mut(canvas, rect, Rgb(color));
        }
    }

    fn draw_caption(
        &self,
        canvas: &mut RgbCanvas<'_>,
        bbox: &BoundingBox,
        text: &str,
        color: [u8; 3],
    ) {
        let (text_w, text_h) = text_size(text, self.text_scale);
        let tab_w = text_w + 2 * self.text_padding;
        let tab_h = text_h + 2 * self.text_padding;

        let x = bbox.x_min.round() as i32;
        let box_top = bbox.y_min.round() as i32;
        let tab_top = if box_top - tab_h as i32 >= 0 {
            box_top - tab_h as i32
        } else {
            box_top
        };

        draw_filled_rect_mut(canvas, Rect::at(x, tab_top).of_size(tab_w, tab_h), Rgb(color));
        draw_text(
            canvas,
            text,
            x + self.text_padding as i32,
            tab_top + self.text_padding as i32,
            self.text_scale,
            LABEL_TEXT_COLOR,
        );
    }
}

impl Default for BoxAnnotator {
    fn default() -> Self {
        Self::new(ColorPalette::default(), BOX_THICKNESS, TEXT_SCALE)
    }
}

impl FrameAnnotator for BoxAnnotator {
    fn annotate(
        &self,
        frame: &mut Frame,
        detections: &[Detection],
        class_names: &ClassNameTable,
    ) -> Vec<String> {
        let (fw, fh) = (frame.width(), frame.height());
        let mut canvas = frame.as_canvas();
        let mut labels = Vec::with_capacity(detections.len());

        for det in detections {
            let label = format_label(&class_names.name_or_id(det.class_id), det.confidence);
            let bbox = det.bbox.clamped(fw, fh);
            let color = self.palette.by_class(det.class_id);

            if bbox.area() > 0.0 {
                self.draw_box(&mut canvas, &bbox, color);
                self.draw_caption(&mut canvas, &bbox, &label, color);
            } else {
                log::debug!("Skipping drawing for degenerate box {:?}", det.bbox);
            }
            labels.push(label);
        }
        labels
    }

    fn put_text(&self, frame: &mut Frame, text: &str, origin: (i32, i32), color: [u8; 3]) {
        let (_, text_h) = text_size(text, self.text_scale);
        let (x, baseline) = origin;
        draw_text(
            &mut frame.as_canvas(),
            text,
            x,
            baseline - text_h as i32,
            self.text_scale,
            color,
        );
    }
}
