use image::{ImageBuffer, Rgb};
use ndarray::ArrayView3;

/// Number of interleaved channels in every frame (RGB).
pub const CHANNELS: u8 = 3;

/// A borrowed, drawable view over a frame's pixel buffer.
pub type RgbCanvas<'a> = ImageBuffer<Rgb<u8>, &'a mut [u8]>;

/// A single captured frame: contiguous RGB bytes in row-major order.
///
/// Capture devices hand out BGR; conversion happens at the capture and
/// display boundaries only, so everything in between sees RGB.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: u64,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: u64) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (CHANNELS as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            index,
        }
    }

    /// A frame filled with a single color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3], index: u64) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * CHANNELS as usize)
            .collect();
        Self::new(data, width, height, index)
    }

    /// Build a frame from packed BGR bytes, swapping to RGB.
    pub fn from_bgr(mut bgr: Vec<u8>, width: u32, height: u32, index: u64) -> Self {
        swap_red_blue(&mut bgr);
        Self::new(bgr, width, height, index)
    }

    /// Write this frame's pixels as packed BGR into `out`.
    ///
    /// `out` must hold exactly `width * height * 3` bytes.
    pub fn write_bgr(&self, out: &mut [u8]) {
        out.copy_from_slice(&self.data);
        swap_red_blue(out);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sequence number assigned by the capture source.
    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let offset = (y as usize * self.width as usize + x as usize) * CHANNELS as usize;
        [
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ]
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Borrow the frame as an `image` buffer for in-place drawing.
    pub fn as_canvas(&mut self) -> RgbCanvas<'_> {
        let (width, height) = (self.width, self.height);
        ImageBuffer::from_raw(width, height, self.data.as_mut_slice())
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            CHANNELS as usize,
        )
    }
}

fn swap_red_blue(packed: &mut [u8]) {
    for px in packed.chunks_exact_mut(CHANNELS as usize) {
        px.swap(0, 2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data, 2, 2, 5);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame, Frame::filled(2, 2, [0, 0, 0], 5));
    }

    #[test]
    fn test_filled_repeats_color() {
        let frame = Frame::filled(3, 2, [1, 2, 3], 0);
        assert_eq!(frame.as_ndarray().shape(), &[2, 3, 3]);
        assert_eq!(frame.pixel(2, 1), [1, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * channels")]
    fn test_mismatched_data_length_panics_in_debug() {
        Frame::new(vec![0u8; 10], 2, 2, 0);
    }

    #[test]
    fn test_from_bgr_swaps_to_rgb() {
        // One blue pixel in BGR order
        let frame = Frame::from_bgr(vec![255, 0, 0], 1, 1, 0);
        assert_eq!(frame.pixel(0, 0), [0, 0, 255]);
    }

    #[test]
    fn test_write_bgr_restores_device_order() {
        let bgr = vec![10, 20, 30, 40, 50, 60];
        let frame = Frame::from_bgr(bgr.clone(), 2, 1, 0);
        let mut out = vec![0u8; 6];
        frame.write_bgr(&mut out);
        assert_eq!(out, bgr);
    }

    #[test]
    fn test_as_ndarray_pixel_access() {
        let mut data = vec![0u8; 12];
        data[6] = 255; // row=1, col=0, R
        let frame = Frame::new(data, 2, 2, 0);
        let arr = frame.as_ndarray();
        assert_eq!(arr.shape(), &[2, 2, 3]);
        assert_eq!(arr[[1, 0, 0]], 255);
        assert_eq!(arr[[1, 0, 1]], 0);
    }

    #[test]
    fn test_canvas_writes_through_to_frame() {
        let mut frame = Frame::filled(4, 4, [0, 0, 0], 0);
        frame.as_canvas().put_pixel(1, 2, Rgb([9, 8, 7]));
        assert_eq!(frame.pixel(1, 2), [9, 8, 7]);
        assert_eq!(frame.as_ndarray()[[2, 1, 0]], 9);
    }
}
