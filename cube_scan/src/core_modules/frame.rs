// THEORY:
// `PixelBuffer` is the boundary between the external frame source and the
// scanner. It borrows a flat, row-major RGBA byte slice owned by the caller and
// adds nothing but bounds-checked pixel access. The scanner never copies or
// retains a frame; every stage reads through this view and is done with it by
// the time `process_frame` returns.

use crate::core_modules::pixel::pixel::Pixel;
use crate::error::{Result, ScanError};

/// Bytes per pixel in every buffer the scanner accepts.
pub const RGBA_CHANNELS: usize = 4;

/// A read-only view of one RGBA frame.
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    width: u32,
    height: u32,
    data: &'a [u8],
}

impl<'a> PixelBuffer<'a> {
    /// Wraps `data` as a `width` x `height` RGBA frame.
    ///
    /// Fails fast if the slice length does not match the dimensions.
    pub fn new(width: u32, height: u32, data: &'a [u8]) -> Result<Self> {
        let expected = width as usize * height as usize * RGBA_CHANNELS;
        if data.len() != expected {
            return Err(ScanError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// True when the frame has no pixels at all.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns the pixel at (x, y), or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let byte_index = (y as usize * self.width as usize + x as usize) * RGBA_CHANNELS;
        self.data
            .get(byte_index..byte_index + RGBA_CHANNELS)
            .map(Pixel::from)
    }
}

impl<'a> TryFrom<&'a image::RgbaImage> for PixelBuffer<'a> {
    type Error = ScanError;

    fn try_from(image: &'a image::RgbaImage) -> Result<Self> {
        PixelBuffer::new(image.width(), image.height(), image.as_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_length() {
        let data = vec![0u8; 10];
        match PixelBuffer::new(2, 2, &data) {
            Err(ScanError::BufferSizeMismatch { expected, actual }) => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 10);
            }
            other => panic!("expected size mismatch, got {other:?}"),
        }
    }

    #[test]
    fn reads_row_major_pixels() {
        let mut data = vec![0u8; 2 * 2 * 4];
        // (1, 1) is the last pixel.
        data[12..16].copy_from_slice(&[9, 8, 7, 255]);
        let buffer = PixelBuffer::new(2, 2, &data).unwrap();
        assert_eq!(buffer.pixel(1, 1).unwrap().channels(), (9, 8, 7));
        assert!(buffer.pixel(2, 0).is_none());
    }

    #[test]
    fn zero_area_is_degenerate() {
        let buffer = PixelBuffer::new(0, 5, &[]).unwrap();
        assert!(buffer.is_degenerate());
    }

    #[test]
    fn wraps_image_crate_buffers() {
        let image = image::RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 255]));
        let buffer = PixelBuffer::try_from(&image).unwrap();
        assert_eq!(buffer.width(), 3);
        assert_eq!(buffer.pixel(2, 1).unwrap().channels(), (1, 2, 3));
    }
}
