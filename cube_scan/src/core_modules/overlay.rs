// THEORY:
// The overlay is an optional, write-only debug sink. After each frame the
// pipeline hands it the proposed region and the nine classifications so an
// operator can see what the scanner "thinks" it is looking at. Nothing in the
// scanner ever reads the overlay back.
//
// `OverlayRenderer` paints onto an `image::RgbaImage`: the region outline, the
// 3x3 grid lines, crosshair markers on the corners, and one filled disk per
// sample in the classified color.

use crate::core_modules::color_classifier::Classification;
use crate::core_modules::facelet_sampler::DEFAULT_SAMPLE_RADIUS;
use crate::core_modules::region_locator::Region;
use crate::error::Result;
use image::{ImageEncoder, Rgba, RgbaImage};
use std::path::Path;

const OUTLINE: Rgba<u8> = Rgba([0, 255, 0, 255]);
const GRID_LINE: Rgba<u8> = Rgba([0, 160, 0, 255]);
const MARKER_SIZE: i64 = 10;

/// Receives per-frame detection results for visualization.
pub trait DebugSink: Send {
    fn draw(&mut self, region: &Region, classifications: &[Classification; 9]);
}

/// Draws detections onto an RGBA canvas the size of the frame.
#[derive(Debug, Clone)]
pub struct OverlayRenderer {
    canvas: RgbaImage,
    sample_radius: u32,
}

impl OverlayRenderer {
    /// A transparent canvas of `width` x `height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: RgbaImage::new(width, height),
            sample_radius: DEFAULT_SAMPLE_RADIUS,
        }
    }

    /// Draws over a copy of an existing frame instead of a blank canvas.
    pub fn over_frame(frame: RgbaImage) -> Self {
        Self {
            canvas: frame,
            sample_radius: DEFAULT_SAMPLE_RADIUS,
        }
    }

    pub fn with_sample_radius(mut self, radius: u32) -> Self {
        self.sample_radius = radius;
        self
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn into_canvas(self) -> RgbaImage {
        self.canvas
    }

    /// Clears the canvas to transparent.
    pub fn clear(&mut self) {
        for pixel in self.canvas.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    /// Encodes the canvas as PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let output = std::io::BufWriter::new(std::fs::File::create(path)?);
        let encoder = image::codecs::png::PngEncoder::new(output);
        encoder.write_image(
            self.canvas.as_raw(),
            self.canvas.width(),
            self.canvas.height(),
            image::ExtendedColorType::Rgba8,
        )?;
        Ok(())
    }

    fn put(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        if x >= 0 && y >= 0 && (x as u32) < self.canvas.width() && (y as u32) < self.canvas.height() {
            self.canvas.put_pixel(x as u32, y as u32, color);
        }
    }

    fn horizontal_line(&mut self, x0: i64, x1: i64, y: i64, color: Rgba<u8>) {
        for x in x0.min(x1)..=x0.max(x1) {
            self.put(x, y, color);
        }
    }

    fn vertical_line(&mut self, x: i64, y0: i64, y1: i64, color: Rgba<u8>) {
        for y in y0.min(y1)..=y0.max(y1) {
            self.put(x, y, color);
        }
    }

    fn filled_disk(&mut self, cx: i64, cy: i64, radius: i64, color: Rgba<u8>) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.put(cx + dx, cy + dy, color);
                }
            }
        }
    }

    fn draw_region(&mut self, region: &Region) {
        let x0 = region.x.round() as i64;
        let y0 = region.y.round() as i64;
        let x1 = (region.x + region.width).round() as i64;
        let y1 = (region.y + region.height).round() as i64;

        self.horizontal_line(x0, x1, y0, OUTLINE);
        self.horizontal_line(x0, x1, y1, OUTLINE);
        self.vertical_line(x0, y0, y1, OUTLINE);
        self.vertical_line(x1, y0, y1, OUTLINE);

        for i in 1..3 {
            let gx = (region.x + i as f64 * region.width / 3.0).round() as i64;
            let gy = (region.y + i as f64 * region.height / 3.0).round() as i64;
            self.vertical_line(gx, y0, y1, GRID_LINE);
            self.horizontal_line(x0, x1, gy, GRID_LINE);
        }

        for (cx, cy) in [(x0, y0), (x1, y0), (x0, y1), (x1, y1)] {
            self.horizontal_line(cx - MARKER_SIZE, cx + MARKER_SIZE, cy, OUTLINE);
            self.vertical_line(cx, cy - MARKER_SIZE, cy + MARKER_SIZE, OUTLINE);
        }
    }
}

impl DebugSink for OverlayRenderer {
    fn draw(&mut self, region: &Region, classifications: &[Classification; 9]) {
        self.draw_region(region);
        let radius = self.sample_radius as i64;
        for (index, classification) in classifications.iter().enumerate() {
            let (cx, cy) = region.cell_center(index / 3, index % 3);
            let [r, g, b] = classification.color.display_rgb();
            self.filled_disk(cx.round() as i64, cy.round() as i64, radius, Rgba([r, g, b, 255]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::color::FaceletColor;

    fn region() -> Region {
        Region {
            x: 10.0,
            y: 10.0,
            width: 90.0,
            height: 90.0,
            confidence: 0.7,
        }
    }

    fn classifications(color: FaceletColor) -> [Classification; 9] {
        [Classification { color, confidence: 0.9 }; 9]
    }

    #[test]
    fn draws_outline_and_sample_disks() {
        let mut overlay = OverlayRenderer::new(120, 120);
        overlay.draw(&region(), &classifications(FaceletColor::Blue));
        let canvas = overlay.canvas();
        assert_eq!(*canvas.get_pixel(10, 50), OUTLINE);
        // Center of cell 4 is (55, 55).
        assert_eq!(*canvas.get_pixel(55, 55), Rgba([0, 0, 255, 255]));
        // Outside the region stays transparent.
        assert_eq!(*canvas.get_pixel(115, 115), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn drawing_off_canvas_is_ignored() {
        let mut overlay = OverlayRenderer::new(20, 20);
        overlay.draw(&region(), &classifications(FaceletColor::Unknown));
        assert_eq!(overlay.canvas().width(), 20);
    }

    #[test]
    fn saves_png() {
        let mut overlay = OverlayRenderer::new(120, 120);
        overlay.draw(&region(), &classifications(FaceletColor::Red));
        let path = std::env::temp_dir().join(format!("cube_scan_overlay_{}.png", std::process::id()));
        overlay.save_png(&path).expect("Error Saving File.");
        let reloaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(reloaded.dimensions(), (120, 120));
        let _ = std::fs::remove_file(path);
    }
}
