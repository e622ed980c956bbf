// THEORY:
// The `FaceletSampler` reduces a proposed region to nine representative colors,
// one per sticker. It is the scanner's spatial-pooling step: instead of trusting
// the single pixel at each cell center, it averages a small square window around
// it, which cancels sensor noise and thin specular highlights.
//
// Key architectural principles:
// 1.  **Fixed geometry**: the region is split into a 3x3 grid and cells are read
//     row-major, so index 4 is always the center sticker.
// 2.  **Clipped windows**: windows that hang off the frame edge are clipped to
//     the frame. A window with no pixels left yields black, which the
//     classifier treats as `Unknown`.
// 3.  **Stateless**: the sampler holds only its radius and never remembers a
//     frame.

use crate::core_modules::frame::PixelBuffer;
use crate::core_modules::pixel::pixel::Pixel;
use crate::core_modules::region_locator::Region;

/// Default sampling radius around each cell center, in pixels.
pub const DEFAULT_SAMPLE_RADIUS: u32 = 8;

/// Averages a square window around each of the nine cell centers.
#[derive(Debug, Clone)]
pub struct FaceletSampler {
    radius: u32,
}

impl Default for FaceletSampler {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RADIUS)
    }
}

impl FaceletSampler {
    pub fn new(radius: u32) -> Self {
        Self { radius }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Samples the nine cells of `region`, row-major.
    pub fn sample(&self, buffer: &PixelBuffer<'_>, region: &Region) -> [Pixel; 9] {
        std::array::from_fn(|index| {
            let (center_x, center_y) = region.cell_center(index / 3, index % 3);
            self.average_window(buffer, center_x, center_y)
        })
    }

    /// Mean color of the clipped window `floor(c - r)..=floor(c + r)` on each axis.
    pub fn average_window(&self, buffer: &PixelBuffer<'_>, center_x: f64, center_y: f64) -> Pixel {
        if buffer.is_degenerate() {
            return Pixel::default();
        }

        let radius = self.radius as f64;
        let max_x = buffer.width() as f64 - 1.0;
        let max_y = buffer.height() as f64 - 1.0;
        let x0 = (center_x - radius).floor().max(0.0);
        let x1 = (center_x + radius).floor().min(max_x);
        let y0 = (center_y - radius).floor().max(0.0);
        let y1 = (center_y + radius).floor().min(max_y);

        if x1 < x0 || y1 < y0 {
            return Pixel::default();
        }

        let mut sum_r = 0u64;
        let mut sum_g = 0u64;
        let mut sum_b = 0u64;
        let mut count = 0u64;

        for y in (y0 as u32)..=(y1 as u32) {
            for x in (x0 as u32)..=(x1 as u32) {
                if let Some(pixel) = buffer.pixel(x, y) {
                    sum_r += pixel.red as u64;
                    sum_g += pixel.green as u64;
                    sum_b += pixel.blue as u64;
                    count += 1;
                }
            }
        }

        if count == 0 {
            return Pixel::default();
        }

        Pixel::rgb(
            rounded_mean(sum_r, count),
            rounded_mean(sum_g, count),
            rounded_mean(sum_b, count),
        )
    }
}

// Round half up, matching `Math.round` on non-negative means.
fn rounded_mean(sum: u64, count: u64) -> u8 {
    ((sum * 2 + count) / (count * 2)).min(255) as u8
}
