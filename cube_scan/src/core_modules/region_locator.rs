// THEORY:
// The region locator proposes where in the frame one face's 3x3 sticker grid is.
// It is deliberately a single-capability trait: downstream stages only rely on
// "a box with a confidence was proposed", so a real geometric detector can
// replace the placeholder without touching the sampler, classifier or
// consensus layers.
//
// Two strategies ship with the crate:
// - `CenteredRegionLocator`: assumes the operator holds the face in the middle
//   of the frame and returns a centered square.
// - `FixedRegionLocator`: an operator-supplied box, e.g. from a manual
//   selection in the capture UI.

use crate::core_modules::frame::PixelBuffer;
use serde::{Deserialize, Serialize};

/// An axis-aligned candidate box in buffer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub confidence: f64,
}

impl Region {
    /// Center of grid cell (`row`, `col`) when the region is split 3x3.
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.x + (col as f64 + 0.5) * (self.width / 3.0),
            self.y + (row as f64 + 0.5) * (self.height / 3.0),
        )
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Intersects the region with a `width` x `height` frame.
    pub fn clipped_to(&self, width: u32, height: u32) -> Option<Region> {
        let x0 = self.x.max(0.0);
        let y0 = self.y.max(0.0);
        let x1 = (self.x + self.width).min(width as f64);
        let y1 = (self.y + self.height).min(height as f64);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Region {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
            confidence: self.confidence,
        })
    }
}

/// Proposes the region holding one face in a frame.
pub trait RegionLocator: Send {
    /// Returns `None` when no face region can be proposed for this frame.
    fn locate(&self, buffer: &PixelBuffer<'_>) -> Option<Region>;
}

/// Centered square spanning a fixed fraction of the frame's shorter side.
#[derive(Debug, Clone)]
pub struct CenteredRegionLocator {
    pub fraction: f64,
    pub confidence: f64,
}

impl Default for CenteredRegionLocator {
    fn default() -> Self {
        Self {
            fraction: 0.5,
            confidence: 0.7,
        }
    }
}

impl RegionLocator for CenteredRegionLocator {
    fn locate(&self, buffer: &PixelBuffer<'_>) -> Option<Region> {
        if buffer.is_degenerate() {
            return None;
        }
        let width = buffer.width() as f64;
        let height = buffer.height() as f64;
        let size = width.min(height) * self.fraction;
        Some(Region {
            x: (width - size) / 2.0,
            y: (height - size) / 2.0,
            width: size,
            height: size,
            confidence: self.confidence,
        })
    }
}

/// Always proposes the same operator-supplied region, clipped to the frame.
#[derive(Debug, Clone)]
pub struct FixedRegionLocator {
    pub region: Region,
}

impl FixedRegionLocator {
    pub fn new(region: Region) -> Self {
        Self { region }
    }
}

impl RegionLocator for FixedRegionLocator {
    fn locate(&self, buffer: &PixelBuffer<'_>) -> Option<Region> {
        if buffer.is_degenerate() {
            return None;
        }
        self.region.clipped_to(buffer.width(), buffer.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_square_on_landscape_frame() {
        let data = vec![0u8; 640 * 480 * 4];
        let buffer = PixelBuffer::new(640, 480, &data).unwrap();
        let region = CenteredRegionLocator::default().locate(&buffer).unwrap();
        assert_eq!(region.width, 240.0);
        assert_eq!(region.height, 240.0);
        assert_eq!(region.x, 200.0);
        assert_eq!(region.y, 120.0);
        assert_eq!(region.confidence, 0.7);
    }

    #[test]
    fn degenerate_frame_has_no_region() {
        let buffer = PixelBuffer::new(0, 0, &[]).unwrap();
        assert!(CenteredRegionLocator::default().locate(&buffer).is_none());
    }

    #[test]
    fn fixed_region_is_clipped() {
        let data = vec![0u8; 100 * 100 * 4];
        let buffer = PixelBuffer::new(100, 100, &data).unwrap();
        let locator = FixedRegionLocator::new(Region {
            x: 80.0,
            y: -10.0,
            width: 50.0,
            height: 50.0,
            confidence: 1.0,
        });
        let region = locator.locate(&buffer).unwrap();
        assert_eq!((region.x, region.y, region.width, region.height), (80.0, 0.0, 20.0, 40.0));

        let outside = FixedRegionLocator::new(Region {
            x: 200.0,
            y: 200.0,
            width: 10.0,
            height: 10.0,
            confidence: 1.0,
        });
        assert!(outside.locate(&buffer).is_none());
    }

    #[test]
    fn cell_centers_are_row_major() {
        let region = Region {
            x: 0.0,
            y: 0.0,
            width: 30.0,
            height: 60.0,
            confidence: 1.0,
        };
        assert_eq!(region.cell_center(0, 0), (5.0, 10.0));
        assert_eq!(region.cell_center(1, 2), (25.0, 30.0));
        assert_eq!(region.cell_center(2, 1), (15.0, 50.0));
    }
}
