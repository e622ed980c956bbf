// THEORY:
// The color classifier turns one averaged sample into a discrete sticker color
// plus a confidence. It is a stateless utility with a two-tier design:
//
// 1.  **Hue tier**: hue is stable under lighting changes, so bright-neutral
//     (white), dark (body/background) and saturated samples are bucketed by
//     HSL thresholds first.
// 2.  **Distance tier**: hue is meaningless near the achromatic axis and in the
//     gaps between buckets, so anything the hue tier cannot place is matched to
//     the nearest reference color by Euclidean RGB distance.
//
// The thresholds below are policy constants. They are evaluated in a fixed
// precedence order and that order is part of the behavior.

use crate::core_modules::color::{CANONICAL_ORDER, FaceletColor};
use crate::core_modules::pixel::pixel::Pixel;
use serde::{Deserialize, Serialize};

const WHITE_MIN_LIGHTNESS: f64 = 70.0;
const WHITE_MAX_SATURATION: f64 = 25.0;
const DARK_MAX_LIGHTNESS: f64 = 20.0;
const CHROMATIC_MIN_SATURATION: f64 = 30.0;

/// Largest possible distance between two RGB triples, rounded.
const MAX_RGB_DISTANCE: f64 = 441.0;
const MIN_FALLBACK_CONFIDENCE: f64 = 0.3;

/// Half-open hue buckets `[start, end)` in degrees, checked in order.
const HUE_BUCKETS: [(f64, f64, FaceletColor, f64); 6] = [
    (45.0, 75.0, FaceletColor::Yellow, 0.85),
    (15.0, 45.0, FaceletColor::Orange, 0.8),
    (0.0, 15.0, FaceletColor::Red, 0.85),
    (345.0, 360.0, FaceletColor::Red, 0.85),
    (75.0, 165.0, FaceletColor::Green, 0.85),
    (180.0, 260.0, FaceletColor::Blue, 0.85),
];

/// Hue in degrees, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl From<&Pixel> for Hsl {
    fn from(pixel: &Pixel) -> Self {
        Hsl {
            hue: pixel.hue(),
            saturation: pixel.saturation_percent(),
            lightness: pixel.lightness_percent(),
        }
    }
}

/// A classified facelet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub color: FaceletColor,
    pub confidence: f64,
}

impl Classification {
    fn new(color: FaceletColor, confidence: f64) -> Self {
        Self { color, confidence }
    }
}

/// Classifies one RGB sample.
pub fn classify(red: u8, green: u8, blue: u8) -> Classification {
    classify_pixel(&Pixel::rgb(red, green, blue))
}

pub fn classify_pixel(pixel: &Pixel) -> Classification {
    let hsl = Hsl::from(pixel);
    classify_hsl(&hsl).unwrap_or_else(|| nearest_reference(pixel))
}

/// The hue tier on its own. `None` means the sample falls through to the
/// distance tier.
pub fn classify_hsl(hsl: &Hsl) -> Option<Classification> {
    if hsl.lightness > WHITE_MIN_LIGHTNESS && hsl.saturation < WHITE_MAX_SATURATION {
        return Some(Classification::new(FaceletColor::White, 0.9));
    }

    if hsl.lightness < DARK_MAX_LIGHTNESS {
        return Some(Classification::new(FaceletColor::Unknown, 0.5));
    }

    if hsl.saturation > CHROMATIC_MIN_SATURATION {
        return HUE_BUCKETS
            .iter()
            .find(|(start, end, _, _)| hsl.hue >= *start && hsl.hue < *end)
            .map(|&(_, _, color, confidence)| Classification::new(color, confidence));
    }

    None
}

/// Nearest reference color by RGB distance. Ties keep the earlier canonical color.
fn nearest_reference(pixel: &Pixel) -> Classification {
    let mut best = FaceletColor::Unknown;
    let mut best_distance = f64::INFINITY;

    for color in CANONICAL_ORDER {
        let Some(reference) = color.reference_pixel() else {
            continue;
        };
        let distance = pixel.distance(&reference);
        if distance < best_distance {
            best_distance = distance;
            best = color;
        }
    }

    let confidence = (1.0 - best_distance / MAX_RGB_DISTANCE).max(MIN_FALLBACK_CONFIDENCE);
    Classification::new(best, confidence)
}

/// Classifies all nine samples of a face, row-major.
pub fn classify_face(samples: &[Pixel; 9]) -> [Classification; 9] {
    let classified = samples.map(|sample| classify_pixel(&sample));
    for (index, classification) in classified.iter().enumerate() {
        tracing::trace!(
            index,
            color = %classification.color,
            confidence = classification.confidence,
            "classified facelet"
        );
    }
    classified
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hsl(hue: f64, saturation: f64, lightness: f64) -> Hsl {
        Hsl { hue, saturation, lightness }
    }

    #[test]
    fn pure_white_is_white() {
        let c = classify(255, 255, 255);
        assert_eq!(c.color, FaceletColor::White);
        assert_eq!(c.confidence, 0.9);
    }

    #[test]
    fn black_is_unknown() {
        let c = classify(0, 0, 0);
        assert_eq!(c.color, FaceletColor::Unknown);
        assert_eq!(c.confidence, 0.5);
    }

    #[test]
    fn hue_bucket_lower_bounds_are_inclusive() {
        assert_eq!(
            classify_hsl(&hsl(45.0, 100.0, 50.0)).unwrap().color,
            FaceletColor::Yellow
        );
        assert_eq!(
            classify_hsl(&hsl(15.0, 100.0, 50.0)).unwrap().color,
            FaceletColor::Orange
        );
        assert_eq!(
            classify_hsl(&hsl(345.0, 100.0, 50.0)).unwrap().color,
            FaceletColor::Red
        );
        assert_eq!(
            classify_hsl(&hsl(75.0, 100.0, 50.0)).unwrap().color,
            FaceletColor::Green
        );
        assert_eq!(
            classify_hsl(&hsl(180.0, 100.0, 50.0)).unwrap().color,
            FaceletColor::Blue
        );
    }

    #[test]
    fn boundary_samples_classify_by_inclusive_lower_bound() {
        // Each sample sits exactly on a bucket boundary at full saturation.
        let cases = [
            ((128, 96, 0), FaceletColor::Yellow),
            ((112, 28, 0), FaceletColor::Orange),
            ((120, 0, 30), FaceletColor::Red),
            ((90, 120, 0), FaceletColor::Green),
            ((0, 120, 120), FaceletColor::Blue),
        ];
        for ((r, g, b), expected) in cases {
            assert_eq!(classify(r, g, b).color, expected, "rgb({r}, {g}, {b})");
        }
    }

    #[test]
    fn blue_upper_bound_is_exclusive() {
        // Hue exactly 260 leaves the blue bucket and falls through.
        let sample = Pixel::rgb(80, 0, 240);
        assert_eq!(sample.hue(), 260.0);
        assert!(classify_hsl(&Hsl::from(&sample)).is_none());
    }

    #[test]
    fn lightness_threshold_is_strict_on_rgb_input() {
        // Exactly 70% lightness with 100% saturation: not white, hue 0 is red.
        assert_eq!(classify(255, 102, 102).color, FaceletColor::Red);
    }

    #[test]
    fn hue_gaps_fall_through() {
        assert!(classify_hsl(&hsl(170.0, 100.0, 50.0)).is_none());
        assert!(classify_hsl(&hsl(300.0, 100.0, 50.0)).is_none());
    }

    #[test]
    fn white_wins_over_dark_and_hue() {
        // Bright and unsaturated: white even though the hue would say orange.
        let c = classify_hsl(&hsl(30.0, 10.0, 80.0)).unwrap();
        assert_eq!(c.color, FaceletColor::White);
    }

    #[test]
    fn saturated_primaries() {
        assert_eq!(classify(255, 0, 0).color, FaceletColor::Red);
        assert_eq!(classify(0, 200, 0).color, FaceletColor::Green);
        assert_eq!(classify(0, 0, 230).color, FaceletColor::Blue);
        assert_eq!(classify(255, 255, 0).color, FaceletColor::Yellow);
        let orange = classify(255, 140, 0);
        assert_eq!(orange.color, FaceletColor::Orange);
        assert_eq!(orange.confidence, 0.8);
    }

    #[test]
    fn purple_falls_back_to_nearest_reference() {
        // Hue 300 sits in a gap; red and blue are equidistant, red is earlier.
        let c = classify(128, 0, 128);
        assert_eq!(c.color, FaceletColor::Red);
        let distance = ((127.0f64 * 127.0) + (128.0 * 128.0)).sqrt();
        assert!((c.confidence - (1.0 - distance / 441.0)).abs() < 1e-9);
    }

    #[test]
    fn fallback_confidence_has_a_floor() {
        // Mid grey: low saturation, mid lightness, far from every reference.
        let c = classify(128, 128, 128);
        assert!(c.confidence >= 0.3);
        assert!(c.color.is_known());
    }
}
