// THEORY:
// `FaceletColor` is the discrete vocabulary every stage after the classifier
// speaks. It carries the fixed facts about the six sticker colors: their wire
// letter, their reference RGB value for nearest-color fallback, and which color
// sits on the opposite face of a solved cube. The declaration order of
// `CANONICAL_ORDER` is also the consensus tie-break order.

use crate::core_modules::pixel::pixel::Pixel;
use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One classified sticker color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceletColor {
    White,
    Yellow,
    Red,
    Orange,
    Green,
    Blue,
    /// Background, cube body or an unclassifiable sample. Never valid on the wire.
    Unknown,
}

/// The six sticker colors in canonical order. Earlier entries win consensus ties.
pub const CANONICAL_ORDER: [FaceletColor; 6] = [
    FaceletColor::White,
    FaceletColor::Yellow,
    FaceletColor::Red,
    FaceletColor::Orange,
    FaceletColor::Green,
    FaceletColor::Blue,
];

impl FaceletColor {
    /// Wire letter. `Unknown` renders as `X`.
    pub fn letter(self) -> char {
        match self {
            FaceletColor::White => 'W',
            FaceletColor::Yellow => 'Y',
            FaceletColor::Red => 'R',
            FaceletColor::Orange => 'O',
            FaceletColor::Green => 'G',
            FaceletColor::Blue => 'B',
            FaceletColor::Unknown => 'X',
        }
    }

    /// Parses a wire letter. `X` is accepted as `Unknown` so debug strings round-trip.
    pub fn from_letter(letter: char) -> Result<Self> {
        match letter {
            'W' => Ok(FaceletColor::White),
            'Y' => Ok(FaceletColor::Yellow),
            'R' => Ok(FaceletColor::Red),
            'O' => Ok(FaceletColor::Orange),
            'G' => Ok(FaceletColor::Green),
            'B' => Ok(FaceletColor::Blue),
            'X' => Ok(FaceletColor::Unknown),
            other => Err(ScanError::InvalidColor(other)),
        }
    }

    pub fn is_known(self) -> bool {
        self != FaceletColor::Unknown
    }

    /// Position in `CANONICAL_ORDER`; `Unknown` sorts last.
    pub fn canonical_index(self) -> usize {
        CANONICAL_ORDER
            .iter()
            .position(|&c| c == self)
            .unwrap_or(CANONICAL_ORDER.len())
    }

    /// The color on the opposite face of a solved cube.
    pub fn opposite(self) -> Option<FaceletColor> {
        match self {
            FaceletColor::White => Some(FaceletColor::Yellow),
            FaceletColor::Yellow => Some(FaceletColor::White),
            FaceletColor::Red => Some(FaceletColor::Orange),
            FaceletColor::Orange => Some(FaceletColor::Red),
            FaceletColor::Green => Some(FaceletColor::Blue),
            FaceletColor::Blue => Some(FaceletColor::Green),
            FaceletColor::Unknown => None,
        }
    }

    pub fn is_opposite_of(self, other: FaceletColor) -> bool {
        self.opposite() == Some(other)
    }

    /// Reference sRGB value used by the nearest-color fallback.
    pub fn reference_pixel(self) -> Option<Pixel> {
        let (r, g, b) = match self {
            FaceletColor::White => (255, 255, 255),
            FaceletColor::Yellow => (255, 255, 0),
            FaceletColor::Red => (255, 0, 0),
            FaceletColor::Orange => (255, 140, 0),
            FaceletColor::Green => (0, 255, 0),
            FaceletColor::Blue => (0, 0, 255),
            FaceletColor::Unknown => return None,
        };
        Some(Pixel::rgb(r, g, b))
    }

    /// Display color for overlays. `Unknown` is drawn dark grey.
    pub fn display_rgb(self) -> [u8; 3] {
        match self.reference_pixel() {
            Some(pixel) => [pixel.red, pixel.green, pixel.blue],
            None => [0x33, 0x33, 0x33],
        }
    }
}

impl fmt::Display for FaceletColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_round_trip() {
        for color in CANONICAL_ORDER.iter().chain([FaceletColor::Unknown].iter()) {
            assert_eq!(FaceletColor::from_letter(color.letter()).unwrap(), *color);
        }
        assert!(matches!(
            FaceletColor::from_letter('Q'),
            Err(ScanError::InvalidColor('Q'))
        ));
    }

    #[test]
    fn opposites_are_symmetric() {
        for color in CANONICAL_ORDER {
            let opposite = color.opposite().unwrap();
            assert_eq!(opposite.opposite(), Some(color));
            assert!(color.is_opposite_of(opposite));
        }
        assert!(!FaceletColor::Unknown.is_opposite_of(FaceletColor::White));
    }

    #[test]
    fn unknown_sorts_after_every_known_color() {
        assert_eq!(FaceletColor::White.canonical_index(), 0);
        assert_eq!(FaceletColor::Blue.canonical_index(), 5);
        assert_eq!(FaceletColor::Unknown.canonical_index(), 6);
    }
}
