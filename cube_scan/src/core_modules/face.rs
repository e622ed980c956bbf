// THEORY:
// A face is self-describing: on a 3x3x3 cube the center sticker never moves, so
// its color names the face. The face identifier exploits that to let the
// operator present faces in any order without ever telling the scanner which
// one is showing. The center-to-label table is a fixed policy (white up, green
// front), not something learned from the scan.

use crate::core_modules::color::FaceletColor;
use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of facelets on one face.
pub const FACELETS_PER_FACE: usize = 9;
/// Row-major index of the center facelet.
pub const CENTER_INDEX: usize = 4;

/// One of the six canonical face positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FaceLabel {
    Up,
    Down,
    Front,
    Back,
    Right,
    Left,
}

/// Serialization order of the 54-character state: U R F D L B.
pub const SERIALIZATION_ORDER: [FaceLabel; 6] = [
    FaceLabel::Up,
    FaceLabel::Right,
    FaceLabel::Front,
    FaceLabel::Down,
    FaceLabel::Left,
    FaceLabel::Back,
];

const CENTER_TABLE: [(FaceletColor, FaceLabel); 6] = [
    (FaceletColor::White, FaceLabel::Up),
    (FaceletColor::Yellow, FaceLabel::Down),
    (FaceletColor::Green, FaceLabel::Front),
    (FaceletColor::Blue, FaceLabel::Back),
    (FaceletColor::Red, FaceLabel::Right),
    (FaceletColor::Orange, FaceLabel::Left),
];

impl FaceLabel {
    pub fn letter(self) -> char {
        match self {
            FaceLabel::Up => 'U',
            FaceLabel::Down => 'D',
            FaceLabel::Front => 'F',
            FaceLabel::Back => 'B',
            FaceLabel::Right => 'R',
            FaceLabel::Left => 'L',
        }
    }

    pub fn from_letter(letter: char) -> Result<Self> {
        match letter {
            'U' => Ok(FaceLabel::Up),
            'D' => Ok(FaceLabel::Down),
            'F' => Ok(FaceLabel::Front),
            'B' => Ok(FaceLabel::Back),
            'R' => Ok(FaceLabel::Right),
            'L' => Ok(FaceLabel::Left),
            other => Err(ScanError::InvalidFaceLetter(other)),
        }
    }

    /// The color this face's center must show.
    pub fn expected_center(self) -> FaceletColor {
        CENTER_TABLE
            .iter()
            .find(|(_, label)| *label == self)
            .map(|(color, _)| *color)
            .unwrap_or(FaceletColor::Unknown)
    }

    /// Position of this face in `SERIALIZATION_ORDER`.
    pub fn serialization_index(self) -> usize {
        SERIALIZATION_ORDER
            .iter()
            .position(|&label| label == self)
            .unwrap_or(0)
    }

    /// Offset of this face's first facelet in the 54-character state.
    pub fn state_offset(self) -> usize {
        self.serialization_index() * FACELETS_PER_FACE
    }

    /// The face whose fixed center is `color`.
    pub fn for_center(color: FaceletColor) -> Option<FaceLabel> {
        CENTER_TABLE
            .iter()
            .find(|(center, _)| *center == color)
            .map(|(_, label)| *label)
    }
}

impl fmt::Display for FaceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Nine classified facelets, row-major, plus one confidence for the whole face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceObservation {
    colors: [FaceletColor; FACELETS_PER_FACE],
    confidence: f64,
}

impl FaceObservation {
    pub fn new(colors: [FaceletColor; FACELETS_PER_FACE], confidence: f64) -> Result<Self> {
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(ScanError::ConfidenceOutOfRange(confidence));
        }
        Ok(Self { colors, confidence })
    }

    /// Builds an observation from a slice, rejecting anything but nine entries.
    pub fn from_slice(colors: &[FaceletColor], confidence: f64) -> Result<Self> {
        let colors: [FaceletColor; FACELETS_PER_FACE] = colors
            .try_into()
            .map_err(|_| ScanError::WrongFaceletCount(colors.len()))?;
        Self::new(colors, confidence)
    }

    /// Parses nine wire letters, e.g. `"WWWWWWWWW"`.
    pub fn from_letters(letters: &str, confidence: f64) -> Result<Self> {
        let colors = letters
            .chars()
            .map(FaceletColor::from_letter)
            .collect::<Result<Vec<_>>>()?;
        Self::from_slice(&colors, confidence)
    }

    /// Nine copies of `color`.
    pub fn uniform(color: FaceletColor, confidence: f64) -> Result<Self> {
        Self::new([color; FACELETS_PER_FACE], confidence)
    }

    pub fn colors(&self) -> &[FaceletColor; FACELETS_PER_FACE] {
        &self.colors
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn center(&self) -> FaceletColor {
        self.colors[CENTER_INDEX]
    }

    pub fn letters(&self) -> String {
        self.colors.iter().map(|c| c.letter()).collect()
    }
}

/// Names the face an observation shows by its center sticker.
pub fn identify(observation: &FaceObservation) -> Option<FaceLabel> {
    FaceLabel::for_center(observation.center())
}
