// THEORY:
// The state assembler is the last step before validation: it turns six
// committed faces into the 54-character wire string a solver consumes. The
// order (U R F D L B, each face row-major) is a compatibility contract with
// external solvers and must never change.

use crate::core_modules::color::FaceletColor;
use crate::core_modules::consensus::ScanState;
use crate::core_modules::face::{FACELETS_PER_FACE, FaceLabel, SERIALIZATION_ORDER};
use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Total facelets on the cube.
pub const STATE_LENGTH: usize = FACELETS_PER_FACE * 6;

/// The 54-character cube state, faces in U R F D L B order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerializedState(String);

impl SerializedState {
    /// Parses a 54-character string of color letters (`X` allowed for unknown).
    pub fn parse(state: &str) -> Result<Self> {
        let length = state.chars().count();
        if length != STATE_LENGTH {
            return Err(ScanError::InvalidState(vec![format!(
                "State must be {STATE_LENGTH} characters, got {length}"
            )]));
        }
        for letter in state.chars() {
            FaceletColor::from_letter(letter)?;
        }
        Ok(Self(state.to_string()))
    }

    /// The solved cube: every face shows its own center color.
    pub fn solved() -> Self {
        Self(
            SERIALIZATION_ORDER
                .iter()
                .flat_map(|label| std::iter::repeat_n(label.expected_center().letter(), FACELETS_PER_FACE))
                .collect(),
        )
    }

    pub fn is_solved(&self) -> bool {
        *self == Self::solved()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The nine letters of one face.
    pub fn face(&self, label: FaceLabel) -> &str {
        let offset = label.state_offset();
        &self.0[offset..offset + FACELETS_PER_FACE]
    }

    pub fn colors(&self) -> Vec<FaceletColor> {
        self.0
            .chars()
            .map(|letter| FaceletColor::from_letter(letter).unwrap_or(FaceletColor::Unknown))
            .collect()
    }
}

impl fmt::Display for SerializedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SerializedState {
    type Error = ScanError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<SerializedState> for String {
    fn from(state: SerializedState) -> Self {
        state.0
    }
}

/// Concatenates the six committed faces. `None` until every face is committed.
pub fn assemble(scan_state: &ScanState) -> Option<SerializedState> {
    let mut state = String::with_capacity(STATE_LENGTH);
    for label in SERIALIZATION_ORDER {
        let face = scan_state.committed(label)?;
        state.extend(face.colors().iter().map(|color| color.letter()));
    }
    Some(SerializedState(state))
}

/// Assembles externally supplied faces.
///
/// Fails with the first face (in serialization order) that is missing or
/// does not hold exactly nine colors.
pub fn assemble_faces(
    faces: &HashMap<FaceLabel, Vec<FaceletColor>>,
) -> std::result::Result<SerializedState, FaceLabel> {
    let mut state = String::with_capacity(STATE_LENGTH);
    for label in SERIALIZATION_ORDER {
        match faces.get(&label) {
            Some(colors) if colors.len() == FACELETS_PER_FACE => {
                state.extend(colors.iter().map(|color| color.letter()));
            }
            _ => return Err(label),
        }
    }
    Ok(SerializedState(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::face::FaceObservation;

    #[test]
    fn incomplete_scan_has_no_state() {
        let mut scan = ScanState::default();
        scan.observe(FaceLabel::Up, FaceObservation::uniform(FaceletColor::White, 0.9).unwrap());
        assert!(assemble(&scan).is_none());
    }

    #[test]
    fn faces_are_concatenated_in_urfdlb_order() {
        let mut scan = ScanState::default();
        // Observe in an arbitrary order.
        for label in [
            FaceLabel::Back,
            FaceLabel::Front,
            FaceLabel::Left,
            FaceLabel::Up,
            FaceLabel::Down,
            FaceLabel::Right,
        ] {
            scan.observe(label, FaceObservation::uniform(label.expected_center(), 0.9).unwrap());
        }
        let state = assemble(&scan).unwrap();
        assert_eq!(
            state.as_str(),
            "WWWWWWWWWRRRRRRRRRGGGGGGGGGYYYYYYYYYOOOOOOOOOBBBBBBBBB"
        );
        assert!(state.is_solved());
        assert_eq!(state.face(FaceLabel::Left), "OOOOOOOOO");
    }

    #[test]
    fn parse_rejects_wrong_length_and_letters() {
        assert!(SerializedState::parse("WWW").is_err());
        let mut bad = SerializedState::solved().as_str().to_string();
        bad.replace_range(0..1, "Q");
        assert!(matches!(
            SerializedState::parse(&bad),
            Err(ScanError::InvalidColor('Q'))
        ));
    }

    #[test]
    fn assemble_faces_reports_first_missing_face() {
        let mut faces: HashMap<FaceLabel, Vec<FaceletColor>> = SERIALIZATION_ORDER
            .iter()
            .map(|label| (*label, vec![label.expected_center(); 9]))
            .collect();
        assert!(assemble_faces(&faces).unwrap().is_solved());

        faces.insert(FaceLabel::Front, vec![FaceletColor::Green; 8]);
        faces.remove(&FaceLabel::Back);
        assert_eq!(assemble_faces(&faces), Err(FaceLabel::Front));
    }
}
