// THEORY:
// The physical validator decides whether a 54-character state could come from a
// real cube before it is handed to a solver. Checks run in a fixed order and
// fall into two severities:
//
// - Hard errors (format, color counts, centers) make a state unusable. The
//   format check short-circuits because nothing after it is meaningful on a
//   malformed string.
// - Soft warnings (opposite colors sharing an edge or corner piece) are strong
//   evidence of a misread sticker, but a state can carry them and still be
//   handed on; the solver is the final judge.
//
// The edge and corner index tables are fixed geometry of the U R F D L B
// layout, listed once here and never recomputed.

use crate::core_modules::color::{CANONICAL_ORDER, FaceletColor};
use crate::core_modules::face::{CENTER_INDEX, FaceLabel, SERIALIZATION_ORDER};
use crate::core_modules::state_assembler::{STATE_LENGTH, assemble_faces};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const EXPECTED_COUNT: usize = 9;

/// Facelet index pairs of the 12 edge pieces.
pub const EDGE_PIECES: [[usize; 2]; 12] = [
    [1, 46],  // U-B
    [3, 37],  // U-L
    [5, 10],  // U-R
    [7, 19],  // U-F
    [21, 14], // F-R
    [23, 41], // F-L
    [25, 28], // F-D
    [12, 48], // R-B
    [16, 30], // R-D
    [39, 52], // L-B
    [43, 32], // L-D
    [50, 34], // B-D
];

/// Facelet index triples of the 8 corner pieces.
pub const CORNER_PIECES: [[usize; 3]; 8] = [
    [0, 38, 47],  // U-L-B
    [2, 45, 11],  // U-B-R
    [6, 18, 36],  // U-F-L
    [8, 9, 20],   // U-R-F
    [26, 44, 27], // F-L-D
    [24, 29, 17], // F-D-R
    [35, 42, 51], // D-L-B
    [33, 53, 15], // D-B-R
];

/// Outcome of validating one state. `valid` is false iff `errors` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn from_parts(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// A failed result carrying a single error.
    pub fn failure(error: impl Into<String>) -> Self {
        Self::from_parts(vec![error.into()], Vec::new())
    }
}

/// Validates a 54-character state string.
pub fn validate(state: &str) -> ValidationResult {
    let colors = match check_format(state) {
        Ok(colors) => colors,
        Err(errors) => return ValidationResult::from_parts(errors, Vec::new()),
    };

    let mut errors = check_counts(&colors);
    errors.extend(check_centers(&colors));

    let mut warnings = check_edges(&colors);
    warnings.extend(check_corners(&colors));

    for warning in &warnings {
        tracing::warn!(%warning, "adjacency check");
    }

    ValidationResult::from_parts(errors, warnings)
}

/// Validates faces supplied as a map rather than a string.
pub fn validate_faces(faces: &HashMap<FaceLabel, Vec<FaceletColor>>) -> ValidationResult {
    match assemble_faces(faces) {
        Ok(state) => validate(state.as_str()),
        Err(label) => ValidationResult::failure(format!("Face {label} is missing or invalid")),
    }
}

fn check_format(state: &str) -> Result<Vec<FaceletColor>, Vec<String>> {
    let length = state.chars().count();
    if length != STATE_LENGTH {
        return Err(vec![format!(
            "State must be {STATE_LENGTH} characters, got {length}"
        )]);
    }

    let mut colors = Vec::with_capacity(STATE_LENGTH);
    let mut errors = Vec::new();
    for (index, letter) in state.chars().enumerate() {
        match FaceletColor::from_letter(letter) {
            Ok(color) if color.is_known() => colors.push(color),
            _ => errors.push(format!("Invalid color {letter:?} at position {index}")),
        }
    }

    if errors.is_empty() { Ok(colors) } else { Err(errors) }
}

fn check_counts(colors: &[FaceletColor]) -> Vec<String> {
    CANONICAL_ORDER
        .iter()
        .filter_map(|color| {
            let actual = colors.iter().filter(|c| *c == color).count();
            (actual != EXPECTED_COUNT)
                .then(|| format!("Expected {EXPECTED_COUNT} {color}, got {actual}"))
        })
        .collect()
}

fn check_centers(colors: &[FaceletColor]) -> Vec<String> {
    SERIALIZATION_ORDER
        .iter()
        .filter_map(|label| {
            let expected = label.expected_center();
            let actual = colors[label.state_offset() + CENTER_INDEX];
            (actual != expected).then(|| {
                format!("Face {label} has wrong center: expected {expected}, got {actual}")
            })
        })
        .collect()
}

fn check_edges(colors: &[FaceletColor]) -> Vec<String> {
    EDGE_PIECES
        .iter()
        .enumerate()
        .filter_map(|(index, [a, b])| {
            let (first, second) = (colors[*a], colors[*b]);
            first.is_opposite_of(second).then(|| {
                format!("Edge {} has opposite colors: {first}-{second}", index + 1)
            })
        })
        .collect()
}

fn check_corners(colors: &[FaceletColor]) -> Vec<String> {
    CORNER_PIECES
        .iter()
        .enumerate()
        .filter_map(|(index, [a, b, c])| {
            let piece = [colors[*a], colors[*b], colors[*c]];
            let has_opposites = piece[0].is_opposite_of(piece[1])
                || piece[0].is_opposite_of(piece[2])
                || piece[1].is_opposite_of(piece[2]);
            has_opposites.then(|| {
                format!(
                    "Corner {} has opposite colors: {}-{}-{}",
                    index + 1,
                    piece[0],
                    piece[1],
                    piece[2]
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::state_assembler::SerializedState;
    use pretty_assertions::assert_eq;

    fn solved() -> String {
        SerializedState::solved().as_str().to_string()
    }

    fn with(state: &str, index: usize, letter: char) -> String {
        let mut chars: Vec<char> = state.chars().collect();
        chars[index] = letter;
        chars.into_iter().collect()
    }

    #[test]
    fn solved_state_is_clean() {
        assert_eq!(
            validate(&solved()),
            ValidationResult {
                valid: true,
                errors: vec![],
                warnings: vec![],
            }
        );
    }

    #[test]
    fn wrong_length_short_circuits() {
        let result = validate("WWWW");
        assert!(!result.valid);
        assert_eq!(result.errors, vec!["State must be 54 characters, got 4".to_string()]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn unknown_letters_are_format_errors() {
        let state = with(&with(&solved(), 0, 'X'), 53, 'z');
        let result = validate(&state);
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![
                "Invalid color 'X' at position 0".to_string(),
                "Invalid color 'z' at position 53".to_string(),
            ]
        );
    }

    #[test]
    fn one_swapped_sticker_yields_two_count_errors() {
        // A non-center U facelet turned yellow: 8 W, 10 Y.
        let result = validate(&with(&solved(), 0, 'Y'));
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec!["Expected 9 W, got 8".to_string(), "Expected 9 Y, got 10".to_string()]
        );
    }

    #[test]
    fn extra_white_and_missing_yellow() {
        let result = validate(&with(&solved(), 27, 'W'));
        assert_eq!(
            result.errors,
            vec!["Expected 9 W, got 10".to_string(), "Expected 9 Y, got 8".to_string()]
        );
    }

    #[test]
    fn swapped_up_and_down_centers() {
        let state = with(&with(&solved(), 4, 'Y'), 31, 'W');
        let result = validate(&state);
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![
                "Face U has wrong center: expected W, got Y".to_string(),
                "Face D has wrong center: expected Y, got W".to_string(),
            ]
        );
    }

    #[test]
    fn opposite_colors_on_an_edge_warn() {
        // Edge 4 joins U[7] and F[1]; make it white/yellow by swapping F[1] with a D facelet.
        let state = with(&with(&solved(), 19, 'Y'), 28, 'G');
        let result = validate(&state);
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(
            result
                .warnings
                .iter()
                .any(|w| w.starts_with("Edge 4 has opposite colors: W-Y")),
            "{:?}",
            result.warnings
        );
    }

    #[test]
    fn opposite_colors_on_a_corner_warn() {
        // Corner 4 is U[8], R[0], F[2]; swap F[2] with an L facelet to put orange next to red.
        let state = with(&with(&solved(), 20, 'O'), 37, 'G');
        let result = validate(&state);
        assert!(result.valid);
        assert!(result.warnings.iter().any(|w| w.starts_with("Corner 4 ")));
    }

    #[test]
    fn faces_map_with_missing_face() {
        let faces: HashMap<FaceLabel, Vec<FaceletColor>> = SERIALIZATION_ORDER
            .iter()
            .filter(|label| **label != FaceLabel::Down)
            .map(|label| (*label, vec![label.expected_center(); 9]))
            .collect();
        let result = validate_faces(&faces);
        assert_eq!(result.errors, vec!["Face D is missing or invalid".to_string()]);
    }
}
