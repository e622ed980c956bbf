// THEORY:
// The consensus builder is the temporal layer of the scanner. A single frame's
// classification is noisy (glare, motion blur, a finger over a sticker), but
// the operator holds each face up for many frames. `ScanState` keeps a short
// sliding window of observations per face and re-derives one committed answer
// every time a new observation arrives.
//
// Key architectural principles:
// 1.  **Bounded memory**: each face keeps at most `capacity` observations,
//     oldest dropped first, so stale frames age out while the face is still in
//     view.
// 2.  **Per-position voting**: each of the nine positions is decided
//     independently by a confidence-weighted plurality. A high-confidence frame
//     outweighs a low-confidence one, but enough agreeing weak frames still win.
// 3.  **Deterministic ties**: equal vote mass is broken by `CANONICAL_ORDER`,
//     never by iteration order. `Unknown` only wins a position when no sticker
//     color was voted for there at all.
// 4.  **Newest evidence wins**: every recomputation overwrites the previous
//     commit. There is no minimum number of frames before a face commits.
// 5.  **Session-owned**: a `ScanState` belongs to one scanning session. There is
//     no global state; two sessions never see each other's frames.

use crate::core_modules::color::{CANONICAL_ORDER, FaceletColor};
use crate::core_modules::face::{FACELETS_PER_FACE, FaceLabel, FaceObservation, SERIALIZATION_ORDER};
use std::collections::VecDeque;

/// Default number of observations remembered per face.
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

const VOTE_SLOTS: usize = CANONICAL_ORDER.len() + 1;
const UNKNOWN_SLOT: usize = CANONICAL_ORDER.len();

/// Per-session scan progress: the history window and current commit for each face.
#[derive(Debug, Clone)]
pub struct ScanState {
    capacity: usize,
    histories: [VecDeque<FaceObservation>; 6],
    committed: [Option<FaceObservation>; 6],
}

impl Default for ScanState {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl ScanState {
    /// A fresh state remembering up to `capacity` observations per face.
    /// A zero capacity is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            histories: std::array::from_fn(|_| VecDeque::with_capacity(capacity + 1)),
            committed: std::array::from_fn(|_| None),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records an observation for `label` and recommits that face.
    pub fn observe(&mut self, label: FaceLabel, observation: FaceObservation) -> FaceObservation {
        let first_commit = self.committed(label).is_none();
        let history = &mut self.histories[label.serialization_index()];
        Self::update_history(history, observation.clone(), self.capacity);

        // The history is non-empty here, so `commit` always yields a value.
        let committed = self.commit(label).unwrap_or(observation);

        if first_commit {
            tracing::info!(
                face = %label,
                colors = %committed.letters(),
                confidence = committed.confidence(),
                "face committed"
            );
        } else {
            tracing::debug!(
                face = %label,
                colors = %committed.letters(),
                confidence = committed.confidence(),
                frames = self.histories[label.serialization_index()].len(),
                "face recommitted"
            );
        }
        committed
    }

    /// Recomputes the consensus for `label` from its history and stores it.
    ///
    /// Returns `None` only when the face has never been observed.
    pub fn commit(&mut self, label: FaceLabel) -> Option<FaceObservation> {
        let index = label.serialization_index();
        let consensus = consensus(&self.histories[index])?;
        self.committed[index] = Some(consensus.clone());
        Some(consensus)
    }

    pub fn committed(&self, label: FaceLabel) -> Option<&FaceObservation> {
        self.committed[label.serialization_index()].as_ref()
    }

    pub fn history(&self, label: FaceLabel) -> &VecDeque<FaceObservation> {
        &self.histories[label.serialization_index()]
    }

    pub fn is_complete(&self) -> bool {
        self.committed.iter().all(Option::is_some)
    }

    /// Faces without a commit, in serialization order.
    pub fn missing_faces(&self) -> Vec<FaceLabel> {
        SERIALIZATION_ORDER
            .into_iter()
            .filter(|label| self.committed(*label).is_none())
            .collect()
    }

    /// Faces with a commit, in serialization order.
    pub fn scanned_faces(&self) -> Vec<FaceLabel> {
        SERIALIZATION_ORDER
            .into_iter()
            .filter(|label| self.committed(*label).is_some())
            .collect()
    }

    /// Drops every history and commit.
    pub fn reset(&mut self) {
        for history in &mut self.histories {
            history.clear();
        }
        for committed in &mut self.committed {
            *committed = None;
        }
    }

    fn update_history<T>(history: &mut VecDeque<T>, new_value: T, capacity: usize) {
        history.push_back(new_value);
        while history.len() > capacity {
            history.pop_front();
        }
    }
}

/// Confidence-weighted plurality vote over a window of observations.
///
/// Returns `None` for an empty window.
pub fn consensus(history: &VecDeque<FaceObservation>) -> Option<FaceObservation> {
    if history.is_empty() {
        return None;
    }

    let frames = history.len() as f64;
    let mut total_confidence = 0.0;

    let colors: [FaceletColor; FACELETS_PER_FACE] = std::array::from_fn(|position| {
        let mut mass = [0.0f64; VOTE_SLOTS];
        let mut voted = [false; VOTE_SLOTS];
        for observation in history {
            let slot = observation.colors()[position].canonical_index();
            mass[slot] += observation.confidence();
            voted[slot] = true;
        }

        let (winner, winning_mass) = plurality(&mass, &voted);
        total_confidence += winning_mass / frames;
        winner
    });

    let confidence = (total_confidence / FACELETS_PER_FACE as f64).clamp(0.0, 1.0);
    FaceObservation::new(colors, confidence).ok()
}

// Strict `>` over CANONICAL_ORDER keeps the earliest color on equal mass.
fn plurality(mass: &[f64; VOTE_SLOTS], voted: &[bool; VOTE_SLOTS]) -> (FaceletColor, f64) {
    let mut best: Option<(FaceletColor, f64)> = None;
    for (slot, color) in CANONICAL_ORDER.iter().enumerate() {
        if !voted[slot] {
            continue;
        }
        match best {
            Some((_, best_mass)) if mass[slot] <= best_mass => {}
            _ => best = Some((*color, mass[slot])),
        }
    }
    best.unwrap_or((FaceletColor::Unknown, mass[UNKNOWN_SLOT]))
}
