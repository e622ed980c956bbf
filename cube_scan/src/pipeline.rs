// THEORY:
// The `pipeline` module is the top-level API for one scanning session. It
// encapsulates the whole stack behind a single object that is fed one frame at
// a time:
//
//   buffer -> region locator -> facelet sampler -> color classifier (x9)
//          -> face identifier -> consensus builder
//
// and, once all six faces are committed, exposes the assembled state, its
// validation, and a gated handoff to a solver.
//
// A frame either completes every stage or stops cleanly at the first stage that
// has nothing to offer (no region, unidentifiable center). A stopped frame
// never touches the session's `ScanState`.

use crate::config::ScanConfig;
use crate::core_modules::color_classifier::{Classification, classify_face};
use crate::core_modules::consensus::ScanState;
use crate::core_modules::face::{FaceLabel, FaceObservation, identify};
use crate::core_modules::facelet_sampler::FaceletSampler;
use crate::core_modules::frame::PixelBuffer;
use crate::core_modules::overlay::DebugSink;
use crate::core_modules::region_locator::{
    CenteredRegionLocator, FixedRegionLocator, Region, RegionLocator,
};
use crate::core_modules::state_assembler::{SerializedState, assemble};
use crate::core_modules::validator::{ValidationResult, validate};
use crate::error::{Result, ScanError};
use crate::solver::{CubeSolver, SolveOutcome};
use serde::{Deserialize, Serialize};

// Re-export key data structures for the public API.
pub use crate::core_modules::color::FaceletColor;

/// What happened to one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// No region was proposed. Nothing was sampled.
    NoDetection,
    /// A region was sampled but its center matched no face.
    Unidentified {
        region: Region,
        classifications: [Classification; 9],
    },
    /// The frame was attributed to a face and folded into its consensus.
    FaceObserved(FaceReport),
}

/// Details of a frame that was attributed to a face.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceReport {
    pub label: FaceLabel,
    pub region: Region,
    pub classifications: [Classification; 9],
    /// This frame's raw observation.
    pub observation: FaceObservation,
    /// The face's consensus after folding this frame in.
    pub committed: FaceObservation,
    /// True when this frame completed the scan.
    pub completed_scan: bool,
}

/// Per-face progress for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceSummary {
    pub label: FaceLabel,
    /// Committed letters, or `None` before the face has been seen.
    pub colors: Option<String>,
    pub confidence: f64,
    pub frames: usize,
}

/// A point-in-time view of a session's progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSnapshot {
    pub faces: Vec<FaceSummary>,
    pub complete: bool,
    pub missing_faces: Vec<FaceLabel>,
}

/// The result of a successful solver handoff.
#[derive(Debug, Clone, PartialEq)]
pub struct Handoff {
    pub state: SerializedState,
    /// Validation passed; only warnings can be present.
    pub validation: ValidationResult,
    pub outcome: SolveOutcome,
}

/// One scanning session: owns its `ScanState` and the stage strategies.
pub struct ScanPipeline {
    config: ScanConfig,
    locator: Box<dyn RegionLocator>,
    sampler: FaceletSampler,
    scan_state: ScanState,
    debug_sink: Option<Box<dyn DebugSink>>,
    frame_count: u64,
}

impl ScanPipeline {
    /// Builds a session from a validated config.
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        let locator: Box<dyn RegionLocator> = match config.fixed_region {
            Some(region) => Box::new(FixedRegionLocator::new(region)),
            None => Box::new(CenteredRegionLocator {
                fraction: config.region_fraction,
                confidence: config.region_confidence,
            }),
        };
        Ok(Self {
            sampler: FaceletSampler::new(config.sample_radius),
            scan_state: ScanState::new(config.history_capacity),
            locator,
            config,
            debug_sink: None,
            frame_count: 0,
        })
    }

    /// Replaces the region locator, e.g. with a stronger geometric detector.
    pub fn with_locator(mut self, locator: Box<dyn RegionLocator>) -> Self {
        self.locator = locator;
        self
    }

    pub fn set_debug_sink(&mut self, sink: Option<Box<dyn DebugSink>>) {
        self.debug_sink = sink;
    }

    /// Takes the debug sink back out, e.g. to save what it drew.
    pub fn take_debug_sink(&mut self) -> Option<Box<dyn DebugSink>> {
        self.debug_sink.take()
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn scan_state(&self) -> &ScanState {
        &self.scan_state
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Convenience wrapper that validates a raw RGBA slice first.
    pub fn process_rgba(&mut self, width: u32, height: u32, data: &[u8]) -> Result<FrameOutcome> {
        let buffer = PixelBuffer::new(width, height, data)?;
        self.process_frame(&buffer)
    }

    /// Runs one frame through every stage.
    pub fn process_frame(&mut self, buffer: &PixelBuffer<'_>) -> Result<FrameOutcome> {
        self.frame_count += 1;

        // Stage 1: Region proposal
        let Some(region) = self.locator.locate(buffer) else {
            tracing::debug!(frame = self.frame_count, "no region proposed");
            return Ok(FrameOutcome::NoDetection);
        };

        // Stage 2: Sampling and classification
        let samples = self.sampler.sample(buffer, &region);
        let classifications = classify_face(&samples);
        let colors = classifications.map(|c| c.color);
        let observation = FaceObservation::new(colors, region.confidence)?;

        if let Some(sink) = self.debug_sink.as_mut() {
            sink.draw(&region, &classifications);
        }

        // Stage 3: Identification
        let Some(label) = identify(&observation) else {
            tracing::debug!(
                frame = self.frame_count,
                colors = %observation.letters(),
                "center matched no face"
            );
            return Ok(FrameOutcome::Unidentified {
                region,
                classifications,
            });
        };

        // Stage 4: Temporal consensus
        let was_complete = self.scan_state.is_complete();
        let committed = self.scan_state.observe(label, observation.clone());
        let completed_scan = !was_complete && self.scan_state.is_complete();

        if completed_scan {
            tracing::info!(frame = self.frame_count, "all six faces committed");
        }

        Ok(FrameOutcome::FaceObserved(FaceReport {
            label,
            region,
            classifications,
            observation,
            committed,
            completed_scan,
        }))
    }

    /// Feeds an already-classified observation, bypassing the image stages.
    ///
    /// Returns the face it was attributed to, or `None` if the center matched
    /// no face (in which case nothing is recorded).
    pub fn add_observation(&mut self, observation: FaceObservation) -> Option<FaceLabel> {
        let label = identify(&observation)?;
        self.scan_state.observe(label, observation);
        Some(label)
    }

    pub fn is_complete(&self) -> bool {
        self.scan_state.is_complete()
    }

    pub fn missing_faces(&self) -> Vec<FaceLabel> {
        self.scan_state.missing_faces()
    }

    pub fn scanned_faces(&self) -> Vec<FaceLabel> {
        self.scan_state.scanned_faces()
    }

    pub fn face(&self, label: FaceLabel) -> Option<&FaceObservation> {
        self.scan_state.committed(label)
    }

    /// Committed confidence for a face, 0.0 before it has been seen.
    pub fn face_confidence(&self, label: FaceLabel) -> f64 {
        self.face(label).map_or(0.0, FaceObservation::confidence)
    }

    pub fn snapshot(&self) -> ScanSnapshot {
        let faces = crate::core_modules::face::SERIALIZATION_ORDER
            .iter()
            .map(|&label| FaceSummary {
                label,
                colors: self.face(label).map(FaceObservation::letters),
                confidence: self.face_confidence(label),
                frames: self.scan_state.history(label).len(),
            })
            .collect();
        ScanSnapshot {
            faces,
            complete: self.is_complete(),
            missing_faces: self.missing_faces(),
        }
    }

    /// The 54-character state, once every face is committed.
    pub fn state_string(&self) -> Option<SerializedState> {
        assemble(&self.scan_state)
    }

    /// Validates the assembled state. An incomplete scan is a hard error.
    pub fn validate(&self) -> ValidationResult {
        match self.state_string() {
            Some(state) => validate(state.as_str()),
            None => ValidationResult::failure("State not complete"),
        }
    }

    /// Hands the state to `solver` if it is complete and passes hard validation.
    pub fn handoff<S: CubeSolver + ?Sized>(&self, solver: &S) -> Result<Handoff> {
        let Some(state) = self.state_string() else {
            let missing = self
                .missing_faces()
                .iter()
                .map(|label| label.letter())
                .collect();
            return Err(ScanError::Incomplete { missing });
        };

        let validation = validate(state.as_str());
        if !validation.valid {
            tracing::warn!(errors = ?validation.errors, "refusing solver handoff");
            return Err(ScanError::InvalidState(validation.errors));
        }

        let outcome = solver.solve(&state);
        tracing::info!(state = %state, outcome = ?outcome, "solver handoff");
        Ok(Handoff {
            state,
            validation,
            outcome,
        })
    }

    /// Forgets every observation and commit. The only way state is cleared.
    pub fn reset(&mut self) {
        tracing::debug!(frames = self.frame_count, "scan reset");
        self.scan_state.reset();
        self.frame_count = 0;
    }
}
