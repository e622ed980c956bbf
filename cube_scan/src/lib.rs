// THEORY:
// This file is the main entry point for the `cube_scan` library crate. It
// exposes the scanner as one high-level object, `ScanPipeline`, which turns a
// stream of camera frames (one cube face at a time, any order) into a single
// validated 54-facelet state ready for a solver.
//
// The stage modules (`core_modules`) stay public so a caller can swap the
// region locator, drive the classifier directly, or validate states produced
// elsewhere. `SessionPool` hosts many pipelines at once, each owned by its own
// task.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod pipeline;
pub mod session_pool;
pub mod solver;

pub use config::ScanConfig;
pub use core_modules::color::FaceletColor;
pub use core_modules::color_classifier::{Classification, classify};
pub use core_modules::face::{FaceLabel, FaceObservation, identify};
pub use core_modules::frame::PixelBuffer;
pub use core_modules::overlay::{DebugSink, OverlayRenderer};
pub use core_modules::region_locator::{Region, RegionLocator};
pub use core_modules::state_assembler::{SerializedState, assemble};
pub use core_modules::validator::{ValidationResult, validate};
pub use error::{Result, ScanError};
pub use pipeline::{FrameOutcome, ScanPipeline, ScanSnapshot};
pub use session_pool::{OwnedFrame, SessionPool};
pub use solver::{CubeSolver, SolveOutcome};
