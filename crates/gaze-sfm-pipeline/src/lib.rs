//! Per-session gaze tracking pipeline.
//!
//! Combines the linear two-view solvers into the stateful per-video
//! machinery: the head pose chain, screen plane calibration, gaze-ray
//! projection onto the calibrated plane, pixel mapping, and off-screen
//! event detection. [`session::GazeSession`] ties the pieces together;
//! one session corresponds to one video and sessions share no mutable
//! state.

pub mod events;
pub mod gaze;
pub mod plane;
pub mod pose_chain;
pub mod screen;
pub mod session;

pub use events::{GazeStatus, OffScreenEvent, detect_off_screen_events};
pub use gaze::{GazeProjector, ProjectionError, ScreenProjection};
pub use plane::{CalibrationError, PlaneCalibrator, ScreenFrame};
pub use pose_chain::PoseChain;
pub use screen::{OffScreenDirection, ScreenGeometry};
pub use session::{
    FrameOutcome, FrameUpdate, GazeSession, LogEntry, RejectReason, SessionConfig, SessionSummary,
};
