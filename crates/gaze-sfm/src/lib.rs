//! High-level entry crate for the `gaze-sfm` gaze tracking library.
//!
//! Maps monocular gaze rays onto a physical screen without depth sensing:
//! head motion is recovered frame-to-frame with two-view epipolar geometry,
//! the screen plane is calibrated from accumulated head positions, and gaze
//! rays are intersected with the calibrated plane and converted to pixels.
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use gaze_sfm::prelude::*;
//!
//! let intrinsics = CameraIntrinsics::new(800.0, 780.0, 640.0, 360.0);
//! let mut session = GazeSession::new(SessionConfig::new(intrinsics));
//!
//! # let (pts_prev, pts_cur): (Vec<Pt2>, Vec<Pt2>) = unimplemented!();
//! // Feed matched correspondences per consecutive frame pair.
//! match session.process_frame_pair(&pts_prev, &pts_cur, None) {
//!     FrameOutcome::Tracked(update) => { /* update.t_world_cam, update.projection */ }
//!     FrameOutcome::Rejected(reason) => { /* pose held, keep going */ }
//! }
//!
//! // During the calibration phase, record head positions and freeze.
//! session.record_calibration_sample()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`session`] - Per-video session: pose chain, calibration, projection
//! - [`core`] - Math types, intrinsics, gaze rays, synthetic data
//! - [`linear`] - Closed-form two-view solvers (eight-point, triangulation)
//! - [`pipeline`] - Pipeline building blocks below the session layer

/// Per-video session machinery.
pub mod session {
    pub use gaze_sfm_pipeline::session::{
        FrameOutcome, FrameUpdate, GazeSession, LogEntry, RejectReason, SessionConfig,
        SessionSummary,
    };
}

/// Core math types, camera intrinsics, and gaze ray primitives.
///
/// Re-exports everything from `gaze_sfm_core`.
pub mod core {
    pub use gaze_sfm_core::*;
}

/// Closed-form two-view geometry solvers.
///
/// Re-exports everything from `gaze_sfm_linear`.
pub mod linear {
    pub use gaze_sfm_linear::*;
}

/// Pipeline building blocks: pose chain, plane calibration, projection,
/// screen geometry, and off-screen events.
///
/// Re-exports everything from `gaze_sfm_pipeline`.
pub mod pipeline {
    pub use gaze_sfm_pipeline::*;
}

/// Deterministic synthetic two-view data generation for testing.
pub mod synthetic {
    pub use gaze_sfm_core::synthetic::*;
}

// Convenience re-exports.
pub use gaze_sfm_core::{
    CameraIntrinsics, GazeRay, Iso3, Mat3, Mat4, Pt2, Pt3, Real, Vec2, Vec3,
};
pub use gaze_sfm_linear::epipolar::{EpipolarError, RecoveredPose, recover_pose};
pub use gaze_sfm_pipeline::{
    CalibrationError, FrameOutcome, FrameUpdate, GazeProjector, GazeSession, GazeStatus,
    OffScreenDirection, OffScreenEvent, PlaneCalibrator, PoseChain, ProjectionError, RejectReason,
    ScreenFrame, ScreenGeometry, ScreenProjection, SessionConfig, SessionSummary,
};

/// Convenient re-exports for common use cases.
///
/// ```no_run
/// use gaze_sfm::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        CalibrationError, CameraIntrinsics, FrameOutcome, FrameUpdate, GazeRay, GazeSession,
        Iso3, OffScreenDirection, OffScreenEvent, ProjectionError, Pt2, Pt3, RejectReason,
        ScreenGeometry, ScreenProjection, SessionConfig, SessionSummary, Vec2, Vec3,
    };
}
