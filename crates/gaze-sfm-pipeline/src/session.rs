//! Per-video gaze session.
//!
//! A [`GazeSession`] owns all mutable pipeline state for one video: the
//! head pose chain, the plane calibrator, the frozen screen frame, the
//! per-frame gaze trace, counters, and a lightweight operation log.
//! Sessions share nothing; one video maps to one session.

use std::time::SystemTime;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use gaze_sfm_core::{CameraIntrinsics, GazeRay, Iso3, Pt2};
use gaze_sfm_linear::epipolar::{EpipolarError, recover_pose};

use crate::events::{GazeStatus, OffScreenEvent, detect_off_screen_events};
use crate::gaze::{GazeProjector, ProjectionError, ScreenProjection};
use crate::plane::{CalibrationError, PlaneCalibrator};
use crate::pose_chain::PoseChain;
use crate::screen::ScreenGeometry;

/// Session configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Camera intrinsics shared by every frame of the video.
    pub intrinsics: CameraIntrinsics,
    /// Physical screen geometry for pixel mapping, when known.
    pub screen: Option<ScreenGeometry>,
    /// Minimum run length, in frames, for an off-screen event.
    pub min_event_frames: usize,
}

impl SessionConfig {
    /// Configuration with default event threshold and no screen geometry.
    pub fn new(intrinsics: CameraIntrinsics) -> Self {
        Self {
            intrinsics,
            screen: None,
            min_event_frames: 3,
        }
    }
}

/// Why a frame pair did not advance the pose chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Not enough correspondences, mismatched lengths, or a degenerate
    /// configuration in the eight-point solve.
    DegenerateInput,
    /// The cheirality vote produced no clear winner.
    PoseAmbiguous,
}

impl From<EpipolarError> for RejectReason {
    fn from(err: EpipolarError) -> Self {
        match err {
            EpipolarError::PoseAmbiguous => Self::PoseAmbiguous,
            _ => Self::DegenerateInput,
        }
    }
}

/// State published by an accepted frame pair.
#[derive(Clone, Debug)]
pub struct FrameUpdate {
    /// Absolute head pose after this frame.
    pub t_world_cam: Iso3,
    /// Cheirality support of the accepted pose candidate.
    pub support: usize,
    /// Screen projection of the frame's gaze ray, when a ray was supplied
    /// and the plane is calibrated.
    pub projection: Option<ScreenProjection>,
    /// Pixel coordinates of a forward intersection, when screen geometry
    /// is configured.
    pub pixel: Option<Pt2>,
}

/// Outcome of processing one frame pair. Rejection is a value, not an
/// error: the session holds the last pose and keeps going.
#[derive(Clone, Debug)]
pub enum FrameOutcome {
    /// The pose chain advanced.
    Tracked(FrameUpdate),
    /// The frame pair was rejected and the pose held.
    Rejected(RejectReason),
}

/// Lightweight operation log entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unix timestamp of the operation (seconds since epoch).
    pub timestamp: u64,
    /// Operation name (e.g. "frame", "freeze_calibration").
    pub operation: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Optional notes or error message.
    pub notes: Option<String>,
}

impl LogEntry {
    fn success(operation: impl Into<String>) -> Self {
        Self {
            timestamp: current_timestamp(),
            operation: operation.into(),
            success: true,
            notes: None,
        }
    }

    fn failure(operation: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            timestamp: current_timestamp(),
            operation: operation.into(),
            success: false,
            notes: Some(error.into()),
        }
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Serializable per-session totals.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Frame pairs processed.
    pub frames_processed: usize,
    /// Frame pairs that advanced the pose chain.
    pub frames_tracked: usize,
    /// Rejections from degenerate input.
    pub rejected_degenerate: usize,
    /// Rejections from an ambiguous cheirality vote.
    pub rejected_ambiguous: usize,
    /// Accumulated plane calibration samples.
    pub calibration_samples: usize,
    /// Whether the screen plane is frozen.
    pub calibrated: bool,
    /// Frames whose gaze ray hit the screen.
    pub gaze_hits: usize,
    /// Frames whose gaze was off screen (requires screen geometry).
    pub off_screen_frames: usize,
}

/// Mutable pipeline state for one video.
#[derive(Debug)]
pub struct GazeSession {
    config: SessionConfig,
    chain: PoseChain,
    calibrator: PlaneCalibrator,
    projector: Option<GazeProjector>,
    trace: Vec<GazeStatus>,
    log: Vec<LogEntry>,
    summary: SessionSummary,
}

impl GazeSession {
    /// Start a session; the first camera frame becomes the world frame.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            chain: PoseChain::new(),
            calibrator: PlaneCalibrator::new(),
            projector: None,
            trace: Vec::new(),
            log: Vec::new(),
            summary: SessionSummary::default(),
        }
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current absolute head pose.
    pub fn current_pose(&self) -> &Iso3 {
        self.chain.current()
    }

    /// Head trajectory in world coordinates.
    pub fn trajectory(&self) -> &[gaze_sfm_core::Pt3] {
        self.chain.trajectory()
    }

    /// Process one consecutive frame pair.
    ///
    /// `pts_prev` and `pts_cur` are matched pixel correspondences between
    /// the previous and current frame; `gaze_cam` is the current frame's
    /// gaze ray in camera coordinates, when the gaze estimator produced
    /// one. Estimation failures reject the pair and hold the last pose.
    pub fn process_frame_pair(
        &mut self,
        pts_prev: &[Pt2],
        pts_cur: &[Pt2],
        gaze_cam: Option<&GazeRay>,
    ) -> FrameOutcome {
        self.summary.frames_processed += 1;
        let frame_idx = self.summary.frames_processed;

        match recover_pose(pts_prev, pts_cur, &self.config.intrinsics) {
            Ok(recovered) => {
                self.chain.advance(&recovered.t_second_first);
                self.summary.frames_tracked += 1;

                let projection = gaze_cam.and_then(|ray| {
                    self.projector
                        .as_ref()
                        .map(|proj| proj.project_from_camera(ray, self.chain.current()))
                });
                let pixel = projection
                    .and_then(|p| p.point())
                    .and_then(|p| self.config.screen.map(|s| s.centered_mm_to_px(&p)));

                self.record_gaze_status(projection, pixel);

                debug!(
                    "frame {frame_idx}: pose accepted with support {}",
                    recovered.support
                );
                FrameOutcome::Tracked(FrameUpdate {
                    t_world_cam: *self.chain.current(),
                    support: recovered.support,
                    projection,
                    pixel,
                })
            }
            Err(err) => {
                let reason = RejectReason::from(err);
                self.chain.hold();
                self.trace.push(GazeStatus::Untracked);
                match reason {
                    RejectReason::DegenerateInput => self.summary.rejected_degenerate += 1,
                    RejectReason::PoseAmbiguous => self.summary.rejected_ambiguous += 1,
                }
                warn!("frame {frame_idx}: rejected ({reason:?}), holding last pose");
                self.log
                    .push(LogEntry::failure("frame", format!("{reason:?}")));
                FrameOutcome::Rejected(reason)
            }
        }
    }

    fn record_gaze_status(&mut self, projection: Option<ScreenProjection>, pixel: Option<Pt2>) {
        let status = match (projection, pixel) {
            (Some(ScreenProjection::Hit(_)), Some(px)) => {
                match self.config.screen.and_then(|s| s.classify(&px)) {
                    None => {
                        self.summary.gaze_hits += 1;
                        GazeStatus::OnScreen
                    }
                    Some(dir) => {
                        self.summary.off_screen_frames += 1;
                        GazeStatus::OffScreen(dir)
                    }
                }
            }
            (Some(ScreenProjection::Hit(_)), None) => {
                // No screen geometry: a forward intersection counts as a hit.
                self.summary.gaze_hits += 1;
                GazeStatus::OnScreen
            }
            (Some(_), _) => {
                // Behind or Miss: the gaze never crossed the plane forward.
                self.summary.off_screen_frames += 1;
                GazeStatus::Away
            }
            (None, _) => GazeStatus::Untracked,
        };
        self.trace.push(status);
    }

    /// Record the current head position as a plane calibration sample.
    pub fn record_calibration_sample(&mut self) -> Result<(), CalibrationError> {
        self.calibrator.add_sample(self.chain.head_position())?;
        self.summary.calibration_samples = self.calibrator.len();
        Ok(())
    }

    /// Fit the screen plane and freeze the calibration.
    pub fn freeze_calibration(&mut self) -> Result<(), CalibrationError> {
        match self.calibrator.freeze() {
            Ok(frame) => {
                self.projector = Some(GazeProjector::new(frame));
                self.summary.calibrated = true;
                self.log.push(LogEntry::success("freeze_calibration"));
                debug!(
                    "screen plane frozen from {} samples",
                    self.calibrator.len()
                );
                Ok(())
            }
            Err(err) => {
                self.log
                    .push(LogEntry::failure("freeze_calibration", err.to_string()));
                Err(err)
            }
        }
    }

    /// Whether the screen plane has been frozen.
    pub fn is_calibrated(&self) -> bool {
        self.projector.is_some()
    }

    /// Project a camera-frame gaze ray at the current head pose.
    pub fn project_gaze(&self, ray_cam: &GazeRay) -> Result<ScreenProjection, ProjectionError> {
        let projector = self.projector.as_ref().ok_or(ProjectionError::NotCalibrated)?;
        Ok(projector.project_from_camera(ray_cam, self.chain.current()))
    }

    /// Off-screen events detected in the gaze trace so far.
    pub fn off_screen_events(&self) -> Vec<OffScreenEvent> {
        detect_off_screen_events(&self.trace, self.config.min_event_frames)
    }

    /// Per-frame gaze trace, one entry per processed frame pair.
    pub fn gaze_trace(&self) -> &[GazeStatus] {
        &self.trace
    }

    /// Operation log.
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Current totals.
    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    /// Serialize the summary as JSON.
    pub fn summary_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.summary)
    }
}
