//! Epipolar geometry estimation and pose recovery.
//!
//! The entry point for frame-to-frame motion is [`recover_pose`], which runs
//! the full chain: normalized eight-point fundamental matrix, essential
//! matrix via the intrinsics, SVD decomposition into four pose candidates,
//! and cheirality-based disambiguation.

mod cheirality;
mod essential;
mod fundamental;

use thiserror::Error;

pub use cheirality::{RecoveredPose, recover_pose, recover_pose_from_essential};
pub use essential::{
    PoseCandidate, decompose_essential, enforce_essential_constraints, essential_from_fundamental,
};
pub use fundamental::fundamental_8point;

/// Failure modes of epipolar estimation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EpipolarError {
    /// Fewer than eight correspondences were supplied.
    #[error("need at least 8 correspondences, got {0}")]
    NotEnoughPoints(usize),
    /// The two correspondence slices have different lengths.
    #[error("correspondence count mismatch: {0} vs {1}")]
    LengthMismatch(usize, usize),
    /// The correspondence configuration does not determine a unique
    /// fundamental matrix (coincident points, pure rotation with noise-free
    /// planar data, or a rank-deficient design matrix).
    #[error("degenerate correspondence configuration")]
    DegenerateInput,
    /// The SVD routine did not return the requested factors.
    #[error("SVD did not converge")]
    SvdFailed,
    /// The cheirality vote produced no clear winner among the four pose
    /// candidates, or no candidate placed any point in front of both views.
    #[error("cheirality test could not disambiguate the relative pose")]
    PoseAmbiguous,
}
