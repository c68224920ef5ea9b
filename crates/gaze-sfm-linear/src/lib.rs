//! Linear two-view geometry solvers.
//!
//! Closed-form building blocks for estimating camera motion from point
//! correspondences between consecutive frames:
//!
//! - [`normalize`] — Hartley conditioning of pixel coordinates,
//! - [`epipolar`] — fundamental/essential matrix estimation, decomposition,
//!   and cheirality-based pose recovery,
//! - [`triangulation`] — two-view DLT triangulation with per-view depths.
//!
//! All solvers are deterministic and allocation-light; none of them iterate
//! or refine. The pose returned by [`epipolar::recover_pose`] has unit
//! translation norm, so downstream consumers work in an arbitrary but
//! consistent scale.

pub mod epipolar;
pub mod normalize;
pub mod triangulation;

pub use epipolar::{
    EpipolarError, PoseCandidate, RecoveredPose, decompose_essential,
    enforce_essential_constraints, essential_from_fundamental, fundamental_8point, recover_pose,
    recover_pose_from_essential,
};
pub use normalize::{Normalization, NormalizationError, normalize_points};
pub use triangulation::{TriangulatedPoint, TriangulationError, triangulate_two_view};
