//! Cheirality-based disambiguation of essential decomposition candidates.

use gaze_sfm_core::transform::iso_from_parts;
use gaze_sfm_core::{CameraIntrinsics, Iso3, Mat3, Pt2, Pt3};

use super::EpipolarError;
use super::essential::{decompose_essential, essential_from_fundamental};
use super::fundamental::fundamental_8point;
use crate::triangulation::triangulate_two_view;

/// Relative pose selected by the cheirality vote.
#[derive(Clone, Debug)]
pub struct RecoveredPose {
    /// Maps first-view coordinates into second-view coordinates with a
    /// unit-norm translation: `p₂ = t_second_first * p₁`.
    pub t_second_first: Iso3,
    /// Number of correspondences triangulated in front of both views.
    pub support: usize,
    /// Triangulated points with positive depth in both views, in the
    /// first view's frame and the translation's unit scale.
    pub points: Vec<Pt3>,
}

/// Recover the relative camera pose from pixel correspondences.
///
/// Runs the full linear chain: normalized eight-point fundamental matrix,
/// `E = Kᵀ F K`, four-way essential decomposition, and a cheirality vote.
/// Each candidate triangulates every correspondence (in `K⁻¹`-normalized
/// coordinates) and counts points with positive depth in both views; the
/// candidate with the strictly largest count wins.
///
/// Returns [`EpipolarError::PoseAmbiguous`] when no candidate places any
/// point in front of both views, or when the top count is tied and covers
/// at most half of the correspondences.
pub fn recover_pose(
    pts1: &[Pt2],
    pts2: &[Pt2],
    k: &CameraIntrinsics,
) -> Result<RecoveredPose, EpipolarError> {
    let f = fundamental_8point(pts1, pts2)?;
    let e = essential_from_fundamental(&f, k);
    recover_pose_from_essential(&e, pts1, pts2, k)
}

/// Cheirality vote over the four decomposition candidates of `e`.
///
/// Exposed separately so callers with a precomputed essential matrix can
/// skip the eight-point stage.
pub fn recover_pose_from_essential(
    e: &Mat3,
    pts1: &[Pt2],
    pts2: &[Pt2],
    k: &CameraIntrinsics,
) -> Result<RecoveredPose, EpipolarError> {
    if pts1.len() != pts2.len() {
        return Err(EpipolarError::LengthMismatch(pts1.len(), pts2.len()));
    }

    let norm1: Vec<Pt2> = pts1.iter().map(|p| k.pixel_to_normalized(p)).collect();
    let norm2: Vec<Pt2> = pts2.iter().map(|p| k.pixel_to_normalized(p)).collect();

    let candidates = decompose_essential(e)?;

    let mut scored: Vec<(Iso3, Vec<Pt3>)> = Vec::with_capacity(candidates.len());
    for cand in &candidates {
        let pose = iso_from_parts(&cand.rotation, &cand.translation);

        let mut in_front = Vec::new();
        for (x1, x2) in norm1.iter().zip(norm2.iter()) {
            if let Ok(tri) = triangulate_two_view(&pose, x1, x2) {
                if tri.depth_first > 0.0 && tri.depth_second > 0.0 {
                    in_front.push(tri.point);
                }
            }
        }
        scored.push((pose, in_front));
    }

    scored.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
    let runner_up = scored[1].1.len();
    let (pose, points) = scored.swap_remove(0);
    let support = points.len();

    if support == 0 {
        return Err(EpipolarError::PoseAmbiguous);
    }
    // A tie is only acceptable when the winner still explains a majority
    // of the correspondences.
    if support == runner_up && 2 * support <= norm1.len() {
        return Err(EpipolarError::PoseAmbiguous);
    }

    Ok(RecoveredPose {
        t_second_first: pose,
        support,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use gaze_sfm_core::Vec3;
    use gaze_sfm_core::synthetic::{relative_pose, two_view_scene};
    use gaze_sfm_core::transform::rotation_matrix;

    fn test_k() -> CameraIntrinsics {
        CameraIntrinsics::new(800.0, 780.0, 640.0, 360.0)
    }

    #[test]
    fn recovers_rotation_and_translation_direction() {
        let k = test_k();
        let yaw = 10.0_f64.to_radians();
        let truth = relative_pose(0.0, yaw, 0.0, Vec3::new(0.1, 0.0, 0.0));
        let scene = two_view_scene(12, truth, &k);

        let recovered = recover_pose(&scene.pixels_first, &scene.pixels_second, &k).unwrap();
        assert_eq!(recovered.support, 12);

        let r_est = rotation_matrix(&recovered.t_second_first);
        let r_true = rotation_matrix(&truth);
        assert_relative_eq!(r_est, r_true, epsilon = 1e-6);

        // Translation is recovered up to scale only.
        let t_est = recovered.t_second_first.translation.vector;
        let t_true = truth.translation.vector.normalize();
        assert_relative_eq!((t_est.norm() - 1.0).abs(), 0.0, epsilon = 1e-12);
        assert!(t_est.dot(&t_true) > 1.0 - 1e-6);

        // The winner's points are the scene scaled by the inverse baseline
        // (the true baseline is 0.1, the recovered one is 1).
        assert_eq!(recovered.points.len(), 12);
        let scale = 1.0 / 0.1;
        assert_relative_eq!(
            recovered.points[0],
            Pt3::from(scene.points[0].coords * scale),
            epsilon = 1e-6
        );
    }

    #[test]
    fn forward_motion_is_recovered() {
        let k = test_k();
        let truth = relative_pose(0.01, -0.02, 0.03, Vec3::new(0.02, 0.01, -0.15));
        let scene = two_view_scene(16, truth, &k);

        let recovered = recover_pose(&scene.pixels_first, &scene.pixels_second, &k).unwrap();
        assert_eq!(recovered.support, 16);

        let t_est = recovered.t_second_first.translation.vector;
        assert!(t_est.dot(&truth.translation.vector.normalize()) > 1.0 - 1e-6);
    }

    #[test]
    fn tolerates_small_pixel_noise() {
        use rand::{Rng, SeedableRng, rngs::StdRng};

        let k = test_k();
        let truth = relative_pose(0.02, 0.12, -0.04, Vec3::new(0.12, -0.03, 0.02));
        let scene = two_view_scene(24, truth, &k);

        let mut rng = StdRng::seed_from_u64(7);
        let mut jitter = |pts: &[Pt2]| -> Vec<Pt2> {
            pts.iter()
                .map(|p| {
                    Pt2::new(
                        p.x + rng.gen_range(-0.05..0.05),
                        p.y + rng.gen_range(-0.05..0.05),
                    )
                })
                .collect()
        };
        let noisy1 = jitter(&scene.pixels_first);
        let noisy2 = jitter(&scene.pixels_second);

        let recovered = recover_pose(&noisy1, &noisy2, &k).unwrap();
        assert!(recovered.support >= 22);

        let r_err = rotation_matrix(&recovered.t_second_first).transpose()
            * rotation_matrix(&truth);
        let angle = (((r_err.trace() - 1.0) * 0.5).clamp(-1.0, 1.0)).acos();
        assert!(angle < 0.02, "rotation error too large: {angle}");

        let t_est = recovered.t_second_first.translation.vector;
        assert!(t_est.dot(&truth.translation.vector.normalize()) > 0.99);
    }

    #[test]
    fn eight_correspondences_are_sufficient() {
        let k = test_k();
        let truth = relative_pose(0.0, 0.06, 0.0, Vec3::new(0.1, 0.0, 0.02));
        let scene = two_view_scene(8, truth, &k);

        let recovered = recover_pose(&scene.pixels_first, &scene.pixels_second, &k).unwrap();
        assert_eq!(recovered.support, 8);
        assert_relative_eq!(
            rotation_matrix(&recovered.t_second_first),
            rotation_matrix(&truth),
            epsilon = 1e-6
        );
    }

    #[test]
    fn too_few_points_propagate_from_eight_point() {
        let k = test_k();
        let truth = relative_pose(0.0, 0.05, 0.0, Vec3::new(0.1, 0.0, 0.0));
        let scene = two_view_scene(8, truth, &k);

        let err = recover_pose(&scene.pixels_first[..7], &scene.pixels_second[..7], &k)
            .unwrap_err();
        assert_eq!(err, EpipolarError::NotEnoughPoints(7));
    }
}
