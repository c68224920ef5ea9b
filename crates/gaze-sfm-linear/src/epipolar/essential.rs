//! Essential matrix construction and decomposition.

use nalgebra::SMatrix;

use gaze_sfm_core::{CameraIntrinsics, Mat3, Real, Vec3};

use super::EpipolarError;

/// One of the four pose hypotheses produced by essential decomposition.
///
/// The pair maps first-view coordinates into second-view coordinates:
/// `x₂ = R x₁ + t`. The translation is unit-length; two-view geometry
/// cannot observe the baseline magnitude.
#[derive(Clone, Copy, Debug)]
pub struct PoseCandidate {
    /// Proper rotation with `det = +1`.
    pub rotation: Mat3,
    /// Unit-norm translation direction.
    pub translation: Vec3,
}

/// Build the essential matrix from a fundamental matrix and shared
/// intrinsics: `E = Kᵀ F K`.
pub fn essential_from_fundamental(f: &Mat3, k: &CameraIntrinsics) -> Mat3 {
    let km = k.k_matrix();
    km.transpose() * f * km
}

/// Project a 3×3 matrix onto the essential matrix manifold.
///
/// Forces the singular values to `(σ, σ, 0)` with `σ` the mean of the two
/// largest, which every valid essential matrix must satisfy.
pub fn enforce_essential_constraints(e: &Mat3) -> Result<Mat3, EpipolarError> {
    let svd = e.svd(true, true);
    let u = svd.u.ok_or(EpipolarError::SvdFailed)?;
    let v_t = svd.v_t.ok_or(EpipolarError::SvdFailed)?;

    let s1 = svd.singular_values[0];
    let s2 = svd.singular_values[1];
    let s = 0.5 * (s1 + s2);

    let s_mat = SMatrix::<Real, 3, 3>::from_diagonal(&Vec3::new(s, s, 0.0));
    Ok(u * s_mat * v_t)
}

/// Decompose an essential matrix into the four candidate pose hypotheses.
///
/// The constraint projection runs first, so callers may pass an unprojected
/// `Kᵀ F K` product directly. Both rotations are fixed up to `det = +1`;
/// cheirality checks on triangulated points select the physical candidate.
pub fn decompose_essential(e: &Mat3) -> Result<[PoseCandidate; 4], EpipolarError> {
    let e = enforce_essential_constraints(e)?;
    let svd = e.svd(true, true);
    let mut u = svd.u.ok_or(EpipolarError::SvdFailed)?;
    let mut v_t = svd.v_t.ok_or(EpipolarError::SvdFailed)?;

    if u.determinant() < 0.0 {
        u.column_mut(2).neg_mut();
    }
    if v_t.determinant() < 0.0 {
        v_t.row_mut(2).neg_mut();
    }

    #[rustfmt::skip]
    let w = Mat3::new(
        0.0, -1.0, 0.0,
        1.0,  0.0, 0.0,
        0.0,  0.0, 1.0,
    );

    let r1 = u * w * v_t;
    let r2 = u * w.transpose() * v_t;
    let t = u.column(2).normalize();

    let mut candidates = [
        PoseCandidate { rotation: r1, translation: t },
        PoseCandidate { rotation: r1, translation: -t },
        PoseCandidate { rotation: r2, translation: t },
        PoseCandidate { rotation: r2, translation: -t },
    ];

    for cand in candidates.iter_mut() {
        if cand.rotation.determinant() < 0.0 {
            cand.rotation = -cand.rotation;
            cand.translation = -cand.translation;
        }
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaze_sfm_core::math::skew;
    use gaze_sfm_core::transform::is_proper_rotation;
    use nalgebra::Rotation3;

    fn rotation_angle(r: &Mat3) -> Real {
        (((r.trace() - 1.0) * 0.5).clamp(-1.0, 1.0)).acos()
    }

    #[test]
    fn decomposition_contains_true_pose() {
        let rot = Rotation3::from_euler_angles(0.1, -0.05, 0.2);
        let t = Vec3::new(0.1, 0.02, -0.03);

        let e = skew(&t) * rot.matrix();
        let candidates = decompose_essential(&e).unwrap();

        let found = candidates.iter().any(|cand| {
            let ang = rotation_angle(&(cand.rotation.transpose() * rot.matrix()));
            let cos_t = cand.translation.dot(&t.normalize()).abs();
            ang < 1e-6 && (1.0 - cos_t) < 1e-6
        });
        assert!(found, "true pose missing from decomposition");
    }

    #[test]
    fn all_candidates_are_proper_rotations() {
        let rot = Rotation3::from_euler_angles(-0.3, 0.15, 0.02);
        let t = Vec3::new(0.0, 0.05, 0.1);

        let e = skew(&t) * rot.matrix();
        for cand in decompose_essential(&e).unwrap() {
            assert!(is_proper_rotation(&cand.rotation, 1e-9));
            assert!((cand.translation.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn constraint_projection_equalizes_singular_values() {
        #[rustfmt::skip]
        let m = Mat3::new(
            1.0, 0.2, -0.1,
            0.3, 0.8,  0.4,
            0.1, -0.2, 0.6,
        );
        let e = enforce_essential_constraints(&m).unwrap();
        let sv = e.svd(false, false).singular_values;
        assert!((sv[0] - sv[1]).abs() < 1e-12);
        assert!(sv[2].abs() < 1e-12);
    }
}
