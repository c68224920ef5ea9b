//! Fundamental matrix estimation via the normalized eight-point algorithm.

use nalgebra::{DMatrix, SMatrix};

use gaze_sfm_core::{Mat3, Pt2, Real};

use super::EpipolarError;
use crate::normalize::{NormalizationError, normalize_points};

/// Relative gap under which the design matrix is treated as rank-deficient.
const RANK_GAP: Real = 1e-8;

/// Normalized eight-point algorithm for the fundamental matrix.
///
/// `pts1` and `pts2` are corresponding pixel points in two images, matched
/// by index. Both sets are Hartley-normalized before the linear solve and
/// the result is denormalized, so the returned matrix satisfies
/// `x₂ᵀ F x₁ = 0` in pixel coordinates (up to numerical error) and is
/// forced to rank 2.
///
/// Returns [`EpipolarError::DegenerateInput`] when the correspondences do
/// not determine `F` uniquely, detected as a collapsed second-smallest
/// singular value of the design matrix.
pub fn fundamental_8point(pts1: &[Pt2], pts2: &[Pt2]) -> Result<Mat3, EpipolarError> {
    let n = pts1.len();
    if pts2.len() != n {
        return Err(EpipolarError::LengthMismatch(n, pts2.len()));
    }
    if n < 8 {
        return Err(EpipolarError::NotEnoughPoints(n));
    }

    let norm1 = normalize_points(pts1).map_err(degenerate)?;
    let norm2 = normalize_points(pts2).map_err(degenerate)?;

    // Design matrix A (n x 9) for x2^T F x1 = 0.
    let mut a = DMatrix::<Real>::zeros(n, 9);
    for (i, (p1, p2)) in norm1.points.iter().zip(norm2.points.iter()).enumerate() {
        let x = p1.x;
        let y = p1.y;
        let xp = p2.x;
        let yp = p2.y;

        a[(i, 0)] = xp * x;
        a[(i, 1)] = xp * y;
        a[(i, 2)] = xp;
        a[(i, 3)] = yp * x;
        a[(i, 4)] = yp * y;
        a[(i, 5)] = yp;
        a[(i, 6)] = x;
        a[(i, 7)] = y;
        a[(i, 8)] = 1.0;
    }

    // Pad to square so the SVD exposes the full 9-column row space.
    let mut a_work = a;
    if a_work.nrows() < a_work.ncols() {
        let rows = a_work.nrows();
        let cols = a_work.ncols();
        let mut a_pad = DMatrix::<Real>::zeros(cols, cols);
        a_pad.view_mut((0, 0), (rows, cols)).copy_from(&a_work);
        a_work = a_pad;
    }

    let svd = a_work.svd(true, true);
    let v_t = svd.v_t.as_ref().ok_or(EpipolarError::SvdFailed)?;
    let sv = &svd.singular_values;

    // A must have rank 8: a collapsed eighth singular value means the
    // nullspace is more than one-dimensional and F is not unique.
    let last = sv.len() - 1;
    if sv[0] <= Real::EPSILON || sv[last - 1] <= RANK_GAP * sv[0] {
        return Err(EpipolarError::DegenerateInput);
    }

    let f_vec = v_t.row(last);
    let mut f = Mat3::zeros();
    for r in 0..3 {
        for c in 0..3 {
            f[(r, c)] = f_vec[3 * r + c];
        }
    }

    // Enforce the rank-2 constraint.
    let svd_f = f.svd(true, true);
    let u = svd_f.u.ok_or(EpipolarError::SvdFailed)?;
    let mut s = svd_f.singular_values;
    let v_t_f = svd_f.v_t.ok_or(EpipolarError::SvdFailed)?;
    s[2] = 0.0;
    let s_mat = SMatrix::<Real, 3, 3>::from_diagonal(&s);
    f = u * s_mat * v_t_f;

    // Denormalize: F = T2^T F_hat T1.
    Ok(norm2.transform.transpose() * f * norm1.transform)
}

fn degenerate(_: NormalizationError) -> EpipolarError {
    EpipolarError::DegenerateInput
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaze_sfm_core::math::to_homogeneous;
    use gaze_sfm_core::synthetic::{relative_pose, two_view_scene};
    use gaze_sfm_core::{CameraIntrinsics, Vec3};

    fn test_k() -> CameraIntrinsics {
        CameraIntrinsics::new(800.0, 780.0, 640.0, 360.0)
    }

    fn max_epipolar_residual(f: &Mat3, pts1: &[Pt2], pts2: &[Pt2]) -> Real {
        pts1.iter()
            .zip(pts2.iter())
            .map(|(p1, p2)| {
                let v = to_homogeneous(p2).transpose() * f * to_homogeneous(p1);
                v[0].abs()
            })
            .fold(0.0, Real::max)
    }

    #[test]
    fn exact_data_gives_small_residual() {
        let k = test_k();
        let pose = relative_pose(0.02, 0.1, -0.03, Vec3::new(0.1, 0.02, 0.01));
        let scene = two_view_scene(12, pose, &k);

        let f = fundamental_8point(&scene.pixels_first, &scene.pixels_second).unwrap();
        let scale = f.norm();
        assert!(scale > 0.0);

        let resid = max_epipolar_residual(&(f / scale), &scene.pixels_first, &scene.pixels_second);
        assert!(resid < 1e-7, "epipolar residual too large: {resid}");
    }

    #[test]
    fn estimate_has_rank_two() {
        let k = test_k();
        let pose = relative_pose(0.0, 0.08, 0.0, Vec3::new(0.15, 0.0, 0.0));
        let scene = two_view_scene(16, pose, &k);

        let f = fundamental_8point(&scene.pixels_first, &scene.pixels_second).unwrap();
        let sv = f.svd(false, false).singular_values;
        assert!(sv[2].abs() < 1e-10 * sv[0], "third singular value: {}", sv[2]);
    }

    #[test]
    fn eight_points_are_sufficient() {
        let k = test_k();
        let pose = relative_pose(0.03, 0.07, -0.02, Vec3::new(0.12, 0.01, 0.03));
        let scene = two_view_scene(8, pose, &k);

        let f = fundamental_8point(&scene.pixels_first, &scene.pixels_second).unwrap();
        let resid =
            max_epipolar_residual(&(f / f.norm()), &scene.pixels_first, &scene.pixels_second);
        assert!(resid < 1e-7, "epipolar residual too large: {resid}");

        let sv = f.svd(false, false).singular_values;
        assert!(sv[2].abs() < 1e-10 * sv[0]);
    }

    #[test]
    fn seven_points_are_rejected() {
        let k = test_k();
        let pose = relative_pose(0.0, 0.05, 0.0, Vec3::new(0.1, 0.0, 0.0));
        let scene = two_view_scene(8, pose, &k);

        let err = fundamental_8point(&scene.pixels_first[..7], &scene.pixels_second[..7])
            .unwrap_err();
        assert_eq!(err, EpipolarError::NotEnoughPoints(7));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let k = test_k();
        let pose = relative_pose(0.0, 0.05, 0.0, Vec3::new(0.1, 0.0, 0.0));
        let scene = two_view_scene(10, pose, &k);

        let err = fundamental_8point(&scene.pixels_first, &scene.pixels_second[..9]).unwrap_err();
        assert_eq!(err, EpipolarError::LengthMismatch(10, 9));
    }

    #[test]
    fn coincident_points_are_degenerate() {
        let pts1 = vec![Pt2::new(100.0, 100.0); 8];
        let pts2 = vec![Pt2::new(110.0, 100.0); 8];
        assert_eq!(
            fundamental_8point(&pts1, &pts2).unwrap_err(),
            EpipolarError::DegenerateInput
        );
    }

    #[test]
    fn repeated_correspondences_are_degenerate() {
        let k = test_k();
        let pose = relative_pose(0.0, 0.05, 0.0, Vec3::new(0.1, 0.0, 0.0));
        let scene = two_view_scene(4, pose, &k);

        // Duplicate four distinct matches to reach eight rows of rank <= 4.
        let mut pts1 = scene.pixels_first.clone();
        let mut pts2 = scene.pixels_second.clone();
        pts1.extend_from_slice(&scene.pixels_first);
        pts2.extend_from_slice(&scene.pixels_second);

        assert_eq!(
            fundamental_8point(&pts1, &pts2).unwrap_err(),
            EpipolarError::DegenerateInput
        );
    }
}
