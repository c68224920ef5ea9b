//! Two-view linear triangulation.
//!
//! DLT formulation on normalized image coordinates: each observation
//! contributes two rows of the form `u·P₃ − P₁` to a 4-column design
//! matrix whose nullspace is the homogeneous scene point.

use nalgebra::{DMatrix, Matrix3x4};
use thiserror::Error;

use gaze_sfm_core::transform::rotation_matrix;
use gaze_sfm_core::{Iso3, Pt2, Pt3, Real};

/// Failure modes of linear triangulation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TriangulationError {
    /// The SVD routine did not return the requested factors.
    #[error("SVD did not converge")]
    SvdFailed,
    /// The homogeneous solution has a vanishing fourth component; the rays
    /// are (numerically) parallel and meet at infinity.
    #[error("triangulated point lies at infinity")]
    PointAtInfinity,
}

/// A triangulated scene point with its depth in both views.
#[derive(Clone, Copy, Debug)]
pub struct TriangulatedPoint {
    /// The point in the first view's camera frame.
    pub point: Pt3,
    /// Z coordinate in the first view. Positive means in front.
    pub depth_first: Real,
    /// Z coordinate in the second view.
    pub depth_second: Real,
}

/// Triangulate one correspondence observed in two views.
///
/// `x1` and `x2` are normalized image coordinates (pixels mapped through
/// `K⁻¹`), and `t_second_first` is the relative pose with
/// `p₂ = t_second_first * p₁`. The first view's projection is `[I | 0]`,
/// the second `[R | t]`; the result is expressed in the first view's frame.
pub fn triangulate_two_view(
    t_second_first: &Iso3,
    x1: &Pt2,
    x2: &Pt2,
) -> Result<TriangulatedPoint, TriangulationError> {
    let mut p2 = Matrix3x4::<Real>::zeros();
    p2.fixed_view_mut::<3, 3>(0, 0)
        .copy_from(&rotation_matrix(t_second_first));
    p2.fixed_view_mut::<3, 1>(0, 3)
        .copy_from(&t_second_first.translation.vector);

    let p1 = Matrix3x4::<Real>::identity();

    let mut a = DMatrix::<Real>::zeros(4, 4);
    a.row_mut(0).copy_from(&(x1.x * p1.row(2) - p1.row(0)));
    a.row_mut(1).copy_from(&(x1.y * p1.row(2) - p1.row(1)));
    a.row_mut(2).copy_from(&(x2.x * p2.row(2) - p2.row(0)));
    a.row_mut(3).copy_from(&(x2.y * p2.row(2) - p2.row(1)));

    let svd = a.svd(true, true);
    let v_t = svd.v_t.ok_or(TriangulationError::SvdFailed)?;
    let x_h = v_t.row(v_t.nrows() - 1);

    // x_h is a unit vector, so the fourth component can be compared
    // against an absolute threshold.
    let w = x_h[3];
    if w.abs() <= 1e-12 {
        return Err(TriangulationError::PointAtInfinity);
    }

    let point = Pt3::new(x_h[0] / w, x_h[1] / w, x_h[2] / w);
    let in_second = t_second_first * point;

    Ok(TriangulatedPoint {
        point,
        depth_first: point.z,
        depth_second: in_second.z,
    })
}
