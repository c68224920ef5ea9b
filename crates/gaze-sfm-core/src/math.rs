//! Mathematical utilities and type definitions.
//!
//! This module provides the fundamental numeric types used throughout the
//! library and small helpers for homogeneous coordinates.

use nalgebra::{Isometry3, Matrix3, Matrix4, Point2, Point3, Vector2, Vector3};

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 2D vector with [`Real`] components.
pub type Vec2 = Vector2<Real>;
/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 2D point with [`Real`] coordinates.
pub type Pt2 = Point2<Real>;
/// 3D point with [`Real`] coordinates.
pub type Pt3 = Point3<Real>;
/// 3×3 matrix with [`Real`] entries.
pub type Mat3 = Matrix3<Real>;
/// 4×4 matrix with [`Real`] entries.
pub type Mat4 = Matrix4<Real>;
/// 3D rigid transform (SE(3)) using [`Real`].
pub type Iso3 = Isometry3<Real>;

/// Convert a 2D point in Euclidean coordinates into homogeneous coordinates.
///
/// Given a point `p = (x, y)`, returns the homogeneous vector `(x, y, 1)`.
pub fn to_homogeneous(p: &Pt2) -> Vec3 {
    Vec3::new(p.x, p.y, 1.0)
}

/// Convert a 3D homogeneous vector back to a 2D point.
///
/// The input is interpreted as `(x, y, w)` and the result is `(x / w, y / w)`.
/// The caller is responsible for ensuring that `w != 0`.
pub fn from_homogeneous(v: &Vec3) -> Pt2 {
    Pt2::new(v.x / v.z, v.y / v.z)
}

/// Constructs the skew-symmetric matrix `[v]×` such that `[v]× u = v × u`.
///
/// ```text
/// [v]× = |  0   -v_z   v_y |
///        |  v_z   0   -v_x |
///        | -v_y  v_x    0  |
/// ```
#[inline]
#[rustfmt::skip]
pub fn skew(v: &Vec3) -> Mat3 {
    Mat3::new(
        0.0, -v.z, v.y,
        v.z, 0.0, -v.x,
        -v.y, v.x, 0.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn homogeneous_roundtrip() {
        let p = Pt2::new(3.5, -1.25);
        let h = to_homogeneous(&p);
        assert_eq!(h.z, 1.0);
        let back = from_homogeneous(&h);
        assert_relative_eq!(back, p, epsilon = 1e-15);
    }

    #[test]
    fn skew_matches_cross_product() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let u = Vec3::new(-0.5, 4.0, 0.25);
        assert_relative_eq!(skew(&v) * u, v.cross(&u), epsilon = 1e-12);
    }

    #[test]
    fn skew_is_antisymmetric() {
        let v = Vec3::new(0.3, -0.7, 1.1);
        let s = skew(&v);
        assert_relative_eq!(s, -s.transpose(), epsilon = 1e-12);
    }
}
