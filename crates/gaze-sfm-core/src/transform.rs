//! Rigid transform utilities and frame conventions.
//!
//! All rigid transforms in this library are [`Iso3`] values named with the
//! `t_target_source` convention: `t_world_cam` maps a point expressed in the
//! camera frame into the world frame,
//!
//! ```text
//! p_world = t_world_cam * p_cam
//! ```
//!
//! Three frame families appear in the pipeline:
//!
//! - **camera frame** `cam` — per-frame head/camera frame, X-right, Y-down,
//!   Z-forward along the optical axis (the computer-vision convention),
//! - **world frame** `world` — the first camera frame of a session; the pose
//!   chain accumulates `t_world_cam` here,
//! - **screen frame** `screen` — derived by plane calibration; the calibrated
//!   plane is `z = 0` and its unit normal is the +Z axis.
//!
//! Composition reads right-to-left: `t_world_cur = t_world_prev * t_prev_cur`.

use nalgebra::{Rotation3, Translation3, UnitQuaternion};

use crate::math::{Iso3, Mat3, Mat4, Pt3, Real, Vec3};

/// Build a rigid transform from a rotation matrix and a translation vector.
///
/// The rotation matrix is assumed orthonormal with `det = +1`; it is wrapped
/// without re-orthonormalization.
pub fn iso_from_parts(rotation: &Mat3, translation: &Vec3) -> Iso3 {
    let rot = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(*rotation));
    Iso3::from_parts(Translation3::from(*translation), rot)
}

/// Return the 4×4 homogeneous matrix of a rigid transform.
///
/// The top-left 3×3 block is the rotation, the top-right 3×1 block the
/// translation, and the last row `[0, 0, 0, 1]`.
pub fn iso_to_mat4(iso: &Iso3) -> Mat4 {
    iso.to_homogeneous()
}

/// Reconstruct a rigid transform from a 4×4 homogeneous matrix.
///
/// The rotation block is projected onto SO(3) via the unit-quaternion
/// constructor, which absorbs small numerical drift; the last row is ignored.
pub fn iso_from_mat4(m: &Mat4) -> Iso3 {
    let r = m.fixed_view::<3, 3>(0, 0).into_owned();
    let t = Vec3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)]);
    iso_from_parts(&r, &t)
}

/// Rotation matrix of a rigid transform.
pub fn rotation_matrix(iso: &Iso3) -> Mat3 {
    iso.rotation.to_rotation_matrix().into_inner()
}

/// Position of the transform's source-frame origin in the target frame.
///
/// For `t_world_cam` this is the camera center in world coordinates.
pub fn origin_in_target(iso: &Iso3) -> Pt3 {
    Pt3::from(iso.translation.vector)
}

/// Check that a 3×3 matrix is a proper rotation within `tol`.
///
/// Verifies `RᵀR ≈ I` and `det R ≈ +1`.
pub fn is_proper_rotation(r: &Mat3, tol: Real) -> bool {
    let orth_err = (r.transpose() * r - Mat3::identity()).norm();
    orth_err <= tol && (r.determinant() - 1.0).abs() <= tol
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn sample_iso() -> Iso3 {
        let rot = Rotation3::from_euler_angles(0.2, -0.1, 0.4);
        iso_from_parts(rot.matrix(), &Vec3::new(0.5, -0.25, 1.5))
    }

    #[test]
    fn mat4_roundtrip() {
        let t = sample_iso();
        let m = iso_to_mat4(&t);
        assert_eq!(m[(3, 0)], 0.0);
        assert_eq!(m[(3, 3)], 1.0);
        let back = iso_from_mat4(&m);
        let p = Pt3::new(0.3, 0.7, 2.0);
        assert_relative_eq!(t * p, back * p, epsilon = 1e-12);
    }

    #[test]
    fn compose_then_invert_is_identity() {
        let t = sample_iso();
        let id = t * t.inverse();
        let p = Pt3::new(-1.0, 2.0, 0.5);
        assert_relative_eq!(id * p, p, epsilon = 1e-12);
    }

    #[test]
    fn vectors_ignore_translation() {
        let t = sample_iso();
        let v = Vector3::new(0.0, 0.0, 1.0);
        let moved = t * v;
        assert_relative_eq!(moved.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(moved, rotation_matrix(&t) * v, epsilon = 1e-12);
    }

    #[test]
    fn rotation_is_proper() {
        let t = sample_iso();
        assert!(is_proper_rotation(&rotation_matrix(&t), 1e-10));
        let mut bad = rotation_matrix(&t);
        bad.column_mut(2).neg_mut();
        assert!(!is_proper_rotation(&bad, 1e-10));
    }
}
