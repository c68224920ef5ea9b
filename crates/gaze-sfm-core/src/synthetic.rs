//! Deterministic synthetic two-view scenes for testing.
//!
//! Builds small 3D point clouds in the first camera's frame, applies a known
//! relative pose, and projects into both views with given intrinsics. All
//! generators are deterministic so tests are reproducible without seeding.

use nalgebra::{Rotation3, Translation3};

use crate::intrinsics::CameraIntrinsics;
use crate::math::{Iso3, Pt2, Pt3, Real, Vec3};

/// A synthetic scene observed by two cameras with known relative motion.
#[derive(Clone, Debug)]
pub struct TwoViewScene {
    /// Scene points in the first camera's frame.
    pub points: Vec<Pt3>,
    /// Ground-truth relative pose: `p_second = t_second_first * p_first`.
    pub t_second_first: Iso3,
    /// Pixel projections in the first view, one per scene point.
    pub pixels_first: Vec<Pt2>,
    /// Pixel projections in the second view, one per scene point.
    pub pixels_second: Vec<Pt2>,
}

/// Generate `n` deterministic scene points with varying depth.
///
/// The points span X and Y around the optical axis and cycle through several
/// depths so they are never coplanar, which keeps the eight-point system
/// well-conditioned.
pub fn depth_varying_points(n: usize) -> Vec<Pt3> {
    (0..n)
        .map(|i| {
            let fi = i as Real;
            let x = -0.3 + 0.13 * (i % 5) as Real;
            let y = -0.2 + 0.11 * (i % 4) as Real;
            let z = 2.0 + 0.25 * ((i * 3) % 7) as Real + 0.01 * fi;
            Pt3::new(x, y, z)
        })
        .collect()
}

/// Build the relative pose from Euler angles (radians) and a translation.
pub fn relative_pose(roll: Real, pitch: Real, yaw: Real, translation: Vec3) -> Iso3 {
    Iso3::from_parts(
        Translation3::from(translation),
        Rotation3::from_euler_angles(roll, pitch, yaw).into(),
    )
}

/// Project scene points (first-camera frame) into both views.
///
/// Returns `None` if any point projects from non-positive depth in either
/// view; synthetic scenes are expected to stay in front of both cameras.
pub fn project_into_views(
    points: &[Pt3],
    t_second_first: &Iso3,
    k: &CameraIntrinsics,
) -> Option<(Vec<Pt2>, Vec<Pt2>)> {
    let mut first = Vec::with_capacity(points.len());
    let mut second = Vec::with_capacity(points.len());

    for p in points {
        let q = t_second_first * p;
        if p.z <= 0.0 || q.z <= 0.0 {
            return None;
        }
        first.push(k.normalized_to_pixel(&Pt2::new(p.x / p.z, p.y / p.z)));
        second.push(k.normalized_to_pixel(&Pt2::new(q.x / q.z, q.y / q.z)));
    }

    Some((first, second))
}

/// Generate a full two-view scene with `n` depth-varying points.
///
/// # Panics
///
/// Panics if the requested motion pushes a generated point behind either
/// camera; the default point cloud tolerates the small rotations and
/// baselines used in tests.
pub fn two_view_scene(n: usize, t_second_first: Iso3, k: &CameraIntrinsics) -> TwoViewScene {
    let points = depth_varying_points(n);
    let (pixels_first, pixels_second) = project_into_views(&points, &t_second_first, k)
        .expect("synthetic scene point behind a camera");
    TwoViewScene {
        points,
        t_second_first,
        pixels_first,
        pixels_second,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_k() -> CameraIntrinsics {
        CameraIntrinsics::new(800.0, 780.0, 640.0, 360.0)
    }

    #[test]
    fn points_are_not_coplanar() {
        let pts = depth_varying_points(8);
        // Fit z = ax + by + c by checking that depths differ across the set.
        let zs: Vec<Real> = pts.iter().map(|p| p.z).collect();
        let min = zs.iter().cloned().fold(Real::INFINITY, Real::min);
        let max = zs.iter().cloned().fold(Real::NEG_INFINITY, Real::max);
        assert!(max - min > 0.5);
    }

    #[test]
    fn projections_are_consistent() {
        let k = test_k();
        let pose = relative_pose(0.0, 0.05, 0.0, Vec3::new(0.1, 0.0, 0.0));
        let scene = two_view_scene(10, pose, &k);
        assert_eq!(scene.pixels_first.len(), 10);
        assert_eq!(scene.pixels_second.len(), 10);

        // Re-project the first point manually.
        let p = scene.points[0];
        let expected = k.normalized_to_pixel(&Pt2::new(p.x / p.z, p.y / p.z));
        assert_relative_eq!(scene.pixels_first[0], expected, epsilon = 1e-12);
    }

    #[test]
    fn identity_motion_projects_identically() {
        let k = test_k();
        let scene = two_view_scene(8, Iso3::identity(), &k);
        for (a, b) in scene.pixels_first.iter().zip(scene.pixels_second.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }
}
