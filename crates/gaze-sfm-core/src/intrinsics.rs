//! Pinhole camera intrinsics.

use serde::{Deserialize, Serialize};

use crate::math::{Mat3, Pt2, Real};

/// Standard pinhole intrinsics with optional skew.
///
/// The intrinsics are loaded once per session from an external calibration
/// source and treated as immutable.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    /// Focal length in pixels along X.
    pub fx: Real,
    /// Focal length in pixels along Y.
    pub fy: Real,
    /// Principal point X coordinate in pixels.
    pub cx: Real,
    /// Principal point Y coordinate in pixels.
    pub cy: Real,
    /// Skew term (typically 0).
    pub skew: Real,
}

impl CameraIntrinsics {
    /// Skew-free intrinsics from focal lengths and principal point.
    pub fn new(fx: Real, fy: Real, cx: Real, cy: Real) -> Self {
        Self {
            fx,
            fy,
            cx,
            cy,
            skew: 0.0,
        }
    }

    /// Return the 3×3 camera intrinsics matrix K.
    #[rustfmt::skip]
    pub fn k_matrix(&self) -> Mat3 {
        Mat3::new(
            self.fx, self.skew, self.cx,
            0.0,     self.fy,   self.cy,
            0.0,     0.0,       1.0,
        )
    }

    /// Convert pixel coordinates into normalized image coordinates
    /// (the `z = 1` plane of the camera frame).
    pub fn pixel_to_normalized(&self, pixel: &Pt2) -> Pt2 {
        let y = (pixel.y - self.cy) / self.fy;
        let x = (pixel.x - self.cx - self.skew * y) / self.fx;
        Pt2::new(x, y)
    }

    /// Convert normalized image coordinates into pixel coordinates.
    pub fn normalized_to_pixel(&self, norm: &Pt2) -> Pt2 {
        let u = self.fx * norm.x + self.skew * norm.y + self.cx;
        let v = self.fy * norm.y + self.cy;
        Pt2::new(u, v)
    }
}
