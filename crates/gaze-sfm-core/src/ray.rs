//! Gaze ray type.

use crate::math::{Iso3, Pt3, Real, Vec3};

/// A 3D half-line: eye position plus unit viewing direction.
///
/// Rebuilt every frame from the external gaze estimator's output, expressed
/// in the current camera frame.
#[derive(Clone, Copy, Debug)]
pub struct GazeRay {
    /// Eye position.
    pub origin: Pt3,
    /// Unit viewing direction.
    pub direction: Vec3,
}

impl GazeRay {
    /// Build a ray, normalizing the direction.
    ///
    /// Returns `None` if the direction norm is below `1e-12` and cannot be
    /// normalized.
    pub fn new(origin: Pt3, direction: Vec3) -> Option<Self> {
        let norm = direction.norm();
        if norm < 1e-12 {
            return None;
        }
        Some(Self {
            origin,
            direction: direction / norm,
        })
    }

    /// The point `origin + t * direction`.
    pub fn at(&self, t: Real) -> Pt3 {
        self.origin + t * self.direction
    }

    /// Express the ray in another frame: the origin transforms as a point,
    /// the direction as a vector.
    pub fn transformed(&self, t_target_source: &Iso3) -> Self {
        Self {
            origin: t_target_source * self.origin,
            direction: t_target_source * self.direction,
        }
    }
}
