//! Gaze ray projection onto the calibrated screen plane.

use thiserror::Error;

use gaze_sfm_core::{GazeRay, Iso3, Pt2, Real};

use crate::plane::ScreenFrame;

/// Cosine tolerance under which a ray is parallel to the screen plane.
const PARALLEL_TOL: Real = 1e-9;

/// Failure modes of gaze projection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectionError {
    /// The screen plane has not been calibrated yet.
    #[error("screen plane is not calibrated")]
    NotCalibrated,
}

/// Outcome of intersecting a gaze ray with the screen plane.
///
/// Every case carries explicit finite data; the projector never produces
/// NaN coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScreenProjection {
    /// The ray crosses the plane in front of the eye; in-plane coordinates
    /// of the intersection, in screen-frame units.
    Hit(Pt2),
    /// The ray's line crosses the plane behind the eye (the person looks
    /// away from the screen); coordinates of the backward intersection.
    Behind(Pt2),
    /// The ray is parallel to the plane within tolerance.
    Miss,
}

impl ScreenProjection {
    /// Whether this is a forward intersection.
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }

    /// Forward intersection coordinates, if any.
    pub fn point(&self) -> Option<Pt2> {
        match self {
            Self::Hit(p) => Some(*p),
            _ => None,
        }
    }
}

/// Projects world-frame gaze rays onto a frozen screen frame.
#[derive(Clone, Debug)]
pub struct GazeProjector {
    frame: ScreenFrame,
}

impl GazeProjector {
    /// Build a projector from a calibrated screen frame.
    pub fn new(frame: ScreenFrame) -> Self {
        Self { frame }
    }

    /// The underlying screen frame.
    pub fn frame(&self) -> &ScreenFrame {
        &self.frame
    }

    /// Intersect a world-frame gaze ray with the screen plane `z = 0`.
    pub fn project(&self, ray_world: &GazeRay) -> ScreenProjection {
        let ray = ray_world.transformed(self.frame.screen_t_world());

        if ray.direction.z.abs() < PARALLEL_TOL {
            return ScreenProjection::Miss;
        }

        let t = -ray.origin.z / ray.direction.z;
        let p = ray.at(t);
        let hit = Pt2::new(p.x, p.y);
        if t > 0.0 {
            ScreenProjection::Hit(hit)
        } else {
            ScreenProjection::Behind(hit)
        }
    }

    /// Project a camera-frame ray given the current head pose `t_world_cam`.
    pub fn project_from_camera(&self, ray_cam: &GazeRay, t_world_cam: &Iso3) -> ScreenProjection {
        self.project(&ray_cam.transformed(t_world_cam))
    }
}
