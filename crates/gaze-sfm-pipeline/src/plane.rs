//! Screen plane calibration from accumulated world-frame samples.
//!
//! The screen is modeled as the best-fit plane through a set of calibration
//! samples. The fit is a total-least-squares SVD: the plane passes through
//! the centroid and its normal is the direction of least variance.

use nalgebra::DMatrix;
use thiserror::Error;

use gaze_sfm_core::transform::iso_from_parts;
use gaze_sfm_core::{Iso3, Mat3, Pt2, Pt3, Real, Vec3};

/// Relative singular-value gap under which the samples are collinear.
const COLLINEAR_GAP: Real = 1e-8;

/// Cosine tolerance for a plane normal orthogonal to the world +Z axis.
const ORIENTATION_TOL: Real = 1e-6;

/// Failure modes of plane calibration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalibrationError {
    /// Fewer than three samples were accumulated.
    #[error("plane fit needs at least 3 samples, got {0}")]
    Incomplete(usize),
    /// The samples lie on a line (or a point); the plane is not unique.
    #[error("calibration samples are collinear")]
    Collinear,
    /// The fitted normal is orthogonal to the world +Z axis, so the sign
    /// convention (normal towards the initial camera) is undefined.
    #[error("plane normal is orthogonal to the initial optical axis")]
    DegenerateOrientation,
    /// The calibrator was already frozen.
    #[error("calibration is already frozen")]
    AlreadyFrozen,
    /// The SVD routine did not return the requested factors.
    #[error("SVD did not converge")]
    SvdFailed,
}

/// An immutable calibrated screen frame.
///
/// The screen plane is `z = 0` in screen coordinates; the +Z axis is the
/// plane normal with a non-negative component along the world +Z axis
/// (the initial camera's optical axis), the +X axis is the world X axis
/// projected into the plane (world Y when X is parallel to the normal),
/// and the +Y axis completes a right-handed frame.
#[derive(Clone, Debug)]
pub struct ScreenFrame {
    world_t_screen: Iso3,
    screen_t_world: Iso3,
}

impl ScreenFrame {
    fn new(world_t_screen: Iso3) -> Self {
        Self {
            screen_t_world: world_t_screen.inverse(),
            world_t_screen,
        }
    }

    /// Transform mapping screen coordinates into world coordinates.
    pub fn world_t_screen(&self) -> &Iso3 {
        &self.world_t_screen
    }

    /// Transform mapping world coordinates into screen coordinates.
    pub fn screen_t_world(&self) -> &Iso3 {
        &self.screen_t_world
    }

    /// Express a world point in screen coordinates.
    pub fn to_screen(&self, p_world: &Pt3) -> Pt3 {
        self.screen_t_world * p_world
    }

    /// The screen origin (sample centroid) in world coordinates.
    pub fn origin_world(&self) -> Pt3 {
        Pt3::from(self.world_t_screen.translation.vector)
    }

    /// In-plane coordinates of a world point, dropping the out-of-plane
    /// component.
    pub fn in_plane(&self, p_world: &Pt3) -> Pt2 {
        let p = self.to_screen(p_world);
        Pt2::new(p.x, p.y)
    }
}

/// Accumulates world-frame samples and fits the screen plane.
#[derive(Clone, Debug, Default)]
pub struct PlaneCalibrator {
    samples: Vec<Pt3>,
    frozen: bool,
}

impl PlaneCalibrator {
    /// Empty calibrator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one world-frame calibration sample.
    ///
    /// Returns [`CalibrationError::AlreadyFrozen`] once the calibrator has
    /// been frozen.
    pub fn add_sample(&mut self, p_world: Pt3) -> Result<(), CalibrationError> {
        if self.frozen {
            return Err(CalibrationError::AlreadyFrozen);
        }
        self.samples.push(p_world);
        Ok(())
    }

    /// Number of accumulated samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no samples have been accumulated yet.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Whether [`freeze`](Self::freeze) has been called successfully.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Fit the plane through the current samples without freezing.
    pub fn fit(&self) -> Result<ScreenFrame, CalibrationError> {
        let n = self.samples.len();
        if n < 3 {
            return Err(CalibrationError::Incomplete(n));
        }

        let mut centroid = Vec3::zeros();
        for p in &self.samples {
            centroid += p.coords;
        }
        centroid /= n as Real;

        // Centered samples as columns; the left singular vector of the
        // smallest singular value is the least-variance direction.
        let mut a = DMatrix::<Real>::zeros(3, n);
        for (i, p) in self.samples.iter().enumerate() {
            a.column_mut(i).copy_from(&(p.coords - centroid));
        }

        let svd = a.svd(true, false);
        let u = svd.u.ok_or(CalibrationError::SvdFailed)?;
        let sv = &svd.singular_values;

        if sv[0] <= Real::EPSILON || sv[1] <= COLLINEAR_GAP * sv[0] {
            return Err(CalibrationError::Collinear);
        }

        let mut normal = Vec3::new(u[(0, 2)], u[(1, 2)], u[(2, 2)]).normalize();

        // Orient the normal along the initial optical axis.
        if normal.z.abs() < ORIENTATION_TOL {
            return Err(CalibrationError::DegenerateOrientation);
        }
        if normal.z < 0.0 {
            normal = -normal;
        }

        let ez = normal;
        let mut ex = Vec3::x() - Vec3::x().dot(&ez) * ez;
        if ex.norm() < ORIENTATION_TOL {
            ex = Vec3::y() - Vec3::y().dot(&ez) * ez;
        }
        let ex = ex.normalize();
        let ey = ez.cross(&ex);

        let rotation = Mat3::from_columns(&[ex, ey, ez]);
        Ok(ScreenFrame::new(iso_from_parts(&rotation, &centroid)))
    }

    /// Fit the plane and freeze the calibrator.
    ///
    /// A successful freeze is final: further samples and repeated freezes
    /// are rejected with [`CalibrationError::AlreadyFrozen`]. A failed fit
    /// leaves the calibrator open.
    pub fn freeze(&mut self) -> Result<ScreenFrame, CalibrationError> {
        if self.frozen {
            return Err(CalibrationError::AlreadyFrozen);
        }
        let frame = self.fit()?;
        self.frozen = true;
        Ok(frame)
    }
}
