//! Physical screen geometry and millimetre-to-pixel mapping.

use serde::{Deserialize, Serialize};

use gaze_sfm_core::{Pt2, Real};

/// Direction in which a gaze point leaves the screen bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OffScreenDirection {
    Left,
    Right,
    Above,
    Below,
}

/// Physical and pixel dimensions of the screen.
///
/// Screen-frame coordinates are millimetres with the origin at the
/// top-left corner, x growing right and y growing down, matching the
/// pixel raster.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ScreenGeometry {
    /// Horizontal resolution in pixels.
    pub width_px: u32,
    /// Vertical resolution in pixels.
    pub height_px: u32,
    /// Physical width in millimetres.
    pub width_mm: Real,
    /// Physical height in millimetres.
    pub height_mm: Real,
}

impl ScreenGeometry {
    /// Map top-left-origin millimetre coordinates to pixel coordinates.
    pub fn mm_to_px(&self, p_mm: &Pt2) -> Pt2 {
        Pt2::new(
            p_mm.x * self.width_px as Real / self.width_mm,
            p_mm.y * self.height_px as Real / self.height_mm,
        )
    }

    /// Map centre-origin millimetre coordinates (x right, y up) to pixel
    /// coordinates. This is the natural frame of the calibrated plane,
    /// whose origin is the sample centroid.
    pub fn centered_mm_to_px(&self, p_mm: &Pt2) -> Pt2 {
        self.mm_to_px(&Pt2::new(
            p_mm.x + 0.5 * self.width_mm,
            0.5 * self.height_mm - p_mm.y,
        ))
    }

    /// Whether a pixel coordinate lies inside the screen bounds.
    pub fn contains(&self, px: &Pt2) -> bool {
        self.classify(px).is_none()
    }

    /// Classify an out-of-bounds pixel coordinate by the side it exceeds.
    ///
    /// Returns `None` for on-screen points. Horizontal excess takes
    /// precedence when a corner is exceeded in both axes.
    pub fn classify(&self, px: &Pt2) -> Option<OffScreenDirection> {
        if px.x < 0.0 {
            Some(OffScreenDirection::Left)
        } else if px.x > self.width_px as Real {
            Some(OffScreenDirection::Right)
        } else if px.y < 0.0 {
            Some(OffScreenDirection::Above)
        } else if px.y > self.height_px as Real {
            Some(OffScreenDirection::Below)
        } else {
            None
        }
    }
}
