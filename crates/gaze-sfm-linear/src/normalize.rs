//! Hartley normalization of 2D correspondences.
//!
//! Centers points at the origin and scales them so the mean distance from
//! the origin is `√2`. Conditioning the data this way keeps the eight-point
//! design matrix well-behaved when the input lives in pixel coordinates.

use thiserror::Error;

use gaze_sfm_core::{Mat3, Pt2, Real};

/// Failure modes of point-set normalization.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizationError {
    /// The input slice was empty.
    #[error("cannot normalize an empty point set")]
    Empty,
    /// All points coincide; no finite scale restores unit spread.
    #[error("point set has zero spread, normalization scale is undefined")]
    DegenerateScale,
}

/// Result of Hartley normalization.
///
/// `transform` is the 3×3 similarity `T` with `p_norm = T * p_hom`; the
/// normalized points satisfy `mean(p_norm) = 0` and
/// `mean(‖p_norm‖) = √2`.
#[derive(Clone, Debug)]
pub struct Normalization {
    /// Conditioned points.
    pub points: Vec<Pt2>,
    /// Similarity transform applied to the input.
    pub transform: Mat3,
}

/// Normalize a 2D point set for DLT-style estimation.
///
/// Returns [`NormalizationError::DegenerateScale`] when the mean distance
/// from the centroid vanishes, which happens exactly when every point is
/// identical.
pub fn normalize_points(points: &[Pt2]) -> Result<Normalization, NormalizationError> {
    if points.is_empty() {
        return Err(NormalizationError::Empty);
    }

    let n = points.len() as Real;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for p in points {
        cx += p.x;
        cy += p.y;
    }
    cx /= n;
    cy /= n;

    let mut mean_dist = 0.0;
    for p in points {
        let dx = p.x - cx;
        let dy = p.y - cy;
        mean_dist += (dx * dx + dy * dy).sqrt();
    }
    mean_dist /= n;

    if mean_dist <= Real::EPSILON {
        return Err(NormalizationError::DegenerateScale);
    }

    let scale = (2.0 as Real).sqrt() / mean_dist;
    #[rustfmt::skip]
    let transform = Mat3::new(
        scale, 0.0,   -scale * cx,
        0.0,   scale, -scale * cy,
        0.0,   0.0,   1.0,
    );

    let norm = points
        .iter()
        .map(|p| Pt2::new((p.x - cx) * scale, (p.y - cy) * scale))
        .collect();

    Ok(Normalization {
        points: norm,
        transform,
    })
}
