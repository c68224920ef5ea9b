//! Core math and geometry primitives for `gaze-sfm`.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Vec3`, `Pt2`, ...),
//! - rigid transform utilities with an explicit frame-naming convention,
//! - the pinhole camera intrinsics model,
//! - gaze ray data types,
//! - deterministic synthetic two-view scenes for testing.

/// Linear algebra type aliases and helpers.
pub mod math;
/// Pinhole camera intrinsics.
pub mod intrinsics;
/// Gaze ray type.
pub mod ray;
/// Deterministic synthetic two-view scenes for tests.
pub mod synthetic;
/// Rigid transform utilities and frame conventions.
pub mod transform;

pub use intrinsics::CameraIntrinsics;
pub use math::*;
pub use ray::GazeRay;
