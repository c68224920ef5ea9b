//! End-to-end synthetic session: track head motion, calibrate the screen
//! plane from head positions, and project gaze rays to pixels.
//!
//! Run with `cargo run --example synthetic_session`.

use anyhow::Result;

use gaze_sfm::prelude::*;
use gaze_sfm::synthetic::{relative_pose, two_view_scene};

fn main() -> Result<()> {
    env_logger::init();

    let intrinsics = CameraIntrinsics::new(800.0, 780.0, 640.0, 360.0);
    let mut config = SessionConfig::new(intrinsics);
    config.screen = Some(ScreenGeometry {
        width_px: 1920,
        height_px: 1080,
        width_mm: 2.0,
        height_mm: 1.125,
    });
    let mut session = GazeSession::new(config);

    // Calibration phase: the head visits four in-plane positions.
    session.record_calibration_sample()?;
    let calib_steps = [
        relative_pose(0.0, 0.0, 0.0, Vec3::new(-1.0, 0.0, 0.0)),
        relative_pose(0.0, 0.0, 0.0, Vec3::new(0.0, -1.0, 0.0)),
        relative_pose(
            0.0,
            0.0,
            0.0,
            Vec3::new(0.5_f64.sqrt(), 0.5_f64.sqrt(), 0.0),
        ),
    ];
    for step in &calib_steps {
        let scene = two_view_scene(12, *step, &intrinsics);
        match session.process_frame_pair(&scene.pixels_first, &scene.pixels_second, None) {
            FrameOutcome::Tracked(update) => {
                println!(
                    "calibration step tracked, head at {:?}",
                    update.t_world_cam.translation.vector
                );
            }
            FrameOutcome::Rejected(reason) => {
                println!("calibration step rejected: {reason:?}");
            }
        }
        session.record_calibration_sample()?;
    }
    session.freeze_calibration()?;
    println!("screen plane frozen");

    // Tracking phase: step back from the screen and look straight ahead.
    let gaze = GazeRay::new(Pt3::origin(), Vec3::new(0.0, 0.0, 1.0))
        .expect("non-zero gaze direction");
    let back = relative_pose(0.0, 0.0, 0.0, Vec3::new(0.0, 0.0, 1.0));
    for _ in 0..5 {
        let scene = two_view_scene(12, back, &intrinsics);
        if let FrameOutcome::Tracked(update) =
            session.process_frame_pair(&scene.pixels_first, &scene.pixels_second, Some(&gaze))
        {
            match (update.projection, update.pixel) {
                (Some(ScreenProjection::Hit(p)), Some(px)) => {
                    println!("gaze hits screen at {p:?} -> pixel {px:?}");
                }
                (Some(other), _) => println!("gaze off screen: {other:?}"),
                _ => println!("no gaze data"),
            }
        }
    }

    for event in session.off_screen_events() {
        println!(
            "off-screen event: frames {}..={} towards {:?}",
            event.start_frame, event.end_frame, event.direction
        );
    }

    println!("{}", session.summary_json()?);
    Ok(())
}
