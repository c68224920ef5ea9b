//! Off-screen event detection.
//!
//! Groups consecutive off-screen gaze frames into events. A frame trace is
//! a per-frame [`GazeStatus`]: frames classified off screen or away from
//! the plane belong to a run; on-screen and untracked frames end it.

use serde::{Deserialize, Serialize};

use crate::screen::OffScreenDirection;

/// Per-frame gaze classification recorded in the session trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GazeStatus {
    /// No gaze ray, no calibration, or a rejected frame pair.
    Untracked,
    /// The gaze crossed the plane inside the screen bounds, or crossed it
    /// forward with no screen geometry configured.
    OnScreen,
    /// The gaze crossed the plane outside the screen bounds.
    OffScreen(OffScreenDirection),
    /// The gaze never crossed the plane in front of the subject.
    Away,
}

impl GazeStatus {
    /// Whether this frame belongs to an off-screen run.
    pub fn is_off(&self) -> bool {
        matches!(self, Self::OffScreen(_) | Self::Away)
    }

    /// Classified direction, when the gaze crossed the plane off screen.
    pub fn direction(&self) -> Option<OffScreenDirection> {
        match self {
            Self::OffScreen(dir) => Some(*dir),
            _ => None,
        }
    }
}

/// A contiguous run of off-screen gaze frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffScreenEvent {
    /// Index of the first off-screen frame.
    pub start_frame: usize,
    /// Index of the last off-screen frame (inclusive).
    pub end_frame: usize,
    /// Most frequent classified direction within the run; `None` when the
    /// gaze never crossed the plane during the run.
    pub direction: Option<OffScreenDirection>,
}

impl OffScreenEvent {
    /// Number of frames covered by the event.
    pub fn duration_frames(&self) -> usize {
        self.end_frame - self.start_frame + 1
    }
}

/// Detect off-screen events in a frame trace.
///
/// Runs shorter than `min_frames` are dropped; a run's direction is the
/// most frequent direction among its classified frames.
pub fn detect_off_screen_events(trace: &[GazeStatus], min_frames: usize) -> Vec<OffScreenEvent> {
    let mut events = Vec::new();
    let mut run_start: Option<usize> = None;

    let sentinel = std::iter::once(&GazeStatus::Untracked);
    for (i, status) in trace.iter().chain(sentinel).enumerate() {
        match (status.is_off(), run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                let end = i - 1;
                if end - start + 1 >= min_frames {
                    events.push(OffScreenEvent {
                        start_frame: start,
                        end_frame: end,
                        direction: dominant_direction(&trace[start..=end]),
                    });
                }
                run_start = None;
            }
            _ => {}
        }
    }

    events
}

fn dominant_direction(run: &[GazeStatus]) -> Option<OffScreenDirection> {
    use OffScreenDirection::{Above, Below, Left, Right};

    let mut counts = [(Left, 0usize), (Right, 0), (Above, 0), (Below, 0)];
    for dir in run.iter().filter_map(GazeStatus::direction) {
        for (d, count) in counts.iter_mut() {
            if *d == dir {
                *count += 1;
            }
        }
    }
    counts
        .iter()
        .filter(|(_, c)| *c > 0)
        .max_by_key(|(_, c)| *c)
        .map(|(d, _)| *d)
}
