//! Incremental head pose chaining.
//!
//! The world frame is the camera frame of the first processed frame. Each
//! accepted frame pair contributes a relative pose that is composed onto
//! the running absolute pose; rejected pairs hold the last pose so the
//! chain never goes backwards or gaps.

use gaze_sfm_core::transform::origin_in_target;
use gaze_sfm_core::{Iso3, Pt3};

/// Running absolute head pose with its trajectory history.
#[derive(Clone, Debug)]
pub struct PoseChain {
    t_world_cam: Iso3,
    trajectory: Vec<Pt3>,
    advanced: usize,
    held: usize,
}

impl Default for PoseChain {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseChain {
    /// Start a chain at the identity: the first camera frame is the world.
    pub fn new() -> Self {
        Self {
            t_world_cam: Iso3::identity(),
            trajectory: vec![Pt3::origin()],
            advanced: 0,
            held: 0,
        }
    }

    /// Current absolute pose `t_world_cam`.
    pub fn current(&self) -> &Iso3 {
        &self.t_world_cam
    }

    /// Current head position in world coordinates.
    pub fn head_position(&self) -> Pt3 {
        origin_in_target(&self.t_world_cam)
    }

    /// Compose an accepted relative pose onto the chain.
    ///
    /// `t_cur_prev` maps previous-frame coordinates into current-frame
    /// coordinates (the essential decomposition convention), so the
    /// chain advances by its inverse:
    /// `t_world_cur = t_world_prev * t_prev_cur`.
    pub fn advance(&mut self, t_cur_prev: &Iso3) {
        self.t_world_cam *= t_cur_prev.inverse();
        self.trajectory.push(self.head_position());
        self.advanced += 1;
    }

    /// Record a rejected frame: the pose stays put and the trajectory
    /// repeats the last position.
    pub fn hold(&mut self) {
        self.trajectory.push(self.head_position());
        self.held += 1;
    }

    /// Head positions in world coordinates, one entry per processed frame
    /// plus the initial origin.
    pub fn trajectory(&self) -> &[Pt3] {
        &self.trajectory
    }

    /// Number of frames that advanced the chain.
    pub fn advanced_frames(&self) -> usize {
        self.advanced
    }

    /// Number of frames held in place.
    pub fn held_frames(&self) -> usize {
        self.held
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use gaze_sfm_core::Vec3;
    use gaze_sfm_core::synthetic::relative_pose;

    #[test]
    fn starts_at_identity() {
        let chain = PoseChain::new();
        assert_relative_eq!(chain.head_position(), Pt3::origin(), epsilon = 1e-15);
        assert_eq!(chain.trajectory().len(), 1);
    }

    #[test]
    fn advance_inverts_the_relative_pose() {
        // Camera moves +0.1 along world X; points move -0.1 in camera
        // coordinates, so t_cur_prev has translation (-0.1, 0, 0).
        let t_cur_prev = relative_pose(0.0, 0.0, 0.0, Vec3::new(-0.1, 0.0, 0.0));

        let mut chain = PoseChain::new();
        chain.advance(&t_cur_prev);
        assert_relative_eq!(
            chain.head_position(),
            Pt3::new(0.1, 0.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn composition_matches_two_steps() {
        let a = relative_pose(0.05, -0.02, 0.1, Vec3::new(-0.1, 0.02, 0.0));
        let b = relative_pose(-0.01, 0.03, 0.0, Vec3::new(0.0, -0.05, 0.02));

        let mut chain = PoseChain::new();
        chain.advance(&a);
        chain.advance(&b);

        let expected = a.inverse() * b.inverse();
        let p = Pt3::new(0.3, -0.2, 1.0);
        assert_relative_eq!(chain.current() * p, expected * p, epsilon = 1e-12);
    }

    #[test]
    fn hold_repeats_last_position() {
        let t = relative_pose(0.0, 0.0, 0.0, Vec3::new(-0.2, 0.0, 0.0));
        let mut chain = PoseChain::new();
        chain.advance(&t);
        chain.hold();
        chain.hold();

        let traj = chain.trajectory();
        assert_eq!(traj.len(), 4);
        assert_relative_eq!(traj[1], traj[3], epsilon = 1e-15);
        assert_eq!(chain.advanced_frames(), 1);
        assert_eq!(chain.held_frames(), 2);
    }
}
