//! Animation boundary
//!
//! Tweening lives outside the engine core. The scheduler advances one
//! game-level animator and each scene advances its own, once per update
//! sequence.

/// Time-driven animation advanced by the frame loop
pub trait Animator {
    /// Advance by `delta_time` seconds
    fn advance(&mut self, delta_time: f32);
}

impl<F: FnMut(f32)> Animator for F {
    fn advance(&mut self, delta_time: f32) {
        self(delta_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_closure_animator() {
        let mut elapsed = 0.0;
        {
            let mut animator = |dt: f32| elapsed += dt;
            let animator: &mut dyn Animator = &mut animator;
            animator.advance(0.25);
            animator.advance(0.5);
        }
        assert_relative_eq!(elapsed, 0.75);
    }
}
