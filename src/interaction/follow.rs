//! Stepped followers - bounded-rate pursuit of a moving target.
//!
//! Each clock tick moves the follower at most [`FOLLOW_STEP`] toward the
//! target on each axis independently. It never overshoots and reaches the
//! target in `ceil(|Δ| / step)` ticks.

use glam::Vec2;

use crate::stream::{derive_from, Stream, Update};

/// Maximum per-tick movement on each axis.
pub const FOLLOW_STEP: f32 = 0.5;

/// Camera position before the pointer is first seen.
pub const INITIAL_CAMERA: Vec2 = Vec2::new(0.0, -5.0);

/// Light position before the pointer is first seen.
pub const INITIAL_LIGHT: Vec2 = Vec2::ZERO;

/// Move `pos` toward `to` by at most `step`, landing exactly on `to` once
/// within reach.
#[inline]
pub fn step_toward(pos: f32, to: f32, step: f32) -> f32 {
    if pos > to {
        if step >= pos - to { to } else { pos - step }
    } else if step >= to - pos {
        to
    } else {
        pos + step
    }
}

/// [`step_toward`] on both axes.
#[inline]
pub fn step_toward_vec(pos: Vec2, to: Vec2, step: f32) -> Vec2 {
    Vec2::new(step_toward(pos.x, to.x, step), step_toward(pos.y, to.y, step))
}

/// A follower that starts at `initial` and steps toward the latest `target`
/// on every `clock` emission.
///
/// Target changes alone do not move it. It emits only when it moved.
pub fn stepped_follower<C: Clone + 'static>(
    clock: &Stream<C>,
    target: &Stream<Vec2>,
    step: f32,
    initial: Vec2,
) -> Stream<Vec2> {
    derive_from(
        (clock, target),
        initial,
        move |(_, target), update: &mut Update<'_, Vec2>| {
            if !update.changed(0) {
                return;
            }
            match update.current().copied() {
                Some(pos) if pos == target => {}
                Some(pos) => update.emit(step_toward_vec(pos, target, step)),
                None => update.emit(target),
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::Graph;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_step_toward_reaches_exactly() {
        let mut pos = 0.0;
        for _ in 0..20 {
            pos = step_toward(pos, 10.0, 0.5);
            assert!(pos <= 10.0);
        }
        assert_eq!(pos, 10.0);
    }

    #[test]
    fn test_step_toward_symmetric() {
        let mut pos = 10.0;
        for _ in 0..20 {
            pos = step_toward(pos, 0.0, 0.5);
            assert!(pos >= 0.0);
        }
        assert_eq!(pos, 0.0);
    }

    #[test]
    fn test_step_toward_snaps_within_reach() {
        assert_eq!(step_toward(9.8, 10.0, 0.5), 10.0);
        assert_eq!(step_toward(10.2, 10.0, 0.5), 10.0);
        assert_eq!(step_toward(3.0, 3.0, 0.5), 3.0);
    }

    #[test]
    fn test_axes_are_independent() {
        let next = step_toward_vec(Vec2::ZERO, Vec2::new(2.0, -0.25), 0.5);
        assert_eq!(next, Vec2::new(0.5, -0.25));
    }

    #[test]
    fn test_follower_steps_on_clock_only() {
        let graph = Graph::new();
        let clock = graph.source::<f64>();
        let target = graph.source_with(Vec2::ZERO);
        let follower = stepped_follower(&clock, &target, FOLLOW_STEP, Vec2::ZERO);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let _unsub = follower.subscribe(move |p| seen_clone.borrow_mut().push(*p));

        target.push(Vec2::new(1.0, 0.0));
        assert!(seen.borrow().is_empty());

        clock.push(16.0);
        clock.push(32.0);
        clock.push(48.0);

        // Converged after two ticks, then silent
        assert_eq!(
            *seen.borrow(),
            vec![Vec2::new(0.5, 0.0), Vec2::new(1.0, 0.0)]
        );
        assert_eq!(follower.get(), Some(Vec2::new(1.0, 0.0)));
    }
}
