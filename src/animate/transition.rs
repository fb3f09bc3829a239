//! Transition records - one animated property converging on a target.
//!
//! A [`TransitionSpec`] is a reusable template (phases are lists of them).
//! The scheduler instantiates it into a live [`Transition`], which captures
//! its start time and origin on the first tick that processes it.

use crate::interaction::step_toward;
use crate::types::Property;

use super::phase::PhaseId;

/// Decimal places compared by the settle test.
///
/// Speed-bounded convergence can approach a target without landing on it in
/// floating point; two values that agree to this many decimals are equal.
/// Raising it makes transitions run longer, lowering it ends them sooner.
pub const SETTLE_DECIMALS: i32 = 2;

/// Whether `value` is within settle tolerance of `target`.
#[inline]
pub fn settled(value: f32, target: f32) -> bool {
    let scale = 10f32.powi(SETTLE_DECIMALS);
    (value * scale).round() == (target * scale).round()
}

// =============================================================================
// Templates
// =============================================================================

/// Start value of a duration-bounded transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Origin {
    /// Whatever the property holds when the transition starts.
    Current,
    Value(f32),
}

/// How a transition approaches its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Convergence {
    /// Linear interpolation from `from` to the target over `duration` ms.
    Duration { from: Origin, duration: f64 },
    /// Move at most `speed` per tick toward the target.
    Speed { speed: f32 },
}

/// Side effect fired when a transition starts or ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    Show,
    Hide,
    /// Replace the target's transition list with this phase.
    Chain(PhaseId),
}

/// Template for one transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionSpec {
    pub property: Property,
    pub to: f32,
    pub convergence: Convergence,
    pub on_start: Option<Hook>,
    pub on_end: Option<Hook>,
}

impl TransitionSpec {
    /// Duration-bounded transition.
    pub fn duration(property: Property, from: Origin, to: f32, duration: f64) -> Self {
        Self {
            property,
            to,
            convergence: Convergence::Duration { from, duration },
            on_start: None,
            on_end: None,
        }
    }

    /// Speed-bounded transition.
    pub fn speed(property: Property, to: f32, speed: f32) -> Self {
        Self {
            property,
            to,
            convergence: Convergence::Speed { speed },
            on_start: None,
            on_end: None,
        }
    }

    pub fn on_start(mut self, hook: Hook) -> Self {
        self.on_start = Some(hook);
        self
    }

    pub fn on_end(mut self, hook: Hook) -> Self {
        self.on_end = Some(hook);
        self
    }
}

// =============================================================================
// Live transitions
// =============================================================================

/// Outcome of advancing a transition by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Write this value to the property.
    Advance(f32),
    /// Settled on the target; nothing to write.
    Settled,
}

/// A transition owned by the scheduler for one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub spec: TransitionSpec,
    /// Resolved start value (duration rule), set on start.
    from: f32,
    /// Clock time of the first tick that processed this transition.
    start: f64,
    started: bool,
    finished: bool,
}

impl From<TransitionSpec> for Transition {
    fn from(spec: TransitionSpec) -> Self {
        Self {
            spec,
            from: 0.0,
            start: 0.0,
            started: false,
            finished: false,
        }
    }
}

impl Transition {
    pub fn property(&self) -> Property {
        self.spec.property
    }

    pub fn to(&self) -> f32 {
        self.spec.to
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Start time, once started.
    pub fn start_time(&self) -> Option<f64> {
        self.started.then_some(self.start)
    }

    /// Mark started at `time` with the property currently at `current`.
    /// Returns the start hook, only on the first call.
    pub(crate) fn begin(&mut self, time: f64, current: f32) -> Option<Hook> {
        if self.started {
            return None;
        }
        self.started = true;
        self.start = time;
        self.from = match self.spec.convergence {
            Convergence::Duration {
                from: Origin::Value(value),
                ..
            } => value,
            _ => current,
        };
        self.spec.on_start
    }

    /// Mark finished. Returns the end hook, only on the first call.
    pub(crate) fn finish(&mut self) -> Option<Hook> {
        if self.finished {
            return None;
        }
        self.finished = true;
        self.spec.on_end
    }

    /// Next value at `time` given the property's `current` value.
    pub(crate) fn step(&self, time: f64, current: f32) -> Step {
        let to = self.spec.to;
        match self.spec.convergence {
            Convergence::Duration { duration, .. } => {
                let elapsed = (time - self.start).max(0.0);
                if elapsed >= duration && settled(current, to) {
                    return Step::Settled;
                }
                let progress = (elapsed / duration).min(1.0) as f32;
                Step::Advance(self.from + (to - self.from) * progress)
            }
            Convergence::Speed { speed } => {
                if settled(current, to) {
                    Step::Settled
                } else {
                    Step::Advance(step_toward(current, to, speed))
                }
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
