//! Phases - named transition lists that can chain into each other.
//!
//! Ids are handed out before definition so phases may reference each other
//! in a cycle:
//!
//! ```ignore
//! let mut book = PhaseBook::new();
//! let up = book.reserve("breathe-up");
//! let down = book.register("breathe-down", vec![
//!     TransitionSpec::duration(Property::Scale, Origin::Current, 0.6, 600.0)
//!         .on_end(Hook::Chain(up)),
//! ]);
//! book.define(up, vec![
//!     TransitionSpec::duration(Property::Scale, Origin::Current, 0.8, 600.0)
//!         .on_end(Hook::Chain(down)),
//! ]);
//! ```

use super::transition::TransitionSpec;

/// Handle to a phase in a [`PhaseBook`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhaseId(usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    pub name: &'static str,
    pub transitions: Vec<TransitionSpec>,
    defined: bool,
}

/// Arena of phases.
#[derive(Debug, Clone, Default)]
pub struct PhaseBook {
    phases: Vec<Phase>,
}

impl PhaseBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id for a phase defined later.
    pub fn reserve(&mut self, name: &'static str) -> PhaseId {
        let id = PhaseId(self.phases.len());
        self.phases.push(Phase {
            name,
            transitions: Vec::new(),
            defined: false,
        });
        id
    }

    /// Set the transitions of a phase. Redefining replaces them.
    pub fn define(&mut self, id: PhaseId, transitions: Vec<TransitionSpec>) {
        if let Some(phase) = self.phases.get_mut(id.0) {
            phase.transitions = transitions;
            phase.defined = true;
        }
    }

    /// Reserve and define in one step.
    pub fn register(&mut self, name: &'static str, transitions: Vec<TransitionSpec>) -> PhaseId {
        let id = self.reserve(name);
        self.define(id, transitions);
        id
    }

    /// A defined phase. Reserved-only ids return `None`.
    pub fn get(&self, id: PhaseId) -> Option<&Phase> {
        self.phases.get(id.0).filter(|phase| phase.defined)
    }

    pub fn name(&self, id: PhaseId) -> Option<&'static str> {
        self.phases.get(id.0).map(|phase| phase.name)
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }
}
