//! Scheduler - advances every animating entity once per tick.
//!
//! Each entity owns at most one transition list. Assigning a new list (by
//! playing a phase, animating ad hoc, or chaining) replaces the old one
//! wholesale; a superseded transition never writes again.
//!
//! Only entities in the active set are visited, so a tick costs nothing when
//! nothing is moving, however large the board.
//!
//! ```text
//! Idle ──play/animate──▶ Animating ──every transition settled, no chain──▶ Idle
//!                          │    ▲
//!                          └────┘ on_end: Chain(phase) replaces the list
//! ```

use std::collections::{BTreeSet, HashMap};

use crate::scene::Scene;
use crate::types::{EntityId, PropertyMask};

use super::phase::{PhaseBook, PhaseId};
use super::transition::{Hook, Step, Transition, TransitionSpec};

/// Work done by one [`Scheduler::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Active entities visited.
    pub visited: usize,
    /// Property writes.
    pub advanced: usize,
    /// Lists replaced by a chained phase.
    pub chained: usize,
    /// Entities that went idle.
    pub finished: usize,
}

/// Owner of every live transition list and of the active set.
#[derive(Debug, Default)]
pub struct Scheduler {
    phases: PhaseBook,
    targets: HashMap<EntityId, Vec<Transition>>,
    active: BTreeSet<EntityId>,
    /// Reused snapshot of the active set, so ticks don't allocate.
    scratch: Vec<EntityId>,
}

impl Scheduler {
    pub fn new(phases: PhaseBook) -> Self {
        Self {
            phases,
            ..Default::default()
        }
    }

    pub fn phases(&self) -> &PhaseBook {
        &self.phases
    }

    pub fn phases_mut(&mut self) -> &mut PhaseBook {
        &mut self.phases
    }

    /// Replace the entity's transitions with a phase. Returns `false` (and
    /// leaves the entity untouched) if the phase is not defined.
    pub fn play(&mut self, entity: EntityId, phase: PhaseId) -> bool {
        let loaded = self.load(entity, phase);
        if loaded {
            log::trace!(
                "entity {} plays {}",
                entity.0,
                self.phases.name(phase).unwrap_or("?")
            );
        }
        loaded
    }

    /// Replace the entity's transitions with an ad-hoc list. An empty list
    /// cancels.
    pub fn animate(&mut self, entity: EntityId, specs: &[TransitionSpec]) {
        if specs.is_empty() {
            self.cancel(entity);
            return;
        }
        let transitions = specs.iter().copied().map(Transition::from).collect();
        self.targets.insert(entity, transitions);
        self.active.insert(entity);
    }

    /// Drop the entity's transitions where they stand. Returns whether it
    /// was animating.
    pub fn cancel(&mut self, entity: EntityId) -> bool {
        self.targets.remove(&entity);
        self.active.remove(&entity)
    }

    pub fn is_active(&self, entity: EntityId) -> bool {
        self.active.contains(&entity)
    }

    /// Size of the active set.
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Animating entities in id order.
    pub fn active(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.active.iter().copied()
    }

    /// The entity's live transitions (empty when idle).
    pub fn transitions(&self, entity: EntityId) -> &[Transition] {
        self.targets.get(&entity).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Properties written by the entity's live transition list.
    pub fn animated_properties(&self, entity: EntityId) -> PropertyMask {
        self.transitions(entity)
            .iter()
            .fold(PropertyMask::NONE, |mask, t| mask | t.property().mask())
    }

    /// Advance every active entity to `time` (ms).
    pub fn tick<S: Scene + ?Sized>(&mut self, time: f64, scene: &mut S) -> TickStats {
        let mut stats = TickStats::default();
        if self.active.is_empty() {
            return stats;
        }

        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.clear();
        scratch.extend(self.active.iter().copied());

        for &entity in &scratch {
            stats.visited += 1;

            let Some(transitions) = self.targets.get_mut(&entity) else {
                self.active.remove(&entity);
                continue;
            };
            let (chain, done) = advance(entity, transitions, time, scene, &mut stats);

            if let Some(phase) = chain {
                if self.load(entity, phase) {
                    stats.chained += 1;
                    continue;
                }
                log::warn!("entity {} chained to undefined phase {:?}", entity.0, phase);
            }
            if done {
                self.targets.remove(&entity);
                self.active.remove(&entity);
                stats.finished += 1;
            }
        }

        self.scratch = scratch;
        log::trace!(
            "tick {time:.1}: visited {} advanced {} chained {} finished {}",
            stats.visited,
            stats.advanced,
            stats.chained,
            stats.finished
        );
        stats
    }

    fn load(&mut self, entity: EntityId, phase: PhaseId) -> bool {
        let Some(phase) = self.phases.get(phase) else {
            return false;
        };
        let transitions: Vec<Transition> =
            phase.transitions.iter().copied().map(Transition::from).collect();
        if transitions.is_empty() {
            self.cancel(entity);
        } else {
            self.targets.insert(entity, transitions);
            self.active.insert(entity);
        }
        true
    }
}

/// Advance one entity's list. Returns the requested chain, if any, and
/// whether every transition has settled.
fn advance<S: Scene + ?Sized>(
    entity: EntityId,
    transitions: &mut [Transition],
    time: f64,
    scene: &mut S,
    stats: &mut TickStats,
) -> (Option<PhaseId>, bool) {
    let mut chain = None;
    let mut done = true;

    for transition in transitions.iter_mut() {
        if transition.is_finished() {
            continue;
        }
        let property = transition.property();
        let current = scene.property(entity, property);

        if let Some(hook) = transition.begin(time, current) {
            apply_hook(scene, entity, hook, &mut chain);
        }

        match transition.step(time, current) {
            Step::Advance(value) => {
                scene.set_property(entity, property, value);
                stats.advanced += 1;
                done = false;
            }
            Step::Settled => {
                if let Some(hook) = transition.finish() {
                    apply_hook(scene, entity, hook, &mut chain);
                }
            }
        }
    }

    (chain, done)
}

fn apply_hook<S: Scene + ?Sized>(
    scene: &mut S,
    entity: EntityId,
    hook: Hook,
    chain: &mut Option<PhaseId>,
) {
    match hook {
        Hook::Show => scene.set_visible(entity, true),
        Hook::Hide => scene.set_visible(entity, false),
        Hook::Chain(phase) => *chain = Some(phase),
    }
}

// =============================================================================
// Tests
// =============================================================================
