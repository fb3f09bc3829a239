//! Graph - node arena and glitch-free propagation.
//!
//! Every node lives in one arena slot addressed by [`NodeId`]. A slot knows its
//! dependencies, its dependents, its rank (longest path from a source) and a
//! type-erased recompute closure. Typed values live outside the arena, in the
//! node cells owned by [`Stream`](super::Stream) handles.
//!
//! # Propagation
//!
//! ```text
//! push(source) → queue dependents by (rank, id) → pop lowest rank → recompute
//!              → if it emitted, queue its dependents → ... → notify subscribers
//! ```
//!
//! A dependency always has a strictly lower rank than its dependents, so
//! popping by rank guarantees that a node recomputes only after all of its
//! dependencies have settled, and the ordered set guarantees it recomputes at
//! most once per push. Subscribers are notified after the whole graph settles,
//! in emission order.
//!
//! Pushes and ends issued while a flush is running (from subscriber callbacks)
//! are queued and applied after the flush, in the order they were issued.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;

// =============================================================================
// Types
// =============================================================================

/// Stable identity of a node within its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena slot index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Recompute closure: receives one "changed this push" flag per dependency,
/// returns whether the node emitted.
pub(crate) type Recompute = Box<dyn FnMut(&[bool]) -> bool>;

/// Type-erased side of a node cell, called by the graph.
pub(crate) trait NodeHooks {
    /// Deliver the settled value to subscribers.
    fn notify(&self);
    /// Mark terminated and run end listeners. Idempotent.
    fn finish(&self);
}

struct NodeSlot {
    deps: Vec<NodeId>,
    dependents: Vec<NodeId>,
    rank: usize,
    ended: bool,
    recompute: Option<Recompute>,
    hooks: Rc<dyn NodeHooks>,
}

#[derive(Default)]
struct GraphState {
    nodes: Vec<NodeSlot>,
    flushing: bool,
    deferred: VecDeque<Box<dyn FnOnce()>>,
}

// =============================================================================
// Graph
// =============================================================================

/// Shared handle to a dataflow graph. Cloning is cheap and aliases the graph.
#[derive(Clone, Default)]
pub struct Graph {
    state: Rc<RefCell<GraphState>>,
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Graph")
            .field("nodes", &state.nodes.len())
            .field("flushing", &state.flushing)
            .finish()
    }
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when both handles refer to the same graph.
    pub fn ptr_eq(&self, other: &Graph) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// Number of nodes ever created in this graph.
    pub fn node_count(&self) -> usize {
        self.state.borrow().nodes.len()
    }

    /// Longest path from any source to this node. Sources have rank 0.
    pub fn rank(&self, id: NodeId) -> usize {
        self.state.borrow().nodes[id.0].rank
    }

    /// Direct dependencies of a node, in declaration order.
    pub fn dependencies(&self, id: NodeId) -> Vec<NodeId> {
        self.state.borrow().nodes[id.0].deps.clone()
    }

    /// Live direct dependents of a node.
    pub fn dependents(&self, id: NodeId) -> Vec<NodeId> {
        self.state.borrow().nodes[id.0].dependents.clone()
    }

    /// Whether the node has been terminated.
    pub fn is_ended(&self, id: NodeId) -> bool {
        self.state.borrow().nodes[id.0].ended
    }

    /// True while a push is being propagated or its subscribers notified.
    pub fn is_flushing(&self) -> bool {
        self.state.borrow().flushing
    }

    // -------------------------------------------------------------------------
    // Construction (crate-internal, typed wrappers live in node.rs)
    // -------------------------------------------------------------------------

    /// Insert a node. Returns its id and whether it was born ended
    /// (created on top of an ended dependency).
    pub(crate) fn insert(&self, deps: Vec<NodeId>, hooks: Rc<dyn NodeHooks>) -> (NodeId, bool) {
        let (id, ended) = {
            let mut state = self.state.borrow_mut();
            let id = NodeId(state.nodes.len());
            let rank = deps
                .iter()
                .map(|dep| state.nodes[dep.0].rank + 1)
                .max()
                .unwrap_or(0);
            let ended = deps.iter().any(|dep| state.nodes[dep.0].ended);

            if !ended {
                for dep in &deps {
                    state.nodes[dep.0].dependents.push(id);
                }
            }

            state.nodes.push(NodeSlot {
                deps,
                dependents: Vec::new(),
                rank,
                ended,
                recompute: None,
                hooks: hooks.clone(),
            });
            (id, ended)
        };

        if ended {
            hooks.finish();
        }
        (id, ended)
    }

    pub(crate) fn set_recompute(&self, id: NodeId, recompute: Recompute) {
        let mut state = self.state.borrow_mut();
        let slot = &mut state.nodes[id.0];
        if !slot.ended {
            slot.recompute = Some(recompute);
        }
    }

    /// Queue work to run once the current flush completes.
    pub(crate) fn defer(&self, task: Box<dyn FnOnce()>) {
        self.state.borrow_mut().deferred.push_back(task);
    }

    // -------------------------------------------------------------------------
    // Propagation
    // -------------------------------------------------------------------------

    /// Propagate a value just stored into `origin` through its dependents.
    pub(crate) fn propagate(&self, origin: NodeId) {
        self.state.borrow_mut().flushing = true;

        let mut changed: HashSet<NodeId> = HashSet::from([origin]);
        let mut emitted = vec![origin];
        let mut queue: BTreeSet<(usize, NodeId)> = BTreeSet::new();
        self.enqueue_dependents(origin, &mut queue);

        while let Some((_, id)) = queue.pop_first() {
            // Take the closure out so no borrow is held while user code runs
            let (flags, recompute) = {
                let mut state = self.state.borrow_mut();
                let slot = &mut state.nodes[id.0];
                let flags: Vec<bool> = slot.deps.iter().map(|dep| changed.contains(dep)).collect();
                (flags, slot.recompute.take())
            };
            let Some(mut recompute) = recompute else {
                continue;
            };

            let fired = recompute(&flags);
            self.set_recompute(id, recompute);

            if fired {
                changed.insert(id);
                emitted.push(id);
                self.enqueue_dependents(id, &mut queue);
            }
        }

        log::trace!(
            "propagated node {} → {} emission(s)",
            origin.0,
            emitted.len()
        );

        let hooks: Vec<Rc<dyn NodeHooks>> = {
            let state = self.state.borrow();
            emitted
                .iter()
                .map(|id| state.nodes[id.0].hooks.clone())
                .collect()
        };
        for hook in hooks {
            hook.notify();
        }

        self.state.borrow_mut().flushing = false;
        self.drain_deferred();
    }

    fn enqueue_dependents(&self, id: NodeId, queue: &mut BTreeSet<(usize, NodeId)>) {
        let state = self.state.borrow();
        for dependent in &state.nodes[id.0].dependents {
            let slot = &state.nodes[dependent.0];
            if !slot.ended {
                queue.insert((slot.rank, *dependent));
            }
        }
    }

    fn drain_deferred(&self) {
        loop {
            let next = self.state.borrow_mut().deferred.pop_front();
            let Some(task) = next else { break };
            task();
        }
    }

    // -------------------------------------------------------------------------
    // Termination
    // -------------------------------------------------------------------------

    /// End `origin` and every node transitively depending on it.
    ///
    /// Each node is finished exactly once, in rank order.
    pub(crate) fn end(&self, origin: NodeId) {
        let mut released: Vec<Recompute> = Vec::new();
        let finished: Vec<Rc<dyn NodeHooks>> = {
            let mut state = self.state.borrow_mut();
            let mut ordered: BTreeSet<(usize, NodeId)> = BTreeSet::new();
            let mut stack = vec![origin];

            while let Some(id) = stack.pop() {
                let slot = &mut state.nodes[id.0];
                if slot.ended {
                    continue;
                }
                slot.ended = true;
                released.extend(slot.recompute.take());
                ordered.insert((slot.rank, id));
                stack.extend(slot.dependents.iter().copied());
            }

            ordered
                .into_iter()
                .map(|(_, id)| state.nodes[id.0].hooks.clone())
                .collect()
        };

        // Dropped outside the borrow: closures may own other handles
        drop(released);

        if !finished.is_empty() {
            log::trace!("ended node {} and {} dependent(s)", origin.0, finished.len() - 1);
        }
        for hook in finished {
            hook.finish();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
