//! Combinators - derived nodes built on top of `derive`.
//!
//! - `derive(deps, updater)` - general combined node, may emit zero or one value
//! - `map` - transform every emission
//! - `filter_map` - transform, dropping `None`
//! - `reject` - drop values matching a predicate
//! - `dedupe` - drop values equal to the last emitted one
//! - `previous` - emit the value held before each emission after the first
//! - `Graph::merge_any` - emit whenever any input emits

use std::rc::Rc;

use super::graph::{Graph, NodeId};
use super::node::{NodeCell, Stream};

// =============================================================================
// Update context
// =============================================================================

/// Capability handed to an updater: read the node's own value, see which
/// dependencies changed in this push, and emit.
pub struct Update<'a, T> {
    current: Option<T>,
    changed: &'a [bool],
    emitted: Option<T>,
}

impl<T> Update<'_, T> {
    /// Emit a value. At most one value is kept per invocation; a second call
    /// replaces the first.
    pub fn emit(&mut self, value: T) {
        self.emitted = Some(value);
    }

    /// The node's own value before this invocation.
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Whether dependency `index` (declaration order) emitted in this push.
    pub fn changed(&self, index: usize) -> bool {
        self.changed.get(index).copied().unwrap_or(false)
    }
}

// =============================================================================
// Dependency lists
// =============================================================================

/// Read side of a dependency list, detached from the graph handle.
pub trait CellSet: 'static {
    type Values;

    /// Current values of every dependency, or `None` while any is empty.
    fn read(&self) -> Option<Self::Values>;
}

/// A tuple of stream references usable as the dependency list of `derive`.
pub trait Dependencies {
    type Cells: CellSet;

    fn graph(&self) -> Graph;
    fn ids(&self) -> Vec<NodeId>;
    fn cells(&self) -> Self::Cells;
}

macro_rules! tuple_dependencies {
    ($($name:ident $idx:tt),+) => {
        impl<$($name: Clone + 'static),+> CellSet for ($(Rc<NodeCell<$name>>,)+) {
            type Values = ($($name,)+);

            fn read(&self) -> Option<Self::Values> {
                Some(($(self.$idx.get()?,)+))
            }
        }

        impl<'a, $($name: Clone + 'static),+> Dependencies for ($(&'a Stream<$name>,)+) {
            type Cells = ($(Rc<NodeCell<$name>>,)+);

            fn graph(&self) -> Graph {
                $(debug_assert!(
                    self.0.graph().ptr_eq(self.$idx.graph()),
                    "dependencies must share one graph"
                );)+
                self.0.graph().clone()
            }

            fn ids(&self) -> Vec<NodeId> {
                vec![$(self.$idx.id()),+]
            }

            fn cells(&self) -> Self::Cells {
                ($(self.$idx.cell().clone(),)+)
            }
        }
    };
}

tuple_dependencies!(A 0);
tuple_dependencies!(A 0, B 1);
tuple_dependencies!(A 0, B 1, C 2);
tuple_dependencies!(A 0, B 1, C 2, D 3);

// =============================================================================
// derive
// =============================================================================

/// Create a node recomputed from `deps`.
///
/// The updater runs once per push in which any dependency emitted, after all
/// dependencies have settled, and only once every dependency holds a value.
/// It also runs at creation if the dependencies are already populated.
///
/// ```ignore
/// let sum = derive((&a, &b), |(a, b), update| update.emit(a + b));
/// ```
pub fn derive<D, T, F>(deps: D, updater: F) -> Stream<T>
where
    D: Dependencies,
    T: Clone + 'static,
    F: FnMut(<D::Cells as CellSet>::Values, &mut Update<'_, T>) + 'static,
{
    build(deps, None, updater)
}

/// Like [`derive`], but the node starts out holding `initial`, which the
/// updater sees through [`Update::current`].
pub fn derive_from<D, T, F>(deps: D, initial: T, updater: F) -> Stream<T>
where
    D: Dependencies,
    T: Clone + 'static,
    F: FnMut(<D::Cells as CellSet>::Values, &mut Update<'_, T>) + 'static,
{
    build(deps, Some(initial), updater)
}

fn build<D, T, F>(deps: D, initial: Option<T>, updater: F) -> Stream<T>
where
    D: Dependencies,
    T: Clone + 'static,
    F: FnMut(<D::Cells as CellSet>::Values, &mut Update<'_, T>) + 'static,
{
    let graph = deps.graph();
    let ids = deps.ids();
    let arity = ids.len();
    let stream = Stream::create(&graph, ids);
    if let Some(initial) = initial {
        stream.cell().store(initial);
    }
    if stream.is_ended() {
        return stream;
    }

    let mut recompute = recompute_fn(deps.cells(), stream.cell().clone(), updater);
    recompute(&vec![true; arity][..]);
    graph.set_recompute(stream.id(), Box::new(recompute));
    stream
}

fn recompute_fn<C, T, F>(
    cells: C,
    own: Rc<NodeCell<T>>,
    mut updater: F,
) -> impl FnMut(&[bool]) -> bool + 'static
where
    C: CellSet,
    T: Clone + 'static,
    F: FnMut(C::Values, &mut Update<'_, T>) + 'static,
{
    move |changed| {
        let Some(values) = cells.read() else {
            return false;
        };
        let mut update = Update {
            current: own.get(),
            changed,
            emitted: None,
        };
        updater(values, &mut update);
        match update.emitted {
            Some(value) => {
                own.store(value);
                true
            }
            None => false,
        }
    }
}

// =============================================================================
// Single-input combinators
// =============================================================================

impl<T: Clone + 'static> Stream<T> {
    /// Emit `f(v)` for every emission `v`.
    pub fn map<U, F>(&self, mut f: F) -> Stream<U>
    where
        U: Clone + 'static,
        F: FnMut(T) -> U + 'static,
    {
        derive((self,), move |(value,), update| update.emit(f(value)))
    }

    /// Emit `f(v)` when it is `Some`, stay silent otherwise.
    pub fn filter_map<U, F>(&self, mut f: F) -> Stream<U>
    where
        U: Clone + 'static,
        F: FnMut(T) -> Option<U> + 'static,
    {
        derive((self,), move |(value,), update| {
            if let Some(mapped) = f(value) {
                update.emit(mapped);
            }
        })
    }

    /// Emit only values failing `predicate`.
    pub fn reject<P>(&self, mut predicate: P) -> Stream<T>
    where
        P: FnMut(&T) -> bool + 'static,
    {
        derive((self,), move |(value,), update| {
            if !predicate(&value) {
                update.emit(value);
            }
        })
    }

    /// Emit only when the value differs from the last emitted one.
    pub fn dedupe(&self) -> Stream<T>
    where
        T: PartialEq,
    {
        let mut last: Option<T> = None;
        derive((self,), move |(value,), update| {
            if last.as_ref() != Some(&value) {
                last = Some(value.clone());
                update.emit(value);
            }
        })
    }

    /// On every emission after the first, emit the value held before it.
    ///
    /// Applied to a deduplicated stream this yields the "left" edge: each new
    /// distinct value carries what it replaced.
    pub fn previous(&self) -> Stream<T> {
        let mut last: Option<T> = None;
        derive((self,), move |(value,), update| {
            if let Some(before) = last.replace(value) {
                update.emit(before);
            }
        })
    }
}

// =============================================================================
// merge_any
// =============================================================================

impl Graph {
    /// Emit whenever any input emits, carrying that input's value.
    ///
    /// If several inputs emit in the same push, the first in `inputs` order
    /// wins. With no inputs the node never emits.
    pub fn merge_any<T: Clone + 'static>(&self, inputs: &[&Stream<T>]) -> Stream<T> {
        let ids: Vec<NodeId> = inputs.iter().map(|input| input.id()).collect();
        let arity = ids.len();
        let stream = Stream::create(self, ids);
        if stream.is_ended() {
            return stream;
        }

        let cells: Vec<Rc<NodeCell<T>>> = inputs.iter().map(|input| input.cell().clone()).collect();
        let own = stream.cell().clone();
        let mut recompute = move |changed: &[bool]| -> bool {
            let winner = cells
                .iter()
                .zip(changed)
                .filter(|(_, changed)| **changed)
                .find_map(|(cell, _)| cell.get());
            match winner {
                Some(value) => {
                    own.store(value);
                    true
                }
                None => false,
            }
        };

        recompute(&vec![true; arity][..]);
        self.set_recompute(stream.id(), Box::new(recompute));
        stream
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    fn record<T: Clone + 'static>(stream: &Stream<T>) -> Rc<RefCell<Vec<T>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        // Dropping the unsubscribe function keeps the listener attached
        let _ = stream.subscribe(move |v: &T| seen_clone.borrow_mut().push(v.clone()));
        seen
    }

    #[test]
    fn test_map() {
        let graph = Graph::new();
        let source = graph.source::<i32>();
        let doubled = source.map(|v| v * 2);
        let seen = record(&doubled);

        source.push(1);
        source.push(4);

        assert_eq!(*seen.borrow(), vec![2, 8]);
        assert_eq!(doubled.get(), Some(8));
    }

    #[test]
    fn test_derive_waits_for_all_dependencies() {
        let graph = Graph::new();
        let a = graph.source::<i32>();
        let b = graph.source::<i32>();
        let runs = Rc::new(Cell::new(0));
        let runs_clone = runs.clone();
        let sum = derive((&a, &b), move |(a, b), update| {
            runs_clone.set(runs_clone.get() + 1);
            update.emit(a + b);
        });

        a.push(1);
        assert_eq!(runs.get(), 0);
        assert_eq!(sum.get(), None);

        b.push(2);
        assert_eq!(runs.get(), 1);
        assert_eq!(sum.get(), Some(3));
    }

    #[test]
    fn test_derive_computes_eagerly_when_ready() {
        let graph = Graph::new();
        let a = graph.source_with(2);
        let squared = a.map(|v| v * v);
        assert_eq!(squared.get(), Some(4));
    }

    #[test]
    fn test_diamond_recomputes_once_without_glitch() {
        let graph = Graph::new();
        let a = graph.source::<i32>();
        let b = a.map(|v| v + 1);
        let c = a.map(|v| v * 10);
        let observed = Rc::new(RefCell::new(Vec::new()));
        let observed_clone = observed.clone();
        let _d = derive((&b, &c), move |(b, c), update| {
            observed_clone.borrow_mut().push((b, c));
            update.emit(b + c);
        });

        a.push(1);
        a.push(2);

        // One run per push, always with both sides from the same push
        assert_eq!(*observed.borrow(), vec![(2, 10), (3, 20)]);
    }

    #[test]
    fn test_changed_flags() {
        let graph = Graph::new();
        let clock = graph.source::<u32>();
        let target = graph.source::<i32>();
        let ticks = derive((&clock, &target), |(tick, _), update: &mut Update<'_, u32>| {
            if update.changed(0) {
                update.emit(tick);
            }
        });
        let seen = record(&ticks);

        clock.push(1);
        target.push(5);
        target.push(6);
        clock.push(2);

        assert_eq!(*seen.borrow(), vec![2]);
    }

    #[test]
    fn test_derive_from_current() {
        let graph = Graph::new();
        let step = graph.source::<i32>();
        let total = derive_from((&step,), 100, |(step,), update: &mut Update<'_, i32>| {
            let at = update.current().copied().unwrap_or(0);
            update.emit(at + step);
        });

        step.push(1);
        step.push(2);
        assert_eq!(total.get(), Some(103));
    }

    #[test]
    fn test_reject() {
        let graph = Graph::new();
        let source = graph.source::<bool>();
        let falses = source.reject(|over| *over);
        let seen = record(&falses);

        source.push(true);
        source.push(false);
        source.push(true);
        source.push(false);

        assert_eq!(*seen.borrow(), vec![false, false]);
    }

    #[test]
    fn test_filter_map() {
        let graph = Graph::new();
        let source = graph.source::<Option<i32>>();
        let present = source.filter_map(|v| v);
        let seen = record(&present);

        source.push(Some(1));
        source.push(None);
        source.push(Some(3));

        assert_eq!(*seen.borrow(), vec![1, 3]);
    }

    #[test]
    fn test_dedupe_emits_once_for_repeats() {
        let graph = Graph::new();
        let source = graph.source::<i32>();
        let unique = source.dedupe();
        let seen = record(&unique);

        source.push(7);
        source.push(7);
        source.push(8);
        source.push(7);

        assert_eq!(*seen.borrow(), vec![7, 8, 7]);
    }

    #[test]
    fn test_previous_lags_by_one() {
        let graph = Graph::new();
        let source = graph.source::<char>();
        let before = source.previous();
        let seen = record(&before);

        for c in ['a', 'b', 'c'] {
            source.push(c);
        }

        assert_eq!(*seen.borrow(), vec!['a', 'b']);
    }

    #[test]
    fn test_hover_edges_from_noisy_signal() {
        let graph = Graph::new();
        let hovered = graph.source::<Option<char>>();
        let entered = hovered.dedupe();
        let exited = entered.previous();
        let entered_seen = record(&entered);
        let exited_seen = record(&exited);

        for value in [Some('A'), Some('A'), Some('B'), Some('B'), None, Some('C')] {
            hovered.push(value);
        }

        assert_eq!(
            *entered_seen.borrow(),
            vec![Some('A'), Some('B'), None, Some('C')]
        );
        assert_eq!(*exited_seen.borrow(), vec![Some('A'), Some('B'), None]);
    }

    #[test]
    fn test_merge_any() {
        let graph = Graph::new();
        let a = graph.source::<&'static str>();
        let b = graph.source::<&'static str>();
        let merged = graph.merge_any(&[&a, &b]);
        let seen = record(&merged);

        a.push("a1");
        b.push("b1");
        a.push("a2");

        assert_eq!(*seen.borrow(), vec!["a1", "b1", "a2"]);
    }

    #[test]
    fn test_merge_any_same_push_prefers_first() {
        let graph = Graph::new();
        let source = graph.source::<i32>();
        let left = source.map(|v| v + 1);
        let right = source.map(|v| v + 2);
        let merged = graph.merge_any(&[&right, &left]);
        let seen = record(&merged);

        source.push(10);

        assert_eq!(*seen.borrow(), vec![12]);
    }

    #[test]
    fn test_merge_any_empty_never_emits() {
        let graph = Graph::new();
        let merged = graph.merge_any::<i32>(&[]);
        assert!(!merged.has_value());
    }

    #[test]
    fn test_end_propagates_exactly_once() {
        let graph = Graph::new();
        let a = graph.source::<i32>();
        let b = a.map(|v| v + 1);
        let c = a.map(|v| v + 2);
        let d = derive((&b, &c), |(b, c), update| update.emit(b + c));

        let ends = Rc::new(RefCell::new(Vec::new()));
        for (name, stream) in [("a", &a), ("b", &b), ("c", &c), ("d", &d)] {
            let ends = ends.clone();
            stream.on_end(move || ends.borrow_mut().push(name));
        }

        a.end();
        a.end();
        d.end();

        assert_eq!(*ends.borrow(), vec!["a", "b", "c", "d"]);
        assert!(d.is_ended());
    }

    #[test]
    fn test_ended_dependent_ignores_further_pushes() {
        let graph = Graph::new();
        let a = graph.source::<i32>();
        let b = a.map(|v| v + 1);
        let seen = record(&b);

        a.push(1);
        b.end();
        a.push(2);

        assert_eq!(*seen.borrow(), vec![2]);
        assert!(!a.is_ended());
        assert_eq!(a.get(), Some(2));
    }

    #[test]
    fn test_derive_on_ended_dependency_is_born_ended() {
        let graph = Graph::new();
        let a = graph.source::<i32>();
        a.end();
        let b = a.map(|v| v + 1);
        assert!(b.is_ended());
    }

    #[test]
    fn test_any_dependency_end_ends_combined() {
        let graph = Graph::new();
        let a = graph.source::<i32>();
        let b = graph.source::<i32>();
        let sum = derive((&a, &b), |(a, b), update| update.emit(a + b));

        b.end();
        assert!(sum.is_ended());
        assert!(!a.is_ended());
    }
}
