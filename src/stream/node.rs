//! Stream - typed handle to one graph node.
//!
//! The arena slot (dependencies, rank, recompute closure) lives in the
//! [`Graph`]; the typed half lives here in a [`NodeCell`]: the current value,
//! the ended flag and the subscriber lists.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use super::graph::{Graph, NodeHooks, NodeId};

type Listener<T> = Rc<RefCell<Box<dyn FnMut(&T)>>>;

// =============================================================================
// NodeCell
// =============================================================================

/// Typed storage for one node. Shared between the handle, the graph hooks
/// and the recompute closures of dependents.
pub struct NodeCell<T> {
    value: RefCell<Option<T>>,
    ended: Cell<bool>,
    listeners: RefCell<Vec<(usize, Listener<T>)>>,
    end_listeners: RefCell<Vec<Box<dyn FnOnce()>>>,
    next_listener: Cell<usize>,
}

impl<T: Clone> NodeCell<T> {
    fn new() -> Self {
        Self {
            value: RefCell::new(None),
            ended: Cell::new(false),
            listeners: RefCell::new(Vec::new()),
            end_listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
        }
    }

    /// Clone of the current value.
    pub(crate) fn get(&self) -> Option<T> {
        self.value.borrow().clone()
    }

    pub(crate) fn store(&self, value: T) {
        *self.value.borrow_mut() = Some(value);
    }

    fn has_value(&self) -> bool {
        self.value.borrow().is_some()
    }

    fn is_listening(&self, id: usize) -> bool {
        self.listeners.borrow().iter().any(|(listener_id, _)| *listener_id == id)
    }
}

impl<T: Clone + 'static> NodeHooks for NodeCell<T> {
    fn notify(&self) {
        let Some(value) = self.get() else { return };

        // Snapshot so listeners can subscribe/unsubscribe while we iterate
        let snapshot: Vec<(usize, Listener<T>)> = self
            .listeners
            .borrow()
            .iter()
            .map(|(id, listener)| (*id, listener.clone()))
            .collect();

        for (id, listener) in snapshot {
            if !self.is_listening(id) {
                continue;
            }
            if let Ok(mut listener) = listener.try_borrow_mut() {
                listener(&value);
            }
        }
    }

    fn finish(&self) {
        if self.ended.replace(true) {
            return;
        }
        let end_listeners = std::mem::take(&mut *self.end_listeners.borrow_mut());
        for listener in end_listeners {
            listener();
        }
        // Release captured resources: an ended node never notifies again
        self.listeners.borrow_mut().clear();
    }
}

// =============================================================================
// Stream
// =============================================================================

/// Handle to a reactive node holding an optional value of type `T`.
///
/// Cloning aliases the same node.
pub struct Stream<T> {
    id: NodeId,
    graph: Graph,
    cell: Rc<NodeCell<T>>,
}

impl<T> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            graph: self.graph.clone(),
            cell: self.cell.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("id", &self.id)
            .field("value", &*self.cell.value.borrow())
            .field("ended", &self.cell.ended.get())
            .finish()
    }
}

impl Graph {
    /// Create a source node with no dependencies and no value.
    pub fn source<T: Clone + 'static>(&self) -> Stream<T> {
        Stream::create(self, Vec::new())
    }

    /// Create a source node holding an initial value.
    pub fn source_with<T: Clone + 'static>(&self, initial: T) -> Stream<T> {
        let stream = self.source();
        stream.cell.store(initial);
        stream
    }
}

impl<T: Clone + 'static> Stream<T> {
    pub(crate) fn create(graph: &Graph, deps: Vec<NodeId>) -> Self {
        let cell = Rc::new(NodeCell::new());
        let (id, _) = graph.insert(deps, cell.clone());
        Self {
            id,
            graph: graph.clone(),
            cell,
        }
    }

    pub(crate) fn cell(&self) -> &Rc<NodeCell<T>> {
        &self.cell
    }

    /// Node identity within its graph.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The graph this node belongs to.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Clone of the current value, if any.
    pub fn get(&self) -> Option<T> {
        self.cell.get()
    }

    /// Whether the node holds a value.
    pub fn has_value(&self) -> bool {
        self.cell.has_value()
    }

    /// Whether the node has been terminated.
    pub fn is_ended(&self) -> bool {
        self.cell.ended.get()
    }

    /// Set the value and synchronously settle every dependent.
    ///
    /// Pushing into an ended node is a no-op. Pushing from inside a
    /// subscriber callback is applied once the current flush completes.
    pub fn push(&self, value: T) {
        if self.is_ended() {
            log::trace!("push into ended node {} ignored", self.id.index());
            return;
        }
        if self.graph.is_flushing() {
            let stream = self.clone();
            self.graph.defer(Box::new(move || stream.push(value)));
            return;
        }
        self.cell.store(value);
        self.graph.propagate(self.id);
    }

    /// Terminate this node and everything that depends on it. Idempotent.
    pub fn end(&self) {
        if self.is_ended() {
            return;
        }
        if self.graph.is_flushing() {
            let stream = self.clone();
            self.graph.defer(Box::new(move || stream.end()));
            return;
        }
        self.graph.end(self.id);
    }

    /// Call `listener` with every settled emission.
    ///
    /// Returns an unsubscribe function. Listeners of an ended node are
    /// dropped and never called again.
    pub fn subscribe<F>(&self, listener: F) -> Box<dyn FnOnce()>
    where
        F: FnMut(&T) + 'static,
    {
        let id = self.cell.next_listener.get();
        if !self.is_ended() {
            self.cell.next_listener.set(id + 1);
            self.cell
                .listeners
                .borrow_mut()
                .push((id, Rc::new(RefCell::new(Box::new(listener)))));
        }

        let cell: Weak<NodeCell<T>> = Rc::downgrade(&self.cell);
        Box::new(move || {
            if let Some(cell) = cell.upgrade() {
                cell.listeners
                    .borrow_mut()
                    .retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }

    /// Call `listener` once when this node ends. Runs immediately if it
    /// already has.
    pub fn on_end<F>(&self, listener: F)
    where
        F: FnOnce() + 'static,
    {
        if self.is_ended() {
            listener();
        } else {
            self.cell.end_listeners.borrow_mut().push(Box::new(listener));
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
