//! Stream - push-based reactive dataflow.
//!
//! A [`Graph`] owns an arena of nodes. Sources are pushed from the outside;
//! derived nodes recompute from their dependencies. Every push settles the
//! whole graph synchronously and glitch-free before any subscriber runs.
//!
//! ```ignore
//! let graph = Graph::new();
//! let pointer = graph.source::<Vec2>();
//! let over = graph.source::<bool>();
//! let inside = derive((&pointer, &over), |(p, over), update| {
//!     if over {
//!         update.emit(p);
//!     }
//! });
//! let unsubscribe = inside.subscribe(|p| println!("{p}"));
//! ```

mod combinators;
mod graph;
mod node;

pub use combinators::{derive, derive_from, CellSet, Dependencies, Update};
pub use graph::{Graph, NodeId};
pub use node::{NodeCell, Stream};
