//! Animate - per-entity transitions advanced by a single scheduler.
//!
//! # Pattern
//!
//! - A [`TransitionSpec`] describes one property converging on a value,
//!   by duration or by speed
//! - A [`Phase`] is a named list of specs; hooks can show, hide, or chain
//!   into another phase when a transition starts or settles
//! - The [`Scheduler`] owns one live list per entity and the active set,
//!   and writes property values through the [`Scene`](crate::scene::Scene)
//!
//! # Example
//!
//! ```ignore
//! let mut book = PhaseBook::new();
//! let tiles = TileAnimations::register(&mut book, &TileStyle::default());
//! let mut scheduler = Scheduler::new(book);
//!
//! scheduler.play(entity, tiles.enter);
//! let stats = scheduler.tick(time, &mut scene);
//! ```

mod phase;
mod scheduler;
mod tile;
mod transition;

pub use phase::{Phase, PhaseBook, PhaseId};
pub use scheduler::{Scheduler, TickStats};
pub use tile::TileAnimations;
pub use transition::{
    settled, Convergence, Hook, Origin, Step, Transition, TransitionSpec, SETTLE_DECIMALS,
};
