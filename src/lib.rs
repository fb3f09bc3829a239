//! # spark-honeycomb
//!
//! Interactive hex board engine: hover highlights and a drifting camera and
//! light, driven by a push-based reactive graph.
//!
//! ## Architecture
//!
//! Host events (pointer motion, pointer over/out, viewport changes, clock
//! ticks) are pushed into source nodes. Every push settles the whole graph
//! synchronously and glitch-free, then subscribers run:
//! ```text
//! InputSources → InteractionGraph → entered/exited cells → Scheduler → Scene
//!                      │
//!                      └─ clock → followers → frame → Scheduler::tick → Scene::render_frame
//! ```
//!
//! The engine never draws. The host implements [`Scene`]: hit-testing, cell
//! lookup and per-entity visual properties.
//!
//! ## Modules
//!
//! - [`stream`] - Reactive dataflow graph (sources, derive, combinators)
//! - [`hex`] - Axial/cube/pixel coordinate math
//! - [`board`] - Finite cell region and dense entity numbering
//! - [`interaction`] - Hover edges, camera/light targets and followers
//! - [`animate`] - Transitions, phases and the scheduler
//! - [`scene`] - Renderer collaborator traits and a property store
//! - [`pipeline`] - `start`/`stop` lifecycle
//! - [`config`] - Board, tile style and follow strategy
//! - [`types`] - Core value types

pub mod animate;
pub mod board;
pub mod config;
pub mod error;
pub mod hex;
pub mod interaction;
pub mod pipeline;
pub mod scene;
pub mod stream;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use animate::{
    Hook, Origin, PhaseBook, PhaseId, Scheduler, TickStats, TileAnimations, TransitionSpec,
    SETTLE_DECIMALS,
};
pub use board::{Board, MAX_BOARD_SIZE};
pub use config::{FollowStrategy, HoneycombConfig, TileStyle, DEFAULT_BOARD_SIZE};
pub use error::{ConfigError, Result};
pub use hex::{axial_to_pixel, hex_vertices, pixel_to_axial};
pub use interaction::{step_toward, InputSources, InteractionGraph, FOLLOW_STEP};
pub use pipeline::{start, stop, HoneycombHandle};
pub use scene::{Scene, SceneProbe, VisualArrays};
pub use stream::{derive, derive_from, Graph, NodeId, Stream, Update};

pub use glam::Vec2;
