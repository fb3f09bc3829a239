//! Pipeline - from host events to drawn frames.
//!
//! # Pipeline Architecture
//!
//! ```text
//! host events → InputSources → InteractionGraph → subscribers → Scheduler → Scene
//!                                    │
//!                                    └─ frame (clock) → Scheduler::tick → Scene::render_frame
//! ```
//!
//! ## Key Design Principles
//!
//! - **Pure Deriveds**: every interaction node is a pure function of its inputs
//!   (plus read-only scene probes)
//! - **Side Effects in Subscribers**: only subscribers mutate the scene and the
//!   scheduler, after the graph settled

pub mod mount;

pub use mount::{start, stop, HoneycombHandle};
