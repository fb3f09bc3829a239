//! Interaction - raw input sources wired into hover edges and followers.
//!
//! # Graph
//!
//! ```text
//! viewport_resize ─┐
//! viewport_scroll ─┴─ merge_any ─▶ viewport_rect
//!
//! pointer_move ─┐
//! pointer_over ─┼─▶ pointer_in_bounds ─▶ hovered_cell ─dedupe─▶ entered_cell
//! viewport_rect ┘          │                                        │
//!                          │                                   previous
//!                          │                                        ▼
//!                          │                                   exited_cell
//!                          ├─▶ camera_target ─┐
//!                          └─▶ light_target ──┼─ + clock_tick ─▶ smoothed_camera
//!                                             └─ + clock_tick ─▶ smoothed_light
//! ```
//!
//! Hit-testing is delegated to the scene: the normalized pointer is projected
//! with [`SceneProbe::ray_intersect`], converted with
//! [`pixel_to_axial`](crate::hex::pixel_to_axial) and confirmed with
//! [`SceneProbe::cell_at`]. Any miss along the way is `None`.

mod follow;
mod pointer;

pub use follow::{
    step_toward, step_toward_vec, stepped_follower, FOLLOW_STEP, INITIAL_CAMERA, INITIAL_LIGHT,
};
pub use pointer::{camera_target, light_target, normalize_pointer, CAMERA_OFFSET, LIGHT_FACTOR};

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use crate::board::Board;
use crate::hex::pixel_to_axial;
use crate::scene::SceneProbe;
use crate::stream::{derive, Graph, Stream};
use crate::types::{AxialCoord, ViewportRect};

// =============================================================================
// Input sources
// =============================================================================

/// Source nodes fed by the host's event loop.
#[derive(Debug, Clone)]
pub struct InputSources {
    /// Pointer position in client coordinates.
    pub pointer_move: Stream<Vec2>,
    /// `true` on pointer enter, `false` on pointer leave.
    pub pointer_over: Stream<bool>,
    /// The surface was resized; triggers a re-measure.
    pub viewport_resize: Stream<()>,
    /// The page scrolled by the given delta; triggers a re-measure.
    pub viewport_scroll: Stream<Vec2>,
    /// Frame time in milliseconds.
    pub clock_tick: Stream<f64>,
}

impl InputSources {
    /// Fresh, empty sources in `graph`.
    pub fn new(graph: &Graph) -> Self {
        Self {
            pointer_move: graph.source(),
            pointer_over: graph.source(),
            viewport_resize: graph.source(),
            viewport_scroll: graph.source(),
            clock_tick: graph.source(),
        }
    }

    pub fn graph(&self) -> &Graph {
        self.pointer_move.graph()
    }

    /// End every source, and with them every derived node.
    pub fn end_all(&self) {
        self.pointer_move.end();
        self.pointer_over.end();
        self.viewport_resize.end();
        self.viewport_scroll.end();
        self.clock_tick.end();
    }
}

// =============================================================================
// Interaction graph
// =============================================================================

/// Derived nodes the host and the animation layer subscribe to.
#[derive(Debug, Clone)]
pub struct InteractionGraph {
    pub viewport_rect: Stream<ViewportRect>,
    /// Normalized pointer, or `None` when off the surface.
    pub pointer_in_bounds: Stream<Option<Vec2>>,
    pub hovered_cell: Stream<Option<AxialCoord>>,
    /// New distinct hover value (including `None`).
    pub entered_cell: Stream<Option<AxialCoord>>,
    /// The hover value each `entered_cell` emission replaced.
    pub exited_cell: Stream<Option<AxialCoord>>,
    pub camera_target: Stream<Vec2>,
    pub light_target: Stream<Vec2>,
    pub smoothed_camera: Stream<Vec2>,
    pub smoothed_light: Stream<Vec2>,
    pub clock_tick: Stream<f64>,
}

impl InteractionGraph {
    /// Wire the derived nodes over `inputs`.
    ///
    /// Targets and followers are seeded at [`INITIAL_CAMERA`] and
    /// [`INITIAL_LIGHT`].
    pub fn build<S>(inputs: &InputSources, scene: &Rc<RefCell<S>>, board: Board) -> Self
    where
        S: SceneProbe + 'static,
    {
        let graph = inputs.graph();

        let scrolled = inputs.viewport_scroll.map(|_| ());
        let remeasure = graph.merge_any(&[&inputs.viewport_resize, &scrolled]);
        let probe = scene.clone();
        // A busy scene skips the measurement and keeps the last rect
        let viewport_rect = remeasure.filter_map(move |()| {
            let Ok(scene) = probe.try_borrow() else {
                log::warn!("scene busy while measuring viewport, keeping last rect");
                return None;
            };
            let rect = scene.viewport_rect();
            log::debug!(
                "viewport {}x{} at ({}, {})",
                rect.size.x,
                rect.size.y,
                rect.origin.x,
                rect.origin.y
            );
            Some(rect)
        });

        let pointer_in_bounds = derive(
            (&inputs.pointer_move, &inputs.pointer_over, &viewport_rect),
            |(client, over, rect), update| update.emit(normalize_pointer(client, over, rect)),
        );

        let probe = scene.clone();
        let hovered_cell = pointer_in_bounds.map(move |pointer| {
            pointer.and_then(|pointer| resolve_cell(&*probe, board, pointer))
        });

        let entered_cell = hovered_cell.dedupe();
        let exited_cell = entered_cell.previous();

        let camera_target =
            pointer_in_bounds.filter_map(|pointer| pointer.map(self::camera_target));
        let light_target =
            pointer_in_bounds.filter_map(|pointer| pointer.map(self::light_target));
        camera_target.push(INITIAL_CAMERA);
        light_target.push(INITIAL_LIGHT);

        let clock_tick = inputs.clock_tick.clone();
        let smoothed_camera =
            stepped_follower(&clock_tick, &camera_target, FOLLOW_STEP, INITIAL_CAMERA);
        let smoothed_light =
            stepped_follower(&clock_tick, &light_target, FOLLOW_STEP, INITIAL_LIGHT);

        log::trace!("interaction graph built: {} nodes", graph.node_count());

        Self {
            viewport_rect,
            pointer_in_bounds,
            hovered_cell,
            entered_cell,
            exited_cell,
            camera_target,
            light_target,
            smoothed_camera,
            smoothed_light,
            clock_tick,
        }
    }
}

/// Project a normalized pointer to the cell under it.
fn resolve_cell<S: SceneProbe>(
    scene: &RefCell<S>,
    board: Board,
    pointer: Vec2,
) -> Option<AxialCoord> {
    let Ok(scene) = scene.try_borrow() else {
        log::warn!("scene busy during hit-test");
        return None;
    };
    let hit = scene.ray_intersect(pointer)?;
    if !hit.is_finite() {
        return None;
    }
    let coord = pixel_to_axial(hit);
    if !board.contains(coord) {
        return None;
    }
    scene.cell_at(coord).map(|_| coord)
}

// =============================================================================
// Tests
// =============================================================================
