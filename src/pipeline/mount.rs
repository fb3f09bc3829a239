//! Mount API - lifecycle of one interactive board.
//!
//! `start()` builds the interaction graph over the host's input sources and
//! subscribes the animation layer to it. `stop()` ends every source, which
//! ends every derived node, and drops every subscription.
//!
//! # Example
//!
//! ```ignore
//! use spark_honeycomb::pipeline::mount;
//!
//! let graph = Graph::new();
//! let inputs = InputSources::new(&graph);
//! let handle = mount::start(inputs.clone(), scene, HoneycombConfig::default())?;
//!
//! // Host event loop
//! inputs.pointer_over.push(true);
//! inputs.pointer_move.push(Vec2::new(120.0, 80.0));
//! inputs.clock_tick.push(16.0);
//!
//! // Clean up
//! handle.stop();
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;

use crate::animate::{PhaseBook, PhaseId, Scheduler, TileAnimations, TransitionSpec};
use crate::board::Board;
use crate::config::{FollowStrategy, HoneycombConfig};
use crate::error::Result;
use crate::interaction::{InputSources, InteractionGraph, INITIAL_CAMERA, INITIAL_LIGHT};
use crate::scene::Scene;
use crate::stream::{derive, Stream, Update};
use crate::types::{AxialCoord, EntityId, Property};

// =============================================================================
// Honeycomb Handle
// =============================================================================

/// Handle returned by [`start`]. Dropping it stops the board.
///
/// Holds references to:
/// - The input sources (ended on stop)
/// - The derived output nodes and the frame node
/// - The shared scene and scheduler
/// - The unsubscribe functions of the animation layer
pub struct HoneycombHandle<S: Scene + 'static> {
    inputs: InputSources,
    outputs: InteractionGraph,
    frame: Stream<f64>,
    scene: Rc<RefCell<S>>,
    scheduler: Rc<RefCell<Scheduler>>,
    tiles: TileAnimations,
    board: Board,
    unsubscribe: RefCell<Vec<Box<dyn FnOnce()>>>,
    running: Cell<bool>,
}

impl<S: Scene + 'static> HoneycombHandle<S> {
    pub fn inputs(&self) -> &InputSources {
        &self.inputs
    }

    /// Output nodes: entered/exited cells, followers, clock.
    pub fn outputs(&self) -> &InteractionGraph {
        &self.outputs
    }

    /// Clock time, emitted after the followers settled for that tick.
    pub fn frame(&self) -> &Stream<f64> {
        &self.frame
    }

    pub fn scene(&self) -> &Rc<RefCell<S>> {
        &self.scene
    }

    pub fn scheduler(&self) -> &Rc<RefCell<Scheduler>> {
        &self.scheduler
    }

    pub fn tiles(&self) -> TileAnimations {
        self.tiles
    }

    pub fn board(&self) -> Board {
        self.board
    }

    /// Check if still running.
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// End every source and drop every subscription. Idempotent.
    pub fn stop(&self) {
        if !self.running.replace(false) {
            return;
        }
        self.inputs.end_all();
        let unsubscribe = std::mem::take(&mut *self.unsubscribe.borrow_mut());
        for unsubscribe in unsubscribe {
            unsubscribe();
        }
        log::info!("honeycomb stopped");
    }
}

impl<S: Scene + 'static> Drop for HoneycombHandle<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

// =============================================================================
// Start / Stop
// =============================================================================

/// Wire the interaction graph over `inputs` and drive `scene` from it.
///
/// This sets up:
/// 1. Config validation and the board region
/// 2. The interaction graph (hover edges, targets, followers)
/// 3. The frame node: clock ticks, after the followers settled
/// 4. Subscriptions: resize, tile enter/exit phases, camera/light follow,
///    and scheduler tick + frame draw
/// 5. Initial seeding: one viewport measurement, camera and light placed at
///    their initial positions
pub fn start<S: Scene + 'static>(
    inputs: InputSources,
    scene: Rc<RefCell<S>>,
    config: HoneycombConfig,
) -> Result<HoneycombHandle<S>> {
    config.validate()?;
    let board = Board::new(config.board_size)?;

    let mut book = PhaseBook::new();
    let tiles = TileAnimations::register(&mut book, &config.tiles);
    let scheduler = Rc::new(RefCell::new(Scheduler::new(book)));

    let outputs = InteractionGraph::build(&inputs, &scene, board);
    let frame = derive(
        (
            &outputs.clock_tick,
            &outputs.smoothed_camera,
            &outputs.smoothed_light,
        ),
        |(time, _, _), update: &mut Update<'_, f64>| {
            if update.changed(0) {
                update.emit(time);
            }
        },
    );

    let (camera, light) = {
        let scene = scene.borrow();
        (scene.camera(), scene.light())
    };

    let mut unsubscribe: Vec<Box<dyn FnOnce()>> = Vec::new();

    // Viewport → renderer
    let target = scene.clone();
    unsubscribe.push(outputs.viewport_rect.subscribe(move |rect| {
        with_scene(&target, |scene| scene.resize(*rect));
    }));

    // Hover edges → tile phases
    unsubscribe.push(outputs.exited_cell.subscribe(tile_phase(
        scene.clone(),
        scheduler.clone(),
        tiles.exit,
        "exit",
    )));
    unsubscribe.push(outputs.entered_cell.subscribe(tile_phase(
        scene.clone(),
        scheduler.clone(),
        tiles.enter,
        "enter",
    )));

    // Camera and light follow
    match config.follow {
        FollowStrategy::Stepped => {
            for (follower, entity) in [
                (&outputs.smoothed_camera, camera),
                (&outputs.smoothed_light, light),
            ] {
                let target = scene.clone();
                unsubscribe.push(follower.subscribe(move |position| {
                    with_scene(&target, |scene| scene.place(entity, *position));
                }));
            }
        }
        FollowStrategy::Transition {
            camera_speed,
            light_speed,
        } => {
            for (target, entity, speed) in [
                (&outputs.camera_target, camera, camera_speed),
                (&outputs.light_target, light, light_speed),
            ] {
                let scheduler = scheduler.clone();
                unsubscribe.push(target.subscribe(move |to: &Vec2| {
                    scheduler.borrow_mut().animate(
                        entity,
                        &[
                            TransitionSpec::speed(Property::PositionX, to.x, speed),
                            TransitionSpec::speed(Property::PositionY, to.y, speed),
                        ],
                    );
                }));
            }
        }
    }

    // Frame: advance transitions, then draw
    let target = scene.clone();
    let ticking = scheduler.clone();
    unsubscribe.push(frame.subscribe(move |time| {
        let time = *time;
        with_scene(&target, |scene| {
            ticking.borrow_mut().tick(time, scene);
            scene.render_frame(time);
        });
    }));

    // Seed
    with_scene(&scene, |scene| {
        scene.place(camera, INITIAL_CAMERA);
        scene.place(light, INITIAL_LIGHT);
    });
    inputs.viewport_resize.push(());

    log::info!(
        "honeycomb started: {} cells, follow {:?}",
        board.len(),
        config.follow
    );

    Ok(HoneycombHandle {
        inputs,
        outputs,
        frame,
        scene,
        scheduler,
        tiles,
        board,
        unsubscribe: RefCell::new(unsubscribe),
        running: Cell::new(true),
    })
}

/// Stop a running board. Same as [`HoneycombHandle::stop`].
pub fn stop<S: Scene + 'static>(handle: &HoneycombHandle<S>) {
    handle.stop();
}

/// Subscriber playing `phase` on the tile at each emitted cell.
fn tile_phase<S: Scene + 'static>(
    scene: Rc<RefCell<S>>,
    scheduler: Rc<RefCell<Scheduler>>,
    phase: PhaseId,
    edge: &'static str,
) -> impl FnMut(&Option<AxialCoord>) + 'static {
    move |cell| {
        let Some(coord) = *cell else { return };
        let entity: Option<EntityId> = match scene.try_borrow() {
            Ok(scene) => scene.cell_at(coord),
            Err(_) => {
                log::warn!("scene busy, dropping {edge} of cell ({}, {})", coord.q, coord.r);
                None
            }
        };
        if let Some(entity) = entity {
            log::debug!("{edge} cell ({}, {}) → entity {}", coord.q, coord.r, entity.0);
            scheduler.borrow_mut().play(entity, phase);
        }
    }
}

/// Run `f` with the scene mutably borrowed, skipping (with a warning) if the
/// host is holding a borrow.
fn with_scene<S: Scene>(scene: &RefCell<S>, f: impl FnOnce(&mut S)) {
    match scene.try_borrow_mut() {
        Ok(mut scene) => f(&mut scene),
        Err(_) => log::warn!("scene busy, skipping update"),
    }
}
