//! End-to-end lifecycle tests against a recording scene.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_honeycomb::{
    axial_to_pixel, start, AxialCoord, Board, ConfigError, EntityId, FollowStrategy, Graph,
    HoneycombConfig, HoneycombHandle, InputSources, PixelPoint, Property, Scene, SceneProbe,
    Vec2, ViewportRect, VisualArrays,
};

const FRAME_MS: f64 = 16.0;

/// Orthographic scene: NDC × 10 lands on the board plane.
struct MockScene {
    board: Board,
    arrays: VisualArrays,
    rect: ViewportRect,
    reads: Cell<usize>,
    resizes: Vec<ViewportRect>,
    frames: Vec<f64>,
}

impl MockScene {
    fn new(board_size: i32) -> Self {
        let board = Board::new(board_size.max(1)).unwrap();
        Self {
            board,
            arrays: VisualArrays::with_len(board.len() + 2),
            rect: ViewportRect::new(0.0, 0.0, 200.0, 200.0),
            reads: Cell::new(0),
            resizes: Vec::new(),
            frames: Vec::new(),
        }
    }

    fn tile(&self, q: i32, r: i32) -> EntityId {
        self.board.entity_at(AxialCoord::new(q, r)).unwrap()
    }
}

impl SceneProbe for MockScene {
    fn viewport_rect(&self) -> ViewportRect {
        self.rect
    }

    fn ray_intersect(&self, pointer: Vec2) -> Option<PixelPoint> {
        Some(pointer * 10.0)
    }

    fn cell_at(&self, coord: AxialCoord) -> Option<EntityId> {
        self.board.entity_at(coord)
    }
}

impl Scene for MockScene {
    fn camera(&self) -> EntityId {
        EntityId(self.board.len() as u32)
    }

    fn light(&self) -> EntityId {
        EntityId(self.board.len() as u32 + 1)
    }

    fn property(&self, entity: EntityId, property: Property) -> f32 {
        self.reads.set(self.reads.get() + 1);
        self.arrays.get(entity, property)
    }

    fn set_property(&mut self, entity: EntityId, property: Property, value: f32) {
        self.arrays.set(entity, property, value);
    }

    fn set_visible(&mut self, entity: EntityId, visible: bool) {
        self.arrays.set_visible(entity, visible);
    }

    fn resize(&mut self, rect: ViewportRect) {
        self.resizes.push(rect);
    }

    fn render_frame(&mut self, time: f64) {
        self.frames.push(time);
    }
}

struct Fixture {
    scene: Rc<RefCell<MockScene>>,
    inputs: InputSources,
    handle: HoneycombHandle<MockScene>,
    time: f64,
}

impl Fixture {
    fn move_to(&self, coord: AxialCoord) {
        self.inputs.pointer_move.push(client_for(coord));
    }

    /// Push clock ticks covering `ms` milliseconds.
    fn run(&mut self, ms: f64) {
        let end = self.time + ms;
        while self.time < end {
            self.time += FRAME_MS;
            self.inputs.clock_tick.push(self.time);
        }
    }

    fn visible(&self, q: i32, r: i32) -> bool {
        let scene = self.scene.borrow();
        scene.arrays.is_visible(scene.tile(q, r))
    }

    fn scale(&self, q: i32, r: i32) -> f32 {
        let scene = self.scene.borrow();
        scene.arrays.get(scene.tile(q, r), Property::Scale)
    }

    fn is_active(&self, q: i32, r: i32) -> bool {
        let entity = self.scene.borrow().tile(q, r);
        self.handle.scheduler().borrow().is_active(entity)
    }
}

fn setup(config: HoneycombConfig) -> Fixture {
    let scene = Rc::new(RefCell::new(MockScene::new(config.board_size)));
    let graph = Graph::new();
    let inputs = InputSources::new(&graph);
    let handle = match start(inputs.clone(), scene.clone(), config) {
        Ok(handle) => handle,
        Err(err) => panic!("start failed: {err}"),
    };
    inputs.pointer_over.push(true);
    Fixture {
        scene,
        inputs,
        handle,
        time: 0.0,
    }
}

fn small() -> HoneycombConfig {
    HoneycombConfig {
        board_size: 4,
        ..Default::default()
    }
}

/// Client position whose projection is the center of `coord`.
fn client_for(coord: AxialCoord) -> Vec2 {
    let ndc = axial_to_pixel(coord) / 10.0;
    Vec2::new((ndc.x + 1.0) * 100.0, (1.0 - ndc.y) * 100.0)
}

fn record<T: Clone + 'static>(
    stream: &spark_honeycomb::Stream<T>,
) -> Rc<RefCell<Vec<T>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_clone = seen.clone();
    let _ = stream.subscribe(move |v: &T| seen_clone.borrow_mut().push(v.clone()));
    seen
}

fn approx(a: Vec2, b: Vec2) -> bool {
    (a - b).length() < 1e-3
}

// =============================================================================
// Hover edges
// =============================================================================

#[test]
fn test_edge_sequence_from_noisy_hover() {
    let fixture = setup(small());
    let entered = record(&fixture.handle.outputs().entered_cell);
    let exited = record(&fixture.handle.outputs().exited_cell);

    let a = AxialCoord::new(0, 0);
    let b = AxialCoord::new(1, 0);
    let c = AxialCoord::new(-1, 1);

    fixture.move_to(a);
    fixture.inputs.pointer_move.push(client_for(a) + Vec2::new(0.5, 0.5));
    fixture.move_to(b);
    fixture.move_to(b);
    // Top-left corner projects far outside a 4-board
    fixture.inputs.pointer_move.push(Vec2::new(0.0, 0.0));
    fixture.move_to(c);

    assert_eq!(*entered.borrow(), vec![Some(a), Some(b), None, Some(c)]);
    assert_eq!(*exited.borrow(), vec![Some(a), Some(b), None]);
}

#[test]
fn test_pointer_leaving_surface_exits_tile() {
    let mut fixture = setup(small());
    fixture.move_to(AxialCoord::new(2, -1));
    fixture.run(FRAME_MS);
    assert!(fixture.visible(2, -1));

    fixture.inputs.pointer_over.push(false);
    fixture.run(1000.0);
    assert!(!fixture.visible(2, -1));
    assert!(!fixture.is_active(2, -1));
}

// =============================================================================
// Tile phases
// =============================================================================

#[test]
fn test_enter_shows_tile_and_exit_hides_it() {
    let mut fixture = setup(small());

    fixture.move_to(AxialCoord::new(0, 0));
    fixture.run(FRAME_MS);
    assert!(fixture.visible(0, 0));
    assert!(fixture.is_active(0, 0));

    fixture.move_to(AxialCoord::new(1, 0));
    fixture.run(1200.0);

    assert!(!fixture.visible(0, 0));
    assert!(!fixture.is_active(0, 0));
    assert!((fixture.scale(0, 0) - 0.02).abs() < 0.01);

    // The hovered tile keeps breathing
    assert!(fixture.visible(1, 0));
    assert!(fixture.is_active(1, 0));
}

#[test]
fn test_enter_pops_then_breathes() {
    let mut fixture = setup(small());
    fixture.move_to(AxialCoord::new(-2, 1));

    fixture.run(100.0);
    let popped = fixture.scale(-2, 1);
    assert!(popped > 0.8, "pop scale {popped}");

    let mut low = f32::MAX;
    let mut high = f32::MIN;
    fixture.run(600.0);
    for _ in 0..200 {
        fixture.run(FRAME_MS);
        let scale = fixture.scale(-2, 1);
        low = low.min(scale);
        high = high.max(scale);
    }

    // Breathing between rest and breathe scale
    assert!(low >= 0.59 && low < 0.65, "low {low}");
    assert!(high > 0.75 && high <= 0.81, "high {high}");
    assert!(fixture.is_active(-2, 1));
}

#[test]
fn test_reenter_cancels_fade() {
    let mut fixture = setup(small());
    let a = AxialCoord::new(0, 0);

    fixture.move_to(a);
    fixture.run(200.0);
    fixture.move_to(AxialCoord::new(0, 1));
    fixture.run(200.0);
    fixture.move_to(a);
    fixture.run(1500.0);

    // The fade was replaced before it could hide the tile
    assert!(fixture.visible(0, 0));
    assert!(fixture.is_active(0, 0));
}

#[test]
fn test_edge_dropped_while_host_holds_scene() {
    let mut fixture = setup(small());
    fixture.move_to(AxialCoord::new(0, 0));
    fixture.run(FRAME_MS);

    {
        let _busy = fixture.scene.borrow_mut();
        fixture.move_to(AxialCoord::new(1, 0));
    }
    fixture.run(1000.0);

    // The exit edge never reached the scheduler
    assert!(fixture.visible(0, 0));
    assert!(fixture.is_active(0, 0));
    assert!(!fixture.visible(1, 0));
}

// =============================================================================
// Camera and light
// =============================================================================

#[test]
fn test_stepped_followers_converge() {
    let mut fixture = setup(small());
    // NDC (0.5, 0): camera target (0.5, -5), light target (-2.5, 0)
    fixture.inputs.pointer_move.push(Vec2::new(150.0, 100.0));

    fixture.run(FRAME_MS);
    {
        let scene = fixture.scene.borrow();
        assert!(approx(scene.position(scene.camera()), Vec2::new(0.5, -5.0)));
        assert!(approx(scene.position(scene.light()), Vec2::new(-0.5, 0.0)));
    }

    fixture.run(4.0 * FRAME_MS);
    let scene = fixture.scene.borrow();
    assert!(approx(scene.position(scene.light()), Vec2::new(-2.5, 0.0)));
    assert_eq!(
        fixture.handle.outputs().smoothed_light.get(),
        Some(Vec2::new(-2.5, 0.0))
    );
}

#[test]
fn test_transition_follow_strategy() {
    let mut fixture = setup(HoneycombConfig {
        follow: FollowStrategy::transition(),
        ..small()
    });
    fixture.inputs.pointer_move.push(Vec2::new(150.0, 100.0));

    fixture.run(FRAME_MS);
    let camera = fixture.scene.borrow().camera();
    {
        let scene = fixture.scene.borrow();
        assert!(approx(scene.position(camera), Vec2::new(0.1, -5.0)));
    }

    fixture.run(10.0 * FRAME_MS);
    {
        let scene = fixture.scene.borrow();
        assert!(approx(scene.position(camera), Vec2::new(0.5, -5.0)));
        assert!(approx(scene.position(scene.light()), Vec2::new(-2.5, 0.0)));
    }
    assert!(!fixture.handle.scheduler().borrow().is_active(camera));
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_viewport_measured_and_forwarded() {
    let fixture = setup(small());
    assert_eq!(fixture.scene.borrow().resizes.len(), 1);

    fixture.scene.borrow_mut().rect = ViewportRect::new(10.0, 10.0, 300.0, 150.0);
    fixture.inputs.viewport_resize.push(());
    fixture.inputs.viewport_scroll.push(Vec2::new(0.0, 20.0));

    let scene = fixture.scene.borrow();
    assert_eq!(scene.resizes.len(), 3);
    assert_eq!(scene.resizes[2], ViewportRect::new(10.0, 10.0, 300.0, 150.0));
}

#[test]
fn test_frame_drawn_every_tick() {
    let mut fixture = setup(small());
    fixture.run(3.0 * FRAME_MS);
    assert_eq!(fixture.scene.borrow().frames, vec![16.0, 32.0, 48.0]);
}

#[test]
fn test_stop_twice_is_silent() {
    let mut fixture = setup(small());
    let entered = record(&fixture.handle.outputs().entered_cell);

    fixture.handle.stop();
    fixture.handle.stop();
    assert!(!fixture.handle.is_running());
    assert!(fixture.handle.outputs().entered_cell.is_ended());
    assert!(fixture.handle.frame().is_ended());

    fixture.move_to(AxialCoord::new(0, 0));
    fixture.run(5.0 * FRAME_MS);

    assert!(entered.borrow().is_empty());
    assert!(fixture.scene.borrow().frames.is_empty());
    assert!(!fixture.visible(0, 0));
}

#[test]
fn test_idle_tick_touches_nothing() {
    let mut fixture = setup(HoneycombConfig::default());
    fixture.run(50.0 * FRAME_MS);

    assert_eq!(fixture.scene.borrow().reads.get(), 0);
    assert_eq!(fixture.handle.scheduler().borrow().active_len(), 0);
    assert_eq!(fixture.scene.borrow().frames.len(), 50);
}

#[test]
fn test_invalid_config_rejected() {
    let scene = Rc::new(RefCell::new(MockScene::new(1)));
    let graph = Graph::new();
    let inputs = InputSources::new(&graph);
    let config = HoneycombConfig {
        board_size: 0,
        ..Default::default()
    };

    match start(inputs, scene, config) {
        Err(err) => assert_eq!(err, ConfigError::EmptyBoard { size: 0 }),
        Ok(_) => panic!("empty board accepted"),
    }
}
