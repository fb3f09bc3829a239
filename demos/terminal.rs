//! Terminal Example - hex board hover highlights in the terminal
//!
//! This example drives the whole engine from crossterm events:
//! - Mouse motion → pointer_move
//! - Focus gained/lost → pointer_over
//! - Resize → viewport_resize
//! - A ~60 Hz poll loop → clock_tick
//!
//! Tiles are drawn as shaded blocks whose size follows the tile scale and
//! whose shade follows its opacity. `*` marks the light.
//!
//! Run with: cargo run --example terminal
//! Quit with: q or Esc

use std::cell::RefCell;
use std::io::{self, stdout, Stdout, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    poll, read, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
    Event, KeyCode, MouseEventKind,
};
use crossterm::style::Print;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, size, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};

use spark_honeycomb::interaction::INITIAL_CAMERA;
use spark_honeycomb::{
    axial_to_pixel, pixel_to_axial, start, AxialCoord, Board, EntityId, Graph, HoneycombConfig,
    InputSources, PixelPoint, Property, Scene, SceneProbe, Vec2, ViewportRect, VisualArrays,
};

/// Terminal columns per scene unit.
const COLUMNS_PER_UNIT: f32 = 4.0;
/// Terminal rows per scene unit.
const ROWS_PER_UNIT: f32 = 2.0;
/// Inradius of a unit hex.
const INRADIUS: f32 = 0.866;

// =============================================================================
// Terminal scene
// =============================================================================

struct TerminalScene {
    board: Board,
    arrays: VisualArrays,
    columns: u16,
    rows: u16,
    out: Stdout,
}

impl TerminalScene {
    fn new(board: Board, columns: u16, rows: u16) -> Self {
        Self {
            board,
            arrays: VisualArrays::with_len(board.len() + 2),
            columns,
            rows,
            out: stdout(),
        }
    }

    /// Camera displacement from its resting position shifts the view.
    fn pan(&self) -> Vec2 {
        self.position(self.camera()) - INITIAL_CAMERA
    }

    /// Scene point under a terminal cell center.
    fn scene_point(&self, column: u16, row: u16) -> Vec2 {
        let half = Vec2::new(self.columns as f32, self.rows as f32) / 2.0;
        let offset = Vec2::new(column as f32 + 0.5, row as f32 + 0.5) - half;
        Vec2::new(offset.x / COLUMNS_PER_UNIT, -offset.y / ROWS_PER_UNIT) + self.pan()
    }

    fn glyph(&self, point: Vec2) -> char {
        let coord = pixel_to_axial(point);
        let Some(entity) = self.board.entity_at(coord) else {
            return ' ';
        };
        let center = axial_to_pixel(coord);
        if !self.arrays.is_visible(entity) {
            return if (point - center).length() < 0.3 { '·' } else { ' ' };
        }

        let scale = self.arrays.get(entity, Property::Scale);
        if (point - center).length() > scale * INRADIUS {
            return ' ';
        }
        match self.arrays.get(entity, Property::Opacity) {
            o if o >= 0.28 => '█',
            o if o >= 0.2 => '▓',
            o if o >= 0.12 => '▒',
            _ => '░',
        }
    }

    fn draw(&mut self, time: f64) -> io::Result<()> {
        let light = self.position(self.light());
        let light_cell = (
            ((light.x - self.pan().x) * COLUMNS_PER_UNIT + self.columns as f32 / 2.0) as i32,
            (-(light.y - self.pan().y) * ROWS_PER_UNIT + self.rows as f32 / 2.0) as i32,
        );

        for row in 0..self.rows {
            let line: String = (0..self.columns)
                .map(|column| {
                    if (column as i32, row as i32) == light_cell {
                        '*'
                    } else {
                        self.glyph(self.scene_point(column, row))
                    }
                })
                .collect();
            queue!(self.out, MoveTo(0, row), Print(line))?;
        }
        let status = format!(" t={:>8.0}ms  q to quit ", time);
        queue!(self.out, MoveTo(0, 0), Print(status))?;
        self.out.flush()
    }
}

impl SceneProbe for TerminalScene {
    fn viewport_rect(&self) -> ViewportRect {
        ViewportRect::new(0.0, 0.0, self.columns as f32, self.rows as f32)
    }

    fn ray_intersect(&self, pointer: Vec2) -> Option<PixelPoint> {
        let half = Vec2::new(
            self.columns as f32 / 2.0 / COLUMNS_PER_UNIT,
            self.rows as f32 / 2.0 / ROWS_PER_UNIT,
        );
        Some(pointer * half + self.pan())
    }

    fn cell_at(&self, coord: AxialCoord) -> Option<EntityId> {
        self.board.entity_at(coord)
    }
}

impl Scene for TerminalScene {
    fn camera(&self) -> EntityId {
        EntityId(self.board.len() as u32)
    }

    fn light(&self) -> EntityId {
        EntityId(self.board.len() as u32 + 1)
    }

    fn property(&self, entity: EntityId, property: Property) -> f32 {
        self.arrays.get(entity, property)
    }

    fn set_property(&mut self, entity: EntityId, property: Property, value: f32) {
        self.arrays.set(entity, property, value);
    }

    fn set_visible(&mut self, entity: EntityId, visible: bool) {
        self.arrays.set_visible(entity, visible);
    }

    fn resize(&mut self, rect: ViewportRect) {
        log::debug!("terminal {}x{}", rect.size.x, rect.size.y);
    }

    fn render_frame(&mut self, time: f64) {
        // Best effort, like any terminal renderer
        let _ = self.draw(time);
    }
}

// =============================================================================
// Main
// =============================================================================

fn main() -> io::Result<()> {
    env_logger::init();

    let config = HoneycombConfig {
        board_size: 16,
        ..Default::default()
    };
    let board = Board::new(config.board_size)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    let (columns, rows) = size()?;
    let scene = Rc::new(RefCell::new(TerminalScene::new(board, columns, rows)));

    let graph = Graph::new();
    let inputs = InputSources::new(&graph);
    let handle = start(inputs.clone(), scene.clone(), config)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    enable_raw_mode()?;
    execute!(
        stdout(),
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange,
        Hide
    )?;

    let result = run(&inputs, &scene);

    handle.stop();
    execute!(
        stdout(),
        Show,
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    disable_raw_mode()?;
    result
}

fn run(inputs: &InputSources, scene: &Rc<RefCell<TerminalScene>>) -> io::Result<()> {
    let started = Instant::now();
    // Terminals don't report pointer enter; assume over until focus is lost
    inputs.pointer_over.push(true);

    loop {
        if poll(Duration::from_millis(16))? {
            match read()? {
                Event::Key(key) if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) => {
                    return Ok(());
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                        let client = Vec2::new(mouse.column as f32 + 0.5, mouse.row as f32 + 0.5);
                        inputs.pointer_move.push(client);
                    }
                    MouseEventKind::ScrollUp => inputs.viewport_scroll.push(Vec2::new(0.0, -1.0)),
                    MouseEventKind::ScrollDown => inputs.viewport_scroll.push(Vec2::new(0.0, 1.0)),
                    _ => {}
                },
                Event::FocusGained => inputs.pointer_over.push(true),
                Event::FocusLost => inputs.pointer_over.push(false),
                Event::Resize(columns, rows) => {
                    {
                        let mut scene = scene.borrow_mut();
                        scene.columns = columns;
                        scene.rows = rows;
                    }
                    inputs.viewport_resize.push(());
                }
                _ => {}
            }
        }

        inputs
            .clock_tick
            .push(started.elapsed().as_secs_f64() * 1000.0);
    }
}
