//! Scene - the renderer collaborator, seen from the engine.
//!
//! The engine never draws. It asks the host's scene two kinds of questions:
//!
//! - [`SceneProbe`]: where is the interactive surface, what does the pointer
//!   hit, which entity sits at a cell
//! - [`Scene`]: read/write an entity's visual properties, show/hide it, and
//!   draw a frame
//!
//! [`VisualArrays`] is a ready-made property store a host can embed: one
//! column per property, indexed by [`EntityId`].

use glam::Vec2;

use crate::types::{AxialCoord, EntityId, PixelPoint, Property, ViewportRect};

/// Read-only queries used while hit-testing.
pub trait SceneProbe {
    /// Current bounding box of the interactive surface, in client coordinates.
    fn viewport_rect(&self) -> ViewportRect;

    /// Project a normalized pointer (`[-1, 1]²`, y up) onto the board plane.
    /// `None` if the ray misses it.
    fn ray_intersect(&self, pointer: Vec2) -> Option<PixelPoint>;

    /// Renderable at a cell. `None` outside the generated board.
    fn cell_at(&self, coord: AxialCoord) -> Option<EntityId>;
}

/// Mutable visual surface the scheduler and the follow strategy write to.
pub trait Scene: SceneProbe {
    /// Entity whose position is the camera's.
    fn camera(&self) -> EntityId;

    /// Entity whose position is the light's.
    fn light(&self) -> EntityId;

    fn property(&self, entity: EntityId, property: Property) -> f32;

    fn set_property(&mut self, entity: EntityId, property: Property, value: f32);

    fn set_visible(&mut self, entity: EntityId, visible: bool);

    /// Called with every new viewport measurement.
    fn resize(&mut self, _rect: ViewportRect) {}

    /// Called once per clock tick, after transitions advanced.
    fn render_frame(&mut self, _time: f64) {}

    /// Move an entity to a scene-space position.
    fn place(&mut self, entity: EntityId, position: Vec2) {
        self.set_property(entity, Property::PositionX, position.x);
        self.set_property(entity, Property::PositionY, position.y);
    }

    /// Current scene-space position of an entity.
    fn position(&self, entity: EntityId) -> Vec2 {
        Vec2::new(
            self.property(entity, Property::PositionX),
            self.property(entity, Property::PositionY),
        )
    }
}

// =============================================================================
// VisualArrays
// =============================================================================

/// Parallel property columns, one slot per entity.
///
/// Reads past the end return the column default; writes grow the columns.
#[derive(Debug, Clone, Default)]
pub struct VisualArrays {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub scale: Vec<f32>,
    pub opacity: Vec<f32>,
    pub visible: Vec<bool>,
}

impl VisualArrays {
    /// Columns for `len` entities at the origin, unit scale, opaque, hidden.
    pub fn with_len(len: usize) -> Self {
        let mut arrays = Self::default();
        if len > 0 {
            arrays.ensure_capacity(len - 1);
        }
        arrays
    }

    /// Number of entity slots.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Ensure every column has a slot for `index`.
    pub fn ensure_capacity(&mut self, index: usize) {
        if index >= self.x.len() {
            let len = index + 1;
            self.x.resize(len, 0.0);
            self.y.resize(len, 0.0);
            self.scale.resize(len, 1.0);
            self.opacity.resize(len, 1.0);
            self.visible.resize(len, false);
        }
    }

    pub fn get(&self, entity: EntityId, property: Property) -> f32 {
        let index = entity.index();
        match property {
            Property::PositionX => self.x.get(index).copied().unwrap_or(0.0),
            Property::PositionY => self.y.get(index).copied().unwrap_or(0.0),
            Property::Scale => self.scale.get(index).copied().unwrap_or(1.0),
            Property::Opacity => self.opacity.get(index).copied().unwrap_or(1.0),
        }
    }

    pub fn set(&mut self, entity: EntityId, property: Property, value: f32) {
        let index = entity.index();
        self.ensure_capacity(index);
        let column = match property {
            Property::PositionX => &mut self.x,
            Property::PositionY => &mut self.y,
            Property::Scale => &mut self.scale,
            Property::Opacity => &mut self.opacity,
        };
        column[index] = value;
    }

    pub fn is_visible(&self, entity: EntityId) -> bool {
        self.visible.get(entity.index()).copied().unwrap_or(false)
    }

    pub fn set_visible(&mut self, entity: EntityId, visible: bool) {
        let index = entity.index();
        self.ensure_capacity(index);
        self.visible[index] = visible;
    }

    /// Indices of every visible entity.
    pub fn visible_entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.visible
            .iter()
            .enumerate()
            .filter(|(_, visible)| **visible)
            .map(|(index, _)| EntityId(index as u32))
    }
}

// =============================================================================
// Tests
// =============================================================================
