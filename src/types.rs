//! Core types for spark-honeycomb.
//!
//! These are the fundamental value types that flow through the system:
//! cell addresses, scene-space points, the measured viewport, renderable
//! entity handles and the animatable visual properties.

use glam::Vec2;

// =============================================================================
// Cell addressing
// =============================================================================

/// Axial coordinate of one hex cell.
///
/// Unique per cell. Used as the key into the renderer's cell lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AxialCoord {
    pub q: i32,
    pub r: i32,
}

impl AxialCoord {
    pub const ORIGIN: Self = Self { q: 0, r: 0 };

    /// Create an axial coordinate.
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Convert to cube coordinates (`x + y + z == 0`).
    pub const fn to_cube(self) -> CubeCoord {
        CubeCoord {
            x: self.q,
            y: -self.q - self.r,
            z: self.r,
        }
    }
}

impl From<(i32, i32)> for AxialCoord {
    fn from((q, r): (i32, i32)) -> Self {
        Self { q, r }
    }
}

/// Cube coordinate of one hex cell. Always satisfies `x + y + z == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CubeCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CubeCoord {
    /// Drop the redundant component.
    pub const fn to_axial(self) -> AxialCoord {
        AxialCoord {
            q: self.x,
            r: self.z,
        }
    }
}

/// Real-valued point in scene space.
pub type PixelPoint = Vec2;

// =============================================================================
// Viewport
// =============================================================================

/// Bounding box of the interactive surface, in pointer client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportRect {
    /// Top-left corner.
    pub origin: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl ViewportRect {
    /// Create a rect from its top-left corner and dimensions.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// A rect with zero area contains nothing.
    pub fn is_empty(&self) -> bool {
        !(self.size.x > 0.0 && self.size.y > 0.0)
    }

    /// Half-open containment: left/top edges are inside, right/bottom are not.
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.origin + self.size;
        point.x >= self.origin.x && point.x < max.x && point.y >= self.origin.y && point.y < max.y
    }

    /// Map a client point into `[-1, 1] × [-1, 1]`, y pointing up.
    pub fn to_ndc(&self, point: Vec2) -> Vec2 {
        let local = (point - self.origin) / self.size;
        Vec2::new(local.x * 2.0 - 1.0, -local.y * 2.0 + 1.0)
    }
}

// =============================================================================
// Entities and properties
// =============================================================================

/// Handle to a renderable object owned by the scene (tile, light or camera).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Position in a dense entity table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A numeric visual property the scheduler can animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    PositionX,
    PositionY,
    Scale,
    Opacity,
}

impl Property {
    pub const ALL: [Property; 4] = [
        Property::PositionX,
        Property::PositionY,
        Property::Scale,
        Property::Opacity,
    ];

    /// The single-bit mask for this property.
    pub const fn mask(self) -> PropertyMask {
        match self {
            Property::PositionX => PropertyMask::POSITION_X,
            Property::PositionY => PropertyMask::POSITION_Y,
            Property::Scale => PropertyMask::SCALE,
            Property::Opacity => PropertyMask::OPACITY,
        }
    }
}

bitflags::bitflags! {
    /// Set of visual properties, e.g. those written by a transition list.
    ///
    /// Combine with bitwise OR: `PropertyMask::SCALE | PropertyMask::OPACITY`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PropertyMask: u8 {
        const NONE = 0;
        const POSITION_X = 1 << 0;
        const POSITION_Y = 1 << 1;
        const SCALE = 1 << 2;
        const OPACITY = 1 << 3;
        const POSITION = Self::POSITION_X.bits() | Self::POSITION_Y.bits();
    }
}

// =============================================================================
// Tests
// =============================================================================
