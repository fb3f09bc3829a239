//! Board - the finite, pre-generated region of hex cells.
//!
//! Cells span `q, r ∈ [-size, size)` and are numbered densely, row by row,
//! so an [`EntityId`] doubles as an index into per-cell arrays.
//!
//! ```text
//! index = (r + size) · 2·size + (q + size)
//! ```

use crate::error::{ConfigError, Result};
use crate::hex::axial_to_pixel;
use crate::types::{AxialCoord, EntityId, PixelPoint};

/// Largest half-extent whose `(2·size)²` cells still number within `u32`.
pub const MAX_BOARD_SIZE: i32 = 32_767;

/// Square region of axial coordinates with a dense cell numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    size: i32,
}

impl Board {
    /// A board spanning `[-size, size)` on both axes. `size` must lie in
    /// `1..=MAX_BOARD_SIZE`.
    pub fn new(size: i32) -> Result<Self> {
        Self::check(size)?;
        Ok(Self { size })
    }

    pub(crate) fn check(size: i32) -> Result<()> {
        if size <= 0 {
            return Err(ConfigError::EmptyBoard { size });
        }
        if size > MAX_BOARD_SIZE {
            return Err(ConfigError::BoardTooLarge {
                size,
                max: MAX_BOARD_SIZE,
            });
        }
        Ok(())
    }

    /// Half-extent.
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Cells per row.
    pub fn side(&self) -> i32 {
        self.size * 2
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        let side = self.side() as usize;
        side * side
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the coordinate was generated.
    #[inline]
    pub fn contains(&self, coord: AxialCoord) -> bool {
        let range = -self.size..self.size;
        range.contains(&coord.q) && range.contains(&coord.r)
    }

    /// Entity handle of a cell, or `None` outside the region.
    pub fn entity_at(&self, coord: AxialCoord) -> Option<EntityId> {
        if !self.contains(coord) {
            return None;
        }
        let row = (coord.r + self.size) as u32;
        let col = (coord.q + self.size) as u32;
        Some(EntityId(row * self.side() as u32 + col))
    }

    /// Inverse of [`Board::entity_at`].
    pub fn coord_of(&self, entity: EntityId) -> Option<AxialCoord> {
        if entity.index() >= self.len() {
            return None;
        }
        let side = self.side() as u32;
        let row = (entity.0 / side) as i32;
        let col = (entity.0 % side) as i32;
        Some(AxialCoord::new(col - self.size, row - self.size))
    }

    /// Every cell with its entity handle and scene-space center, in entity
    /// order.
    pub fn cells(&self) -> impl Iterator<Item = (AxialCoord, EntityId, PixelPoint)> + '_ {
        (-self.size..self.size).flat_map(move |r| {
            (-self.size..self.size).map(move |q| {
                let coord = AxialCoord::new(q, r);
                let row = (r + self.size) as u32;
                let col = (q + self.size) as u32;
                let entity = EntityId(row * self.side() as u32 + col);
                (coord, entity, axial_to_pixel(coord))
            })
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
