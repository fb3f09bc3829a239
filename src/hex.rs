//! Hex - pure coordinate math for the hex board.
//!
//! Conversions follow the cube-coordinate scheme from
//! <https://www.redblobgames.com/grids/hexagons/>:
//!
//! ```text
//! axial (q, r) ──to_cube──▶ cube (x, y, z)   x + y + z == 0
//! axial (q, r) ──axial_to_pixel──▶ (1.5·r, √3·(q + r/2))
//! pixel (x, y) ──pixel_to_axial──▶ fractional cube ──cube_round──▶ axial
//! ```
//!
//! Every function is stateless; all of them are safe to call from a derive.

use std::f32::consts::PI;

use glam::Vec2;

use crate::types::{AxialCoord, CubeCoord, PixelPoint};

/// √3, the row height of a unit flat-top hex.
const SQRT_3: f32 = 1.732_050_8;

/// Fractional cube coordinate before rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractionalCube {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// The six outline points of a unit hex, at 60°, 120°, ..., 360°.
pub fn hex_vertices() -> [Vec2; 6] {
    std::array::from_fn(|i| {
        let angle = PI / 3.0 * (i + 1) as f32;
        Vec2::new(angle.cos(), angle.sin())
    })
}

/// Scene-space center of a cell.
#[inline]
pub fn axial_to_pixel(coord: AxialCoord) -> PixelPoint {
    let q = coord.q as f32;
    let r = coord.r as f32;
    Vec2::new(1.5 * r, SQRT_3 * (q + r / 2.0))
}

/// The cell containing a scene-space point.
///
/// Inverse of [`axial_to_pixel`] for every cell center, and the nearest cell
/// for any other finite point.
pub fn pixel_to_axial(point: PixelPoint) -> AxialCoord {
    // The x axis carries r and the skewed y axis carries q; round in that
    // frame, then hand the components back in (q, r) order.
    let along_x = point.x * 2.0 / 3.0;
    let along_y = -point.x / 3.0 + SQRT_3 / 3.0 * point.y;
    let rounded = cube_round(FractionalCube {
        x: along_x,
        y: -along_x - along_y,
        z: along_y,
    });
    AxialCoord::new(rounded.z, rounded.x)
}

/// Round a fractional cube to the nearest cell.
///
/// Each component is rounded, then the one with strictly the largest
/// rounding error is rebuilt from the other two: x first, then y, else z.
pub fn cube_round(cube: FractionalCube) -> CubeCoord {
    let rx = cube.x.round();
    let ry = cube.y.round();
    let rz = cube.z.round();

    let dx = (rx - cube.x).abs();
    let dy = (ry - cube.y).abs();
    let dz = (rz - cube.z).abs();

    let (x, y, z) = if dx > dy && dx > dz {
        (-ry - rz, ry, rz)
    } else if dy > dz {
        (rx, -rx - rz, rz)
    } else {
        (rx, ry, -rx - ry)
    };

    CubeCoord {
        x: x as i32,
        y: y as i32,
        z: z as i32,
    }
}

/// Round a fractional axial coordinate `(q, r)` to the nearest cell.
pub fn hex_round(q: f32, r: f32) -> AxialCoord {
    cube_round(FractionalCube { x: q, y: -q - r, z: r }).to_axial()
}

// =============================================================================
// Tests
// =============================================================================
