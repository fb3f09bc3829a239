//! Pointer normalization and the fixed camera/light target policy.

use glam::Vec2;

use crate::types::ViewportRect;

/// Camera target = pointer + this offset.
pub const CAMERA_OFFSET: Vec2 = Vec2::new(0.0, -5.0);

/// Light target = pointer × this factor, so the light swings opposite the
/// pointer.
pub const LIGHT_FACTOR: f32 = -5.0;

/// Map a client-space pointer into `[-1, 1]²` (y up).
///
/// Returns `None` unless the pointer is over the surface and inside the
/// half-open `rect`. Non-finite coordinates never count as inside.
pub fn normalize_pointer(client: Vec2, over: bool, rect: ViewportRect) -> Option<Vec2> {
    if !client.is_finite() {
        log::warn!("dropping non-finite pointer ({}, {})", client.x, client.y);
        return None;
    }
    if !over || rect.is_empty() || !rect.contains(client) {
        return None;
    }
    Some(rect.to_ndc(client))
}

/// Where the camera wants to be for a normalized pointer.
#[inline]
pub fn camera_target(pointer: Vec2) -> Vec2 {
    pointer + CAMERA_OFFSET
}

/// Where the light wants to be for a normalized pointer.
#[inline]
pub fn light_target(pointer: Vec2) -> Vec2 {
    pointer * LIGHT_FACTOR
}
