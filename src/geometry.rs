//! Instance geometry: one ball + trail segment expanded to a screen quad.
//!
//! The producer side of the pipeline. A [`TrailInstance`] describes a ball
//! of some radius that moved from `start` to `end` during the frame;
//! [`expand_quad`] turns it into four [`TrailVertex`] values whose local
//! `coords` put the capsule along `x` in `[0, trail_length]` with radius 1,
//! plus an apron so the anti-aliasing ramp is never clipped by the quad edge.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::shading::TrailAttributes;

/// How far the quad extends beyond the capsule, in radius units. The extra
/// 0.1 radius keeps the 2-pixel AA ramp inside the rasterized footprint.
pub const QUAD_APRON: f32 = 1.1;

/// Below this displacement (in producer units) the trail axis is considered
/// degenerate and snaps to +x.
pub const DEGENERATE_AXIS: f32 = 1e-3;

/// Index pattern for one quad: two triangles over vertices `[0, 1, 2, 3]`.
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 1, 3];

/// Per-vertex data for the trail pipeline.
/// Must match the WGSL `VertexInput` struct layout exactly.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TrailVertex {
    /// Clip-space position (the vertex stage passes it through).
    pub position: [f32; 2],
    /// Local shape coordinate (longitudinal, perpendicular), radius units.
    pub coords: [f32; 2],
    /// Base RGB color.
    pub color: [f32; 3],
    /// Capsule body length in radius units.
    pub trail_length: f32,
    /// Revealed fraction of the trail.
    pub total_portion: f32,
}

/// One ball with its motion trail for the current frame.
///
/// `start` and `end` are the segment the ball's center swept, in producer
/// coordinates (the same space as [`Viewport`]). `radius > 0` is assumed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailInstance {
    /// Trailing end of the swept segment.
    pub start: Vec2,
    /// Leading end of the swept segment (the ball's current position).
    pub end: Vec2,
    /// Ball radius, producer units.
    pub radius: f32,
    /// Base RGB color.
    pub color: Vec3,
    /// Reveal fraction forwarded to the shader, nominally `[0, 1]`.
    pub total_portion: f32,
}

impl TrailInstance {
    /// Capsule body length in radius units.
    #[must_use]
    pub fn trail_length(&self) -> f32 {
        self.start.distance(self.end) / self.radius
    }

    /// Unit trail axis `u` and its perpendicular `v`. Degenerate segments
    /// (shorter than [`DEGENERATE_AXIS`]) get the +x axis.
    #[must_use]
    pub fn frame(&self) -> (Vec2, Vec2) {
        let delta = self.end - self.start;
        let u = if delta.length() < DEGENERATE_AXIS {
            Vec2::X
        } else {
            delta.normalize()
        };
        (u, Vec2::new(-u.y, u.x))
    }

    /// The instance collapsed to a zero-length capsule at its leading end —
    /// a plain ball, fully revealed. Used when motion blur is disabled.
    #[must_use]
    pub fn collapsed(&self) -> Self {
        Self {
            start: self.end,
            end: self.end,
            total_portion: 1.0,
            ..*self
        }
    }

    /// Interpolated fragment attributes at a producer-space point, as the
    /// rasterizer would produce them inside this instance's quad.
    #[must_use]
    pub fn attributes_at(&self, point: Vec2) -> TrailAttributes {
        let (u, v) = self.frame();
        let delta = point - self.start;
        TrailAttributes {
            coords: Vec2::new(delta.dot(u), delta.dot(v)) / self.radius,
            color: self.color,
            trail_length: self.trail_length(),
            total_portion: self.total_portion,
        }
    }

    /// The four quad corners in producer space, in [`expand_quad`] vertex
    /// order.
    #[must_use]
    pub fn corners(&self) -> [Vec2; 4] {
        let (u, v) = self.frame();
        let len = self.trail_length();
        let mut out = [Vec2::ZERO; 4];
        let mut index = 0;
        for w in [-QUAD_APRON, QUAD_APRON] {
            for h in [-QUAD_APRON, len + QUAD_APRON] {
                out[index] = self.start + (h * u + w * v) * self.radius;
                index += 1;
            }
        }
        out
    }
}

/// Maps producer coordinates to clip space: `(0, 0)` to the bottom-left
/// corner, `(width, height)` to the top-right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Target width in producer units (typically pixels).
    pub width: f32,
    /// Target height in producer units (typically pixels).
    pub height: f32,
}

impl Viewport {
    /// Clip-space position for a producer-space point.
    #[must_use]
    pub fn to_clip(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            -1.0 + 2.0 * point.x / self.width,
            -1.0 + 2.0 * point.y / self.height,
        )
    }
}

/// Expand one instance to its four vertices, positions already in clip
/// space. Index them with [`QUAD_INDICES`] (offset by `4 * quad` when
/// batching).
#[must_use]
pub fn expand_quad(instance: &TrailInstance, viewport: &Viewport) -> [TrailVertex; 4] {
    let len = instance.trail_length();
    let corners = instance.corners();
    let mut out = [TrailVertex::zeroed(); 4];
    let mut index = 0;
    for w in [-QUAD_APRON, QUAD_APRON] {
        for h in [-QUAD_APRON, len + QUAD_APRON] {
            out[index] = TrailVertex {
                position: viewport.to_clip(corners[index]).to_array(),
                coords: [h, w],
                color: instance.color.to_array(),
                trail_length: len,
                total_portion: instance.total_portion,
            };
            index += 1;
        }
    }
    out
}
