//! The per-pixel ball-with-trail shading algorithm.
//!
//! The shape is a capsule lying along local `x` in `[0, trail_length]` with
//! radius 1 in `y` and circular caps past both ends. [`shade`] computes one
//! straight-alpha RGBA value from the interpolated attributes and the
//! screen-space derivative magnitudes of three intermediate quantities;
//! [`shade_quad`] evaluates a 2×2 pixel block in lockstep and derives those
//! magnitudes by finite differences, the way hardware derivative units do.

pub mod kernel;
pub mod quad;

pub use kernel::{shade, soften_edge, CoverageGradients};
pub use quad::{shade_quad, Quad};

use glam::{Vec2, Vec3};

/// Width of the anti-aliasing transition band, in pixels.
pub const AA_PIXELS: f32 = 2.0;

/// Additive guard against division by zero when `trail_length` approaches
/// zero in the reveal-fraction computation.
pub const LENGTH_EPSILON: f32 = 1e-4;

/// Interpolated per-fragment attribute bundle.
///
/// `coords` is the local shape coordinate: `x` runs along the trail axis,
/// `y` is the perpendicular offset, both in units of the ball's radius.
/// Geometry outside `[0, trail_length] × [-1, 1]` is expected — those pixels
/// shade to near-zero coverage rather than being rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailAttributes {
    /// Local shape coordinate (longitudinal, perpendicular), radius units.
    pub coords: Vec2,
    /// Base RGB color, passed through to the output unchanged.
    pub color: Vec3,
    /// Capsule body length along `x`, in radius units. Non-negative.
    pub trail_length: f32,
    /// Revealed fraction of the trail, nominally in `[0, 1]`. Out-of-range
    /// values pass through the multiplication; only the product is clamped.
    pub total_portion: f32,
}
