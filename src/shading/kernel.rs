//! The scalar shading kernel: pure straight-line arithmetic per pixel.
//!
//! Mirrors `assets/shaders/raster/trail.wgsl` exactly. The three derivative
//! magnitudes arrive in [`CoverageGradients`]; on the GPU they come from
//! `dpdx`/`dpdy`, on the CPU from [`super::quad::shade_quad`]'s finite
//! differences.

use glam::{Vec2, Vec4};

use super::{TrailAttributes, AA_PIXELS, LENGTH_EPSILON};

/// Smallest derivative magnitude used when dividing by `|∇dist|`, so a
/// uniform derivative quad still produces a finite silhouette factor.
const GRADIENT_FLOOR: f32 = 1e-3;

/// Screen-space derivative magnitudes of the three softened quantities,
/// each `|(d/dx, d/dy)|` over one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoverageGradients {
    /// Magnitude of the derivative of `d² = 1 - y²`.
    pub half_width_sq: f32,
    /// Magnitude of the derivative of the raw axial segment `seg`.
    pub segment: f32,
    /// Magnitude of the derivative of the core-segment distance.
    pub distance: f32,
}

/// Replaces the hard clamp of `val` at zero with a linear ramp of width
/// `2 * band` straddling the zero crossing.
///
/// Identity for `val >= band`; continuous at the branch point
/// (`soften_edge(band, band) == band` from both sides).
#[inline]
#[must_use]
pub fn soften_edge(val: f32, band: f32) -> f32 {
    if val < band {
        (val + band) * 0.5
    } else {
        val
    }
}

/// Squared half-width of the capsule's circular cross-section at
/// perpendicular offset `y`. Negative for `|y| > 1`.
#[inline]
pub(crate) fn half_width_sq(y: f32) -> f32 {
    1.0 - y * y
}

/// Axial extent of the capsule covered at this scanline: the length of
/// `[x - d, x + d] ∩ [0, trail_length]`. Negative when the pixel lies
/// outside the body along `x`.
#[inline]
pub(crate) fn axial_segment(x: f32, d: f32, trail_length: f32) -> f32 {
    let t0 = (x - d).max(0.0);
    let t1 = (x + d).min(trail_length);
    t1 - t0
}

/// Euclidean distance from the local coordinate to the capsule's core
/// segment (the `x` axis from 0 to `trail_length`).
#[inline]
pub(crate) fn rim_distance(coords: Vec2, trail_length: f32) -> f32 {
    let ex = coords.x - coords.x.clamp(0.0, trail_length);
    (ex * ex + coords.y * coords.y).sqrt()
}

#[inline]
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Silhouette anti-aliasing factor: ~1 inside the radius-1 boundary,
/// ~0 outside, ramping smoothly over one AA band.
#[inline]
pub(crate) fn silhouette_factor(dist: f32, gradient: f32) -> f32 {
    smoothstep(
        -0.5 * AA_PIXELS,
        0.5 * AA_PIXELS,
        (1.0 - dist) / gradient.max(GRADIENT_FLOOR),
    )
}

/// Shade one fragment: straight-alpha RGBA from the interpolated attributes
/// and the screen-space derivative magnitudes.
///
/// RGB is `attributes.color` unchanged; alpha is the analytically
/// anti-aliased capsule coverage times the reveal fraction, always in
/// `[0, 1]` and finite for finite inputs.
#[must_use]
pub fn shade(attributes: &TrailAttributes, gradients: &CoverageGradients) -> Vec4 {
    let len = attributes.trail_length;

    let mut d2 = half_width_sq(attributes.coords.y);
    d2 = soften_edge(d2, gradients.half_width_sq * 0.5 * AA_PIXELS);
    let d = d2.max(0.0).sqrt();

    let seg = axial_segment(attributes.coords.x, d, len);
    let seg = soften_edge(seg, gradients.segment * 0.5 * AA_PIXELS).min(len);

    let revealed = (seg + LENGTH_EPSILON) / (len + LENGTH_EPSILON) * attributes.total_portion;
    let base = revealed.clamp(0.0, 1.0);

    let dist = rim_distance(attributes.coords, len);
    let alpha = base * silhouette_factor(dist, gradients.distance);

    attributes.color.extend(alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    /// Typical on-screen gradient scale: a ball spanning ~100 pixels.
    const PIXEL_SCALE: f32 = 0.01;

    fn grads(g: f32) -> CoverageGradients {
        CoverageGradients {
            half_width_sq: g,
            segment: g,
            distance: g,
        }
    }

    fn attrs(x: f32, y: f32, trail_length: f32, total_portion: f32) -> TrailAttributes {
        TrailAttributes {
            coords: Vec2::new(x, y),
            color: Vec3::new(1.0, 0.0, 0.0),
            trail_length,
            total_portion,
        }
    }

    #[test]
    fn test_soften_edge_identity_outside_band() {
        assert_eq!(soften_edge(5.0, 0.1), 5.0);
        assert_eq!(soften_edge(0.1, 0.1), 0.1);
        assert_eq!(soften_edge(0.11, 0.1), 0.11);
    }

    #[test]
    fn test_soften_edge_continuous_at_branch() {
        let band = 0.25;
        let below = soften_edge(band - 1e-6, band);
        assert!((below - band).abs() < 1e-5);
        assert_eq!(soften_edge(band, band), band);
    }

    #[test]
    fn test_soften_edge_ramp() {
        // Linear ramp across [-band, band]: zero input maps to half-band,
        // -band maps to zero.
        let band = 0.5;
        assert_eq!(soften_edge(0.0, band), 0.25);
        assert_eq!(soften_edge(-band, band), 0.0);
    }

    #[test]
    fn test_alpha_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2000 {
            let a = attrs(
                rng.random_range(-5.0..15.0),
                rng.random_range(-3.0..3.0),
                rng.random_range(0.0..12.0),
                rng.random_range(0.0..1.0),
            );
            let g = grads(rng.random_range(0.0..0.5));
            let alpha = shade(&a, &g).w;
            assert!(
                (0.0..=1.0).contains(&alpha),
                "alpha {} out of bounds for {:?}",
                alpha,
                a
            );
        }
    }

    #[test]
    fn test_out_of_cap_transparent() {
        // Beyond |y| = 1 plus an AA-band margin the silhouette factor kills
        // the pixel regardless of the other inputs.
        for x in [-2.0, 0.0, 5.0, 12.0] {
            for y in [1.2, -1.2, 2.0, -2.0] {
                let alpha = shade(&attrs(x, y, 10.0, 1.0), &grads(PIXEL_SCALE)).w;
                assert!(alpha < 1e-3, "alpha {} at ({}, {})", alpha, x, y);
            }
        }
    }

    #[test]
    fn test_full_reveal_short_trail() {
        // For trail_length <= 2 the axial window [x-d, x+d] spans the whole
        // body at the midpoint, so full reveal means full opacity.
        let alpha = shade(&attrs(0.75, 0.0, 1.5, 1.0), &grads(PIXEL_SCALE)).w;
        assert!((alpha - 1.0).abs() < 1e-3, "alpha {}", alpha);
    }

    #[test]
    fn test_interior_long_trail_time_fraction() {
        // Interior of a long trail: the window is 2*d = 2, so alpha encodes
        // the 2/L fraction of the frame the ball covered this pixel.
        let alpha = shade(&attrs(5.0, 0.0, 10.0, 1.0), &grads(PIXEL_SCALE)).w;
        assert!((alpha - 0.2).abs() < 0.01, "alpha {}", alpha);
    }

    #[test]
    fn test_zero_reveal() {
        for x in [-1.0, 0.0, 2.5, 5.0] {
            for y in [0.0, 0.5, -0.9] {
                let alpha = shade(&attrs(x, y, 5.0, 0.0), &grads(PIXEL_SCALE)).w;
                assert_eq!(alpha, 0.0);
            }
        }
    }

    #[test]
    fn test_monotonic_reveal() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let x = rng.random_range(-2.0..12.0);
            let y = rng.random_range(-1.5..1.5);
            let len = rng.random_range(0.0..10.0);
            let mut last = 0.0f32;
            for step in 0..=10 {
                let portion = step as f32 / 10.0;
                let alpha = shade(&attrs(x, y, len, portion), &grads(PIXEL_SCALE)).w;
                assert!(
                    alpha >= last - 1e-6,
                    "alpha regressed {} -> {} at portion {}",
                    last,
                    alpha,
                    portion
                );
                last = alpha;
            }
        }
    }

    #[test]
    fn test_cross_section_symmetry() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let x = rng.random_range(-2.0..12.0);
            let y = rng.random_range(0.0..2.0);
            let len = rng.random_range(0.0..10.0);
            let up = shade(&attrs(x, y, len, 1.0), &grads(PIXEL_SCALE)).w;
            let down = shade(&attrs(x, -y, len, 1.0), &grads(PIXEL_SCALE)).w;
            assert_eq!(up, down);
        }
    }

    #[test]
    fn test_concrete_long_trail_center() {
        // (5, 0) on a length-10 trail, half portion: seg = 2d = 2, so
        // base = 0.2 * 0.5 and the silhouette factor is 1 (dist = 0).
        let out = shade(&attrs(5.0, 0.0, 10.0, 0.5), &grads(PIXEL_SCALE));
        assert!((out.x - 1.0).abs() < 1e-6);
        assert_eq!(out.y, 0.0);
        assert_eq!(out.z, 0.0);
        assert!((out.w - 0.1).abs() < 0.01, "alpha {}", out.w);
    }

    #[test]
    fn test_concrete_short_trail_center() {
        // Short trail: the window covers the whole body, base = portion.
        let out = shade(&attrs(0.5, 0.0, 1.0, 0.5), &grads(PIXEL_SCALE));
        assert!((out.w - 0.5).abs() < 0.01, "alpha {}", out.w);
    }

    #[test]
    fn test_outside_cap_along_axis() {
        // (-5, 0): five radii behind the trailing cap, dist >> 1.
        for portion in [0.0, 0.5, 1.0] {
            let alpha = shade(&attrs(-5.0, 0.0, 10.0, portion), &grads(PIXEL_SCALE)).w;
            assert!(alpha < 1e-6, "alpha {}", alpha);
        }
    }

    #[test]
    fn test_zero_length_trail_is_ball() {
        // trail_length = 0 degenerates to a plain ball: the epsilon guard
        // keeps the reveal fraction at exactly total_portion.
        let alpha = shade(&attrs(0.0, 0.0, 0.0, 1.0), &grads(PIXEL_SCALE)).w;
        assert!((alpha - 1.0).abs() < 1e-3, "alpha {}", alpha);

        let rim = shade(&attrs(0.0, 2.0, 0.0, 1.0), &grads(PIXEL_SCALE)).w;
        assert!(rim < 1e-3, "alpha {}", rim);
    }

    #[test]
    fn test_finite_on_degenerate_gradients() {
        // A zero-gradient pixel (uniform quad) must stay finite, not NaN.
        for y in [0.0, 1.0, 1.5] {
            let out = shade(&attrs(0.5, y, 1.0, 1.0), &grads(0.0));
            assert!(out.w.is_finite());
            assert!((0.0..=1.0).contains(&out.w));
        }
    }
}
