//! Lockstep 2×2-block evaluation with finite-difference derivatives.
//!
//! Hardware fragment shading executes pixels in 2×2 quads so that `dpdx` /
//! `dpdy` can difference neighboring lanes. Targets without that primitive
//! must reproduce the grouping explicitly: [`shade_quad`] computes each
//! intermediate quantity for all four pixels first, differences across the
//! block, and only then proceeds. Shading pixels independently would feed
//! the softening bands garbage.

use glam::Vec4;

use super::kernel::{self, CoverageGradients};
use super::{shade, TrailAttributes, AA_PIXELS};

/// Quad lane order: `[(x, y), (x+1, y), (x, y+1), (x+1, y+1)]` — lane index
/// bit 0 is the x offset, bit 1 the y offset.
pub type Quad = [TrailAttributes; 4];

/// Per-lane derivative magnitude `|(d/dx, d/dy)|` from fine differences:
/// the x difference along each lane's own row, the y difference along its
/// own column.
fn fine_gradients(v: [f32; 4]) -> [f32; 4] {
    let dx_top = v[1] - v[0];
    let dx_bottom = v[3] - v[2];
    let dy_left = v[2] - v[0];
    let dy_right = v[3] - v[1];
    [
        (dx_top * dx_top + dy_left * dy_left).sqrt(),
        (dx_top * dx_top + dy_right * dy_right).sqrt(),
        (dx_bottom * dx_bottom + dy_left * dy_left).sqrt(),
        (dx_bottom * dx_bottom + dy_right * dy_right).sqrt(),
    ]
}

/// Shade a 2×2 pixel block in lockstep.
///
/// Equivalent to [`shade`] per lane, with each lane's
/// [`CoverageGradients`] measured across the block the way hardware fine
/// derivatives are. All four lanes always execute; callers that only need
/// some of the pixels (surface edges) discard the helper lanes.
#[must_use]
pub fn shade_quad(quad: &Quad) -> [Vec4; 4] {
    // Stage 1: squared cross-section half-width, then its gradients.
    let d2 = [
        kernel::half_width_sq(quad[0].coords.y),
        kernel::half_width_sq(quad[1].coords.y),
        kernel::half_width_sq(quad[2].coords.y),
        kernel::half_width_sq(quad[3].coords.y),
    ];
    let d2_grad = fine_gradients(d2);

    // Stage 2: raw axial segment per lane (softened half-width feeds the
    // window), then its gradients.
    let mut seg = [0.0f32; 4];
    for lane in 0..4 {
        let softened = kernel::soften_edge(d2[lane], d2_grad[lane] * 0.5 * AA_PIXELS);
        let d = softened.max(0.0).sqrt();
        seg[lane] = kernel::axial_segment(quad[lane].coords.x, d, quad[lane].trail_length);
    }
    let seg_grad = fine_gradients(seg);

    // Stage 3: core-segment distance and its gradients.
    let dist = [
        kernel::rim_distance(quad[0].coords, quad[0].trail_length),
        kernel::rim_distance(quad[1].coords, quad[1].trail_length),
        kernel::rim_distance(quad[2].coords, quad[2].trail_length),
        kernel::rim_distance(quad[3].coords, quad[3].trail_length),
    ];
    let dist_grad = fine_gradients(dist);

    let mut out = [Vec4::ZERO; 4];
    for lane in 0..4 {
        out[lane] = shade(
            &quad[lane],
            &CoverageGradients {
                half_width_sq: d2_grad[lane],
                segment: seg_grad[lane],
                distance: dist_grad[lane],
            },
        );
    }
    out
}
