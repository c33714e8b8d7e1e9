//! CPU reference rasterizer: the non-GPU rendition of the pipeline.
//!
//! Walks each instance's screen-space bounding box in 2×2 pixel blocks,
//! evaluates [`shade_quad`] at the four pixel centers in lockstep (so the
//! finite-difference derivatives see the same neighborhoods a hardware quad
//! would), and composites the straight-alpha result OVER the surface. Bands
//! of two rows are distributed across rayon workers; pixels are only ever
//! written by the band that owns them, so no synchronization is needed.
//!
//! Blocks that straddle an instance's bounding box or the surface edge
//! still evaluate all four lanes (the extras are helper lanes, present only
//! to feed the derivatives) and write back just the covered pixels.

pub mod surface;

pub use surface::RgbaSurface;

use glam::{Vec2, Vec4};
use rayon::iter::{IndexedParallelIterator, ParallelIterator};
use rayon::slice::ParallelSliceMut;

use crate::geometry::TrailInstance;
use crate::options::RenderOptions;
use crate::shading::{shade_quad, TrailAttributes};

/// Clear the surface to the configured background, then draw the instances.
pub fn render(surface: &mut RgbaSurface, instances: &[TrailInstance], options: &RenderOptions) {
    surface.clear(options.background);
    composite(surface, instances, options);
}

/// Draw the instances over the surface's current contents.
pub fn composite(surface: &mut RgbaSurface, instances: &[TrailInstance], options: &RenderOptions) {
    let width = surface.width();
    let height = surface.height();
    if width == 0 || height == 0 || instances.is_empty() {
        return;
    }

    let resolved: Vec<TrailInstance> = if options.motion_blur {
        instances.to_vec()
    } else {
        instances.iter().map(TrailInstance::collapsed).collect()
    };

    let band_len = 2 * width * 4;
    surface
        .data_mut()
        .par_chunks_mut(band_len)
        .enumerate()
        .for_each(|(band, rows)| {
            let band_y = 2 * band;
            let band_rows = rows.len() / (width * 4);
            for instance in &resolved {
                let Some((x0, y0, x1, y1)) = pixel_bounds(instance, width, height) else {
                    continue;
                };
                if y1 <= band_y || y0 >= band_y + band_rows {
                    continue;
                }
                // Blocks are aligned to even x so every pixel lands in the
                // same quad no matter which instance is being drawn.
                let mut block_x = x0 - (x0 % 2);
                while block_x < x1 {
                    let shaded = shade_quad(&block_attributes(instance, block_x, band_y));
                    for (lane, rgba) in shaded.iter().enumerate() {
                        let px = block_x + (lane & 1);
                        let py = band_y + (lane >> 1);
                        if px < x0 || px >= x1 || py < y0 || py >= y1 {
                            continue;
                        }
                        if py >= band_y + band_rows {
                            continue;
                        }
                        let base = ((py - band_y) * width + px) * 4;
                        blend_over(&mut rows[base..base + 4], *rgba);
                    }
                    block_x += 2;
                }
            }
        });
}

/// The instance's quad footprint clipped to the surface, as half-open pixel
/// ranges `(x0, y0, x1, y1)`. `None` when the footprint misses the surface.
fn pixel_bounds(
    instance: &TrailInstance,
    width: usize,
    height: usize,
) -> Option<(usize, usize, usize, usize)> {
    let corners = instance.corners();
    let mut min = corners[0];
    let mut max = corners[0];
    for corner in &corners[1..] {
        min = min.min(*corner);
        max = max.max(*corner);
    }
    let x0 = min.x.floor().max(0.0) as usize;
    let y0 = min.y.floor().max(0.0) as usize;
    let x1 = (max.x.ceil().max(0.0) as usize).min(width);
    let y1 = (max.y.ceil().max(0.0) as usize).min(height);
    (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
}

/// Fragment attributes for the 2×2 block whose top-left pixel is `(x, y)`,
/// sampled at pixel centers.
fn block_attributes(instance: &TrailInstance, x: usize, y: usize) -> [TrailAttributes; 4] {
    std::array::from_fn(|lane| {
        let px = (x + (lane & 1)) as f32 + 0.5;
        let py = (y + (lane >> 1)) as f32 + 0.5;
        instance.attributes_at(Vec2::new(px, py))
    })
}

/// Straight-alpha OVER: `dst = src * a + dst * (1 - a)`.
fn blend_over(dst: &mut [f32], src: Vec4) {
    let a = src.w;
    dst[0] = src.x * a + dst[0] * (1.0 - a);
    dst[1] = src.y * a + dst[1] * (1.0 - a);
    dst[2] = src.z * a + dst[2] * (1.0 - a);
    dst[3] = a + dst[3] * (1.0 - a);
}
