// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Analytically anti-aliased ball-with-trail rendering built on wgpu.
//!
//! Comet draws a single visual primitive: a capsule-shaped streak with a
//! circular leading edge — a ball with a motion trail. The silhouette is
//! anti-aliased analytically from screen-space derivatives rather than by
//! multisampling, and the trail carries a reveal fraction so its visible
//! length can be animated (or used as a motion-blur weight).
//!
//! # Key entry points
//!
//! - [`shading::shade`] - the per-pixel coverage algorithm as a pure function
//! - [`shading::shade_quad`] - lockstep 2×2-block evaluation with
//!   finite-difference derivatives, for targets without hardware `dpdx`
//! - [`gpu::pipeline::TrailPipeline`] - the wgpu render pipeline and buffers
//! - [`raster`] - the CPU reference rasterizer (rayon-parallel)
//! - [`geometry::TrailInstance`] - one ball + trail segment, expanded to the
//!   quad geometry both paths consume
//!
//! # Architecture
//!
//! Both back ends execute the same two-stage pipeline: a pass-through vertex
//! stage forwards per-vertex attributes to the rasterizer, and the fragment
//! stage computes straight-alpha coverage per pixel with no state and no
//! communication between pixels beyond the implicit 2×2 derivative
//! neighborhood. On the GPU that neighborhood is the hardware quad; on the
//! CPU, [`shading::shade_quad`] evaluates the four pixels together.

pub mod error;
pub mod geometry;
pub mod gpu;
pub mod options;
pub mod raster;
pub mod shading;
