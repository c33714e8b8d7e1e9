//! GPU back end: wgpu pipeline, growable buffers, and shader composition.
//!
//! The surrounding application owns the device, queue, surface, and frame
//! loop; this module only provides the trail pipeline and its buffers.

/// Growable GPU buffers with automatic reallocation.
pub mod dynamic_buffer;
/// The trail render pipeline, vertex layout, and draw plumbing.
pub mod pipeline;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
