//! Dynamic GPU buffer management with automatic resizing.
//!
//! Vertex and index data are regenerated every frame with a varying
//! instance count; rather than recreating buffers, a [`GrowableBuffer`]
//! grows by 2x when capacity is exceeded and never shrinks (GPU buffers
//! cannot be resized in place).

use std::marker::PhantomData;

/// A typed GPU buffer that grows automatically when written past capacity.
pub struct GrowableBuffer<T> {
    buffer: wgpu::Buffer,
    capacity_bytes: usize,
    count: usize,
    usage: wgpu::BufferUsages,
    label: String,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> GrowableBuffer<T> {
    /// An empty buffer sized for `capacity` items (minimum 64 bytes).
    /// `COPY_DST` is added to `usage` automatically.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let capacity_bytes = (size_of::<T>() * capacity).max(64);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity_bytes as u64,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            capacity_bytes,
            count: 0,
            usage,
            label: label.to_owned(),
            _marker: PhantomData,
        }
    }

    /// Write `data` to the buffer, reallocating with 2x headroom first if it
    /// does not fit.
    pub fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[T]) {
        let data_bytes = bytemuck::cast_slice(data);
        let needed = data_bytes.len();

        if needed > self.capacity_bytes {
            let new_capacity = (needed * 2).max(self.capacity_bytes + 1024);
            log::debug!(
                "{}: growing {} -> {} bytes",
                self.label,
                self.capacity_bytes,
                new_capacity
            );
            self.buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&self.label),
                size: new_capacity as u64,
                usage: self.usage | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            self.capacity_bytes = new_capacity;
        }

        if needed > 0 {
            queue.write_buffer(&self.buffer, 0, data_bytes);
        }
        self.count = data.len();
    }

    /// The underlying `wgpu::Buffer`.
    #[must_use]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Number of items written by the last [`Self::write`].
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// `true` if the last write was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Current capacity in items.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity_bytes / size_of::<T>()
    }
}
