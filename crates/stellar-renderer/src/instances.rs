//! Growable storage buffers bound next to the camera uniform

use bytemuck::Pod;
use std::marker::PhantomData;

/// Bind group layout shared by every pipeline in this crate:
/// binding 0 is the camera uniform, binding 1 a read-only instance array.
pub fn camera_instances_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[
            // Camera (Uniform) - Binding 0
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            // Instances (Storage) - Binding 1
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: true },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
    })
}

/// Instance array on the GPU plus the bind group that exposes it
///
/// The buffer only ever grows (to the next power of two), so steady-state
/// frames are a single `write_buffer`.
pub struct InstanceBinding<T: Pod> {
    label: &'static str,
    layout: wgpu::BindGroupLayout,
    camera_buffer: wgpu::Buffer,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    capacity: usize,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T: Pod> InstanceBinding<T> {
    pub fn new(
        device: &wgpu::Device,
        label: &'static str,
        layout: &wgpu::BindGroupLayout,
        camera_buffer: &wgpu::Buffer,
        capacity: usize,
    ) -> Self {
        let capacity = capacity.max(1);
        let buffer = Self::create_buffer(device, label, capacity);
        let bind_group = Self::create_bind_group(device, label, layout, camera_buffer, &buffer);

        Self {
            label,
            layout: layout.clone(),
            camera_buffer: camera_buffer.clone(),
            buffer,
            bind_group,
            capacity,
            len: 0,
            _marker: PhantomData,
        }
    }

    fn create_buffer(device: &wgpu::Device, label: &str, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity * std::mem::size_of::<T>()) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        label: &str,
        layout: &wgpu::BindGroupLayout,
        camera_buffer: &wgpu::Buffer,
        buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: buffer.as_entire_binding(),
                },
            ],
        })
    }

    /// Upload `data`, reallocating when it outgrows the buffer
    pub fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[T]) {
        if data.len() > self.capacity {
            self.capacity = data.len().next_power_of_two();
            log::debug!("{}: growing to {} instances", self.label, self.capacity);

            self.buffer = Self::create_buffer(device, self.label, self.capacity);
            self.bind_group = Self::create_bind_group(
                device,
                self.label,
                &self.layout,
                &self.camera_buffer,
                &self.buffer,
            );
        }

        if !data.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
        }
        self.len = data.len();
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn len(&self) -> u32 {
        self.len as u32
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
