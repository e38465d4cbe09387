//! Ring and shock wave pipeline

use stellar_physics::{RingInstance, RING_SEGMENTS};

use crate::instances::InstanceBinding;
use crate::renderer::{create_pipeline, PipelineOptions, ADDITIVE_BLENDING};

pub struct RingRenderer {
    pipeline: wgpu::RenderPipeline,
}

impl RingRenderer {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Ring Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/rings.wgsl").into()),
        });

        // Double-sided: create_pipeline never culls
        let pipeline = create_pipeline(
            device,
            layout,
            &shader,
            PipelineOptions {
                label: "Ring Pipeline",
                format,
                fragment_entry: "fragment",
                blend: ADDITIVE_BLENDING,
                depth_write: false,
            },
        );

        Self { pipeline }
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, rings: &InstanceBinding<RingInstance>) {
        if rings.is_empty() {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, rings.bind_group(), &[]);
        render_pass.draw(0..RING_SEGMENTS * 6, 0..rings.len());
    }
}
