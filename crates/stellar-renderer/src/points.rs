//! Point sprite pipeline for the nebula and the star field

use stellar_physics::PointSprite;

use crate::instances::InstanceBinding;
use crate::renderer::{create_pipeline, PipelineOptions, ADDITIVE_BLENDING};

pub struct PointRenderer {
    pipeline: wgpu::RenderPipeline,
}

impl PointRenderer {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Point Sprite Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/points.wgsl").into()),
        });

        let pipeline = create_pipeline(
            device,
            layout,
            &shader,
            PipelineOptions {
                label: "Point Sprite Pipeline",
                format,
                fragment_entry: "fragment",
                blend: ADDITIVE_BLENDING,
                depth_write: false,
            },
        );

        Self { pipeline }
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, sprites: &InstanceBinding<PointSprite>) {
        if sprites.is_empty() {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, sprites.bind_group(), &[]);
        render_pass.draw(0..6, 0..sprites.len());
    }
}
