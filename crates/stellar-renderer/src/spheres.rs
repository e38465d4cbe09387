//! Core and glow impostors
//!
//! Instance 0 is the glow halo, instance 1 the solid core. The halo is drawn
//! without depth writes so particles behind it stay visible; the core writes
//! depth and hides what is behind it.

use stellar_physics::SphereImpostor;

use crate::instances::InstanceBinding;
use crate::renderer::{create_pipeline, PipelineOptions};

pub const GLOW_INSTANCE: u32 = 0;
pub const CORE_INSTANCE: u32 = 1;

pub struct SphereRenderer {
    halo_pipeline: wgpu::RenderPipeline,
    solid_pipeline: wgpu::RenderPipeline,
}

impl SphereRenderer {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sphere Impostor Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/spheres.wgsl").into()),
        });

        let halo_pipeline = create_pipeline(
            device,
            layout,
            &shader,
            PipelineOptions {
                label: "Glow Halo Pipeline",
                format,
                fragment_entry: "fragment_halo",
                blend: wgpu::BlendState::ALPHA_BLENDING,
                depth_write: false,
            },
        );

        let solid_pipeline = create_pipeline(
            device,
            layout,
            &shader,
            PipelineOptions {
                label: "Core Pipeline",
                format,
                fragment_entry: "fragment_solid",
                blend: wgpu::BlendState::ALPHA_BLENDING,
                depth_write: true,
            },
        );

        Self {
            halo_pipeline,
            solid_pipeline,
        }
    }

    pub fn draw_glow(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        spheres: &InstanceBinding<SphereImpostor>,
    ) {
        render_pass.set_pipeline(&self.halo_pipeline);
        render_pass.set_bind_group(0, spheres.bind_group(), &[]);
        render_pass.draw(0..6, GLOW_INSTANCE..GLOW_INSTANCE + 1);
    }

    pub fn draw_core(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        spheres: &InstanceBinding<SphereImpostor>,
    ) {
        render_pass.set_pipeline(&self.solid_pipeline);
        render_pass.set_bind_group(0, spheres.bind_group(), &[]);
        render_pass.draw(0..6, CORE_INSTANCE..CORE_INSTANCE + 1);
    }
}
