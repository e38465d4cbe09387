//! Scene rendering: one pass drawing every layer of the dying star

use stellar_physics::{PointSprite, RingInstance, SceneFrame, SphereImpostor};

use crate::camera::{Camera, CameraUniform};
use crate::instances::{camera_instances_layout, InstanceBinding};
use crate::points::PointRenderer;
use crate::rings::RingRenderer;
use crate::spheres::SphereRenderer;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// `src * alpha + dst`: overlapping glow brightens instead of occluding
pub const ADDITIVE_BLENDING: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

pub(crate) struct PipelineOptions<'a> {
    pub label: &'a str,
    pub format: wgpu::TextureFormat,
    pub fragment_entry: &'a str,
    pub blend: wgpu::BlendState,
    pub depth_write: bool,
}

/// Instanced pipeline with no vertex buffers; geometry comes from the vertex index
pub(crate) fn create_pipeline(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    shader: &wgpu::ShaderModule,
    options: PipelineOptions<'_>,
) -> wgpu::RenderPipeline {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(options.label),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(options.label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vertex"),
            buffers: &[],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(options.fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: options.format,
                blend: Some(options.blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: options.depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

pub struct SceneRenderer {
    pub camera_buffer: wgpu::Buffer,
    pub depth_texture: wgpu::TextureView,
    surface_config: wgpu::SurfaceConfiguration,

    points: PointRenderer,
    rings: RingRenderer,
    spheres: SphereRenderer,

    star_instances: InstanceBinding<PointSprite>,
    nebula_instances: InstanceBinding<PointSprite>,
    ring_instances: InstanceBinding<RingInstance>,
    sphere_instances: InstanceBinding<SphereImpostor>,
}

impl SceneRenderer {
    pub fn new(device: &wgpu::Device, surface_config: &wgpu::SurfaceConfiguration) -> Self {
        // Create camera buffer
        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = Self::create_depth_texture(device, surface_config);

        let layout = camera_instances_layout(device, "Scene Bind Group Layout");
        let format = surface_config.format;

        let points = PointRenderer::new(device, format, &layout);
        let rings = RingRenderer::new(device, format, &layout);
        let spheres = SphereRenderer::new(device, format, &layout);

        let star_instances = InstanceBinding::new(device, "Star Instances", &layout, &camera_buffer, 2048);
        let nebula_instances =
            InstanceBinding::new(device, "Nebula Instances", &layout, &camera_buffer, 2048);
        let ring_instances = InstanceBinding::new(device, "Ring Instances", &layout, &camera_buffer, 16);
        let sphere_instances =
            InstanceBinding::new(device, "Sphere Instances", &layout, &camera_buffer, 2);

        Self {
            camera_buffer,
            depth_texture,
            surface_config: surface_config.clone(),
            points,
            rings,
            spheres,
            star_instances,
            nebula_instances,
            ring_instances,
            sphere_instances,
        }
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
    ) -> wgpu::TextureView {
        let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: config.width.max(1),
                height: config.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        depth_texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn resize(&mut self, device: &wgpu::Device, new_config: &wgpu::SurfaceConfiguration) {
        self.surface_config = new_config.clone();
        self.depth_texture = Self::create_depth_texture(device, new_config);
    }

    /// Upload this frame's instances and record the scene pass into `encoder`
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &wgpu::TextureView,
        camera: &Camera,
        frame: &SceneFrame,
        time: f32,
    ) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera.to_uniform(time)]),
        );

        self.star_instances.write(device, queue, &frame.stars);
        self.nebula_instances.write(device, queue, &frame.nebula);
        self.ring_instances.write(device, queue, &frame.rings);
        self.sphere_instances
            .write(device, queue, &[frame.glow, frame.core]);

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        // Back to front-ish: the only depth writer is the core
        self.points.draw(&mut render_pass, &self.star_instances);
        self.spheres.draw_glow(&mut render_pass, &self.sphere_instances);
        self.rings.draw(&mut render_pass, &self.ring_instances);
        self.spheres.draw_core(&mut render_pass, &self.sphere_instances);
        self.points.draw(&mut render_pass, &self.nebula_instances);
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }
}
