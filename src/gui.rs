use egui::{Color32, Context};
use egui_wgpu::Renderer;
use egui_winit::State;
use stellar_physics::Rgb;
use stellar_simulation::{
    StellarConfig, ANIMATION_SPEED_RANGE, BRIGHTNESS_RANGE, CORE_SIZE_RANGE,
    EXPANSION_RADIUS_RANGE, PARTICLE_COUNT_RANGE, TURBULENCE_RANGE,
};
use wgpu::{Device, TextureFormat};
use winit::{event::WindowEvent, window::Window};

/// What the panels show, plus the edits and button presses they produce
#[derive(Default)]
pub struct UiState {
    pub fps: f32,
    pub frame_time: f32,
    pub particle_count: usize,
    pub respawned_last_frame: usize,
    pub respawned_total: u64,
    pub paused: bool,
    /// Working copy edited by the controls; applied to the simulation each frame
    pub config: StellarConfig,
    pub reset_requested: bool,
    pub pause_requested: bool,
    pub save_requested: bool,
    pub status: Option<String>,
}

impl UiState {
    pub fn new(config: StellarConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }
}

fn catppuccin_color(color: &catppuccin::Color) -> Color32 {
    Color32::from_rgb(color.rgb.r, color.rgb.g, color.rgb.b)
}

/// FPS readout colour: green when smooth, yellow when borderline, red otherwise
fn fps_color(fps: f32) -> Color32 {
    let colors = &catppuccin::PALETTE.mocha.colors;
    if fps >= 55.0 {
        catppuccin_color(&colors.green)
    } else if fps >= 30.0 {
        catppuccin_color(&colors.yellow)
    } else {
        catppuccin_color(&colors.red)
    }
}

fn color_picker(ui: &mut egui::Ui, label: &str, color: &mut Rgb) {
    ui.horizontal(|ui| {
        // Rgb holds sRGB, which is what the srgb picker edits
        let mut srgb = color.to_srgb8();
        if ui.color_edit_button_srgb(&mut srgb).changed() {
            *color = Rgb::from_srgb8(srgb);
        }
        ui.label(label);
        ui.weak(color.to_hex());
    });
}

pub struct Gui {
    context: Context,
    state: State,
    renderer: Renderer,
}

impl Gui {
    pub fn new(device: &Device, output_color_format: TextureFormat, window: &Window) -> Self {
        let context = Context::default();
        let id = context.viewport_id();

        let state = State::new(
            context.clone(),
            id,
            window,
            Some(window.scale_factor() as f32),
            None,
            Some(device.limits().max_texture_dimension_2d as usize),
        );

        let renderer = Renderer::new(
            device,
            output_color_format,
            egui_wgpu::RendererOptions {
                msaa_samples: 1,
                depth_stencil_format: None,
                dithering: false,
                predictable_texture_filtering: false,
            },
        );

        Self {
            context,
            state,
            renderer,
        }
    }

    /// Returns true when egui consumed the event
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.state.on_window_event(window, event);
        response.consumed
    }

    pub fn render(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &Window,
        view: &wgpu::TextureView,
        ui_state: &mut UiState,
    ) {
        let raw_input = self.state.take_egui_input(window);

        let full_output = self.context.run(raw_input, |ctx| {
            Self::ui(ctx, ui_state);
        });

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let clipped_primitives = self
            .context
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let size = window.inner_size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &clipped_primitives,
            &screen_descriptor,
        );

        let mut render_pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            })
            .forget_lifetime();

        self.renderer
            .render(&mut render_pass, &clipped_primitives, &screen_descriptor);
        drop(render_pass);

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }

    fn ui(ctx: &Context, state: &mut UiState) {
        // Diagnostics Panel (Top Left)
        egui::Window::new("Diagnostics")
            .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
            .resizable(false)
            .collapsible(true)
            .show(ctx, |ui| {
                ui.colored_label(fps_color(state.fps), format!("FPS: {:.1}", state.fps));
                ui.label(format!("Frame Time: {:.2} ms", state.frame_time));
                ui.separator();
                ui.label(format!("Particles: {}", state.particle_count));
                ui.label(format!("Respawned: {}", state.respawned_last_frame));
                ui.label(format!("Respawned (total): {}", state.respawned_total));
                if state.paused {
                    ui.colored_label(
                        catppuccin_color(&catppuccin::PALETTE.mocha.colors.peach),
                        "Paused",
                    );
                }
            });

        // Stellar Controls (Top Right)
        egui::Window::new("Stellar Controls")
            .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
            .resizable(false)
            .collapsible(true)
            .show(ctx, |ui| {
                let config = &mut state.config;

                ui.heading("Colors");
                color_picker(ui, "Core", &mut config.core_color);
                color_picker(ui, "Nebula", &mut config.nebula_color);

                ui.separator();
                ui.heading("Star");
                ui.add(egui::Slider::new(&mut config.core_size, CORE_SIZE_RANGE).text("Core Size"));
                ui.add(
                    egui::Slider::new(&mut config.expansion_radius, EXPANSION_RADIUS_RANGE)
                        .text("Expansion Radius"),
                );
                ui.add(
                    egui::Slider::new(&mut config.particle_count, PARTICLE_COUNT_RANGE)
                        .text("Particles"),
                );

                ui.separator();
                ui.heading("Motion");
                ui.add(
                    egui::Slider::new(&mut config.animation_speed, ANIMATION_SPEED_RANGE)
                        .text("Animation Speed"),
                );
                ui.add(
                    egui::Slider::new(&mut config.turbulence, TURBULENCE_RANGE).text("Turbulence"),
                );
                ui.add(
                    egui::Slider::new(&mut config.brightness, BRIGHTNESS_RANGE).text("Brightness"),
                );
                ui.checkbox(&mut config.auto_rotate, "Auto Rotate");

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Reset").clicked() {
                        state.reset_requested = true;
                    }
                    let pause_label = if state.paused { "Resume" } else { "Pause" };
                    if ui.button(pause_label).clicked() {
                        state.pause_requested = true;
                    }
                    if ui.button("Save preset").clicked() {
                        state.save_requested = true;
                    }
                });

                if let Some(status) = &state.status {
                    ui.weak(status);
                }
            });
    }
}
