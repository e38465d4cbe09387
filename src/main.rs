//! Dying Star Visualization
//!
//! A collapsing core, an expanding nebula, pulsing rings and a shock wave,
//! tweakable live from an egui panel.

mod gui;

use gui::{Gui, UiState};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use stellar_physics::SceneFrame;
use stellar_renderer::{Camera, SceneRenderer};
use stellar_simulation::{ConfigError, StellarConfig, StellarSimulation};
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

const DEFAULT_PRESET_PATH: &str = "stellar-preset.json";

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("surface creation failed: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("device request failed: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

/// Config from the optional first CLI argument, then `STELLAR_*` env overrides
fn load_config(path: Option<&PathBuf>) -> Result<StellarConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            StellarConfig::from_json_file(path)?
        }
        None => StellarConfig::default(),
    };
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Where "Save preset" writes: `STELLAR_PRESET_PATH`, else the default file.
/// Never the config loaded from the command line, which may carry env overrides.
fn resolve_preset_path(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    lookup("STELLAR_PRESET_PATH")
        .filter(|path| !path.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PRESET_PATH))
}

struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    simulation: StellarSimulation,
    renderer: SceneRenderer,
    camera: Camera,
    scene: SceneFrame,

    gui: Gui,
    ui_state: UiState,
    preset_path: PathBuf,

    frame_times: VecDeque<f32>,
    last_frame_time: Instant,
}

impl GpuState {
    async fn new(
        window: Arc<Window>,
        stellar_config: StellarConfig,
        preset_path: PathBuf,
    ) -> Result<Self, AppError> {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let surface = instance.create_surface(window.clone())?;

        // Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("✓ Using GPU: {}", adapter.get_info().name);

        // Create device and queue
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(AppError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let simulation = StellarSimulation::new(stellar_config.clone());
        log::info!("✓ Simulation initialized");

        let renderer = SceneRenderer::new(&device, &config);
        log::info!("✓ Renderer initialized");

        let mut camera = Camera::new(config.width, config.height);
        camera.auto_rotate = stellar_config.auto_rotate;

        let gui = Gui::new(&device, config.format, &window);
        let ui_state = UiState::new(stellar_config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            simulation,
            renderer,
            camera,
            scene: SceneFrame::default(),
            gui,
            ui_state,
            preset_path,
            frame_times: VecDeque::with_capacity(100),
            last_frame_time: Instant::now(),
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.renderer.resize(&self.device, &self.config);
            self.camera.resize(new_size.width, new_size.height);
        }
    }

    fn toggle_pause(&mut self) {
        let paused = self.simulation.toggle_pause();
        self.ui_state.paused = paused;
    }

    fn reset(&mut self) {
        self.simulation.reset();
        self.ui_state.status = None;
    }

    /// Apply edits and button presses collected by the last GUI frame
    fn apply_ui_requests(&mut self) {
        self.simulation.apply_config(&self.ui_state.config);
        self.camera.auto_rotate = self.ui_state.config.auto_rotate;

        if std::mem::take(&mut self.ui_state.reset_requested) {
            self.reset();
        }
        if std::mem::take(&mut self.ui_state.pause_requested) {
            self.toggle_pause();
        }
        if std::mem::take(&mut self.ui_state.save_requested) {
            let status = match self.simulation.config().save_json(&self.preset_path) {
                Ok(()) => {
                    log::info!("Saved preset to {}", self.preset_path.display());
                    format!("Saved {}", self.preset_path.display())
                }
                Err(e) => {
                    log::warn!("Failed to save preset: {e}");
                    format!("Save failed: {e}")
                }
            };
            self.ui_state.status = Some(status);
        }
    }

    fn render(&mut self, window: &Window) -> Result<(f32, f32), wgpu::SurfaceError> {
        // Track frame time
        let now = Instant::now();
        let frame_time = (now - self.last_frame_time).as_secs_f32() * 1000.0;
        self.last_frame_time = now;

        self.frame_times.push_back(frame_time);
        if self.frame_times.len() > 100 {
            self.frame_times.pop_front();
        }
        let avg_frame_time = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        let fps = 1000.0 / avg_frame_time.max(f32::EPSILON);

        self.apply_ui_requests();

        // Advance
        self.simulation.step();
        self.camera.update();
        self.simulation.write_scene(&mut self.scene);

        // Update UI state
        let stats = *self.simulation.stats();
        self.ui_state.fps = fps;
        self.ui_state.frame_time = avg_frame_time;
        self.ui_state.particle_count = self.simulation.particle_count();
        self.ui_state.respawned_last_frame = stats.respawned_last_frame;
        self.ui_state.respawned_total = stats.respawned_total;
        self.ui_state.paused = self.simulation.is_paused();

        // Render
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(
            &self.device,
            &self.queue,
            &mut encoder,
            &view,
            &self.camera,
            &self.scene,
            self.simulation.time() as f32,
        );

        self.gui.render(
            &self.device,
            &self.queue,
            &mut encoder,
            window,
            &view,
            &mut self.ui_state,
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok((fps, avg_frame_time))
    }
}

struct App {
    stellar_config: StellarConfig,
    preset_path: PathBuf,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    error: Option<AppError>,
}

impl App {
    fn new(stellar_config: StellarConfig, preset_path: PathBuf) -> Self {
        Self {
            stellar_config,
            preset_path,
            window: None,
            gpu_state: None,
            mouse_pressed: false,
            last_mouse_pos: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_attributes = Window::default_attributes()
            .with_title("Stellar Death")
            .with_inner_size(winit::dpi::LogicalSize::new(1600, 900));

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        self.window = Some(window.clone());
        self.gpu_state = Some(pollster::block_on(GpuState::new(
            window,
            self.stellar_config.clone(),
            self.preset_path.clone(),
        ))?);
        Ok(())
    }

    fn handle_key(&mut self, key_code: KeyCode) {
        let Some(gpu_state) = &mut self.gpu_state else {
            return;
        };

        match key_code {
            KeyCode::Space => gpu_state.toggle_pause(),
            KeyCode::KeyR => gpu_state.reset(),
            KeyCode::KeyC => gpu_state.camera.reset(),
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                log::error!("Initialization failed: {e}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Handle GUI events
        if let (Some(gpu_state), Some(window)) = (&mut self.gpu_state, &self.window) {
            if gpu_state.gui.handle_event(window, &event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(key_code),

            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = state == ElementState::Pressed;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let Some(last_pos) = self.last_mouse_pos {
                        let delta_x = (position.x - last_pos.0) as f32;
                        let delta_y = (position.y - last_pos.1) as f32;

                        if let Some(gpu_state) = &mut self.gpu_state {
                            gpu_state.camera.rotate(-delta_x * 0.005, delta_y * 0.005);
                        }
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_x, y) => y * 10.0,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };

                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state
                        .camera
                        .zoom(-scroll * gpu_state.camera.distance / 100.0);
                }
            }

            WindowEvent::RedrawRequested => {
                if let (Some(window), Some(gpu_state)) = (&self.window, &mut self.gpu_state) {
                    match gpu_state.render(window) {
                        Ok((fps, frame_time)) => {
                            window.set_title(&format!(
                                "Stellar Death - {:.0} FPS ({:.2}ms) - {} particles",
                                fps,
                                frame_time,
                                gpu_state.simulation.particle_count()
                            ));
                        }
                        Err(wgpu::SurfaceError::Lost) => gpu_state.resize(window.inner_size()),
                        Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                        Err(e) => log::warn!("Render error: {e:?}"),
                    }
                }
            }

            _ => {}
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn run() -> Result<(), AppError> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let stellar_config = load_config(config_path.as_ref())?;
    let preset_path = resolve_preset_path(|key| std::env::var(key).ok());

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(stellar_config, preset_path);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting dying star visualization...");

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
