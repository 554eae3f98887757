mod config;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use wara_common::Viewport;
use wara_input::{Action, DragTracker, PointerButton};
use wara_render::{OrbitCamera, Scene};
use wara_render_wgpu::{RenderOptions, WgpuRenderer, load_icon_image, placeholder_icon};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use config::AppConfig;

const PLACEHOLDER_ICON_SIZE: u32 = 128;

#[derive(Parser)]
#[command(name = "wara-desktop", about = "Ground plane and icon ring under an orbit camera")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Icon image (PNG or JPEG)
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// MSAA sample count (1 or 4)
    #[arg(long)]
    msaa: Option<u32>,
}

impl Cli {
    /// Load the config file, if any, then apply flag overrides.
    fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        if let Some(texture) = &self.texture {
            config.texture = Some(texture.clone());
        }
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
        if let Some(msaa) = self.msaa {
            config.render.msaa_samples = msaa;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Application state.
struct AppState {
    camera: OrbitCamera,
    drag: DragTracker,
    scene: Scene,
    viewport: Viewport,
    last_frame: Instant,
}

impl AppState {
    fn new(config: &AppConfig) -> Self {
        Self {
            camera: OrbitCamera::new(config.camera),
            drag: DragTracker::new(),
            scene: Scene::from_config(&config.scene),
            viewport: Viewport::new(config.window.width, config.window.height),
            last_frame: Instant::now(),
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Orbit { dx, dy } => self.camera.handle_drag(dx, dy),
            Action::Zoom(lines) => self.camera.zoom(lines),
            Action::ResetCamera => {
                self.camera.reset();
                tracing::info!("camera reset");
            }
            Action::Quit => {}
        }
    }

    fn update(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(0.1);
        self.last_frame = now;
        self.scene.update(dt);
    }
}

/// Icon image decoded before the window exists, so a bad path is reported early.
fn icon_image(config: &AppConfig) -> (wara_render_wgpu::IconImage, bool) {
    match &config.texture {
        Some(path) => match load_icon_image(path) {
            Ok(img) => {
                tracing::info!("loaded icon texture {}", path.display());
                (img, false)
            }
            Err(e) => {
                tracing::warn!("{e}; falling back to placeholder icon");
                (placeholder_icon(PLACEHOLDER_ICON_SIZE), true)
            }
        },
        None => (placeholder_icon(PLACEHOLDER_ICON_SIZE), true),
    }
}

struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
}

struct GpuApp {
    state: AppState,
    config: AppConfig,
    icon: wara_render_wgpu::IconImage,
    render_options: RenderOptions,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    init_error: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(config: AppConfig) -> Self {
        let (icon, placeholder) = icon_image(&config);
        let mut render_options = config.render;
        if placeholder {
            // A plain white disc says nothing without its tint.
            render_options.tint_strength = 1.0;
        }
        Self {
            state: AppState::new(&config),
            config,
            icon,
            render_options,
            window: None,
            gpu: None,
            init_error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("find adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("wara_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let viewport = Viewport::new(size.width, size.height);
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: viewport.width,
            height: viewport.height,
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

        let renderer = WgpuRenderer::new(
            &device,
            &queue,
            surface_format,
            viewport,
            &self.state.scene,
            &self.icon,
            self.render_options,
        );

        self.state.viewport = viewport;
        self.window = Some(window);
        self.gpu = Some(Gpu {
            surface,
            device,
            queue,
            config,
            renderer,
        });

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
        Ok(())
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let viewport = Viewport::new(size.width, size.height);
        self.state.viewport = viewport;
        if let Some(gpu) = &mut self.gpu {
            gpu.config.width = viewport.width;
            gpu.config.height = viewport.height;
            gpu.surface.configure(&gpu.device, &gpu.config);
            gpu.renderer.resize(&gpu.device, viewport);
            tracing::debug!(width = viewport.width, height = viewport.height, "resized");
        }
    }

    fn redraw(&mut self) {
        self.state.update();

        let Some(gpu) = &self.gpu else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.renderer.render(
            &gpu.device,
            &gpu.queue,
            &view,
            &self.state.camera,
            &self.state.scene,
            self.state.viewport,
        );

        output.present();
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            tracing::error!("startup failed: {e:#}");
            self.init_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let action = match event {
            WindowEvent::CloseRequested => Some(Action::Quit),
            WindowEvent::Resized(new_size) => {
                self.resize(new_size);
                None
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => match &logical_key {
                Key::Named(NamedKey::Escape) => Some(Action::Quit),
                Key::Character(c) => Action::from_key(c.as_str()),
                _ => None,
            },
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = pointer_button(button) {
                    self.state
                        .drag
                        .button(button, state == ElementState::Pressed);
                }
                None
            }
            WindowEvent::CursorMoved { position, .. } => self
                .state
                .drag
                .cursor_moved(position.x as f32, position.y as f32),
            WindowEvent::CursorLeft { .. } => {
                self.state.drag.cursor_left();
                None
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.state.drag.scrolled(lines)
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
                None
            }
            _ => None,
        };

        match action {
            Some(Action::Quit) => event_loop.exit(),
            Some(action) => self.state.apply(action),
            None => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = cli.resolve()?;
    tracing::info!("wara-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(config);
    event_loop.run_app(&mut app)?;

    match app.init_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
