use anyhow::{Context, Result};
use clap::Parser;
use egui::{Color32, Context as EguiContext, RichText};
use glam::Vec2;
use pursuit_assets::{AssetError, StartupAssets};
use pursuit_common::{GameConfig, Variant};
use pursuit_input::{InputState, PointerDrag};
use pursuit_kernel::{Driver, SystemClock};
use pursuit_render::{Presentation, Projection, RenderView, Screen};
use pursuit_render_wgpu::WgpuRenderer;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "pursuit-desktop", about = "Chase game: keep away from the red cube")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Game variant (follow or orbit)
    #[arg(long, default_value = "follow")]
    variant: Variant,

    /// YAML config file; overrides --variant
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory containing assets/grass.jpg and assets/untitled.glb
    #[arg(long, default_value = ".")]
    assets_dir: PathBuf,
}

type AssetResult = Result<StartupAssets, AssetError>;

/// Key name understood by [`InputState`], if any.
fn key_name(key: &Key) -> Option<&str> {
    match key {
        Key::Character(s) => Some(s.as_str()),
        Key::Named(NamedKey::Space) => Some("space"),
        _ => None,
    }
}

/// Game-side state, independent of the GPU.
struct GameState {
    driver: Driver<SystemClock>,
    input: InputState,
    drag: PointerDrag,
    presentation: Presentation,
    projection: Projection,
    assets: Option<Receiver<AssetResult>>,
    /// Loaded assets waiting for the GPU upload.
    pending_upload: Option<StartupAssets>,
    last_frame: Instant,
}

impl GameState {
    fn new(config: GameConfig, assets_dir: PathBuf) -> Self {
        let presentation = Presentation::new(config.max_health);
        let driver = Driver::new(pursuit_kernel::GameSession::new(config), SystemClock::new());

        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let _ = tx.send(pursuit_assets::load_startup_assets(&assets_dir));
        });

        Self {
            driver,
            input: InputState::new(),
            drag: PointerDrag::new(),
            presentation,
            projection: Projection::default(),
            assets: Some(rx),
            pending_upload: None,
            last_frame: Instant::now(),
        }
    }

    /// Check once for the loader's result.
    fn poll_assets(&mut self) {
        let Some(rx) = &self.assets else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(assets)) => {
                self.pending_upload = Some(assets);
                self.driver.assets_ready();
                self.assets = None;
            }
            Ok(Err(err)) => {
                self.driver.report_asset_failure(err.to_string());
                self.assets = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.driver.report_asset_failure("asset loader exited without a result");
                self.assets = None;
            }
        }
    }

    fn update(&mut self) {
        let now = Instant::now();
        let dt = now - self.last_frame;
        self.last_frame = now;

        self.poll_assets();
        self.driver.tick(dt, &self.input);

        let events = self.driver.session_mut().drain_events();
        self.presentation.apply_all(&events);
    }

    fn handle_key(&mut self, key: &Key, pressed: bool) {
        let Some(name) = key_name(key) else {
            return;
        };
        if pressed {
            self.input.key_down(name);
        } else {
            self.input.key_up(name);
        }
    }

    /// Key-up and button-up events are lost while unfocused, so drop every
    /// held control now.
    fn focus_lost(&mut self) {
        self.input.clear();
        self.drag.release();
    }

    fn handle_pointer_motion(&mut self, dx: f32, dy: f32) {
        if let Some(delta) = self.drag.motion(dx, dy) {
            self.orbit(delta);
        }
    }

    fn orbit(&mut self, delta: Vec2) {
        self.driver.session_mut().orbit_camera(delta);
    }

    fn render_view(&self) -> RenderView {
        RenderView::of_session(self.driver.session(), self.projection)
    }

    fn draw_ui(&self, ctx: &EguiContext) {
        match self.presentation.screen() {
            Screen::GameOver { message } => {
                terminal_notice(ctx, message, None);
                return;
            }
            Screen::Failed { reason } => {
                terminal_notice(ctx, "Failed to load assets", Some(reason));
                return;
            }
            Screen::Loading | Screen::Playing => {}
        }

        let bar = self.presentation.health_bar();
        egui::Area::new(egui::Id::new("health_hud"))
            .anchor(egui::Align2::LEFT_TOP, [16.0, 16.0])
            .show(ctx, |ui| {
                let (rect, _) =
                    ui.allocate_exact_size(egui::vec2(200.0, 20.0), egui::Sense::hover());
                let painter = ui.painter();
                painter.rect_filled(rect, 2.0, Color32::from_gray(60));
                let [r, g, b] = bar.color.rgb();
                let fill = egui::Rect::from_min_size(
                    rect.min,
                    egui::vec2(rect.width() * bar.fraction(), rect.height()),
                );
                painter.rect_filled(fill, 2.0, Color32::from_rgb(r, g, b));
                if matches!(self.presentation.screen(), Screen::Loading) {
                    ui.label(RichText::new("Loading...").color(Color32::WHITE));
                }
            });
    }
}

fn terminal_notice(ctx: &EguiContext, heading: &str, detail: Option<&str>) {
    egui::CentralPanel::default()
        .frame(egui::Frame::default().fill(Color32::BLACK))
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space((ui.available_height() / 2.0 - 40.0).max(0.0));
                ui.heading(RichText::new(heading).color(Color32::RED).size(48.0));
                if let Some(detail) = detail {
                    ui.label(RichText::new(detail).color(Color32::LIGHT_GRAY));
                }
            });
        });
}

/// Everything created once a window exists.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Pursuit")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
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
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("pursuit_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer =
            WgpuRenderer::new(&device, &queue, surface_format, config.width, config.height);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    fn redraw(&mut self, egui_ctx: &EguiContext, game: &GameState) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
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

        let shows_scene = game.presentation.shows_scene();
        if shows_scene {
            self.renderer.render(
                &self.device,
                &self.queue,
                &view,
                &game.render_view(),
                game.driver.session(),
            );
        }

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| game.draw_ui(ctx));
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let load = if shows_scene {
                wgpu::LoadOp::Load
            } else {
                wgpu::LoadOp::Clear(wgpu::Color::BLACK)
            };
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
    }
}

struct GpuApp {
    game: GameState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(game: GameState) -> Self {
        Self {
            game,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.egui_ctx) {
            Ok(gpu) => {
                let size = gpu.window.inner_size();
                self.game.projection.resize(size.width, size.height);
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("failed to initialise graphics: {e:#}");
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
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                gpu.resize(new_size);
                self.game.projection.resize(new_size.width, new_size.height);
                gpu.window.request_redraw();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: key_state,
                        ..
                    },
                ..
            } => {
                self.game
                    .handle_key(&logical_key, key_state == ElementState::Pressed);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => match btn_state {
                ElementState::Pressed => self.game.drag.press(),
                ElementState::Released => self.game.drag.release(),
            },
            WindowEvent::Focused(false) => self.game.focus_lost(),
            WindowEvent::RedrawRequested => {
                if self.game.driver.is_running() {
                    self.game.update();
                }
                if let Some(assets) = self.game.pending_upload.take() {
                    gpu.renderer.upload_assets(&gpu.device, &gpu.queue, &assets);
                }
                gpu.redraw(&self.egui_ctx, &self.game);
                if self.game.driver.is_running() {
                    gpu.window.request_redraw();
                } else {
                    event_loop.set_control_flow(ControlFlow::Wait);
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.game
                .handle_pointer_motion(delta.0 as f32, delta.1 as f32);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            if self.game.driver.is_running() {
                gpu.window.request_redraw();
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => GameConfig::from_yaml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::for_variant(cli.variant),
    };
    config.validate()?;

    tracing::info!(variant = %config.variant(), assets = %cli.assets_dir.display(), "pursuit-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(GameState::new(config, cli.assets_dir));
    event_loop.run_app(&mut app)?;

    Ok(())
}
