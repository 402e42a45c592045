use anyhow::{Context as _, Result};
use clap::Parser;
use egui::Context as EguiContext;
use gridwalk_assets::{LoadedScene, SceneManifest, write_demo_assets};
use gridwalk_common::{Rect, TextureId};
use gridwalk_input::{InputState, Key, MouseButton as GameButton};
use gridwalk_inventory::SLOT_COUNT;
use gridwalk_kernel::GameEvent;
use gridwalk_render::{DrawList, HudLayout, MapMesh, RenderView};
use gridwalk_render_wgpu::WgpuRenderer;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "gridwalk-desktop", about = "Walk a maze, pick things up")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory the scene's image paths are resolved against
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Scene manifest (YAML). Defaults to the built-in demo level.
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Generate the demo level's images into the assets directory first
    #[arg(long)]
    demo_assets: bool,

    #[arg(long, default_value_t = 640)]
    width: u32,

    #[arg(long, default_value_t = 480)]
    height: u32,
}

/// Longest step simulated in one frame. Stalls (window drags, breakpoints)
/// would otherwise teleport the player.
const MAX_FRAME_DT: f32 = 0.1;

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::KeyW => Some(Key::Forward),
        KeyCode::KeyA => Some(Key::Left),
        KeyCode::KeyS => Some(Key::Back),
        KeyCode::KeyD => Some(Key::Right),
        KeyCode::ShiftLeft => Some(Key::Sprint),
        _ => None,
    }
}

fn map_button(button: MouseButton) -> Option<GameButton> {
    match button {
        MouseButton::Left => Some(GameButton::Primary),
        MouseButton::Right => Some(GameButton::Secondary),
        _ => None,
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::MoveBlocked { cell } => tracing::trace!(x = cell.x, z = cell.z, "blocked"),
        GameEvent::PickupCollected { name, slot } => tracing::info!(%name, slot, "picked up"),
        GameEvent::ItemDiscarded { name, slot } => tracing::info!(%name, slot, "item lost"),
        GameEvent::ItemUsed {
            name,
            slot,
            consumed,
        } => tracing::info!(%name, slot, consumed, "used item"),
        GameEvent::SlotSelected { slot } => tracing::debug!(slot, "slot selected"),
        GameEvent::Stepped { .. } => {}
    }
}

/// Frames-per-second, refreshed once a second.
#[derive(Debug, Default)]
struct FpsCounter {
    frames: u32,
    elapsed: f32,
    fps: u32,
}

impl FpsCounter {
    fn tick(&mut self, dt: f32) -> u32 {
        self.frames += 1;
        self.elapsed += dt;
        if self.elapsed >= 1.0 {
            self.fps = (self.frames as f32 / self.elapsed).round() as u32;
            self.frames = 0;
            self.elapsed = 0.0;
        }
        self.fps
    }
}

/// Wheel motion in lines. Pixel deltas only count their direction, and an
/// event with no vertical motion counts as none.
fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(p) if p.y == 0.0 => 0.0,
        MouseScrollDelta::PixelDelta(p) => p.y.signum() as f32,
    }
}

/// Simulation step for a frame that took `elapsed` seconds.
fn step_dt(elapsed: f32) -> f32 {
    elapsed.clamp(0.0, MAX_FRAME_DT)
}

fn egui_rect(r: Rect) -> egui::Rect {
    egui::Rect::from_min_size(egui::pos2(r.x, r.y), egui::vec2(r.width, r.height))
}

/// Application state.
struct AppState {
    scene: LoadedScene,
    input: InputState,
    mouse_captured: bool,
    last_frame: Instant,
    fps: FpsCounter,
    /// HUD icons, uploaded to egui on first draw.
    icons: BTreeMap<TextureId, egui::TextureHandle>,
}

impl AppState {
    fn new(scene: LoadedScene) -> Self {
        Self {
            scene,
            input: InputState::new(),
            mouse_captured: true,
            last_frame: Instant::now(),
            fps: FpsCounter::default(),
            icons: BTreeMap::new(),
        }
    }

    fn update(&mut self, dt: f32) {
        let frame = self.input.take_frame();
        let state = &mut self.scene.state;
        state.step(&frame, dt);
        for event in state.drain_events() {
            log_event(&event);
        }
    }

    fn icon(&mut self, ctx: &EguiContext, id: TextureId) -> Option<egui::TextureId> {
        if let Some(handle) = self.icons.get(&id) {
            return Some(handle.id());
        }
        let image = self.scene.assets.get(id)?;
        let color = egui::ColorImage::from_rgba_unmultiplied(
            [image.width as usize, image.height as usize],
            &image.rgba,
        );
        let handle = ctx.load_texture(&image.name, color, egui::TextureOptions::NEAREST);
        let tex = handle.id();
        self.icons.insert(id, handle);
        Some(tex)
    }

    fn draw_hud(&mut self, ctx: &EguiContext, fps: u32) {
        let screen = ctx.screen_rect();
        let hud = HudLayout::new(screen.width(), screen.height(), SLOT_COUNT);
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("hud"),
        ));
        let full_uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));

        painter.text(
            egui::pos2(hud.fps_position.x, hud.fps_position.y),
            egui::Align2::LEFT_TOP,
            format!("{fps} FPS"),
            egui::FontId::proportional(hud.fps_font_size),
            egui::Color32::DARK_GRAY,
        );

        let stamina = self.scene.state.stamina().value();
        painter.rect_filled(egui_rect(hud.stamina_bar), 0.0, egui::Color32::RED);
        painter.rect_filled(egui_rect(hud.stamina_fill(stamina)), 0.0, egui::Color32::GREEN);

        if self.scene.state.is_targeting() {
            let cursor = self.scene.cursor;
            if let Some(tex) = self.icon(ctx, cursor) {
                let size = self.icons[&cursor].size_vec2();
                let center = egui::pos2(hud.crosshair.x, hud.crosshair.y);
                painter.image(
                    tex,
                    egui::Rect::from_center_size(center, size),
                    full_uv,
                    egui::Color32::WHITE,
                );
            }
        }

        let selected = self.scene.state.inventory().selected();
        let items: Vec<Option<TextureId>> = self
            .scene
            .state
            .inventory()
            .slots()
            .iter()
            .map(|slot| slot.as_ref().map(|item| item.texture))
            .collect();
        for (i, (rect, item)) in hud.slots.iter().zip(items).enumerate() {
            let color = if i == selected {
                egui::Color32::RED
            } else {
                egui::Color32::WHITE
            };
            painter.rect_filled(egui_rect(*rect), 0.0, color);
            if let Some(tex) = item.and_then(|id| self.icon(ctx, id)) {
                painter.image(tex, egui_rect(*rect), full_uv, egui::Color32::WHITE);
            }
        }

        if let Some(item) = self.scene.state.inventory().selected_item() {
            painter.text(
                egui::pos2(hud.name_anchor.x, hud.name_anchor.y),
                egui::Align2::RIGHT_TOP,
                &item.name,
                egui::FontId::proportional(hud.name_font_size),
                egui::Color32::DARK_GRAY,
            );
        }
    }
}

struct GpuApp {
    state: AppState,
    window_size: PhysicalSize<u32>,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<WgpuRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(scene: LoadedScene, window_size: PhysicalSize<u32>) -> Self {
        Self {
            state: AppState::new(scene),
            window_size,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    fn set_mouse_captured(&mut self, captured: bool) {
        self.state.mouse_captured = captured;
        let Some(window) = &self.window else {
            return;
        };
        window.set_cursor_visible(!captured);
        let mode = if captured {
            CursorGrabMode::Locked
        } else {
            CursorGrabMode::None
        };
        if let Err(e) = window.set_cursor_grab(mode) {
            // Some platforms only support confining the cursor.
            if captured && window.set_cursor_grab(CursorGrabMode::Confined).is_err() {
                tracing::warn!("cursor grab unavailable: {e}");
            }
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode, pressed: bool) {
        if let Some(key) = map_key(code) {
            self.state.input.key_changed(key, pressed);
            return;
        }
        if !pressed {
            return;
        }
        match code {
            KeyCode::Escape => self.set_mouse_captured(!self.state.mouse_captured),
            KeyCode::Delete => {
                tracing::info!("exit requested");
                event_loop.exit();
            }
            _ => {}
        }
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let elapsed = (now - self.state.last_frame).as_secs_f32();
        self.state.last_frame = now;
        self.state.update(step_dt(elapsed));
        let fps = self.state.fps.tick(elapsed);

        let (Some(surface), Some(device), Some(queue), Some(config)) =
            (&self.surface, &self.device, &self.queue, &self.config)
        else {
            return;
        };

        let output = match surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(device, config);
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

        let game = &self.state.scene.state;
        let render_view =
            RenderView::from_camera(game.camera(), RenderView::aspect_of(config.width, config.height));
        let draws = DrawList::build(game, render_view.eye);
        if let Some(renderer) = &self.renderer {
            renderer.render(device, queue, &view, &render_view, &draws);
        }

        let (Some(window), Some(egui_winit), Some(egui_renderer)) =
            (&self.window, &mut self.egui_winit, &mut self.egui_renderer)
        else {
            return;
        };

        let raw_input = egui_winit.take_egui_input(window);
        let state = &mut self.state;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            state.draw_hud(ctx, fps);
        });
        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [config.width, config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("hud_encoder"),
        });
        egui_renderer.update_buffers(device, queue, &mut encoder, &paint_jobs, &screen_descriptor);
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("hud_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        output.present();
        window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("gridwalk")
            .with_resizable(true)
            .with_inner_size(self.window_size);
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("gridwalk_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let mut renderer = WgpuRenderer::new(&device, surface_format, size.width, size.height);
        let scene = &self.state.scene;
        renderer.upload_assets(&device, &queue, &scene.assets);
        renderer.set_map(&device, &MapMesh::from_grid(scene.state.grid()), scene.atlas);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
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

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        self.set_mouse_captured(true);
        self.state.last_frame = Instant::now();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, config.width, config.height);
                    }
                }
            }
            WindowEvent::Focused(false) => {
                self.state.input.clear_held();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: key_state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.handle_key(event_loop, code, key_state == ElementState::Pressed);
            }
            WindowEvent::MouseInput { button, state, .. } => {
                if let Some(button) = map_button(button) {
                    self.state
                        .input
                        .button_changed(button, state == ElementState::Pressed);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.state.input.scrolled(scroll_lines(delta));
            }
            WindowEvent::RedrawRequested => self.redraw(),
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
            if self.state.mouse_captured {
                self.state.input.mouse_moved(delta.0 as f32, delta.1 as f32);
            }
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

    tracing::info!("gridwalk-desktop starting");

    if cli.demo_assets {
        write_demo_assets(&cli.assets)
            .with_context(|| format!("writing demo assets to {}", cli.assets.display()))?;
    }

    let manifest = match &cli.scene {
        Some(path) => SceneManifest::load(path)?,
        None => SceneManifest::default(),
    };
    let scene = manifest
        .instantiate(&cli.assets)
        .with_context(|| format!("loading scene assets from {}", cli.assets.display()))?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(scene, PhysicalSize::new(cli.width, cli.height));
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_and_shift_map_to_game_keys() {
        assert_eq!(map_key(KeyCode::KeyW), Some(Key::Forward));
        assert_eq!(map_key(KeyCode::KeyD), Some(Key::Right));
        assert_eq!(map_key(KeyCode::ShiftLeft), Some(Key::Sprint));
        assert_eq!(map_key(KeyCode::Escape), None);
        assert_eq!(map_button(MouseButton::Right), Some(GameButton::Secondary));
        assert_eq!(map_button(MouseButton::Middle), None);
    }

    #[test]
    fn fps_counter_updates_each_second() {
        let mut fps = FpsCounter::default();
        for _ in 0..59 {
            assert_eq!(fps.tick(1.0 / 60.0), 0);
        }
        assert_eq!(fps.tick(1.0 / 60.0 + 0.001), 60);
    }

    #[test]
    fn slow_frames_report_real_rate_but_step_capped() {
        let mut fps = FpsCounter::default();
        assert_eq!(fps.tick(0.5), 0);
        assert_eq!(fps.tick(0.5), 2);
        assert_eq!(step_dt(0.5), MAX_FRAME_DT);
        assert_eq!(step_dt(0.016), 0.016);
        assert_eq!(step_dt(-1.0), 0.0);
    }

    #[test]
    fn pixel_scroll_counts_direction_only() {
        let pixels = |y| MouseScrollDelta::PixelDelta(winit::dpi::PhysicalPosition::new(4.0, y));
        assert_eq!(scroll_lines(pixels(0.0)), 0.0);
        assert_eq!(scroll_lines(pixels(-0.0)), 0.0);
        assert_eq!(scroll_lines(pixels(37.5)), 1.0);
        assert_eq!(scroll_lines(pixels(-12.0)), -1.0);
        assert_eq!(scroll_lines(MouseScrollDelta::LineDelta(0.0, -2.0)), -2.0);

        let mut input = InputState::default();
        input.scrolled(scroll_lines(pixels(0.0)));
        assert!(input.take_frame().actions.is_empty());
    }
}
