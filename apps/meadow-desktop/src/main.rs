use anyhow::Result;
use clap::Parser;
use glam::Vec3;
use meadow_assets::TextureData;
use meadow_camera::FlyCamera;
use meadow_input::MoveIntent;
use meadow_render_wgpu::GridRenderer;
use meadow_scene::GridScene;
use meadow_timing::{FrameClock, FrameRateMeter};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "meadow-desktop", about = "Textured grid viewer with a fly camera")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Texture file for the quads; a procedural fallback is used if absent
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Grid side length (n x n quads)
    #[arg(long, default_value = "10")]
    grid: u32,
}

/// Simulation-side state: camera, timing, and held keys.
struct AppState {
    camera: FlyCamera,
    clock: FrameClock,
    meter: FrameRateMeter,
    keys_held: HashSet<KeyCode>,
    scene: GridScene,
    texture_path: Option<PathBuf>,
}

impl AppState {
    fn new(scene: GridScene, texture_path: Option<PathBuf>) -> Self {
        let mut camera = FlyCamera::new();
        // Back far enough that the whole grid is in view at startup.
        camera.position = Vec3::new(0.0, 0.0, 15.0);

        let clock = FrameClock::new();
        let meter = FrameRateMeter::new(clock.seconds_since_start());

        Self {
            camera,
            clock,
            meter,
            keys_held: HashSet::new(),
            scene,
            texture_path,
        }
    }

    fn movement_intent(&self) -> MoveIntent {
        MoveIntent {
            forward: self.keys_held.contains(&KeyCode::KeyW),
            back: self.keys_held.contains(&KeyCode::KeyS),
            left: self.keys_held.contains(&KeyCode::KeyA),
            right: self.keys_held.contains(&KeyCode::KeyD),
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys_held.insert(key);
        } else {
            self.keys_held.remove(&key);
        }
    }

    /// Load the configured texture, falling back to the procedural one.
    fn texture(&self) -> TextureData {
        match &self.texture_path {
            Some(path) => TextureData::load(path).unwrap_or_else(|e| {
                tracing::warn!("failed to load {}: {e}; using fallback", path.display());
                TextureData::grass_fallback()
            }),
            None => TextureData::grass_fallback(),
        }
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<GridRenderer>,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Meadow")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        // Capture the cursor for mouse look; the camera's baseline handling
        // absorbs wherever the captured cursor first lands.
        if let Err(e) = window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked))
        {
            tracing::warn!("cursor grab unavailable: {e}");
        }
        window.set_cursor_visible(false);

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
                label: Some("meadow_device"),
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

        let texture = self.state.texture();
        let renderer = GridRenderer::new(
            &device,
            &queue,
            surface_format,
            size.width,
            size.height,
            &self.state.scene,
            &texture,
        );

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
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
            WindowEvent::CursorMoved { position, .. } => {
                self.state.camera.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                if key == KeyCode::Escape && key_state == ElementState::Pressed {
                    event_loop.exit();
                    return;
                }
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::RedrawRequested => {
                let dt = self.state.clock.frame_delta();
                let intent = self.state.movement_intent();
                self.state.camera.apply_movement(intent, dt);

                let fps = self
                    .state
                    .meter
                    .tick(self.state.clock.seconds_since_start());
                if let Some(window) = &self.window {
                    window.set_title(&format!(
                        "Meadow {}x{} | FPS: {:.1}",
                        self.state.scene.cols, self.state.scene.rows, fps
                    ));
                }

                let (Some(surface), Some(device), Some(queue)) =
                    (&self.surface, &self.device, &self.queue)
                else {
                    return;
                };

                let output = match surface.get_current_texture() {
                    Ok(t) => t,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(config) = &self.config {
                            surface.configure(device, config);
                        }
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

                if let Some(renderer) = &self.renderer {
                    renderer.render(device, queue, &view, self.state.camera.view_matrix());
                }

                output.present();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
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

    tracing::info!("meadow-desktop starting");

    let scene = GridScene::square(cli.grid);
    let state = AppState::new(scene, cli.texture);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state);
    event_loop.run_app(&mut app)?;

    Ok(())
}
