use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::gpu::{CameraUniform, GpuContext, SceneBuffers, ScenePipelines};
use particle_network::capability::{detect_hints, profile_or_conservative};
use particle_network::{FieldConfig, ParticleField, PointerState};

/// Application state
pub struct App {
    config: FieldConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    field: Option<ParticleField>,
    scene_buffers: Option<SceneBuffers>,
    pipelines: Option<ScenePipelines>,
    /// Latest cursor position; copied once per tick
    pointer: Option<PointerState>,
    last_frame: Instant,
    fps_counter: FpsCounter,
}

impl App {
    pub fn new(config: FieldConfig) -> Self {
        Self {
            config,
            window: None,
            gpu: None,
            field: None,
            scene_buffers: None,
            pipelines: None,
            pointer: None,
            last_frame: Instant::now(),
            fps_counter: FpsCounter::new(),
        }
    }

    fn render(&mut self) {
        let (Some(gpu), Some(field), Some(buffers), Some(pipelines)) = (
            self.gpu.as_ref(),
            self.field.as_mut(),
            self.scene_buffers.as_mut(),
            self.pipelines.as_ref(),
        ) else {
            return;
        };

        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        // 1. Advance the field and rebuild its buffers
        field.tick(elapsed, self.pointer);

        // 2. Upload if the publisher produced new data
        if field.needs_upload() {
            buffers.upload(&gpu.device, &gpu.queue, field.buffers());
            field.mark_uploaded();
        }

        let camera = CameraUniform::new(
            gpu.aspect(),
            field.buffers().field_rotation,
            field.profile().effects_enabled,
        );
        buffers.update_camera(&gpu.queue, &camera);

        // Get surface texture
        let output = match gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Reconfigure surface
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        // 3. Draw edges and particles
        pipelines.draw(&mut encoder, &view, buffers);

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        if let Some(fps) = self.fps_counter.tick() {
            if let Some(window) = &self.window {
                window.set_title(&format!(
                    "Particle Network - {:.0} FPS - {} particles, {} edges",
                    fps,
                    field.store().len(),
                    field.last_edge_count()
                ));
            }
        }
    }

    fn update_pointer(&mut self, x: f64, y: f64) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        self.pointer = PointerState::from_cursor(x, y, gpu.config.width, gpu.config.height);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        log::info!("Initializing particle network...");

        // Create window
        let window_attrs = Window::default_attributes()
            .with_title("Particle Network - Initializing...")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        // Profile the host once, from the real viewport
        let size = window.inner_size();
        let logical_width = size.to_logical::<f64>(window.scale_factor()).width;
        let hints = detect_hints(self.config.count, Some(logical_width));
        let profile = profile_or_conservative(hints, self.config.count);

        let field = match ParticleField::new(&self.config, profile, (size.width, size.height)) {
            Ok(field) => field,
            Err(e) => {
                log::error!("Failed to create particle field: {}", e);
                event_loop.exit();
                return;
            }
        };

        log::info!("Creating GPU context...");
        let gpu = match pollster::block_on(GpuContext::new(window.clone())) {
            Ok(gpu) => gpu,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        log::info!("Creating GPU buffers and pipelines...");
        let scene_buffers = SceneBuffers::new(&gpu.device, field.store().len());
        let pipelines = ScenePipelines::new(&gpu.device, gpu.format(), &scene_buffers);

        log::info!("Initialization complete! Escape to quit.");

        window.request_redraw();
        self.window = Some(window);
        self.gpu = Some(gpu);
        self.field = Some(field);
        self.scene_buffers = Some(scene_buffers);
        self.pipelines = Some(pipelines);
        self.last_frame = Instant::now();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed()
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                {
                    log::info!("Escape pressed, exiting...");
                    event_loop.exit();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.update_pointer(position.x, position.y);
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer = None;
            }
            WindowEvent::Resized(new_size) => {
                log::info!("Window resized to {}x{}", new_size.width, new_size.height);
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size);
                }
                if let Some(field) = &mut self.field {
                    field.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render();
                // Request another frame immediately
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Simple FPS counter
struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
        }
    }

    /// Tick the counter, returns Some(fps) every second
    fn tick(&mut self) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed();

        if elapsed.as_secs_f64() >= 1.0 {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}
