//! Interactive display session: a winit window presenting frames through wgpu.
//!
//! This module is compiled only with the `display` feature. The painter owns
//! the event loop and pumps it once per frame instead of handing control to
//! `EventLoop::run_app`, so the simulation keeps driving the frame rate.
//!
//! Most platforms allow one event loop per process, so closing a session
//! only drops the window and GPU surface. The loop stays parked in the
//! [`DisplaySession`] and a later [`DisplaySession::open_window`] creates a
//! fresh window on it.
//!
//! # Per-frame sequence
//!
//! 1. Upload the composed RGB frame into the window texture.
//! 2. Pump pending window events (keeps the OS window responsive).
//! 3. Block on the [`FramePacer`] until the frame interval has elapsed.
//! 4. Draw the texture as a full-window quad and present.

use std::sync::Arc;
use std::time::Duration;

use image::RgbImage;
use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::EventLoopExtPumpEvents;
use winit::window::{Window, WindowAttributes, WindowId};

use super::pacer::FramePacer;
use crate::config::PainterConfig;
use crate::error::PaintError;

// ---------------------------------------------------------------------------
// Vertex
// ---------------------------------------------------------------------------

/// A quad corner with clip-space position and texture coordinate.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck_derive::Pod, bytemuck_derive::Zeroable)]
struct Vertex {
    position: [f32; 2],
    uv: [f32; 2],
}

impl Vertex {
    /// Vertex buffer layout for the blit shader.
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Two triangles covering clip space. Texture row 0 is the top of the image.
const QUAD: [Vertex; 6] = [
    Vertex { position: [-1.0, -1.0], uv: [0.0, 1.0] },
    Vertex { position: [1.0, -1.0], uv: [1.0, 1.0] },
    Vertex { position: [1.0, 1.0], uv: [1.0, 0.0] },
    Vertex { position: [-1.0, -1.0], uv: [0.0, 1.0] },
    Vertex { position: [1.0, 1.0], uv: [1.0, 0.0] },
    Vertex { position: [-1.0, 1.0], uv: [0.0, 0.0] },
];

// ---------------------------------------------------------------------------
// Presenter
// ---------------------------------------------------------------------------

/// GPU resources for showing one CPU-side frame per present.
struct Presenter {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    frame_texture: wgpu::Texture,
    frame_bind_group: wgpu::BindGroup,
    frame_size: wgpu::Extent3d,
    window: Arc<Window>,
}

impl Presenter {
    /// Create the surface, device and blit pipeline for `window`.
    ///
    /// # Errors
    ///
    /// Returns an error if no suitable GPU adapter or device is available.
    async fn new(window: Arc<Window>, frame_side: u32) -> Result<Self, anyhow::Error> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("no suitable GPU adapter found"))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("booster_display"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no supported formats"))?;
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

        // The composed frame is uploaded here every present.
        let frame_size = wgpu::Extent3d {
            width: frame_side,
            height: frame_side,
            depth_or_array_layers: 1,
        };
        let frame_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("frame_texture"),
            size: frame_size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let frame_view = frame_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let frame_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("frame_sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let frame_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("frame_bind_group_layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&frame_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&frame_sampler),
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("blit_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("blit.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("blit_pipeline_layout"),
            bind_group_layouts: &[&frame_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("blit_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("blit_quad"),
            contents: bytemuck::cast_slice(&QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            render_pipeline,
            vertex_buffer,
            frame_texture,
            frame_bind_group,
            frame_size,
            window,
        })
    }

    /// Copy an RGB frame into the window texture.
    fn upload(&self, frame: &RgbImage) {
        let rgba: Vec<u8> = frame
            .pixels()
            .flat_map(|p| [p[0], p[1], p[2], u8::MAX])
            .collect();
        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.frame_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &rgba,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.frame_size.width),
                rows_per_image: Some(self.frame_size.height),
            },
            self.frame_size,
        );
    }

    /// Draw the uploaded frame and present it.
    ///
    /// A lost or outdated surface is reconfigured and acquired once more
    /// before giving up.
    fn present(&mut self) -> Result<(), PaintError> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                tracing::warn!(error = %e, "surface lost -- reconfiguring");
                self.resize(self.window.inner_size());
                self.surface
                    .get_current_texture()
                    .map_err(|e| PaintError::Present(e.to_string()))?
            }
            Err(e) => return Err(PaintError::Present(e.to_string())),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("blit_encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("blit_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.draw(0..QUAD.len() as u32, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Reconfigure the surface for a new window size. Zero sizes are ignored.
    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }
}

// ---------------------------------------------------------------------------
// Window application handler
// ---------------------------------------------------------------------------

/// Window lifecycle as seen from the event loop.
///
/// winit only hands out an [`ActiveEventLoop`] inside handler callbacks, so
/// a requested window starts `Pending` and is created on the next pump.
enum SurfaceState {
    /// No window wanted.
    Closed,
    /// Window requested; created on the next pump.
    Pending,
    /// Window and presenter are live.
    Ready(Presenter),
    /// Creation failed; the message is reported by the session.
    Failed(String),
}

struct PresentApp {
    title: String,
    side: u32,
    resumed: bool,
    state: SurfaceState,
}

impl PresentApp {
    fn create_window(&mut self, event_loop: &ActiveEventLoop) {
        if !matches!(self.state, SurfaceState::Pending) {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(self.side, self.side))
            .with_resizable(false);

        self.state = match event_loop.create_window(attrs) {
            Ok(window) => match pollster::block_on(Presenter::new(Arc::new(window), self.side)) {
                Ok(presenter) => SurfaceState::Ready(presenter),
                Err(e) => {
                    tracing::error!(error = %e, "failed to initialize display presenter");
                    SurfaceState::Failed(e.to_string())
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "failed to create window");
                SurfaceState::Failed(e.to_string())
            }
        };
    }
}

impl ApplicationHandler for PresentApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.resumed = true;
        self.create_window(event_loop);
    }

    // `resumed` arrives once per loop; windows requested after that are
    // created here.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.resumed {
            self.create_window(event_loop);
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let SurfaceState::Ready(presenter) = &mut self.state else {
            return;
        };
        match event {
            WindowEvent::Resized(new_size) => {
                tracing::debug!(
                    width = new_size.width,
                    height = new_size.height,
                    "window resized"
                );
                presenter.resize(new_size);
            }
            WindowEvent::CloseRequested => {
                // The owner decides when to stop painting and dispose.
                tracing::debug!("window close requested");
            }
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// DisplaySession
// ---------------------------------------------------------------------------

/// The event loop, the window living on it, and the frame pacer.
///
/// Fields drop in declaration order: the window goes before its event loop.
pub(crate) struct DisplaySession {
    app: PresentApp,
    pacer: FramePacer,
    event_loop: EventLoop<()>,
}

impl DisplaySession {
    /// Create the event loop without a window.
    ///
    /// # Errors
    ///
    /// Returns [`PaintError::DisplayInit`] if the platform has no display or
    /// another event loop already exists in this process.
    pub(crate) fn new() -> Result<Self, PaintError> {
        let event_loop = EventLoop::new().map_err(|e| PaintError::DisplayInit(e.to_string()))?;
        Ok(Self {
            app: PresentApp {
                title: String::new(),
                side: 0,
                resumed: false,
                state: SurfaceState::Closed,
            },
            pacer: FramePacer::new(),
            event_loop,
        })
    }

    /// Whether a window is currently up.
    pub(crate) fn is_open(&self) -> bool {
        matches!(self.app.state, SurfaceState::Ready(_))
    }

    /// Open the window and set up its GPU surface.
    ///
    /// # Errors
    ///
    /// Returns [`PaintError::DisplayInit`] if the window or GPU surface
    /// cannot be created. The event loop stays usable for another attempt.
    pub(crate) fn open_window(&mut self, config: &PainterConfig) -> Result<(), PaintError> {
        self.app.title = config.window_title.clone();
        self.app.side = config.viewport_size;
        self.app.state = SurfaceState::Pending;
        self.pacer = FramePacer::new();
        self.await_window()?;

        tracing::info!(
            side = config.viewport_size,
            title = %config.window_title,
            "display window opened"
        );
        Ok(())
    }

    /// Pump once and report whether the requested window came up.
    fn await_window(&mut self) -> Result<(), PaintError> {
        self.event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.app);

        let failure = match &self.app.state {
            SurfaceState::Ready(_) => return Ok(()),
            SurfaceState::Failed(message) => message.clone(),
            SurfaceState::Pending | SurfaceState::Closed => {
                "event loop never resumed; no window was created".to_owned()
            }
        };
        self.app.state = SurfaceState::Closed;
        Err(PaintError::DisplayInit(failure))
    }

    /// Blit, pump events, wait for the frame interval, then present.
    pub(crate) fn present(&mut self, frame: &RgbImage, fps: u32) -> Result<(), PaintError> {
        if let SurfaceState::Ready(presenter) = &self.app.state {
            presenter.upload(frame);
        }

        self.event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.app);

        let dt = self.pacer.tick(fps);
        tracing::trace!(frame = self.pacer.frame_index(), ?dt, "frame paced");

        match &mut self.app.state {
            SurfaceState::Ready(presenter) => presenter.present(),
            _ => Err(PaintError::Present("display surface is gone".to_owned())),
        }
    }

    /// Tear down the window and GPU surface, keeping the event loop parked.
    pub(crate) fn close_window(&mut self) {
        self.app.state = SurfaceState::Closed;
        // Let the platform process the window destruction.
        self.event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.app);
        tracing::info!(frames = self.pacer.frame_index(), "display window closed");
    }
}
