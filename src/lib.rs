//! Semicircular threshold gauge rendered into a pixel framebuffer.
//!
//! A [`Gauge`] owns a winit window and paints a semicircular dial: a fixed
//! background arc, a foreground sweep from the left endpoint to the current
//! value, and value/range/description labels. Adjacent threshold-band colors
//! blend smoothly across the sweep, and value changes animate with linear
//! time-based interpolation (or snap, when animation is disabled).
//!
//! ```no_run
//! use arcmeter::{Gauge, GaugeConfig};
//!
//! # fn main() -> Result<(), arcmeter::GaugeError> {
//! let config = GaugeConfig::builder().desc("CPU %".to_string()).build();
//! let gauge = Gauge::new(config)?;
//! let updater = gauge.updater();
//! std::thread::spawn(move || {
//!     let _ = updater.update(75.0);
//! });
//! gauge.show()
//! # }
//! ```

mod blend;
mod config;
mod engine;
mod render;

pub use config::{Color, ConfigError, GaugeConfig, ThresholdBand};

use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::{Pixels, SurfaceTexture};
use thiserror::Error;
use tracing::{debug, info, warn};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop, EventLoopBuilder, EventLoopProxy};
use winit::window::WindowBuilder;

use engine::Animator;
use render::{Fonts, Surface};

/// Command delivered to a running gauge's event loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GaugeCommand {
    /// Set a new target value; animates or snaps depending on configuration.
    Update(f64),
    /// Tear the gauge down: close the window and exit the event loop.
    Shutdown,
}

#[derive(Debug, Error)]
pub enum GaugeError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("drawing surface unavailable: {0}")]
    Surface(#[from] pixels::Error),
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("gauge window already closed")]
    Closed,
}

/// Cross-thread handle for driving a [`Gauge`]. Cheap to clone; sending
/// wakes the gauge's event loop even while it is idle.
#[derive(Debug, Clone)]
pub struct GaugeUpdater {
    proxy: EventLoopProxy<GaugeCommand>,
}

impl GaugeUpdater {
    /// Set a new target value. Values outside the configured range are
    /// clamped, not rejected.
    pub fn update(&self, value: f64) -> Result<(), GaugeError> {
        self.proxy
            .send_event(GaugeCommand::Update(value))
            .map_err(|_| GaugeError::Closed)
    }

    /// Close the gauge window and release its surface and callbacks.
    pub fn dispose(&self) -> Result<(), GaugeError> {
        self.proxy
            .send_event(GaugeCommand::Shutdown)
            .map_err(|_| GaugeError::Closed)
    }
}

/// The gauge instance: validated configuration plus the event loop it will
/// run on. Construction is where all configuration errors surface.
pub struct Gauge {
    config: GaugeConfig,
    fonts: Fonts,
    event_loop: EventLoop<GaugeCommand>,
}

impl Gauge {
    pub fn new(config: GaugeConfig) -> Result<Self, GaugeError> {
        let config = config.validated()?;
        let fonts = Fonts::load(&config)?;
        let event_loop = EventLoopBuilder::<GaugeCommand>::with_user_event().build()?;
        debug!(
            min = config.min,
            max = config.max,
            bands = config.bands.len(),
            animate = config.animate,
            "gauge configured"
        );
        Ok(Self {
            config,
            fonts,
            event_loop,
        })
    }

    /// Handle for updating the gauge from other threads.
    pub fn updater(&self) -> GaugeUpdater {
        GaugeUpdater {
            proxy: self.event_loop.create_proxy(),
        }
    }

    /// Open the window and run until the window is closed or a
    /// [`GaugeCommand::Shutdown`] arrives.
    pub fn show(self) -> Result<(), GaugeError> {
        let Gauge {
            config,
            fonts,
            event_loop,
        } = self;

        let window = WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)?;
        let window = Arc::new(window);
        let window_handle = window.clone();

        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        let mut animator = Animator::new(
            config.min,
            config.max,
            config.animate,
            config.anim_duration,
        );
        let frame_duration = Duration::from_secs_f64(1.0 / config.max_framerate);
        let mut last_frame = Instant::now();

        info!(title = %config.title, "opening gauge window");
        event_loop.run(move |event, elwt| {
            match event {
                Event::UserEvent(GaugeCommand::Update(value)) => {
                    // Updates between frames coalesce: each overwrites the
                    // target, only the most recent matters.
                    animator.set_target(value);
                    window_handle.request_redraw();
                }
                Event::UserEvent(GaugeCommand::Shutdown) => {
                    debug!("shutdown requested");
                    elwt.exit();
                }
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        elwt.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if new_size.width > 0 && new_size.height > 0 {
                            fb_width = new_size.width as usize;
                            fb_height = new_size.height as usize;
                            if let Err(err) = pixels.resize_buffer(new_size.width, new_size.height)
                            {
                                warn!(%err, "framebuffer resize failed");
                            }
                            if let Err(err) =
                                pixels.resize_surface(new_size.width, new_size.height)
                            {
                                warn!(%err, "surface resize failed");
                            }
                            window_handle.request_redraw();
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        let value = animator
                            .tick(Instant::now())
                            .unwrap_or_else(|| animator.displayed());
                        let mut surface =
                            Surface::new(pixels.frame_mut(), fb_width, fb_height);
                        render::paint(&mut surface, &config, &fonts, value);
                        if let Err(err) = pixels.render() {
                            warn!(%err, "surface present failed");
                        }
                        last_frame = Instant::now();
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    // Redraws are scheduled only while a transition is in
                    // flight; once converged the loop parks until the next
                    // command or window event.
                    if animator.is_animating() {
                        if last_frame.elapsed() >= frame_duration {
                            window_handle.request_redraw();
                        }
                        elwt.set_control_flow(ControlFlow::Poll);
                    } else {
                        elwt.set_control_flow(ControlFlow::Wait);
                    }
                }
                _ => {}
            }
        })?;
        Ok(())
    }
}
