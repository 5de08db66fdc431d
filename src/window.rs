//! Showing an indicator in a window.

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::{Pixels, SurfaceTexture};
use tracing::{debug, error, info};
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::canvas::PixelCanvas;
use crate::error::Result;
use crate::geometry::Size;
use crate::host::{self, Host};
use crate::scene::Scene;
use crate::{CircleProgress, ProgressCommand};

// ============================================================================
// WINDOW HOST
// ============================================================================

/// Host backed by a winit window: redraw requests go to the window, and the
/// indicator gets the largest square that fits its inner size.
struct WindowHost {
    window: Arc<Window>,
}

fn square_bounds(size: PhysicalSize<u32>) -> Size {
    host::measure(Size::new(size.width as f32, size.height as f32))
}

impl Host for WindowHost {
    fn request_redraw(&self) {
        self.window.request_redraw();
    }

    fn current_bounds(&self) -> Size {
        square_bounds(self.window.inner_size())
    }
}

impl CircleProgress {
    /// Opens a window showing the indicator and blocks until it is closed.
    pub fn show(&mut self) -> Result<()> {
        self.run_window(None)
    }

    /// Like [`CircleProgress::show`], applying commands sent from other
    /// threads as they arrive.
    pub fn show_with_commands(&mut self, receiver: Receiver<ProgressCommand>) -> Result<()> {
        self.run_window(Some(receiver))
    }

    fn run_window(&mut self, receiver: Option<Receiver<ProgressCommand>>) -> Result<()> {
        let side = self.settings.size.max(self.suggested_minimum_side().ceil() as u32);

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.settings.title)
            .with_inner_size(LogicalSize::new(side as f64, side as f64))
            .with_resizable(true)
            .build(&event_loop)?;
        let window = Arc::new(window);

        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        let previous_host = std::mem::replace(
            &mut self.host,
            Box::new(WindowHost {
                window: Arc::clone(&window),
            }),
        );
        self.on_size_changed(square_bounds(size));
        window.request_redraw();
        info!(width = size.width, height = size.height, "window opened");

        let frame_duration = Duration::from_secs_f64(1.0 / self.settings.max_framerate.max(1.0));
        let background = self.settings.background;
        let this = &mut *self;

        let result = event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::WaitUntil(Instant::now() + frame_duration));
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if new_size.width == 0 || new_size.height == 0 {
                            debug!("window minimized, keeping the previous framebuffer");
                            return;
                        }
                        if let Err(err) = pixels.resize_buffer(new_size.width, new_size.height) {
                            error!(error = %err, "failed to resize framebuffer");
                            window_target.exit();
                            return;
                        }
                        if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                            error!(error = %err, "failed to resize surface");
                            window_target.exit();
                            return;
                        }
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        this.on_size_changed(square_bounds(new_size));
                    }
                    WindowEvent::RedrawRequested => {
                        let font = this.font();
                        let mut scene = Scene::new(&font);
                        this.render(&mut scene);

                        let mut canvas = PixelCanvas::new(pixels.frame_mut(), fb_width, fb_height)
                            .with_font(font.as_deref());
                        canvas.clear(background);
                        scene.replay(&mut canvas);

                        if let Err(err) = pixels.render() {
                            error!(error = %err, "failed to present frame");
                            window_target.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if let Some(receiver) = &receiver {
                        while let Ok(command) = receiver.try_recv() {
                            this.apply(command);
                        }
                    }
                }
                _ => {}
            }
        });

        self.host = previous_host;
        info!("window closed");
        Ok(result?)
    }
}
