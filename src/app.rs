use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::ActiveEventLoop,
    window::{CursorGrabMode, Window, WindowAttributes, WindowId},
};

use crate::error::ScreenError;
use crate::gfx::rendering::WgpuRenderer;
use crate::input;
use crate::screen::{Dimension, Screen, ScreenConfig};
use crate::showcase::Showcase;

/// Hosts one showcase in a window: creates the GPU renderer on resume,
/// forwards platform events to the screen and drives a frame per redraw.
pub struct ShowcaseApp {
    showcase: &'static Showcase,
    stats: bool,
    window: Option<Arc<Window>>,
    screen: Option<Box<dyn Screen>>,
    pointer_grabbed: bool,
    error: Option<ScreenError>,
}

impl ShowcaseApp {
    pub fn new(showcase: &'static Showcase, stats: bool) -> Self {
        Self {
            showcase,
            stats,
            window: None,
            screen: None,
            pointer_grabbed: false,
            error: None,
        }
    }

    /// The error that ended the event loop, if any.
    pub fn take_error(&mut self) -> Option<ScreenError> {
        self.error.take()
    }

    fn launch(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ScreenError> {
        let attributes = WindowAttributes::default()
            .with_title(self.showcase.title)
            .with_inner_size(LogicalSize::new(1280, 720));
        let window = event_loop
            .create_window(attributes)
            .map(Arc::new)
            .map_err(|e| {
                ScreenError::Renderer(format!("failed to create window: {e}"))
            })?;
        self.window = Some(window.clone());

        let PhysicalSize { width, height } = window.inner_size();
        let renderer = pollster::block_on(WgpuRenderer::new(window.clone(), width, height))?;

        let config = ScreenConfig::default()
            .with_size(logical_width(&window), logical_height(&window))
            .with_pixel_density(window.scale_factor())
            .with_stats(self.stats);

        let mut screen = self.showcase.build(config, Box::new(renderer));
        pollster::block_on(screen.start())?;
        self.screen = Some(screen);
        Ok(())
    }
}

fn logical_width(window: &Arc<Window>) -> Dimension {
    let window = window.clone();
    Dimension::dynamic(move || logical_size(&window).width)
}

fn logical_height(window: &Arc<Window>) -> Dimension {
    let window = window.clone();
    Dimension::dynamic(move || logical_size(&window).height)
}

fn logical_size(window: &Window) -> LogicalSize<f64> {
    window.inner_size().to_logical(window.scale_factor())
}

/// Grab and hide the cursor while the screen asks for pointer lock.
fn sync_pointer_lock(window: &Window, locked: bool, grabbed: &mut bool) {
    if locked == *grabbed {
        return;
    }

    let result = if locked {
        window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
    } else {
        window.set_cursor_grab(CursorGrabMode::None)
    };

    match result {
        Ok(()) => {
            window.set_cursor_visible(!locked);
            *grabbed = locked;
            let state = if locked { "acquired" } else { "released" };
            log::debug!("pointer lock {}", state);
        }
        Err(err) => log::warn!("could not change pointer lock: {}", err),
    }
}

impl ApplicationHandler for ShowcaseApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.launch(event_loop) {
            log::error!("showcase '{}' failed to start: {}", self.showcase.name, err);
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let (Some(screen), Some(window)) = (self.screen.as_mut(), self.window.as_ref()) else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                screen.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(_) => {
                screen.notify_resize();
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                screen.set_pixel_density(scale_factor);
                screen.notify_resize();
            }
            WindowEvent::RedrawRequested => {
                screen.frame();
            }
            other => {
                if let Some(event) = input::from_window_event(&other) {
                    screen.handle_input(&event);
                    sync_pointer_lock(window, screen.pointer_locked(), &mut self.pointer_grabbed);
                }
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let Some(screen) = self.screen.as_mut() else {
            return;
        };

        if let Some(event) = input::from_device_event(&event) {
            screen.handle_input(&event);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
