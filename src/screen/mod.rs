//! # Screen lifecycle
//!
//! A screen owns the drawable surface, a scene and camera, and the frame
//! lifecycle that showcases build on:
//!
//! - [`Viewport`] resolves the surface size (fixed or computed on demand)
//! - [`FrameClock`] tracks delta and elapsed time
//! - two [`CallbackRegistry`]s hold per-frame update and resize callbacks
//! - [`RenderLoop`] advances the clock, fires updates in order, then renders once
//!
//! [`Screen`] is the extension point. [`PerspectiveScreen`] supplies a scene
//! and camera; [`OrbitScreen`] and [`FirstPersonScreen`] add a camera
//! control scheme. A showcase wraps one of them and overrides
//! [`Screen::prepare`]:
//!
//! ```
//! use std::time::Duration;
//!
//! use cgmath::Deg;
//! use futures::future::{FutureExt, LocalBoxFuture};
//! use vitrine::error::ScreenError;
//! use vitrine::gfx::HeadlessRenderer;
//! use vitrine::screen::{OrbitScreen, OrbitScreenConfig, Screen};
//!
//! struct Spinner {
//!     screen: OrbitScreen,
//! }
//!
//! impl Screen for Spinner {
//!     vitrine::delegate_screen!(screen, input);
//!
//!     fn prepare(&mut self) -> LocalBoxFuture<'_, Result<(), ScreenError>> {
//!         async move {
//!             self.add_update_event(|frame| {
//!                 let fov = frame.camera.fov + Deg(10.0 * frame.delta);
//!                 frame.camera.set_fov(fov);
//!             });
//!             Ok(())
//!         }
//!         .boxed_local()
//!     }
//! }
//!
//! let renderer = Box::new(HeadlessRenderer::new());
//! let screen = OrbitScreen::new(OrbitScreenConfig::default(), renderer);
//! let mut spinner = Spinner { screen };
//! pollster::block_on(spinner.start()).unwrap();
//!
//! let before = spinner.camera().unwrap().projection_matrix();
//! assert!(spinner.frame_at(Duration::ZERO));
//! assert!(spinner.frame_at(Duration::from_millis(500)));
//! assert_eq!(spinner.camera().unwrap().fov, Deg(50.0));
//! assert_ne!(spinner.camera().unwrap().projection_matrix(), before);
//! ```

use std::cell::Ref;
use std::time::Duration;

use futures::future::{FutureExt, LocalBoxFuture};

pub mod base;
pub mod clock;
pub mod config;
pub mod controls;
pub mod perspective;
pub mod registry;
pub mod render_loop;
pub mod viewport;

pub use base::ScreenCore;
pub use clock::FrameClock;
pub use config::{
    FirstPersonConfig, FirstPersonScreenConfig, OrbitConfig, OrbitScreenConfig,
    PerspectiveConfig, ScreenConfig,
};
pub use controls::{ControlBinding, FirstPersonScreen, OrbitScreen};
pub use perspective::PerspectiveScreen;
pub use registry::{CallbackId, CallbackRegistry};
pub use render_loop::{Frame, LoopState, RenderLoop, Resize, ResizeFn, UpdateFn};
pub use viewport::{Dimension, Viewport};

use crate::error::ScreenError;
use crate::gfx::camera::{CameraControls, PerspectiveCamera};
use crate::gfx::{rendering::Renderer, scene::Scene};
use crate::input::InputEvent;

/// Simultaneous mutable access to the pieces a tick needs.
pub struct ScreenParts<'a> {
    pub core: &'a mut ScreenCore,
    pub scene: &'a mut Scene,
    pub camera: &'a mut PerspectiveCamera,
}

/// Lifecycle contract shared by every screen.
///
/// Implementors provide [`core`](Screen::core) and
/// [`core_mut`](Screen::core_mut). The scene and camera accessors and
/// [`prepare`](Screen::prepare) fail with [`ScreenError::NotImplemented`]
/// until a subtype overrides them.
pub trait Screen {
    fn core(&self) -> &ScreenCore;

    fn core_mut(&mut self) -> &mut ScreenCore;

    fn scene(&self) -> Result<&Scene, ScreenError> {
        Err(ScreenError::NotImplemented("scene"))
    }

    fn camera(&self) -> Result<&PerspectiveCamera, ScreenError> {
        Err(ScreenError::NotImplemented("camera"))
    }

    fn split_mut(&mut self) -> Result<ScreenParts<'_>, ScreenError> {
        Err(ScreenError::NotImplemented("split_mut"))
    }

    /// One-time asynchronous setup: load assets, build the scene, register
    /// update callbacks. [`start`](Screen::start) runs it at most once.
    fn prepare(&mut self) -> LocalBoxFuture<'_, Result<(), ScreenError>> {
        async { Err(ScreenError::NotImplemented("prepare")) }.boxed_local()
    }

    /// Offer an input event to the screen. Returns whether it was consumed.
    fn handle_input(&mut self, _event: &InputEvent) -> bool {
        false
    }

    /// Whether the host should capture and hide the pointer.
    fn pointer_locked(&self) -> bool {
        false
    }

    /// The camera controls currently driving the screen, if any.
    fn controls(&self) -> Option<Ref<'_, dyn CameraControls>> {
        None
    }

    /// Validate scene and camera, run [`prepare`](Screen::prepare) unless it
    /// already succeeded, then start the render loop.
    ///
    /// A failed `prepare` leaves the loop stopped and may be retried by
    /// calling `start` again.
    fn start(&mut self) -> LocalBoxFuture<'_, Result<(), ScreenError>> {
        async move {
            self.scene()?;
            self.camera()?.validate()?;

            if !self.core().is_prepared() {
                log::debug!("preparing screen '{}'", self.core().surface_label());
                self.prepare().await?;
                self.core_mut().mark_prepared();
                log::debug!("screen '{}' prepared", self.core().surface_label());
            }

            let ScreenParts {
                core,
                scene,
                camera,
            } = self.split_mut()?;
            core.start(scene, camera)
        }
        .boxed_local()
    }

    fn stop(&mut self) {
        self.core_mut().stop();
    }

    /// Run one frame at the current wall-clock time.
    fn frame(&mut self) -> bool {
        let now = self.core().clock().now();
        self.frame_at(now)
    }

    /// Run one frame at `now`, measured from the clock origin.
    fn frame_at(&mut self, now: Duration) -> bool {
        match self.split_mut() {
            Ok(ScreenParts {
                core,
                scene,
                camera,
            }) => core.tick(now, scene, camera),
            Err(_) => false,
        }
    }

    /// Forward a platform resize signal to the viewport.
    fn notify_resize(&mut self) -> bool {
        match self.split_mut() {
            Ok(ScreenParts { core, camera, .. }) => core.notify_resize(Some(camera)),
            Err(_) => self.core_mut().notify_resize(None),
        }
    }

    fn set_pixel_density(&mut self, density: f64) {
        self.core_mut().set_pixel_density(density);
    }

    fn add_update_event<F>(&mut self, callback: F) -> CallbackId
    where
        F: FnMut(&mut Frame<'_>) + 'static,
        Self: Sized,
    {
        self.core_mut().add_update_event(callback)
    }

    fn remove_update_event(&mut self, id: CallbackId) -> bool {
        self.core_mut().remove_update_event(id)
    }

    fn add_resize_event<F>(&mut self, callback: F) -> CallbackId
    where
        F: FnMut(&mut Resize<'_>) + 'static,
        Self: Sized,
    {
        self.core_mut().add_resize_event(callback)
    }

    fn remove_resize_event(&mut self, id: CallbackId) -> bool {
        self.core_mut().remove_resize_event(id)
    }

    fn is_running(&self) -> bool {
        self.core().render_loop().is_running()
    }

    fn delta(&self) -> f32 {
        self.core().clock().delta()
    }

    fn elapsed(&self) -> f32 {
        self.core().clock().elapsed()
    }

    fn width(&self) -> u32 {
        self.core().viewport().width()
    }

    fn height(&self) -> u32 {
        self.core().viewport().height()
    }

    fn aspect(&self) -> Option<f32> {
        self.core().viewport().aspect()
    }

    fn viewport(&self) -> &Viewport {
        self.core().viewport()
    }

    /// Name of the drawable surface the renderer targets.
    fn surface_label(&self) -> &str {
        self.core().surface_label()
    }

    fn renderer(&self) -> &dyn Renderer {
        self.core().renderer()
    }

    fn renderer_mut(&mut self) -> &mut dyn Renderer {
        self.core_mut().renderer_mut()
    }
}

/// Implement the structural [`Screen`] methods by forwarding to a field.
///
/// `delegate_screen!(field)` forwards the core, scene and camera accessors;
/// `delegate_screen!(field, input)` also forwards input handling, the
/// pointer-lock query and the active controls. `prepare` is left to the implementor.
#[macro_export]
macro_rules! delegate_screen {
    ($field:ident) => {
        fn core(&self) -> &$crate::screen::ScreenCore {
            $crate::screen::Screen::core(&self.$field)
        }

        fn core_mut(&mut self) -> &mut $crate::screen::ScreenCore {
            $crate::screen::Screen::core_mut(&mut self.$field)
        }

        fn scene(
            &self,
        ) -> ::std::result::Result<&$crate::gfx::scene::Scene, $crate::error::ScreenError>
        {
            $crate::screen::Screen::scene(&self.$field)
        }

        fn camera(
            &self,
        ) -> ::std::result::Result<
            &$crate::gfx::camera::PerspectiveCamera,
            $crate::error::ScreenError,
        > {
            $crate::screen::Screen::camera(&self.$field)
        }

        fn split_mut(
            &mut self,
        ) -> ::std::result::Result<$crate::screen::ScreenParts<'_>, $crate::error::ScreenError>
        {
            $crate::screen::Screen::split_mut(&mut self.$field)
        }
    };
    ($field:ident, input) => {
        $crate::delegate_screen!($field);

        fn handle_input(&mut self, event: &$crate::input::InputEvent) -> bool {
            $crate::screen::Screen::handle_input(&mut self.$field, event)
        }

        fn pointer_locked(&self) -> bool {
            $crate::screen::Screen::pointer_locked(&self.$field)
        }

        fn controls(
            &self,
        ) -> ::std::option::Option<
            ::std::cell::Ref<'_, dyn $crate::gfx::camera::CameraControls>,
        > {
            $crate::screen::Screen::controls(&self.$field)
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::rendering::HeadlessRenderer;

    /// Screen that provides nothing but its core.
    struct Bare {
        core: ScreenCore,
    }

    impl Screen for Bare {
        fn core(&self) -> &ScreenCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut ScreenCore {
            &mut self.core
        }
    }

    fn bare() -> Bare {
        Bare {
            core: ScreenCore::new(ScreenConfig::default(), Box::new(HeadlessRenderer::new())),
        }
    }

    #[test]
    fn base_screen_reports_missing_overrides() {
        let mut screen = bare();
        assert!(matches!(
            screen.scene(),
            Err(ScreenError::NotImplemented("scene"))
        ));
        assert!(matches!(
            screen.camera(),
            Err(ScreenError::NotImplemented("camera"))
        ));
        assert!(matches!(
            pollster::block_on(screen.prepare()),
            Err(ScreenError::NotImplemented("prepare"))
        ));
    }

    #[test]
    fn start_fails_without_scene() {
        let mut screen = bare();
        let result = pollster::block_on(screen.start());

        assert!(matches!(result, Err(ScreenError::NotImplemented("scene"))));
        assert!(!screen.is_running());
        assert!(!screen.core().is_prepared());
    }

    #[test]
    fn bare_screen_never_ticks() {
        let mut screen = bare();
        assert!(!screen.frame_at(Duration::from_millis(16)));
        assert!(!screen.notify_resize());
    }

    #[test]
    fn accessors_read_the_viewport() {
        let screen = bare();
        assert_eq!((screen.width(), screen.height()), (1280, 720));
        assert_eq!(screen.aspect(), Some(1280.0 / 720.0));
        assert_eq!(screen.renderer().size(), (1280, 720));
    }

    #[test]
    fn surface_and_controls_accessors() {
        let mut screen = bare();
        assert_eq!(screen.surface_label(), "vitrine-surface");
        assert!(screen.controls().is_none());

        screen.renderer_mut().set_pixel_ratio(2.0);
        assert_eq!(screen.renderer().pixel_ratio(), 2.0);
    }
}
