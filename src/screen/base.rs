use std::time::Duration;

use super::clock::FrameClock;
use super::config::ScreenConfig;
use super::registry::{CallbackId, CallbackRegistry};
use super::render_loop::{Frame, RenderLoop, Resize, ResizeFn, UpdateFn};
use super::viewport::Viewport;
use crate::error::ScreenError;
use crate::gfx::{camera::PerspectiveCamera, rendering::Renderer, scene::Scene};
use crate::stats::FrameStats;

/// State every screen owns: viewport, clock, the two callback registries,
/// the render loop and the renderer.
pub struct ScreenCore {
    viewport: Viewport,
    clock: FrameClock,
    updates: CallbackRegistry<UpdateFn>,
    resizes: CallbackRegistry<ResizeFn>,
    render_loop: RenderLoop,
    renderer: Box<dyn Renderer>,
    surface_label: String,
    prepared: bool,
}

impl ScreenCore {
    /// Size the renderer to the viewport and, for a responsive viewport,
    /// keep it sized on every detected resize.
    pub fn new(config: ScreenConfig, renderer: Box<dyn Renderer>) -> Self {
        let ScreenConfig {
            width,
            height,
            pixel_density,
            surface_label,
            stats,
        } = config;

        let mut core = Self {
            viewport: Viewport::new(width, height, pixel_density),
            clock: FrameClock::new(),
            updates: CallbackRegistry::new(),
            resizes: CallbackRegistry::new(),
            render_loop: RenderLoop::new(),
            renderer,
            surface_label,
            prepared: false,
        };

        let (width, height) = core.viewport.size();
        core.renderer.set_size(width, height);
        core.renderer.set_pixel_ratio(core.viewport.pixel_density());

        if core.viewport.is_responsive() {
            core.add_resize_event(|resize| {
                resize.renderer.set_size(resize.width, resize.height);
                resize.renderer.set_pixel_ratio(resize.pixel_ratio);
            });
        }

        if stats {
            let mut stats = FrameStats::new();
            core.add_update_event(move |frame| {
                if let Some(metrics) = stats.sample(frame.delta) {
                    log::info!(
                        "{:.1} fps ({:.2} ms avg, {:.2} min, {:.2} max)",
                        metrics.fps,
                        metrics.frame_time_ms,
                        metrics.min_frame_time_ms,
                        metrics.max_frame_time_ms
                    );
                }
            });
        }

        log::debug!(
            "screen core '{}' created at {}x{} (responsive: {})",
            core.surface_label,
            width,
            height,
            core.viewport.is_responsive()
        );
        core
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn renderer(&self) -> &dyn Renderer {
        &*self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut dyn Renderer {
        &mut *self.renderer
    }

    pub fn render_loop(&self) -> &RenderLoop {
        &self.render_loop
    }

    pub fn surface_label(&self) -> &str {
        &self.surface_label
    }

    pub fn updates(&self) -> &CallbackRegistry<UpdateFn> {
        &self.updates
    }

    pub fn resizes(&self) -> &CallbackRegistry<ResizeFn> {
        &self.resizes
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub(crate) fn mark_prepared(&mut self) {
        self.prepared = true;
    }

    pub fn add_update_event(
        &mut self,
        callback: impl FnMut(&mut Frame<'_>) + 'static,
    ) -> CallbackId {
        self.updates.add(Box::new(callback))
    }

    pub fn remove_update_event(&mut self, id: CallbackId) -> bool {
        self.updates.remove(id)
    }

    pub fn add_resize_event(
        &mut self,
        callback: impl FnMut(&mut Resize<'_>) + 'static,
    ) -> CallbackId {
        self.resizes.add(Box::new(callback))
    }

    pub fn remove_resize_event(&mut self, id: CallbackId) -> bool {
        self.resizes.remove(id)
    }

    pub fn start(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), ScreenError> {
        self.render_loop.start(scene, camera)
    }

    pub fn stop(&mut self) {
        self.render_loop.stop();
    }

    /// One render-loop tick at `now`, measured from the clock origin.
    pub fn tick(
        &mut self,
        now: Duration,
        scene: &mut Scene,
        camera: &mut PerspectiveCamera,
    ) -> bool {
        self.render_loop.tick(
            now,
            &mut self.clock,
            &mut self.updates,
            &mut *self.renderer,
            scene,
            camera,
        )
    }

    /// Handle a platform resize signal.
    ///
    /// Fires the resize callbacks in registration order when the viewport
    /// reports a new size. Returns whether they fired.
    pub fn notify_resize(&mut self, mut camera: Option<&mut PerspectiveCamera>) -> bool {
        let Some((width, height)) = self.viewport.detect_resize() else {
            return false;
        };

        let pixel_ratio = self.viewport.pixel_density();
        let renderer = &mut *self.renderer;
        self.resizes.for_each(|callback, _| {
            callback(&mut Resize {
                width,
                height,
                pixel_ratio,
                renderer: &mut *renderer,
                camera: camera.as_deref_mut(),
            })
        });
        true
    }

    /// Record a new device scale factor and pass it to the renderer.
    pub fn set_pixel_density(&mut self, density: f64) {
        self.viewport.set_pixel_density(density);
        if self.viewport.is_responsive() {
            self.renderer.set_pixel_ratio(self.viewport.pixel_density());
        }
    }
}

impl std::fmt::Debug for ScreenCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenCore")
            .field("surface_label", &self.surface_label)
            .field("viewport", &self.viewport)
            .field("render_loop", &self.render_loop)
            .field("updates", &self.updates.len())
            .field("resizes", &self.resizes.len())
            .field("prepared", &self.prepared)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::gfx::rendering::HeadlessRenderer;
    use crate::screen::viewport::Dimension;

    /// Records the order of sizing calls.
    #[derive(Default)]
    struct CallLog {
        calls: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Renderer for CallLog {
        fn set_size(&mut self, _width: u32, _height: u32) {
            self.calls.borrow_mut().push("size");
        }

        fn set_pixel_ratio(&mut self, _ratio: f64) {
            self.calls.borrow_mut().push("ratio");
        }

        fn render(&mut self, _scene: &Scene, _camera: &PerspectiveCamera) {}

        fn size(&self) -> (u32, u32) {
            (0, 0)
        }

        fn pixel_ratio(&self) -> f64 {
            1.0
        }
    }

    fn responsive(width: Rc<Cell<f64>>) -> ScreenConfig {
        ScreenConfig::default().with_size(
            Dimension::dynamic(move || width.get()),
            Dimension::Fixed(600),
        )
    }

    #[test]
    fn renderer_is_sized_at_construction() {
        let recorder = HeadlessRenderer::new();
        let config = ScreenConfig::default()
            .with_size(Dimension::Fixed(640), Dimension::Fixed(480))
            .with_pixel_density(2.0);
        ScreenCore::new(config, Box::new(recorder.clone()));

        assert_eq!(recorder.size_history(), vec![(640, 480)]);
        assert_eq!(recorder.ratio_history(), vec![2.0]);
    }

    #[test]
    fn size_is_applied_before_pixel_ratio() {
        let renderer = CallLog::default();
        let calls = renderer.calls.clone();
        let width = Rc::new(Cell::new(800.0));
        let mut core = ScreenCore::new(responsive(width.clone()), Box::new(renderer));
        assert_eq!(*calls.borrow(), ["size", "ratio"]);

        width.set(900.0);
        assert!(core.notify_resize(None));
        assert_eq!(*calls.borrow(), ["size", "ratio", "size", "ratio"]);
    }

    #[test]
    fn fixed_viewport_never_fires_resize_callbacks() {
        let fired = Rc::new(Cell::new(0));
        let mut core = ScreenCore::new(ScreenConfig::default(), Box::new(HeadlessRenderer::new()));
        let count = fired.clone();
        core.add_resize_event(move |_| count.set(count.get() + 1));

        assert!(core.resizes().len() == 1);
        assert!(!core.notify_resize(None));
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn responsive_viewport_fires_once_per_distinct_size() {
        let width = Rc::new(Cell::new(800.0));
        let recorder = HeadlessRenderer::new();
        let mut core = ScreenCore::new(responsive(width.clone()), Box::new(recorder.clone()));
        // Surface resize callback registered by the core itself
        assert_eq!(core.resizes().len(), 1);

        let fired = Rc::new(Cell::new(0));
        let count = fired.clone();
        core.add_resize_event(move |_| count.set(count.get() + 1));

        assert!(!core.notify_resize(None));
        width.set(1024.0);
        assert!(core.notify_resize(None));
        assert!(!core.notify_resize(None));

        assert_eq!(fired.get(), 1);
        assert_eq!(recorder.size_history(), vec![(800, 600), (1024, 600)]);
    }

    #[test]
    fn resize_callbacks_reach_the_camera() {
        let width = Rc::new(Cell::new(800.0));
        let renderer = Box::new(HeadlessRenderer::new());
        let mut core = ScreenCore::new(responsive(width.clone()), renderer);
        core.add_resize_event(|resize| {
            if let (Some(aspect), Some(camera)) = (resize.aspect(), resize.camera.as_deref_mut()) {
                camera.set_aspect(aspect);
            }
        });

        let mut camera = PerspectiveCamera::default();
        width.set(1200.0);
        core.notify_resize(Some(&mut camera));
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn stats_register_an_update_callback() {
        let core = ScreenCore::new(
            ScreenConfig::default().with_stats(true),
            Box::new(HeadlessRenderer::new()),
        );
        assert_eq!(core.updates().len(), 1);
    }

    #[test]
    fn removing_unknown_ids_is_a_no_op() {
        let mut core = ScreenCore::new(ScreenConfig::default(), Box::new(HeadlessRenderer::new()));
        let id = core.add_update_event(|_| {});
        assert!(core.remove_update_event(id));
        assert!(!core.remove_update_event(id));
        assert!(!core.remove_resize_event(id));
    }
}
