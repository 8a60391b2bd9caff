use std::time::Duration;

use super::clock::FrameClock;
use super::registry::{CallbackId, CallbackRegistry};
use crate::error::ScreenError;
use crate::gfx::{camera::PerspectiveCamera, rendering::Renderer, scene::Scene};

/// Per-frame callback.
pub type UpdateFn = dyn FnMut(&mut Frame<'_>);

/// Callback fired when the viewport settles on a new size.
pub type ResizeFn = dyn FnMut(&mut Resize<'_>);

/// What an update callback sees during one tick.
pub struct Frame<'a> {
    /// Seconds since the previous tick
    pub delta: f32,
    /// Seconds accumulated since the first tick
    pub elapsed: f32,
    pub scene: &'a mut Scene,
    pub camera: &'a mut PerspectiveCamera,
    pub updates: &'a mut CallbackRegistry<UpdateFn>,
}

impl Frame<'_> {
    /// Register another update callback; it first fires on the next tick.
    pub fn add_update_event(
        &mut self,
        callback: impl FnMut(&mut Frame<'_>) + 'static,
    ) -> CallbackId {
        self.updates.add(Box::new(callback))
    }

    pub fn remove_update_event(&mut self, id: CallbackId) -> bool {
        self.updates.remove(id)
    }
}

/// What a resize callback sees.
pub struct Resize<'a> {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f64,
    pub renderer: &'a mut dyn Renderer,
    /// Present when the screen owns a camera
    pub camera: Option<&'a mut PerspectiveCamera>,
}

impl Resize<'_> {
    /// Width over height, `None` while the height is 0.
    pub fn aspect(&self) -> Option<f32> {
        let (width, height) = (self.width as f32, self.height as f32);
        (self.height > 0).then(|| width / height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

/// Two-state driver for one screen: each tick advances the clock, fires the
/// update callbacks in order and renders once.
#[derive(Debug)]
pub struct RenderLoop {
    state: LoopState,
    // Set on Stopped -> Running so the first tick restarts the delta at 0.
    resumed: bool,
    frames: u64,
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Stopped,
            resumed: false,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Frames rendered since construction.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Enter `Running`. Calling it while running keeps the single driver.
    pub fn start(&mut self, _scene: &Scene, camera: &PerspectiveCamera) -> Result<(), ScreenError> {
        camera.validate()?;

        if self.state == LoopState::Stopped {
            log::info!("render loop started");
            self.state = LoopState::Running;
            self.resumed = true;
        }
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            log::info!("render loop stopped after {} frames", self.frames);
            self.state = LoopState::Stopped;
        }
    }

    /// Run one frame at `now`. Returns false, doing nothing, while stopped.
    pub fn tick(
        &mut self,
        now: Duration,
        clock: &mut FrameClock,
        updates: &mut CallbackRegistry<UpdateFn>,
        renderer: &mut dyn Renderer,
        scene: &mut Scene,
        camera: &mut PerspectiveCamera,
    ) -> bool {
        if self.state != LoopState::Running {
            return false;
        }

        if std::mem::take(&mut self.resumed) {
            clock.suspend();
        }
        clock.advance_to(now);

        let (delta, elapsed) = (clock.delta(), clock.elapsed());
        updates.for_each(|callback, updates| {
            callback(&mut Frame {
                delta,
                elapsed,
                scene: &mut *scene,
                camera: &mut *camera,
                updates,
            })
        });

        renderer.render(scene, camera);
        self.frames += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::gfx::rendering::HeadlessRenderer;

    struct Rig {
        render_loop: RenderLoop,
        clock: FrameClock,
        updates: CallbackRegistry<UpdateFn>,
        renderer: HeadlessRenderer,
        scene: Scene,
        camera: PerspectiveCamera,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                render_loop: RenderLoop::new(),
                clock: FrameClock::new(),
                updates: CallbackRegistry::new(),
                renderer: HeadlessRenderer::new(),
                scene: Scene::new(),
                camera: PerspectiveCamera::default(),
            }
        }

        fn start(&mut self) -> Result<(), ScreenError> {
            self.render_loop.start(&self.scene, &self.camera)
        }

        fn tick(&mut self, ms: u64) -> bool {
            self.render_loop.tick(
                Duration::from_millis(ms),
                &mut self.clock,
                &mut self.updates,
                &mut self.renderer,
                &mut self.scene,
                &mut self.camera,
            )
        }
    }

    #[test]
    fn stopped_loop_does_not_tick() {
        let mut rig = Rig::new();
        assert_eq!(rig.render_loop.state(), LoopState::Stopped);
        assert!(!rig.tick(16));
        assert_eq!(rig.renderer.render_count(), 0);
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut rig = Rig::new();
        rig.start().unwrap();
        rig.start().unwrap();
        assert!(rig.render_loop.is_running());

        rig.tick(0);
        assert_eq!(rig.renderer.render_count(), 1);

        rig.render_loop.stop();
        rig.render_loop.stop();
        assert_eq!(rig.render_loop.state(), LoopState::Stopped);
    }

    #[test]
    fn invalid_camera_is_rejected() {
        let mut rig = Rig::new();
        rig.camera.far = rig.camera.near;
        assert!(matches!(rig.start(), Err(ScreenError::InvalidArgument(_))));
        assert_eq!(rig.render_loop.state(), LoopState::Stopped);
    }

    #[test]
    fn updates_run_before_render() {
        let mut rig = Rig::new();
        let recorder = rig.renderer.clone();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = seen.clone();
        rig.updates.add(Box::new(move |frame: &mut Frame<'_>| {
            log.borrow_mut().push(recorder.render_count());
            frame.camera.set_aspect(2.0);
        }));

        rig.start().unwrap();
        rig.tick(0);
        rig.tick(16);

        // Each callback ran before that tick's render
        assert_eq!(*seen.borrow(), vec![0, 1]);
        assert_eq!(rig.renderer.last_frame().unwrap().camera_aspect, 2.0);
    }

    #[test]
    fn restart_resets_delta_but_keeps_elapsed() {
        let mut rig = Rig::new();
        rig.start().unwrap();
        rig.tick(0);
        rig.tick(100);
        rig.render_loop.stop();

        rig.start().unwrap();
        rig.tick(5_000);
        assert_eq!(rig.clock.delta(), 0.0);
        assert!((rig.clock.elapsed() - 0.1).abs() < 1e-6);

        rig.tick(5_020);
        assert!((rig.clock.delta() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn resize_aspect_guards_zero_height() {
        let mut renderer = HeadlessRenderer::new();
        let resize = Resize {
            width: 100,
            height: 0,
            pixel_ratio: 1.0,
            renderer: &mut renderer,
            camera: None,
        };
        assert_eq!(resize.aspect(), None);
    }
}
