use super::{config::PerspectiveConfig, Screen, ScreenCore, ScreenParts};
use crate::error::ScreenError;
use crate::gfx::{camera::PerspectiveCamera, rendering::Renderer, scene::Scene};

/// Screen with a scene root and a perspective camera sized to the viewport.
///
/// The camera aspect follows every detected resize. `prepare` is still left
/// to the showcase.
#[derive(Debug)]
pub struct PerspectiveScreen {
    core: ScreenCore,
    scene: Scene,
    camera: PerspectiveCamera,
}

impl PerspectiveScreen {
    pub fn new(mut config: PerspectiveConfig, renderer: Box<dyn Renderer>) -> Self {
        let mut core = ScreenCore::new(std::mem::take(&mut config.screen), renderer);
        // An unsized viewport keeps a square aspect until the first resize.
        let aspect = core.viewport().aspect().unwrap_or(1.0);
        let camera = config.camera(aspect);

        core.add_resize_event(|resize| {
            let (Some(aspect), Some(camera)) = (resize.aspect(), resize.camera.as_deref_mut())
            else {
                return;
            };
            camera.set_aspect(aspect);
            log::debug!("camera aspect now {:.3}", aspect);
        });

        Self {
            core,
            scene: Scene::new(),
            camera,
        }
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn camera_mut(&mut self) -> &mut PerspectiveCamera {
        &mut self.camera
    }

    pub fn parts(&mut self) -> ScreenParts<'_> {
        ScreenParts {
            core: &mut self.core,
            scene: &mut self.scene,
            camera: &mut self.camera,
        }
    }
}

impl Screen for PerspectiveScreen {
    fn core(&self) -> &ScreenCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ScreenCore {
        &mut self.core
    }

    fn scene(&self) -> Result<&Scene, ScreenError> {
        Ok(&self.scene)
    }

    fn camera(&self) -> Result<&PerspectiveCamera, ScreenError> {
        Ok(&self.camera)
    }

    fn split_mut(&mut self) -> Result<ScreenParts<'_>, ScreenError> {
        Ok(self.parts())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::gfx::rendering::HeadlessRenderer;
    use crate::screen::{Dimension, ScreenConfig};

    fn config(width: Dimension, height: Dimension) -> PerspectiveConfig {
        PerspectiveConfig::default()
            .with_screen(ScreenConfig::default().with_size(width, height))
    }

    #[test]
    fn camera_matches_initial_viewport() {
        let screen = PerspectiveScreen::new(
            config(Dimension::Fixed(1000), Dimension::Fixed(500))
                .with_fov(60.0),
            Box::new(HeadlessRenderer::new()),
        );

        let camera = screen.camera().unwrap();
        assert_eq!(camera.aspect, 2.0);
        assert_eq!(camera.fov.0, 60.0);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 100.0);
    }

    #[test]
    fn prepare_is_still_abstract() {
        let renderer = Box::new(HeadlessRenderer::new());
        let mut screen = PerspectiveScreen::new(PerspectiveConfig::default(), renderer);

        let result = pollster::block_on(screen.start());
        assert!(matches!(
            result,
            Err(ScreenError::NotImplemented("prepare"))
        ));
        assert!(!screen.is_running());
    }

    #[test]
    fn resize_recomputes_camera_projection() {
        let width = Rc::new(Cell::new(800.0));
        let source = width.clone();
        let width_source = Dimension::dynamic(move || source.get());
        let mut screen = PerspectiveScreen::new(
            config(width_source, Dimension::Fixed(400)),
            Box::new(HeadlessRenderer::new()),
        );
        let before = screen.camera().unwrap().projection_matrix();
        assert_eq!(screen.camera().unwrap().aspect, 2.0);

        width.set(1200.0);
        assert!(screen.notify_resize());

        let camera = screen.camera().unwrap();
        assert_eq!(camera.aspect, 3.0);
        assert_ne!(camera.projection_matrix(), before);
    }

    #[test]
    fn zero_height_skips_camera_update() {
        let height = Rc::new(Cell::new(320.0));
        let source = height.clone();
        let height_source = Dimension::dynamic(move || source.get());
        let mut screen = PerspectiveScreen::new(
            config(Dimension::Fixed(640), height_source),
            Box::new(HeadlessRenderer::new()),
        );
        assert_eq!(screen.camera().unwrap().aspect, 2.0);

        // The size changed, so callbacks fire, but the camera keeps its aspect
        height.set(0.0);
        assert!(screen.notify_resize());
        assert_eq!(screen.camera().unwrap().aspect, 2.0);

        height.set(160.0);
        assert!(screen.notify_resize());
        assert_eq!(screen.camera().unwrap().aspect, 4.0);
    }

    #[test]
    fn unsized_viewport_starts_square() {
        let screen = PerspectiveScreen::new(
            config(Dimension::Fixed(640), Dimension::Fixed(0)),
            Box::new(HeadlessRenderer::new()),
        );
        assert_eq!(screen.camera().unwrap().aspect, 1.0);
    }
}
