use futures::future::{FutureExt, LocalBoxFuture};

use crate::error::ScreenError;
use crate::gfx::geometry::colored_cube;
use crate::gfx::rendering::Renderer;
use crate::gfx::scene::{Node, NodeId};
use crate::screen::{OrbitScreen, OrbitScreenConfig, PerspectiveConfig, Screen, ScreenConfig};

/// Angular speed of the cube around x, y and z, radians per second.
const SPIN: [f32; 3] = [0.5, 1.0, 0.25];

/// A six-colour cube spinning in front of an orbit camera.
#[derive(Debug)]
pub struct RotatingBox {
    screen: OrbitScreen,
    cube: Option<NodeId>,
}

impl RotatingBox {
    pub const NAME: &'static str = "rotating-box";

    /// Showcase camera defaults layered over the host's screen options.
    pub fn config(screen: ScreenConfig) -> OrbitScreenConfig {
        OrbitScreenConfig::default().with_perspective(
            PerspectiveConfig::default()
                .with_screen(screen)
                .with_fov(50.0)
                .with_position([2.0, 1.5, -3.0]),
        )
    }

    pub fn new(screen: ScreenConfig, renderer: Box<dyn Renderer>) -> Self {
        Self {
            screen: OrbitScreen::new(Self::config(screen), renderer),
            cube: None,
        }
    }

    pub fn cube(&self) -> Option<NodeId> {
        self.cube
    }
}

impl Screen for RotatingBox {
    crate::delegate_screen!(screen, input);

    fn prepare(&mut self) -> LocalBoxFuture<'_, Result<(), ScreenError>> {
        async move {
            let cube = Node::new("cube", colored_cube(1.0));
            let id = self.screen.scene_mut().add(cube);
            self.cube = Some(id);

            self.add_update_event(move |frame| {
                if let Some(node) = frame.scene.get_mut(id) {
                    let d = frame.delta;
                    node.transform.rotate(SPIN[0] * d, SPIN[1] * d, SPIN[2] * d);
                }
            });
            Ok(())
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::gfx::rendering::HeadlessRenderer;

    #[test]
    fn cube_spins_by_elapsed_time() {
        let renderer = HeadlessRenderer::new();
        let mut showcase = RotatingBox::new(ScreenConfig::default(), Box::new(renderer.clone()));
        pollster::block_on(showcase.start()).unwrap();

        showcase.frame_at(Duration::ZERO);
        showcase.frame_at(Duration::from_millis(500));
        showcase.frame_at(Duration::from_secs(1));

        let id = showcase.cube().unwrap();
        let node = showcase.scene().unwrap().get(id).unwrap();
        let rotation = node.transform.rotation;
        assert!((rotation.y - 1.0).abs() < 1e-4);
        assert!((rotation.x - 0.5).abs() < 1e-4);
        assert_eq!(renderer.last_frame().unwrap().visible_nodes, 1);
    }

    #[test]
    fn restart_does_not_rebuild_the_scene() {
        let renderer = Box::new(HeadlessRenderer::new());
        let mut showcase = RotatingBox::new(ScreenConfig::default(), renderer);
        pollster::block_on(showcase.start()).unwrap();
        showcase.stop();
        pollster::block_on(showcase.start()).unwrap();

        assert_eq!(showcase.scene().unwrap().len(), 1);
        // Orbit controls plus the spin
        assert_eq!(showcase.core().updates().len(), 2);
    }
}
