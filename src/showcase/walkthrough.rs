use std::cell::Ref;
use std::rc::Rc;

use cgmath::Vector3;
use futures::future::{FutureExt, LocalBoxFuture};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ScreenError;
use crate::gfx::camera::{CameraControls, FirstPersonConfig, FirstPersonControls};
use crate::gfx::geometry::plane;
use crate::gfx::rendering::Renderer;
use crate::gfx::scene::{Node, Transform};
use crate::input::{InputEvent, Key};
use crate::loader::AssetLoader;
use crate::screen::{
    ControlBinding, OrbitScreen, OrbitScreenConfig, PerspectiveConfig, Screen, ScreenConfig,
    ScreenParts,
};

const FLOOR_SIZE: f32 = 24.0;
const CRATES: usize = 24;
const PILLAR_CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
const CRATE_MODEL: &str = "models/crate.obj";
const PILLAR_MODEL: &str = "models/pillar.obj";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Orbit,
    FirstPerson,
}

/// A floor scattered with crates and ringed by pillars, both loaded as OBJ
/// models. Starts as an orbit view; Enter walks in with first-person
/// controls and Escape steps back out.
#[derive(Debug)]
pub struct Walkthrough {
    screen: OrbitScreen,
    first_person: ControlBinding<FirstPersonControls>,
    loader: AssetLoader,
    mode: ViewMode,
    seed: u64,
}

impl Walkthrough {
    pub const NAME: &'static str = "walkthrough";

    pub fn config(screen: ScreenConfig) -> OrbitScreenConfig {
        OrbitScreenConfig::default().with_perspective(
            PerspectiveConfig::default()
                .with_screen(screen)
                .with_fov(60.0)
                .with_clip(0.05, 200.0)
                .with_position([0.0, 12.0, -16.0]),
        )
    }

    pub fn new(screen: ScreenConfig, renderer: Box<dyn Renderer>) -> Self {
        let screen = OrbitScreen::new(Self::config(screen), renderer);
        let camera = screen.camera().map(|camera| *camera).unwrap_or_default();
        let first_person = FirstPersonControls::new(FirstPersonConfig::default(), &camera);

        Self {
            screen,
            first_person: ControlBinding::new(first_person),
            loader: AssetLoader::default(),
            mode: ViewMode::Orbit,
            seed: rand::rng().random(),
        }
    }

    /// Load models through `loader` instead of the bundled asset directory.
    pub fn with_loader(mut self, loader: AssetLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Fix the crate layout, for reproducible scenes.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Swap orbit controls for first-person controls and lock the pointer.
    pub fn enter_first_person(&mut self) {
        if self.mode == ViewMode::FirstPerson {
            return;
        }
        self.screen.disable_orbit_controls();

        let ScreenParts { core, camera, .. } = self.screen.perspective_mut().parts();
        // Walk at eye height from wherever the orbit view left the camera.
        camera.position.y = 1.7;
        self.first_person.enable(core, camera);
        self.first_person.controls_mut().lock();

        log::info!("walkthrough: first-person view");
        self.mode = ViewMode::FirstPerson;
    }

    pub fn leave_first_person(&mut self) {
        if self.mode == ViewMode::Orbit {
            return;
        }
        self.first_person.controls_mut().unlock();
        self.first_person.disable(self.screen.core_mut());
        self.screen.enable_orbit_controls();

        log::info!("walkthrough: orbit view");
        self.mode = ViewMode::Orbit;
    }
}

impl Screen for Walkthrough {
    crate::delegate_screen!(screen);

    fn prepare(&mut self) -> LocalBoxFuture<'_, Result<(), ScreenError>> {
        async move {
            let models = self
                .loader
                .load_many_models(&[CRATE_MODEL, PILLAR_MODEL])
                .await?;
            let (crate_model, pillar_model) = (&models[0], &models[1]);

            let mut rng = StdRng::seed_from_u64(self.seed);
            let scene = self.screen.scene_mut();
            scene.background = [0.55, 0.7, 0.85, 1.0];

            let floor = plane(FLOOR_SIZE, FLOOR_SIZE, 8, 8);
            scene.add(Node::new("floor", floor).with_color([0.45, 0.45, 0.4, 1.0]));

            let corner = FLOOR_SIZE / 2.0 - 0.5;
            for (i, (x, z)) in PILLAR_CORNERS.into_iter().enumerate() {
                let mut transform = Transform::from_position(x * corner, 2.0, z * corner);
                transform.scale = Vector3::new(0.6, 4.0, 0.6);
                scene.add(
                    Node::new(format!("pillar-{i}"), Rc::clone(pillar_model))
                        .with_transform(transform)
                        .with_color([0.8, 0.78, 0.72, 1.0]),
                );
            }

            let half = FLOOR_SIZE / 2.0 - 1.0;
            for i in 0..CRATES {
                let (w, h, d) = (
                    rng.random_range(0.5..2.0),
                    rng.random_range(0.5..3.0),
                    rng.random_range(0.5..2.0),
                );
                let mut transform = Transform::from_position(
                    rng.random_range(-half..half),
                    h / 2.0,
                    rng.random_range(-half..half),
                )
                .with_rotation(0.0, rng.random_range(0.0..std::f32::consts::TAU), 0.0);
                transform.scale = Vector3::new(w, h, d);
                let color = [rng.random(), rng.random(), rng.random(), 1.0];

                scene.add(
                    Node::new(format!("crate-{i}"), Rc::clone(crate_model))
                        .with_transform(transform)
                        .with_color(color),
                );
            }

            log::debug!(
                "walkthrough: {} crates and {} pillars (seed {})",
                CRATES,
                PILLAR_CORNERS.len(),
                self.seed
            );
            Ok(())
        }
        .boxed_local()
    }

    fn handle_input(&mut self, event: &InputEvent) -> bool {
        match (self.mode, event) {
            (ViewMode::Orbit, InputEvent::KeyDown(Key::Enter)) => {
                self.enter_first_person();
                true
            }
            (ViewMode::FirstPerson, InputEvent::KeyDown(Key::Escape)) => {
                self.leave_first_person();
                true
            }
            (ViewMode::Orbit, _) => self.screen.handle_input(event),
            (ViewMode::FirstPerson, _) => self.first_person.handle_input(event),
        }
    }

    fn pointer_locked(&self) -> bool {
        self.mode == ViewMode::FirstPerson
            && self.first_person.is_enabled()
            && self.first_person.controls().is_locked()
    }

    fn controls(&self) -> Option<Ref<'_, dyn CameraControls>> {
        match self.mode {
            ViewMode::Orbit => self.screen.controls(),
            ViewMode::FirstPerson => self
                .first_person
                .is_enabled()
                .then(|| self.first_person.dyn_controls()),
        }
    }
}
