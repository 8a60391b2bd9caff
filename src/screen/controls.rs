//! Camera-control composition on top of [`PerspectiveScreen`].

use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use super::config::{FirstPersonScreenConfig, OrbitScreenConfig};
use super::{CallbackId, PerspectiveScreen, Screen, ScreenCore, ScreenParts};
use crate::gfx::camera::{
    CameraControls, FirstPersonControls, OrbitControls, PerspectiveCamera,
};
use crate::gfx::{rendering::Renderer, scene::Scene};
use crate::input::{InputEvent, Key, PointerButton};

/// A control scheme plus its registration in a screen's update registry.
///
/// While enabled, exactly one update callback drives the controls each frame.
/// `enable` and `disable` are idempotent. The binding counts as enabled only
/// while its callback is still registered, however that callback was removed.
pub struct ControlBinding<C> {
    controls: Rc<RefCell<C>>,
    update_id: Option<CallbackId>,
    // Upgradable exactly as long as the registered callback exists.
    registration: Weak<()>,
}

impl<C: CameraControls + 'static> ControlBinding<C> {
    /// Wrap `controls`, initially disabled.
    pub fn new(controls: C) -> Self {
        Self {
            controls: Rc::new(RefCell::new(controls)),
            update_id: None,
            registration: Weak::new(),
        }
    }

    pub fn controls(&self) -> Ref<'_, C> {
        self.controls.borrow()
    }

    pub fn controls_mut(&self) -> RefMut<'_, C> {
        self.controls.borrow_mut()
    }

    /// The controls behind the trait, for screens that expose whichever
    /// scheme is active.
    pub fn dyn_controls(&self) -> Ref<'_, dyn CameraControls> {
        Ref::map(self.controls.borrow(), erase::<C>)
    }

    pub fn is_enabled(&self) -> bool {
        self.update_id.is_some() && self.registration.strong_count() > 0
    }

    /// Id of the live update callback, if any.
    pub fn update_id(&self) -> Option<CallbackId> {
        self.update_id.filter(|_| self.is_enabled())
    }

    /// Register the per-frame update, syncing the controls to the camera
    /// first. Does nothing if already enabled.
    pub fn enable(&mut self, core: &mut ScreenCore, camera: &PerspectiveCamera) -> CallbackId {
        if let Some(id) = self.update_id() {
            return id;
        }

        self.controls.borrow_mut().sync(camera);
        let controls = Rc::clone(&self.controls);
        let registration = Rc::new(());
        self.registration = Rc::downgrade(&registration);

        let id = core.add_update_event(move |frame| {
            let _registered = &registration;
            controls.borrow_mut().update(frame.delta, frame.camera);
        });
        let name = self.controls().name();
        log::debug!("{} controls enabled with update {}", name, id);
        self.update_id = Some(id);
        id
    }

    /// Remove the per-frame update. Safe to call when never enabled, and
    /// returns false when the update was already removed elsewhere.
    pub fn disable(&mut self, core: &mut ScreenCore) -> bool {
        let live = self.is_enabled();
        self.registration = Weak::new();
        let Some(id) = self.update_id.take() else {
            return false;
        };

        if !live {
            log::debug!("controls update {} was already removed", id);
            return false;
        }
        let name = self.controls().name();
        log::debug!("{} controls disabled, removing update {}", name, id);
        core.remove_update_event(id)
    }

    /// Forward input while enabled.
    pub fn handle_input(&self, event: &InputEvent) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.controls.borrow_mut().handle_input(event);
        true
    }
}

fn erase<C: CameraControls + 'static>(controls: &C) -> &(dyn CameraControls + 'static) {
    controls
}

impl<C> std::fmt::Debug for ControlBinding<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlBinding")
            .field("update_id", &self.update_id)
            .field("registered", &(self.registration.strong_count() > 0))
            .finish()
    }
}

/// Perspective screen driven by [`OrbitControls`], enabled at construction.
#[derive(Debug)]
pub struct OrbitScreen {
    perspective: PerspectiveScreen,
    orbit: ControlBinding<OrbitControls>,
}

impl OrbitScreen {
    pub fn new(config: OrbitScreenConfig, renderer: Box<dyn Renderer>) -> Self {
        let OrbitScreenConfig { perspective, orbit } = config;
        let mut perspective = PerspectiveScreen::new(perspective, renderer);

        let ScreenParts { core, camera, .. } = perspective.parts();
        let mut binding = ControlBinding::new(OrbitControls::new(orbit, camera));
        binding.enable(core, camera);

        Self {
            perspective,
            orbit: binding,
        }
    }

    pub fn enable_orbit_controls(&mut self) -> CallbackId {
        let ScreenParts { core, camera, .. } = self.perspective.parts();
        self.orbit.enable(core, camera)
    }

    pub fn disable_orbit_controls(&mut self) -> bool {
        self.orbit.disable(self.perspective.core_mut())
    }

    pub fn orbit(&self) -> &ControlBinding<OrbitControls> {
        &self.orbit
    }

    pub fn perspective(&self) -> &PerspectiveScreen {
        &self.perspective
    }

    pub fn perspective_mut(&mut self) -> &mut PerspectiveScreen {
        &mut self.perspective
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        self.perspective.scene_mut()
    }

    pub fn camera_mut(&mut self) -> &mut PerspectiveCamera {
        self.perspective.camera_mut()
    }
}

impl Screen for OrbitScreen {
    crate::delegate_screen!(perspective);

    fn handle_input(&mut self, event: &InputEvent) -> bool {
        self.orbit.handle_input(event)
    }

    fn controls(&self) -> Option<Ref<'_, dyn CameraControls>> {
        self.orbit.is_enabled().then(|| self.orbit.dyn_controls())
    }
}

/// Perspective screen driven by [`FirstPersonControls`].
///
/// A primary click locks the pointer and Escape releases it, mirroring
/// browser pointer-lock behaviour.
#[derive(Debug)]
pub struct FirstPersonScreen {
    perspective: PerspectiveScreen,
    first_person: ControlBinding<FirstPersonControls>,
}

impl FirstPersonScreen {
    pub fn new(config: FirstPersonScreenConfig, renderer: Box<dyn Renderer>) -> Self {
        let FirstPersonScreenConfig {
            perspective,
            first_person,
        } = config;
        let mut perspective = PerspectiveScreen::new(perspective, renderer);

        let ScreenParts { core, camera, .. } = perspective.parts();
        let mut binding = ControlBinding::new(FirstPersonControls::new(first_person, camera));
        binding.enable(core, camera);

        Self {
            perspective,
            first_person: binding,
        }
    }

    pub fn enable_first_person_controls(&mut self) -> CallbackId {
        let ScreenParts { core, camera, .. } = self.perspective.parts();
        self.first_person.enable(core, camera)
    }

    pub fn disable_first_person_controls(&mut self) -> bool {
        self.first_person.controls_mut().unlock();
        self.first_person.disable(self.perspective.core_mut())
    }

    pub fn first_person(&self) -> &ControlBinding<FirstPersonControls> {
        &self.first_person
    }

    pub fn perspective_mut(&mut self) -> &mut PerspectiveScreen {
        &mut self.perspective
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        self.perspective.scene_mut()
    }
}

impl Screen for FirstPersonScreen {
    crate::delegate_screen!(perspective);

    fn handle_input(&mut self, event: &InputEvent) -> bool {
        if !self.first_person.is_enabled() {
            return false;
        }
        match event {
            InputEvent::PointerDown(PointerButton::Primary) if !self.pointer_locked() => {
                self.first_person.controls_mut().lock();
                true
            }
            InputEvent::KeyDown(Key::Escape) if self.pointer_locked() => {
                self.first_person.controls_mut().unlock();
                true
            }
            _ => self.first_person.handle_input(event),
        }
    }

    fn pointer_locked(&self) -> bool {
        self.first_person.is_enabled() && self.first_person.controls().is_locked()
    }

    fn controls(&self) -> Option<Ref<'_, dyn CameraControls>> {
        self.first_person
            .is_enabled()
            .then(|| self.first_person.dyn_controls())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::gfx::rendering::HeadlessRenderer;

    fn orbit_screen() -> OrbitScreen {
        OrbitScreen::new(
            OrbitScreenConfig::default(),
            Box::new(HeadlessRenderer::new()),
        )
    }

    fn first_person_screen() -> FirstPersonScreen {
        FirstPersonScreen::new(
            FirstPersonScreenConfig::default(),
            Box::new(HeadlessRenderer::new()),
        )
    }

    fn active_controls(screen: &dyn Screen) -> Option<&'static str> {
        screen.controls().map(|controls| controls.name())
    }

    /// Start the loop without a showcase `prepare`.
    fn run(screen: &mut OrbitScreen) {
        let ScreenParts {
            core,
            scene,
            camera,
        } = screen.split_mut().unwrap();
        core.start(scene, camera).unwrap();
    }

    #[test]
    fn orbit_controls_register_one_update_at_construction() {
        let screen = orbit_screen();
        assert!(screen.orbit().is_enabled());
        assert_eq!(screen.core().updates().len(), 1);
        assert_eq!(active_controls(&screen), Some("orbit"));
    }

    #[test]
    fn enable_twice_keeps_a_single_registration() {
        let mut screen = orbit_screen();
        let before = screen.core().updates().len();

        let first = screen.enable_orbit_controls();
        let second = screen.enable_orbit_controls();

        assert_eq!(first, second);
        assert_eq!(screen.core().updates().len(), before);

        assert!(screen.disable_orbit_controls());
        assert_eq!(screen.core().updates().len(), before - 1);
        assert!(!screen.disable_orbit_controls());
        assert_eq!(screen.core().updates().len(), before - 1);
    }

    #[test]
    fn repeated_cycles_never_accumulate_updates() {
        let mut screen = orbit_screen();
        for _ in 0..5 {
            screen.disable_orbit_controls();
            screen.enable_orbit_controls();
            screen.enable_orbit_controls();
        }
        assert_eq!(screen.core().updates().len(), 1);
    }

    #[test]
    fn binding_disable_without_enable_is_a_no_op() {
        let renderer = Box::new(HeadlessRenderer::new());
        let mut core = ScreenCore::new(Default::default(), renderer);
        let camera = PerspectiveCamera::default();
        let controls = OrbitControls::new(Default::default(), &camera);
        let mut binding = ControlBinding::new(controls);

        assert!(!binding.disable(&mut core));
        assert!(!binding.is_enabled());
        assert!(core.updates().is_empty());
    }

    #[test]
    fn disabled_orbit_ignores_input() {
        let mut screen = orbit_screen();
        screen.disable_orbit_controls();
        assert!(!screen.handle_input(&InputEvent::Wheel { delta: 1.0 }));
        assert!(screen.controls().is_none());

        screen.enable_orbit_controls();
        assert!(screen.handle_input(&InputEvent::Wheel { delta: 1.0 }));
    }

    #[test]
    fn update_removed_by_the_host_disables_the_binding() {
        let mut screen = orbit_screen();
        let id = screen.orbit().update_id().unwrap();
        assert!(screen.remove_update_event(id));

        assert!(screen.core().updates().is_empty());
        assert!(!screen.orbit().is_enabled());
        assert_eq!(screen.orbit().update_id(), None);
        assert!(!screen.handle_input(&InputEvent::Wheel { delta: 1.0 }));
        assert!(screen.controls().is_none());
        assert!(!screen.disable_orbit_controls());

        let again = screen.enable_orbit_controls();
        assert_ne!(again, id);
        assert!(screen.orbit().is_enabled());
        assert_eq!(screen.core().updates().len(), 1);
    }

    #[test]
    fn update_removed_during_a_frame_disables_the_binding() {
        let mut screen = orbit_screen();
        let id = screen.orbit().update_id().unwrap();
        screen.add_update_event(move |frame| {
            frame.remove_update_event(id);
        });
        run(&mut screen);

        assert!(screen.frame_at(Duration::ZERO));
        assert!(!screen.orbit().is_enabled());
        assert_eq!(screen.core().updates().len(), 1);

        screen.enable_orbit_controls();
        assert_eq!(screen.core().updates().len(), 2);
    }

    #[test]
    fn orbit_update_moves_camera_each_frame() {
        let mut config = OrbitScreenConfig::default();
        config.orbit.enable_damping = false;
        let mut screen = OrbitScreen::new(config, Box::new(HeadlessRenderer::new()));
        screen.orbit().controls_mut().rotate(0.5, 0.0);
        run(&mut screen);

        let start = screen.camera().unwrap().position;
        assert!(screen.frame_at(Duration::ZERO));
        assert_ne!(screen.camera().unwrap().position, start);
    }

    #[test]
    fn first_person_lock_follows_click_and_escape() {
        let mut screen = first_person_screen();
        assert!(!screen.pointer_locked());
        assert_eq!(active_controls(&screen), Some("first-person"));

        let click = InputEvent::PointerDown(PointerButton::Primary);
        assert!(screen.handle_input(&click));
        assert!(screen.pointer_locked());

        assert!(screen.handle_input(&InputEvent::KeyDown(Key::Escape)));
        assert!(!screen.pointer_locked());
    }

    #[test]
    fn disabling_first_person_releases_pointer() {
        let mut screen = first_person_screen();
        screen.handle_input(&InputEvent::PointerDown(PointerButton::Primary));

        assert!(screen.disable_first_person_controls());
        assert!(!screen.pointer_locked());
        assert!(screen.core().updates().is_empty());

        screen.enable_first_person_controls();
        assert_eq!(screen.core().updates().len(), 1);
    }
}
