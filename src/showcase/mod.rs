//! The gallery: every showcase the host application can launch.
//!
//! A showcase wraps one of the screens from [`crate::screen`], layers its own
//! camera defaults over the host's [`ScreenConfig`] and fills the scene in
//! `prepare`.

pub mod rotating_box;
pub mod walkthrough;

pub use rotating_box::RotatingBox;
pub use walkthrough::{ViewMode, Walkthrough};

use crate::gfx::rendering::Renderer;
use crate::screen::{Screen, ScreenConfig};

type BuildFn = fn(ScreenConfig, Box<dyn Renderer>) -> Box<dyn Screen>;

/// A launchable entry of the gallery.
#[derive(Debug, Clone, Copy)]
pub struct Showcase {
    pub name: &'static str,
    pub title: &'static str,
    build: BuildFn,
}

impl Showcase {
    pub fn build(&self, screen: ScreenConfig, renderer: Box<dyn Renderer>) -> Box<dyn Screen> {
        log::info!("building showcase '{}'", self.name);
        (self.build)(screen.with_label(self.title), renderer)
    }
}

pub const SHOWCASES: &[Showcase] = &[
    Showcase {
        name: RotatingBox::NAME,
        title: "Rotating box",
        build: build_rotating_box,
    },
    Showcase {
        name: Walkthrough::NAME,
        title: "Walkthrough",
        build: build_walkthrough,
    },
];

fn build_rotating_box(screen: ScreenConfig, renderer: Box<dyn Renderer>) -> Box<dyn Screen> {
    Box::new(RotatingBox::new(screen, renderer))
}

fn build_walkthrough(screen: ScreenConfig, renderer: Box<dyn Renderer>) -> Box<dyn Screen> {
    Box::new(Walkthrough::new(screen, renderer))
}

/// Look a showcase up by index or by name.
pub fn find(selector: &str) -> Option<&'static Showcase> {
    let selector = selector.trim();
    match selector.parse::<usize>() {
        Ok(index) => SHOWCASES.get(index),
        Err(_) => SHOWCASES
            .iter()
            .find(|showcase| showcase.name.eq_ignore_ascii_case(selector)),
    }
}

pub fn names() -> impl Iterator<Item = &'static str> {
    SHOWCASES.iter().map(|showcase| showcase.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::rendering::HeadlessRenderer;

    #[test]
    fn find_by_index_or_name() {
        assert_eq!(find("0").unwrap().name, "rotating-box");
        assert_eq!(find("walkthrough").unwrap().name, "walkthrough");
        assert_eq!(find(" Walkthrough ").unwrap().name, "walkthrough");
        assert!(find("7").is_none());
        assert!(find("teapot").is_none());
    }

    #[test]
    fn every_showcase_starts_headless() {
        for showcase in SHOWCASES {
            let renderer = Box::new(HeadlessRenderer::new());
            let mut screen = showcase.build(ScreenConfig::default(), renderer);
            pollster::block_on(screen.start()).unwrap();

            assert!(screen.is_running(), "{} did not start", showcase.name);
            assert_eq!(screen.core().surface_label(), showcase.title);
            assert!(screen.frame());
        }
    }
}
