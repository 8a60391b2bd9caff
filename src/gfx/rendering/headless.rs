use std::cell::RefCell;
use std::rc::Rc;

use super::Renderer;
use crate::gfx::{camera::PerspectiveCamera, scene::Scene};

/// Snapshot of one `render` call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    pub visible_nodes: usize,
    pub camera_aspect: f32,
    pub camera_position: [f32; 3],
}

#[derive(Debug)]
struct Record {
    size: (u32, u32),
    pixel_ratio: f64,
    size_history: Vec<(u32, u32)>,
    ratio_history: Vec<f64>,
    frames: Vec<RenderedFrame>,
}

/// Renderer that draws nothing and records every call.
///
/// Clones share the same record, so a test can keep one handle while the
/// screen owns the other.
#[derive(Debug, Clone)]
pub struct HeadlessRenderer {
    record: Rc<RefCell<Record>>,
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self {
            record: Rc::new(RefCell::new(Record {
                size: (0, 0),
                pixel_ratio: 1.0,
                size_history: Vec::new(),
                ratio_history: Vec::new(),
                frames: Vec::new(),
            })),
        }
    }

    pub fn render_count(&self) -> usize {
        self.record.borrow().frames.len()
    }

    pub fn last_frame(&self) -> Option<RenderedFrame> {
        self.record.borrow().frames.last().cloned()
    }

    /// Every accepted `set_size` call, oldest first.
    pub fn size_history(&self) -> Vec<(u32, u32)> {
        self.record.borrow().size_history.clone()
    }

    pub fn ratio_history(&self) -> Vec<f64> {
        self.record.borrow().ratio_history.clone()
    }
}

impl Renderer for HeadlessRenderer {
    fn set_size(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("headless renderer: ignoring zero size {}x{}", width, height);
            return;
        }
        let mut record = self.record.borrow_mut();
        record.size = (width, height);
        record.size_history.push((width, height));
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        let mut record = self.record.borrow_mut();
        record.pixel_ratio = ratio;
        record.ratio_history.push(ratio);
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) {
        self.record.borrow_mut().frames.push(RenderedFrame {
            visible_nodes: scene.visible().count(),
            camera_aspect: camera.aspect,
            camera_position: camera.position.into(),
        });
    }

    fn size(&self) -> (u32, u32) {
        self.record.borrow().size
    }

    fn pixel_ratio(&self) -> f64 {
        self.record.borrow().pixel_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_record() {
        let recorder = HeadlessRenderer::new();
        let mut renderer: Box<dyn Renderer> = Box::new(recorder.clone());

        renderer.set_size(640, 480);
        renderer.set_size(0, 480);
        renderer.set_pixel_ratio(2.0);
        renderer.render(&Scene::new(), &PerspectiveCamera::default());

        assert_eq!(recorder.size_history(), vec![(640, 480)]);
        assert_eq!(recorder.ratio_history(), vec![2.0]);
        assert_eq!(recorder.render_count(), 1);
        assert_eq!(recorder.last_frame().map(|f| f.visible_nodes), Some(0));
    }
}
