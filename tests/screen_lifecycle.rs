//! End-to-end lifecycle behaviour of a showcase-style screen driven with
//! simulated time and a headless renderer.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use futures::future::{FutureExt, LocalBoxFuture};
use vitrine::error::{LoadError, ScreenError};
use vitrine::gfx::geometry::cube;
use vitrine::gfx::rendering::HeadlessRenderer;
use vitrine::gfx::scene::Node;
use vitrine::loader::AssetLoader;
use vitrine::screen::{PerspectiveConfig, PerspectiveScreen, Screen};

/// Counts prepare calls and accumulates the delta of every update.
struct Counting {
    screen: PerspectiveScreen,
    prepares: Rc<Cell<u32>>,
    total: Rc<Cell<f32>>,
    fail_first: Cell<bool>,
}

impl Counting {
    fn new(renderer: HeadlessRenderer) -> Self {
        Self {
            screen: PerspectiveScreen::new(PerspectiveConfig::default(), Box::new(renderer)),
            prepares: Rc::new(Cell::new(0)),
            total: Rc::new(Cell::new(0.0)),
            fail_first: Cell::new(false),
        }
    }

    fn failing_once(self) -> Self {
        self.fail_first.set(true);
        self
    }
}

impl Screen for Counting {
    vitrine::delegate_screen!(screen);

    fn prepare(&mut self) -> LocalBoxFuture<'_, Result<(), ScreenError>> {
        async move {
            self.prepares.set(self.prepares.get() + 1);
            if self.fail_first.replace(false) {
                return Err(ScreenError::Renderer("device lost during setup".into()));
            }

            self.screen.scene_mut().add(Node::new("cube", cube(1.0)));
            let total = self.total.clone();
            self.add_update_event(move |frame| total.set(total.get() + frame.delta));
            Ok(())
        }
        .boxed_local()
    }
}

/// Screen whose prepare loads an asset that does not exist.
struct MissingAsset {
    screen: PerspectiveScreen,
    loader: AssetLoader,
}

impl Screen for MissingAsset {
    vitrine::delegate_screen!(screen);

    fn prepare(&mut self) -> LocalBoxFuture<'_, Result<(), ScreenError>> {
        async move {
            let model = self.loader.load_model("models/missing.obj").await?;
            self.screen.scene_mut().add(Node::new("model", model));
            Ok(())
        }
        .boxed_local()
    }
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[test]
fn prepare_runs_at_most_once() {
    let mut screen = Counting::new(HeadlessRenderer::new());

    pollster::block_on(screen.start()).unwrap();
    pollster::block_on(screen.start()).unwrap();
    screen.stop();
    pollster::block_on(screen.start()).unwrap();

    assert_eq!(screen.prepares.get(), 1);
    assert_eq!(screen.scene().unwrap().len(), 1);
    assert_eq!(screen.core().updates().len(), 1);
}

#[test]
fn deltas_sum_to_elapsed() {
    let renderer = HeadlessRenderer::new();
    let mut screen = Counting::new(renderer.clone());
    pollster::block_on(screen.start()).unwrap();

    for now in [0, 16, 32, 49] {
        assert!(screen.frame_at(ms(now)));
    }

    assert!((screen.total.get() - 0.049).abs() < 1e-5);
    assert!((screen.elapsed() - 0.049).abs() < 1e-5);
    assert!((screen.delta() - 0.017).abs() < 1e-5);
    assert_eq!(renderer.render_count(), 4);
}

#[test]
fn stop_halts_ticks_and_time() {
    let renderer = HeadlessRenderer::new();
    let mut screen = Counting::new(renderer.clone());
    pollster::block_on(screen.start()).unwrap();

    screen.frame_at(ms(0));
    screen.frame_at(ms(20));
    screen.stop();
    assert!(!screen.is_running());

    assert!(!screen.frame_at(ms(40)));
    assert!(!screen.frame_at(ms(1_000)));
    assert_eq!(renderer.render_count(), 2);
    assert!((screen.elapsed() - 0.02).abs() < 1e-5);
    assert!((screen.total.get() - 0.02).abs() < 1e-5);

    // Resuming does not count the time spent stopped
    pollster::block_on(screen.start()).unwrap();
    screen.frame_at(ms(2_000));
    screen.frame_at(ms(2_010));
    assert!((screen.elapsed() - 0.03).abs() < 1e-5);
}

#[test]
fn failed_prepare_leaves_loop_stopped_and_can_retry() {
    let mut screen = Counting::new(HeadlessRenderer::new()).failing_once();

    let first = pollster::block_on(screen.start());
    assert!(matches!(first, Err(ScreenError::Renderer(_))));
    assert!(!screen.is_running());
    assert!(!screen.frame_at(ms(16)));

    pollster::block_on(screen.start()).unwrap();
    assert!(screen.is_running());
    assert_eq!(screen.prepares.get(), 2);
}

#[test]
fn asset_failures_propagate_out_of_start() {
    let renderer = Box::new(HeadlessRenderer::new());
    let mut screen = MissingAsset {
        screen: PerspectiveScreen::new(PerspectiveConfig::default(), renderer),
        loader: AssetLoader::new(std::env::temp_dir().join("vitrine-no-such-assets")),
    };

    let err = pollster::block_on(screen.start()).unwrap_err();
    assert!(matches!(err, ScreenError::AssetLoad(LoadError::Io { .. })));
    assert!(err.to_string().contains("models/missing.obj"));
    assert!(!screen.is_running());
}

#[test]
fn invalid_camera_is_rejected_before_prepare() {
    let mut screen = Counting::new(HeadlessRenderer::new());
    screen.screen.camera_mut().near = 0.0;

    let err = pollster::block_on(screen.start()).unwrap_err();
    assert!(matches!(err, ScreenError::InvalidArgument(_)));
    assert_eq!(screen.prepares.get(), 0);
}
