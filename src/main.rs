use anyhow::{anyhow, Context, Result};
use winit::event_loop::{ControlFlow, EventLoop};

use vitrine::app::ShowcaseApp;
use vitrine::showcase;

fn main() -> Result<()> {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(env).init();

    let selector = std::env::var("VITRINE_APP").unwrap_or_else(|_| "0".into());
    let stats = std::env::var("VITRINE_STATS").is_ok_and(|v| v == "1");

    let showcase = showcase::find(&selector).ok_or_else(|| {
        anyhow!(
            "unknown showcase '{}', expected an index or one of: {}",
            selector,
            showcase::names().collect::<Vec<_>>().join(", ")
        )
    })?;
    let stats_state = if stats { "on" } else { "off" };
    log::info!("launching '{}' (stats {})", showcase.name, stats_state);

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ShowcaseApp::new(showcase, stats);
    event_loop
        .run_app(&mut app)
        .context("event loop terminated abnormally")?;

    if let Some(err) = app.take_error() {
        let name = showcase.name;
        return Err(err).with_context(|| format!("showcase '{}' could not start", name));
    }
    Ok(())
}
