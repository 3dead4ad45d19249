use std::time::Instant;

use anyhow::Context;

use rastrum::clipper::ViewFrustum;
use rastrum::config::{AppConfig, OutputKind, RenderingConfig};
use rastrum::logging::{init_logging, LoggingConfig};
use rastrum::render::{ImageSink, OutputSink, Renderer};
use rastrum::scene::Scene;
use rastrum::window::{FrameLimiter, Window};
use rastrum::Projection;

fn build_renderer<S: OutputSink>(sink: S, config: &RenderingConfig) -> Renderer<S> {
    let projection = Projection::with_params(
        sink.width(),
        sink.height(),
        config.projection_z,
        config.viewport_size,
    );
    let mut renderer = Renderer::new(sink)
        .with_projection(projection)
        .with_frustum(ViewFrustum::with_near(config.near));
    renderer.set_render_mode(config.mode);
    renderer
}

/// Renders until the sink asks to stop.
///
/// With `realtime` the animation follows the wall clock and frames are paced
/// to `fps`; otherwise every frame advances the animation by exactly `1/fps`
/// seconds and nothing sleeps.
fn run<S: OutputSink>(mut renderer: Renderer<S>, scene: &Scene, fps: u32, realtime: bool) -> anyhow::Result<()> {
    let mut instances = scene.instances();
    let mut limiter = FrameLimiter::new(if realtime { fps } else { 0 });
    let step = 1.0 / fps.max(1) as f32;
    let start = Instant::now();
    let mut frames: u64 = 0;

    while !renderer.poll_quit() {
        let elapsed = if realtime {
            start.elapsed().as_secs_f32()
        } else {
            frames as f32 * step
        };
        scene.animate(&mut instances, elapsed);
        scene.render(&mut renderer, &instances);
        renderer.present().context("failed to present frame")?;

        frames += 1;
        limiter.wait_and_get_delta();
    }

    log::info!(
        "rendered {} frames in {:.2}s",
        frames,
        start.elapsed().as_secs_f32()
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_logging(LoggingConfig::from(&config.logging));

    log::info!(
        "{}x{} canvas, {} mode, {:?} output",
        config.window.width,
        config.window.height,
        config.rendering.mode,
        config.rendering.output
    );

    let scene = Scene::from_config(&config).context("failed to load scene model")?;

    match config.rendering.output {
        OutputKind::Window => {
            let window = Window::new(
                &config.window.title,
                config.window.width,
                config.window.height,
                config.rendering.background,
            )
            .context("failed to open window")?;
            run(
                build_renderer(window, &config.rendering),
                &scene,
                config.window.fps,
                true,
            )
        }
        OutputKind::Image => {
            let sink = ImageSink::new(
                config.window.width,
                config.window.height,
                config.rendering.background,
                &config.rendering.image_dir,
                config.rendering.image_frames,
            )
            .context("failed to prepare image output")?;
            run(
                build_renderer(sink, &config.rendering),
                &scene,
                config.window.fps,
                false,
            )
        }
    }
}
