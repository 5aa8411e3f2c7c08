// src/main.rs

mod color_classifier;
mod config;
mod error;
mod frame_evaluator;
mod pixel_surface;
mod render;
mod replay;
mod types;

use anyhow::Result;
use frame_evaluator::{evaluate_frame, is_stop_object, SafetyVerdict, TRAFFIC_LIGHT_CLASS};
use pixel_surface::BufferSurface;
use render::{RenderSink, TerminalRenderer};
use replay::{find_scenario_files, ScenarioReader};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use types::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load("config.yaml")?;

    tracing_subscriber::fmt()
        .with_env_filter(config.logging.level.as_str())
        .init();

    info!("🚦 Drive Safety Monitor Starting");
    info!(
        "Frame geometry: {}x{} @ {} FPS",
        config.video.frame_width, config.video.frame_height, config.video.target_fps
    );

    let scenarios = find_scenario_files(&config.video.input_dir)?;
    if scenarios.is_empty() {
        error!("No scenario files found in {}", config.video.input_dir);
        return Ok(());
    }

    let mut totals = ScenarioStats::default();

    for (idx, path) in scenarios.iter().enumerate() {
        info!("========================================");
        info!(
            "Replaying scenario {}/{}: {}",
            idx + 1,
            scenarios.len(),
            path.display()
        );

        match run_scenario(path, &config).await {
            Ok(stats) => {
                report("Scenario report", &stats);
                totals.merge(&stats);
            }
            Err(e) => error!("Failed to replay scenario: {}", e),
        }
    }

    if scenarios.len() > 1 {
        info!("========================================");
        report("Final report (all scenarios)", &totals);
    }

    Ok(())
}

#[derive(Debug, Default)]
struct ScenarioStats {
    total_frames: u64,
    stop_frames: u64,
    slow_frames: u64,
    safe_frames: u64,
    detections_seen: u64,
    stop_objects_seen: u64,
    traffic_lights_seen: u64,
    sample_failures: u64,
    duration_secs: f64,
}

impl ScenarioStats {
    fn merge(&mut self, other: &ScenarioStats) {
        self.total_frames += other.total_frames;
        self.stop_frames += other.stop_frames;
        self.slow_frames += other.slow_frames;
        self.safe_frames += other.safe_frames;
        self.detections_seen += other.detections_seen;
        self.stop_objects_seen += other.stop_objects_seen;
        self.traffic_lights_seen += other.traffic_lights_seen;
        self.sample_failures += other.sample_failures;
        self.duration_secs += other.duration_secs;
    }
}

fn report(title: &str, stats: &ScenarioStats) {
    info!("📊 {}:", title);
    info!("  Total frames: {}", stats.total_frames);
    info!("  🛑 Stop frames: {}", stats.stop_frames);
    info!("  ⚠️  Slow frames: {}", stats.slow_frames);
    info!("  ✅ Safe frames: {}", stats.safe_frames);
    info!(
        "  Detections: {} ({} stop-trigger, {} traffic light)",
        stats.detections_seen, stats.stop_objects_seen, stats.traffic_lights_seen
    );
    if stats.sample_failures > 0 {
        warn!("  Sample failures: {}", stats.sample_failures);
    } else {
        info!("  Sample failures: 0");
    }
    if stats.duration_secs > 0.0 {
        info!(
            "  Processing Speed: {:.1} FPS",
            stats.total_frames as f64 / stats.duration_secs
        );
    }
}

async fn run_scenario(path: &Path, config: &Config) -> Result<ScenarioStats> {
    let start_time = Instant::now();

    let mut reader = ScenarioReader::open(path)?;
    let mut renderer = TerminalRenderer::new();
    let mut stats = ScenarioStats::default();

    let surface_width = config.video.frame_width as u32;
    let surface_height = config.video.frame_height as u32;
    let frame_width = config.video.frame_width as f32;
    let frame_height = config.video.frame_height as f32;

    let fps = config.video.target_fps.max(1);
    let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / fps as f64));

    let mut frame_id: u64 = 0;

    while let Some(frame) = reader.next_frame()? {
        ticker.tick().await;
        frame_id += 1;

        stats.detections_seen += frame.detections.len() as u64;
        stats.stop_objects_seen += frame
            .detections
            .iter()
            .filter(|d| is_stop_object(&d.class_name))
            .count() as u64;
        stats.traffic_lights_seen += frame
            .detections
            .iter()
            .filter(|d| d.class_name == TRAFFIC_LIGHT_CLASS)
            .count() as u64;

        let surface = BufferSurface::from_rgba(
            surface_width,
            surface_height,
            frame.render_rgba(surface_width, surface_height),
        )?;

        match evaluate_frame(&frame.detections, &surface, frame_width, frame_height) {
            Ok(result) => {
                match result.verdict {
                    SafetyVerdict::Stop => stats.stop_frames += 1,
                    SafetyVerdict::Slow => stats.slow_frames += 1,
                    SafetyVerdict::Safe => stats.safe_frames += 1,
                }
                renderer.render(frame_id, &result);
            }
            Err(e) => {
                stats.sample_failures += 1;
                if config.monitor.halt_on_sample_error {
                    return Err(e.into());
                }
                warn!("Frame {} skipped: {}", frame_id, e);
            }
        }

        if config.monitor.max_frames > 0 && frame_id >= config.monitor.max_frames {
            info!(
                "Frame cap reached ({}), stopping replay",
                config.monitor.max_frames
            );
            break;
        }

        if frame_id % 50 == 0 {
            info!(
                "Progress: frame {} | 🛑 {} | ⚠️ {} | ✅ {}",
                frame_id, stats.stop_frames, stats.slow_frames, stats.safe_frames
            );
        }
    }

    stats.total_frames = frame_id;
    stats.duration_secs = start_time.elapsed().as_secs_f64();
    Ok(stats)
}
