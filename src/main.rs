//! Perfusion Tutor - Entry point
//!
//! Interactive tutorial for a microfluidic drug-perfusion chip.
//!
//! CLI Usage:
//!   cargo run                        # Run the interactive tutorial window
//!   cargo run -- --headless 60      # Run the full tour without a window
//!   cargo run -- --headless 60 -e   # ...and record a CSV time series

use std::time::Instant;

use anyhow::Result;
use macroquad::prelude::*;
use perfusion_tutor::{
    config::Parameters,
    export::{export_state_json, CsvExporter},
    render::{self, ViewTransform, PANEL_WIDTH, VIEW_MARGIN},
    session::TutorialSession,
};

/// Seconds of simulated time between CSV samples
const CSV_SAMPLE_INTERVAL_SEC: f32 = 0.25;

/// Run the whole tour without a window, printing a summary at the end
fn run_headless(params: Parameters, duration_sec: f32, export_csv: bool) -> Result<()> {
    println!("=== Perfusion Tutor - Headless Run ===\n");

    let mut session = TutorialSession::new(params);
    let stage_count = session.stage_count();
    let dwell_sec = duration_sec / stage_count as f32;
    println!("Stages: {}", stage_count);
    println!("Duration: {:.1} s ({:.1} s per stage)\n", duration_sec, dwell_sec);

    let mut csv = if export_csv {
        Some(CsvExporter::new(CSV_SAMPLE_INTERVAL_SEC)?)
    } else {
        None
    };

    let dt = 1.0 / 60.0;
    let total_steps = (duration_sec / dt).ceil() as usize;
    let mut next_advance = dwell_sec;
    let start = Instant::now();

    for step in 0..total_steps {
        session.step(dt);

        let elapsed_sim = (step + 1) as f32 * dt;
        if elapsed_sim >= next_advance && session.stage_index() + 1 < stage_count {
            session.advance_stage();
            next_advance += dwell_sec;
            println!(
                "t={:.1}s  stage {} ({})",
                elapsed_sim,
                session.stage_index(),
                session.current_stage().title
            );
        }

        if let Some(exporter) = csv.as_mut() {
            exporter.maybe_record(&session.metrics())?;
        }
    }

    let wall = start.elapsed();
    let metrics = session.metrics();

    println!(
        "\n--- Final state after {:.1} s simulated ({:.0} ms wall) ---",
        metrics.time_sec,
        wall.as_secs_f64() * 1000.0
    );
    println!("Stage: {} ({})", metrics.stage_index, metrics.stage_title);
    println!("Drug front: {:.0}% of channel", metrics.drug_front * 100.0);
    println!("Gel concentration: {:.0}%", metrics.diffusion_level * 100.0);
    println!(
        "Neuron exposure: mean {:.3}, max {:.3}",
        metrics.neuron_exposure_mean, metrics.neuron_exposure_max
    );
    println!("Axon exposure: mean {:.3}", metrics.axon_exposure_mean);
    println!("Schwann exposure: mean {:.3}", metrics.schwann_exposure_mean);
    println!("Washout active: {}\n", metrics.washout_active);

    if metrics.drug_front >= 0.99 {
        println!("✓ Drug front crossed the whole channel");
    } else {
        println!(
            "⚠️  Drug front stalled at {:.0}% - raise the flow rate or run longer",
            metrics.drug_front * 100.0
        );
    }
    if metrics.neuron_exposure_mean > 0.0 {
        println!("✓ Tissue accumulated exposure");
    } else {
        println!("⚠️  No tissue exposure recorded - run longer");
    }

    if let Some(mut exporter) = csv.take() {
        // Close the series with a row at the exact end time
        exporter.record(&metrics)?;
        let path = exporter.finish()?;
        println!("CSV written: {}", path.display());
    }
    let json_path = export_state_json(&metrics)?;
    println!("State written: {}", json_path.display());

    Ok(())
}

/// Interactive window loop
async fn run_window(params: Parameters, export_csv: bool) {
    let mut session = TutorialSession::new(params);
    let mut csv: Option<CsvExporter> = if export_csv {
        CsvExporter::new(CSV_SAMPLE_INTERVAL_SEC).ok()
    } else {
        None
    };
    let mut show_help = false;

    loop {
        if is_key_pressed(KeyCode::Space) {
            let running = session.toggle_playback();
            log::debug!("Playback {}", if running { "started" } else { "paused" });
        }
        if is_key_pressed(KeyCode::N) || is_key_pressed(KeyCode::Enter) {
            session.advance_stage();
        }
        if is_key_pressed(KeyCode::R) {
            session.reset_all();
        }
        if is_key_pressed(KeyCode::Right) {
            session.jump_to_stage(session.stage_index() + 1);
        }
        if is_key_pressed(KeyCode::Left) {
            session.jump_to_stage(session.stage_index().saturating_sub(1));
        }
        if is_key_pressed(KeyCode::Equal) || is_key_pressed(KeyCode::KpAdd) {
            session.set_speed_multiplier(session.speed_multiplier() * 1.25);
        }
        if is_key_pressed(KeyCode::Minus) || is_key_pressed(KeyCode::KpSubtract) {
            session.set_speed_multiplier(session.speed_multiplier() / 1.25);
        }
        if is_key_pressed(KeyCode::RightBracket) {
            session.set_flow_rate(session.flow_rate() + 0.1);
        }
        if is_key_pressed(KeyCode::LeftBracket) {
            session.set_flow_rate(session.flow_rate() - 0.1);
        }
        if is_key_pressed(KeyCode::E) {
            csv = match csv.take() {
                Some(mut exporter) => {
                    // Close the series with a row at the stop time
                    if let Err(e) = exporter.record(&session.metrics()) {
                        log::error!("CSV record failed: {e:#}");
                    }
                    match exporter.finish() {
                        Ok(path) => log::info!("Recording stopped: {}", path.display()),
                        Err(e) => log::error!("CSV export failed: {e:#}"),
                    }
                    None
                }
                None => match CsvExporter::new(CSV_SAMPLE_INTERVAL_SEC) {
                    Ok(exporter) => Some(exporter),
                    Err(e) => {
                        log::error!("Could not start CSV export: {e:#}");
                        None
                    }
                },
            };
        }
        if is_key_pressed(KeyCode::J) {
            match export_state_json(&session.metrics()) {
                Ok(path) => log::info!("State exported: {}", path.display()),
                Err(e) => log::error!("JSON export failed: {e:#}"),
            }
        }
        if is_key_pressed(KeyCode::H) {
            show_help = !show_help;
        }
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        // Advance the core off the play clock
        if session.frame() {
            if let Some(exporter) = csv.as_mut() {
                if let Err(e) = exporter.maybe_record(&session.metrics()) {
                    log::error!("CSV record failed: {e:#}");
                }
            }
        }

        let view = ViewTransform::fit(
            session.layout(),
            screen_width(),
            screen_height(),
            PANEL_WIDTH,
            VIEW_MARGIN,
        );
        let (mx, my) = mouse_position();
        let (cx, cy) = view.to_chip(mx, my);
        let hover = render::hover::topic_at(session.layout(), session.simulation().cells(), cx, cy);

        render::draw_frame(session.layout(), &view, &session.snapshot(), hover);
        if show_help {
            render::draw_help_overlay();
        }
        if csv.is_some() {
            draw_text("REC", 16.0, 24.0, 18.0, RED);
        }

        next_frame().await;
    }

    if let Some(mut exporter) = csv.take() {
        if let Err(e) = exporter.record(&session.metrics()) {
            log::error!("CSV record failed on exit: {e:#}");
        }
        if let Err(e) = exporter.finish() {
            log::error!("CSV export failed on exit: {e:#}");
        }
    }
    log::info!("Window closed");
}

/// Parse CLI arguments
fn parse_args() -> (Option<f32>, Option<u64>, bool) {
    let args: Vec<String> = std::env::args().collect();
    let mut headless: Option<f32> = None;
    let mut seed: Option<u64> = None;
    let mut export_csv = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--headless" => {
                headless = Some(60.0);
                if i + 1 < args.len() {
                    if let Ok(sec) = args[i + 1].parse::<f32>() {
                        headless = Some(sec);
                        i += 1;
                    }
                }
            }
            "--seed" | "-s" => {
                i += 1;
                if i < args.len() {
                    seed = args[i].parse().ok();
                }
            }
            "--export" | "-e" => export_csv = true,
            "--help" | "-h" => {
                println!("Perfusion Tutor");
                println!();
                println!("Usage: perfusion-tutor [OPTIONS]");
                println!();
                println!("Options:");
                println!("  --headless [SECONDS]  Run the full tour without a window (default: 60)");
                println!("  --seed, -s N          Seed the random generator for reproducible runs");
                println!("  --export, -e          Record a CSV time series from the start");
                println!("  --help, -h            Show this help");
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    (headless, seed, export_csv)
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Perfusion Tutor".to_owned(),
        window_width: 1280,
        window_height: 720,
        high_dpi: true,
        ..Default::default()
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let (headless, seed, export_csv) = parse_args();

    let mut params = Parameters::load_or_default();
    if seed.is_some() {
        params.rng_seed = seed;
    }

    if let Some(duration_sec) = headless {
        return run_headless(params, duration_sec, export_csv);
    }

    log::info!("Perfusion Tutor starting...");
    macroquad::Window::from_config(window_conf(), run_window(params, export_csv));
    Ok(())
}
