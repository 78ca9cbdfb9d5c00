//! Immediate-mode drawing of the chip scene, stage panel, and overlays.

use macroquad::prelude::*;

use crate::chip::{CellKind, ChannelSide, ChipLayout, InfoTopic, TissueCell, INLET_ZONE_UM};
use crate::session::SessionSnapshot;
use crate::tutorial::HighlightTarget;

use super::ViewTransform;

/// Width of the stage panel on the right edge (px)
pub const PANEL_WIDTH: f32 = 340.0;

/// Screen margin around the chip drawing (px)
pub const VIEW_MARGIN: f32 = 24.0;

// Scene palette
const BACKGROUND: Color = Color::new(0.07, 0.08, 0.11, 1.0);
const CHIP_BODY: Color = Color::new(0.13, 0.15, 0.19, 1.0);
const CHANNEL_FILL: Color = Color::new(0.16, 0.22, 0.30, 1.0);
const GEL_FILL: Color = Color::new(0.15, 0.19, 0.17, 1.0);
const DRUG_TINT: Color = Color::new(0.95, 0.59, 0.24, 1.0);
const PANEL_FILL: Color = Color::new(0.10, 0.11, 0.14, 1.0);
const HIGHLIGHT: Color = Color::new(1.00, 0.84, 0.30, 1.0);

/// Draw one complete frame: scene on the left, stage panel on the right.
pub fn draw_frame(
    layout: &ChipLayout,
    view: &ViewTransform,
    frame: &SessionSnapshot,
    hover: Option<InfoTopic>,
) {
    clear_background(BACKGROUND);

    draw_chip_body(layout, view);
    draw_drug_front(layout, view, frame.sim.drug_front);
    draw_gel_concentration(layout, view, frame.sim.diffusion_level);

    for p in frame.sim.flow_particles {
        let (x, y) = view.to_screen(p.position_um.x, p.position_um.y);
        draw_circle(x, y, 1.6, Color::from_rgba(150, 190, 230, 130));
    }
    for p in frame.sim.diffusion_particles {
        let (x, y) = view.to_screen(p.position_um.x, p.position_um.y);
        draw_circle(x, y, 2.0, Color::from_rgba(214, 138, 82, 200));
    }
    for p in frame.sim.drug_particles {
        let (x, y) = view.to_screen(p.position_um.x, p.position_um.y);
        draw_circle(x, y, 2.2, Color::from_rgba(245, 160, 60, 220));
    }

    draw_cells(view, frame.sim.cells);
    draw_highlight(layout, view, frame.stage.highlight, frame.sim.cells);
    draw_stage_panel(frame);

    if let Some(topic) = hover {
        draw_tooltip(topic);
    }
}

fn draw_chip_body(layout: &ChipLayout, view: &ViewTransform) {
    let (x0, y0) = view.to_screen(0.0, 0.0);
    let w = view.scale_len(layout.channel_length_um);
    let h = view.scale_len(layout.total_height_um());

    let pad = 6.0;
    draw_rectangle(x0 - pad, y0 - pad, w + 2.0 * pad, h + 2.0 * pad, CHIP_BODY);

    for side in ChannelSide::BOTH {
        let (cy0, cy1) = layout.channel_band(side);
        let (bx, by) = view.to_screen(0.0, cy0);
        draw_rectangle(bx, by, w, view.scale_len(cy1 - cy0), CHANNEL_FILL);
    }

    let (gx, gy) = view.to_screen(0.0, layout.gel_top_y());
    draw_rectangle(gx, gy, w, view.scale_len(layout.gel_height_um), GEL_FILL);

    // Inlet ports on the left edge of each channel
    for side in ChannelSide::BOTH {
        let (cy0, cy1) = layout.channel_band(side);
        let (px, py) = view.to_screen(0.0, (cy0 + cy1) / 2.0);
        let radius = view.scale_len((cy1 - cy0) * 0.45).max(3.0);
        draw_circle(px, py, radius, Color::from_rgba(92, 122, 160, 255));
    }
}

fn draw_drug_front(layout: &ChipLayout, view: &ViewTransform, front: f32) {
    if front <= 0.0 {
        return;
    }
    let front_x = front * layout.channel_length_um;
    for side in ChannelSide::BOTH {
        let (cy0, cy1) = layout.channel_band(side);
        let (bx, by) = view.to_screen(0.0, cy0);
        let bh = view.scale_len(cy1 - cy0);
        draw_rectangle(bx, by, view.scale_len(front_x), bh, with_alpha(DRUG_TINT, 0.30));
        let (fx, _) = view.to_screen(front_x, cy0);
        draw_line(fx, by, fx, by + bh, 2.0, with_alpha(DRUG_TINT, 0.85));
    }
}

fn draw_gel_concentration(layout: &ChipLayout, view: &ViewTransform, level: f32) {
    if level <= 0.0 {
        return;
    }
    let (gx, gy) = view.to_screen(0.0, layout.gel_top_y());
    let w = view.scale_len(layout.channel_length_um);
    let h = view.scale_len(layout.gel_height_um);
    draw_rectangle(gx, gy, w, h, with_alpha(DRUG_TINT, 0.35 * level));
}

fn draw_cells(view: &ViewTransform, cells: &[TissueCell]) {
    let t = get_time() as f32;

    // Fibers first so bodies sit on top of them
    for cell in cells.iter().filter(|c| c.kind == CellKind::Axon) {
        let (x0, y0) = view.to_screen(cell.position_um.x, cell.position_um.y);
        let end = cell.end_um();
        let (x1, y1) = view.to_screen(end.x, end.y);
        let thickness = view.scale_len(cell.radius_um * 2.0).max(1.5);
        draw_line(x0, y0, x1, y1, thickness, cell_color(cell.kind, cell.drug_exposure));
    }

    for cell in cells.iter().filter(|c| c.kind != CellKind::Axon) {
        let (x, y) = view.to_screen(cell.position_um.x, cell.position_um.y);
        let wobble = (t * 1.3 + cell.phase).sin();
        let y = y + wobble;
        let radius = view.scale_len(cell.radius_um).max(2.5);
        draw_circle(x, y, radius, cell_color(cell.kind, cell.drug_exposure));
        if cell.kind == CellKind::MotorNeuron {
            draw_circle(x, y, radius * 0.4, Color::from_rgba(40, 58, 46, 255));
        }
    }
}

/// Blend the resting tint toward the drug tint as exposure accumulates
fn cell_color(kind: CellKind, exposure: f32) -> Color {
    let (r, g, b) = match kind {
        CellKind::MotorNeuron => (0.45, 0.78, 0.55),
        CellKind::Axon => (0.42, 0.66, 0.50),
        CellKind::SchwannCell => (0.78, 0.70, 0.45),
    };
    let t = exposure.clamp(0.0, 1.0);
    Color::new(
        r + (DRUG_TINT.r - r) * t,
        g + (DRUG_TINT.g - g) * t,
        b + (DRUG_TINT.b - b) * t,
        1.0,
    )
}

fn draw_highlight(
    layout: &ChipLayout,
    view: &ViewTransform,
    target: HighlightTarget,
    cells: &[TissueCell],
) {
    let mut rects: Vec<(f32, f32, f32, f32)> = Vec::new();
    let full_w = layout.channel_length_um;

    match target {
        HighlightTarget::None => return,
        HighlightTarget::All => {
            rects.push((0.0, 0.0, full_w, layout.total_height_um()));
        }
        HighlightTarget::Inlet => {
            for side in ChannelSide::BOTH {
                let (cy0, cy1) = layout.channel_band(side);
                rects.push((0.0, cy0, INLET_ZONE_UM, cy1 - cy0));
            }
        }
        HighlightTarget::Flow => {
            for side in ChannelSide::BOTH {
                let (cy0, cy1) = layout.channel_band(side);
                rects.push((0.0, cy0, full_w, cy1 - cy0));
            }
        }
        HighlightTarget::Diffusion => {
            rects.push((0.0, layout.gel_top_y(), full_w, layout.gel_height_um));
        }
        HighlightTarget::Cells => {
            rects.push(cell_bounds(layout, cells));
        }
    }

    let pulse = ((get_time() * 2.4).sin() * 0.5 + 0.5) as f32;
    let color = with_alpha(HIGHLIGHT, 0.35 + 0.45 * pulse);
    for (x_um, y_um, w_um, h_um) in rects {
        let (x, y) = view.to_screen(x_um, y_um);
        draw_rectangle_lines(x, y, view.scale_len(w_um), view.scale_len(h_um), 3.0, color);
    }
}

/// Bounding rectangle of the tissue, padded; the whole gel when empty
fn cell_bounds(layout: &ChipLayout, cells: &[TissueCell]) -> (f32, f32, f32, f32) {
    if cells.is_empty() {
        return (0.0, layout.gel_top_y(), layout.channel_length_um, layout.gel_height_um);
    }

    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;
    for cell in cells {
        let end = cell.end_um();
        min_x = min_x.min(cell.position_um.x - cell.radius_um);
        min_y = min_y.min(cell.position_um.y.min(end.y) - cell.radius_um);
        max_x = max_x.max(end.x + cell.radius_um);
        max_y = max_y.max(cell.position_um.y.max(end.y) + cell.radius_um);
    }

    let pad = 30.0;
    (
        min_x - pad,
        min_y - pad,
        (max_x - min_x) + 2.0 * pad,
        (max_y - min_y) + 2.0 * pad,
    )
}

fn draw_stage_panel(frame: &SessionSnapshot) {
    let x = screen_width() - PANEL_WIDTH;
    draw_rectangle(x, 0.0, PANEL_WIDTH, screen_height(), PANEL_FILL);
    draw_line(x, 0.0, x, screen_height(), 1.0, Color::from_rgba(60, 65, 80, 255));

    let text_x = x + 18.0;
    let mut y = 40.0;

    draw_text(
        &format!("Step {} of {}", frame.sim.stage_index + 1, frame.stage_count),
        text_x,
        y,
        16.0,
        GRAY,
    );
    y += 28.0;
    draw_text(frame.stage.title, text_x, y, 26.0, WHITE);
    y += 18.0;

    // Step indicator dots
    for i in 0..frame.stage_count {
        let cx = text_x + 8.0 + i as f32 * 22.0;
        let cy = y + 8.0;
        if i == frame.sim.stage_index {
            draw_circle(cx, cy, 6.0, HIGHLIGHT);
        } else if i < frame.sim.stage_index {
            draw_circle(cx, cy, 4.0, Color::from_rgba(150, 150, 160, 255));
        } else {
            draw_circle_lines(cx, cy, 4.0, 1.5, Color::from_rgba(110, 110, 125, 255));
        }
    }
    y += 38.0;

    for line in wrap_text(frame.stage.description, 16, PANEL_WIDTH - 36.0) {
        draw_text(&line, text_x, y, 16.0, LIGHTGRAY);
        y += 20.0;
    }
    y += 18.0;

    let status_color = Color::from_rgba(170, 190, 210, 255);
    let playback = if frame.running {
        format!("playing {:.2}x", frame.speed_multiplier)
    } else {
        "paused".to_string()
    };
    draw_text(
        &format!("Time  {:.1} s  ({})", frame.sim.time_sec, playback),
        text_x,
        y,
        16.0,
        status_color,
    );
    y += 20.0;
    draw_text(&format!("Flow rate  {:.2}", frame.sim.flow_rate), text_x, y, 16.0, status_color);
    y += 20.0;
    draw_text(
        &format!("Drug front  {:.0}%", frame.sim.drug_front * 100.0),
        text_x,
        y,
        16.0,
        status_color,
    );
    y += 20.0;
    draw_text(
        &format!("Gel concentration  {:.0}%", frame.sim.diffusion_level * 100.0),
        text_x,
        y,
        16.0,
        status_color,
    );
    y += 20.0;
    if frame.sim.washout_active {
        draw_text("Washout running", text_x, y, 16.0, Color::from_rgba(120, 200, 240, 255));
    }

    draw_text(
        &format!("FPS {}", get_fps()),
        text_x,
        screen_height() - 46.0,
        14.0,
        GRAY,
    );
    draw_text(
        "[Space] play  [N] next  [H] help",
        text_x,
        screen_height() - 24.0,
        15.0,
        GRAY,
    );
}

fn draw_tooltip(topic: InfoTopic) {
    let (mx, my) = mouse_position();
    let lines = wrap_text(topic.description(), 15, 264.0);
    let w = 280.0;
    let h = 38.0 + lines.len() as f32 * 18.0;
    let x = (mx + 16.0).min(screen_width() - w - 8.0);
    let y = (my + 16.0).min(screen_height() - h - 8.0);

    draw_rectangle(x, y, w, h, Color::from_rgba(22, 24, 32, 240));
    draw_rectangle_lines(x, y, w, h, 1.5, Color::from_rgba(120, 130, 150, 255));
    draw_text(topic.label(), x + 10.0, y + 22.0, 17.0, WHITE);
    let mut ty = y + 44.0;
    for line in lines {
        draw_text(&line, x + 10.0, ty, 15.0, LIGHTGRAY);
        ty += 18.0;
    }
}

/// Full-screen keyboard reference, toggled with H
pub fn draw_help_overlay() {
    draw_rectangle(
        0.0,
        0.0,
        screen_width(),
        screen_height(),
        Color::new(0.0, 0.0, 0.0, 0.65),
    );

    let entries = [
        ("Space", "play / pause"),
        ("N / Enter", "next stage (wraps to the start)"),
        ("Left / Right", "jump between stages"),
        ("R", "reset the whole session"),
        ("+ / -", "playback speed"),
        ("[ / ]", "pump flow rate"),
        ("E", "toggle CSV recording"),
        ("J", "export state to JSON"),
        ("H", "close this help"),
    ];

    let w = 430.0;
    let h = 84.0 + entries.len() as f32 * 26.0;
    let x = (screen_width() - w) / 2.0;
    let y = (screen_height() - h) / 2.0;
    draw_rectangle(x, y, w, h, Color::from_rgba(18, 20, 28, 245));
    draw_rectangle_lines(x, y, w, h, 2.0, Color::from_rgba(120, 130, 150, 255));
    draw_text("Controls", x + 20.0, y + 38.0, 24.0, WHITE);

    let mut ty = y + 74.0;
    for (key, action) in entries {
        draw_text(key, x + 24.0, ty, 17.0, HIGHLIGHT);
        draw_text(action, x + 150.0, ty, 17.0, LIGHTGRAY);
        ty += 26.0;
    }
}

fn with_alpha(c: Color, a: f32) -> Color {
    Color::new(c.r, c.g, c.b, a)
}

/// Greedy word wrap against the measured pixel width
fn wrap_text(text: &str, font_size: u16, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if !current.is_empty() && measure_text(&candidate, None, font_size, 1.0).width > max_width {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
