//! Per-mode overlay geometry
//!
//! Everything here is a pure function of (phase, progress) where progress is
//! the share of the current phase that has elapsed. Staggered elements are
//! fitted into the phase so the last element lands exactly at progress 1.

use glam::Vec2;

use super::mode::{TransitionMode, TransitionPhase};
use crate::renderer::Canvas;
use crate::renderer::shapes::{self, GradientStop};
use crate::renderer::vertex::colors;

/// Per-strip delay for the bars cascade (ms, before fitting)
const BAR_STAGGER_MS: f32 = 40.0;
/// Settle time of one strip's spring (ms, before fitting)
const BAR_SPRING_MS: f32 = 520.0;
/// Checker delays per column and row (ms, before fitting)
const CHECKER_COL_MS: f32 = 40.0;
const CHECKER_ROW_MS: f32 = 30.0;
const CHECKER_CELL_MS: f32 = 450.0;

/// Iris radius when fully covering, in percent of the reference radius
pub const IRIS_FULL_PCT: f32 = 150.0;
/// Peak flash opacity
pub const FLASH_PEAK: f32 = 0.4;

/// Spring stiffness and damping (unit mass)
const SPRING_STIFFNESS: f32 = 220.0;
const SPRING_DAMPING: f32 = 22.0;

const IRIS_SEGMENTS: u32 = 64;
const FLASH_SEGMENTS: u32 = 48;

const FLASH_STOPS: [GradientStop; 5] = [
    GradientStop { offset: 0.0, color: colors::FLASH_CORE },
    GradientStop { offset: 0.18, color: colors::FLASH_CORE },
    GradientStop { offset: 0.35, color: colors::FLASH_MID },
    GradientStop { offset: 0.60, color: colors::FLASH_EDGE },
    GradientStop { offset: 1.0, color: colors::FLASH_RIM },
];

/// Grid dimensions for the staggered modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayLayout {
    pub bar_count: u32,
    pub checker_cols: u32,
    pub checker_rows: u32,
}

impl Default for OverlayLayout {
    fn default() -> Self {
        Self {
            bar_count: 9,
            checker_cols: 10,
            checker_rows: 6,
        }
    }
}

/// Underdamped spring from 0 toward 1, `t` in seconds
fn spring(t: f32) -> f32 {
    let omega0 = SPRING_STIFFNESS.sqrt();
    let zeta = SPRING_DAMPING / (2.0 * omega0);
    let omega_d = omega0 * (1.0 - zeta * zeta).sqrt();
    let decay = (-zeta * omega0 * t).exp();
    1.0 - decay * ((omega_d * t).cos() + (zeta * omega0 / omega_d) * (omega_d * t).sin())
}

/// Spring response over a normalized settle window; exactly 1 at the end
pub fn spring_ease(x: f32) -> f32 {
    if x >= 1.0 {
        return 1.0;
    }
    spring(x.max(0.0) * BAR_SPRING_MS / 1000.0).clamp(0.0, 1.0)
}

pub fn ease_in_out(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    if x < 0.5 {
        4.0 * x * x * x
    } else {
        1.0 - (-2.0 * x + 2.0).powi(3) / 2.0
    }
}

pub fn ease_out(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    1.0 - (1.0 - x).powi(3)
}

/// Local progress of an element starting `delay_ms` into a staggered timeline
fn staggered(progress: f32, delay_ms: f32, duration_ms: f32, natural_ms: f32) -> f32 {
    let t = progress.clamp(0.0, 1.0) * natural_ms;
    ((t - delay_ms) / duration_ms).clamp(0.0, 1.0)
}

/// Map an eased 0→1 value onto the phase direction
fn sweep(phase: TransitionPhase, eased: f32) -> f32 {
    match phase {
        TransitionPhase::Entering => eased,
        TransitionPhase::Flashing => 1.0,
        TransitionPhase::Exiting => 1.0 - eased,
    }
}

/// Vertical scale of strip `index`
pub fn bar_scale(index: u32, count: u32, phase: TransitionPhase, progress: f32) -> f32 {
    let natural = count.saturating_sub(1) as f32 * BAR_STAGGER_MS + BAR_SPRING_MS;
    let local = staggered(progress, index as f32 * BAR_STAGGER_MS, BAR_SPRING_MS, natural);
    sweep(phase, spring_ease(local))
}

/// Iris radius in percent of the reference radius
pub fn iris_radius_pct(phase: TransitionPhase, progress: f32) -> f32 {
    sweep(phase, ease_in_out(progress)) * IRIS_FULL_PCT
}

/// Scale of checker cell (`col`, `row`)
pub fn checker_scale(
    col: u32,
    row: u32,
    layout: &OverlayLayout,
    phase: TransitionPhase,
    progress: f32,
) -> f32 {
    let natural = layout.checker_cols.saturating_sub(1) as f32 * CHECKER_COL_MS
        + layout.checker_rows.saturating_sub(1) as f32 * CHECKER_ROW_MS
        + CHECKER_CELL_MS;
    let delay = col as f32 * CHECKER_COL_MS + row as f32 * CHECKER_ROW_MS;
    let local = staggered(progress, delay, CHECKER_CELL_MS, natural);
    sweep(phase, ease_out(local))
}

/// Flash overlay opacity; zero outside the flashing phase
pub fn flash_alpha(phase: TransitionPhase, progress: f32) -> f32 {
    match phase {
        TransitionPhase::Flashing => ease_out(progress) * FLASH_PEAK,
        _ => 0.0,
    }
}

/// Draw the backdrop, the mode visuals and (when enabled) the flash
pub fn draw(
    canvas: &mut Canvas,
    mode: TransitionMode,
    phase: TransitionPhase,
    progress: f32,
    layout: &OverlayLayout,
    flash: bool,
) {
    if !canvas.is_ready() {
        return;
    }
    let (w, h) = canvas.extent();
    canvas.fill_rect(0.0, 0.0, w, h, colors::BACKDROP);

    match mode {
        TransitionMode::Bars => draw_bars(canvas, phase, progress, layout.bar_count),
        TransitionMode::Iris => draw_iris(canvas, phase, progress),
        TransitionMode::Checker => draw_checker(canvas, phase, progress, layout),
    }

    if flash {
        let alpha = flash_alpha(phase, progress);
        if alpha > 0.0 {
            let center = Vec2::new(w / 2.0, h / 2.0);
            // Farthest-corner radius, as for a CSS radial gradient
            let radius = center.length();
            canvas.push(&shapes::radial_gradient(
                center,
                radius,
                &FLASH_STOPS,
                alpha,
                FLASH_SEGMENTS,
            ));
        }
    }
}

fn draw_bars(canvas: &mut Canvas, phase: TransitionPhase, progress: f32, count: u32) {
    if count == 0 {
        return;
    }
    let (w, h) = canvas.extent();
    let strip = h / count as f32;
    for i in 0..count {
        let scaled = strip * bar_scale(i, count, phase, progress);
        let center_y = strip * (i as f32 + 0.5);
        canvas.fill_rect(0.0, center_y - scaled / 2.0, w, scaled, colors::WIPE);
    }
}

fn draw_iris(canvas: &mut Canvas, phase: TransitionPhase, progress: f32) {
    let (w, h) = canvas.extent();
    // 100% is the CSS circle() reference radius
    let reference = (w * w + h * h).sqrt() / std::f32::consts::SQRT_2;
    let radius = iris_radius_pct(phase, progress) / 100.0 * reference;
    if radius > 0.0 {
        let center = Vec2::new(w / 2.0, h / 2.0);
        canvas.push(&shapes::circle(center, radius, colors::WIPE, IRIS_SEGMENTS));
    }
}

fn draw_checker(canvas: &mut Canvas, phase: TransitionPhase, progress: f32, layout: &OverlayLayout) {
    if layout.checker_cols == 0 || layout.checker_rows == 0 {
        return;
    }
    let (w, h) = canvas.extent();
    let cell_w = w / layout.checker_cols as f32;
    let cell_h = h / layout.checker_rows as f32;
    for row in 0..layout.checker_rows {
        for col in 0..layout.checker_cols {
            let scale = checker_scale(col, row, layout, phase, progress);
            let (sw, sh) = (cell_w * scale, cell_h * scale);
            let cx = cell_w * (col as f32 + 0.5);
            let cy = cell_h * (row as f32 + 0.5);
            canvas.fill_rect(cx - sw / 2.0, cy - sh / 2.0, sw, sh, colors::WIPE);
        }
    }
}
