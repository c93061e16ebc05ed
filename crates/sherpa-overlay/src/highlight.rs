//! Target highlight geometry.
//!
//! The highlight is a set of concentric glow rings around the target
//! rectangle, breathing with a pulse phase. This module only computes
//! geometry and alphas; the host paints the rings on an input-transparent
//! layer. There is deliberately no full-screen scrim: everything outside the
//! rings stays untouched, visible, and clickable.

use std::time::Duration;

use sherpa_core::Rect;
use sherpa_core::tutorial::DEFAULT_HIGHLIGHT_COLOR;

/// Appearance of the highlight glow.
#[derive(Debug, Clone)]
pub struct HighlightStyle {
    /// Ring color (CSS hex string).
    pub color: String,
    /// Number of concentric rings.
    pub ring_count: u32,
    /// Gap between successive rings, in pixels.
    pub ring_gap: i32,
    /// Gap between the target and the innermost ring.
    pub base_offset: i32,
    /// Full breathe-in/breathe-out cycle length.
    pub pulse_period: Duration,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_HIGHLIGHT_COLOR.into(),
            ring_count: 3,
            ring_gap: 4,
            base_offset: 2,
            pulse_period: Duration::from_millis(1200),
        }
    }
}

/// One glow ring: a border rectangle and its opacity.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    pub rect: Rect,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
}

/// Everything the host needs to paint one pulse frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightFrame {
    pub color: String,
    /// Innermost ring first.
    pub rings: Vec<Ring>,
}

/// Pulse phase in `[0, 1)` for the given elapsed time.
#[must_use]
pub fn pulse_phase(elapsed: Duration, period: Duration) -> f32 {
    if period.is_zero() {
        return 0.0;
    }
    let ratio = elapsed.as_secs_f64() / period.as_secs_f64();
    ratio.fract() as f32
}

/// Compute the rings for one frame.
///
/// `phase` runs `0 -> 1` over one pulse period; the rings breathe outward on
/// a triangle wave so the animation is symmetric and loop-seamless.
#[must_use]
pub fn frame(target: Rect, style: &HighlightStyle, phase: f32) -> HighlightFrame {
    let wave = 1.0 - (2.0 * phase.clamp(0.0, 1.0) - 1.0).abs();
    let breathe = (wave * style.ring_gap as f32).round() as i32;

    let count = style.ring_count.max(1);
    let mut rings = Vec::with_capacity(count as usize);
    for i in 0..count {
        let offset = style.base_offset + (i as i32) * style.ring_gap + breathe;
        let fade = 1.0 - i as f32 / count as f32;
        rings.push(Ring {
            rect: target.expand(offset),
            alpha: (fade * (0.45 + 0.55 * wave)).clamp(0.0, 1.0),
        });
    }

    HighlightFrame {
        color: style.color.clone(),
        rings,
    }
}
