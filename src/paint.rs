//! Geometry/Paint Function
//!
//! Pure derivation from a [`CursorState`] snapshot to the visual parameters
//! of the two layers. No hidden state: identical snapshots yield identical
//! output, so every rule here is exercisable from tests without a host.
//!
//! Thresholds come from [`PaintConfig`]; the defaults reproduce the
//! shipped feel (tight skew over text, wide skew elsewhere, trailing
//! highlight pull on links).

use crate::config::PaintConfig;
use crate::geom::{clamp, Point, Rect};
use crate::state::{CursorState, HoverKind};

/// Highlight skews at a fraction of the glyph skew.
const HIGHLIGHT_SKEW_DIVISOR: f64 = 3.0;

/// Visual parameters for one layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerParams {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width in pixels
    pub width: f64,
    /// Height in pixels
    pub height: f64,
    /// Uniform scale factor
    pub scale: f64,
    /// Skew around X, degrees
    pub skew_x: f64,
    /// Skew around Y, degrees
    pub skew_y: f64,
    /// Opacity in `[0, 1]`
    pub opacity: f64,
}

/// Full per-frame output of the paint function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    /// Body glyph parameters
    pub glyph: LayerParams,
    /// Highlight box parameters
    pub highlight: LayerParams,
}

/// Derive the frame's visual parameters from a state snapshot.
pub fn compose_frame(state: &CursorState, config: &PaintConfig) -> FrameParams {
    let hover_kind = state.hover_target.map(|target| target.kind);
    let hovering_text = hover_kind == Some(HoverKind::Text);
    let hovering_large = hover_kind == Some(HoverKind::AreaLarge);
    let hovering_small = hover_kind == Some(HoverKind::AreaSmall);

    // Tight skew range over text, wide elsewhere.
    let (ceiling, sensitivity) = if hovering_text {
        (config.text_skew_ceiling, config.text_skew_sensitivity)
    } else {
        (config.skew_ceiling, config.skew_sensitivity)
    };
    let skew_x = clamp(state.velocity.x * sensitivity, -ceiling, ceiling);
    let skew_y = clamp(state.velocity.y * sensitivity, -ceiling, ceiling);

    // The glyph is centered on the pointer.
    let glyph_pos = Point::new(
        state.position.x - state.size.width / 2.0,
        state.position.y - state.size.height / 2.0,
    );

    let captured_bounds = state.hover_target.and_then(|target| target.bounds);
    let usable_bounds = captured_bounds.filter(|bounds| !bounds.is_empty());

    let highlight_box = match usable_bounds {
        Some(bounds) if hovering_small => {
            // Bounds padded per-dimension, pulled toward the pointer by a
            // fraction of the center offset for a trailing feel.
            let pad_x = bounds.width * config.link_padding_ratio;
            let pad_y = bounds.height * config.link_padding_ratio;
            let center = bounds.center();
            let lag_x = (center.x - state.position.x) * config.link_lag;
            let lag_y = (center.y - state.position.y) * config.link_lag;
            Rect::new(
                bounds.x - pad_x - lag_x,
                bounds.y - pad_y - lag_y,
                bounds.width + pad_x * 2.0,
                bounds.height + pad_y * 2.0,
            )
        }
        _ if hovering_large => {
            let width = state.size.width * config.area_scale;
            let height = state.size.height * config.area_scale;
            Rect::new(
                state.position.x - width / 2.0,
                state.position.y - height / 2.0,
                width,
                height,
            )
        }
        // Collapsed onto the glyph; missing or zero-dimension bounds land
        // here as well.
        _ => Rect::new(
            glyph_pos.x,
            glyph_pos.y,
            state.size.width,
            state.size.height,
        ),
    };

    let glyph_scale = if state.hidden {
        0.0
    } else if hovering_large {
        config.area_glyph_scale
    } else if hovering_small {
        // The glyph fully yields to the highlight box.
        0.0
    } else {
        1.0
    };

    let highlight_opacity = if hovering_large || hovering_small {
        config.highlight_opacity
    } else {
        0.0
    };

    FrameParams {
        glyph: LayerParams {
            x: glyph_pos.x,
            y: glyph_pos.y,
            width: state.size.width,
            height: state.size.height,
            scale: glyph_scale,
            skew_x,
            skew_y,
            opacity: if state.hidden { 0.0 } else { 1.0 },
        },
        highlight: LayerParams {
            x: highlight_box.x,
            y: highlight_box.y,
            width: highlight_box.width,
            height: highlight_box.height,
            scale: 1.0,
            skew_x: skew_x / HIGHLIGHT_SKEW_DIVISOR,
            skew_y: skew_y / HIGHLIGHT_SKEW_DIVISOR,
            opacity: highlight_opacity,
        },
    }
}
