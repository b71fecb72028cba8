//! Lifecycle Controller
//!
//! Wires the state store, hover engine, and motion observers together
//! against a host platform, and owns the teardown list. One
//! [`CursorOverlay`] per host surface; instances are independent and can
//! coexist.

use std::sync::Arc;

use tracing::info;

use crate::config::OverlayConfig;
use crate::error::{OverlayError, Result};
use crate::hover::HoverEngine;
use crate::input::{self, InputModality, ModalityFlag};
use crate::paint::{compose_frame, LayerParams};
use crate::platform::{
    Compositor, Disposer, FrameClock, PageSurface, Platform, StylePatch, StyleValue,
};
use crate::state::{CursorState, StateStore};

/// A live cursor overlay.
///
/// Created by [`CursorOverlay::setup`]; torn down by
/// [`CursorOverlay::cleanup`] or on drop.
pub struct CursorOverlay {
    store: StateStore,
    hover: HoverEngine,
    guards: Vec<Disposer>,
    layers: Option<Disposer>,
    torn_down: bool,
}

impl CursorOverlay {
    /// Initialize state, create the two layers, and bind all observers.
    pub fn setup<P: Platform>(platform: Arc<P>, config: OverlayConfig) -> Result<CursorOverlay> {
        config
            .validate()
            .map_err(|err| OverlayError::Config(err.to_string()))?;

        let compositor: Arc<dyn Compositor> = platform.clone();
        let page: Arc<dyn PageSurface> = platform.clone();
        let clock: Arc<dyn FrameClock> = platform.clone();

        let (layers, layer_disposer) = compositor.create_layers()?;

        let paint_config = config.paint.clone();
        let paint_target = compositor.clone();
        let renderer = Box::new(move |state: &CursorState| {
            let frame = compose_frame(state, &paint_config);
            paint_target.apply(state.layers.glyph, &glyph_patch(&frame.glyph));
            paint_target.apply(state.layers.highlight, &highlight_patch(&frame.highlight));
        });

        let store = StateStore::new(
            CursorState::new(config.base_size, layers),
            renderer,
            clock.clone(),
        );

        let initial = if page.prefers_touch() {
            InputModality::Touch
        } else {
            InputModality::Pointer
        };
        let modality = ModalityFlag::new(initial);

        let hover = HoverEngine::new(
            page.clone(),
            store.clone(),
            modality.clone(),
            config.hover.clone(),
            config.base_size,
        );

        let mut guards = Vec::new();
        guards.push(input::observe_modality(&page, &modality));
        guards.push(input::observe_moves(
            &page,
            &clock,
            &store,
            &modality,
            &config.motion,
        ));
        guards.push(input::observe_viewport(&page, &store, &modality));
        guards.push(input::observe_press(&page, &store, &modality));

        info!("cursor overlay ready");
        Ok(CursorOverlay {
            store,
            hover,
            guards,
            layers: Some(layer_disposer),
            torn_down: false,
        })
    }

    /// Re-bind hover targets after host page mutations.
    pub fn refresh(&self) {
        self.hover.refresh();
    }

    /// Tear down listeners, invalidate pending renders, release the
    /// layers. Safe to call more than once.
    pub fn cleanup(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        // Reverse registration order: observers first, then hover
        // bindings, then the store, then the layers.
        while let Some(mut guard) = self.guards.pop() {
            guard.dispose();
        }
        self.hover.shutdown();
        self.store.close();
        if let Some(mut layers) = self.layers.take() {
            layers.dispose();
        }
        info!("cursor overlay torn down");
    }

    /// Read-only copy of the current state, for embedders that mirror
    /// overlay state elsewhere.
    pub fn snapshot(&self) -> CursorState {
        self.store.snapshot()
    }
}

impl Drop for CursorOverlay {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn glyph_patch(params: &LayerParams) -> StylePatch {
    StylePatch::new()
        .set("x", StyleValue::Px(params.x))
        .set("y", StyleValue::Px(params.y))
        .set("width", StyleValue::Px(params.width))
        .set("height", StyleValue::Px(params.height))
        .set("scale-x", StyleValue::Num(params.scale))
        .set("scale-y", StyleValue::Num(params.scale))
        .set("skew-x", StyleValue::Deg(params.skew_x))
        .set("skew-y", StyleValue::Deg(params.skew_y))
        .set("opacity", StyleValue::Num(params.opacity))
}

fn highlight_patch(params: &LayerParams) -> StylePatch {
    StylePatch::new()
        .set("x", StyleValue::Px(params.x))
        .set("y", StyleValue::Px(params.y))
        .set("width", StyleValue::Px(params.width))
        .set("height", StyleValue::Px(params.height))
        .set("skew-x", StyleValue::Deg(params.skew_x))
        .set("skew-y", StyleValue::Deg(params.skew_y))
        .set("opacity", StyleValue::Num(params.opacity))
}
