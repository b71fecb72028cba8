//! Selector-bound enter/leave observation and classification.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::config::HoverConfig;
use crate::geom::{clamp, Size};
use crate::input::ModalityFlag;
use crate::platform::{
    Disposer, EventInterest, HoverSink, PageSurface, StylePatch, StyleValue,
};
use crate::state::{HoverTarget, StateStore, StateUpdate};

/// Accent applied to hovered links, cleared on leave.
const LINK_ACCENT_COLOR: &str = "#f25410";

/// Children of anchors are made inert so the anchor itself receives
/// enter/leave.
const LINK_DESCENDANT_PATTERN: &str = "a *";

/// Binds hover observation to matching elements and classifies targets.
///
/// Bindings are rebuilt wholesale on [`HoverEngine::refresh`], never
/// partially patched. All enter/leave handling re-reads the modality flag,
/// so touch interaction suppresses detection without a rebind.
pub struct HoverEngine {
    shared: Arc<EngineShared>,
}

struct EngineShared {
    page: Arc<dyn PageSurface>,
    store: StateStore,
    modality: ModalityFlag,
    config: HoverConfig,
    base_size: f64,
    bindings: Mutex<Vec<Disposer>>,
    /// One-shot reset armed after each unbind; fires on the next pointer
    /// move to cover elements removed or reclassified mid-hover.
    armed_reset: Mutex<Option<Disposer>>,
}

impl HoverEngine {
    /// Create the engine and bind the current page contents.
    pub(crate) fn new(
        page: Arc<dyn PageSurface>,
        store: StateStore,
        modality: ModalityFlag,
        config: HoverConfig,
        base_size: f64,
    ) -> Self {
        let engine = Self {
            shared: Arc::new(EngineShared {
                page,
                store,
                modality,
                config,
                base_size,
                bindings: Mutex::new(Vec::new()),
                armed_reset: Mutex::new(None),
            }),
        };
        engine.bind();
        engine
    }

    /// Re-derive the match set and rebind after host page mutations.
    pub fn refresh(&self) {
        debug!("refreshing hover targets");
        self.unbind();
        self.bind();
    }

    /// Detach all bindings and any armed reset. Safe to call twice.
    pub(crate) fn shutdown(&self) {
        let mut bindings = self.shared.bindings.lock();
        for mut binding in bindings.drain(..) {
            binding.dispose();
        }
        drop(bindings);
        if let Some(mut armed) = self.shared.armed_reset.lock().take() {
            armed.dispose();
        }
    }

    fn bind(&self) {
        let candidates = self.shared.page.candidates();

        for element in &candidates {
            if element.matches_selector(LINK_DESCENDANT_PATTERN) {
                element.set_inline(
                    &StylePatch::new().set("pointer-events", StyleValue::Keyword("none")),
                );
            }
        }

        let mut bindings = self.shared.bindings.lock();
        for element in candidates {
            if self.shared.config.text.matches(element.as_ref()) {
                bindings.push(self.shared.page.observe_hover(&element, self.text_sink()));
            }
            if self.shared.config.link.matches(element.as_ref()) {
                bindings.push(self.shared.page.observe_hover(&element, self.link_sink()));
            }
            if self.shared.config.area.matches(element.as_ref()) {
                bindings.push(self.shared.page.observe_hover(&element, self.area_sink()));
            }
        }
        trace!(bound = bindings.len(), "hover bindings attached");
    }

    fn unbind(&self) {
        let mut bindings = self.shared.bindings.lock();
        for mut binding in bindings.drain(..) {
            binding.dispose();
        }
        drop(bindings);
        self.arm_reset();
    }

    /// The element hovered before the rebind may be gone; force a clean
    /// slate on the next movement.
    fn arm_reset(&self) {
        let store = self.shared.store.clone();
        let base = self.shared.base_size;
        let fired = Arc::new(AtomicBool::new(false));
        let guard = self.shared.page.add_listener(
            EventInterest::PointerMove,
            Box::new(move |_event| {
                if fired.swap(true, Ordering::SeqCst) {
                    return;
                }
                store.apply(
                    StateUpdate::new()
                        .size(Size::square(base))
                        .hover_target(None),
                );
            }),
        );
        *self.shared.armed_reset.lock() = Some(guard);
    }

    fn text_sink(&self) -> HoverSink {
        let enter = self.shared.clone();
        let leave = self.shared.clone();
        HoverSink {
            on_enter: Box::new(move |element| {
                if enter.modality.is_touch() {
                    return;
                }
                // Logically present but visually absent elements would
                // flicker the text cursor; skip them.
                if !element.is_visible() {
                    return;
                }
                let font_size = element.font_size();
                let width = clamp(
                    font_size * enter.config.text_width_ratio,
                    enter.config.text_min_width,
                    enter.config.text_max_width,
                );
                trace!(font_size, "text hover enter");
                enter.store.apply(
                    StateUpdate::new()
                        .size(Size::new(width, font_size))
                        .hover_target(Some(HoverTarget::text())),
                );
            }),
            on_leave: Box::new(move |_element| {
                if leave.modality.is_touch() {
                    return;
                }
                leave.store.apply(
                    StateUpdate::new()
                        .size(Size::square(leave.base_size))
                        .hover_target(None),
                );
            }),
        }
    }

    fn link_sink(&self) -> HoverSink {
        let enter = self.shared.clone();
        let leave = self.shared.clone();
        HoverSink {
            on_enter: Box::new(move |element| {
                if enter.modality.is_touch() {
                    return;
                }
                let bounds = element.bounds();
                element.set_inline(
                    &StylePatch::new()
                        .set("color", StyleValue::Keyword(LINK_ACCENT_COLOR))
                        .set("cursor", StyleValue::Keyword("none")),
                );
                trace!(?bounds, "link hover enter");
                enter.store.apply(
                    StateUpdate::new()
                        .size(Size::square(enter.base_size))
                        .hover_target(Some(HoverTarget::area_small(bounds))),
                );
            }),
            on_leave: Box::new(move |element| {
                if leave.modality.is_touch() {
                    return;
                }
                element.clear_inline(&["color", "cursor"]);
                leave
                    .store
                    .apply(StateUpdate::new().hover_target(None));
            }),
        }
    }

    fn area_sink(&self) -> HoverSink {
        let enter = self.shared.clone();
        let leave = self.shared.clone();
        HoverSink {
            on_enter: Box::new(move |element| {
                if enter.modality.is_touch() {
                    return;
                }
                let bounds = element.bounds();
                trace!(?bounds, "area hover enter");
                enter.store.apply(
                    StateUpdate::new().hover_target(Some(HoverTarget::area_large(bounds))),
                );
            }),
            on_leave: Box::new(move |_element| {
                if leave.modality.is_touch() {
                    return;
                }
                leave
                    .store
                    .apply(StateUpdate::new().hover_target(None));
            }),
        }
    }
}
