//! Host Capability Seams
//!
//! The engine never touches a real page. Element creation and destruction,
//! style application, frame scheduling, timers, and raw event delivery are
//! provided by the embedding host through the traits below - a DOM shim, a
//! compositor layer surface, or an in-memory fake for tests.
//!
//! Pattern strings inside selector sets are interpreted by the host
//! ([`Element::matches_selector`]); the engine only combines the answers.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::geom::Rect;
use crate::state::FrameTick;

/// Opaque token for one of the two overlay layers.
///
/// Allocated by the host compositor at setup; the engine never interprets
/// the raw id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerHandle(u64);

impl LayerHandle {
    /// Wrap a host-allocated layer id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The host-side id this handle was created with.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// The two visual primitives of the overlay, assigned once at setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerPair {
    /// Body cursor glyph
    pub glyph: LayerHandle,
    /// Highlight box drawn behind hovered regions
    pub highlight: LayerHandle,
}

/// A style value with its unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleValue {
    /// Pixel length
    Px(f64),
    /// Angle in degrees (skew)
    Deg(f64),
    /// Unitless scalar (scale, opacity)
    Num(f64),
    /// Literal keyword or color string
    Keyword(&'static str),
}

/// Ordered property -> value mapping applied to a layer or element.
///
/// Later entries for the same property win on the host side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StylePatch {
    entries: Vec<(&'static str, StyleValue)>,
}

impl StylePatch {
    /// Empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a property assignment.
    pub fn set(mut self, property: &'static str, value: StyleValue) -> Self {
        self.entries.push((property, value));
        self
    }

    /// All assignments in application order.
    pub fn entries(&self) -> &[(&'static str, StyleValue)] {
        &self.entries
    }

    /// Last assignment for `property`, if any.
    pub fn get(&self, property: &str) -> Option<StyleValue> {
        self.entries
            .iter()
            .rev()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| *value)
    }

    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no properties are assigned.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Single-shot cleanup token.
///
/// Runs its closure exactly once: on [`Disposer::dispose`] or on drop,
/// whichever comes first. Both sides of the platform boundary exchange
/// these - hosts return them from listener registration, the overlay
/// composes them into its teardown list.
pub struct Disposer(Option<Box<dyn FnOnce()>>);

impl Disposer {
    /// Wrap a cleanup closure.
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Some(Box::new(f)))
    }

    /// A disposer that does nothing.
    pub fn noop() -> Self {
        Self(None)
    }

    /// Run the cleanup now. Subsequent calls are no-ops.
    pub fn dispose(&mut self) {
        if let Some(f) = self.0.take() {
            f();
        }
    }
}

impl Drop for Disposer {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("armed", &self.0.is_some())
            .finish()
    }
}

/// Raw pointer events delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageEvent {
    /// Pointer moved inside the viewport
    PointerMove {
        /// X coordinate
        x: f64,
        /// Y coordinate
        y: f64,
    },
    /// Primary button pressed
    PointerDown,
    /// Primary button released
    PointerUp,
    /// Pointer re-entered the viewport at the given point
    ViewportEnter {
        /// Entry X coordinate
        x: f64,
        /// Entry Y coordinate
        y: f64,
    },
    /// Pointer left the viewport
    ViewportLeave,
    /// Body-level mouse activity - input modality is pointer
    MouseEnter,
    /// Touch sequence started - input modality is touch
    TouchStart,
}

/// Which raw events a listener wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventInterest {
    /// [`PageEvent::PointerMove`]
    PointerMove,
    /// [`PageEvent::PointerDown`] / [`PageEvent::PointerUp`]
    PointerButton,
    /// [`PageEvent::ViewportEnter`] / [`PageEvent::ViewportLeave`]
    ViewportBoundary,
    /// [`PageEvent::MouseEnter`] / [`PageEvent::TouchStart`]
    Modality,
}

/// Callback sink for raw events.
pub type EventSink = Box<dyn FnMut(&PageEvent)>;

/// Enter/leave callbacks for one observed element.
pub struct HoverSink {
    /// Pointer entered the element
    pub on_enter: Box<dyn FnMut(&ElementHandle)>,
    /// Pointer left the element
    pub on_leave: Box<dyn FnMut(&ElementHandle)>,
}

impl fmt::Debug for HoverSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HoverSink").finish_non_exhaustive()
    }
}

/// Shared handle to a host element.
pub type ElementHandle = Arc<dyn Element>;

/// Capability view of one host element.
pub trait Element {
    /// Does this element match a single selector pattern?
    fn matches_selector(&self, pattern: &str) -> bool;

    /// Bounding rectangle, if the element is laid out.
    fn bounds(&self) -> Option<Rect>;

    /// False for zero-opacity or visibility-hidden elements.
    fn is_visible(&self) -> bool;

    /// Computed font size in pixels, used for text-hover glyph sizing.
    fn font_size(&self) -> f64;

    /// Apply a transient inline style override.
    fn set_inline(&self, patch: &StylePatch);

    /// Remove previously applied inline properties.
    fn clear_inline(&self, properties: &[&str]);
}

/// Layer creation/destruction and per-frame style application.
pub trait Compositor {
    /// Create the glyph and highlight layers. The returned disposer
    /// releases both.
    fn create_layers(&self) -> Result<(LayerPair, Disposer)>;

    /// Apply a style patch to one layer.
    fn apply(&self, layer: LayerHandle, patch: &StylePatch);
}

/// Candidate enumeration and event delivery.
pub trait PageSurface {
    /// Snapshot of elements currently attached to the page.
    fn candidates(&self) -> Vec<ElementHandle>;

    /// Observe pointer enter/leave on one element. The returned disposer
    /// detaches the observation.
    fn observe_hover(&self, element: &ElementHandle, sink: HoverSink) -> Disposer;

    /// Register a raw event listener. The returned disposer removes it.
    fn add_listener(&self, interest: EventInterest, sink: EventSink) -> Disposer;

    /// True when the environment is primarily touch-driven. Seeds the
    /// modality flag at setup.
    fn prefers_touch(&self) -> bool;
}

/// Opaque one-shot timer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

impl TimerToken {
    /// Wrap a host-allocated timer id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The host-side id this token was created with.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Frame scheduling and one-shot timers.
pub trait FrameClock {
    /// Run the tick on the next display refresh. At most one tick is
    /// outstanding per store; the tick itself is a no-op after teardown.
    fn request_frame(&self, tick: FrameTick);

    /// Schedule a one-shot callback after `delay`.
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerToken;

    /// Cancel a pending timeout. Unknown or already-fired tokens are
    /// ignored.
    fn clear_timeout(&self, token: TimerToken);
}

/// Everything the overlay needs from its host.
pub trait Platform: Compositor + PageSurface + FrameClock + 'static {}

impl<T: Compositor + PageSurface + FrameClock + 'static> Platform for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_style_patch_last_assignment_wins() {
        let patch = StylePatch::new()
            .set("opacity", StyleValue::Num(0.0))
            .set("opacity", StyleValue::Num(1.0));
        assert_eq!(patch.get("opacity"), Some(StyleValue::Num(1.0)));
        assert_eq!(patch.len(), 2);
    }

    #[test]
    fn test_style_patch_missing_property() {
        let patch = StylePatch::new().set("width", StyleValue::Px(10.0));
        assert_eq!(patch.get("height"), None);
    }

    #[test]
    fn test_disposer_runs_once() {
        let count = Rc::new(Cell::new(0));
        let inner = count.clone();
        let mut disposer = Disposer::new(move || inner.set(inner.get() + 1));
        disposer.dispose();
        disposer.dispose();
        drop(disposer);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_disposer_runs_on_drop() {
        let count = Rc::new(Cell::new(0));
        let inner = count.clone();
        {
            let _disposer = Disposer::new(move || inner.set(inner.get() + 1));
        }
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_noop_disposer() {
        let mut disposer = Disposer::noop();
        disposer.dispose();
    }
}
