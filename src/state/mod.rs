//! Cursor State Store and Render Scheduler
//!
//! Owns the canonical [`CursorState`], applies partial updates through a
//! single merge operation, and coalesces renders to one per display frame.
//!
//! Scheduling is an explicit two-state machine: `apply` moves
//! `Clean -> DirtyPending` and requests exactly one frame tick from the host
//! clock; the tick drains `DirtyPending -> Clean` and paints. Ticks hold
//! only a weak reference to the store, so a tick that fires after
//! [`StateStore::close`] (or after the overlay is dropped) is a no-op.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::geom::{Point, Rect, Size, Vector};
use crate::platform::{FrameClock, LayerPair};

/// Classification of the element currently under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverKind {
    /// Paragraphs, captions, headings
    Text,
    /// Large clickable containers
    AreaLarge,
    /// Inline links
    AreaSmall,
}

/// The active hover target, captured at hover-enter.
///
/// `bounds` is `None` for [`HoverKind::Text`] (the glyph tracks the pointer
/// directly) and holds the hovered element's rectangle for the area kinds.
/// Bounds are measured once at enter time, never per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverTarget {
    /// Which category matched
    pub kind: HoverKind,
    /// Bounds at hover-enter
    pub bounds: Option<Rect>,
}

impl HoverTarget {
    /// Text target - no bounds.
    pub fn text() -> Self {
        Self {
            kind: HoverKind::Text,
            bounds: None,
        }
    }

    /// Small area (link) target with its captured bounds.
    pub fn area_small(bounds: Option<Rect>) -> Self {
        Self {
            kind: HoverKind::AreaSmall,
            bounds,
        }
    }

    /// Large area target with its captured bounds.
    pub fn area_large(bounds: Option<Rect>) -> Self {
        Self {
            kind: HoverKind::AreaLarge,
            bounds,
        }
    }
}

/// Canonical overlay state. One instance per overlay, owned by its store;
/// all reads go through [`StateStore::snapshot`].
#[derive(Debug, Clone)]
pub struct CursorState {
    /// Current pointer position
    pub position: Point,
    /// Position at the previous sample
    pub previous_position: Point,
    /// Per-sample displacement
    pub velocity: Vector,
    /// Per-sample velocity delta. Tracked for symmetry with velocity but
    /// not consumed by the paint function.
    pub acceleration: Vector,
    /// Current glyph footprint
    pub size: Size,
    /// Pointer is outside the viewport
    pub hidden: bool,
    /// Primary button is held
    pub pressed: bool,
    /// Active hover classification - at most one at a time
    pub hover_target: Option<HoverTarget>,
    /// The two render layers, assigned once at setup
    pub layers: LayerPair,
}

impl CursorState {
    /// Initial state: origin, base glyph size, visible, idle.
    pub fn new(base_size: f64, layers: LayerPair) -> Self {
        Self {
            position: Point::default(),
            previous_position: Point::default(),
            velocity: Vector::ZERO,
            acceleration: Vector::ZERO,
            size: Size::square(base_size),
            hidden: false,
            pressed: false,
            hover_target: None,
            layers,
        }
    }
}

/// Partial update merged into the canonical state by [`StateStore::apply`].
///
/// Unset fields leave the current value untouched; `hover_target` carries a
/// nested `Option` so it can be explicitly cleared.
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    position: Option<Point>,
    previous_position: Option<Point>,
    velocity: Option<Vector>,
    acceleration: Option<Vector>,
    size: Option<Size>,
    hidden: Option<bool>,
    pressed: Option<bool>,
    hover_target: Option<Option<HoverTarget>>,
}

impl StateUpdate {
    /// Empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pointer position.
    pub fn position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    /// Set the previous-sample position.
    pub fn previous_position(mut self, position: Point) -> Self {
        self.previous_position = Some(position);
        self
    }

    /// Set the velocity.
    pub fn velocity(mut self, velocity: Vector) -> Self {
        self.velocity = Some(velocity);
        self
    }

    /// Set the acceleration.
    pub fn acceleration(mut self, acceleration: Vector) -> Self {
        self.acceleration = Some(acceleration);
        self
    }

    /// Set the glyph footprint.
    pub fn size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the offscreen flag.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    /// Set the press state.
    pub fn pressed(mut self, pressed: bool) -> Self {
        self.pressed = Some(pressed);
        self
    }

    /// Replace or clear the hover target.
    pub fn hover_target(mut self, target: Option<HoverTarget>) -> Self {
        self.hover_target = Some(target);
        self
    }

    fn merge_into(&self, state: &mut CursorState) {
        if let Some(position) = self.position {
            state.position = position;
        }
        if let Some(previous) = self.previous_position {
            state.previous_position = previous;
        }
        if let Some(velocity) = self.velocity {
            state.velocity = velocity;
        }
        if let Some(acceleration) = self.acceleration {
            state.acceleration = acceleration;
        }
        if let Some(size) = self.size {
            state.size = size;
        }
        if let Some(hidden) = self.hidden {
            state.hidden = hidden;
        }
        if let Some(pressed) = self.pressed {
            state.pressed = pressed;
        }
        if let Some(target) = self.hover_target {
            state.hover_target = target;
        }
    }
}

/// Renders one state snapshot into style patches on the host.
pub type Renderer = Box<dyn FnMut(&CursorState)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenderPhase {
    Clean,
    DirtyPending,
}

struct StoreCell {
    state: CursorState,
    phase: RenderPhase,
    closed: bool,
}

struct StoreShared {
    cell: Mutex<StoreCell>,
    renderer: Mutex<Renderer>,
}

/// Owns the canonical [`CursorState`] and coalesces renders.
#[derive(Clone)]
pub struct StateStore {
    shared: Arc<StoreShared>,
    clock: Arc<dyn FrameClock>,
}

impl StateStore {
    /// Create a store around the initial state.
    pub fn new(initial: CursorState, renderer: Renderer, clock: Arc<dyn FrameClock>) -> Self {
        Self {
            shared: Arc::new(StoreShared {
                cell: Mutex::new(StoreCell {
                    state: initial,
                    phase: RenderPhase::Clean,
                    closed: false,
                }),
                renderer: Mutex::new(renderer),
            }),
            clock,
        }
    }

    /// Merge a partial update and schedule a coalesced render.
    ///
    /// Any number of applies within one frame window produce a single
    /// render reflecting the last-applied value of every field. After
    /// [`StateStore::close`] this is a silent no-op.
    pub fn apply(&self, update: StateUpdate) {
        let mut cell = self.shared.cell.lock();
        if cell.closed {
            return;
        }
        update.merge_into(&mut cell.state);
        trace!(update = ?update, "state updated");
        let schedule = cell.phase == RenderPhase::Clean;
        if schedule {
            cell.phase = RenderPhase::DirtyPending;
        }
        drop(cell);
        if schedule {
            self.clock.request_frame(FrameTick {
                shared: Arc::downgrade(&self.shared),
            });
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> CursorState {
        self.shared.cell.lock().state.clone()
    }

    /// Invalidate the store: pending ticks and further applies become
    /// no-ops, and the renderer (with its captured layer handles) is
    /// released. Idempotent.
    pub fn close(&self) {
        let mut cell = self.shared.cell.lock();
        if cell.closed {
            return;
        }
        cell.closed = true;
        cell.phase = RenderPhase::Clean;
        drop(cell);
        *self.shared.renderer.lock() = Box::new(|_| {});
        debug!("state store closed");
    }
}

/// Host-scheduled callback that paints the latest state once per frame.
///
/// Created by [`StateStore::apply`] and handed to
/// [`FrameClock::request_frame`]. Holds only a weak reference: a tick that
/// outlives its store, or fires after [`StateStore::close`], does nothing.
pub struct FrameTick {
    shared: Weak<StoreShared>,
}

impl FrameTick {
    /// Run the scheduled render, if still valid.
    pub fn run(self) {
        let shared = match self.shared.upgrade() {
            Some(shared) => shared,
            None => return,
        };
        let snapshot = {
            let mut cell = shared.cell.lock();
            if cell.closed || cell.phase != RenderPhase::DirtyPending {
                return;
            }
            cell.phase = RenderPhase::Clean;
            cell.state.clone()
        };
        let mut renderer = shared.renderer.lock();
        (*renderer)(&snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{LayerHandle, TimerToken};
    use std::time::Duration;

    fn layers() -> LayerPair {
        LayerPair {
            glyph: LayerHandle::new(1),
            highlight: LayerHandle::new(2),
        }
    }

    /// Clock that queues ticks for manual draining.
    #[derive(Default)]
    struct ManualClock {
        ticks: Mutex<Vec<FrameTick>>,
    }

    impl ManualClock {
        fn pending(&self) -> usize {
            self.ticks.lock().len()
        }

        fn run_frame(&self) {
            let ticks = std::mem::take(&mut *self.ticks.lock());
            for tick in ticks {
                tick.run();
            }
        }
    }

    impl FrameClock for ManualClock {
        fn request_frame(&self, tick: FrameTick) {
            self.ticks.lock().push(tick);
        }

        fn set_timeout(&self, _delay: Duration, _callback: Box<dyn FnOnce()>) -> TimerToken {
            TimerToken::new(0)
        }

        fn clear_timeout(&self, _token: TimerToken) {}
    }

    fn store_with_log(clock: Arc<ManualClock>) -> (StateStore, Arc<Mutex<Vec<CursorState>>>) {
        let log: Arc<Mutex<Vec<CursorState>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        let renderer: Renderer = Box::new(move |state| sink.lock().push(state.clone()));
        let store = StateStore::new(CursorState::new(10.0, layers()), renderer, clock);
        (store, log)
    }

    #[test]
    fn test_applies_coalesce_into_one_render() {
        let clock = Arc::new(ManualClock::default());
        let (store, log) = store_with_log(clock.clone());

        store.apply(StateUpdate::new().position(Point::new(5.0, 5.0)));
        store.apply(StateUpdate::new().pressed(true));
        store.apply(StateUpdate::new().position(Point::new(9.0, 9.0)));

        assert_eq!(clock.pending(), 1);
        clock.run_frame();

        let rendered = log.lock();
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].position, Point::new(9.0, 9.0));
        assert!(rendered[0].pressed);
    }

    #[test]
    fn test_render_resets_dirty_flag() {
        let clock = Arc::new(ManualClock::default());
        let (store, log) = store_with_log(clock.clone());

        store.apply(StateUpdate::new().hidden(true));
        clock.run_frame();
        // Nothing new applied; an extra frame paints nothing.
        clock.run_frame();
        assert_eq!(log.lock().len(), 1);

        store.apply(StateUpdate::new().hidden(false));
        assert_eq!(clock.pending(), 1);
        clock.run_frame();
        assert_eq!(log.lock().len(), 2);
    }

    #[test]
    fn test_apply_after_close_is_noop() {
        let clock = Arc::new(ManualClock::default());
        let (store, log) = store_with_log(clock.clone());

        store.close();
        store.apply(StateUpdate::new().pressed(true));
        assert_eq!(clock.pending(), 0);
        clock.run_frame();
        assert!(log.lock().is_empty());
        assert!(!store.snapshot().pressed);
    }

    #[test]
    fn test_pending_tick_after_close_is_noop() {
        let clock = Arc::new(ManualClock::default());
        let (store, log) = store_with_log(clock.clone());

        store.apply(StateUpdate::new().pressed(true));
        assert_eq!(clock.pending(), 1);
        store.close();
        clock.run_frame();
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_close_is_idempotent() {
        let clock = Arc::new(ManualClock::default());
        let (store, _log) = store_with_log(clock);
        store.close();
        store.close();
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let clock = Arc::new(ManualClock::default());
        let (store, _log) = store_with_log(clock);

        store.apply(
            StateUpdate::new()
                .position(Point::new(3.0, 4.0))
                .velocity(Vector::new(1.0, 1.0)),
        );
        store.apply(StateUpdate::new().pressed(true));

        let state = store.snapshot();
        assert_eq!(state.position, Point::new(3.0, 4.0));
        assert_eq!(state.velocity, Vector::new(1.0, 1.0));
        assert!(state.pressed);
    }

    #[test]
    fn test_hover_target_replacement_is_exclusive() {
        let clock = Arc::new(ManualClock::default());
        let (store, _log) = store_with_log(clock);

        store.apply(StateUpdate::new().hover_target(Some(HoverTarget::text())));
        assert_eq!(store.snapshot().hover_target, Some(HoverTarget::text()));

        let bounds = Rect::new(0.0, 0.0, 10.0, 10.0);
        store.apply(StateUpdate::new().hover_target(Some(HoverTarget::area_large(Some(bounds)))));
        let target = store.snapshot().hover_target.unwrap();
        assert_eq!(target.kind, HoverKind::AreaLarge);

        store.apply(StateUpdate::new().hover_target(None));
        assert!(store.snapshot().hover_target.is_none());
    }

    #[test]
    fn test_tick_outliving_store_is_noop() {
        let clock = Arc::new(ManualClock::default());
        let (store, _log) = store_with_log(clock.clone());

        store.apply(StateUpdate::new().pressed(true));
        drop(store);
        // The renderer log is gone with the store; the tick must not panic.
        clock.run_frame();
    }
}
