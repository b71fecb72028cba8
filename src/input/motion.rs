//! Pointer motion observers: movement/idle, viewport boundary, press.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::trace;

use crate::config::MotionConfig;
use crate::geom::{Point, Vector};
use crate::input::ModalityFlag;
use crate::platform::{
    Disposer, EventInterest, FrameClock, PageEvent, PageSurface, TimerToken,
};
use crate::state::{StateStore, StateUpdate};

/// Observe pointer movement, deriving velocity, acceleration, and the
/// idle reset.
///
/// Velocity is the displacement from the previous sample. After the idle
/// timeout passes with no further movement the velocity snaps to zero and
/// the previous position catches up - a distinct signal from a
/// zero-distance move.
pub(crate) fn observe_moves(
    page: &Arc<dyn PageSurface>,
    clock: &Arc<dyn FrameClock>,
    store: &StateStore,
    modality: &ModalityFlag,
    config: &MotionConfig,
) -> Disposer {
    let store = store.clone();
    let modality = modality.clone();
    let clock = clock.clone();
    let idle_delay = Duration::from_millis(config.idle_timeout_ms);
    let pending: Arc<Mutex<Option<TimerToken>>> = Arc::new(Mutex::new(None));

    let pending_in = pending.clone();
    let clock_in = clock.clone();
    let listener = page.add_listener(
        EventInterest::PointerMove,
        Box::new(move |event| {
            if let PageEvent::PointerMove { x, y } = *event {
                if modality.is_touch() {
                    return;
                }
                let previous = store.snapshot();
                let position = Point::new(x, y);
                let velocity = position.delta_from(previous.position);
                let acceleration = Vector::new(
                    velocity.x - previous.velocity.x,
                    velocity.y - previous.velocity.y,
                );
                store.apply(
                    StateUpdate::new()
                        .previous_position(previous.position)
                        .position(position)
                        .velocity(velocity)
                        .acceleration(acceleration),
                );

                // Re-arm the idle reset.
                if let Some(token) = pending_in.lock().take() {
                    clock_in.clear_timeout(token);
                }
                let idle_store = store.clone();
                let token = clock_in.set_timeout(
                    idle_delay,
                    Box::new(move || {
                        let current = idle_store.snapshot();
                        idle_store.apply(
                            StateUpdate::new()
                                .previous_position(current.position)
                                .velocity(Vector::ZERO),
                        );
                        trace!("pointer idle");
                    }),
                );
                *pending_in.lock() = Some(token);
            }
        }),
    );

    Disposer::new(move || {
        drop(listener);
        if let Some(token) = pending.lock().take() {
            clock.clear_timeout(token);
        }
    })
}

/// Observe the pointer leaving and re-entering the viewport.
pub(crate) fn observe_viewport(
    page: &Arc<dyn PageSurface>,
    store: &StateStore,
    modality: &ModalityFlag,
) -> Disposer {
    let store = store.clone();
    let modality = modality.clone();
    page.add_listener(
        EventInterest::ViewportBoundary,
        Box::new(move |event| {
            if modality.is_touch() {
                return;
            }
            match *event {
                PageEvent::ViewportLeave => {
                    trace!("pointer left viewport");
                    store.apply(StateUpdate::new().hidden(true));
                }
                PageEvent::ViewportEnter { x, y } => {
                    store.apply(
                        StateUpdate::new()
                            .position(Point::new(x, y))
                            .hidden(false),
                    );
                }
                _ => {}
            }
        }),
    )
}

/// Observe primary-button press and release.
pub(crate) fn observe_press(
    page: &Arc<dyn PageSurface>,
    store: &StateStore,
    modality: &ModalityFlag,
) -> Disposer {
    let store = store.clone();
    let modality = modality.clone();
    page.add_listener(
        EventInterest::PointerButton,
        Box::new(move |event| {
            if modality.is_touch() {
                return;
            }
            match *event {
                PageEvent::PointerDown => store.apply(StateUpdate::new().pressed(true)),
                PageEvent::PointerUp => store.apply(StateUpdate::new().pressed(false)),
                _ => {}
            }
        }),
    )
}

/// Keep the shared modality flag in sync with body-level input events.
pub(crate) fn observe_modality(page: &Arc<dyn PageSurface>, modality: &ModalityFlag) -> Disposer {
    let modality = modality.clone();
    page.add_listener(
        EventInterest::Modality,
        Box::new(move |event| match *event {
            PageEvent::MouseEnter => modality.note_pointer(),
            PageEvent::TouchStart => modality.note_touch(),
            _ => {}
        }),
    )
}
