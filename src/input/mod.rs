//! Raw Input Observation
//!
//! Translates host-delivered pointer events into partial state updates:
//! movement with derived velocity and an idle reset, viewport
//! enter/leave, and press state. A shared modality flag suppresses all
//! pointer-only behavior while touch input is active.
//!
//! Each observer owns its own listener lifecycle and returns a single
//! disposer; the lifecycle controller composes them into an explicit
//! teardown list.

mod modality;
mod motion;

pub use modality::{InputModality, ModalityFlag};

pub(crate) use motion::{observe_modality, observe_moves, observe_press, observe_viewport};
