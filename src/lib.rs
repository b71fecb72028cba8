//! # lamco-cursor-overlay
//!
//! Reactive cursor overlay engine. Replaces the host surface's native
//! pointer indicator with two custom-rendered primitives - a body glyph and
//! a highlight box - that react to pointer motion, hover context, and press
//! state.
//!
//! The engine is host-agnostic: element access, style application, frame
//! scheduling, and raw event delivery go through the capability traits in
//! [`platform`]. A DOM shim, a compositor layer surface, and an in-memory
//! test fake are all valid hosts.
//!
//! # Architecture
//!
//! ```text
//! raw host events
//!   ├─> Motion Tracker   (velocity / idle / offscreen / press)
//!   ├─> Hover Engine     (selector sets -> hover target + bounds)
//!   └─> Modality Flag    (pointer vs touch, gates both trackers)
//!            ↓
//!       State Store      (partial-update merge + dirty flag)
//!            ↓
//!       Frame Tick       (one coalesced render per display refresh)
//!            ↓
//!       Paint Function   (pure: state -> glyph + highlight parameters)
//!            ↓
//!       Host Compositor  (style patches applied to the two layers)
//! ```
//!
//! # Data Flow
//!
//! **Input Path:** host events -> observers -> `StateStore::apply`
//!
//! **Render Path:** dirty store -> frame tick -> `compose_frame` -> style
//! patches -> host layers
//!
//! Renders coalesce: any number of state mutations within one frame window
//! produce a single paint reflecting the last-applied value of every field.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod geom;
pub mod hover;
pub mod input;
pub mod overlay;
pub mod paint;
pub mod platform;
pub mod state;

pub use config::OverlayConfig;
pub use error::{OverlayError, Result};
pub use overlay::CursorOverlay;
pub use state::{CursorState, HoverKind, HoverTarget};
