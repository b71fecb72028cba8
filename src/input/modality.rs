//! Input modality tracking.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

/// The kind of input that most recently drove the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputModality {
    /// Mouse or other pointing device
    Pointer,
    /// Touch contact
    Touch,
}

/// Shared modality flag.
///
/// Flips to pointer on body-level mouse activity and to touch when a touch
/// sequence starts. Consumers re-read it on every candidate event rather
/// than caching it, so a modality change takes effect immediately.
#[derive(Debug, Clone)]
pub struct ModalityFlag {
    current: Arc<Mutex<InputModality>>,
}

impl ModalityFlag {
    /// Create a flag with the given initial modality.
    pub fn new(initial: InputModality) -> Self {
        Self {
            current: Arc::new(Mutex::new(initial)),
        }
    }

    /// Current modality.
    pub fn current(&self) -> InputModality {
        *self.current.lock()
    }

    /// True while touch input is active.
    pub fn is_touch(&self) -> bool {
        self.current() == InputModality::Touch
    }

    /// Record pointer activity.
    pub fn note_pointer(&self) {
        self.set(InputModality::Pointer);
    }

    /// Record the start of a touch sequence.
    pub fn note_touch(&self) {
        self.set(InputModality::Touch);
    }

    fn set(&self, modality: InputModality) {
        let mut current = self.current.lock();
        if *current != modality {
            debug!(?modality, "input modality changed");
            *current = modality;
        }
    }
}
