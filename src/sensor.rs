//! Visibility sensor for the last card of the roster.
//!
//! The sensor is the terminal counterpart of an intersection observer: it
//! watches one card index and reports when that card's grid row enters the
//! viewport (plus [`PREFETCH_ROWS`]). There is exactly one sensor; observing a
//! new target supersedes the previous one, and a disconnected sensor never
//! fires.

use serde::{Deserialize, Serialize};

use crate::layout::{GridGeometry, PREFETCH_ROWS};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilitySensor {
    target: Option<usize>,
    connected: bool,
    armed: bool,
}

impl Default for VisibilitySensor {
    fn default() -> Self {
        Self {
            target: None,
            connected: false,
            armed: true,
        }
    }
}

impl VisibilitySensor {
    /// Watch `target`, replacing any previous target. `None` watches nothing.
    pub fn observe(&mut self, target: Option<usize>) {
        self.target = target;
        self.connected = true;
    }

    /// Stop watching. The sensor stays silent until the next `observe`.
    pub fn disconnect(&mut self) {
        self.target = None;
        self.connected = false;
    }

    /// Suppress firing until [`arm`](Self::arm) is called again.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn target(&self) -> Option<usize> {
        self.target
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Whether the watched card sits inside the viewport starting at `scroll_row`.
    pub fn is_intersecting(&self, geometry: &GridGeometry, scroll_row: usize) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        let row = geometry.row_of(target);
        row >= scroll_row && row < scroll_row + geometry.visible_rows + PREFETCH_ROWS
    }

    /// Whether the sensor should fire now.
    pub fn poll(&self, geometry: &GridGeometry, scroll_row: usize) -> bool {
        self.connected && self.armed && self.is_intersecting(geometry, scroll_row)
    }
}
