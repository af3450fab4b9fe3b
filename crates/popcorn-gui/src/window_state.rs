//! Window geometry, restored on the next launch.
//!
//! Stored through the same `PersistedState` mechanism as the watched list,
//! under its own key.

use iced::{Point, Size};
use serde::{Deserialize, Serialize};

pub const STORAGE_KEY: &str = "windowGeometry";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub width: f32,
    pub height: f32,
    pub x: f32,
    pub y: f32,
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self {
            width: 1100.0,
            height: 720.0,
            x: -1.0,
            y: -1.0,
        }
    }
}

impl WindowGeometry {
    pub fn size(&self) -> Size {
        Size::new(self.width.max(640.0), self.height.max(400.0))
    }

    /// Saved position, if one was ever recorded.
    pub fn position(&self) -> Option<Point> {
        (self.x >= 0.0 && self.y >= 0.0).then(|| Point::new(self.x, self.y))
    }

    pub fn resized(self, size: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
            ..self
        }
    }

    pub fn moved(self, position: Point) -> Self {
        Self {
            x: position.x,
            y: position.y,
            ..self
        }
    }
}
