//! integer pixel geometry shared by workspaces and layouts

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn max_x(&self) -> i32 { self.x + self.width }

    pub fn max_y(&self) -> i32 { self.y + self.height }

    pub fn is_empty(&self) -> bool { self.width <= 0 || self.height <= 0 }

    /// Shrinks the rect by the given edge insets. The result never has a
    /// negative size.
    pub fn inset(&self, top: i32, left: i32, bottom: i32, right: i32) -> Rect {
        Rect {
            x: self.x + left,
            y: self.y + top,
            width: (self.width - left - right).max(0),
            height: (self.height - top - bottom).max(0),
        }
    }

    /// Splits the rect into `count` cells along one axis, separated by `gap`.
    ///
    /// Cells have integer sizes and the leftover pixels go to the last one,
    /// so the cells plus gaps exactly cover the original rect.
    pub fn split(&self, count: usize, gap: i32, horizontal: bool) -> Vec<Rect> {
        if count == 0 {
            return Vec::new();
        }
        let total = if horizontal { self.width } else { self.height };
        let gaps = gap * (count as i32 - 1);
        let available = (total - gaps).max(0);
        let cell = available / count as i32;

        let mut out = Vec::with_capacity(count);
        let mut offset = 0;
        for i in 0..count {
            let size = if i + 1 == count { available - cell * i as i32 } else { cell };
            let rect = if horizontal {
                Rect::new(self.x + offset, self.y, size, self.height)
            } else {
                Rect::new(self.x, self.y + offset, self.width, size)
            };
            out.push(rect);
            offset += size + gap;
        }
        out
    }

    /// Cuts the rect in two along one axis at `ratio`, leaving `gap` pixels
    /// between the halves.
    pub fn split_at_ratio(&self, ratio: f64, gap: i32, horizontal: bool) -> (Rect, Rect) {
        let total = if horizontal { self.width } else { self.height };
        let available = (total - gap).max(0);
        let first = ((available as f64) * ratio.clamp(0.0, 1.0)).round() as i32;
        let second = available - first;
        if horizontal {
            (
                Rect::new(self.x, self.y, first, self.height),
                Rect::new(self.x + first + gap, self.y, second, self.height),
            )
        } else {
            (
                Rect::new(self.x, self.y, self.width, first),
                Rect::new(self.x, self.y + first + gap, self.width, second),
            )
        }
    }
}
