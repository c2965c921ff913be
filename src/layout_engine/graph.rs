use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn is_horizontal(self) -> bool { matches!(self, Orientation::Horizontal) }

    pub fn flip(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// Direction of travel through an ordered, wrapping sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelDirection {
    Next,
    Previous,
}

impl RelDirection {
    /// Steps from `index` within a sequence of `len` items, wrapping at both
    /// ends. `len` must be non-zero.
    pub fn step(self, index: usize, len: usize) -> usize {
        debug_assert!(len > 0 && index < len);
        match self {
            RelDirection::Next => (index + 1) % len,
            RelDirection::Previous => (index + len - 1) % len,
        }
    }
}
