use serde::{Deserialize, Serialize};

use crate::common::config::{GapSettings, LayoutMode, LayoutSettings};
use crate::layout_engine::Orientation;
use crate::layout_engine::systems::LayoutSystem;
use crate::model::Rect;

/// Equal columns, or equal rows when vertical.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ColumnsLayoutSystem {
    orientation: Orientation,
    gaps: GapSettings,
}

impl ColumnsLayoutSystem {
    pub fn new(settings: &LayoutSettings) -> Self {
        Self {
            orientation: settings.columns_orientation,
            gaps: settings.gaps.clone(),
        }
    }
}

impl LayoutSystem for ColumnsLayoutSystem {
    fn mode(&self) -> LayoutMode { LayoutMode::Columns }

    fn gaps(&self) -> &GapSettings { &self.gaps }

    fn calculate_layout(&self, tiling_area: Rect, count: usize) -> Vec<Rect> {
        let horizontal = self.orientation.is_horizontal();
        let gap = if horizontal {
            self.gaps.inner.horizontal
        } else {
            self.gaps.inner.vertical
        };
        tiling_area.split(count, gap, horizontal)
    }
}
