use serde::{Deserialize, Serialize};

use crate::common::config::{GapSettings, LayoutMode, LayoutSettings};
use crate::layout_engine::systems::LayoutSystem;
use crate::model::Rect;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MonocleLayoutSystem {
    gaps: GapSettings,
}

impl MonocleLayoutSystem {
    pub fn new(settings: &LayoutSettings) -> Self { Self { gaps: settings.gaps.clone() } }
}

impl LayoutSystem for MonocleLayoutSystem {
    fn mode(&self) -> LayoutMode { LayoutMode::Monocle }

    fn gaps(&self) -> &GapSettings { &self.gaps }

    fn calculate_layout(&self, tiling_area: Rect, count: usize) -> Vec<Rect> {
        vec![tiling_area; count]
    }
}
