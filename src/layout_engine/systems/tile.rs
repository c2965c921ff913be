use serde::{Deserialize, Serialize};

use crate::common::config::{GapSettings, LayoutMode, LayoutSettings};
use crate::engine::LayoutCommand;
use crate::layout_engine::systems::LayoutSystem;
use crate::model::Rect;

const MASTER_RATIO_STEP: f64 = 0.05;

/// Master column on the left, remaining windows stacked on the right.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TileLayoutSystem {
    master_ratio: f64,
    master_count: usize,
    gaps: GapSettings,
}

impl TileLayoutSystem {
    pub fn new(settings: &LayoutSettings) -> Self {
        Self {
            master_ratio: LayoutSettings::clamp_master_ratio(settings.master_ratio),
            master_count: settings.master_count,
            gaps: settings.gaps.clone(),
        }
    }

    pub fn master_ratio(&self) -> f64 { self.master_ratio }

    pub fn master_count(&self) -> usize { self.master_count }

    fn resize_master(&mut self, delta: f64) -> bool {
        let ratio = LayoutSettings::clamp_master_ratio(self.master_ratio + delta);
        let changed = (ratio - self.master_ratio).abs() > f64::EPSILON;
        self.master_ratio = ratio;
        changed
    }
}

impl LayoutSystem for TileLayoutSystem {
    fn mode(&self) -> LayoutMode { LayoutMode::Tile }

    fn gaps(&self) -> &GapSettings { &self.gaps }

    fn calculate_layout(&self, tiling_area: Rect, count: usize) -> Vec<Rect> {
        let masters = self.master_count.min(count);
        let stacked = count - masters;
        let vertical_gap = self.gaps.inner.vertical;

        if masters == 0 || stacked == 0 {
            return tiling_area.split(count, vertical_gap, false);
        }

        let (master_area, stack_area) =
            tiling_area.split_at_ratio(self.master_ratio, self.gaps.inner.horizontal, true);
        let mut frames = master_area.split(masters, vertical_gap, false);
        frames.extend(stack_area.split(stacked, vertical_gap, false));
        frames
    }

    fn handle_command(&mut self, command: &LayoutCommand) -> bool {
        match command {
            LayoutCommand::IncreaseMasterRatio => self.resize_master(MASTER_RATIO_STEP),
            LayoutCommand::DecreaseMasterRatio => self.resize_master(-MASTER_RATIO_STEP),
            LayoutCommand::IncreaseMasterCount => {
                self.master_count += 1;
                true
            }
            LayoutCommand::DecreaseMasterCount => {
                if self.master_count == 0 {
                    return false;
                }
                self.master_count -= 1;
                true
            }
            _ => false,
        }
    }
}
