use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use crate::common::config::{GapSettings, LayoutMode, LayoutSettings};
use crate::engine::{LayoutCommand, TilingLayout};
use crate::layout_engine::utils::compute_tiling_area;
use crate::model::{Rect, Window};

slotmap::new_key_type! { pub struct LayoutId; }

/// Geometry of one layout kind. An instance belongs to a single surface and
/// keeps that surface's layout state.
#[enum_dispatch]
pub trait LayoutSystem {
    fn mode(&self) -> LayoutMode;

    fn gaps(&self) -> &GapSettings;

    /// Frames for `count` windows, in window order.
    fn calculate_layout(&self, tiling_area: Rect, count: usize) -> Vec<Rect>;

    fn handle_command(&mut self, _command: &LayoutCommand) -> bool { false }
}

mod columns;
pub use columns::ColumnsLayoutSystem;
mod monocle;
pub use monocle::MonocleLayoutSystem;
mod tile;
pub use tile::TileLayoutSystem;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[enum_dispatch(LayoutSystem)]
pub enum LayoutSystemKind {
    Tile(TileLayoutSystem),
    Monocle(MonocleLayoutSystem),
    Columns(ColumnsLayoutSystem),
}

impl LayoutSystemKind {
    pub fn new(mode: LayoutMode, settings: &LayoutSettings) -> Self {
        match mode {
            LayoutMode::Tile => TileLayoutSystem::new(settings).into(),
            LayoutMode::Monocle => MonocleLayoutSystem::new(settings).into(),
            LayoutMode::Columns => ColumnsLayoutSystem::new(settings).into(),
        }
    }
}

impl TilingLayout for LayoutSystemKind {
    fn tiling_area(&self, working_area: Rect) -> Rect {
        compute_tiling_area(working_area, self.gaps())
    }

    fn apply<W: Window>(&mut self, tiling_area: Rect, windows: &[W]) {
        let frames = self.calculate_layout(tiling_area, windows.len());
        for (window, frame) in windows.iter().zip(frames) {
            window.set_frame(frame);
        }
    }

    fn handle_command(&mut self, command: &LayoutCommand) -> bool {
        LayoutSystem::handle_command(self, command)
    }
}
