//! Interfaces the host environment implements for the engine.

use serde::{Deserialize, Serialize};

use super::{EngineError, LayoutCommand};
use crate::layout_engine::RelDirection;
use crate::model::{ManagedWindow, Rect, Surface, Window};

/// Live compositor state: desktops, screens, activities and geometry.
pub trait WorkspaceProvider {
    fn desktop_count(&self) -> u32;
    fn screen_count(&self) -> u32;
    fn current_desktop(&self) -> u32;
    fn current_activity(&self) -> String;
    fn active_screen(&self) -> u32;

    /// The placement area of the surface, i.e. the screen minus panels and
    /// other reserved strips.
    fn working_area(&self, surface: &Surface) -> Result<Rect, EngineError>;

    fn snapshot(&self) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            desktop_count: self.desktop_count(),
            screen_count: self.screen_count(),
            current_desktop: self.current_desktop(),
            current_activity: self.current_activity(),
            active_screen: self.active_screen(),
        }
    }
}

/// Owner of every managed window.
pub trait WindowRegistry {
    type Window: Window;

    fn add(&mut self, window: Self::Window) -> ManagedWindow<Self::Window>;
    fn remove(&mut self, window: &Self::Window);
    fn active_window(&self) -> Option<Self::Window>;

    /// Windows shown on `surface`, in stable registry order.
    fn visible_windows_on(&self, surface: &Surface) -> Vec<Self::Window>;

    /// Whether a managed window takes part in tiling. Registries that track
    /// floating windows answer `false` for them.
    fn is_tileable(&self, _window: &Self::Window) -> bool { true }
}

/// Owner of the layout bound to each surface.
pub trait LayoutRegistry {
    type Layout: TilingLayout;

    fn layout_on_surface(&mut self, surface: &Surface) -> Result<&mut Self::Layout, EngineError>;

    /// Swaps the surface's layout for the neighbouring kind. Returns whether
    /// anything changed; registries with a single kind never change.
    fn cycle_layout(
        &mut self,
        _surface: &Surface,
        _direction: RelDirection,
    ) -> Result<bool, EngineError> {
        Ok(false)
    }
}

pub trait TilingLayout {
    /// Area actually filled with windows, derived from the working area.
    fn tiling_area(&self, working_area: Rect) -> Rect;

    /// Places `windows` inside `tiling_area`.
    fn apply<W: Window>(&mut self, tiling_area: Rect, windows: &[W]);

    /// Reacts to a layout specific command. Returns whether the layout state
    /// changed.
    fn handle_command(&mut self, _command: &LayoutCommand) -> bool { false }
}

/// Workspace state read once at the start of an engine operation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WorkspaceSnapshot {
    pub desktop_count: u32,
    pub screen_count: u32,
    pub current_desktop: u32,
    pub current_activity: String,
    pub active_screen: u32,
}

impl WorkspaceSnapshot {
    /// Number of surfaces `all_surfaces` yields.
    pub fn surface_count(&self) -> usize { self.desktop_count as usize * self.screen_count as usize }

    /// Every desktop on every screen, desktop-major.
    pub fn all_surfaces(&self) -> Vec<Surface> {
        let mut out = Vec::with_capacity(self.surface_count());
        for desktop in 1..=self.desktop_count {
            for screen in 0..self.screen_count {
                out.push(Surface::new(desktop, screen, self.current_activity.clone()));
            }
        }
        out
    }

    /// The current desktop on every screen.
    pub fn visible_surfaces(&self) -> Vec<Surface> {
        (0..self.screen_count)
            .map(|screen| {
                Surface::new(self.current_desktop, screen, self.current_activity.clone())
            })
            .collect()
    }

    pub fn active_surface(&self) -> Surface {
        Surface::new(
            self.current_desktop,
            self.active_screen,
            self.current_activity.clone(),
        )
    }
}
