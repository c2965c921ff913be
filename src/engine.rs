//! Coordinates window admission, per-surface arrangement and focus cycling.
//!
//! The engine owns no windows and no layouts. Every operation reads the
//! workspace state once, then talks to the window registry and the layout
//! registry, which are the sole owners of their data.

mod error;
mod host;
#[cfg(test)]
mod tests;

use std::sync::Arc;

pub use error::EngineError;
pub use host::{LayoutRegistry, TilingLayout, WindowRegistry, WorkspaceProvider, WorkspaceSnapshot};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace, warn};

use crate::layout_engine::RelDirection;
use crate::model::{Surface, Window};

#[non_exhaustive]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LayoutCommand {
    FocusNext,
    FocusPrevious,
    NextLayout,
    PreviousLayout,
    IncreaseMasterRatio,
    DecreaseMasterRatio,
    IncreaseMasterCount,
    DecreaseMasterCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Docks, panels and other shell surfaces.
    Special,
    Dialog,
    /// Kept above at creation time, which launchers and popups do.
    KeepAbove,
}

impl RejectReason {
    fn for_window(window: &impl Window) -> Option<Self> {
        if window.special_window() {
            Some(RejectReason::Special)
        } else if window.dialog() {
            Some(RejectReason::Dialog)
        } else if window.keep_above() {
            Some(RejectReason::KeepAbove)
        } else {
            None
        }
    }
}

#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    Admitted { surfaces: Vec<Surface> },
    Rejected(RejectReason),
}

impl Admission {
    pub fn is_admitted(&self) -> bool { matches!(self, Admission::Admitted { .. }) }
}

/// Outcome of arranging a batch of surfaces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrangeReport {
    pub arranged: Vec<Surface>,
    pub failed: Vec<(Surface, EngineError)>,
}

impl ArrangeReport {
    pub fn is_complete(&self) -> bool { self.failed.is_empty() }
}

#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResponse<W> {
    pub focus_window: Option<W>,
    pub arranged: Option<ArrangeReport>,
}

impl<W> Default for CommandResponse<W> {
    fn default() -> Self {
        Self {
            focus_window: None,
            arranged: None,
        }
    }
}

/// An engine behind the one lock a multi-threaded host needs.
pub type SharedEngine<P, R, L> = Arc<Mutex<Engine<P, R, L>>>;

pub struct Engine<P, R, L> {
    workspace: P,
    windows: R,
    layouts: L,
}

impl<P, R, L> Engine<P, R, L>
where
    P: WorkspaceProvider,
    R: WindowRegistry,
    L: LayoutRegistry,
{
    pub fn new(workspace: P, windows: R, layouts: L) -> Self {
        Self { workspace, windows, layouts }
    }

    pub fn into_shared(self) -> SharedEngine<P, R, L> { Arc::new(Mutex::new(self)) }

    pub fn workspace(&self) -> &P { &self.workspace }

    pub fn workspace_mut(&mut self) -> &mut P { &mut self.workspace }

    pub fn windows(&self) -> &R { &self.windows }

    pub fn windows_mut(&mut self) -> &mut R { &mut self.windows }

    pub fn layouts(&self) -> &L { &self.layouts }

    pub fn layouts_mut(&mut self) -> &mut L { &mut self.layouts }

    /// Starts managing `window` unless it is a shell surface, a dialog or
    /// kept above. Only the surfaces the window appears on are arranged.
    pub fn add_window(&mut self, window: R::Window) -> Admission {
        if let Some(reason) = RejectReason::for_window(&window) {
            debug!(?reason, caption = %window.caption(), "Not managing window");
            return Admission::Rejected(reason);
        }

        let managed = self.windows.add(window);
        let surfaces = managed.surfaces();

        let _ = self.arrange_windows_on_surfaces(&surfaces);

        debug!("New window appears on {} surfaces", surfaces.len());
        Admission::Admitted { surfaces }
    }

    /// Stops managing `window`. Nothing is re-arranged; callers request that
    /// separately when they need it.
    pub fn remove_window(&mut self, window: &R::Window) { self.windows.remove(window); }

    /// Activates the neighbour of the active window among the windows on the
    /// active surface, wrapping at both ends. Returns the activated window.
    pub fn focus_window(&mut self, direction: RelDirection) -> Option<R::Window> {
        let active_window = self.windows.active_window();
        let surface = self.active_surface();
        let candidates = self.windows.visible_windows_on(&surface);

        if candidates.is_empty() {
            trace!("No windows to focus on {surface}");
            return None;
        }

        let target = match active_window {
            // The first candidate becomes the anchor and is focused as is.
            None => candidates[0].clone(),
            Some(active) => {
                let Some(index) = candidates.iter().position(|w| *w == active) else {
                    trace!("Active window {:?} is not on {surface}", active.caption());
                    return None;
                };
                candidates[direction.step(index, candidates.len())].clone()
            }
        };

        target.activate();
        debug!("Activated window title: {:?}", target.caption());
        Some(target)
    }

    pub fn arrange_windows_on_all_surfaces(&mut self) -> ArrangeReport {
        let surfaces = self.all_surfaces();
        self.arrange_windows_on_surfaces(&surfaces)
    }

    pub fn arrange_windows_on_visible_surfaces(&mut self) -> ArrangeReport {
        let surfaces = self.visible_surfaces();
        self.arrange_windows_on_surfaces(&surfaces)
    }

    /// Arranges each surface in order. A surface that fails is logged and
    /// reported without stopping the rest of the batch.
    pub fn arrange_windows_on_surfaces(&mut self, surfaces: &[Surface]) -> ArrangeReport {
        let mut report = ArrangeReport::default();
        for surface in surfaces {
            match self.arrange_windows_on_surface(surface) {
                Ok(()) => report.arranged.push(surface.clone()),
                Err(err) => {
                    warn!("Could not arrange windows on {surface}: {err}");
                    report.failed.push((surface.clone(), err));
                }
            }
        }
        report
    }

    #[instrument(name = "engine::arrange", skip_all, fields(%surface))]
    pub fn arrange_windows_on_surface(&mut self, surface: &Surface) -> Result<(), EngineError> {
        let layout = self.layouts.layout_on_surface(surface)?;
        let working_area = self.workspace.working_area(surface)?;
        let tiling_area = layout.tiling_area(working_area);

        let windows: Vec<R::Window> = self
            .windows
            .visible_windows_on(surface)
            .into_iter()
            .filter(|window| self.windows.is_tileable(window))
            .collect();

        trace!("Arranging {} windows within {:?}", windows.len(), tiling_area);
        layout.apply(tiling_area, &windows);
        Ok(())
    }

    pub fn all_surfaces(&self) -> Vec<Surface> { self.workspace.snapshot().all_surfaces() }

    pub fn visible_surfaces(&self) -> Vec<Surface> { self.workspace.snapshot().visible_surfaces() }

    /// Where the user currently is: the active screen on the current desktop.
    pub fn active_surface(&self) -> Surface { self.workspace.snapshot().active_surface() }

    pub fn handle_command(&mut self, command: &LayoutCommand) -> CommandResponse<R::Window> {
        debug!(?command, "Handling command");
        let surface = self.active_surface();

        let changed = match command {
            LayoutCommand::FocusNext => {
                return CommandResponse {
                    focus_window: self.focus_window(RelDirection::Next),
                    arranged: None,
                };
            }
            LayoutCommand::FocusPrevious => {
                return CommandResponse {
                    focus_window: self.focus_window(RelDirection::Previous),
                    arranged: None,
                };
            }
            LayoutCommand::NextLayout => self.layouts.cycle_layout(&surface, RelDirection::Next),
            LayoutCommand::PreviousLayout => {
                self.layouts.cycle_layout(&surface, RelDirection::Previous)
            }
            _ => self
                .layouts
                .layout_on_surface(&surface)
                .map(|layout| layout.handle_command(command)),
        };

        match changed {
            Ok(true) => CommandResponse {
                focus_window: None,
                arranged: Some(self.arrange_windows_on_surfaces(std::slice::from_ref(&surface))),
            },
            Ok(false) => CommandResponse::default(),
            Err(err) => {
                warn!(?command, "Command failed on {surface}: {err}");
                CommandResponse::default()
            }
        }
    }
}
