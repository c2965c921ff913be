use std::fmt::Debug;

use crate::model::{Rect, Surface};

/// Capabilities the engine needs from a compositor client.
///
/// Implementors are cheap handles onto a window owned by the compositor;
/// cloning one must not clone the window itself. Equality is identity of the
/// underlying client.
pub trait Window: Clone + PartialEq + Debug {
    /// Docks, panels, OSDs and similar shell surfaces.
    fn special_window(&self) -> bool;
    fn dialog(&self) -> bool;
    fn keep_above(&self) -> bool;
    fn caption(&self) -> String;

    /// Asks the compositor to give this window focus.
    fn activate(&self);

    /// Every surface the window currently shows up on. A window marked as
    /// shown on all desktops appears on several.
    fn surfaces(&self) -> Vec<Surface>;

    fn set_frame(&self, frame: Rect);
}

/// Registry entry for a window that passed admission.
#[derive(Clone, Debug, PartialEq)]
pub struct ManagedWindow<W> {
    window: W,
    floating: bool,
}

impl<W: Window> ManagedWindow<W> {
    pub fn new(window: W) -> Self { Self { window, floating: false } }

    pub fn window(&self) -> &W { &self.window }

    pub fn surfaces(&self) -> Vec<Surface> { self.window.surfaces() }

    pub fn is_floating(&self) -> bool { self.floating }

    pub(crate) fn set_floating(&mut self, floating: bool) { self.floating = floating; }
}
