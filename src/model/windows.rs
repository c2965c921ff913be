use regex::Regex;
use tracing::{debug, trace};

use crate::engine::WindowRegistry;
use crate::model::{ManagedWindow, Surface, Window};

/// In-memory window registry.
///
/// Windows keep the order in which they were added, which is also the order
/// focus cycles through them. Windows whose caption matches one of the
/// floating rules are managed but never tiled.
#[derive(Debug)]
pub struct Windows<W> {
    entries: Vec<ManagedWindow<W>>,
    active: Option<W>,
    floating_rules: Vec<Regex>,
}

impl<W> Default for Windows<W> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            active: None,
            floating_rules: Vec::new(),
        }
    }
}

impl<W: Window> Windows<W> {
    pub fn new() -> Self { Self::default() }

    pub fn with_floating_rules(floating_rules: Vec<Regex>) -> Self {
        Self { floating_rules, ..Self::default() }
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn contains(&self, window: &W) -> bool { self.position(window).is_some() }

    /// Records the compositor's idea of the focused window. Unmanaged windows
    /// clear the selection.
    pub fn set_active(&mut self, window: Option<W>) {
        self.active = window.filter(|w| self.contains(w));
    }

    pub fn is_floating(&self, window: &W) -> bool {
        self.position(window).is_some_and(|i| self.entries[i].is_floating())
    }

    /// Flips the floating state of a managed window and returns the new
    /// state, or `None` if the window is not managed.
    pub fn toggle_floating(&mut self, window: &W) -> Option<bool> {
        let index = self.position(window)?;
        let entry = &mut self.entries[index];
        let floating = !entry.is_floating();
        entry.set_floating(floating);
        debug!(caption = %window.caption(), floating, "Toggled floating");
        Some(floating)
    }

    fn position(&self, window: &W) -> Option<usize> {
        self.entries.iter().position(|entry| entry.window() == window)
    }

    fn matches_floating_rule(&self, caption: &str) -> bool {
        self.floating_rules.iter().any(|rule| rule.is_match(caption))
    }
}

impl<W: Window> WindowRegistry for Windows<W> {
    type Window = W;

    fn add(&mut self, window: W) -> ManagedWindow<W> {
        if let Some(index) = self.position(&window) {
            trace!(caption = %window.caption(), "Window is already managed");
            return self.entries[index].clone();
        }

        let mut entry = ManagedWindow::new(window);
        let caption = entry.window().caption();
        if self.matches_floating_rule(&caption) {
            debug!(%caption, "Window matches a floating rule");
            entry.set_floating(true);
        }
        self.entries.push(entry.clone());
        entry
    }

    fn remove(&mut self, window: &W) {
        if let Some(index) = self.position(window) {
            self.entries.remove(index);
        }
        if self.active.as_ref() == Some(window) {
            self.active = None;
        }
    }

    fn active_window(&self) -> Option<W> { self.active.clone() }

    fn visible_windows_on(&self, surface: &Surface) -> Vec<W> {
        self.entries
            .iter()
            .filter(|entry| entry.surfaces().contains(surface))
            .map(|entry| entry.window().clone())
            .collect()
    }

    fn is_tileable(&self, window: &W) -> bool { !self.is_floating(window) }
}
