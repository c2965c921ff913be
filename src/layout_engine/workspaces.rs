use slotmap::SlotMap;

use super::{LayoutId, LayoutSystem, LayoutSystemKind, RelDirection};
use crate::common::collections::{HashMap, hash_map};
use crate::common::config::{LayoutMode, LayoutSettings};
use crate::engine::{EngineError, LayoutRegistry};
use crate::model::Surface;

/// Binds each surface to its own layout instance.
///
/// Layouts are created on first use with the configured default kind and
/// then live as long as the registry, so per-surface state such as the
/// master ratio survives between arrangements.
#[derive(Debug)]
pub struct ActiveLayouts {
    layouts: SlotMap<LayoutId, LayoutSystemKind>,
    map: HashMap<Surface, LayoutId>,
    settings: LayoutSettings,
    screen_count: Option<u32>,
}

impl ActiveLayouts {
    pub fn new(settings: &LayoutSettings) -> Self {
        Self {
            layouts: SlotMap::default(),
            map: HashMap::default(),
            settings: settings.clone(),
            screen_count: None,
        }
    }

    /// Refuses surfaces on screens at or beyond `screen_count`.
    pub fn with_screen_count(mut self, screen_count: u32) -> Self {
        self.screen_count = Some(screen_count);
        self
    }

    pub fn active(&self, surface: &Surface) -> Option<LayoutId> { self.map.get(surface).copied() }

    pub fn layout(&self, surface: &Surface) -> Option<&LayoutSystemKind> {
        self.active(surface).and_then(|id| self.layouts.get(id))
    }

    pub fn mode(&self, surface: &Surface) -> Option<LayoutMode> {
        self.layout(surface).map(|layout| layout.mode())
    }

    /// Replaces the layout of `surface` with a fresh one of kind `mode`.
    pub fn set_mode(&mut self, surface: &Surface, mode: LayoutMode) -> Result<(), EngineError> {
        let id = self.ensure_active(surface)?;
        self.layouts[id] = LayoutSystemKind::new(mode, &self.settings);
        tracing::debug!("Switched {surface} to {mode:?} layout");
        Ok(())
    }

    pub fn len(&self) -> usize { self.map.len() }

    pub fn is_empty(&self) -> bool { self.map.is_empty() }

    /// Drops every binding, e.g. after the configuration changed.
    pub fn reset(&mut self, settings: &LayoutSettings) {
        self.layouts.clear();
        self.map.clear();
        self.settings = settings.clone();
    }

    fn ensure_active(&mut self, surface: &Surface) -> Result<LayoutId, EngineError> {
        if let Some(screen_count) = self.screen_count {
            if surface.screen() >= screen_count {
                return Err(EngineError::NoLayout(surface.clone()));
            }
        }

        let id = match self.map.entry(surface.clone()) {
            hash_map::Entry::Occupied(entry) => *entry.get(),
            hash_map::Entry::Vacant(entry) => {
                let id = self.layouts.insert(LayoutSystemKind::new(self.settings.mode, &self.settings));
                tracing::debug!(
                    "Using layout {:?} ({:?}) for {}",
                    id,
                    self.settings.mode,
                    entry.key()
                );
                *entry.insert(id)
            }
        };
        Ok(id)
    }
}

impl LayoutRegistry for ActiveLayouts {
    type Layout = LayoutSystemKind;

    fn layout_on_surface(&mut self, surface: &Surface) -> Result<&mut LayoutSystemKind, EngineError> {
        let id = self.ensure_active(surface)?;
        self.layouts.get_mut(id).ok_or_else(|| EngineError::NoLayout(surface.clone()))
    }

    fn cycle_layout(
        &mut self,
        surface: &Surface,
        direction: RelDirection,
    ) -> Result<bool, EngineError> {
        let current = self.layout_on_surface(surface)?.mode();
        let next = current.cycle(direction);
        if next == current {
            return Ok(false);
        }
        self.set_mode(surface, next)?;
        Ok(true)
    }
}
