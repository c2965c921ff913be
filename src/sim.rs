//! In-memory compositor model.
//!
//! Provides a workspace and windows that live entirely in memory, plus a
//! scenario format that scripts them. The CLI uses it to dry-run a
//! configuration and tests use it as a stand-in for a real compositor.

use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::common::config::Config;
use crate::engine::{Engine, EngineError, LayoutCommand, WorkspaceProvider};
use crate::layout_engine::ActiveLayouts;
use crate::model::{Rect, Surface, Window, Windows};

pub const DEFAULT_ACTIVITY: &str = "default";

fn one() -> u32 { 1 }

fn default_activity() -> String { DEFAULT_ACTIVITY.to_string() }

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Top,
    Left,
    Bottom,
    Right,
}

/// A strip of a screen reserved by a panel or dock.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Panel {
    #[serde(default)]
    pub screen: u32,
    pub edge: Edge,
    pub size: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StaticWorkspace {
    /// Screen geometries, indexed by screen number
    pub screens: Vec<Rect>,
    #[serde(default = "one")]
    pub desktop_count: u32,
    #[serde(default = "one")]
    pub current_desktop: u32,
    #[serde(default = "default_activity")]
    pub current_activity: String,
    #[serde(default)]
    pub active_screen: u32,
    #[serde(default)]
    pub panels: Vec<Panel>,
}

impl StaticWorkspace {
    pub fn new(screens: Vec<Rect>, desktop_count: u32) -> Self {
        Self {
            screens,
            desktop_count,
            current_desktop: 1,
            current_activity: default_activity(),
            active_screen: 0,
            panels: Vec::new(),
        }
    }
}

impl WorkspaceProvider for StaticWorkspace {
    fn desktop_count(&self) -> u32 { self.desktop_count }

    fn screen_count(&self) -> u32 { self.screens.len() as u32 }

    fn current_desktop(&self) -> u32 { self.current_desktop }

    fn current_activity(&self) -> String { self.current_activity.clone() }

    fn active_screen(&self) -> u32 { self.active_screen }

    fn working_area(&self, surface: &Surface) -> Result<Rect, EngineError> {
        let Some(screen) = self.screens.get(surface.screen() as usize) else {
            return Err(EngineError::InvalidScreen {
                screen: surface.screen(),
                screen_count: self.screen_count(),
            });
        };
        if !(1..=self.desktop_count).contains(&surface.desktop()) {
            return Err(EngineError::InvalidDesktop {
                desktop: surface.desktop(),
                desktop_count: self.desktop_count,
            });
        }

        let area = self
            .panels
            .iter()
            .filter(|panel| panel.screen == surface.screen())
            .fold(*screen, |area, panel| match panel.edge {
                Edge::Top => area.inset(panel.size, 0, 0, 0),
                Edge::Left => area.inset(0, panel.size, 0, 0),
                Edge::Bottom => area.inset(0, 0, panel.size, 0),
                Edge::Right => area.inset(0, 0, 0, panel.size),
            });
        Ok(area)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct WindowSpec {
    pub caption: String,
    /// Desktops the window is shown on
    pub desktops: Vec<u32>,
    pub screen: u32,
    pub activity: String,
    pub special: bool,
    pub dialog: bool,
    pub keep_above: bool,
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            caption: String::new(),
            desktops: vec![1],
            screen: 0,
            activity: default_activity(),
            special: false,
            dialog: false,
            keep_above: false,
        }
    }
}

#[derive(Debug)]
struct SimWindowState {
    spec: WindowSpec,
    frame: Option<Rect>,
    activations: usize,
}

/// Handle onto an in-memory window. Clones share the same window.
#[derive(Clone)]
pub struct SimWindow(Rc<RefCell<SimWindowState>>);

impl SimWindow {
    pub fn new(spec: WindowSpec) -> Self {
        Self(Rc::new(RefCell::new(SimWindowState {
            spec,
            frame: None,
            activations: 0,
        })))
    }

    pub fn frame(&self) -> Option<Rect> { self.0.borrow().frame }

    pub fn activations(&self) -> usize { self.0.borrow().activations }

    pub fn set_keep_above(&self, keep_above: bool) { self.0.borrow_mut().spec.keep_above = keep_above; }
}

impl PartialEq for SimWindow {
    fn eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }
}

impl fmt::Debug for SimWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SimWindow").field(&self.0.borrow().spec.caption).finish()
    }
}

impl Window for SimWindow {
    fn special_window(&self) -> bool { self.0.borrow().spec.special }

    fn dialog(&self) -> bool { self.0.borrow().spec.dialog }

    fn keep_above(&self) -> bool { self.0.borrow().spec.keep_above }

    fn caption(&self) -> String { self.0.borrow().spec.caption.clone() }

    fn activate(&self) { self.0.borrow_mut().activations += 1; }

    fn surfaces(&self) -> Vec<Surface> {
        let state = self.0.borrow();
        state
            .spec
            .desktops
            .iter()
            .map(|&desktop| Surface::new(desktop, state.spec.screen, state.spec.activity.clone()))
            .collect()
    }

    fn set_frame(&self, frame: Rect) { self.0.borrow_mut().frame = Some(frame); }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Command(LayoutCommand),
    /// Marks the window with this caption as focused by the compositor
    Activate(String),
    /// Closes the window with this caption
    Close(String),
    SwitchDesktop(u32),
    SwitchScreen(u32),
    ArrangeAll,
    ArrangeVisible,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub workspace: StaticWorkspace,
    #[serde(default)]
    pub windows: Vec<WindowSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn read(path: &Path) -> anyhow::Result<Scenario> {
        let buf = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        let scenario: Scenario = toml::from_str(&buf)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Rejects desktop numbers outside `1..=desktop_count`.
    pub fn validate(&self) -> anyhow::Result<()> {
        let workspace = &self.workspace;
        if workspace.desktop_count == 0 {
            bail!("desktop_count must be at least 1");
        }
        check_desktop(workspace, workspace.current_desktop, "current_desktop")?;
        for window in &self.windows {
            for &desktop in &window.desktops {
                check_desktop(workspace, desktop, &format!("window {:?}", window.caption))?;
            }
        }
        for step in &self.steps {
            if let Step::SwitchDesktop(desktop) = step {
                check_desktop(workspace, *desktop, "switch_desktop")?;
            }
        }
        Ok(())
    }
}

fn check_desktop(workspace: &StaticWorkspace, desktop: u32, what: &str) -> anyhow::Result<()> {
    if !(1..=workspace.desktop_count).contains(&desktop) {
        bail!(
            "{what}: desktop {desktop} does not exist (desktops are 1..={})",
            workspace.desktop_count
        );
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowReport {
    pub caption: String,
    pub managed: bool,
    pub frame: Option<Rect>,
    pub activations: usize,
}

impl fmt::Display for WindowReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.managed { "managed" } else { "ignored" };
        match self.frame {
            Some(r) => write!(
                f,
                "{:<24} {:<8} {}x{}+{}+{} activated {}x",
                self.caption, state, r.width, r.height, r.x, r.y, self.activations
            ),
            None => write!(
                f,
                "{:<24} {:<8} - activated {}x",
                self.caption, state, self.activations
            ),
        }
    }
}

pub type SimEngine = Engine<StaticWorkspace, Windows<SimWindow>, ActiveLayouts>;

/// Runs a scenario against a fresh engine.
pub struct Simulation {
    engine: SimEngine,
    windows: Vec<SimWindow>,
}

impl Simulation {
    pub fn new(workspace: StaticWorkspace, config: &Config) -> Self {
        let windows = Windows::with_floating_rules(config.rules.floating_regexes());
        let layouts =
            ActiveLayouts::new(&config.settings.layout).with_screen_count(workspace.screen_count());
        Self {
            engine: Engine::new(workspace, windows, layouts),
            windows: Vec::new(),
        }
    }

    pub fn engine(&self) -> &SimEngine { &self.engine }

    pub fn engine_mut(&mut self) -> &mut SimEngine { &mut self.engine }

    pub fn open(&mut self, spec: WindowSpec) -> SimWindow {
        let window = SimWindow::new(spec);
        self.windows.push(window.clone());
        let admission = self.engine.add_window(window.clone());
        debug!(caption = %window.caption(), admitted = admission.is_admitted(), "Opened window");
        window
    }

    pub fn step(&mut self, step: &Step) -> anyhow::Result<()> {
        info!(?step, "Running step");
        match step {
            Step::Command(command) => {
                let response = self.engine.handle_command(command);
                if let Some(window) = response.focus_window {
                    self.engine.windows_mut().set_active(Some(window));
                }
            }
            Step::Activate(caption) => {
                let window = self.find(caption)?;
                self.engine.windows_mut().set_active(Some(window));
            }
            Step::Close(caption) => {
                let window = self.find(caption)?;
                self.engine.remove_window(&window);
                self.windows.retain(|w| *w != window);
                let _ = self.engine.arrange_windows_on_visible_surfaces();
            }
            Step::SwitchDesktop(desktop) => {
                check_desktop(self.engine.workspace(), *desktop, "switch_desktop")?;
                self.engine.workspace_mut().current_desktop = *desktop;
                let _ = self.engine.arrange_windows_on_visible_surfaces();
            }
            Step::SwitchScreen(screen) => {
                self.engine.workspace_mut().active_screen = *screen;
            }
            Step::ArrangeAll => {
                let _ = self.engine.arrange_windows_on_all_surfaces();
            }
            Step::ArrangeVisible => {
                let _ = self.engine.arrange_windows_on_visible_surfaces();
            }
        }
        Ok(())
    }

    pub fn run(scenario: Scenario, config: &Config) -> anyhow::Result<Vec<WindowReport>> {
        scenario.validate()?;
        let mut simulation = Simulation::new(scenario.workspace, config);
        for spec in scenario.windows {
            simulation.open(spec);
        }
        for step in &scenario.steps {
            simulation.step(step)?;
        }
        Ok(simulation.report())
    }

    pub fn report(&self) -> Vec<WindowReport> {
        self.windows
            .iter()
            .map(|window| WindowReport {
                caption: window.caption(),
                managed: self.engine.windows().contains(window),
                frame: window.frame(),
                activations: window.activations(),
            })
            .collect()
    }

    fn find(&self, caption: &str) -> anyhow::Result<SimWindow> {
        match self.windows.iter().find(|w| w.caption() == caption) {
            Some(window) => Ok(window.clone()),
            None => bail!("No window with caption {caption:?}"),
        }
    }
}
