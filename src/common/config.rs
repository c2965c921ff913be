use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};
use tracing::warn;

use crate::layout_engine::{Orientation, RelDirection};

const MIN_MASTER_RATIO: f64 = 0.2;
const MAX_MASTER_RATIO: f64 = 0.8;

pub fn config_file() -> PathBuf { dirs::home_dir().unwrap_or_default().join(".tiler.toml") }

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub rules: RuleSettings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub layout: LayoutSettings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct LayoutSettings {
    /// Layout used for surfaces that have not picked one yet
    #[serde(default)]
    pub mode: LayoutMode,
    /// Share of the tiling area given to the master column of the tile layout
    #[serde(default = "default_master_ratio")]
    pub master_ratio: f64,
    /// Number of windows in the master column of the tile layout
    #[serde(default = "default_master_count")]
    pub master_count: usize,
    /// Direction the columns layout lays windows out in
    #[serde(default)]
    pub columns_orientation: Orientation,
    /// Gap configuration for window spacing
    #[serde(default)]
    pub gaps: GapSettings,
}

/// Layout kinds, in the order layout cycling visits them
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Master column plus a stack of the remaining windows
    #[default]
    Tile,
    /// Every window fills the whole tiling area
    Monocle,
    /// Equal columns (or rows)
    Columns,
}

impl LayoutMode {
    pub fn cycle(self, direction: RelDirection) -> Self {
        let modes: Vec<LayoutMode> = LayoutMode::iter().collect();
        let index = modes.iter().position(|m| *m == self).unwrap_or_default();
        modes[direction.step(index, modes.len())]
    }
}

/// Gap configuration for window spacing
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct GapSettings {
    /// Outer gaps (space between windows and the working area edges)
    #[serde(default)]
    pub outer: OuterGaps,
    /// Inner gaps (space between windows)
    #[serde(default)]
    pub inner: InnerGaps,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct OuterGaps {
    #[serde(default)]
    pub top: i32,
    #[serde(default)]
    pub left: i32,
    #[serde(default)]
    pub bottom: i32,
    #[serde(default)]
    pub right: i32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct InnerGaps {
    #[serde(default)]
    pub horizontal: i32,
    #[serde(default)]
    pub vertical: i32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct RuleSettings {
    /// Caption patterns (regular expressions) of windows that are managed
    /// but never tiled
    #[serde(default)]
    pub floating_rules: Vec<String>,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            mode: LayoutMode::default(),
            master_ratio: default_master_ratio(),
            master_count: default_master_count(),
            columns_orientation: Orientation::default(),
            gaps: GapSettings::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Vec<String> { self.layout.validate() }

    pub fn auto_fix_values(&mut self) -> usize { self.layout.auto_fix_values() }
}

impl LayoutSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !(MIN_MASTER_RATIO..=MAX_MASTER_RATIO).contains(&self.master_ratio) {
            issues.push(format!(
                "master_ratio must be between {MIN_MASTER_RATIO} and {MAX_MASTER_RATIO}, got {}",
                self.master_ratio
            ));
        }

        issues.extend(self.gaps.validate());

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        if !(MIN_MASTER_RATIO..=MAX_MASTER_RATIO).contains(&self.master_ratio) {
            self.master_ratio = if self.master_ratio.is_finite() {
                self.master_ratio.clamp(MIN_MASTER_RATIO, MAX_MASTER_RATIO)
            } else {
                default_master_ratio()
            };
            fixes += 1;
        }

        fixes + self.gaps.auto_fix_values()
    }

    pub fn clamp_master_ratio(ratio: f64) -> f64 { ratio.clamp(MIN_MASTER_RATIO, MAX_MASTER_RATIO) }
}

impl GapSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = self.outer.validate();
        issues.extend(self.inner.validate());
        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        self.outer.auto_fix_values() + self.inner.auto_fix_values()
    }
}

impl OuterGaps {
    fn fields(&mut self) -> [(&'static str, &mut i32); 4] {
        [
            ("top", &mut self.top),
            ("left", &mut self.left),
            ("bottom", &mut self.bottom),
            ("right", &mut self.right),
        ]
    }

    pub fn validate(&self) -> Vec<String> {
        [
            ("top", self.top),
            ("left", self.left),
            ("bottom", self.bottom),
            ("right", self.right),
        ]
        .into_iter()
        .filter(|(_, value)| *value < 0)
        .map(|(name, value)| format!("outer.{name} gap must be non-negative, got {value}"))
        .collect()
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;
        for (_, value) in self.fields() {
            if *value < 0 {
                *value = 0;
                fixes += 1;
            }
        }
        fixes
    }
}

impl InnerGaps {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.horizontal < 0 {
            issues.push(format!(
                "inner.horizontal gap must be non-negative, got {}",
                self.horizontal
            ));
        }

        if self.vertical < 0 {
            issues.push(format!(
                "inner.vertical gap must be non-negative, got {}",
                self.vertical
            ));
        }

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        if self.horizontal < 0 {
            self.horizontal = 0;
            fixes += 1;
        }

        if self.vertical < 0 {
            self.vertical = 0;
            fixes += 1;
        }

        fixes
    }
}

impl RuleSettings {
    pub fn validate(&self) -> Vec<String> {
        self.floating_rules
            .iter()
            .enumerate()
            .filter_map(|(index, rule)| {
                Regex::new(rule)
                    .err()
                    .map(|err| format!("floating rule {index} ({rule:?}) is not a valid regex: {err}"))
            })
            .collect()
    }

    /// Compiles the floating rules, skipping any that do not parse.
    pub fn floating_regexes(&self) -> Vec<Regex> {
        self.floating_rules
            .iter()
            .filter_map(|rule| match Regex::new(rule) {
                Ok(regex) => Some(regex),
                Err(err) => {
                    warn!("Ignoring floating rule {rule:?}: {err}");
                    None
                }
            })
            .collect()
    }
}

fn default_master_ratio() -> f64 { 0.55 }

fn default_master_count() -> usize { 1 }

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)?;
        Self::parse(&buf)
    }

    pub fn default() -> Config {
        Self::parse(include_str!("../../tiler.default.toml"))
            .expect("embedded default config is valid")
    }

    /// Save the current config to a file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml_string.as_bytes())?;

        Ok(())
    }

    /// Validates the entire configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = self.settings.validate();
        issues.extend(self.rules.validate());
        issues
    }

    /// Attempts to fix configuration values automatically.
    /// Returns the number of fixes applied.
    pub fn auto_fix_values(&mut self) -> usize { self.settings.auto_fix_values() }

    fn parse(buf: &str) -> anyhow::Result<Config> { Ok(toml::from_str(buf)?) }
}
