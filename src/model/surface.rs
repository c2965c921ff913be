use std::fmt;

use serde::{Deserialize, Serialize};

/// One tiling context: a desktop on a screen within an activity.
///
/// Desktops are numbered from 1, screens from 0. Surfaces are plain values
/// built from the current workspace state and compared field by field.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Surface {
    desktop: u32,
    screen: u32,
    activity: String,
}

impl Surface {
    pub fn new(desktop: u32, screen: u32, activity: impl Into<String>) -> Self {
        debug_assert!(desktop >= 1, "desktops are numbered from 1");
        Self {
            desktop,
            screen,
            activity: activity.into(),
        }
    }

    pub fn desktop(&self) -> u32 { self.desktop }

    pub fn screen(&self) -> u32 { self.screen }

    pub fn activity(&self) -> &str { &self.activity }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "desktop {} / screen {} / activity {:?}",
            self.desktop, self.screen, self.activity
        )
    }
}
