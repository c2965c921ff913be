use thiserror::Error;

use crate::model::Surface;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Screen {screen} does not exist (screen count is {screen_count})")]
    InvalidScreen { screen: u32, screen_count: u32 },
    #[error("Desktop {desktop} does not exist (desktop count is {desktop_count})")]
    InvalidDesktop { desktop: u32, desktop_count: u32 },
    #[error("No layout is available for {0}")]
    NoLayout(Surface),
}
