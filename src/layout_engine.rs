pub(crate) mod graph;
pub mod systems;
pub mod utils;
mod workspaces;

pub use graph::{Orientation, RelDirection};
pub use systems::{
    ColumnsLayoutSystem, LayoutId, LayoutSystem, LayoutSystemKind, MonocleLayoutSystem,
    TileLayoutSystem,
};
pub use workspaces::ActiveLayouts;
