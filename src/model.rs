pub mod geometry;
pub mod surface;
pub mod window;
pub mod windows;

pub use geometry::Rect;
pub use surface::Surface;
pub use window::{ManagedWindow, Window};
pub use windows::Windows;
