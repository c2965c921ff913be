pub mod common;
pub mod engine;
pub mod layout_engine;
pub mod model;
pub mod sim;
