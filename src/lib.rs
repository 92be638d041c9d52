pub mod color;
pub mod config;
pub mod error;
pub mod font;
pub mod icon;
pub mod renderer;

pub use color::Color;
pub use config::IconSpec;
pub use error::RenderError;
pub use renderer::{IconRenderer, render_icon};
