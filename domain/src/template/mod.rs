//! Command template rendering

pub mod render;

pub use render::{RenderError, placeholders, render_command};
