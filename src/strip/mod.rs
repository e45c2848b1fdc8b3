// Strip module - tile geometry and the filmstrip widget
pub mod layout;
mod renderer;

pub use renderer::ThumbnailStrip;
