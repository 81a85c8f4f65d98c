// Preview: escaping/formatting helpers and the record → HTML renderer.

pub mod format;
pub mod render;

pub use render::{render_error_panel, render_loaded, render_preview};
