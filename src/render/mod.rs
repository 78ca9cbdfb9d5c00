//! Immediate-mode rendering of the chip scene and stage panel.

mod draw;
pub mod hover;
mod view;

pub use draw::{draw_frame, draw_help_overlay, PANEL_WIDTH, VIEW_MARGIN};
pub use view::ViewTransform;
