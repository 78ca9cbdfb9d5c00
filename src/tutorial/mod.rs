//! Tutorial script and stage progression.

mod controller;
mod script;

pub use controller::StageController;
pub use script::{HighlightTarget, Stage, TutorialScript};
