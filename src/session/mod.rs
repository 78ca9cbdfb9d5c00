//! User-facing session facade.

mod session;

pub use session::{SessionSnapshot, TutorialSession};
