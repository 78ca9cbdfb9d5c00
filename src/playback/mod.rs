//! Playback pacing for the tutorial.

mod play_clock;

pub use play_clock::{PlayClock, SPEED_MAX, SPEED_MIN};
