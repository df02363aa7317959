//! Guided meditation sessions: preset durations, ambient sound catalogue,
//! completion tracking, and the meditation streak.

pub mod achievements;
pub mod handlers;
pub mod model;
pub mod storage;

/// Selectable session lengths, in minutes.
pub const DURATION_PRESETS: [u32; 7] = [5, 10, 15, 20, 30, 45, 60];

/// Ambient sound loops a session can play.
pub const AMBIENT_SOUNDS: [&str; 5] = ["rain", "ocean", "forest", "white_noise", "tibetan_bells"];
