//! Mood-lifting activities: a seeded catalogue matched to the user's mood
//! tag, per-run mood tracking, and the activity streak.

pub mod catalog;
pub mod handlers;
pub mod model;
pub mod storage;
