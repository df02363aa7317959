//! Gamified "smile journey" paths: ordered milestones with typed completion
//! requirements, coin rewards credited exactly once, and a journey streak.

pub mod handlers;
pub mod model;
pub mod storage;
pub mod validator;
