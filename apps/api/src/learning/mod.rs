// Learning path: recommendation ranking, module completion and the leaderboard.

pub mod handlers;
pub mod leaderboard;
pub mod progress;
pub mod ranking;
pub mod service;
