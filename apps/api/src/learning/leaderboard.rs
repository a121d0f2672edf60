use serde::Serialize;
use uuid::Uuid;

pub const DEFAULT_LEADERBOARD_LIMIT: usize = 50;
pub const MAX_LEADERBOARD_LIMIT: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: Uuid,
    pub email: Option<String>,
    pub points: i64,
}

/// Orders by points (highest first, ties by user id) and assigns competition
/// ranks: equal points share a rank and the next rank skips ahead.
pub fn build_leaderboard(
    mut rows: Vec<(Uuid, Option<String>, i64)>,
    limit: usize,
) -> Vec<LeaderboardEntry> {
    rows.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(&b.0)));
    rows.truncate(limit);

    let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(rows.len());
    for (i, (user_id, email, points)) in rows.into_iter().enumerate() {
        let rank = match entries.last() {
            Some(prev) if prev.points == points => prev.rank,
            _ => i + 1,
        };
        entries.push(LeaderboardEntry {
            rank,
            user_id,
            email,
            points,
        });
    }
    entries
}
