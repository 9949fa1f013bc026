use crate::UserRecord;

/// Key under which the formatted average is cached.
pub const MOVES_REMAINING_KEY: &str = "MOVES_REMAINING";

/// Mean attempts remaining over in-progress games; `None` when there are none.
pub fn average_attempts_remaining<I>(attempts_remaining: I) -> Option<f64>
where
    I: IntoIterator<Item = i32>,
{
    let (count, total) = attempts_remaining
        .into_iter()
        .fold((0u64, 0i64), |(count, total), remaining| {
            (count + 1, total + i64::from(remaining))
        });

    if count == 0 {
        None
    } else {
        Some(total as f64 / count as f64)
    }
}

pub fn format_average_attempts(average: f64) -> String {
    format!("The average moves remaining is {:.2}", average)
}

/// Users who have finished at least one game, best win percentage first.
/// Ties keep their input order.
pub fn rank_users(users: Vec<UserRecord>) -> Vec<UserRecord> {
    let mut ranked: Vec<UserRecord> = users.into_iter().filter(|u| u.total_games > 0).collect();
    ranked.sort_by(|a, b| b.win_percentage().total_cmp(&a.win_percentage()));
    ranked
}
