use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserView {
    pub name: String,
    pub email: Option<String>,
    pub wins: i32,
    pub total_games: i32,
    pub win_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserRankingView {
    pub rank: u32,
    pub user: UserView,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserRankingListView {
    pub items: Vec<UserRankingView>,
}
