use serde::{Deserialize, Serialize};

/// Cumulative results for one registered player. `name` is the identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    pub email: Option<String>,
    pub wins: i32,
    pub total_games: i32,
}

impl UserRecord {
    pub fn new(name: impl Into<String>, email: Option<String>) -> Self {
        Self {
            name: name.into(),
            email,
            wins: 0,
            total_games: 0,
        }
    }

    pub fn add_win(&mut self) {
        self.total_games += 1;
        self.wins += 1;
    }

    pub fn add_loss(&mut self) {
        self.total_games += 1;
    }

    pub fn record_result(&mut self, won: bool) {
        if won {
            self.add_win();
        } else {
            self.add_loss();
        }
    }

    /// Fraction of completed games won, 0 when none have been completed.
    pub fn win_percentage(&self) -> f64 {
        if self.total_games > 0 {
            f64::from(self.wins) / f64::from(self.total_games)
        } else {
            0.0
        }
    }
}
