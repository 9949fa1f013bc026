//! Builds the outward `v1` projections from core records.

use hangman_core::{Game, ScoreRecord, UserRecord};
use hangman_types::{
    GameHistoryView, GameListView, GameView, ScoreListView, ScoreView, UserRankingListView,
    UserRankingView, UserView,
};

pub fn game_view(game: &Game, message: &str) -> GameView {
    let status = game.status();
    GameView {
        urlsafe_key: game.id.to_string(),
        user_name: game.user_name.clone(),
        guessed_word: game.guessed_word.clone(),
        letters_guessed: game.letters_guessed.iter().collect(),
        attempts_allowed: game.attempts_allowed,
        attempts_remaining: game.attempts_remaining,
        game_over: status.is_terminal(),
        status,
        history: game.history.iter().map(char::to_string).collect(),
        // Never leak the word of a game that can still be played
        target: status.is_terminal().then(|| game.target.clone()),
        message: message.to_string(),
    }
}

pub fn game_list_view(games: &[Game], message: &str) -> GameListView {
    GameListView {
        items: games.iter().map(|g| game_view(g, message)).collect(),
    }
}

pub fn history_view(game: &Game) -> GameHistoryView {
    GameHistoryView {
        urlsafe_key: game.id.to_string(),
        history: game.history.iter().map(char::to_string).collect(),
    }
}

pub fn score_view(score: &ScoreRecord) -> ScoreView {
    ScoreView {
        user_name: score.user_name.clone(),
        date: score.date.format("%Y-%m-%d").to_string(),
        won: score.won,
        guesses: score.guesses,
    }
}

pub fn score_list_view(scores: &[ScoreRecord]) -> ScoreListView {
    ScoreListView {
        items: scores.iter().map(score_view).collect(),
    }
}

pub fn user_view(user: &UserRecord) -> UserView {
    UserView {
        name: user.name.clone(),
        email: user.email.clone(),
        wins: user.wins,
        total_games: user.total_games,
        win_percentage: user.win_percentage(),
    }
}

/// Ranks are 1-indexed and follow the order given.
pub fn ranking_view(users: &[UserRecord]) -> UserRankingListView {
    UserRankingListView {
        items: users
            .iter()
            .enumerate()
            .map(|(index, user)| UserRankingView {
                rank: (index + 1) as u32,
                user: user_view(user),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hangman_types::GameStatus;
    use uuid::Uuid;

    #[test]
    fn test_game_view_hides_target_until_over() {
        let mut game = Game::new(Uuid::new_v4(), "alice".to_string(), "dog".to_string(), 1);
        game.apply_guess("d").unwrap();

        let view = game_view(&game, "Time to make a move!");
        assert_eq!(view.target, None);
        assert_eq!(view.guessed_word, "d__");
        assert_eq!(view.letters_guessed, "d");
        assert_eq!(view.history, vec!["d".to_string()]);
        assert_eq!(view.status, GameStatus::InProgress);

        game.apply_guess("x").unwrap();
        let view = game_view(&game, "Game over!");
        assert_eq!(view.target.as_deref(), Some("dog"));
        assert_eq!(view.status, GameStatus::Lost);
        assert!(view.game_over);
    }

    #[test]
    fn test_game_view_reports_win_as_over() {
        let mut game = Game::new(Uuid::new_v4(), "alice".to_string(), "ox".to_string(), 3);
        game.apply_guess("o").unwrap();
        game.apply_guess("x").unwrap();

        let view = game_view(&game, "You win!");
        assert_eq!(view.status, GameStatus::Won);
        assert!(view.game_over);
        assert_eq!(view.target.as_deref(), Some("ox"));
    }

    #[test]
    fn test_ranking_view_numbers_from_one() {
        let mut first = UserRecord::new("alice", None);
        first.add_win();
        let mut second = UserRecord::new("bob", None);
        second.add_loss();

        let view = ranking_view(&[first, second]);
        assert_eq!(view.items[0].rank, 1);
        assert_eq!(view.items[0].user.win_percentage, 1.0);
        assert_eq!(view.items[1].rank, 2);
        assert_eq!(view.items[1].user.name, "bob");
    }
}
