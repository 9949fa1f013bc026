use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};
use warp::Filter;

use crate::error::ServiceError;
use crate::game_manager::{GameManager, ServiceResult};
use hangman_core::format_average_attempts;
use hangman_types::{
    CreateUserRequest, GameError, GameId, HighScoresQuery, MakeMoveRequest, NewGameRequest,
    StringMessage, API_VERSION,
};

pub mod config;
pub mod error;
pub mod game_manager;
pub mod metrics_cache;
pub mod views;

const MAX_BODY_BYTES: u64 = 16 * 1024;
const NEW_GAME_MESSAGE: &str = "Good luck playing Hangman!";
const MAKE_MOVE_MESSAGE: &str = "Time to make a move!";
const FINISHED_GAME_MESSAGE: &str = "This game is already over!";

pub fn create_routes(
    game_manager: Arc<GameManager>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let game_manager_filter = warp::any().map(move || game_manager.clone());

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    let create_user = warp::path!("user")
        .and(warp::post())
        .and(json_body::<CreateUserRequest>())
        .and(game_manager_filter.clone())
        .and_then(handle_create_user);

    let new_game = warp::path!("game")
        .and(warp::post())
        .and(json_body::<NewGameRequest>())
        .and(game_manager_filter.clone())
        .and_then(handle_new_game);

    let get_game = warp::path!("game" / String)
        .and(warp::get())
        .and(game_manager_filter.clone())
        .and_then(handle_get_game);

    let make_move = warp::path!("game" / String)
        .and(warp::put())
        .and(json_body::<MakeMoveRequest>())
        .and(game_manager_filter.clone())
        .and_then(handle_make_move);

    let cancel_game = warp::path!("game" / String)
        .and(warp::delete())
        .and(game_manager_filter.clone())
        .and_then(handle_cancel_game);

    let game_history = warp::path!("game" / String / "history")
        .and(warp::get())
        .and(game_manager_filter.clone())
        .and_then(handle_game_history);

    let all_scores = warp::path!("scores")
        .and(warp::get())
        .and(game_manager_filter.clone())
        .and_then(handle_all_scores);

    let user_scores = warp::path!("scores" / "user" / String)
        .and(warp::get())
        .and(game_manager_filter.clone())
        .and_then(handle_user_scores);

    let high_scores = warp::path!("highscores")
        .and(warp::get())
        .and(warp::query::<HighScoresQuery>())
        .and(game_manager_filter.clone())
        .and_then(handle_high_scores);

    let user_games = warp::path!("games" / "user" / String)
        .and(warp::get())
        .and(game_manager_filter.clone())
        .and_then(handle_user_games);

    let user_rankings = warp::path!("user" / "rankings")
        .and(warp::get())
        .and(game_manager_filter.clone())
        .and_then(handle_user_rankings);

    let average_attempts = warp::path!("games" / "average_attempts")
        .and(warp::get())
        .and(game_manager_filter.clone())
        .and_then(handle_average_attempts);

    let cache_average_attempts = warp::path!("tasks" / "cache_average_attempts")
        .and(warp::post())
        .and(game_manager_filter)
        .and_then(handle_cache_average_attempts);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE"]);

    let api = warp::path("hangman").and(warp::path(API_VERSION)).and(
        create_user
            .or(new_game)
            .or(get_game)
            .or(make_move)
            .or(cancel_game)
            .or(game_history)
            .or(all_scores)
            .or(user_scores)
            .or(high_scores)
            .or(user_games)
            .or(user_rankings)
            .or(average_attempts)
            .or(cache_average_attempts),
    );

    health
        .or(api)
        .with(cors)
        .with(warp::log("hangman"))
}

fn json_body<T>() -> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone
where
    T: serde::de::DeserializeOwned + Send,
{
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

// A key that is not a UUID cannot name any game
fn parse_game_id(game_id: &str) -> Result<GameId, ServiceError> {
    Uuid::parse_str(game_id).map_err(|_| GameError::game_not_found(game_id).into())
}

fn error_reply(err: ServiceError) -> WithStatus<Json> {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!("Request failed: {}", err);
    } else {
        tracing::debug!("Request rejected: {}", err);
    }
    warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": err.public_message()
        })),
        status,
    )
}

fn respond<T: Serialize>(result: ServiceResult<T>, status: StatusCode) -> WithStatus<Json> {
    match result {
        Ok(body) => warp::reply::with_status(warp::reply::json(&body), status),
        Err(err) => error_reply(err),
    }
}

async fn handle_create_user(
    request: CreateUserRequest,
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = game_manager
        .create_user(&request.user_name, request.email)
        .await
        .map(|user| StringMessage::new(format!("User {} created!", user.name)));
    Ok(respond(result, StatusCode::CREATED))
}

async fn handle_new_game(
    request: NewGameRequest,
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = game_manager
        .create_game(&request.user_name)
        .await
        .map(|game| views::game_view(&game, NEW_GAME_MESSAGE));
    Ok(respond(result, StatusCode::CREATED))
}

async fn handle_get_game(
    game_id: String,
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = match parse_game_id(&game_id) {
        Ok(game_id) => game_manager.get_game(game_id).await.map(|game| {
            let message = if game.game_over {
                FINISHED_GAME_MESSAGE
            } else {
                MAKE_MOVE_MESSAGE
            };
            views::game_view(&game, message)
        }),
        Err(err) => Err(err),
    };
    Ok(respond(result, StatusCode::OK))
}

async fn handle_make_move(
    game_id: String,
    request: MakeMoveRequest,
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = match parse_game_id(&game_id) {
        Ok(game_id) => game_manager
            .make_move(game_id, &request.guess)
            .await
            .map(|(game, outcome)| views::game_view(&game, outcome.message())),
        Err(err) => Err(err),
    };
    Ok(respond(result, StatusCode::OK))
}

async fn handle_cancel_game(
    game_id: String,
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = match parse_game_id(&game_id) {
        Ok(game_id) => game_manager
            .cancel_game(game_id)
            .await
            .map(|()| StringMessage::new("Game cancelled!")),
        Err(err) => Err(err),
    };
    Ok(respond(result, StatusCode::OK))
}

async fn handle_game_history(
    game_id: String,
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = match parse_game_id(&game_id) {
        Ok(game_id) => game_manager
            .get_game(game_id)
            .await
            .map(|game| views::history_view(&game)),
        Err(err) => Err(err),
    };
    Ok(respond(result, StatusCode::OK))
}

async fn handle_all_scores(
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = game_manager
        .list_all_scores()
        .await
        .map(|scores| views::score_list_view(&scores));
    Ok(respond(result, StatusCode::OK))
}

async fn handle_user_scores(
    user_name: String,
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = game_manager
        .list_user_scores(&user_name)
        .await
        .map(|scores| views::score_list_view(&scores));
    Ok(respond(result, StatusCode::OK))
}

async fn handle_high_scores(
    query: HighScoresQuery,
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = game_manager
        .list_high_scores(query.number_of_results)
        .await
        .map(|scores| views::score_list_view(&scores));
    Ok(respond(result, StatusCode::OK))
}

async fn handle_user_games(
    user_name: String,
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = game_manager
        .list_user_games(&user_name)
        .await
        .map(|games| views::game_list_view(&games, MAKE_MOVE_MESSAGE));
    Ok(respond(result, StatusCode::OK))
}

async fn handle_user_rankings(
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = game_manager
        .rank_users()
        .await
        .map(|users| views::ranking_view(&users));
    Ok(respond(result, StatusCode::OK))
}

async fn handle_average_attempts(
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    // Nothing cached yet reads as an empty message
    let message = game_manager.average_attempts_remaining().unwrap_or_default();
    Ok(respond(Ok(StringMessage::new(message)), StatusCode::OK))
}

async fn handle_cache_average_attempts(
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = game_manager
        .recompute_average_attempts()
        .await
        .map(|average| {
            StringMessage::new(average.map(format_average_attempts).unwrap_or_default())
        });
    Ok(respond(result, StatusCode::OK))
}
