#[allow(dead_code)]
mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use cinesocial_games_back::{routes, state::AppState};
use common::{TestUser, WORD, create_room, join_room, memory_state, send, started_room, test_config};

#[tokio::test]
async fn healthcheck_reports_ok_with_storage() {
    let app = routes::app(memory_state());
    let (status, body) = send(&app, Method::GET, "/healthcheck", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn degraded_mode_rejects_room_requests() {
    let app = routes::app(AppState::new(test_config()));

    let (status, body) = send(&app, Method::GET, "/healthcheck", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");

    let (status, _) = send(&app, Method::GET, "/rooms", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn game_catalog_is_served_from_config() {
    let app = routes::app(memory_state());

    let (status, body) = send(&app, Method::GET, "/games", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::GET, "/games/unknown", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_identity_is_unauthorized() {
    let app = routes::app(memory_state());
    let (status, body) =
        send(&app, Method::POST, "/rooms", None, Some(json!({ "name": "x" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn invalid_room_payload_is_rejected() {
    let app = routes::app(memory_state());
    let host = TestUser::new("alice");
    let (status, _) = send(
        &app,
        Method::POST,
        "/rooms",
        Some(&host),
        Some(json!({ "name": "   ", "max_players": 40 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn created_room_is_listed_with_host_as_ready_member() {
    let app = routes::app(memory_state());
    let host = TestUser::new("alice");
    let room_id = create_room(&app, &host).await;

    let (status, body) = send(&app, Method::GET, "/rooms", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], room_id.to_string());
    assert_eq!(body[0]["player_count"], 1);

    let (_, detail) = send(&app, Method::GET, &format!("/rooms/{room_id}"), None, None).await;
    assert_eq!(detail["status"], "waiting");
    assert_eq!(detail["players"][0]["username"], "alice");
    assert_eq!(detail["players"][0]["is_ready"], true);
}

#[tokio::test]
async fn joining_twice_conflicts() {
    let app = routes::app(memory_state());
    let host = TestUser::new("alice");
    let guest = TestUser::new("bob");
    let room_id = create_room(&app, &host).await;
    join_room(&app, room_id, &guest).await;

    let uri = format!("/rooms/{room_id}/join");
    let (status, _) = send(&app, Method::POST, &uri, Some(&guest), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn private_room_requires_the_password() {
    let app = routes::app(memory_state());
    let host = TestUser::new("alice");
    let guest = TestUser::new("bob");
    let (status, body) = send(
        &app,
        Method::POST,
        "/rooms",
        Some(&host),
        Some(json!({ "name": "secret", "is_private": true, "password": "popcorn" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/rooms/{}/join", body["id"].as_str().unwrap());

    let (status, _) =
        send(&app, Method::POST, &uri, Some(&guest), Some(json!({ "password": "nachos" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) =
        send(&app, Method::POST, &uri, Some(&guest), Some(json!({ "password": "popcorn" }))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn start_requires_every_player_ready() {
    let app = routes::app(memory_state());
    let host = TestUser::new("alice");
    let guest = TestUser::new("bob");
    let room_id = create_room(&app, &host).await;
    join_room(&app, room_id, &guest).await;

    let (status, _) =
        send(&app, Method::POST, &format!("/rooms/{room_id}/start"), Some(&host), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, detail) = send(&app, Method::GET, &format!("/rooms/{room_id}"), None, None).await;
    assert_eq!(detail["status"], "waiting");
}

#[tokio::test]
async fn only_the_host_starts_the_game() {
    let app = routes::app(memory_state());
    let host = TestUser::new("alice");
    let guest = TestUser::new("bob");
    let room_id = create_room(&app, &host).await;
    join_room(&app, room_id, &guest).await;

    let (status, _) =
        send(&app, Method::POST, &format!("/rooms/{room_id}/start"), Some(&guest), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn host_leaving_closes_the_room() {
    let app = routes::app(memory_state());
    let host = TestUser::new("alice");
    let guest = TestUser::new("bob");
    let room_id = create_room(&app, &host).await;
    join_room(&app, room_id, &guest).await;

    let (status, _) =
        send(&app, Method::POST, &format!("/rooms/{room_id}/leave"), Some(&host), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, &format!("/rooms/{room_id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn guest_leaving_keeps_the_room() {
    let app = routes::app(memory_state());
    let host = TestUser::new("alice");
    let guest = TestUser::new("bob");
    let room_id = create_room(&app, &host).await;
    join_room(&app, room_id, &guest).await;

    let (status, _) =
        send(&app, Method::POST, &format!("/rooms/{room_id}/leave"), Some(&guest), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, detail) = send(&app, Method::GET, &format!("/rooms/{room_id}"), None, None).await;
    assert_eq!(detail["players"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn started_room_refuses_new_players() {
    let app = routes::app(memory_state());
    let host = TestUser::new("alice");
    let guest = TestUser::new("bob");
    let late = TestUser::new("carol");
    let room_id = started_room(&app, &host, &guest).await;

    let (status, _) =
        send(&app, Method::POST, &format!("/rooms/{room_id}/join"), Some(&late), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn secret_word_is_only_shown_to_the_drawer() {
    let app = routes::app(memory_state());
    let host = TestUser::new("alice");
    let guest = TestUser::new("bob");
    let room_id = started_room(&app, &host, &guest).await;
    let uri = format!("/rooms/{room_id}/rounds/current");

    let (status, drawer_view) = send(&app, Method::GET, &uri, Some(&host), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(drawer_view["round_number"], 1);
    assert_eq!(drawer_view["word"], WORD);

    let (_, guesser_view) = send(&app, Method::GET, &uri, Some(&guest), None).await;
    assert!(guesser_view["word"].is_null());

    let outsider = TestUser::new("mallory");
    let (status, _) = send(&app, Method::GET, &uri, Some(&outsider), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn correct_rest_guess_scores_and_advances_the_round() {
    let app = routes::app(memory_state());
    let host = TestUser::new("alice");
    let guest = TestUser::new("bob");
    let room_id = started_room(&app, &host, &guest).await;

    let (_, round) = send(
        &app,
        Method::GET,
        &format!("/rooms/{room_id}/rounds/current"),
        Some(&guest),
        None,
    )
    .await;
    let round_id = round["id"].as_str().unwrap().to_owned();

    let guess_uri = format!("/rounds/{round_id}/guess");
    let (status, body) = send(
        &app,
        Method::POST,
        &guess_uri,
        Some(&guest),
        Some(json!({ "guess": "  Elephant " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["guess"]["is_correct"], true);
    assert_eq!(body["guess"]["points_earned"], 100);
    assert_eq!(body["next_round"], 2);

    // The closed round no longer accepts guesses.
    let (status, _) = send(
        &app,
        Method::POST,
        &guess_uri,
        Some(&guest),
        Some(json!({ "guess": "elephant" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, players) =
        send(&app, Method::GET, &format!("/rooms/{room_id}/players"), Some(&host), None).await;
    assert_eq!(players[0]["username"], "bob");
    assert_eq!(players[0]["score"], 100);

    let (_, current) = send(
        &app,
        Method::GET,
        &format!("/rooms/{room_id}/rounds/current"),
        Some(&guest),
        None,
    )
    .await;
    assert_eq!(current["round_number"], 2);
    assert_eq!(current["word"], WORD);
}

#[tokio::test]
async fn only_the_drawer_updates_the_drawing() {
    let app = routes::app(memory_state());
    let host = TestUser::new("alice");
    let guest = TestUser::new("bob");
    let room_id = started_room(&app, &host, &guest).await;

    let (_, round) = send(
        &app,
        Method::GET,
        &format!("/rooms/{room_id}/rounds/current"),
        Some(&host),
        None,
    )
    .await;
    let uri = format!("/rounds/{}/drawing", round["id"].as_str().unwrap());

    let (status, _) = send(
        &app,
        Method::POST,
        &uri,
        Some(&guest),
        Some(json!({ "drawing_data": { "lines": [] } })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::POST,
        &uri,
        Some(&host),
        Some(json!({ "drawing_data": { "lines": [1] } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, current) = send(
        &app,
        Method::GET,
        &format!("/rooms/{room_id}/rounds/current"),
        Some(&guest),
        None,
    )
    .await;
    assert_eq!(current["drawing_data"], json!({ "lines": [1] }));
}

#[tokio::test]
async fn ending_the_game_names_the_winner_and_feeds_stats() {
    let app = routes::app(memory_state());
    let host = TestUser::new("alice");
    let guest = TestUser::new("bob");
    let room_id = started_room(&app, &host, &guest).await;

    let (_, round) = send(
        &app,
        Method::GET,
        &format!("/rooms/{room_id}/rounds/current"),
        Some(&guest),
        None,
    )
    .await;
    let guess_uri = format!("/rounds/{}/guess", round["id"].as_str().unwrap());
    send(&app, Method::POST, &guess_uri, Some(&guest), Some(json!({ "guess": WORD }))).await;

    let (status, result) =
        send(&app, Method::POST, &format!("/rooms/{room_id}/end"), Some(&host), None).await;
    assert_eq!(status, StatusCode::OK, "{result}");
    assert_eq!(result["status"], "finished");
    assert_eq!(result["winner"]["username"], "bob");

    let (status, _) =
        send(&app, Method::POST, &format!("/rooms/{room_id}/end"), Some(&host), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, leaderboard) = send(&app, Method::GET, "/leaderboard", None, None).await;
    assert_eq!(leaderboard[0]["username"], "bob");

    let (status, stats) = send(&app, Method::GET, "/stats", Some(&guest), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_games"], 1);
    assert_eq!(stats["games_won"], 1);
    assert_eq!(stats["correct_guesses"], 1);
}

#[tokio::test]
async fn chat_history_is_newest_first() {
    let app = routes::app(memory_state());
    let host = TestUser::new("alice");
    let guest = TestUser::new("bob");
    let room_id = create_room(&app, &host).await;
    join_room(&app, room_id, &guest).await;
    let uri = format!("/rooms/{room_id}/chat");

    let (status, _) =
        send(&app, Method::POST, &uri, Some(&host), Some(json!({ "message": "hi" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    send(&app, Method::POST, &uri, Some(&guest), Some(json!({ "message": "hello" }))).await;

    let (status, history) = send(&app, Method::GET, &uri, Some(&guest), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history[0]["message"], "hello");
    assert_eq!(history[1]["message"], "hi");
}

#[tokio::test]
async fn host_can_kick_but_not_self() {
    let app = routes::app(memory_state());
    let host = TestUser::new("alice");
    let guest = TestUser::new("bob");
    let room_id = create_room(&app, &host).await;
    let guest_player = join_room(&app, room_id, &guest).await;

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/players/{guest_player}/kick"),
        Some(&guest),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) =
        send(&app, Method::POST, &format!("/players/{guest_player}/kick"), Some(&host), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, detail) = send(&app, Method::GET, &format!("/rooms/{room_id}"), None, None).await;
    let host_player = detail["players"][0]["id"].as_str().unwrap().to_owned();
    let (status, _) =
        send(&app, Method::POST, &format!("/players/{host_player}/kick"), Some(&host), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn winning_a_game_earns_an_achievement() {
    let app = routes::app(memory_state());
    let host = TestUser::new("alice");
    let guest = TestUser::new("bob");
    let room_id = started_room(&app, &host, &guest).await;

    let (_, round) = send(
        &app,
        Method::GET,
        &format!("/rooms/{room_id}/rounds/current"),
        Some(&guest),
        None,
    )
    .await;
    let guess_uri = format!("/rounds/{}/guess", round["id"].as_str().unwrap());
    send(&app, Method::POST, &guess_uri, Some(&guest), Some(json!({ "guess": WORD }))).await;
    send(&app, Method::POST, &format!("/rooms/{room_id}/end"), Some(&host), None).await;

    let (status, _) = send(&app, Method::GET, "/achievements", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, mine) = send(&app, Method::GET, "/achievements", Some(&guest), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["achievement_type"], "game_won");
    assert_eq!(mine[0]["username"], "bob");

    let (_, theirs) = send(&app, Method::GET, "/achievements", Some(&host), None).await;
    assert!(theirs.as_array().unwrap().is_empty());

    let uri = format!("/achievements/{}", mine[0]["id"].as_str().unwrap());
    let (status, detail) = send(&app, Method::GET, &uri, Some(&host), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["value"], mine[0]["value"]);

    let missing = format!("/achievements/{}", uuid::Uuid::new_v4());
    let (status, _) = send(&app, Method::GET, &missing, Some(&guest), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
